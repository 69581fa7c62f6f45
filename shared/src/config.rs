use anyhow::{Context, Result};
use std::{env, str::FromStr};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub rotation: RotationConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST")?,
            port: env::var("DATABASE_PORT")?.parse()?,
            username: env::var("DATABASE_USERNAME")?,
            password: env::var("DATABASE_PASSWORD")?,
            database: env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: env::var("REDIS_HOST")?,
            port: env::var("REDIS_PORT")?.parse::<u16>()?,
        };
        let auth = AuthConfig {
            ttl: env::var("AUTH_TOKEN_TTL")?.parse::<u64>()?,
        };
        let rotation = RotationConfig {
            expiry_months: var_or("ROTATION_EXPIRY_MONTHS", RotationConfig::DEFAULT_EXPIRY_MONTHS)?,
            grant_days: var_or("ROTATION_GRANT_DAYS", RotationConfig::DEFAULT_GRANT_DAYS)?,
            days_per_month: var_or(
                "ROTATION_DAYS_PER_MONTH",
                RotationConfig::DEFAULT_DAYS_PER_MONTH,
            )?,
        };
        rotation.validate()?;
        let server = ServerConfig {
            port: var_or("SERVER_PORT", 8080)?,
        };
        Ok(Self {
            database,
            redis,
            auth,
            rotation,
            server,
        })
    }
}

// 任意項目は未設定ならデフォルト値、設定されていれば必ずパースできること
fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => v
            .parse()
            .with_context(|| format!("環境変数 {key} の値が不正です: {v}")),
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    pub ttl: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationConfig {
    /// この月数以上経過した割り当ては期限切れになる
    pub expiry_months: f64,
    /// 新しい割り当ての有効日数
    pub grant_days: i64,
    /// 経過月数を計算するときの 1 か月の日数
    pub days_per_month: f64,
}

impl RotationConfig {
    pub const DEFAULT_EXPIRY_MONTHS: f64 = 3.0;
    pub const DEFAULT_GRANT_DAYS: i64 = 90;
    pub const DEFAULT_DAYS_PER_MONTH: f64 = 30.0;
    /// 終了日の計算が chrono の範囲を超えないための上限（およそ 100 年）
    pub const MAX_GRANT_DAYS: i64 = 36_500;

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.expiry_months.is_finite() && self.expiry_months > 0.0,
            "ROTATION_EXPIRY_MONTHS must be a positive finite number"
        );
        anyhow::ensure!(
            (1..=Self::MAX_GRANT_DAYS).contains(&self.grant_days),
            "ROTATION_GRANT_DAYS must be between 1 and {}",
            Self::MAX_GRANT_DAYS
        );
        anyhow::ensure!(
            self.days_per_month.is_finite() && self.days_per_month > 0.0,
            "ROTATION_DAYS_PER_MONTH must be a positive finite number"
        );
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            expiry_months: Self::DEFAULT_EXPIRY_MONTHS,
            grant_days: Self::DEFAULT_GRANT_DAYS,
            days_per_month: Self::DEFAULT_DAYS_PER_MONTH,
        }
    }
}

pub struct ServerConfig {
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_rotation_config_is_valid() {
        let config = RotationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.expiry_months, 3.0);
        assert_eq!(config.grant_days, 90);
        assert_eq!(config.days_per_month, 30.0);
    }

    #[rstest]
    #[case(0.0, 90, 30.0)]
    #[case(3.0, 0, 30.0)]
    #[case(3.0, 90, 0.0)]
    #[case(-1.0, 90, 30.0)]
    #[case(f64::NAN, 90, 30.0)]
    #[case(f64::INFINITY, 90, 30.0)]
    #[case(3.0, 36_501, 30.0)]
    #[case(3.0, i64::MAX, 30.0)]
    #[case(3.0, 90, f64::NAN)]
    #[case(3.0, 90, f64::INFINITY)]
    fn out_of_range_rotation_values_are_rejected(
        #[case] expiry_months: f64,
        #[case] grant_days: i64,
        #[case] days_per_month: f64,
    ) {
        let config = RotationConfig {
            expiry_months,
            grant_days,
            days_per_month,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn longest_grant_window_is_accepted() {
        let config = RotationConfig {
            grant_days: RotationConfig::MAX_GRANT_DAYS,
            ..RotationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn var_or_falls_back_when_unset() {
        let value: u16 = var_or("COMMUNITY_PARKING_TEST_SURELY_UNSET", 1234).unwrap();
        assert_eq!(value, 1234);
    }
}
