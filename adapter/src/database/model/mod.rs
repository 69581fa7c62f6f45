use shared::error::{AppError, AppResult};
use std::str::FromStr;

pub mod auth;
pub mod dashboard;
pub mod notification;
pub mod parking;
pub mod project;
pub mod resident;
pub mod vehicle;

// テキストで保存している列挙値をドメインの型に変換する
pub(crate) fn parse_column<T: FromStr>(column: &str, value: &str) -> AppResult<T> {
    value.parse().map_err(|_| {
        AppError::ConversionEntityError(format!("{column} の値が不正です: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{parking::AssignmentStatus, role::Role};

    #[test]
    fn parses_stored_enum_values() {
        assert_eq!(parse_column::<Role>("role", "admin").unwrap(), Role::Admin);
        assert_eq!(
            parse_column::<AssignmentStatus>("status", "cancelled").unwrap(),
            AssignmentStatus::Cancelled
        );
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let err = parse_column::<Role>("role", "owner").unwrap_err();
        assert!(matches!(err, AppError::ConversionEntityError(_)));
    }
}
