use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{auth::event::CreateToken, auth::AccessToken, id::ResidentId};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    // アクセストークンからログイン中のユーザー ID を取得する
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<ResidentId>>;
    // メールアドレスとパスワードを照合する
    async fn verify_user(&self, email: &str, password: &str) -> AppResult<ResidentId>;
    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken>;
    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()>;
}
