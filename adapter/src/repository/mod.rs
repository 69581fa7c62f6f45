pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notification;
pub mod parking;
pub mod project;
pub mod resident;
pub mod rotation;
pub mod vehicle;

// 一意制約違反かどうか
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_unique_violation())
}
