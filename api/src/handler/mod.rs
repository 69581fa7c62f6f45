pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notification;
pub mod parking;
pub mod project;
pub mod resident;
pub mod vehicle;
