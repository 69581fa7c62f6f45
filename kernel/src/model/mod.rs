pub mod auth;
pub mod dashboard;
pub mod id;
pub mod notification;
pub mod parking;
pub mod project;
pub mod resident;
pub mod role;
pub mod rotation;
pub mod vehicle;
