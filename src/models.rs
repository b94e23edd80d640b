pub mod alert;
pub mod auth;
pub mod badge;
pub mod dashboard;
pub mod maintenance;
pub mod rule;
pub mod vehicle;
