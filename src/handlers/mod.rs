pub mod auth;
pub mod pulls;
pub mod reviews;
pub mod viewer;
