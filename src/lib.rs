#[macro_use]
extern crate serde;

pub mod config;
pub mod error;
pub mod github;
pub mod handlers;
pub mod state;
