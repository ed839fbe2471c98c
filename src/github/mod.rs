pub mod client;
pub mod queries;
pub mod types;

pub use client::QueryClient;
