pub mod config;
pub mod error;
pub mod toy;
pub mod types;
