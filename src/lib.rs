pub mod analyzers;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod readers;
pub mod store;
pub mod utils;

pub use engine::{DashboardEngine, LoadReport};
pub use error::{ProcessingError, Result};
