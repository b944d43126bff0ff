pub mod ai_provider;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod interactive;
pub mod logging;
pub mod search;
