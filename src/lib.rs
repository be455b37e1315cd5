pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod utils;
