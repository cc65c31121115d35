pub mod adapters;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod render;
