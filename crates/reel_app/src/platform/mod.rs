mod app;
mod cli;
mod config;
mod effects;

pub use app::run_app;
