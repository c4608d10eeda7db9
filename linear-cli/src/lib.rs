// ABOUTME: Library exports for Linear CLI modules for testing and external use
// ABOUTME: Makes the command handlers, settings and renderers available to integration tests

pub mod app;
pub mod cli;
pub mod cli_output;
pub mod commands;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod download;
pub mod output;
