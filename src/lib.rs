pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod git;
pub mod hotspot;
pub mod logging;
