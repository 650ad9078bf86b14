pub mod analyze;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod remote;
pub mod report;
pub mod store;
