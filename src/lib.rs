pub mod analyze;
pub mod attribution;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod languages;
pub mod model;
pub mod orchestrator;
pub mod remote;
pub mod render;
pub mod report;
pub mod splice;
pub mod store;
pub mod util;
