pub mod analyzers;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod model;
pub mod report;
