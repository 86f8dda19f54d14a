pub mod cli;
pub mod logging;
pub mod report;
pub mod services;
pub mod sources;
pub mod types;
