pub mod cli;
pub mod config;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod model;
pub mod util;
