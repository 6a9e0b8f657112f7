pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod lookup;
pub mod storage;
