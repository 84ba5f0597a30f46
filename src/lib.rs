//! smartfinance: a personal finance tracker. Transactions are recorded in a `Store`, summarized by
//! the functions in `report`, and critiqued by a language model through `advisor`.

pub mod advisor;
pub mod args;
pub mod commands;
mod config;
mod error;
mod fs;
pub mod model;
pub mod report;
pub mod store;
mod utils;


pub use advisor::Mode;
pub use config::Config;
pub use error::Error;
pub use error::Result;
