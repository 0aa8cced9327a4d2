pub mod config;
pub mod dns;
pub mod error;
pub mod ip;
pub mod reconcile;

pub use error::{Error, Result};
