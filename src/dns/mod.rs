mod beget;
pub mod envelope;
mod provider;

pub use beget::{BegetProvider, BEGET_API_BASE, DEFAULT_PRIORITY};
pub use provider::{Credentials, DnsProvider};
