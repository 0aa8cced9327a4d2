mod runner;

pub use runner::{check, run, DomainStatus, RunSummary};
