mod settings;

pub use settings::{NetworkConfig, Settings};
