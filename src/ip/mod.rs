mod address;
mod external;

pub use address::Ipv4Literal;
pub use external::ExternalIpResolver;

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Discover the current public IPv4 address
    async fn resolve(&self) -> Result<Ipv4Literal>;
}
