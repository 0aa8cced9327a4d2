use async_trait::async_trait;

use crate::error::Result;
use crate::ip::Ipv4Literal;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Get the address of the single A record of `domain`
    async fn read_a_record(&self, domain: &str) -> Result<String>;

    /// Replace the A record set of `domain` with one entry for `address`
    async fn write_a_record(&self, domain: &str, address: &Ipv4Literal) -> Result<()>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
