use tracing::{debug, info};

use crate::dns::DnsProvider;
use crate::error::Result;
use crate::ip::{IpResolver, Ipv4Literal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub address: Ipv4Literal,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStatus {
    pub domain: String,
    pub current: String,
    pub in_sync: bool,
}

/// Bring the A record of every domain in line with the public address.
///
/// Domains are processed strictly in order and the first failure aborts
/// the whole run, leaving later domains untouched.
pub async fn run(
    resolver: &dyn IpResolver,
    provider: &dyn DnsProvider,
    domains: &[String],
) -> Result<RunSummary> {
    debug!(
        "reconciling {} domains via {}",
        domains.len(),
        provider.provider_name()
    );

    let address = resolver.resolve().await?;
    info!("outside ip address: {}", address);

    let mut updated = Vec::new();
    let mut unchanged = Vec::new();

    for domain in domains {
        info!("domain: {}", domain);

        let current = provider.read_a_record(domain).await?;
        info!("  current A record: {}", current);

        if address.as_str() == current {
            info!("  nothing to update");
            unchanged.push(domain.clone());
        } else {
            info!("  updating to new A record: '{}'", address);
            provider.write_a_record(domain, &address).await?;
            updated.push(domain.clone());
        }
    }

    Ok(RunSummary {
        address,
        updated,
        unchanged,
    })
}

/// Same reads as [`run`], but never writes.
pub async fn check(
    resolver: &dyn IpResolver,
    provider: &dyn DnsProvider,
    domains: &[String],
) -> Result<(Ipv4Literal, Vec<DomainStatus>)> {
    let address = resolver.resolve().await?;

    let mut statuses = Vec::with_capacity(domains.len());
    for domain in domains {
        let current = provider.read_a_record(domain).await?;
        statuses.push(DomainStatus {
            domain: domain.clone(),
            in_sync: address.as_str() == current,
            current,
        });
    }

    Ok((address, statuses))
}
