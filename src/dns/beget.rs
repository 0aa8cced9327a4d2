use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::envelope::{self, Answer};
use super::provider::{Credentials, DnsProvider};
use crate::error::{Error, Result};
use crate::ip::Ipv4Literal;

pub const BEGET_API_BASE: &str = "https://api.beget.com/api";

/// Priority given to the A record written by the updater.
pub const DEFAULT_PRIORITY: u32 = 10;

const GET_DATA: &str = "dns/getData";
const CHANGE_RECORDS: &str = "dns/changeRecords";

pub struct BegetProvider {
    client: Client,
    credentials: Credentials,
    api_base: String,
}

#[derive(Debug, Serialize)]
struct GetDataInput<'a> {
    fqdn: &'a str,
}

#[derive(Debug, Serialize)]
struct ChangeRecordsInput<'a> {
    fqdn: &'a str,
    records: RecordsInput<'a>,
}

#[derive(Debug, Serialize)]
struct RecordsInput<'a> {
    #[serde(rename = "A")]
    a: Vec<ARecordInput<'a>>,
}

#[derive(Debug, Serialize)]
struct ARecordInput<'a> {
    priority: u32,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct DomainData {
    records: RecordSet,
}

#[derive(Debug, Deserialize)]
struct RecordSet {
    #[serde(rename = "A", default)]
    a: Option<Vec<ARecord>>,
}

#[derive(Debug, Deserialize)]
struct ARecord {
    address: String,
}

impl BegetProvider {
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self::with_api_base(client, credentials, BEGET_API_BASE)
    }

    pub fn with_api_base(
        client: Client,
        credentials: Credentials,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn call<T: Serialize>(&self, operation: &str, input: &T) -> Result<Answer> {
        let url = format!("{}/{}", self.api_base, operation);
        let input_data = serde_json::to_string(input)?;

        debug!("calling {} with {}", operation, input_data);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("login", self.credentials.login.as_str()),
                ("passwd", self.credentials.password.as_str()),
                ("input_format", "json"),
                ("output_format", "json"),
                ("input_data", input_data.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        envelope::decode(status, &body, operation)
    }
}

fn single_a_record(domain: &str, records: RecordSet) -> Result<String> {
    let mut records = records.a.unwrap_or_default();

    match records.len() {
        0 => Err(Error::DataShape(format!(
            "no A record found for '{}'",
            domain
        ))),
        1 => Ok(records.remove(0).address),
        n => Err(Error::DataShape(format!(
            "'{}' has {} A records ({}), expected exactly one",
            domain,
            n,
            records
                .iter()
                .map(|r| r.address.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[async_trait]
impl DnsProvider for BegetProvider {
    async fn read_a_record(&self, domain: &str) -> Result<String> {
        let answer = self.call(GET_DATA, &GetDataInput { fqdn: domain }).await?;
        let data: DomainData = serde_json::from_value(answer.result)?;

        single_a_record(domain, data.records)
    }

    async fn write_a_record(&self, domain: &str, address: &Ipv4Literal) -> Result<()> {
        let input = ChangeRecordsInput {
            fqdn: domain,
            records: RecordsInput {
                a: vec![ARecordInput {
                    priority: DEFAULT_PRIORITY,
                    value: address.as_str(),
                }],
            },
        };

        self.call(CHANGE_RECORDS, &input).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "beget"
    }
}
