use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// Four groups of 0-255, each group may carry a dot and must end on a word
// boundary. Digits are ASCII only.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((25[0-5]|(2[0-4]|1[0-9]|[1-9]|)[0-9])\.?\b){4}$")
        .expect("IPv4 pattern is valid")
});

/// An IPv4 address exactly as the echo service spelled it.
///
/// Comparison with DNS record values is byte-for-byte, so the text is kept
/// as received instead of being converted to [`std::net::Ipv4Addr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Literal(String);

impl Ipv4Literal {
    pub fn parse(text: &str) -> Result<Self> {
        if IPV4_PATTERN.is_match(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(Error::Validation(format!(
                "outside ip address '{}' is invalid",
                text
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ipv4Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
