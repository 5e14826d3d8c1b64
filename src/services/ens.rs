//! ENS name helpers
//!
//! Label/name hashing (the token id of a second-level name is the keccak of
//! its label) and owned-name lookup against the ENS subgraph. Lookups are
//! TTL-cached; registrant and wrapped-owner names are unioned and filtered
//! to second-level `.eth` names, which are the only rentable unit.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{keccak256, B256, U256};
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug)]
pub enum EnsError {
    Transport(String),
    GraphQl(String),
    InvalidResponse(String),
}

impl std::fmt::Display for EnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnsError::Transport(msg) => write!(f, "ENS subgraph transport error: {}", msg),
            EnsError::GraphQl(msg) => write!(f, "ENS subgraph error: {}", msg),
            EnsError::InvalidResponse(msg) => write!(f, "Invalid ENS subgraph response: {}", msg),
        }
    }
}

impl std::error::Error for EnsError {}

/// The label of a second-level name: `vault.eth` -> `vault`.
pub fn label_of(name: &str) -> &str {
    name.strip_suffix(".eth").unwrap_or(name)
}

/// keccak256 of the UTF-8 label.
pub fn labelhash(label: &str) -> B256 {
    keccak256(label.as_bytes())
}

/// The registrar token id of a second-level name: its label hash read as a
/// big-endian integer.
pub fn token_id_u256(name: &str) -> U256 {
    U256::from_be_bytes(labelhash(label_of(name)).0)
}

/// The token id decimal-encoded the way the indexer stores it.
pub fn token_id(name: &str) -> String {
    token_id_u256(name).to_string()
}

/// Standard recursive ENS namehash.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.split('.').rev() {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(node.as_slice());
        bytes[32..].copy_from_slice(labelhash(label).as_slice());
        node = keccak256(bytes);
    }
    node
}

/// 0x-prefixed hex form of a hash, as the contract ABI expects it.
pub fn to_hex(hash: B256) -> String {
    format!("0x{}", hex::encode(hash.as_slice()))
}

const NAMES_QUERY: &str = "\
query NamesForAddress($owner: String!) {\n\
  registered: domains(where: { registrant: $owner }) { name }\n\
  wrapped: domains(where: { wrappedOwner: $owner }) { name }\n\
}";

#[derive(Debug, Deserialize)]
struct NamesResponse {
    #[serde(default = "Option::default")]
    data: Option<NamesData>,
    #[serde(default)]
    errors: Option<Vec<NamesError>>,
}

#[derive(Debug, Deserialize)]
struct NamesError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct NamesData {
    #[serde(default)]
    registered: Vec<NamedDomain>,
    #[serde(default)]
    wrapped: Vec<NamedDomain>,
}

#[derive(Debug, Deserialize)]
struct NamedDomain {
    #[serde(default)]
    name: Option<String>,
}

/// Owned-name lookup with a TTL cache keyed by lowercased address.
#[derive(Clone)]
pub struct EnsNameService {
    client: Client,
    endpoint: String,
    cache: Arc<Cache<String, Vec<String>>>,
}

impl EnsNameService {
    pub fn new(endpoint: String, cache_ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self {
            client: Client::new(),
            endpoint,
            cache: Arc::new(cache),
        }
    }

    /// Second-level `.eth` names the address owns, directly registered or
    /// wrapped.
    pub async fn names_for_address(&self, address: &str) -> Result<Vec<String>, EnsError> {
        let owner = address.trim().to_lowercase();

        if let Some(cached) = self.cache.get(&owner).await {
            tracing::debug!(owner = %owner, "ENS name cache hit");
            return Ok(cached);
        }

        tracing::debug!(owner = %owner, "Fetching owned names from ENS subgraph");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": NAMES_QUERY, "variables": { "owner": owner } }))
            .send()
            .await
            .map_err(|e| EnsError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EnsError::Transport(format!(
                "subgraph returned {}: {}",
                status, body
            )));
        }

        let body: NamesResponse = response
            .json()
            .await
            .map_err(|e| EnsError::InvalidResponse(e.to_string()))?;

        if let Some(errors) = body.errors {
            if !errors.is_empty() {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                return Err(EnsError::GraphQl(messages.join("; ")));
            }
        }

        let data = body
            .data
            .ok_or_else(|| EnsError::InvalidResponse("response carried no data".to_string()))?;

        let names = filter_rentable_names(
            data.registered
                .into_iter()
                .chain(data.wrapped)
                .filter_map(|d| d.name),
        );

        self.cache.insert(owner, names.clone()).await;

        Ok(names)
    }
}

/// Keep only unique second-level `.eth` names, preserving order.
fn filter_rentable_names<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| name.ends_with(".eth") && name.split('.').count() == 2)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namehash_known_vectors() {
        assert_eq!(to_hex(namehash("")), format!("0x{}", "0".repeat(64)));
        assert_eq!(
            to_hex(namehash("eth")),
            "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            to_hex(namehash("foo.eth")),
            "0xde9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn labelhash_is_plain_keccak_of_the_label() {
        assert_eq!(
            to_hex(labelhash("foo")),
            "0x41b1a0649752af1b28b3dc29a1556eee781e4a4c3a1f7f53f90fa834de098c4d"
        );
    }

    #[test]
    fn token_id_is_the_decimal_label_hash() {
        let expected = U256::from_str_radix(
            "41b1a0649752af1b28b3dc29a1556eee781e4a4c3a1f7f53f90fa834de098c4d",
            16,
        )
        .unwrap()
        .to_string();
        assert_eq!(token_id("foo.eth"), expected);
        // The suffix is ignored; the label alone is hashed.
        assert_eq!(token_id("foo"), expected);
    }

    #[test]
    fn rentable_name_filter_keeps_second_level_eth_only() {
        let names = filter_rentable_names(
            [
                "vault.eth".to_string(),
                "sub.vault.eth".to_string(),
                "vault.xyz".to_string(),
                "vault.eth".to_string(),
            ]
            .into_iter(),
        );
        assert_eq!(names, vec!["vault.eth".to_string()]);
    }
}
