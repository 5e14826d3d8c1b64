//! Environment configuration
//!
//! Every endpoint URL and contract address is required; a missing value is
//! a fatal startup condition surfaced before anything is served.

use std::env;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid(var, msg) => write!(f, "{} is invalid: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Rental indexer GraphQL endpoint.
    pub ensrent_graphql_url: String,
    /// ENS subgraph endpoint for owned-name lookups.
    pub ens_subgraph_url: String,
    /// Ethereum JSON-RPC endpoint.
    pub rpc_url: String,
    /// Rental contract address.
    pub ensrent_address: String,
    /// Base registrar contract address.
    pub base_registrar_address: String,
    /// Name wrapper contract address.
    pub name_wrapper_address: String,
    /// Gateway signing key, hex with 0x prefix.
    pub signer_private_key: String,
    /// Listen address, default 0.0.0.0:3000.
    pub bind_addr: String,
    /// TTL of the owned-name cache, default 300 seconds.
    pub ens_name_cache_ttl_secs: u64,
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let ens_name_cache_ttl_secs = match env::var("ENS_NAME_CACHE_TTL_SECS") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("ENS_NAME_CACHE_TTL_SECS", value))?,
            Err(_) => 300,
        };

        Ok(Self {
            ensrent_graphql_url: required("ENSRENT_GRAPHQL_URL")?,
            ens_subgraph_url: required("ENS_SUBGRAPH_URL")?,
            rpc_url: required("RPC_URL")?,
            ensrent_address: required("ENSRENT_ADDRESS")?,
            base_registrar_address: required("BASE_REGISTRAR_ADDRESS")?,
            name_wrapper_address: required("NAME_WRAPPER_ADDRESS")?,
            signer_private_key: required("SIGNER_PRIVATE_KEY")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            ens_name_cache_ttl_secs,
        })
    }
}
