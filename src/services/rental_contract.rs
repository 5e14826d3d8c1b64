//! Rental contract gateway
//!
//! Submits `listDomain` / `rentDomain` / `reclaimDomain` to the on-chain
//! rental contract and handles the operator-approval flow against whichever
//! contract holds the name (base registrar or name wrapper). Every write
//! follows simulate -> signed send -> receipt; a failure at any step
//! surfaces as one error with no automatic retry.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    signers::local::PrivateKeySigner,
    sol,
    transports::http::{Client, Http},
};
use std::str::FromStr;
use tracing::{error, info, warn};

// Rental contract surface consumed by this gateway.
sol! {
    #[sol(rpc)]
    interface IEnsRent {
        function listDomain(
            uint256 tokenId,
            uint256 pricePerSecond,
            uint256 maxEndTimestamp,
            bytes32 node,
            string name
        ) external;

        function rentDomain(uint256 tokenId, uint256 desiredEndTimestamp) external payable;

        function reclaimDomain(uint256 tokenId) external;
    }
}

// Shared ERC-721 approval surface of the base registrar and name wrapper.
sol! {
    #[sol(rpc)]
    interface INameHolder {
        function ownerOf(uint256 tokenId) external view returns (address);
        function isApprovedForAll(address account, address operator) external view returns (bool);
        function setApprovalForAll(address operator, bool approved) external;
    }
}

/// Error types for gateway calls
#[derive(Debug)]
pub enum ContractError {
    InvalidConfig(String),
    ProviderError(String),
    TransactionError(String),
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            ContractError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            ContractError::TransactionError(msg) => write!(f, "Transaction error: {}", msg),
        }
    }
}

impl std::error::Error for ContractError {}

/// Which contract must grant the rental contract operating approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalTarget {
    BaseRegistrar,
    NameWrapper,
}

impl ApprovalTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalTarget::BaseRegistrar => "baseRegistrar",
            ApprovalTarget::NameWrapper => "nameWrapper",
        }
    }
}

pub struct RentalContractService {
    provider: RootProvider<Http<Client>>,
    wallet: EthereumWallet,
    rpc_url: String,
    ensrent: Address,
    base_registrar: Address,
    name_wrapper: Address,
}

impl RentalContractService {
    /// Build the gateway from configuration. Does not touch the network;
    /// call [`Self::verify_connection`] at startup for an early sanity log.
    pub fn new(
        rpc_url: &str,
        private_key: &str,
        ensrent_address: &str,
        base_registrar_address: &str,
        name_wrapper_address: &str,
    ) -> Result<Self, ContractError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ContractError::InvalidConfig(format!("Invalid private key: {}", e)))?;
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new().on_http(
            rpc_url
                .parse()
                .map_err(|e| ContractError::InvalidConfig(format!("Invalid RPC URL: {}", e)))?,
        );

        let ensrent = Address::from_str(ensrent_address).map_err(|e| {
            ContractError::InvalidConfig(format!("Invalid rental contract address: {}", e))
        })?;
        let base_registrar = Address::from_str(base_registrar_address).map_err(|e| {
            ContractError::InvalidConfig(format!("Invalid base registrar address: {}", e))
        })?;
        let name_wrapper = Address::from_str(name_wrapper_address).map_err(|e| {
            ContractError::InvalidConfig(format!("Invalid name wrapper address: {}", e))
        })?;

        Ok(Self {
            provider,
            wallet,
            rpc_url: rpc_url.to_string(),
            ensrent,
            base_registrar,
            name_wrapper,
        })
    }

    /// Log the chain the RPC endpoint answers for. Failure is logged, not
    /// fatal; the first real call will surface it to a caller.
    pub async fn verify_connection(&self) {
        match self.provider.get_chain_id().await {
            Ok(chain_id) => {
                info!(chain_id = chain_id, ensrent = %self.ensrent, "Rental contract gateway connected");
            }
            Err(e) => {
                warn!(error = %e, "Could not reach RPC endpoint at startup");
            }
        }
    }

    fn signing_provider(&self) -> Result<impl Provider<Http<Client>>, ContractError> {
        Ok(ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(self.wallet.clone())
            .on_http(
                self.rpc_url
                    .parse()
                    .map_err(|e| ContractError::ProviderError(format!("RPC URL error: {}", e)))?,
            ))
    }

    /// Which contract currently holds the name: the wrapper owns the
    /// registrar token for wrapped names, otherwise the registrar itself
    /// is the custodian.
    pub async fn approval_target(&self, token_id: U256) -> Result<ApprovalTarget, ContractError> {
        let registrar = INameHolder::new(self.base_registrar, &self.provider);
        let owner = registrar
            .ownerOf(token_id)
            .call()
            .await
            .map_err(|e| {
                error!(error = %e, "ownerOf lookup failed");
                ContractError::ProviderError(format!("ownerOf failed: {}", e))
            })?
            ._0;

        if owner == self.name_wrapper {
            Ok(ApprovalTarget::NameWrapper)
        } else {
            Ok(ApprovalTarget::BaseRegistrar)
        }
    }

    fn target_address(&self, target: ApprovalTarget) -> Address {
        match target {
            ApprovalTarget::BaseRegistrar => self.base_registrar,
            ApprovalTarget::NameWrapper => self.name_wrapper,
        }
    }

    /// Whether `owner` has granted the rental contract operating approval
    /// on the resolved holding contract.
    pub async fn is_approved_on(
        &self,
        target: ApprovalTarget,
        owner: Address,
    ) -> Result<bool, ContractError> {
        let holder = INameHolder::new(self.target_address(target), &self.provider);

        let approved = holder
            .isApprovedForAll(owner, self.ensrent)
            .call()
            .await
            .map_err(|e| ContractError::ProviderError(format!("isApprovedForAll failed: {}", e)))?
            ._0;

        Ok(approved)
    }

    /// Grant the rental contract operating approval on the holding
    /// contract.
    pub async fn approve(&self, token_id: U256) -> Result<String, ContractError> {
        let target = self.approval_target(token_id).await?;
        info!(target = target.as_str(), "Submitting setApprovalForAll");

        let provider = self.signing_provider()?;
        let holder = INameHolder::new(self.target_address(target), &provider);
        let call = holder.setApprovalForAll(self.ensrent, true);

        self.submit(call).await
    }

    /// Create a listing.
    pub async fn list_domain(
        &self,
        token_id: U256,
        price_per_second: U256,
        max_end_timestamp: u64,
        node: B256,
        label: String,
    ) -> Result<String, ContractError> {
        info!(
            label = %label,
            price_per_second = %price_per_second,
            max_end_timestamp = max_end_timestamp,
            "Submitting listDomain"
        );

        let provider = self.signing_provider()?;
        let ensrent = IEnsRent::new(self.ensrent, &provider);
        let call = ensrent.listDomain(
            token_id,
            price_per_second,
            U256::from(max_end_timestamp),
            node,
            label,
        );

        self.submit(call).await
    }

    /// Rent a listed domain until `desired_end_timestamp`, paying
    /// `value` wei (rate times duration, computed by the caller).
    pub async fn rent_domain(
        &self,
        token_id: U256,
        desired_end_timestamp: u64,
        value: U256,
    ) -> Result<String, ContractError> {
        info!(
            desired_end_timestamp = desired_end_timestamp,
            value = %value,
            "Submitting rentDomain"
        );

        let provider = self.signing_provider()?;
        let ensrent = IEnsRent::new(self.ensrent, &provider);
        let call = ensrent
            .rentDomain(token_id, U256::from(desired_end_timestamp))
            .value(value);

        self.submit(call).await
    }

    /// Reclaim an expired or unrented listing.
    pub async fn reclaim_domain(&self, token_id: U256) -> Result<String, ContractError> {
        info!("Submitting reclaimDomain");

        let provider = self.signing_provider()?;
        let ensrent = IEnsRent::new(self.ensrent, &provider);
        let call = ensrent.reclaimDomain(token_id);

        self.submit(call).await
    }

    /// simulate -> send -> receipt, shared by every write.
    async fn submit<T, P, D>(
        &self,
        call: alloy::contract::CallBuilder<T, P, D>,
    ) -> Result<String, ContractError>
    where
        T: alloy::transports::Transport + Clone,
        P: Provider<T>,
        D: alloy::contract::CallDecoder + Unpin,
    {
        call.call().await.map_err(|e| {
            error!(error = %e, "Simulation failed");
            ContractError::TransactionError(format!("Simulation failed: {}", e))
        })?;

        let pending = call.send().await.map_err(|e| {
            error!(error = %e, "Failed to send transaction");
            ContractError::TransactionError(format!("Send failed: {}", e))
        })?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        info!(tx_hash = %tx_hash, "Transaction sent, waiting for confirmation");

        let receipt = pending.get_receipt().await.map_err(|e| {
            error!(error = %e, "Failed to get transaction receipt");
            ContractError::TransactionError(format!("Receipt failed: {}", e))
        })?;

        if !receipt.status() {
            return Err(ContractError::TransactionError(
                "Transaction reverted".to_string(),
            ));
        }

        Ok(tx_hash)
    }
}
