//! Contract handles with metadata-validated dispatch
//!
//! A [`Contract`] pairs an address with optional ABI metadata and an
//! injected [`ContractCaller`] capability. Method and event names are
//! plain strings, looked up against the ABI when one is present and
//! passed through opaquely when it is not — there is no dynamic property
//! dispatch and no ABI encoding here (encoding belongs to the caller
//! capability).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Contract errors
#[derive(Debug, Error)]
pub enum ContractError {
    /// The ABI JSON could not be parsed
    #[error("Invalid ABI: {0}")]
    InvalidAbi(String),

    /// Method name not present in the contract ABI
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Event name not present in the contract ABI
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// The contract execution reverted
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Failure reported by the caller capability
    #[error("Contract call failed: {0}")]
    CallFailed(String),
}

/// Result type for contract operations
pub type Result<T> = std::result::Result<T, ContractError>;

#[derive(Debug, Clone, Deserialize)]
struct AbiEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    entry_type: Option<String>,
}

/// Parsed contract ABI metadata
///
/// Only names and entry kinds are read; parameter lists, mutability and
/// everything else an ABI carries are ignored. Entries without a name
/// (constructors, fallbacks) are skipped.
#[derive(Debug, Clone, Default)]
pub struct ContractAbi {
    events: Vec<String>,
    functions: Vec<String>,
}

impl ContractAbi {
    /// Parse an ABI from its JSON array form
    pub fn from_json(abi: &serde_json::Value) -> Result<Self> {
        let entries: Vec<AbiEntry> = serde_json::from_value(abi.clone())
            .map_err(|e| ContractError::InvalidAbi(e.to_string()))?;

        let mut events = Vec::new();
        let mut functions = Vec::new();
        for entry in entries {
            let (Some(name), Some(entry_type)) = (entry.name, entry.entry_type) else {
                continue;
            };
            match entry_type.as_str() {
                "event" => events.push(name),
                "function" => functions.push(name),
                // constructor, fallback, receive, error: nothing to look up
                _ => {}
            }
        }

        Ok(Self { events, functions })
    }

    /// Event names declared by the contract
    pub fn event_names(&self) -> &[String] {
        &self.events
    }

    /// Function names declared by the contract
    pub fn function_names(&self) -> &[String] {
        &self.functions
    }

    /// Whether the contract declares the event
    pub fn has_event(&self, name: &str) -> bool {
        self.events.iter().any(|e| e == name)
    }

    /// Whether the contract declares the function
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }
}

/// Boundary to the blockchain SDK for contract interaction
///
/// Owns ABI encoding, signing and broadcasting. Supplied by the caller.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Execute a read-only (constant) contract call
    async fn call(
        &self,
        contract_address: &str,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value>;

    /// Submit a state-changing contract call, returning the transaction id
    async fn send(
        &self,
        contract_address: &str,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<String>;
}

/// Handle to a deployed contract
pub struct Contract {
    address: String,
    abi: Option<ContractAbi>,
    caller: Arc<dyn ContractCaller>,
}

impl Contract {
    /// Create a handle without ABI metadata; method and event names are
    /// passed through unvalidated
    pub fn new(address: impl Into<String>, caller: Arc<dyn ContractCaller>) -> Self {
        Self {
            address: address.into(),
            abi: None,
            caller,
        }
    }

    /// Create a handle with ABI metadata for name validation
    pub fn with_abi(
        address: impl Into<String>,
        abi: &serde_json::Value,
        caller: Arc<dyn ContractCaller>,
    ) -> Result<Self> {
        let abi = ContractAbi::from_json(abi)?;
        Ok(Self {
            address: address.into(),
            abi: Some(abi),
            caller,
        })
    }

    /// The contract address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The ABI metadata, when the handle was built with one
    pub fn abi(&self) -> Option<&ContractAbi> {
        self.abi.as_ref()
    }

    /// Check an event name against the ABI, if one is present
    ///
    /// Used by binding layers before registering the pair with the
    /// subscription registry. The wildcard sentinel is always accepted.
    pub fn validate_event(&self, event_name: &str) -> Result<()> {
        if event_name == crate::events::WILDCARD_EVENT {
            return Ok(());
        }
        match &self.abi {
            Some(abi) if !abi.has_event(event_name) => {
                Err(ContractError::UnknownEvent(event_name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn validate_function(&self, method: &str) -> Result<()> {
        match &self.abi {
            Some(abi) if !abi.has_function(method) => {
                Err(ContractError::UnknownFunction(method.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Execute a read-only contract method
    pub async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.validate_function(method)?;
        debug!(contract = %self.address, method, "contract call");
        self.caller.call(&self.address, method, params).await
    }

    /// Execute a state-changing contract method
    ///
    /// Caller failures whose message mentions a revert are reported as
    /// [`ContractError::Reverted`] so UIs can tell reverts from
    /// transport problems.
    pub async fn send(&self, method: &str, params: Vec<serde_json::Value>) -> Result<String> {
        self.validate_function(method)?;
        debug!(contract = %self.address, method, "contract send");
        match self.caller.send(&self.address, method, params).await {
            Err(ContractError::CallFailed(message)) if message.to_lowercase().contains("revert") => {
                Err(ContractError::Reverted(message))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn erc20_like_abi() -> serde_json::Value {
        json!([
            { "type": "function", "name": "transfer", "inputs": [] },
            { "type": "function", "name": "balanceOf", "inputs": [] },
            { "type": "event", "name": "Transfer", "inputs": [] },
            { "type": "event", "name": "Approval", "inputs": [] },
            { "type": "constructor", "inputs": [] }
        ])
    }

    struct FakeCaller {
        fail_send_with: Option<String>,
    }

    #[async_trait]
    impl ContractCaller for FakeCaller {
        async fn call(
            &self,
            contract_address: &str,
            method: &str,
            _params: Vec<serde_json::Value>,
        ) -> Result<serde_json::Value> {
            Ok(json!({ "contract": contract_address, "method": method }))
        }

        async fn send(
            &self,
            _contract_address: &str,
            _method: &str,
            _params: Vec<serde_json::Value>,
        ) -> Result<String> {
            match &self.fail_send_with {
                Some(message) => Err(ContractError::CallFailed(message.clone())),
                None => Ok("txid-1".to_string()),
            }
        }
    }

    fn caller() -> Arc<dyn ContractCaller> {
        Arc::new(FakeCaller {
            fail_send_with: None,
        })
    }

    #[test]
    fn abi_extracts_event_and_function_names() {
        let abi = ContractAbi::from_json(&erc20_like_abi()).unwrap();
        assert_eq!(abi.event_names().to_vec(), vec!["Transfer", "Approval"]);
        assert_eq!(abi.function_names().to_vec(), vec!["transfer", "balanceOf"]);
        assert!(abi.has_event("Transfer"));
        assert!(!abi.has_event("transfer"));
    }

    #[test]
    fn abi_rejects_non_array_json() {
        let result = ContractAbi::from_json(&json!({ "not": "an abi" }));
        assert!(matches!(result, Err(ContractError::InvalidAbi(_))));
    }

    #[test]
    fn event_validation_uses_abi_when_present() {
        let contract = Contract::with_abi("TABC", &erc20_like_abi(), caller()).unwrap();
        assert!(contract.validate_event("Transfer").is_ok());
        assert!(matches!(
            contract.validate_event("Burn"),
            Err(ContractError::UnknownEvent(_))
        ));
        // Wildcard always passes.
        assert!(contract.validate_event(crate::events::WILDCARD_EVENT).is_ok());
    }

    #[test]
    fn event_names_pass_through_without_abi() {
        let contract = Contract::new("TABC", caller());
        assert!(contract.validate_event("AnythingGoes").is_ok());
    }

    #[tokio::test]
    async fn call_delegates_to_the_caller() {
        let contract = Contract::with_abi("TABC", &erc20_like_abi(), caller()).unwrap();
        let result = contract.call("balanceOf", vec![json!("TXYZ")]).await.unwrap();
        assert_eq!(result["method"], "balanceOf");
    }

    #[tokio::test]
    async fn call_rejects_unknown_functions() {
        let contract = Contract::with_abi("TABC", &erc20_like_abi(), caller()).unwrap();
        let result = contract.call("mint", vec![]).await;
        assert!(matches!(result, Err(ContractError::UnknownFunction(_))));
    }

    #[tokio::test]
    async fn send_maps_reverts() {
        let caller = Arc::new(FakeCaller {
            fail_send_with: Some("REVERT opcode executed".to_string()),
        });
        let contract = Contract::new("TABC", caller);

        let result = contract.send("transfer", vec![]).await;
        assert!(matches!(result, Err(ContractError::Reverted(_))));
    }

    #[tokio::test]
    async fn send_passes_other_failures_through() {
        let caller = Arc::new(FakeCaller {
            fail_send_with: Some("connection refused".to_string()),
        });
        let contract = Contract::new("TABC", caller);

        let result = contract.send("transfer", vec![]).await;
        assert!(matches!(result, Err(ContractError::CallFailed(_))));
    }

    #[tokio::test]
    async fn send_returns_the_transaction_id() {
        let contract = Contract::with_abi("TABC", &erc20_like_abi(), caller()).unwrap();
        let tx = contract.send("transfer", vec![json!("TXYZ"), json!(100)]).await.unwrap();
        assert_eq!(tx, "txid-1");
    }
}
