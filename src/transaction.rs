//! Transaction status tracking
//!
//! Maps node receipts onto a coarse status a UI can render directly.
//! Polling cadence is left to the caller; [`track_transaction`] is a
//! single query.

use serde::{Deserialize, Serialize};

use crate::client::{ClientError, ExecutionResult, NodeClient, Result};

/// Coarse transaction status derived from a node receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Not yet executed (or not yet visible to the queried node)
    Pending,
    /// Executed successfully
    Confirmed,
    /// Execution failed
    Failed {
        /// Node-reported failure message
        error: String,
    },
}

/// Look up the current status of a transaction
///
/// A receipt the node does not know yet counts as pending rather than an
/// error: freshly broadcast transactions routinely race the query.
pub async fn track_transaction(
    client: &dyn NodeClient,
    transaction_id: &str,
) -> Result<TransactionStatus> {
    let receipt = match client.get_transaction_receipt(transaction_id).await {
        Ok(receipt) => receipt,
        Err(ClientError::NotFound(_)) => return Ok(TransactionStatus::Pending),
        Err(e) => return Err(e),
    };

    Ok(match receipt.execution {
        Some(ExecutionResult::Success) => TransactionStatus::Confirmed,
        Some(ExecutionResult::Failed { message }) => TransactionStatus::Failed { error: message },
        None => TransactionStatus::Pending,
    })
}
