//! Transaction model validated by the approval logic.
//!
//! The ledger presents every transaction as one arm of the closed
//! [`Transaction`] union; there is no untagged fallthrough anywhere in the
//! dispatch paths that consume these types.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::GROUP_ID_CONTEXT;
use crate::primitives::{Address, Amount, AppId, GroupId};

/// Caller-declared intent of an application call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum OnCompletion {
    /// Plain call: run the application's normal operation.
    NoOp,
    /// Caller opts in to the application.
    OptIn,
    /// Caller closes out its participation.
    CloseOut,
    /// Caller clears its local state; handled by the clear-state program.
    ClearState,
    /// Replace the application's programs.
    UpdateApplication,
    /// Tear the application down.
    DeleteApplication,
}

/// A plain funds transfer between two addresses.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Payment {
    pub sender: Address,
    pub receiver: Address,
    pub amount: Amount,
}

/// A transfer of a non-native asset. Never a valid deposit companion.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AssetTransfer {
    pub sender: Address,
    pub receiver: Address,
    pub asset: u64,
    pub amount: Amount,
}

/// A call into a deployed application.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ApplicationCall {
    pub sender: Address,
    /// Target application, or [`CREATION_APP_ID`](crate::constants::CREATION_APP_ID)
    /// for a creation call.
    pub app_id: AppId,
    pub on_completion: OnCompletion,
    /// Application arguments: method selector first, operands after.
    pub args: Vec<Vec<u8>>,
    /// Box names this call declares access to. Writes to undeclared boxes
    /// fail at the ledger.
    pub boxes: Vec<Vec<u8>>,
}

/// One transaction, tagged by type.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum Transaction {
    Payment(Payment),
    AssetTransfer(AssetTransfer),
    ApplicationCall(ApplicationCall),
}

impl Transaction {
    /// The address that submitted this transaction.
    pub fn sender(&self) -> Address {
        match self {
            Transaction::Payment(p) => p.sender,
            Transaction::AssetTransfer(t) => t.sender,
            Transaction::ApplicationCall(c) => c.sender,
        }
    }

    /// The type tag of this transaction.
    pub fn kind(&self) -> TxnKind {
        match self {
            Transaction::Payment(_) => TxnKind::Payment,
            Transaction::AssetTransfer(_) => TxnKind::AssetTransfer,
            Transaction::ApplicationCall(_) => TxnKind::ApplicationCall,
        }
    }
}

/// Transaction type tag, used in diagnostics and rejection messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnKind {
    Payment,
    AssetTransfer,
    ApplicationCall,
}

impl std::fmt::Display for TxnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TxnKind::Payment => "payment",
            TxnKind::AssetTransfer => "asset transfer",
            TxnKind::ApplicationCall => "application call",
        };
        f.write_str(name)
    }
}

/// Compute the id shared by every transaction in an atomic group.
///
/// The id is a domain-separated BLAKE3 hash over the ordered borsh
/// encoding of the group's transactions, so any reordering or substitution
/// yields a different group.
pub fn compute_group_id(txns: &[Transaction]) -> Result<GroupId, borsh::io::Error> {
    let mut hasher = blake3::Hasher::new_derive_key(GROUP_ID_CONTEXT);
    for txn in txns {
        let encoded = borsh::to_vec(txn)?;
        hasher.update(&(encoded.len() as u64).to_le_bytes());
        hasher.update(&encoded);
    }
    Ok(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: Amount) -> Transaction {
        Transaction::Payment(Payment {
            sender: [1u8; 20],
            receiver: [2u8; 20],
            amount,
        })
    }

    fn call() -> Transaction {
        Transaction::ApplicationCall(ApplicationCall {
            sender: [1u8; 20],
            app_id: 7,
            on_completion: OnCompletion::NoOp,
            args: vec![b"deposit".to_vec(), b"@alice".to_vec()],
            boxes: vec![b"github".to_vec()],
        })
    }

    #[test]
    fn test_group_id_deterministic() {
        let group = vec![payment(1000), call()];
        let a = compute_group_id(&group).unwrap();
        let b = compute_group_id(&group).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_group_id_order_sensitive() {
        let forward = compute_group_id(&[payment(1000), call()]).unwrap();
        let reversed = compute_group_id(&[call(), payment(1000)]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_group_id_changes_with_contents() {
        let a = compute_group_id(&[payment(1000), call()]).unwrap();
        let b = compute_group_id(&[payment(1001), call()]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sender_and_kind() {
        let txn = payment(5);
        assert_eq!(txn.sender(), [1u8; 20]);
        assert_eq!(txn.kind(), TxnKind::Payment);
        assert_eq!(txn.kind().to_string(), "payment");
    }

    #[test]
    fn test_transaction_borsh_roundtrip() {
        let txn = call();
        let bytes = borsh::to_vec(&txn).unwrap();
        let decoded = Transaction::try_from_slice(&bytes).unwrap();
        assert_eq!(txn, decoded);
    }
}
