use thiserror::Error;

use handlebox_types::primitives::{Amount, AppId};
use handlebox_types::transaction::{OnCompletion, TxnKind};

/// Reasons the approval program rejects a call.
///
/// Every rejection is terminal for the call: no state is written, no log
/// line is emitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("no handler for completion action {action:?}")]
    UnhandledAction { action: OnCompletion },

    #[error("deployed program is immutable, updates are rejected")]
    UpdateForbidden,

    #[error("application cannot be deleted once created")]
    DeletionForbidden,

    #[error("call carries no method selector")]
    MissingSelector,

    #[error("unknown method selector: {selector}")]
    UnknownSelector { selector: String },

    #[error("deposit requires a funding transaction grouped ahead of the call")]
    MissingCompanion,

    #[error("companion transaction must be a payment, got {kind}")]
    CompanionNotPayment { kind: TxnKind },

    #[error("payment receiver {receiver} is not the application address {expected}")]
    WrongReceiver { receiver: String, expected: String },

    #[error("deposit call is missing the handle argument")]
    MissingHandle,
}

/// Rejection categories, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    /// The call matched no known handler.
    Routing,
    /// A deposit precondition failed.
    Precondition,
    /// The call tried to update or delete the deployed application.
    Immutability,
}

impl ApprovalError {
    /// Classify this rejection.
    pub fn kind(&self) -> RejectKind {
        match self {
            ApprovalError::UnhandledAction { .. }
            | ApprovalError::MissingSelector
            | ApprovalError::UnknownSelector { .. } => RejectKind::Routing,
            ApprovalError::UpdateForbidden | ApprovalError::DeletionForbidden => {
                RejectKind::Immutability
            }
            ApprovalError::MissingCompanion
            | ApprovalError::CompanionNotPayment { .. }
            | ApprovalError::WrongReceiver { .. }
            | ApprovalError::MissingHandle => RejectKind::Precondition,
        }
    }
}

/// Errors from parsing or rendering a program artifact.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("malformed artifact header: {line}")]
    MalformedHeader { line: String },

    #[error("artifact payload is not valid: {reason}")]
    InvalidPayload { reason: String },

    #[error("artifact header announces {header}, payload decodes as {payload}")]
    HeaderMismatch { header: String, payload: String },
}

/// Errors surfaced by the in-process ledger environment.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown application id {app_id}")]
    UnknownApplication { app_id: AppId },

    #[error("insufficient balance for {address}: have {available}, need {required}")]
    InsufficientBalance {
        address: String,
        available: Amount,
        required: Amount,
    },

    #[error("transaction group is empty")]
    EmptyGroup,

    #[error("transaction group has {len} transactions, limit is {max}")]
    GroupTooLarge { len: usize, max: usize },

    #[error("call rejected: {0}")]
    Rejected(#[from] ApprovalError),

    #[error("box {name} was not declared by the call")]
    UndeclaredBox { name: String },

    #[error("box {name} has never been written")]
    BoxNotFound { name: String },

    #[error("global writes exceed the schema declared at creation")]
    SchemaExceeded,

    #[error("balance overflow crediting {address}")]
    BalanceOverflow { address: String },

    #[error("serialization failed: {reason}")]
    Serialization { reason: String },
}
