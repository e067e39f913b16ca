use thiserror::Error;

use handlebox_types::primitives::Amount;

/// Errors surfaced to the operator by the deployment tool.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("program artifact error: {0}")]
    Artifact(#[from] handlebox_app::error::ProgramError),

    #[error("invalid mnemonic phrase")]
    InvalidMnemonic,

    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("node rejected the submission: {reason}")]
    NodeRejected { reason: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = DeployError::Config {
            reason: "missing field".to_string(),
        };
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DeployError = io_err.into();
        assert!(matches!(err, DeployError::Io(_)));
    }

    #[test]
    fn test_insufficient_balance_display() {
        let err = DeployError::InsufficientBalance {
            available: 10,
            required: 1_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("1000000"));
    }
}
