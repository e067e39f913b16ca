use crate::primitives::{Amount, AppId};

/// Application id carried by a creation call. The real id is assigned by
/// the ledger when the call is accepted.
pub const CREATION_APP_ID: AppId = 0;

/// Method selector for the deposit operation (first application argument).
pub const DEPOSIT_SELECTOR: &[u8] = b"deposit";

/// Name of the box slot holding the stored GitHub handle.
pub const GITHUB_BOX: &[u8] = b"github";

/// Global state key holding the creator's address.
pub const OWNER_GLOBAL: &str = "owner";

/// Prefix of the log line emitted by an accepted deposit.
pub const HANDLE_LOG_PREFIX: &str = "GitHub handle stored: ";

/// Default funding amount for a deposit call, in microunits.
pub const DEFAULT_DEPOSIT_AMOUNT: Amount = 1_000_000;

/// BLAKE3 derive-key context for account addresses.
pub const ACCOUNT_ADDRESS_CONTEXT: &str = "handlebox v1 account address";

/// BLAKE3 derive-key context for application addresses.
pub const APP_ADDRESS_CONTEXT: &str = "handlebox v1 application address";

/// BLAKE3 derive-key context for atomic group ids.
pub const GROUP_ID_CONTEXT: &str = "handlebox v1 transaction group";
