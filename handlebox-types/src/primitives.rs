use crate::constants::{ACCOUNT_ADDRESS_CONTEXT, APP_ADDRESS_CONTEXT};

/// 32-byte BLAKE3 hash.
pub type Hash = [u8; 32];

/// 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// 20-byte account or application address.
pub type Address = [u8; 20];

/// Identifier assigned to an application at creation. Never reused.
pub type AppId = u64;

/// Amount of funds in microunits.
pub type Amount = u64;

/// Identifier shared by every transaction in one atomic group.
pub type GroupId = Hash;

/// Ledger round (block height) a transaction was included in.
pub type Round = u64;

/// Compute a domain-separated BLAKE3 hash.
fn hash_with_context(context: &str, data: &[u8]) -> Hash {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Derive an account address from an Ed25519 public key.
///
/// Address = BLAKE3_derive_key(account context, pubkey)[0..20].
pub fn address_from_pubkey(pubkey: &PublicKey) -> Address {
    let hash = hash_with_context(ACCOUNT_ADDRESS_CONTEXT, pubkey);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[..20]);
    address
}

/// Derive an application's own ledger address from its id.
///
/// Funds deposited to the application are paid to this address. The
/// derivation context is distinct from the account context so an
/// application address can never collide with a key-derived one.
pub fn app_address(app_id: AppId) -> Address {
    let hash = hash_with_context(APP_ADDRESS_CONTEXT, &app_id.to_le_bytes());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[..20]);
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_address_deterministic() {
        let pubkey = [7u8; 32];
        assert_eq!(address_from_pubkey(&pubkey), address_from_pubkey(&pubkey));
    }

    #[test]
    fn test_different_pubkeys_different_addresses() {
        assert_ne!(address_from_pubkey(&[1u8; 32]), address_from_pubkey(&[2u8; 32]));
    }

    #[test]
    fn test_app_address_deterministic() {
        assert_eq!(app_address(42), app_address(42));
        assert_ne!(app_address(42), app_address(43));
    }

    #[test]
    fn test_app_and_account_domains_separated() {
        // An app id hashed as account bytes must not produce the app address.
        let id: AppId = 5;
        let mut padded = [0u8; 32];
        padded[..8].copy_from_slice(&id.to_le_bytes());
        assert_ne!(app_address(id), address_from_pubkey(&padded));
    }
}
