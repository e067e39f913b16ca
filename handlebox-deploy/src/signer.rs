//! Operator keys and transaction signing.

use bip39::Mnemonic;
use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::Signer as _;

use handlebox_types::primitives::{
    address_from_pubkey, Address, GroupId, PublicKey, Signature,
};
use handlebox_types::transaction::Transaction;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::prompt;

/// Wrapper around an Ed25519 keypair.
pub struct Keypair {
    inner: ed25519_dalek::SigningKey,
}

impl Keypair {
    /// Create a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Derive a keypair from a BIP-39 mnemonic phrase (empty passphrase).
    pub fn from_mnemonic(phrase: &str) -> Result<Self, DeployError> {
        let mnemonic =
            Mnemonic::parse_normalized(phrase.trim()).map_err(|_| DeployError::InvalidMnemonic)?;
        let seed = mnemonic.to_seed("");
        let mut key_seed = [0u8; 32];
        key_seed.copy_from_slice(&seed[..32]);
        Ok(Self::from_seed(&key_seed))
    }

    /// Get the public key bytes.
    pub fn public_key(&self) -> PublicKey {
        self.inner.verifying_key().to_bytes()
    }

    /// The ledger address derived from this keypair.
    pub fn address(&self) -> Address {
        address_from_pubkey(&self.public_key())
    }

    /// Sign a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.inner.sign(message).to_bytes()
    }
}

/// Generate a new 24-word BIP-39 mnemonic.
pub fn generate_mnemonic() -> Mnemonic {
    // 24 words = 256 bits of entropy = 32 bytes
    let mut entropy = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy);
    Mnemonic::from_entropy(&entropy).expect("32 bytes is valid entropy for 24 words")
}

/// A transaction bound to its group and signed by the sender.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct SignedTransaction {
    pub txn: Transaction,
    pub group_id: GroupId,
    pub pubkey: PublicKey,
    pub signature: Signature,
}

/// Sign a transaction for submission inside a group.
///
/// The signature covers the borsh encoding of the transaction followed by
/// the group id, binding the transaction to its group.
pub fn sign_transaction(
    keypair: &Keypair,
    txn: &Transaction,
    group_id: &GroupId,
) -> Result<SignedTransaction, DeployError> {
    let mut message =
        borsh::to_vec(txn).map_err(|e| DeployError::Serialization(e.to_string()))?;
    message.extend_from_slice(group_id);
    Ok(SignedTransaction {
        txn: txn.clone(),
        group_id: *group_id,
        pubkey: keypair.public_key(),
        signature: keypair.sign(&message),
    })
}

/// Hex-encode a signed transaction for the RPC wire.
pub fn encode_signed(txn: &SignedTransaction) -> Result<String, DeployError> {
    let bytes = borsh::to_vec(txn).map_err(|e| DeployError::Serialization(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Load the operator's keypair: from the mnemonic file named in config, or
/// by prompting for the phrase.
pub fn operator_keypair(config: &DeployConfig) -> Result<Keypair, DeployError> {
    let phrase = match &config.mnemonic_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => prompt::prompt_mnemonic()?,
    };
    Keypair::from_mnemonic(&phrase)
}
