//! Frenzy Transaction Envelope
//!
//! A signed call against the registry: the acting identity, any attached
//! native value, and borsh-encoded call data. The runtime applies envelopes
//! in submission order, one at a time.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

use frenzy_program::FrenzyInstruction;

/// A signed registry call
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, PartialEq, Eq)]
pub struct FrenzyTransaction {
    /// Acting identity
    pub sender: Pubkey,
    /// Native value attached to the call (the registry accepts none)
    pub value: u64,
    /// Borsh-encoded `FrenzyInstruction`
    pub call_data: Vec<u8>,
    /// Sender's signature over the transaction hash
    pub signature: [u8; 64],
}

impl FrenzyTransaction {
    /// Build and sign an operation envelope
    pub fn signed(keypair: &Keypair, instruction: &FrenzyInstruction) -> Self {
        let call_data =
            borsh::to_vec(instruction).expect("FrenzyInstruction serialization should not fail");
        Self::signed_raw(keypair, 0, call_data)
    }

    /// Build and sign an envelope with raw call data and attached value
    ///
    /// This is how a bare value transfer or an unrecognized call reaches the
    /// registry.
    pub fn signed_raw(keypair: &Keypair, value: u64, call_data: Vec<u8>) -> Self {
        let mut tx = Self {
            sender: keypair.pubkey(),
            value,
            call_data,
            signature: [0u8; 64],
        };
        let signature = keypair.sign_message(&tx.compute_hash());
        tx.signature.copy_from_slice(signature.as_ref());
        tx
    }

    /// Compute the hash of this transaction (for signing and identification)
    pub fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.sender.as_ref());
        hasher.update(&self.value.to_le_bytes());
        hasher.update(&self.call_data);
        *hasher.finalize().as_bytes()
    }

    /// Verify the sender's signature
    pub fn verify(&self) -> bool {
        let signature = Signature::from(self.signature);
        signature.verify(self.sender.as_ref(), &self.compute_hash())
    }

    /// Serialize for wire transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("FrenzyTransaction serialization should not fail")
    }

    /// Deserialize from the wire
    pub fn from_bytes(data: &[u8]) -> Result<Self, borsh::io::Error> {
        borsh::from_slice(data)
    }
}
