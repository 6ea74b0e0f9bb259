//! Cryptographic primitives for the stele ledger.
//!
//! - **Ed25519** for commit signing and canonical verification
//! - **SHA-256** (single and double) for record and chain hashing

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{sha256, sha256_multi, sha256d, sha256d_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
