//! Ninja2 cipher subsystem.
//!
//! # Data Flow
//! ```text
//! plaintext bytes
//!     → ninja2.rs (per-byte salt + repeating key)
//!     → base30.rs (two fixed-width digits per number)
//!     → ciphertext (4 chars per input byte)
//! ```
//!
//! # Design Decisions
//! - Obfuscation only: the key is a literal shared with every client
//! - Encode is randomized, decode is deterministic
//! - The salt range and alphabet are fixed by the legacy client

pub mod base30;
pub mod ninja2;

pub use ninja2::{CipherError, Ninja2Cipher, DEFAULT_KEY};
