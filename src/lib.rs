//! A non-interactive zero-knowledge shuffle argument in the style of
//! Bayer–Groth, built over a pairing-friendly prime-order group.
//!
//! The top-level entry points are [`shuffle::prove`] / [`shuffle::verify`];
//! the four subarguments (`ipa`, `grand_product`, `multi_exp`, `same_exp`)
//! are exposed directly for standalone use and testing.

pub mod commit;
pub mod config;
pub mod crs;
pub mod error;
pub mod field_ops;
pub mod grand_product;
pub mod ipa;
pub mod multi_exp;
pub mod same_exp;
pub mod shuffle;
pub mod transcript;

pub use crs::ShuffleCRS;
pub use error::{ErrorKind, ProofError, ProofResult};
pub use shuffle::{prove, verify, ShuffleProof};
