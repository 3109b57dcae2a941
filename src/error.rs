//! Error taxonomy shared by every sub-argument.
//!
//! Each variant maps to one of three coarse categories (`invalid_proof`,
//! `invalid_input`, `internal`) via [`ProofError::kind`], so callers that
//! only care about the coarse taxonomy don't need to match on every variant.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidProof,
    InvalidInput,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("vectors have mismatched lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("vector length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    #[error("instance size ell = {ell} overflows when padded with blinders")]
    InvalidInstanceSize { ell: usize },

    #[error("CRS does not provide enough generators for the requested size")]
    CrsTooSmall,

    #[error("inner-product argument failed to verify")]
    IpaVerificationFailed,

    #[error("grand-product argument failed to verify")]
    GrandProductVerificationFailed,

    #[error("multi-exponentiation argument failed to verify")]
    MultiExpVerificationFailed,

    #[error("same-exponent argument failed to verify")]
    SameExpVerificationFailed,

    #[error("shuffle argument failed to verify")]
    ShuffleVerificationFailed,

    #[error("permutation is not a bijection on {0} elements")]
    InvalidPermutation(usize),

    #[error("attempted to invert zero")]
    ZeroInverse,
}

impl ProofError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProofError::IpaVerificationFailed
            | ProofError::GrandProductVerificationFailed
            | ProofError::MultiExpVerificationFailed
            | ProofError::SameExpVerificationFailed
            | ProofError::ShuffleVerificationFailed => ErrorKind::InvalidProof,

            ProofError::LengthMismatch { .. }
            | ProofError::NotPowerOfTwo { .. }
            | ProofError::InvalidInstanceSize { .. }
            | ProofError::InvalidPermutation(_) => ErrorKind::InvalidInput,

            ProofError::CrsTooSmall | ProofError::ZeroInverse => ErrorKind::Internal,
        }
    }
}

pub type ProofResult<T> = Result<T, ProofError>;
