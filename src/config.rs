//! Protocol-wide constants.

/// Number of trailing blinder terms reserved in the grand-product witness
/// vector.
pub const N_BLINDERS: usize = 4;

/// A validated instance size for the shuffle argument: the number of
/// ciphertexts being shuffled (`ell`) together with the padded vector
/// length `n = ell + N_BLINDERS`, checked up front to be a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleConfig {
    ell: usize,
    n: usize,
}

impl ShuffleConfig {
    /// Builds a config for a shuffle of `ell` ciphertexts.
    ///
    /// Fails if `ell + N_BLINDERS` is not a power of two, since every
    /// sub-argument (IPA, grand-product, multi-exp) folds its vectors in
    /// half each round and requires a power-of-two length.
    pub fn new(ell: usize) -> Result<Self, crate::error::ProofError> {
        let n = ell
            .checked_add(N_BLINDERS)
            .ok_or(crate::error::ProofError::InvalidInstanceSize { ell })?;
        if n == 0 || !n.is_power_of_two() {
            return Err(crate::error::ProofError::NotPowerOfTwo { len: n });
        }
        Ok(Self { ell, n })
    }

    pub fn ell(&self) -> usize {
        self.ell
    }

    pub fn n(&self) -> usize {
        self.n
    }
}
