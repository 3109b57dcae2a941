//! Common reference string consumed (never generated) by the protocol
//! proper. [`ShuffleCRS::sample`] below is a test/demo-grade constructor
//! only: it draws independent uniformly random generators rather than
//! performing a nothing-up-my-sleeve derivation, and says so.

use ark_ec::CurveGroup;
use ark_std::{rand::RngCore, UniformRand};

use crate::error::{ProofError, ProofResult};

/// `G[0..N-1]` plus the three distinguished generators `U`, `G_t`, `G_u`.
#[derive(Clone, Debug)]
pub struct ShuffleCRS<C: CurveGroup> {
    pub g: Vec<C::Affine>,
    pub u: C::Affine,
    pub g_t: C::Affine,
    pub g_u: C::Affine,
}

impl<C: CurveGroup> ShuffleCRS<C> {
    /// Draws `n` independent generators plus `U`, `G_t`, `G_u` uniformly at
    /// random. `n` must be a power of two (the padded shuffle size
    /// `ell + N_BLINDERS`).
    ///
    /// This is NOT a nothing-up-my-sleeve construction; it is adequate for
    /// tests and local experimentation but not for a CRS that must resist a
    /// trusted-setup-style trapdoor concern in production.
    pub fn sample(n: usize, rng: &mut (impl RngCore + ?Sized)) -> ProofResult<Self> {
        if n == 0 || !n.is_power_of_two() {
            return Err(ProofError::NotPowerOfTwo { len: n });
        }
        let g = (0..n)
            .map(|_| C::rand(rng).into())
            .collect::<Vec<_>>();
        Ok(Self {
            g,
            u: C::rand(rng).into(),
            g_t: C::rand(rng).into(),
            g_u: C::rand(rng).into(),
        })
    }

    pub fn n(&self) -> usize {
        self.g.len()
    }

    /// Checks the CRS has at least `n` generators, returning
    /// [`ProofError::CrsTooSmall`] otherwise.
    pub fn require_len(&self, n: usize) -> ProofResult<()> {
        if self.g.len() < n {
            return Err(ProofError::CrsTooSmall);
        }
        Ok(())
    }
}
