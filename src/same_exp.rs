//! Same-exponent argument: a sigma protocol proving `T = r·R + r_t·G_t`,
//! `U = r·S + r_u·G_u` for a shared `r`.

use ark_ec::CurveGroup;
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::UniformRand;

use crate::error::{ProofError, ProofResult};
use crate::transcript::Transcript;

const LOG_TARGET: &str = "bayer_groth_shuffle::same_exp";

#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct SameExponentProof<C: CurveGroup> {
    pub b_t: C::Affine,
    pub b_u: C::Affine,
    pub z_r: C::ScalarField,
    pub z_t: C::ScalarField,
    pub z_u: C::ScalarField,
}

/// Proves `T = r·R + r_t·G_t`, `U = r·S + r_u·G_u` for the same `r`.
///
/// `B_t`/`B_u` are absorbed here as *points*, not decimal-encoded scalars.
/// Absorbing them as scalars would conflate the scalar and point encodings.
#[tracing::instrument(target = LOG_TARGET, skip_all)]
#[allow(clippy::too_many_arguments)]
pub fn prove<C: CurveGroup>(
    transcript: &mut Transcript,
    g_t: C::Affine,
    g_u: C::Affine,
    r_comm: C,
    s_comm: C,
    t_comm: C,
    u_comm: C,
    r: C::ScalarField,
    r_t: C::ScalarField,
    r_u: C::ScalarField,
    rng: &mut (impl RngCore + ?Sized),
) -> SameExponentProof<C> {
    let bl_r = C::ScalarField::rand(rng);
    let bl_t = C::ScalarField::rand(rng);
    let bl_u = C::ScalarField::rand(rng);

    let b_t: C = r_comm * bl_r + C::from(g_t) * bl_t;
    let b_u: C = s_comm * bl_r + C::from(g_u) * bl_u;

    transcript.absorb_points(&[r_comm, s_comm, t_comm, u_comm]);
    transcript.absorb_points(&[b_t, b_u]);
    let x: C::ScalarField = transcript.challenge_scalar();

    SameExponentProof {
        b_t: b_t.into_affine(),
        b_u: b_u.into_affine(),
        z_r: bl_r + r * x,
        z_t: bl_t + r_t * x,
        z_u: bl_u + r_u * x,
    }
}

/// Verifies a [`SameExponentProof`].
#[tracing::instrument(target = LOG_TARGET, skip_all)]
pub fn verify<C: CurveGroup>(
    transcript: &mut Transcript,
    g_t: C::Affine,
    g_u: C::Affine,
    r_comm: C,
    s_comm: C,
    t_comm: C,
    u_comm: C,
    proof: &SameExponentProof<C>,
) -> ProofResult<()> {
    transcript.absorb_points(&[r_comm, s_comm, t_comm, u_comm]);
    transcript.absorb_points(&[C::from(proof.b_t), C::from(proof.b_u)]);
    let x: C::ScalarField = transcript.challenge_scalar();

    let lhs_1 = C::from(proof.b_t) + t_comm * x - r_comm * proof.z_r - C::from(g_t) * proof.z_t;
    let lhs_2 = C::from(proof.b_u) + u_comm * x - s_comm * proof.z_r - C::from(g_u) * proof.z_u;

    if lhs_1 == C::zero() && lhs_2 == C::zero() {
        Ok(())
    } else {
        Err(ProofError::SameExpVerificationFailed)
    }
}
