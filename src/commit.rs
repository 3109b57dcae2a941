//! Multi-scalar multiplication over the group `G`.

use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;

/// `Σ scalars[i] · bases[i]`.
///
/// Panics if the slices differ in length. Every caller in this crate
/// controls both vectors; a mismatch here is a programming error, not
/// caller-supplied malformed input (those are rejected earlier via
/// [`crate::error::ProofError::LengthMismatch`]).
#[tracing::instrument(target = "bayer_groth_shuffle::commit", skip_all, fields(n = scalars.len()))]
pub fn msm<C: CurveGroup>(bases: &[C::Affine], scalars: &[C::ScalarField]) -> C {
    assert_eq!(bases.len(), scalars.len(), "msm: length mismatch");
    let scalars: Vec<<C::ScalarField as PrimeField>::BigInt> =
        scalars.iter().map(|s| s.into_bigint()).collect();
    C::msm_bigint(bases, &scalars)
}

/// Pointwise-weighted combination of two generator vectors: `out[i] = G_l[i] + y * G_r[i]`.
///
/// This is the "fold the basis" step shared by IPA, grand-product and
/// multi-exp: each round halves a generator vector by combining the left
/// and right halves with the round challenge (or its inverse).
pub fn fold_bases<C: CurveGroup>(
    g_l: &[C::Affine],
    g_r: &[C::Affine],
    y: C::ScalarField,
) -> Vec<C::Affine> {
    assert_eq!(g_l.len(), g_r.len(), "fold_bases: length mismatch");
    let projective: Vec<C> = g_l
        .iter()
        .zip(g_r.iter())
        .map(|(l, r)| *l + *r * y)
        .collect();
    C::normalize_batch(&projective)
}
