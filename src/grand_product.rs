//! Grand-product argument: given a commitment `A` to a length-`n` vector
//! `a` (with `n = ell + N_BLINDERS`), prove `∏_{i<ell} a_i = π`. Reduces to
//! a single [`crate::ipa`] call via a running-product witness and a
//! linearized basis change.

use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::UniformRand;

use crate::commit::msm;
use crate::error::{ProofError, ProofResult};
use crate::field_ops::{inner_product, powers};
use crate::ipa::{self, IpaProof};
use crate::transcript::Transcript;

const LOG_TARGET: &str = "bayer_groth_shuffle::grand_product";

#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct GrandProductProof<C: CurveGroup> {
    pub b: C::Affine,
    pub bl: C::ScalarField,
    pub ipa_proof: IpaProof<C>,
}

/// Builds the folded basis `H` used by both prover and verifier: `H[i-1] =
/// x^{-i}·G[i]` for `i = 1..ell-1`, `H[ell-1] = x^{-ell}·G[0]` (the wrap),
/// then every blinder slot shares the single exponent `x^{-(ell+1)}`;
/// blinder slots do NOT get an increasing exponent.
fn folded_basis<C: CurveGroup>(
    g: &[C::Affine],
    ell: usize,
    x_inv: C::ScalarField,
) -> Vec<C::Affine> {
    let n = g.len();
    // pow[k] = x_inv^k for k = 0..=ell+1.
    let pow = powers(x_inv, ell + 2);
    let mut h = Vec::with_capacity(n);
    for (i, gi) in g[1..ell].iter().enumerate() {
        h.push((C::from(*gi) * pow[i + 1]).into_affine());
    }
    h.push((C::from(g[0]) * pow[ell]).into_affine());

    for gi in &g[ell..] {
        h.push((C::from(*gi) * pow[ell + 1]).into_affine());
    }
    h
}

/// Builds `C = A - x^{-1}·Σ_{i<ell} G_i`.
fn folded_c_point<C: CurveGroup>(g: &[C::Affine], ell: usize, a: C, x_inv: C::ScalarField) -> C {
    let sum_g: C = msm::<C>(&g[..ell], &vec![C::ScalarField::from(1u64); ell]);
    a - sum_g * x_inv
}

/// Proves that the non-blinder prefix of `a` (length `ell = n -
/// N_BLINDERS`) multiplies to `gprod_result`, where `A = Σ a_i·G_i`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(n = g.len()))]
pub fn prove<C: CurveGroup>(
    transcript: &mut Transcript,
    g: &[C::Affine],
    u: C::Affine,
    a: C,
    gprod_result: C::ScalarField,
    witness_a: &[C::ScalarField],
    n_blinders: usize,
    rng: &mut (impl RngCore + ?Sized),
) -> ProofResult<GrandProductProof<C>> {
    let n = g.len();
    if witness_a.len() != n || n < n_blinders {
        return Err(ProofError::LengthMismatch {
            left: g.len(),
            right: witness_a.len(),
        });
    }
    if !n.is_power_of_two() {
        return Err(ProofError::NotPowerOfTwo { len: n });
    }
    let ell = n - n_blinders;

    // Step 1: running-product witness b, padded with fresh blinders.
    let mut b = Vec::with_capacity(n);
    let mut running = C::ScalarField::from(1u64);
    b.push(running);
    for a_i in &witness_a[1..ell] {
        running *= a_i;
        b.push(running);
    }
    for _ in 0..n_blinders {
        b.push(C::ScalarField::rand(rng));
    }

    let b_comm: C = msm::<C>(g, &b);
    let bl = inner_product(&witness_a[ell..], &b[ell..]);

    transcript.absorb_points(&[a, b_comm]);
    transcript.absorb_scalar(&bl);
    let x: C::ScalarField = transcript.challenge_scalar();
    let x_inv = crate::field_ops::inv(x)?;

    // Step 2: linearize into a single inner-product relation.
    let c_point = folded_c_point::<C>(g, ell, a, x_inv);

    // pow[k] = x^k for k = 0..=ell+1.
    let pow = powers(x, ell + 2);
    let mut c_vec = Vec::with_capacity(n);
    for (i, a_i) in witness_a[1..ell].iter().enumerate() {
        c_vec.push(*a_i * pow[i + 1] - pow[i]);
    }
    c_vec.push(witness_a[0] * pow[ell] - pow[ell - 1]);
    let x_pow_ell_plus_1 = pow[ell + 1];
    for a_i in &witness_a[ell..] {
        c_vec.push(*a_i * x_pow_ell_plus_1);
    }

    let h_basis = folded_basis::<C>(g, ell, x_inv);

    let x_pow_ell = x_pow_ell_plus_1 * x_inv;
    let inner_prod = bl * x_pow_ell_plus_1 + gprod_result * x_pow_ell - C::ScalarField::from(1u64);

    let ipa_proof = ipa::prove::<C>(
        transcript,
        g,
        &h_basis,
        u,
        b_comm,
        c_point,
        inner_prod,
        b,
        c_vec,
        rng,
    )?;

    Ok(GrandProductProof {
        b: b_comm.into_affine(),
        bl,
        ipa_proof,
    })
}

/// Verifies a [`GrandProductProof`]: `A` commits a vector whose first
/// `ell = n - n_blinders` entries multiply to `gprod_result`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(n = g.len()))]
pub fn verify<C: CurveGroup>(
    transcript: &mut Transcript,
    g: &[C::Affine],
    u: C::Affine,
    a: C,
    gprod_result: C::ScalarField,
    n_blinders: usize,
    proof: &GrandProductProof<C>,
) -> ProofResult<()> {
    let n = g.len();
    if n < n_blinders {
        return Err(ProofError::InvalidInstanceSize { ell: n });
    }
    if !n.is_power_of_two() {
        return Err(ProofError::NotPowerOfTwo { len: n });
    }
    let ell = n - n_blinders;

    transcript.absorb_points(&[a, C::from(proof.b)]);
    transcript.absorb_scalar(&proof.bl);
    let x: C::ScalarField = transcript.challenge_scalar();
    let x_inv = crate::field_ops::inv(x)?;

    let c_point = folded_c_point::<C>(g, ell, a, x_inv);
    let h_basis = folded_basis::<C>(g, ell, x_inv);

    let x_pow_ell_plus_1 = powers(x, ell + 2)[ell + 1];
    let x_pow_ell = x_pow_ell_plus_1 * x_inv;
    let inner_prod =
        proof.bl * x_pow_ell_plus_1 + gprod_result * x_pow_ell - C::ScalarField::from(1u64);

    ipa::verify::<C>(
        transcript,
        g,
        &h_basis,
        u,
        C::from(proof.b),
        c_point,
        inner_prod,
        &proof.ipa_proof,
    )
    .map_err(|_| ProofError::GrandProductVerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Projective};
    use ark_std::test_rng;

    fn setup(n: usize) -> (Vec<<G1Projective as CurveGroup>::Affine>, <G1Projective as CurveGroup>::Affine) {
        let mut rng = test_rng();
        let g = (0..n).map(|_| G1Projective::rand(&mut rng).into_affine()).collect();
        let u = G1Projective::rand(&mut rng).into_affine();
        (g, u)
    }

    #[test]
    fn test_gprod_correctness() {
        let mut rng = test_rng();
        let n_blinders = 4;
        let ell = 12;
        let n = ell + n_blinders;
        let (g, u) = setup(n);

        let mut witness: Vec<Fr> = (0..ell).map(|_| Fr::rand(&mut rng)).collect();
        let gprod_result: Fr = witness.iter().product();
        witness.extend((0..n_blinders).map(|_| Fr::rand(&mut rng)));

        let a_comm = msm::<G1Projective>(&g, &witness);

        let mut pt = Transcript::new(b"test-gprod");
        let proof = prove::<G1Projective>(
            &mut pt, &g, u, a_comm, gprod_result, &witness, n_blinders, &mut rng,
        )
        .unwrap();

        let mut vt = Transcript::new(b"test-gprod");
        assert!(verify::<G1Projective>(&mut vt, &g, u, a_comm, gprod_result, n_blinders, &proof).is_ok());
    }

    #[test]
    fn test_gprod_wrong_product() {
        let mut rng = test_rng();
        let n_blinders = 4;
        let ell = 12;
        let n = ell + n_blinders;
        let (g, u) = setup(n);

        let mut witness: Vec<Fr> = (0..ell).map(|_| Fr::rand(&mut rng)).collect();
        let gprod_result: Fr = witness.iter().product();
        witness.extend((0..n_blinders).map(|_| Fr::rand(&mut rng)));
        let a_comm = msm::<G1Projective>(&g, &witness);

        let mut pt = Transcript::new(b"test-gprod");
        let proof = prove::<G1Projective>(
            &mut pt, &g, u, a_comm, gprod_result, &witness, n_blinders, &mut rng,
        )
        .unwrap();

        let mut vt = Transcript::new(b"test-gprod");
        let wrong_result = gprod_result + Fr::from(1u64);
        assert!(verify::<G1Projective>(&mut vt, &g, u, a_comm, wrong_result, n_blinders, &proof).is_err());
    }
}
