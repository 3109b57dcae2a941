//! Top-level Bayer–Groth shuffle argument: given input
//! vectors `R, S` and output vectors `T, U`, proves there exist a
//! permutation `perm` and scalar `r` with `T[i] = r·R[perm[i]]`, `U[i] =
//! r·S[perm[i]]`, without revealing `perm` or `r`.

use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::UniformRand;

use crate::commit::msm;
use crate::config::N_BLINDERS;
use crate::crs::ShuffleCRS;
use crate::error::{ProofError, ProofResult};
use crate::field_ops::{apply_permutation, is_permutation};
use crate::grand_product::{self, GrandProductProof};
use crate::multi_exp::{self, MultiExpProof};
use crate::same_exp::{self, SameExponentProof};
use crate::transcript::Transcript;

const LOG_TARGET: &str = "bayer_groth_shuffle::shuffle";

/// Domain separator prefixed to every shuffle transcript.
const DOMAIN: &[u8] = b"bayer-groth-shuffle-v1";

#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct ShuffleProof<C: CurveGroup> {
    pub m: C::Affine,
    pub a: C::Affine,
    pub t: C::Affine,
    pub u: C::Affine,
    pub gprod_proof: GrandProductProof<C>,
    pub sameexp_proof: SameExponentProof<C>,
    pub multiexp_proof: MultiExpProof<C>,
}

fn check_inputs<C: CurveGroup>(
    crs: &ShuffleCRS<C>,
    r_vec: &[C::Affine],
    s_vec: &[C::Affine],
    t_vec: &[C::Affine],
    u_vec: &[C::Affine],
) -> ProofResult<usize> {
    let ell = r_vec.len();
    if s_vec.len() != ell || t_vec.len() != ell || u_vec.len() != ell {
        return Err(ProofError::LengthMismatch {
            left: ell,
            right: s_vec.len().max(t_vec.len()).max(u_vec.len()),
        });
    }
    let cfg = crate::config::ShuffleConfig::new(ell)?;
    crs.require_len(cfg.n())?;
    Ok(ell)
}

/// Proves that `T_vec`/`U_vec` are `R_vec`/`S_vec` permuted by `perm` and
/// scaled by `r`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(ell = r_vec.len()))]
#[allow(clippy::too_many_arguments)]
pub fn prove<C: CurveGroup>(
    crs: &ShuffleCRS<C>,
    r_vec: &[C::Affine],
    s_vec: &[C::Affine],
    t_vec: &[C::Affine],
    u_vec: &[C::Affine],
    perm: &[usize],
    r: C::ScalarField,
    rng: &mut (impl RngCore + ?Sized),
) -> ProofResult<ShuffleProof<C>> {
    let ell = check_inputs::<C>(crs, r_vec, s_vec, t_vec, u_vec)?;
    if perm.len() != ell || !is_permutation(perm) {
        return Err(ProofError::InvalidPermutation(ell));
    }
    let n = ell + N_BLINDERS;
    let g = &crs.g[..n];

    let mut transcript = Transcript::new(DOMAIN);

    // Step 1: commit to the permutation (extended with fresh blinders).
    let s_blinders: Vec<C::ScalarField> = (0..N_BLINDERS).map(|_| C::ScalarField::rand(rng)).collect();
    let perm_ext: Vec<C::ScalarField> = perm
        .iter()
        .map(|&p| C::ScalarField::from(p as u64))
        .chain(s_blinders.iter().copied())
        .collect();
    let m_comm: C = msm::<C>(g, &perm_ext);

    let t_and_u: Vec<C> = t_vec
        .iter()
        .chain(u_vec.iter())
        .map(|p| C::from(*p))
        .chain(std::iter::once(m_comm))
        .collect();
    transcript.absorb_points(&t_and_u);
    let vec_a: Vec<C::ScalarField> = transcript.challenge_scalars(ell);
    tracing::debug!(target = LOG_TARGET, "Absorbed M, derived {} per-position challenges", ell);

    // Step 2: commit to the permuted challenge vector (extended with
    // fresh blinders).
    let a_blinders: Vec<C::ScalarField> = (0..N_BLINDERS).map(|_| C::ScalarField::rand(rng)).collect();
    let a_perm: Vec<C::ScalarField> = apply_permutation(&vec_a, perm)
        .into_iter()
        .chain(a_blinders.iter().copied())
        .collect();
    let a_comm: C = msm::<C>(g, &a_perm);

    transcript.absorb_point(&a_comm);
    let alpha: C::ScalarField = transcript.challenge_scalar();
    let beta: C::ScalarField = transcript.challenge_scalar();
    tracing::debug!(target = LOG_TARGET, "Derived permutation mixing challenges alpha, beta");

    // Step 3: grand product over the linearized polynomial factors.
    let factors: Vec<C::ScalarField> = a_perm
        .iter()
        .zip(perm_ext.iter())
        .map(|(a_i, m_i)| *a_i + *m_i * alpha + beta)
        .collect();
    let gprod_result: C::ScalarField = factors[..ell].iter().copied().product();

    let sum_g: C = msm::<C>(g, &vec![C::ScalarField::from(1u64); n]);
    let a1_comm: C = a_comm + C::from(m_comm) * alpha + sum_g * beta;

    let gprod_proof = grand_product::prove::<C>(
        &mut transcript,
        g,
        crs.u,
        a1_comm,
        gprod_result,
        &factors,
        N_BLINDERS,
        rng,
    )?;
    tracing::debug!(target = LOG_TARGET, "Grand-product subargument proved");

    // Step 4: same-exponent argument linking r across R/S and T/U.
    transcript.absorb_point(&a_comm);
    let mut gamma = Vec::with_capacity(N_BLINDERS);
    let mut delta = Vec::with_capacity(N_BLINDERS);
    for _ in 0..N_BLINDERS {
        gamma.push(transcript.challenge_scalar::<C::ScalarField>());
        delta.push(transcript.challenge_scalar::<C::ScalarField>());
    }

    let r_comm: C = msm::<C>(r_vec, &vec_a);
    let s_comm: C = msm::<C>(s_vec, &vec_a);
    let r_t = crate::field_ops::inner_product(&gamma, &a_blinders);
    let r_u = crate::field_ops::inner_product(&delta, &a_blinders);
    let t_comm: C = r_comm * r + C::from(crs.g_t) * r_t;
    let u_comm: C = s_comm * r + C::from(crs.g_u) * r_u;

    let sameexp_proof = same_exp::prove::<C>(
        &mut transcript,
        crs.g_t,
        crs.g_u,
        r_comm,
        s_comm,
        t_comm,
        u_comm,
        r,
        r_t,
        r_u,
        rng,
    );
    tracing::debug!(target = LOG_TARGET, "Same-exponent subargument proved");

    // Step 5: multi-exponentiation over T/U extended with blinder columns.
    let t_ext: Vec<C::Affine> = t_vec
        .iter()
        .copied()
        .chain(gamma.iter().map(|g_i| (C::from(crs.g_t) * g_i).into_affine()))
        .collect();
    let u_ext: Vec<C::Affine> = u_vec
        .iter()
        .copied()
        .chain(delta.iter().map(|d_i| (C::from(crs.g_u) * d_i).into_affine()))
        .collect();

    let multiexp_proof = multi_exp::prove::<C>(
        &mut transcript,
        g,
        &t_ext,
        &u_ext,
        a_comm,
        t_comm,
        u_comm,
        a_perm,
        rng,
    )?;

    Ok(ShuffleProof {
        m: m_comm.into_affine(),
        a: a_comm.into_affine(),
        t: t_comm.into_affine(),
        u: u_comm.into_affine(),
        gprod_proof,
        sameexp_proof,
        multiexp_proof,
    })
}

/// Verifies a [`ShuffleProof`].
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(ell = r_vec.len()))]
pub fn verify<C: CurveGroup>(
    crs: &ShuffleCRS<C>,
    r_vec: &[C::Affine],
    s_vec: &[C::Affine],
    t_vec: &[C::Affine],
    u_vec: &[C::Affine],
    proof: &ShuffleProof<C>,
) -> ProofResult<()> {
    let ell = check_inputs::<C>(crs, r_vec, s_vec, t_vec, u_vec)?;
    let n = ell + N_BLINDERS;
    let g = &crs.g[..n];

    let mut transcript = Transcript::new(DOMAIN);

    let t_and_u: Vec<C> = t_vec
        .iter()
        .chain(u_vec.iter())
        .map(|p| C::from(*p))
        .chain(std::iter::once(C::from(proof.m)))
        .collect();
    transcript.absorb_points(&t_and_u);
    let vec_a: Vec<C::ScalarField> = transcript.challenge_scalars(ell);

    transcript.absorb_point(&C::from(proof.a));
    let alpha: C::ScalarField = transcript.challenge_scalar();
    let beta: C::ScalarField = transcript.challenge_scalar();

    // Permuting the roots does not change their product, so the verifier
    // reconstructs gprod_result from the unpermuted a/index pairs, matching
    // what the prover computed from the permuted ones.
    let gprod_result: C::ScalarField = vec_a
        .iter()
        .enumerate()
        .map(|(i, a_i)| *a_i + C::ScalarField::from(i as u64) * alpha + beta)
        .product();

    let sum_g: C = msm::<C>(g, &vec![C::ScalarField::from(1u64); n]);
    let a1_comm: C =
        C::from(proof.a) + C::from(proof.m) * alpha + sum_g * beta;

    grand_product::verify::<C>(
        &mut transcript,
        g,
        crs.u,
        a1_comm,
        gprod_result,
        N_BLINDERS,
        &proof.gprod_proof,
    )
    .map_err(|_| ProofError::ShuffleVerificationFailed)?;

    transcript.absorb_point(&C::from(proof.a));
    let mut gamma = Vec::with_capacity(N_BLINDERS);
    let mut delta = Vec::with_capacity(N_BLINDERS);
    for _ in 0..N_BLINDERS {
        gamma.push(transcript.challenge_scalar::<C::ScalarField>());
        delta.push(transcript.challenge_scalar::<C::ScalarField>());
    }

    let r_comm: C = msm::<C>(r_vec, &vec_a);
    let s_comm: C = msm::<C>(s_vec, &vec_a);

    same_exp::verify::<C>(
        &mut transcript,
        crs.g_t,
        crs.g_u,
        r_comm,
        s_comm,
        C::from(proof.t),
        C::from(proof.u),
        &proof.sameexp_proof,
    )
    .map_err(|_| ProofError::ShuffleVerificationFailed)?;

    let t_ext: Vec<C::Affine> = t_vec
        .iter()
        .copied()
        .chain(gamma.iter().map(|g_i| (C::from(crs.g_t) * g_i).into_affine()))
        .collect();
    let u_ext: Vec<C::Affine> = u_vec
        .iter()
        .copied()
        .chain(delta.iter().map(|d_i| (C::from(crs.g_u) * d_i).into_affine()))
        .collect();

    multi_exp::verify::<C>(
        &mut transcript,
        g,
        &t_ext,
        &u_ext,
        C::from(proof.a),
        C::from(proof.t),
        C::from(proof.u),
        &proof.multiexp_proof,
    )
    .map_err(|_| ProofError::ShuffleVerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Projective};
    use ark_std::test_rng;

    fn build_instance(
        ell: usize,
        perm: &[usize],
        r: Fr,
        rng: &mut impl RngCore,
    ) -> (
        ShuffleCRS<G1Projective>,
        Vec<<G1Projective as CurveGroup>::Affine>,
        Vec<<G1Projective as CurveGroup>::Affine>,
        Vec<<G1Projective as CurveGroup>::Affine>,
        Vec<<G1Projective as CurveGroup>::Affine>,
    ) {
        let n = ell + N_BLINDERS;
        let crs = ShuffleCRS::<G1Projective>::sample(n, rng).unwrap();
        let r_vec: Vec<_> = (0..ell).map(|_| G1Projective::rand(rng).into_affine()).collect();
        let s_vec: Vec<_> = (0..ell).map(|_| G1Projective::rand(rng).into_affine()).collect();

        let t_vec: Vec<_> = perm
            .iter()
            .map(|&p| (G1Projective::from(r_vec[p]) * r).into_affine())
            .collect();
        let u_vec: Vec<_> = perm
            .iter()
            .map(|&p| (G1Projective::from(s_vec[p]) * r).into_affine())
            .collect();

        (crs, r_vec, s_vec, t_vec, u_vec)
    }

    #[test]
    fn test_shuffle_identity() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(tracing_subscriber::fmt::TestWriter::default())
            .try_init();

        let mut rng = test_rng();
        let ell = 12;
        let perm: Vec<usize> = (0..ell).collect();
        let r = Fr::from(1u64);
        let (crs, r_vec, s_vec, t_vec, u_vec) = build_instance(ell, &perm, r, &mut rng);

        let proof =
            prove::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &perm, r, &mut rng).unwrap();
        assert!(verify::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &proof).is_ok());
    }

    #[test]
    fn test_shuffle_reverse() {
        let mut rng = test_rng();
        let ell = 12;
        let perm: Vec<usize> = (0..ell).rev().collect();
        let r = Fr::rand(&mut rng);
        let (crs, r_vec, s_vec, t_vec, u_vec) = build_instance(ell, &perm, r, &mut rng);

        let proof =
            prove::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &perm, r, &mut rng).unwrap();
        assert!(verify::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &proof).is_ok());
    }

    #[test]
    fn test_shuffle_random() {
        let mut rng = test_rng();
        let ell = 12;
        let mut perm: Vec<usize> = (0..ell).collect();
        // Deterministic pseudo-shuffle: reverse every other pair, a fixed
        // non-identity, non-reverse permutation.
        for chunk in perm.chunks_mut(2) {
            chunk.reverse();
        }
        let r = Fr::rand(&mut rng);
        let (crs, r_vec, s_vec, t_vec, u_vec) = build_instance(ell, &perm, r, &mut rng);

        let proof =
            prove::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &perm, r, &mut rng).unwrap();
        assert!(verify::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &proof).is_ok());
    }

    #[test]
    fn test_shuffle_tampered_output() {
        let mut rng = test_rng();
        let ell = 12;
        let perm: Vec<usize> = (0..ell).collect();
        let r = Fr::from(1u64);
        let (crs, r_vec, s_vec, mut t_vec, u_vec) = build_instance(ell, &perm, r, &mut rng);

        let proof =
            prove::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &perm, r, &mut rng).unwrap();

        t_vec[0] = (G1Projective::from(t_vec[0]) + G1Projective::from(crs.g_t)).into_affine();
        assert!(verify::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &proof).is_err());
    }

    #[test]
    fn test_shuffle_wrong_r() {
        let mut rng = test_rng();
        let ell = 12;
        let perm: Vec<usize> = (0..ell).collect();
        let r = Fr::rand(&mut rng);
        let (crs, r_vec, s_vec, t_vec, mut u_vec) = build_instance(ell, &perm, r, &mut rng);

        let wrong_r = r + Fr::from(1u64);
        u_vec = perm
            .iter()
            .map(|&p| (G1Projective::from(s_vec[p]) * wrong_r).into_affine())
            .collect();

        let proof =
            prove::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &perm, r, &mut rng).unwrap();
        assert!(verify::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &proof).is_err());
    }

    #[test]
    fn test_shuffle_invalid_permutation() {
        let mut rng = test_rng();
        let ell = 12;
        let mut perm: Vec<usize> = (0..ell).collect();
        perm[1] = perm[0]; // duplicate index: not a bijection
        let r = Fr::from(1u64);
        let (crs, r_vec, s_vec, t_vec, u_vec) = build_instance(ell, &perm, r, &mut rng);

        assert!(prove::<G1Projective>(&crs, &r_vec, &s_vec, &t_vec, &u_vec, &perm, r, &mut rng).is_err());
    }
}
