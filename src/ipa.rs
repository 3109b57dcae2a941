//! Inner-product argument (IPA): prove `⟨b, c⟩ = z` for vectors committed as
//! `B = Σ b_i·G_i`, `C = Σ c_i·H_i`.
//!
//! The recursion is unrolled iteratively: `log2(n)` rounds, each halving
//! the witness and basis vectors, rather than implemented as actual
//! recursion, which would waste stack for no benefit.

use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{fmt, rand::RngCore, UniformRand};

use crate::commit::{fold_bases, msm};
use crate::error::{ProofError, ProofResult};
use crate::field_ops::{inner_product, inv, split_half};
use crate::transcript::Transcript;

const LOG_TARGET: &str = "bayer_groth_shuffle::ipa";

/// A complete transcript of an inner-product argument round trip.
#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct IpaProof<C: CurveGroup> {
    pub r: C::Affine,
    pub s: C::Affine,
    pub bl_1: C::ScalarField,
    pub bl_2: C::ScalarField,
    pub b_l: Vec<C::Affine>,
    pub b_r: Vec<C::Affine>,
    pub c_l: Vec<C::Affine>,
    pub c_r: Vec<C::Affine>,
    pub tip_b: C::ScalarField,
    pub tip_c: C::ScalarField,
}

impl<C: CurveGroup> fmt::Debug for IpaProof<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpaProof")
            .field("rounds", &self.b_l.len())
            .finish()
    }
}

fn check_shapes<C: CurveGroup>(
    g: &[C::Affine],
    h: &[C::Affine],
    b: &[C::ScalarField],
    c: &[C::ScalarField],
) -> ProofResult<()> {
    if g.len() != h.len() || g.len() != b.len() || g.len() != c.len() {
        return Err(ProofError::LengthMismatch {
            left: g.len(),
            right: b.len(),
        });
    }
    if g.is_empty() || !g.len().is_power_of_two() {
        return Err(ProofError::NotPowerOfTwo { len: g.len() });
    }
    Ok(())
}

/// Proves that `⟨b, c⟩ = z` given commitments `b_comm = Σ b_i G_i`,
/// `c_comm = Σ c_i H_i`. The caller has already absorbed any prior context
/// into `transcript`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(n = g.len()))]
#[allow(clippy::too_many_arguments)]
pub fn prove<C: CurveGroup>(
    transcript: &mut Transcript,
    g: &[C::Affine],
    h: &[C::Affine],
    u: C::Affine,
    b_comm: C,
    c_comm: C,
    z: C::ScalarField,
    mut b: Vec<C::ScalarField>,
    mut c: Vec<C::ScalarField>,
    rng: &mut (impl RngCore + ?Sized),
) -> ProofResult<IpaProof<C>> {
    check_shapes::<C>(g, h, &b, &c)?;
    let n = g.len();
    let mut g = g.to_vec();
    let mut h = h.to_vec();

    // Step 1: blinders.
    let r_vec: Vec<C::ScalarField> = (0..n).map(|_| C::ScalarField::rand(rng)).collect();
    let s_vec: Vec<C::ScalarField> = (0..n).map(|_| C::ScalarField::rand(rng)).collect();
    let r_comm: C = msm::<C>(&g, &r_vec);
    let s_comm: C = msm::<C>(&h, &s_vec);
    let bl_1 = inner_product(&b, &s_vec) + inner_product(&c, &r_vec);
    let bl_2 = inner_product(&r_vec, &s_vec);

    transcript.absorb_points(&[b_comm, c_comm, r_comm, s_comm]);
    transcript.absorb_scalars(&[z, bl_1, bl_2]);
    let x1: C::ScalarField = transcript.challenge_scalar();

    for i in 0..n {
        b[i] += x1 * r_vec[i];
        c[i] += x1 * s_vec[i];
    }

    // Step 2: derive the folding base U' = x2 * U. The x1 re-absorption
    // here (on top of the re-absorption challenge_scalar already did) is
    // part of the protocol, not a bug.
    transcript.absorb_scalar(&x1);
    let x2: C::ScalarField = transcript.challenge_scalar();
    let u_prime: C = C::from(u) * x2;

    let rounds = n.trailing_zeros() as usize;
    let mut b_l_pts = Vec::with_capacity(rounds);
    let mut b_r_pts = Vec::with_capacity(rounds);
    let mut c_l_pts = Vec::with_capacity(rounds);
    let mut c_r_pts = Vec::with_capacity(rounds);

    while b.len() > 1 {
        let (b_left, b_right) = split_half(&b);
        let (c_left, c_right) = split_half(&c);
        let (g_left, g_right) = split_half(&g);
        let (h_left, h_right) = split_half(&h);

        let c_l_b: C = msm::<C>(g_left, b_right) + u_prime * inner_product(b_right, c_left);
        let c_r_b: C = msm::<C>(g_right, b_left) + u_prime * inner_product(b_left, c_right);
        let c_l_c: C = msm::<C>(h_right, c_left);
        let c_r_c: C = msm::<C>(h_left, c_right);

        let c_l_b = c_l_b.into_affine();
        let c_r_b = c_r_b.into_affine();
        let c_l_c = c_l_c.into_affine();
        let c_r_c = c_r_c.into_affine();

        transcript.absorb_points(&[
            C::from(c_l_b),
            C::from(c_l_c),
            C::from(c_r_b),
            C::from(c_r_c),
        ]);
        let y: C::ScalarField = transcript.challenge_scalar();
        let y_inv = inv(y)?;
        tracing::trace!(target = LOG_TARGET, "round folded to length {}", b_left.len());

        let half = b_left.len();
        let mut b_next = Vec::with_capacity(half);
        let mut c_next = Vec::with_capacity(half);
        for idx in 0..half {
            b_next.push(b_left[idx] + y * b_right[idx]);
            c_next.push(c_left[idx] + y_inv * c_right[idx]);
        }
        g = fold_bases::<C>(g_left, g_right, y_inv);
        h = fold_bases::<C>(h_left, h_right, y);
        b = b_next;
        c = c_next;

        b_l_pts.push(c_l_b);
        b_r_pts.push(c_r_b);
        c_l_pts.push(c_l_c);
        c_r_pts.push(c_r_c);
    }

    Ok(IpaProof {
        r: r_comm.into_affine(),
        s: s_comm.into_affine(),
        bl_1,
        bl_2,
        b_l: b_l_pts,
        b_r: b_r_pts,
        c_l: c_l_pts,
        c_r: c_r_pts,
        tip_b: b[0],
        tip_c: c[0],
    })
}

/// Verifies an [`IpaProof`] against commitments `b_comm`, `c_comm` and
/// claimed inner product `z`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(n = g.len()))]
#[allow(clippy::too_many_arguments)]
pub fn verify<C: CurveGroup>(
    transcript: &mut Transcript,
    g: &[C::Affine],
    h: &[C::Affine],
    u: C::Affine,
    b_comm: C,
    c_comm: C,
    z: C::ScalarField,
    proof: &IpaProof<C>,
) -> ProofResult<()> {
    if g.len() != h.len() {
        return Err(ProofError::LengthMismatch {
            left: g.len(),
            right: h.len(),
        });
    }
    if g.is_empty() || !g.len().is_power_of_two() {
        return Err(ProofError::NotPowerOfTwo { len: g.len() });
    }
    let rounds = g.len().trailing_zeros() as usize;
    if proof.b_l.len() != rounds
        || proof.b_r.len() != rounds
        || proof.c_l.len() != rounds
        || proof.c_r.len() != rounds
    {
        return Err(ProofError::IpaVerificationFailed);
    }

    let mut g = g.to_vec();
    let mut h = h.to_vec();

    transcript.absorb_points(&[b_comm, c_comm, C::from(proof.r), C::from(proof.s)]);
    transcript.absorb_scalars(&[z, proof.bl_1, proof.bl_2]);
    let x1: C::ScalarField = transcript.challenge_scalar();

    let mut b_val = b_comm + C::from(proof.r) * x1;
    let mut c_val = c_comm + C::from(proof.s) * x1;
    let z_prime = z + x1 * proof.bl_1 + x1 * x1 * proof.bl_2;

    transcript.absorb_scalar(&x1);
    let x2: C::ScalarField = transcript.challenge_scalar();
    let u_prime: C = C::from(u) * x2;
    b_val += u_prime * z_prime;

    for i in 0..rounds {
        let (g_left, g_right) = split_half(&g);
        let (h_left, h_right) = split_half(&h);

        transcript.absorb_points(&[
            C::from(proof.b_l[i]),
            C::from(proof.c_l[i]),
            C::from(proof.b_r[i]),
            C::from(proof.c_r[i]),
        ]);
        let y: C::ScalarField = transcript.challenge_scalar();
        let y_inv = inv(y)?;

        b_val = C::from(proof.b_l[i]) * y + b_val + C::from(proof.b_r[i]) * y_inv;
        c_val = C::from(proof.c_l[i]) * y + c_val + C::from(proof.c_r[i]) * y_inv;

        g = fold_bases::<C>(g_left, g_right, y_inv);
        h = fold_bases::<C>(h_left, h_right, y);
    }

    debug_assert_eq!(g.len(), 1);
    debug_assert_eq!(h.len(), 1);
    let exp_b = C::from(g[0]) * proof.tip_b + u_prime * (proof.tip_b * proof.tip_c);
    let exp_c = C::from(h[0]) * proof.tip_c;

    if b_val == exp_b && c_val == exp_c {
        Ok(())
    } else {
        Err(ProofError::IpaVerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Projective};
    use ark_ec::CurveGroup;
    use ark_std::test_rng;

    fn setup(n: usize) -> (Vec<<G1Projective as CurveGroup>::Affine>, Vec<<G1Projective as CurveGroup>::Affine>, <G1Projective as CurveGroup>::Affine) {
        let mut rng = test_rng();
        let g = (0..n).map(|_| G1Projective::rand(&mut rng).into_affine()).collect();
        let h = (0..n).map(|_| G1Projective::rand(&mut rng).into_affine()).collect();
        let u = G1Projective::rand(&mut rng).into_affine();
        (g, h, u)
    }

    #[test]
    fn test_ipa_correctness() {
        let mut rng = test_rng();
        let n = 8;
        let (g, h, u) = setup(n);
        let b: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let c: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let z = inner_product(&b, &c);
        let b_comm = msm::<G1Projective>(&g, &b);
        let c_comm = msm::<G1Projective>(&h, &c);

        let mut pt = Transcript::new(b"test-ipa");
        let proof = prove::<G1Projective>(&mut pt, &g, &h, u, b_comm, c_comm, z, b, c, &mut rng).unwrap();

        let mut vt = Transcript::new(b"test-ipa");
        assert!(verify::<G1Projective>(&mut vt, &g, &h, u, b_comm, c_comm, z, &proof).is_ok());
    }

    #[test]
    fn test_ipa_wrong_tip() {
        let mut rng = test_rng();
        let n = 8;
        let (g, h, u) = setup(n);
        let b: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let c: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let z = inner_product(&b, &c);
        let b_comm = msm::<G1Projective>(&g, &b);
        let c_comm = msm::<G1Projective>(&h, &c);

        let mut pt = Transcript::new(b"test-ipa");
        let mut proof = prove::<G1Projective>(&mut pt, &g, &h, u, b_comm, c_comm, z, b, c, &mut rng).unwrap();
        proof.tip_b += Fr::from(1u64);

        let mut vt = Transcript::new(b"test-ipa");
        assert!(verify::<G1Projective>(&mut vt, &g, &h, u, b_comm, c_comm, z, &proof).is_err());
    }

    #[test]
    fn test_ipa_tampered_point() {
        let mut rng = test_rng();
        let n = 8;
        let (g, h, u) = setup(n);
        let b: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let c: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let z = inner_product(&b, &c);
        let b_comm = msm::<G1Projective>(&g, &b);
        let c_comm = msm::<G1Projective>(&h, &c);

        let mut pt = Transcript::new(b"test-ipa");
        let mut proof = prove::<G1Projective>(&mut pt, &g, &h, u, b_comm, c_comm, z, b, c, &mut rng).unwrap();
        proof.b_l[0] = (G1Projective::from(proof.b_l[0]) + G1Projective::rand(&mut rng)).into_affine();

        let mut vt = Transcript::new(b"test-ipa");
        assert!(verify::<G1Projective>(&mut vt, &g, &h, u, b_comm, c_comm, z, &proof).is_err());
    }

    #[test]
    fn test_ipa_invalid_length() {
        let mut rng = test_rng();
        let (g, h, u) = setup(6);
        let b: Vec<Fr> = (0..6).map(|_| Fr::rand(&mut rng)).collect();
        let c: Vec<Fr> = (0..6).map(|_| Fr::rand(&mut rng)).collect();
        let z = inner_product(&b, &c);
        let b_comm = msm::<G1Projective>(&g, &b);
        let c_comm = msm::<G1Projective>(&h, &c);
        let mut pt = Transcript::new(b"test-ipa");
        assert!(prove::<G1Projective>(&mut pt, &g, &h, u, b_comm, c_comm, z, b, c, &mut rng).is_err());
    }
}
