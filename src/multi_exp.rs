//! Multi-exponentiation argument: given a commitment `A` to `a` and bases
//! `T_base`, `U_base`, prove `T = Σ a_i·T_base_i` and `U = Σ a_i·U_base_i`
//! simultaneously.

use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::UniformRand;

use crate::commit::{fold_bases, msm};
use crate::error::{ProofError, ProofResult};
use crate::field_ops::{inv, split_half};
use crate::transcript::Transcript;

const LOG_TARGET: &str = "bayer_groth_shuffle::multi_exp";

#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct MultiExpProof<C: CurveGroup> {
    pub r: C::Affine,
    pub t_bl: C::Affine,
    pub u_bl: C::Affine,
    pub t_l: Vec<C::Affine>,
    pub t_r: Vec<C::Affine>,
    pub u_l: Vec<C::Affine>,
    pub u_r: Vec<C::Affine>,
    pub c_l: Vec<C::Affine>,
    pub c_r: Vec<C::Affine>,
    pub tip_a: C::ScalarField,
}

fn check_shapes<C: CurveGroup>(
    g: &[C::Affine],
    t_base: &[C::Affine],
    u_base: &[C::Affine],
    a: &[C::ScalarField],
) -> ProofResult<()> {
    if g.len() != t_base.len() || g.len() != u_base.len() || g.len() != a.len() {
        return Err(ProofError::LengthMismatch {
            left: g.len(),
            right: a.len(),
        });
    }
    if g.is_empty() || !g.len().is_power_of_two() {
        return Err(ProofError::NotPowerOfTwo { len: g.len() });
    }
    Ok(())
}

/// Proves that `A = Σ a_i·G_i`, `t = Σ a_i·T_base_i`, `u_val = Σ
/// a_i·U_base_i` for the same witness vector `a`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(n = g.len()))]
#[allow(clippy::too_many_arguments)]
pub fn prove<C: CurveGroup>(
    transcript: &mut Transcript,
    g: &[C::Affine],
    t_base: &[C::Affine],
    u_base: &[C::Affine],
    a_comm: C,
    t_val: C,
    u_val: C,
    mut a: Vec<C::ScalarField>,
    rng: &mut (impl RngCore + ?Sized),
) -> ProofResult<MultiExpProof<C>> {
    check_shapes::<C>(g, t_base, u_base, &a)?;
    let n = g.len();
    let mut g = g.to_vec();
    let mut t_base = t_base.to_vec();
    let mut u_base = u_base.to_vec();

    let r_vec: Vec<C::ScalarField> = (0..n).map(|_| C::ScalarField::rand(rng)).collect();
    let r_comm: C = msm::<C>(&g, &r_vec);
    let t_bl: C = msm::<C>(&t_base, &r_vec);
    let u_bl: C = msm::<C>(&u_base, &r_vec);

    transcript.absorb_points(&[a_comm, t_val, u_val, r_comm, t_bl, u_bl]);
    let x: C::ScalarField = transcript.challenge_scalar();

    for i in 0..n {
        a[i] += x * r_vec[i];
    }

    let rounds = n.trailing_zeros() as usize;
    let mut t_l_pts = Vec::with_capacity(rounds);
    let mut t_r_pts = Vec::with_capacity(rounds);
    let mut u_l_pts = Vec::with_capacity(rounds);
    let mut u_r_pts = Vec::with_capacity(rounds);
    let mut c_l_pts = Vec::with_capacity(rounds);
    let mut c_r_pts = Vec::with_capacity(rounds);

    while a.len() > 1 {
        let (a_left, a_right) = split_half(&a);
        let (g_left, g_right) = split_half(&g);
        let (t_left, t_right) = split_half(&t_base);
        let (u_left, u_right) = split_half(&u_base);

        let z_l_t: C = msm::<C>(t_right, a_left);
        let z_l_u: C = msm::<C>(u_right, a_left);
        let z_r_t: C = msm::<C>(t_left, a_right);
        let z_r_u: C = msm::<C>(u_left, a_right);
        let c_l: C = msm::<C>(g_right, a_left);
        let c_r: C = msm::<C>(g_left, a_right);

        let (z_l_t, z_l_u, z_r_t, z_r_u, c_l, c_r) = (
            z_l_t.into_affine(),
            z_l_u.into_affine(),
            z_r_t.into_affine(),
            z_r_u.into_affine(),
            c_l.into_affine(),
            c_r.into_affine(),
        );

        transcript.absorb_points(&[
            C::from(z_l_t),
            C::from(z_l_u),
            C::from(z_r_t),
            C::from(z_r_u),
            C::from(c_l),
            C::from(c_r),
        ]);
        let y: C::ScalarField = transcript.challenge_scalar();
        let y_inv = inv(y)?;
        tracing::trace!(target = LOG_TARGET, "round folded to length {}", a_left.len());

        let half = a_left.len();
        let mut a_next = Vec::with_capacity(half);
        for idx in 0..half {
            a_next.push(a_left[idx] + y_inv * a_right[idx]);
        }
        t_base = fold_bases::<C>(t_left, t_right, y);
        u_base = fold_bases::<C>(u_left, u_right, y);
        g = fold_bases::<C>(g_left, g_right, y);
        a = a_next;

        t_l_pts.push(z_l_t);
        t_r_pts.push(z_r_t);
        u_l_pts.push(z_l_u);
        u_r_pts.push(z_r_u);
        c_l_pts.push(c_l);
        c_r_pts.push(c_r);
    }

    Ok(MultiExpProof {
        r: r_comm.into_affine(),
        t_bl: t_bl.into_affine(),
        u_bl: u_bl.into_affine(),
        t_l: t_l_pts,
        t_r: t_r_pts,
        u_l: u_l_pts,
        u_r: u_r_pts,
        c_l: c_l_pts,
        c_r: c_r_pts,
        tip_a: a[0],
    })
}

/// Verifies a [`MultiExpProof`].
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(n = g.len()))]
#[allow(clippy::too_many_arguments)]
pub fn verify<C: CurveGroup>(
    transcript: &mut Transcript,
    g: &[C::Affine],
    t_base: &[C::Affine],
    u_base: &[C::Affine],
    a_comm: C,
    t_val: C,
    u_val: C,
    proof: &MultiExpProof<C>,
) -> ProofResult<()> {
    if g.len() != t_base.len() || g.len() != u_base.len() {
        return Err(ProofError::LengthMismatch {
            left: g.len(),
            right: t_base.len(),
        });
    }
    if g.is_empty() || !g.len().is_power_of_two() {
        return Err(ProofError::NotPowerOfTwo { len: g.len() });
    }
    let rounds = g.len().trailing_zeros() as usize;
    if proof.t_l.len() != rounds
        || proof.t_r.len() != rounds
        || proof.u_l.len() != rounds
        || proof.u_r.len() != rounds
        || proof.c_l.len() != rounds
        || proof.c_r.len() != rounds
    {
        return Err(ProofError::MultiExpVerificationFailed);
    }

    let mut g = g.to_vec();
    let mut t_base = t_base.to_vec();
    let mut u_base = u_base.to_vec();

    transcript.absorb_points(&[
        a_comm,
        t_val,
        u_val,
        C::from(proof.r),
        C::from(proof.t_bl),
        C::from(proof.u_bl),
    ]);
    let x: C::ScalarField = transcript.challenge_scalar();

    let mut a_val = a_comm + C::from(proof.r) * x;
    let mut t = t_val + C::from(proof.t_bl) * x;
    let mut u = u_val + C::from(proof.u_bl) * x;

    for i in 0..rounds {
        let (g_left, g_right) = split_half(&g);
        let (t_left, t_right) = split_half(&t_base);
        let (u_left, u_right) = split_half(&u_base);

        transcript.absorb_points(&[
            C::from(proof.t_l[i]),
            C::from(proof.u_l[i]),
            C::from(proof.t_r[i]),
            C::from(proof.u_r[i]),
            C::from(proof.c_l[i]),
            C::from(proof.c_r[i]),
        ]);
        let y: C::ScalarField = transcript.challenge_scalar();
        let y_inv = inv(y)?;

        a_val = C::from(proof.c_l[i]) * y + a_val + C::from(proof.c_r[i]) * y_inv;
        t = C::from(proof.t_l[i]) * y + t + C::from(proof.t_r[i]) * y_inv;
        u = C::from(proof.u_l[i]) * y + u + C::from(proof.u_r[i]) * y_inv;

        g = fold_bases::<C>(g_left, g_right, y);
        t_base = fold_bases::<C>(t_left, t_right, y);
        u_base = fold_bases::<C>(u_left, u_right, y);
    }

    debug_assert_eq!(g.len(), 1);
    let exp_a = C::from(g[0]) * proof.tip_a;
    let exp_t = C::from(t_base[0]) * proof.tip_a;
    let exp_u = C::from(u_base[0]) * proof.tip_a;

    if a_val == exp_a && t == exp_t && u == exp_u {
        Ok(())
    } else {
        Err(ProofError::MultiExpVerificationFailed)
    }
}
