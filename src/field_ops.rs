//! Scalar-field helpers shared by every sub-argument: modular inverse,
//! inner product, and power sequences.

use ark_ff::PrimeField;

use crate::error::{ProofError, ProofResult};

/// Modular inverse. Errors on zero rather than silently returning 0.
pub fn inv<F: PrimeField>(x: F) -> ProofResult<F> {
    x.inverse().ok_or(ProofError::ZeroInverse)
}

/// `⟨a, b⟩ = Σ a_i · b_i`.
pub fn inner_product<F: PrimeField>(a: &[F], b: &[F]) -> F {
    assert_eq!(a.len(), b.len(), "inner_product: length mismatch");
    a.iter().zip(b.iter()).map(|(x, y)| *x * y).sum()
}

/// `[1, x, x^2, ..., x^(n-1)]`.
pub fn powers<F: PrimeField>(x: F, n: usize) -> Vec<F> {
    let mut out = Vec::with_capacity(n);
    let mut cur = F::one();
    for _ in 0..n {
        out.push(cur);
        cur *= x;
    }
    out
}

/// Splits a slice into its left and right halves of equal length.
///
/// Panics if the slice length is odd. Every caller in this crate only
/// invokes this on power-of-two-length vectors.
pub fn split_half<T>(v: &[T]) -> (&[T], &[T]) {
    assert_eq!(v.len() % 2, 0, "split_half: odd length");
    v.split_at(v.len() / 2)
}

/// Applies a permutation: `out[i] = a[perm[i]]`.
pub fn apply_permutation<T: Clone>(a: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&p| a[p].clone()).collect()
}

/// Checks that `perm` is a bijection on `0..perm.len()`.
pub fn is_permutation(perm: &[usize]) -> bool {
    let n = perm.len();
    let mut seen = vec![false; n];
    for &p in perm {
        if p >= n || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
