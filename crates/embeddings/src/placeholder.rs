//! The deterministic placeholder embeddings backend.
//!
//! Seeds a PRNG from a stable 32-bit truncation of the text's hash and
//! draws `N(0, 1)` samples. Reproducible across processes and platforms,
//! unlike hashing on `std::hash::Hash` combined with the process's
//! `RandomState` — we use `fxhash` specifically because it has no
//! per-process randomization.

use crate::config::PLACEHOLDER_DIM;

/// Embeds `text` deterministically: same text, same process or a
/// different one, always the same vector.
///
/// # Examples
///
/// ```rust
/// use embeddings::placeholder::embed;
///
/// let a = embed("hola mundo");
/// let b = embed("hola mundo");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 768);
/// ```
pub fn embed(text: &str) -> Vec<f32> {
    let seed = fxhash::hash64(text.as_bytes()) as u32 as u64;
    let mut rng = fastrand::Rng::with_seed(seed);
    normal_vector(&mut rng, PLACEHOLDER_DIM)
}

/// Draws `dim` samples from the standard normal distribution using the
/// Box-Muller transform over `rng`'s uniform output.
fn normal_vector(rng: &mut fastrand::Rng, dim: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(dim);
    while out.len() < dim {
        // Box-Muller needs two uniforms in (0, 1]; avoid exact 0 to keep ln() finite.
        let u1 = (rng.f64() + f64::EPSILON).min(1.0);
        let u2 = rng.f64();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        out.push((r * theta.cos()) as f32);
        if out.len() < dim {
            out.push((r * theta.sin()) as f32);
        }
    }
    out
}
