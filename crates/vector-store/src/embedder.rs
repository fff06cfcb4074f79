//! The embedding capability.
//!
//! The index never talks to a model directly: it takes an [`Embedder`],
//! injected by the caller. The in-crate default is a deterministic
//! hash-based embedder, cached process-wide on first use and never torn
//! down, so repeated builds share the one instance.

use crate::error::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Dimension of the default embedding space.
pub const DEFAULT_DIMENSION: usize = 384;

/// Text in, fixed-dimension unit-normalized vector out.
///
/// Implementations return [`crate::VectorStoreError::EmbeddingUnavailable`]
/// when the backend cannot serve at all (fatal for the operation in
/// progress) and any other error for a single text that failed (skipped
/// with a warning during builds).
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;

    /// Identifier recorded in index metadata.
    fn model_id(&self) -> &str;
}

/// Deterministic embedder: FNV-1a seed, splitmix64 expansion, unit
/// normalization. No model assets, stable across runs, good enough for
/// relative similarity between code texts.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hash_embed(text, self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        "hash-embed-v1"
    }
}

static DEFAULT_EMBEDDER: Lazy<Arc<dyn Embedder>> =
    Lazy::new(|| Arc::new(HashEmbedder::default()));

/// The process-wide default embedder instance.
pub fn default_embedder() -> Arc<dyn Embedder> {
    DEFAULT_EMBEDDER.clone()
}

fn hash_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}
