use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use lexrag_core::traits::Embedder;
use lexrag_core::Result;

/// Deterministic bag-of-tokens embedder for offline runs and tests.
///
/// Each whitespace token is hashed into one bucket; texts sharing tokens
/// land close together. Output is unit length unless the text is blank.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += val + (i % 3) as f32 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_vector() {
        let e = HashEmbedder::new(64);
        assert_eq!(e.embed("annual leave").expect("embed"), e.embed("annual leave").expect("embed"));
    }

    #[test]
    fn output_has_requested_dimension_and_unit_norm() {
        let v = HashEmbedder::new(32).embed("termination of contract").expect("embed");
        assert_eq!(v.len(), 32);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn blank_text_is_zero_vector() {
        let v = HashEmbedder::new(8).embed("   ").expect("embed");
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
