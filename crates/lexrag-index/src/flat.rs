//! Exact inner-product index persisted as a flat little-endian file.
//!
//! Layout: `b"LXFI" | u32 version | u32 dim | u64 count | count*dim f32`.
//! Rows are stored L2-normalised so inner product equals cosine similarity.

use std::fs;
use std::io::Write;
use std::path::Path;

use lexrag_core::traits::VectorIndex;
use lexrag_core::types::Neighbors;
use lexrag_core::{Error, Result};

const MAGIC: &[u8; 4] = b"LXFI";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

/// Scales `v` to unit length in place. Zero vectors are left untouched.
pub fn normalize_l2(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Builds an index from raw vectors, normalising each row.
    pub fn from_vectors(dim: usize, vectors: &[Vec<f32>]) -> Result<Self> {
        let mut data = Vec::with_capacity(dim * vectors.len());
        for v in vectors {
            if v.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, actual: v.len() });
            }
            let start = data.len();
            data.extend_from_slice(v);
            normalize_l2(&mut data[start..]);
        }
        Ok(Self { dim, data })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingArtifact { path: path.to_path_buf() });
        }
        let corrupt = |reason: String| Error::CorruptArtifact { path: path.to_path_buf(), reason };
        let bytes = fs::read(path).map_err(|e| corrupt(e.to_string()))?;
        if bytes.len() < HEADER_LEN {
            return Err(corrupt(format!("file is {} bytes, shorter than the header", bytes.len())));
        }
        if &bytes[0..4] != MAGIC {
            return Err(corrupt("bad magic, not a flat index file".to_string()));
        }
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != VERSION {
            return Err(corrupt(format!("unsupported version {version}")));
        }
        let dim = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&bytes[12..20]);
        let count = usize::try_from(u64::from_le_bytes(count_bytes))
            .map_err(|_| corrupt("vector count does not fit in memory".to_string()))?;
        if dim == 0 && count > 0 {
            return Err(corrupt("zero dimension with stored vectors".to_string()));
        }
        let expected = count
            .checked_mul(dim)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| corrupt("payload size overflows".to_string()))?;
        let payload = &bytes[HEADER_LEN..];
        if payload.len() != expected {
            return Err(corrupt(format!(
                "payload is {} bytes, header declares {count} x {dim} floats ({expected} bytes)",
                payload.len()
            )));
        }
        let data = payload
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self { dim, data })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| Error::CorruptArtifact { path: path.to_path_buf(), reason: e.to_string() };
        let dim = u32::try_from(self.dim)
            .map_err(|_| Error::InvalidInput(format!("dimension {} too large", self.dim)))?;
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&dim.to_le_bytes());
        out.extend_from_slice(&(self.count() as u64).to_le_bytes());
        for x in &self.data {
            out.extend_from_slice(&x.to_le_bytes());
        }
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(&out).map_err(io_err)?;
        Ok(())
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

impl VectorIndex for FlatIndex {
    fn count(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Neighbors> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query.len() });
        }
        let mut scored: Vec<(usize, f32)> = (0..self.count())
            .map(|i| (i, self.row(i).iter().zip(query).map(|(a, b)| a * b).sum()))
            .collect();
        // descending score, lower row first on ties
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        let (rows, scores) = scored.into_iter().map(|(i, s)| (i as i64, s)).unzip();
        Ok(Neighbors { scores, rows })
    }
}
