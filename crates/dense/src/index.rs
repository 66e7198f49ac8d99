use std::path::Path;

use embeddings::EmbeddingsBackend;
use ndarray::Array2;

use crate::error::DenseError;
use crate::npy::{read_f32_matrix, read_string_vector};

const EPS: f32 = 1e-8;

/// A loaded embedding matrix `E ∈ ℝ^{N×D}` aligned with an id vector of
/// length `N`, plus the embeddings backend used to embed queries.
///
/// `topk` never re-embeds the matrix rows — they are read once from disk
/// at load time — and the returned scores are raw cosine similarity in
/// `[-1, 1]`, unnormalized; normalization into `[0,1]` is fusion's job.
pub struct DenseIndex {
    ids: Vec<String>,
    matrix: Array2<f32>,
    row_norms: Vec<f32>,
}

impl DenseIndex {
    /// Reads the embedding matrix from `matrix_path` and the aligned id
    /// vector from `ids_path`, both NPY artifacts.
    pub fn load(matrix_path: &Path, ids_path: &Path) -> Result<Self, DenseError> {
        let (flat, (rows, cols)) = read_f32_matrix(matrix_path)?;
        let ids = read_string_vector(ids_path)?;

        if rows != ids.len() {
            return Err(DenseError::RowMismatch {
                matrix_rows: rows,
                id_rows: ids.len(),
            });
        }

        let matrix = Array2::from_shape_vec((rows, cols), flat).map_err(|e| DenseError::Npy {
            path: matrix_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let row_norms = matrix
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f32>().sqrt())
            .collect();

        Ok(Self {
            ids,
            matrix,
            row_norms,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.matrix.ncols()
    }

    /// Embeds `text` via `backend` — the first step of a `topk` call,
    /// split out so callers can reuse a single query embedding across
    /// multiple signals in one request.
    pub fn embed_query(backend: &EmbeddingsBackend, text: &str) -> Vec<f32> {
        backend.embed_text(text)
    }

    /// Cosine similarity of `query_emb` against every row, the `k` highest
    /// returned as `(id, score)` with `score` the raw cosine value.
    pub fn topk(&self, query_emb: &[f32], k: usize) -> Vec<(String, f32)> {
        if self.ids.is_empty() || query_emb.len() != self.matrix.ncols() {
            return Vec::new();
        }
        let q_norm = (query_emb.iter().map(|v| v * v).sum::<f32>()).sqrt();

        let mut scored: Vec<(usize, f32)> = self
            .matrix
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let dot: f32 = row.iter().zip(query_emb).map(|(a, b)| a * b).sum();
                let sim = dot / (self.row_norms[i] * q_norm + EPS);
                (i, sim)
            })
            .collect();

        scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(i, sim)| (self.ids[i].clone(), sim))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_npy(dict_body: &str, data: &[u8]) -> tempfile::NamedTempFile {
        let mut header = format!("{{{dict_body}}}");
        let prefix_len = 6 + 2 + 2;
        let mut total = prefix_len + header.len() + 1;
        while total % 64 != 0 {
            header.push(' ');
            total += 1;
        }
        header.push('\n');

        let mut buf = Vec::new();
        buf.extend_from_slice(b"\x93NUMPY");
        buf.push(1);
        buf.push(0);
        buf.extend_from_slice(&(header.len() as u16).to_le_bytes());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(data);

        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&buf).unwrap();
        f
    }

    fn fixture() -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
        let mut data = Vec::new();
        for v in [1.0f32, 0.0, 0.0, 1.0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let matrix = write_npy(
            "'descr': '<f4', 'fortran_order': False, 'shape': (2, 2), ",
            &data,
        );

        let mut id_data = Vec::new();
        for s in ["a", "b"] {
            let mut codepoints: Vec<u32> = s.chars().map(|c| c as u32).collect();
            codepoints.resize(1, 0);
            for cp in codepoints {
                id_data.extend_from_slice(&cp.to_le_bytes());
            }
        }
        let ids = write_npy(
            "'descr': '<U1', 'fortran_order': False, 'shape': (2,), ",
            &id_data,
        );
        (matrix, ids)
    }

    #[test]
    fn topk_ranks_exact_match_first() {
        let (matrix, ids) = fixture();
        let idx = DenseIndex::load(matrix.path(), ids.path()).unwrap();
        let hits = idx.topk(&[1.0, 0.0], 2);
        assert_eq!(hits[0].0, "a");
        assert!((hits[0].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn row_count_mismatch_is_an_error() {
        let (matrix, _) = fixture();
        let bad_ids = write_npy(
            "'descr': '<U1', 'fortran_order': False, 'shape': (1,), ",
            &0u32.to_le_bytes(),
        );
        assert!(matches!(
            DenseIndex::load(matrix.path(), bad_ids.path()),
            Err(DenseError::RowMismatch { .. })
        ));
    }

    #[test]
    fn dimension_mismatch_query_returns_no_hits() {
        let (matrix, ids) = fixture();
        let idx = DenseIndex::load(matrix.path(), ids.path()).unwrap();
        assert!(idx.topk(&[1.0, 0.0, 0.0], 2).is_empty());
    }
}
