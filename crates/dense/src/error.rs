use thiserror::Error;

#[derive(Debug, Error)]
pub enum DenseError {
    #[error("failed to read dense artifact at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed NPY artifact at {path}: {reason}")]
    Npy { path: String, reason: String },
    #[error("embedding matrix has {matrix_rows} rows but id vector has {id_rows}")]
    RowMismatch { matrix_rows: usize, id_rows: usize },
}
