use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to read classifier artifact at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode classifier artifact at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: bincode::Error,
    },
    /// The model's output length cannot be reconciled with the class list,
    /// even via the binary-expansion fallback.
    #[error("classifier output length {actual} does not match class count {expected}")]
    Shape { expected: usize, actual: usize },
}
