use thiserror::Error;

/// Errors surfaced while loading or querying the taxonomy store.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// `taxonomy.json` could not be read from disk.
    #[error("failed to read taxonomy artifact at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The taxonomy JSON did not parse, or a row had an unexpected shape.
    #[error("failed to parse taxonomy artifact at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A concept row's multilingual field was neither a scalar, a list, nor
    /// a `lang -> value` mapping.
    #[error("concept {id}: field `{field}` has an unsupported shape")]
    UnsupportedFieldShape { id: String, field: &'static str },
    /// A concept row is missing its `id`.
    #[error("concept row is missing a required `id`")]
    MissingId,
}
