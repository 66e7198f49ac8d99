use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexicalError {
    /// `topk` was called for a language with no built index.
    #[error("no BM25 index built for language `{0}`")]
    IndexNotBuilt(String),
}
