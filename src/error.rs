use thiserror::Error;

/// Failures surfaced to the host page.
///
/// Layout and geometry degradations never show up here; the scene clamps or
/// skips those and keeps running.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("unknown section id `{0}`")]
    UnknownSection(String),
    #[error("missing element `{0}`")]
    MissingElement(String),
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid scene options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type NavResult<T> = Result<T, NavError>;
