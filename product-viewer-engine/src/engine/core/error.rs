use thiserror::Error;

/// Failures the viewer can observe. None of them propagate to the host page;
/// callers log them and keep the last good visual state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewerError {
    #[error("unknown product id: {0}")]
    UnknownProduct(String),

    #[error("viewer container #{0} not found in the host page")]
    ContainerMissing(String),

    #[error("failed to load texture {path}: {reason}")]
    TextureLoad { path: String, reason: String },
}
