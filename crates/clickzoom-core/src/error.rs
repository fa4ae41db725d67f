use thiserror::Error;

/// Failures when the scene does not hold what an operation requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("no node named `{0}` in scene")]
    MissingNode(String),
    #[error("node path {0:?} does not resolve")]
    InvalidPath(Vec<usize>),
}

/// Failures turning a glTF document into scene nodes.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF document has no scene")]
    NoScene,
    #[error("buffer {index} missing")]
    MissingBuffer { index: usize },
    #[error("buffer {index} holds {actual} bytes, {expected} declared")]
    BufferTooShort {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("GLB binary chunk missing")]
    MissingBlob,
    #[error("mesh `{mesh}` primitive {primitive} has no POSITION attribute")]
    MissingPositions { mesh: String, primitive: usize },
}
