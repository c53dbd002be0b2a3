//! Error types for the docstruct crate

use thiserror::Error;

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Failures raised at the structural reflection boundary
#[derive(Error, Debug)]
pub enum ReflectionError {
    /// The reflection facility has no declaration for the requested name
    #[error("Unknown class: {class_name}")]
    UnknownClass { class_name: String },

    /// A declaration table or class map could not be decoded
    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    /// IO operations failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised while reading a documentation block.
///
/// These never abort a run: the resolver logs them and keeps the
/// structural facts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Malformed @{tag} annotation: {text}")]
    Malformed { tag: String, text: String },
}

/// Failures of the resolution engine
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// Resolution re-entered a descriptor that is still in progress.
    /// The type graph contains a dependency cycle.
    #[error("Resolution of {class_name} re-entered while in progress. Maybe there is a dependency loop.")]
    ReentrantResolution { class_name: String },

    /// Registry lookup for a class that was never registered
    #[error("Class not found in registry: {class_name}")]
    ClassNotFound { class_name: String },

    #[error(transparent)]
    Reflection(#[from] ReflectionError),
}

/// Failures while loading a [`ResolutionConfig`](crate::config::ResolutionConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
