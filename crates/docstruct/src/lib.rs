//! Canonical signature model of a codebase's classes and methods, built by
//! merging structural reflection facts with documentation annotations.

pub mod annotation;
pub mod config;
pub mod errors;
pub mod project;
pub mod reflection;
pub mod resolution;
pub mod runner;
pub mod stats;

pub use annotation::{Annotation, AnnotationParser, DocBlockParser};
pub use config::{ResolutionConfig, ResolutionConfigBuilder};
pub use errors::{AnnotationError, ConfigError, ReflectionError, ResolutionError};
pub use project::{ClassListSource, ClassMap, NamespaceFilter};
pub use reflection::{InMemoryReflection, ReflectionSource};
pub use resolution::{ClassDescriptor, ClassId, MethodDescriptor, ProjectRegistry};
pub use runner::{ProjectRun, run_project};
pub use stats::ResolutionStats;
