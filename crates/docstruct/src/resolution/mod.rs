//! Metadata resolution engine.
//!
//! Builds one canonical signature description per class by merging
//! structural reflection facts with documentation annotations.
//!
//! ## Architecture Overview
//!
//! - [`ProjectRegistry`] owns every [`ClassDescriptor`] in an arena and maps
//!   class names to [`ClassId`]s. A descriptor is registered before its
//!   resolution starts, so shared ancestors are resolved once and a cyclic
//!   type graph hits an in-progress descriptor instead of recursing.
//! - [`ClassDescriptor`] resolution walks the parent first, then each
//!   interface in declaration order, then reads `@method` annotations from
//!   the class block, then resolves every visible method.
//! - [`MethodDescriptor`] resolution merges `@param`/`@return` annotations
//!   with structural facts. When nothing local names a return type it is
//!   inherited from the parent's same-named method, else from the first
//!   interface declaring it, else it stays `???`.
//!
//! Parent, interface and owner links are `ClassId`s into the registry
//! arena, never owning pointers.

pub mod class;
pub mod method;
pub mod registry;


pub use class::ClassDescriptor;
pub use method::{MethodDescriptor, Parameter, SELF_TYPE, UNRESOLVED_TYPE};
pub use registry::ProjectRegistry;

/// Index of a [`ClassDescriptor`] in its [`ProjectRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionState {
    #[default]
    Pending,
    InProgress,
    Resolved,
}
