//! Structural reflection boundary.
//!
//! The resolver never inspects source code or a language runtime itself. It
//! asks a [`ReflectionSource`] for plain records describing one class at a
//! time: its parent, the interfaces it implements, its raw documentation
//! block and the full list of methods visible on it (own and inherited, the
//! way a runtime exposes them).
//!
//! [`InMemoryReflection`] is a declaration table that answers these queries
//! from data loaded up front, e.g. a JSON dump produced by a language-side
//! exporter.

pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ReflectionError;

pub use memory::{ClassDeclaration, InMemoryReflection};

/// Name of the method treated as the constructor of a type
pub const CONSTRUCTOR_NAME: &str = "__construct";

/// Read-only query interface over already-loaded program metadata.
pub trait ReflectionSource {
    /// Structural facts about one class, interface or trait.
    fn class(&self, name: &str) -> Result<ClassFacts, ReflectionError>;
}

impl<T: ReflectionSource + ?Sized> ReflectionSource for &T {
    fn class(&self, name: &str) -> Result<ClassFacts, ReflectionError> {
        (**self).class(name)
    }
}

/// Kind of class-like declaration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Abstract,
    Interface,
    Trait,
}

impl ClassKind {
    pub fn is_interface(&self) -> bool {
        matches!(self, ClassKind::Interface)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Runtime value of a parameter default, as exposed by reflection.
///
/// Deserializes from the natural JSON shape: `null`, `true`, `3`, `1.5`,
/// `"text"`, `[...]`, or `{"class_name": "Foo"}` for an object default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<DefaultValue>),
    Object { class_name: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterFacts {
    pub name: String,
    #[serde(default)]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub is_variadic: bool,
    #[serde(default)]
    pub by_reference: bool,
    #[serde(default)]
    pub default: DefaultValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodFacts {
    pub name: String,
    /// Class where this method is declared. Differs from the queried class
    /// for inherited, non-overridden methods.
    #[serde(default)]
    pub declaring_class: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub doc_comment: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterFacts>,
}

impl MethodFacts {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

/// Answer to a [`ReflectionSource::class`] query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassFacts {
    pub name: String,
    pub kind: ClassKind,
    pub parent: Option<String>,
    /// Directly implemented (or, for interfaces, extended) interfaces in
    /// declaration order
    pub interfaces: Vec<String>,
    pub doc_comment: Option<String>,
    /// Own methods followed by inherited ones, one entry per name
    pub methods: Vec<MethodFacts>,
}

impl ClassFacts {
    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }
}
