//! Documentation-annotation boundary.
//!
//! A documentation block is reduced to an ordered list of [`Annotation`]s.
//! Only the three kinds the resolver consumes are modelled; every other tag
//! is dropped by the parser.

pub mod docblock;

use crate::errors::AnnotationError;

pub use docblock::DocBlockParser;

/// Type name that an annotated return type rewrites to `self`
pub const SELF_REFERENCE: &str = "$this";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// `@param`. Either field may be empty when the tag omits it.
    Param { type_hint: String, variable: String },
    /// `@return`
    Return { type_hint: String },
    /// `@method`, a virtual method with no structural declaration.
    /// `rendered` is the normalized signature text.
    Method { name: String, rendered: String },
    /// A recognised tag whose body could not be read. Only this tag is
    /// lost; the rest of the block stays usable.
    Invalid(AnnotationError),
}

pub trait AnnotationParser {
    /// Annotations of one documentation block, in block order. An error
    /// means the whole block is unusable; a single bad tag is reported as
    /// [`Annotation::Invalid`] instead.
    fn parse(&self, doc_comment: &str) -> Result<Vec<Annotation>, AnnotationError>;
}

impl<T: AnnotationParser + ?Sized> AnnotationParser for &T {
    fn parse(&self, doc_comment: &str) -> Result<Vec<Annotation>, AnnotationError> {
        (**self).parse(doc_comment)
    }
}
