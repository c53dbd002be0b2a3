pub mod filter;
pub mod source;

pub use filter::NamespaceFilter;
pub use source::{ClassListSource, ClassMap};
