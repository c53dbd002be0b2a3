/// Namespace-prefix rule deciding which classes of a project are resolved.
///
/// Prefixes match the start of the fully-qualified name only. Exclusion is
/// checked first and always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl NamespaceFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn include(prefix: &str) -> Self {
        Self::new(vec![prefix.to_string()], Vec::new())
    }

    pub fn excluding(mut self, prefix: &str) -> Self {
        self.exclude.push(prefix.to_string());
        self
    }

    pub fn is_in_scope(&self, class_name: &str) -> bool {
        if self
            .exclude
            .iter()
            .any(|prefix| class_name.starts_with(prefix.as_str()))
        {
            return false;
        }

        self.include
            .iter()
            .any(|prefix| class_name.starts_with(prefix.as_str()))
    }
}
