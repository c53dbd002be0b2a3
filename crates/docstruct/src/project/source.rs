use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ReflectionError;
use crate::reflection::InMemoryReflection;

// Class list sources. The resolver only needs the ordered list of class
// names belonging to a project:
//
// - a plain list of names, when the caller already enumerated them
// - ClassMap, an optimized autoloader class map (class name -> file path)
// - InMemoryReflection, every declared class in declaration order
//
// Output order follows the source order.

pub trait ClassListSource {
    fn class_names(&self) -> Result<Vec<String>, ReflectionError>;
}

impl ClassListSource for [String] {
    fn class_names(&self) -> Result<Vec<String>, ReflectionError> {
        Ok(self.to_vec())
    }
}

impl ClassListSource for Vec<String> {
    fn class_names(&self) -> Result<Vec<String>, ReflectionError> {
        Ok(self.clone())
    }
}

impl ClassListSource for InMemoryReflection {
    fn class_names(&self) -> Result<Vec<String>, ReflectionError> {
        Ok(InMemoryReflection::class_names(self).to_vec())
    }
}

/// Autoloader class map: fully-qualified class name -> defining file.
/// Enumerates names sorted, like a generated optimized class map.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    entries: BTreeMap<String, PathBuf>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_name: &str, path: impl Into<PathBuf>) {
        self.entries.insert(class_name.to_string(), path.into());
    }

    /// Load a JSON object of the form `{"App\\User": "src/User.php", ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, ReflectionError> {
        let entries: BTreeMap<String, PathBuf> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn from_file(path: &Path) -> Result<Self, ReflectionError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn path_of(&self, class_name: &str) -> Option<&Path> {
        self.entries.get(class_name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ClassListSource for ClassMap {
    fn class_names(&self) -> Result<Vec<String>, ReflectionError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_map_enumerates_sorted_names() {
        let map = ClassMap::from_json_str(
            r#"{"App\\Zeta": "src/Zeta.php", "App\\Alpha": "src/Alpha.php"}"#,
        )
        .unwrap();

        assert_eq!(
            map.class_names().unwrap(),
            vec!["App\\Alpha".to_string(), "App\\Zeta".to_string()]
        );
        assert_eq!(map.path_of("App\\Zeta"), Some(Path::new("src/Zeta.php")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_invalid_class_map() {
        let err = ClassMap::from_json_str("[1, 2]").unwrap_err();

        assert!(matches!(err, ReflectionError::Fixture(_)));
    }

    #[test]
    fn test_plain_list_keeps_order() {
        let names = vec!["B".to_string(), "A".to_string()];

        assert_eq!(names.class_names().unwrap(), names);
    }
}
