use std::fs;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{
    ClassFacts, ClassKind, DefaultValue, MethodFacts, ParameterFacts, ReflectionSource, Visibility,
};
use crate::errors::ReflectionError;

/// One class-like declaration as written in source: only the methods it
/// declares itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub doc_comment: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodFacts>,
}

impl ClassDeclaration {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn interface(name: &str) -> Self {
        Self::class(name).with_kind(ClassKind::Interface)
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn with_doc(mut self, doc_comment: &str) -> Self {
        self.doc_comment = Some(doc_comment.to_string());
        self
    }

    pub fn with_method(mut self, method: MethodFacts) -> Self {
        self.methods.push(method);
        self
    }
}

impl MethodFacts {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_return_type(mut self, return_type: &str) -> Self {
        self.return_type = Some(return_type.to_string());
        self
    }

    pub fn with_doc(mut self, doc_comment: &str) -> Self {
        self.doc_comment = Some(doc_comment.to_string());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterFacts) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

impl ParameterFacts {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_hint: &str) -> Self {
        self.type_hint = Some(type_hint.to_string());
        self
    }

    pub fn optional(mut self, default: DefaultValue) -> Self {
        self.is_optional = true;
        self.default = default;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.is_optional = true;
        self.is_variadic = true;
        self
    }

    pub fn by_reference(mut self) -> Self {
        self.by_reference = true;
        self
    }
}

#[derive(Deserialize)]
struct DeclarationTable {
    classes: Vec<ClassDeclaration>,
}

/// Declaration table answering reflection queries the way a language
/// runtime would: a class exposes its own methods first, then every
/// inherited method it does not override.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReflection {
    declarations: FxHashMap<String, ClassDeclaration>,
    /// Declaration order of class names
    order: Vec<String>,
}

impl InMemoryReflection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, declaration: ClassDeclaration) -> Self {
        self.insert(declaration);
        self
    }

    /// Register a declaration. A later declaration with the same name
    /// replaces the earlier one but keeps its position.
    pub fn insert(&mut self, declaration: ClassDeclaration) {
        if !self.declarations.contains_key(&declaration.name) {
            self.order.push(declaration.name.clone());
        }
        self.declarations
            .insert(declaration.name.clone(), declaration);
    }

    /// Load a table of the form `{"classes": [{"name": ..., ...}, ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, ReflectionError> {
        let table: DeclarationTable = serde_json::from_str(json)?;
        let mut reflection = Self::new();
        for declaration in table.classes {
            reflection.insert(declaration);
        }
        Ok(reflection)
    }

    pub fn from_file(path: &Path) -> Result<Self, ReflectionError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Class names in declaration order
    pub fn class_names(&self) -> &[String] {
        &self.order
    }

    fn collect_methods<'a>(
        &'a self,
        name: &str,
        visited: &mut SmallVec<[&'a str; 8]>,
        seen: &mut FxHashSet<&'a str>,
        methods: &mut Vec<MethodFacts>,
    ) {
        let Some((class_name, declaration)) = self.declarations.get_key_value(name) else {
            return;
        };

        // Cyclic declarations are reported by the resolver, not here
        if visited.iter().any(|v| *v == class_name.as_str()) {
            return;
        }
        visited.push(class_name.as_str());

        for method in &declaration.methods {
            if seen.insert(method.name.as_str()) {
                let mut method = method.clone();
                method.declaring_class = class_name.clone();
                methods.push(method);
            }
        }

        if let Some(parent) = &declaration.parent {
            self.collect_methods(parent, visited, seen, methods);
        }

        for interface in &declaration.interfaces {
            self.collect_methods(interface, visited, seen, methods);
        }
    }
}

impl ReflectionSource for InMemoryReflection {
    fn class(&self, name: &str) -> Result<ClassFacts, ReflectionError> {
        let declaration =
            self.declarations
                .get(name)
                .ok_or_else(|| ReflectionError::UnknownClass {
                    class_name: name.to_string(),
                })?;

        let mut methods = Vec::with_capacity(declaration.methods.len());
        let mut visited = SmallVec::new();
        let mut seen = FxHashSet::default();
        self.collect_methods(name, &mut visited, &mut seen, &mut methods);

        Ok(ClassFacts {
            name: declaration.name.clone(),
            kind: declaration.kind,
            parent: declaration.parent.clone(),
            interfaces: declaration.interfaces.clone(),
            doc_comment: declaration.doc_comment.clone(),
            methods,
        })
    }
}
