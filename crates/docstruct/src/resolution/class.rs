use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use super::method::MethodDescriptor;
use super::{ClassId, ResolutionState};
use crate::reflection::{ClassFacts, ClassKind};

/// Resolved public surface of one class, interface or trait.
///
/// Created by [`ProjectRegistry`](super::ProjectRegistry) on first request
/// and kept for the life of the registry.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    id: ClassId,
    facts: ClassFacts,
    pub(crate) state: ResolutionState,
    pub(crate) parent: Option<ClassId>,
    pub(crate) interfaces: SmallVec<[ClassId; 4]>,
    /// `@method` name -> verbatim signature text
    pub(crate) dynamic_methods: BTreeMap<String, String>,
    /// Every method visible on the class, own and inherited
    pub(crate) methods: BTreeMap<String, MethodDescriptor>,
}

impl ClassDescriptor {
    pub(crate) fn new(id: ClassId, facts: ClassFacts) -> Self {
        Self {
            id,
            facts,
            state: ResolutionState::Pending,
            parent: None,
            interfaces: SmallVec::new(),
            dynamic_methods: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Drop everything a failed resolution may have filled in
    pub(crate) fn reset(&mut self) {
        self.state = ResolutionState::Pending;
        self.parent = None;
        self.interfaces.clear();
        self.dynamic_methods.clear();
        self.methods.clear();
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.facts.name
    }

    pub fn kind(&self) -> ClassKind {
        self.facts.kind
    }

    pub fn is_interface(&self) -> bool {
        self.facts.is_interface()
    }

    pub fn facts(&self) -> &ClassFacts {
        &self.facts
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == ResolutionState::Resolved
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    pub fn interfaces(&self) -> &[ClassId] {
        &self.interfaces
    }

    pub fn dynamic_methods(&self) -> &BTreeMap<String, String> {
        &self.dynamic_methods
    }

    pub fn methods(&self) -> &BTreeMap<String, MethodDescriptor> {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    /// Methods declared on this class itself, sorted by name
    pub fn own_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods
            .values()
            .filter(|method| method.declaring_class() == self.name())
    }

    /// `Name[ extends Parent][ implements A, B]`
    pub fn header(&self) -> String {
        let mut header = self.facts.name.clone();

        if let Some(parent) = &self.facts.parent {
            header.push_str(" extends ");
            header.push_str(parent);
        }

        if !self.facts.interfaces.is_empty() {
            header.push_str(" implements ");
            header.push_str(&self.facts.interfaces.join(", "));
        }

        header
    }
}

/// Header line, then `@method` lines, then own methods, each sorted by
/// name and newline-terminated. Inherited methods that are not overridden
/// only appear under their declaring class.
impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;

        for rendered in self.dynamic_methods.values() {
            writeln!(f, "{rendered}")?;
        }

        for method in self.own_methods() {
            writeln!(f, "{}", method.render(self))?;
        }

        Ok(())
    }
}
