use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use super::class::ClassDescriptor;
use super::method::{MethodDescriptor, resolve_method};
use super::{ClassId, ResolutionState};
use crate::annotation::{Annotation, AnnotationParser};
use crate::config::ResolutionConfig;
use crate::errors::{ResolutionError, Result};
use crate::project::NamespaceFilter;
use crate::reflection::ReflectionSource;

/// Project-wide store of class descriptors.
///
/// Descriptors live in an arena indexed by [`ClassId`]. The name index is
/// written once per class name (first writer wins) and a descriptor is
/// registered before its resolution starts, so cross references between
/// independently triggered resolutions find the same instance.
pub struct ProjectRegistry<'a> {
    reflection: &'a dyn ReflectionSource,
    annotations: &'a dyn AnnotationParser,
    /// When false, every request creates a fresh descriptor
    share_descriptors: bool,
    descriptors: Vec<ClassDescriptor>,
    by_name: FxHashMap<String, ClassId>,
    /// Descriptors being resolved, innermost last
    resolution_stack: SmallVec<[ClassId; 8]>,
    /// Classes rendered by `resolve_all`, in output order
    rendered: Vec<ClassId>,
}

impl<'a> ProjectRegistry<'a> {
    pub fn new(
        reflection: &'a dyn ReflectionSource,
        annotations: &'a dyn AnnotationParser,
    ) -> Self {
        Self {
            reflection,
            annotations,
            share_descriptors: true,
            descriptors: Vec::new(),
            by_name: FxHashMap::default(),
            resolution_stack: SmallVec::new(),
            rendered: Vec::new(),
        }
    }

    /// Registry that never reuses a descriptor for parents and interfaces,
    /// as when a class is resolved on its own.
    pub fn unshared(
        reflection: &'a dyn ReflectionSource,
        annotations: &'a dyn AnnotationParser,
    ) -> Self {
        Self {
            share_descriptors: false,
            ..Self::new(reflection, annotations)
        }
    }

    pub fn from_config(
        config: &ResolutionConfig,
        reflection: &'a dyn ReflectionSource,
        annotations: &'a dyn AnnotationParser,
    ) -> Self {
        Self {
            share_descriptors: config.share_descriptors,
            ..Self::new(reflection, annotations)
        }
    }

    pub(crate) fn annotation_parser(&self) -> &dyn AnnotationParser {
        self.annotations
    }

    pub fn shares_descriptors(&self) -> bool {
        self.share_descriptors
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.by_name.contains_key(class_name)
    }

    /// Registered descriptor for a class name
    pub fn get(&self, class_name: &str) -> Result<&ClassDescriptor> {
        self.by_name
            .get(class_name)
            .map(|id| self.descriptor(*id))
            .ok_or_else(|| ResolutionError::ClassNotFound {
                class_name: class_name.to_string(),
            })
    }

    pub fn descriptor(&self, id: ClassId) -> &ClassDescriptor {
        &self.descriptors[id.index()]
    }

    /// Number of descriptors created, shared or not
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.descriptors.iter()
    }

    pub fn rendered_classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.rendered.iter().map(|id| self.descriptor(*id))
    }

    /// Existing descriptor for `class_name`, or a new one registered first
    /// and resolved afterwards.
    pub fn get_or_create(&mut self, class_name: &str) -> Result<ClassId> {
        if self.share_descriptors
            && let Some(&id) = self.by_name.get(class_name)
        {
            self.resolve(id)?;
            return Ok(id);
        }

        let facts = self.reflection.class(class_name)?;
        let id = ClassId::new(self.descriptors.len());
        self.descriptors.push(ClassDescriptor::new(id, facts));
        self.by_name.entry(class_name.to_string()).or_insert(id);

        self.resolve(id)?;
        Ok(id)
    }

    /// Resolve a class by name and borrow its descriptor
    pub fn resolve_class(&mut self, class_name: &str) -> Result<&ClassDescriptor> {
        let id = self.get_or_create(class_name)?;
        self.resolve(id)?;
        Ok(self.descriptor(id))
    }

    /// Populate parent, interfaces, dynamic methods and methods of a
    /// descriptor. A resolved descriptor is left untouched. Re-entering a
    /// descriptor that is still in progress means the type graph has a
    /// cycle and fails. A failed resolution leaves the descriptor pending
    /// so the next request retries it and reports the same error.
    pub fn resolve(&mut self, id: ClassId) -> Result<()> {
        let descriptor = self.descriptor(id);
        match descriptor.state {
            ResolutionState::Resolved => return Ok(()),
            ResolutionState::InProgress => return Err(self.reentrant(id)),
            ResolutionState::Pending => {}
        }

        // Unshared descriptors are distinct instances; the cycle shows up
        // as the same name higher up the stack.
        if !self.share_descriptors
            && self
                .resolution_stack
                .iter()
                .any(|other| self.descriptor(*other).name() == descriptor.name())
        {
            return Err(self.reentrant(id));
        }

        debug!(class = descriptor.name(), "Resolving class");

        self.descriptors[id.index()].state = ResolutionState::InProgress;
        self.resolution_stack.push(id);
        let result = self.run_resolution(id);
        self.resolution_stack.pop();

        let descriptor = &mut self.descriptors[id.index()];
        match result {
            Ok(()) => {
                descriptor.state = ResolutionState::Resolved;
                Ok(())
            }
            Err(err) => {
                descriptor.reset();
                Err(err)
            }
        }
    }

    fn reentrant(&self, id: ClassId) -> ResolutionError {
        ResolutionError::ReentrantResolution {
            class_name: self.descriptor(id).name().to_string(),
        }
    }

    fn run_resolution(&mut self, id: ClassId) -> Result<()> {
        if let Some(parent_name) = self.descriptor(id).facts().parent.clone() {
            let parent = self.get_or_create(&parent_name)?;
            self.resolve(parent)?;
            self.descriptors[id.index()].parent = Some(parent);
        }

        let interface_names = self.descriptor(id).facts().interfaces.clone();
        for interface_name in interface_names {
            let interface = self.get_or_create(&interface_name)?;
            self.resolve(interface)?;
            self.descriptors[id.index()].interfaces.push(interface);
        }

        let dynamic_methods = self.dynamic_methods(self.descriptor(id));
        self.descriptors[id.index()].dynamic_methods = dynamic_methods;

        let methods = self.resolve_methods(self.descriptor(id));
        self.descriptors[id.index()].methods = methods;

        Ok(())
    }

    fn dynamic_methods(&self, descriptor: &ClassDescriptor) -> BTreeMap<String, String> {
        let mut dynamic_methods = BTreeMap::new();

        let Some(doc_comment) = &descriptor.facts().doc_comment else {
            return dynamic_methods;
        };

        match self.annotations.parse(doc_comment) {
            Ok(annotations) => {
                for annotation in annotations {
                    match annotation {
                        Annotation::Method { name, rendered } => {
                            dynamic_methods.insert(name, rendered);
                        }
                        Annotation::Invalid(err) => warn!(
                            class = descriptor.name(),
                            "Skipping malformed annotation: {err}"
                        ),
                        Annotation::Param { .. } | Annotation::Return { .. } => {}
                    }
                }
            }
            Err(err) => warn!(
                class = descriptor.name(),
                "Ignoring class documentation: {err}"
            ),
        }

        dynamic_methods
    }

    /// Later facts for the same name replace earlier ones, so the most
    /// derived declaration wins.
    fn resolve_methods(&self, descriptor: &ClassDescriptor) -> BTreeMap<String, MethodDescriptor> {
        let mut methods = BTreeMap::new();

        for facts in &descriptor.facts().methods {
            let method = resolve_method(self, descriptor, facts);
            methods.insert(facts.name.clone(), method);
        }

        methods
    }

    /// Resolve every in-scope class of `class_names` and render them in
    /// iteration order, each block followed by a blank line.
    pub fn resolve_all<I, S>(&mut self, class_names: I, filter: &NamespaceFilter) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut output = String::new();

        for class_name in class_names {
            let class_name = class_name.as_ref();
            if !filter.is_in_scope(class_name) {
                continue;
            }

            let id = self.get_or_create(class_name)?;
            self.resolve(id)?;

            output.push_str(&self.descriptor(id).to_string());
            output.push('\n');
            self.rendered.push(id);
        }

        Ok(output)
    }
}
