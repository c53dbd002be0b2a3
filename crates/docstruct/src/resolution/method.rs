use std::fmt;

use tracing::{debug, warn};

use super::registry::ProjectRegistry;
use super::{ClassDescriptor, ClassId};
use crate::annotation::{Annotation, SELF_REFERENCE};
use crate::reflection::{DefaultValue, MethodFacts, ParameterFacts, Visibility};

/// Return type of a method whose declaration chain never names one
pub const UNRESOLVED_TYPE: &str = "???";

/// Return type of constructors and of `$this` annotations
pub const SELF_TYPE: &str = "self";

/// One resolved parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Annotated type, else structural type, else empty
    pub type_hint: String,
    pub name: String,
    pub is_optional: bool,
    /// Present only for optional, non-variadic parameters
    pub default: Option<DefaultValue>,
    pub by_reference: bool,
    pub is_variadic: bool,
}

impl Parameter {
    fn from_facts(facts: &ParameterFacts) -> Self {
        let default = (facts.is_optional && !facts.is_variadic).then(|| facts.default.clone());

        Self {
            type_hint: facts.type_hint.clone().unwrap_or_default(),
            name: facts.name.clone(),
            is_optional: facts.is_optional,
            default,
            by_reference: facts.by_reference,
            is_variadic: facts.is_variadic,
        }
    }

    /// Documentation may rename or retype a parameter, never change its
    /// optional, variadic or by-reference flags.
    fn annotate(&mut self, type_hint: String, variable: String) {
        if !type_hint.is_empty() {
            self.type_hint = type_hint;
        }
        if !variable.is_empty() {
            self.name = variable;
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.type_hint)?;
        if self.is_variadic {
            write!(f, "...")?;
        }
        if self.by_reference {
            write!(f, "&")?;
        }
        write!(f, "${}", self.name)?;
        if let Some(default) = &self.default {
            write!(f, "={default}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Null => write!(f, "null"),
            DefaultValue::Bool(true) => write!(f, "true"),
            DefaultValue::Bool(false) => write!(f, "false"),
            DefaultValue::Int(value) => write!(f, "{value}"),
            DefaultValue::Float(value) => write!(f, "{value}"),
            DefaultValue::String(value) => write!(f, "\"{value}\""),
            // Array contents are never rendered
            DefaultValue::Array(items) if items.is_empty() => write!(f, "array()"),
            DefaultValue::Array(_) => write!(f, "array(???)"),
            DefaultValue::Object { class_name } => write!(f, "{class_name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    owner: ClassId,
    name: String,
    declaring_class: String,
    visibility: Visibility,
    is_static: bool,
    is_abstract: bool,
    parameters: Vec<Parameter>,
    return_type: String,
}

impl MethodDescriptor {
    fn from_facts(owner: ClassId, facts: &MethodFacts) -> Self {
        Self {
            owner,
            name: facts.name.clone(),
            declaring_class: facts.declaring_class.clone(),
            visibility: facts.visibility,
            is_static: facts.is_static,
            is_abstract: facts.is_abstract,
            parameters: facts.parameters.iter().map(Parameter::from_facts).collect(),
            return_type: UNRESOLVED_TYPE.to_string(),
        }
    }

    /// Class this descriptor was resolved for
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class where the method is actually declared
    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    /// `<return> <visibility> [static ][abstract ]<name>(<parameters>)`
    ///
    /// Each optional parameter opens a bracket where it starts; all of them
    /// are closed together after the last parameter.
    pub fn render(&self, owner: &ClassDescriptor) -> String {
        let mut rendered = format!("{} {} ", self.return_type, self.visibility);

        if self.is_static {
            rendered.push_str("static ");
        }
        // Interface methods are implicitly abstract
        if self.is_abstract && !owner.is_interface() {
            rendered.push_str("abstract ");
        }

        rendered.push_str(&self.name);
        rendered.push('(');

        let mut open_optionals = 0;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                rendered.push_str(", ");
            }
            if parameter.is_optional {
                open_optionals += 1;
                rendered.push('[');
            }
            rendered.push_str(&parameter.to_string());
        }

        rendered.push_str(&"]".repeat(open_optionals));
        rendered.push(')');
        rendered
    }
}

/// Resolve one method of `owner`. The owner's parent and interfaces must
/// already be resolved.
pub(crate) fn resolve_method(
    registry: &ProjectRegistry<'_>,
    owner: &ClassDescriptor,
    facts: &MethodFacts,
) -> MethodDescriptor {
    let mut method = MethodDescriptor::from_facts(owner.id(), facts);

    let annotated_return = match &facts.doc_comment {
        Some(doc_comment) => apply_annotations(registry, owner, &mut method, doc_comment),
        None => None,
    };

    method.return_type = match annotated_return {
        Some(return_type) => return_type,
        None if facts.is_constructor() => SELF_TYPE.to_string(),
        None => match facts.return_type.as_deref() {
            Some(return_type) if !return_type.is_empty() => return_type.to_string(),
            _ => inherit_return_type(registry, owner, &method.name)
                .unwrap_or_else(|| UNRESOLVED_TYPE.to_string()),
        },
    };

    debug!(
        class = owner.name(),
        method = method.name.as_str(),
        return_type = method.return_type.as_str(),
        "Resolved method"
    );

    method
}

/// Merge `@param` annotations positionally into the structural parameters
/// and return the annotated return type, if any.
fn apply_annotations(
    registry: &ProjectRegistry<'_>,
    owner: &ClassDescriptor,
    method: &mut MethodDescriptor,
    doc_comment: &str,
) -> Option<String> {
    let annotations = match registry.annotation_parser().parse(doc_comment) {
        Ok(annotations) => annotations,
        Err(err) => {
            warn!(
                class = owner.name(),
                method = method.name.as_str(),
                "Ignoring method documentation: {err}"
            );
            return None;
        }
    };

    let mut annotated_return = None;
    let mut param_index = 0;

    for annotation in annotations {
        match annotation {
            // The i-th @param describes the i-th declared parameter; names
            // are not compared.
            Annotation::Param {
                type_hint,
                variable,
            } => {
                match method.parameters.get_mut(param_index) {
                    Some(parameter) => parameter.annotate(type_hint, variable),
                    None => debug!(
                        class = owner.name(),
                        method = method.name.as_str(),
                        "Ignoring @param {variable} beyond declared parameters"
                    ),
                }
                param_index += 1;
            }
            Annotation::Return { type_hint } if type_hint.is_empty() => {}
            Annotation::Return { type_hint } => {
                annotated_return = Some(if type_hint == SELF_REFERENCE {
                    SELF_TYPE.to_string()
                } else {
                    type_hint
                });
            }
            Annotation::Invalid(err) => warn!(
                class = owner.name(),
                method = method.name.as_str(),
                "Skipping malformed annotation: {err}"
            ),
            Annotation::Method { .. } => {}
        }
    }

    annotated_return
}

/// Parent first, then interfaces in declaration order. The first
/// same-named method found decides, whatever its own return type is.
fn inherit_return_type(
    registry: &ProjectRegistry<'_>,
    owner: &ClassDescriptor,
    method_name: &str,
) -> Option<String> {
    owner
        .parent()
        .into_iter()
        .chain(owner.interfaces().iter().copied())
        .find_map(|ancestor| registry.descriptor(ancestor).method(method_name))
        .map(|method| method.return_type.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(facts: ParameterFacts) -> Parameter {
        Parameter::from_facts(&facts)
    }

    #[test]
    fn test_default_value_rendering() {
        let cases = [
            (DefaultValue::Bool(true), "true"),
            (DefaultValue::Bool(false), "false"),
            (DefaultValue::Null, "null"),
            (DefaultValue::Array(vec![]), "array()"),
            (
                DefaultValue::Array(vec![DefaultValue::Int(1), DefaultValue::Int(2)]),
                "array(???)",
            ),
            (DefaultValue::String("x".to_string()), "\"x\""),
            (DefaultValue::Int(42), "42"),
            (DefaultValue::Float(1.5), "1.5"),
            (
                DefaultValue::Object {
                    class_name: "App\\Point".to_string(),
                },
                "App\\Point",
            ),
        ];

        for (value, expected) in cases {
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn test_parameter_markers_compose_variadic_then_reference() {
        let rendered = parameter(
            ParameterFacts::new("items")
                .with_type("array")
                .variadic()
                .by_reference(),
        )
        .to_string();

        assert_eq!(rendered, "array ...&$items");
    }

    #[test]
    fn test_variadic_parameter_has_no_default() {
        let parameter = parameter(ParameterFacts::new("rest").variadic());

        assert!(parameter.is_optional);
        assert_eq!(parameter.default, None);
        assert_eq!(parameter.to_string(), " ...$rest");
    }

    #[test]
    fn test_annotation_never_changes_structural_flags() {
        let mut parameter = parameter(
            ParameterFacts::new("flag")
                .with_type("bool")
                .optional(DefaultValue::Bool(false)),
        );

        parameter.annotate("boolean".to_string(), "enabled".to_string());

        assert_eq!(parameter.to_string(), "boolean $enabled=false");
        assert!(parameter.is_optional);

        parameter.annotate(String::new(), String::new());
        assert_eq!(parameter.type_hint, "boolean");
        assert_eq!(parameter.name, "enabled");
    }
}
