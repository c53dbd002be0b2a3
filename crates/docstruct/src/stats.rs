use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolution::{ProjectRegistry, UNRESOLVED_TYPE};

/// Counters for one resolution run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStats {
    /// Descriptors created, including out-of-scope ancestors
    pub classes: usize,
    /// Classes rendered into the output document
    pub in_scope_classes: usize,
    /// Methods rendered under their declaring class
    pub methods: usize,
    pub dynamic_methods: usize,
    /// Rendered methods whose return type stayed `???`
    pub unresolved_returns: usize,
    pub duration_seconds: f64,
}

impl ResolutionStats {
    pub fn collect(registry: &ProjectRegistry<'_>, duration: Duration) -> Self {
        let mut stats = Self {
            classes: registry.len(),
            duration_seconds: duration.as_secs_f64(),
            ..Self::default()
        };

        for class in registry.rendered_classes() {
            stats.in_scope_classes += 1;
            stats.dynamic_methods += class.dynamic_methods().len();

            for method in class.own_methods() {
                stats.methods += 1;
                if method.return_type() == UNRESOLVED_TYPE {
                    stats.unresolved_returns += 1;
                }
            }
        }

        stats
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
