use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::annotation::AnnotationParser;
use crate::config::ResolutionConfig;
use crate::project::ClassListSource;
use crate::reflection::ReflectionSource;
use crate::resolution::ProjectRegistry;
use crate::stats::ResolutionStats;

/// Rendered document and statistics of one project run
#[derive(Debug, Clone)]
pub struct ProjectRun {
    pub output: String,
    pub stats: ResolutionStats,
}

/// Resolve every in-scope class listed by `class_source` and render the
/// project document.
pub fn run_project<C>(
    config: &ResolutionConfig,
    class_source: &C,
    reflection: &dyn ReflectionSource,
    parser: &dyn AnnotationParser,
) -> Result<ProjectRun>
where
    C: ClassListSource + ?Sized,
{
    let start_time = Instant::now();

    let class_names = class_source
        .class_names()
        .context("Failed to enumerate project classes")?;
    let filter = config.filter();

    info!(
        classes = class_names.len(),
        include = ?config.include_prefixes,
        exclude = ?config.exclude_prefixes,
        share_descriptors = config.share_descriptors,
        "Starting project resolution"
    );

    let mut registry = ProjectRegistry::from_config(config, reflection, parser);
    let output = registry
        .resolve_all(&class_names, &filter)
        .context("Failed to resolve project classes")?;

    let stats = ResolutionStats::collect(&registry, start_time.elapsed());
    info!(
        in_scope = stats.in_scope_classes,
        descriptors = stats.classes,
        methods = stats.methods,
        unresolved = stats.unresolved_returns,
        "Resolved project in {:.2}s",
        stats.duration_seconds
    );

    Ok(ProjectRun { output, stats })
}
