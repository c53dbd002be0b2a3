use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use docstruct::errors::ReflectionError;
use docstruct::reflection::{ClassFacts, InMemoryReflection, ReflectionSource};
use docstruct::{ClassMap, ResolutionConfig};

// Fixture projects live at the root of the workspace under fixtures/<name>/:
//
// - reflection.json  declaration table loaded into InMemoryReflection
// - classmap.json    autoloader class map listing the project classes
// - config.toml      ResolutionConfig for the run
// - expected.txt     rendered document

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("testing crate lives two levels below the workspace root")
        .join("fixtures")
}

pub fn fixture_path(fixture: &str, file_name: &str) -> PathBuf {
    fixtures_dir().join(fixture).join(file_name)
}

pub fn load_reflection(fixture: &str) -> InMemoryReflection {
    InMemoryReflection::from_file(&fixture_path(fixture, "reflection.json"))
        .expect("Failed to load reflection fixture")
}

pub fn load_class_map(fixture: &str) -> ClassMap {
    ClassMap::from_file(&fixture_path(fixture, "classmap.json"))
        .expect("Failed to load class map fixture")
}

pub fn load_config(fixture: &str) -> ResolutionConfig {
    ResolutionConfig::from_file(&fixture_path(fixture, "config.toml"))
        .expect("Failed to load config fixture")
}

pub fn expected_output(fixture: &str) -> String {
    fs::read_to_string(fixture_path(fixture, "expected.txt"))
        .expect("Failed to read expected output")
}

/// Reflection wrapper counting the queries that reach the inner source.
pub struct CountingReflection<R> {
    inner: R,
    calls: Cell<usize>,
}

impl<R: ReflectionSource> CountingReflection<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<R: ReflectionSource> ReflectionSource for CountingReflection<R> {
    fn class(&self, name: &str) -> Result<ClassFacts, ReflectionError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.class(name)
    }
}

/// Route `tracing` output to the test writer. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
