//! Bundled resources and project overrides, see [`Resources`].
//!
//! Every resource has a slash-separated, lower-cased name. Names ending in
//! `.tera` are Tera templates and are rendered through [`Resources::render`];
//! everything else is served verbatim by [`Resources::raw`].
//!
//! A project may shadow any bundled resource by placing a file with the same
//! relative name under `<root>/.rigger/templates/`.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::Serialize;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::error::ResourceError;

/// Directory (relative to the project root) searched for overrides.
pub const OVERRIDE_DIR: &str = ".rigger/templates";

pub const GITIGNORE_FALLBACK: &str = "gitignore/rust.gitignore";
pub const README_TEMPLATE: &str = "readme.md.tera";

// ---------------------------------------------------------------------------
// Embedded resources, baked in at compile time via include_str!
// ---------------------------------------------------------------------------

const BUNDLED: &[(&str, &str)] = &[
    (GITIGNORE_FALLBACK, include_str!("bundled/Rust.gitignore")),
    (README_TEMPLATE, include_str!("bundled/readme.md.tera")),
];

/// Lower-cased, `/`-joined name for a path relative to a resource root.
fn resource_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_template(name: &str) -> bool {
    name.ends_with(".tera")
}

/// Every file below `dir`, keyed by resource name. A missing `dir` is empty.
fn load_overrides(dir: &Path) -> Result<BTreeMap<String, String>, ResourceError> {
    let mut loaded = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(loaded);
    }
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| ResourceError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let text = std::fs::read_to_string(entry.path()).map_err(|source| ResourceError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        loaded.insert(resource_name(rel), text);
    }
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Resolved resource set: bundled files overlaid with project overrides.
#[derive(Debug)]
pub struct Resources {
    tera: Tera,
    files: BTreeMap<String, String>,
    overridden: Vec<String>,
}

impl Resources {
    /// Bundled resources only.
    pub fn new() -> Result<Self, ResourceError> {
        Self::with_overrides(None)
    }

    /// Bundled resources overlaid with every file found under `dir`.
    /// A missing directory is not an error.
    pub fn with_overrides(dir: Option<&Path>) -> Result<Self, ResourceError> {
        let mut files: BTreeMap<String, String> = BUNDLED
            .iter()
            .map(|(name, content)| (resource_name(Path::new(name)), (*content).to_string()))
            .collect();

        let mut overridden = Vec::new();
        if let Some(dir) = dir {
            for (name, content) in load_overrides(dir)? {
                tracing::debug!(resource = %name, "project override loaded");
                overridden.push(name.clone());
                files.insert(name, content);
            }
        }

        let mut tera = Tera::default();
        let templates: Vec<(String, String)> = files
            .iter()
            .filter(|(name, _)| is_template(name))
            .map(|(name, content)| (name.clone(), content.clone()))
            .collect();
        tera.add_raw_templates(templates)?;

        Ok(Self { tera, files, overridden })
    }

    /// Resources for a project rooted at `root` (overrides from [`OVERRIDE_DIR`]).
    pub fn for_project(root: &Path) -> Result<Self, ResourceError> {
        Self::with_overrides(Some(&root.join(OVERRIDE_DIR)))
    }

    /// Verbatim contents of a resource.
    pub fn raw(&self, name: &str) -> Result<&str, ResourceError> {
        let key = resource_name(Path::new(name));
        self.files
            .get(&key)
            .map(String::as_str)
            .ok_or(ResourceError::NotFound(key))
    }

    /// Render a `.tera` resource with `context`.
    pub fn render<C: Serialize>(&self, name: &str, context: &C) -> Result<String, ResourceError> {
        let key = resource_name(Path::new(name));
        if !is_template(&key) || !self.files.contains_key(&key) {
            return Err(ResourceError::NotFound(key));
        }
        let ctx = Context::from_value(serde_json::to_value(context)?)?;
        Ok(self.tera.render(&key, &ctx)?)
    }

    /// All resource names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Names supplied by the project rather than bundled.
    pub fn overridden(&self) -> &[String] {
        &self.overridden
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
