//! Controller discovery.
//!
//! # Responsibilities
//! - Hand the registry the set of available controllers at startup
//! - Derive controller names from the base name of discovered units
//!
//! # Design Decisions
//! - Discovery is pluggable; the registry only sees `Vec<ControllerHandle>`
//! - A missing or unreadable directory yields no controllers, never an error

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::controller::ControllerHandle;

/// Source of controllers for [`ControllerRegistry::build`].
///
/// [`ControllerRegistry::build`]: crate::registry::ControllerRegistry::build
pub trait ControllerProvider {
    /// Return every controller this provider knows about.
    fn controllers(&self) -> Vec<ControllerHandle>;
}

/// Controllers registered in code.
#[derive(Debug, Clone, Default)]
pub struct StaticControllers {
    controllers: Vec<ControllerHandle>,
}

impl StaticControllers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, controller: ControllerHandle) -> Self {
        self.controllers.push(controller);
        self
    }
}

impl FromIterator<ControllerHandle> for StaticControllers {
    fn from_iter<I: IntoIterator<Item = ControllerHandle>>(iter: I) -> Self {
        Self {
            controllers: iter.into_iter().collect(),
        }
    }
}

impl ControllerProvider for StaticControllers {
    fn controllers(&self) -> Vec<ControllerHandle> {
        self.controllers.clone()
    }
}

/// Enables catalogued controllers whose unit is present in a directory.
///
/// Each directory entry is a unit; its base name (file stem) is the
/// controller name, so `controllers/users.toml` and `controllers/users`
/// both enable the `users` controller. Entries with no catalogued
/// controller are skipped.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
    catalog: BTreeMap<String, ControllerHandle>,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            catalog: BTreeMap::new(),
        }
    }

    /// Add a controller that can be enabled by a unit of the same name.
    pub fn with(mut self, controller: ControllerHandle) -> Self {
        self.catalog.insert(controller.name().to_string(), controller);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base names of the units found in the directory, sorted.
    pub fn unit_names(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    directory = %self.root.display(),
                    error = %e,
                    "Controller directory unreadable, no controllers loaded"
                );
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .filter(|name| !name.is_empty() && !name.starts_with('.'))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl ControllerProvider for DirectoryProvider {
    fn controllers(&self) -> Vec<ControllerHandle> {
        self.unit_names()
            .into_iter()
            .filter_map(|name| match self.catalog.get(&name) {
                Some(controller) => Some(controller.clone()),
                None => {
                    tracing::debug!(unit = %name, "No controller catalogued for unit");
                    None
                }
            })
            .collect()
    }
}
