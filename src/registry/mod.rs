//! Controller registry.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ControllerProvider (static list / directory units)
//!     → attach injected values to each handle
//!     → freeze as immutable ControllerRegistry
//!
//! Per request:
//!     dispatcher → registry.get(name) → Some(handle) | None
//! ```
//!
//! # Design Decisions
//! - Built once, never mutated; shared via Arc without locks
//! - Lookup is exact: no prefix or case-insensitive matching

pub mod controller;
pub mod provider;

use std::collections::HashMap;
use std::sync::Arc;

pub use controller::{ActionFn, ActionResult, ControllerBuilder, ControllerHandle, InjectedValues};
pub use provider::{ControllerProvider, DirectoryProvider, StaticControllers};

/// Immutable mapping from controller name to handle.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<ControllerHandle>>,
}

impl ControllerRegistry {
    /// Build the registry from a provider, attaching `injected` to every
    /// controller. A later controller with a duplicate name replaces the
    /// earlier one.
    pub fn build<P: ControllerProvider + ?Sized>(provider: &P, injected: InjectedValues) -> Self {
        let mut controllers = HashMap::new();

        for mut controller in provider.controllers() {
            controller.attach(injected.clone());
            let name = controller.name().to_string();
            tracing::debug!(
                controller = %name,
                actions = ?controller.action_names(),
                "Registered controller"
            );
            if controllers.insert(name.clone(), Arc::new(controller)).is_some() {
                tracing::warn!(controller = %name, "Duplicate controller name, keeping the last one");
            }
        }

        tracing::info!(count = controllers.len(), "Controller registry built");
        Self { controllers }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ControllerHandle>> {
        self.controllers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    /// Controller names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
