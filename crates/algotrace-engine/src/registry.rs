//! Id-to-algorithm lookup table, filled once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::contract::{Algorithm, Category, Descriptor};

/// Registered algorithms in registration order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Arc<dyn Algorithm>>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `algorithm`. A second registration under the same id replaces the
    /// first but keeps its position in the listing.
    pub fn register(&mut self, algorithm: impl Algorithm + 'static) {
        self.register_arc(Arc::new(algorithm));
    }

    pub fn register_arc(&mut self, algorithm: Arc<dyn Algorithm>) {
        let id = algorithm.descriptor().id;
        match self.index.get(id) {
            Some(&slot) => {
                warn!(algorithm = id, "replacing registered algorithm");
                self.entries[slot] = algorithm;
            }
            None => {
                debug!(algorithm = id, "registered algorithm");
                self.index.insert(id, self.entries.len());
                self.entries.push(algorithm);
            }
        }
    }

    #[must_use]
    pub fn with(mut self, algorithm: impl Algorithm + 'static) -> Self {
        self.register(algorithm);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Algorithm>> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    pub fn descriptor(&self, id: &str) -> Option<&Descriptor> {
        self.get(id).map(|a| a.descriptor())
    }

    pub fn list_all(&self) -> impl Iterator<Item = &Descriptor> {
        self.entries.iter().map(|a| a.descriptor())
    }

    pub fn list_by_category(&self, category: Category) -> impl Iterator<Item = &Descriptor> {
        self.list_all().filter(move |d| d.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.list_all().map(|d| d.id))
            .finish()
    }
}
