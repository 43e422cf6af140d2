use crate::component::ComponentDefinition;
use std::collections::HashMap;

/// Component definitions of one surface, keyed by identifier.
///
/// Definitions accumulate across `surfaceUpdate` batches and are only dropped
/// by [`clear`](Registry::clear) when the surface is deleted.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    components: HashMap<String, ComponentDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite each definition in order.
    ///
    /// A later entry with the same identifier, in the same batch or a later
    /// one, replaces the earlier definition as a whole.
    pub fn register(&mut self, batch: impl IntoIterator<Item = ComponentDefinition>) {
        for definition in batch {
            self.components.insert(definition.id.clone(), definition);
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered identifiers in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}
