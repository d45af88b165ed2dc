//! Handle-based resource registries
//!
//! Geometries and materials are owned by the scene's registries and referenced
//! from mesh nodes by opaque handle, so a descriptor can be shared by any
//! number of meshes. Removing nodes never touches registry entries.

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a geometry stored in the scene's registry
    pub struct GeometryHandle;

    /// Handle to a material stored in the scene's registry
    pub struct MaterialHandle;
}

/// Arena of shared resources addressed by slotmap handles
#[derive(Debug, Clone)]
pub struct ResourceRegistry<K: slotmap::Key, V> {
    entries: SlotMap<K, V>,
}

impl<K: slotmap::Key, V> Default for ResourceRegistry<K, V> {
    fn default() -> Self {
        Self {
            entries: SlotMap::with_key(),
        }
    }
}

impl<K: slotmap::Key, V> ResourceRegistry<K, V> {
    /// Insert a resource, returning its handle
    pub fn insert(&mut self, value: V) -> K {
        self.entries.insert(value)
    }

    /// Look up a resource by handle
    pub fn get(&self, key: K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Look up a resource mutably by handle
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Remove a resource, returning it if the handle was live
    pub fn remove(&mut self, key: K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
