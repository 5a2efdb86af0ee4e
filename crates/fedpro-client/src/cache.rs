//! In-memory bidirectional handle caches.
//!
//! Names resolved through the RTI are cached for the lifetime of the
//! session; a cache hit answers without a network round-trip. Forward and
//! reverse maps are maintained together so they stay mutual inverses, and
//! the per-class / per-interaction sub-maps are created lazily when their
//! owner handle is first inserted.

use std::collections::HashMap;

use fedpro_proto::handles::{
    AttributeHandle, InteractionClassHandle, ObjectClassHandle, ObjectInstanceHandle,
    ParameterHandle,
};

/// Per-session handle caches for all five name domains.
#[derive(Debug, Default)]
pub struct HandleCache {
    object_classes_by_name: HashMap<String, ObjectClassHandle>,
    object_class_names: HashMap<ObjectClassHandle, String>,
    attributes_by_name: HashMap<ObjectClassHandle, HashMap<String, AttributeHandle>>,
    attribute_names: HashMap<ObjectClassHandle, HashMap<AttributeHandle, String>>,
    interactions_by_name: HashMap<String, InteractionClassHandle>,
    interaction_names: HashMap<InteractionClassHandle, String>,
    parameters_by_name: HashMap<InteractionClassHandle, HashMap<String, ParameterHandle>>,
    parameter_names: HashMap<InteractionClassHandle, HashMap<ParameterHandle, String>>,
    object_instances_by_name: HashMap<String, ObjectInstanceHandle>,
    object_instance_names: HashMap<ObjectInstanceHandle, String>,
}

impl HandleCache {
    /// Fresh, empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached object class handle for a name.
    #[must_use]
    pub fn object_class_by_name(&self, name: &str) -> Option<&ObjectClassHandle> {
        self.object_classes_by_name.get(name)
    }

    /// Cached name of an object class handle.
    #[must_use]
    pub fn object_class_name(&self, handle: &ObjectClassHandle) -> Option<&str> {
        self.object_class_names.get(handle).map(String::as_str)
    }

    /// Record a resolved object class, creating its attribute sub-maps.
    pub fn insert_object_class(&mut self, name: String, handle: ObjectClassHandle) {
        self.attributes_by_name.entry(handle.clone()).or_default();
        self.attribute_names.entry(handle.clone()).or_default();
        self.object_class_names.insert(handle.clone(), name.clone());
        self.object_classes_by_name.insert(name, handle);
    }

    /// Cached attribute handle for a name within a class.
    #[must_use]
    pub fn attribute_by_name(
        &self,
        object_class: &ObjectClassHandle,
        name: &str,
    ) -> Option<&AttributeHandle> {
        self.attributes_by_name.get(object_class).and_then(|attrs| attrs.get(name))
    }

    /// Cached name of an attribute handle within a class.
    #[must_use]
    pub fn attribute_name(
        &self,
        object_class: &ObjectClassHandle,
        handle: &AttributeHandle,
    ) -> Option<&str> {
        self.attribute_names
            .get(object_class)
            .and_then(|attrs| attrs.get(handle))
            .map(String::as_str)
    }

    /// Record a resolved attribute within a class.
    pub fn insert_attribute(
        &mut self,
        object_class: &ObjectClassHandle,
        name: String,
        handle: AttributeHandle,
    ) {
        self.attribute_names
            .entry(object_class.clone())
            .or_default()
            .insert(handle.clone(), name.clone());
        self.attributes_by_name
            .entry(object_class.clone())
            .or_default()
            .insert(name, handle);
    }

    /// Cached interaction class handle for a name.
    #[must_use]
    pub fn interaction_by_name(&self, name: &str) -> Option<&InteractionClassHandle> {
        self.interactions_by_name.get(name)
    }

    /// Cached name of an interaction class handle.
    #[must_use]
    pub fn interaction_name(&self, handle: &InteractionClassHandle) -> Option<&str> {
        self.interaction_names.get(handle).map(String::as_str)
    }

    /// Record a resolved interaction class, creating its parameter
    /// sub-maps.
    pub fn insert_interaction(&mut self, name: String, handle: InteractionClassHandle) {
        self.parameters_by_name.entry(handle.clone()).or_default();
        self.parameter_names.entry(handle.clone()).or_default();
        self.interaction_names.insert(handle.clone(), name.clone());
        self.interactions_by_name.insert(name, handle);
    }

    /// Cached parameter handle for a name within an interaction class.
    #[must_use]
    pub fn parameter_by_name(
        &self,
        interaction_class: &InteractionClassHandle,
        name: &str,
    ) -> Option<&ParameterHandle> {
        self.parameters_by_name.get(interaction_class).and_then(|params| params.get(name))
    }

    /// Cached name of a parameter handle within an interaction class.
    #[must_use]
    pub fn parameter_name(
        &self,
        interaction_class: &InteractionClassHandle,
        handle: &ParameterHandle,
    ) -> Option<&str> {
        self.parameter_names
            .get(interaction_class)
            .and_then(|params| params.get(handle))
            .map(String::as_str)
    }

    /// Record a resolved parameter within an interaction class.
    pub fn insert_parameter(
        &mut self,
        interaction_class: &InteractionClassHandle,
        name: String,
        handle: ParameterHandle,
    ) {
        self.parameter_names
            .entry(interaction_class.clone())
            .or_default()
            .insert(handle.clone(), name.clone());
        self.parameters_by_name
            .entry(interaction_class.clone())
            .or_default()
            .insert(name, handle);
    }

    /// Cached object instance handle for a name.
    #[must_use]
    pub fn object_instance_by_name(&self, name: &str) -> Option<&ObjectInstanceHandle> {
        self.object_instances_by_name.get(name)
    }

    /// Cached name of an object instance handle.
    #[must_use]
    pub fn object_instance_name(&self, handle: &ObjectInstanceHandle) -> Option<&str> {
        self.object_instance_names.get(handle).map(String::as_str)
    }

    /// Record a registered object instance.
    pub fn insert_object_instance(&mut self, name: String, handle: ObjectInstanceHandle) {
        self.object_instance_names.insert(handle.clone(), name.clone());
        self.object_instances_by_name.insert(name, handle);
    }

    /// Drop every cached entry (session teardown).
    pub fn clear(&mut self) {
        self.object_classes_by_name.clear();
        self.object_class_names.clear();
        self.attributes_by_name.clear();
        self.attribute_names.clear();
        self.interactions_by_name.clear();
        self.interaction_names.clear();
        self.parameters_by_name.clear();
        self.parameter_names.clear();
        self.object_instances_by_name.clear();
        self.object_instance_names.clear();
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn object_class_maps_are_mutual_inverses() {
        let mut cache = HandleCache::new();
        let handle = ObjectClassHandle::new(vec![0xAB]);
        cache.insert_object_class("Ball".to_string(), handle.clone());

        assert_eq!(cache.object_class_by_name("Ball"), Some(&handle));
        assert_eq!(cache.object_class_name(&handle), Some("Ball"));
        assert_eq!(cache.object_class_by_name("NoSuch"), None);
    }

    #[test]
    fn class_insertion_creates_attribute_sub_maps() {
        let mut cache = HandleCache::new();
        let class = ObjectClassHandle::new(vec![0xAB]);
        cache.insert_object_class("Ball".to_string(), class.clone());

        // Sub-maps exist but are empty
        assert_eq!(cache.attribute_by_name(&class, "Position"), None);

        let attr = AttributeHandle::new(vec![0x07]);
        cache.insert_attribute(&class, "Position".to_string(), attr.clone());
        assert_eq!(cache.attribute_by_name(&class, "Position"), Some(&attr));
        assert_eq!(cache.attribute_name(&class, &attr), Some("Position"));
    }

    #[test]
    fn parameters_are_scoped_per_interaction() {
        let mut cache = HandleCache::new();
        let fire = InteractionClassHandle::new(vec![0x01]);
        let detonate = InteractionClassHandle::new(vec![0x02]);
        cache.insert_interaction("WeaponFire".to_string(), fire.clone());
        cache.insert_interaction("Detonation".to_string(), detonate.clone());

        let param = ParameterHandle::new(vec![0x03]);
        cache.insert_parameter(&fire, "FuseType".to_string(), param.clone());

        assert_eq!(cache.parameter_by_name(&fire, "FuseType"), Some(&param));
        assert_eq!(cache.parameter_by_name(&detonate, "FuseType"), None);
    }

    #[test]
    fn clear_empties_every_domain() {
        let mut cache = HandleCache::new();
        let class = ObjectClassHandle::new(vec![0xAB]);
        cache.insert_object_class("Ball".to_string(), class.clone());
        cache.insert_attribute(&class, "Position".to_string(), AttributeHandle::new(vec![7]));
        cache.insert_interaction("WeaponFire".to_string(), InteractionClassHandle::new(vec![1]));
        cache.insert_object_instance("Ball_1".to_string(), ObjectInstanceHandle::new(vec![9]));

        cache.clear();

        assert_eq!(cache.object_class_by_name("Ball"), None);
        assert_eq!(cache.attribute_by_name(&class, "Position"), None);
        assert_eq!(cache.interaction_by_name("WeaponFire"), None);
        assert_eq!(cache.object_instance_by_name("Ball_1"), None);
    }

    proptest! {
        #[test]
        fn inverse_property_holds_for_any_insertion(
            entries in prop::collection::hash_map(
                "[a-zA-Z][a-zA-Z0-9.]{0,16}",
                prop::collection::vec(any::<u8>(), 1..8),
                1..16,
            )
        ) {
            let mut cache = HandleCache::new();
            for (name, data) in &entries {
                cache.insert_object_class(name.clone(), ObjectClassHandle::new(data.clone()));
            }

            // handle_of(N) = H implies name_of(H) = N for the latest insertions
            for (name, handle) in entries
                .iter()
                .map(|(n, d)| (n, ObjectClassHandle::new(d.clone())))
            {
                if cache.object_class_by_name(name) == Some(&handle) {
                    prop_assert_eq!(cache.object_class_name(&handle), Some(name.as_str()));
                }
            }
        }
    }
}
