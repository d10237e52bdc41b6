use crate::model::Keyframe;
use std::collections::HashMap;

/// One keyframed scalar field of a particle asset. Keys are addressed by
/// position in time order; insertion and removal renumber all later indices.
pub trait KeyframeField {
    fn key_count(&self) -> usize;
    fn key(&self, index: usize) -> Keyframe;
    /// Inserts a key in time order and returns its new index.
    fn add_key(&mut self, time: f32, value: f32) -> usize;
    fn remove_key(&mut self, index: usize);
    fn set_key_value(&mut self, index: usize, value: f32);
    /// Whether a key exists at exactly this time.
    fn has_key_at(&self, time: f32) -> bool;
}

/// Where a field lives on the asset: the top-level collection or one of the
/// sub-emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    Asset,
    Emitter(usize),
}

/// The particle-effect asset owning the keyframed fields. The editor never
/// persists or rebuilds the asset itself; it only edits field keys and asks
/// for a refresh when a gesture completes.
pub trait EffectAsset {
    fn emitter_count(&self) -> usize;
    fn has_field(&self, scope: FieldScope, name: &str) -> bool;
    fn field_mut(&mut self, scope: FieldScope, name: &str) -> Option<&mut dyn KeyframeField>;
    /// Rebuild whatever the host derives from the field data. Called on
    /// pointer release.
    fn refresh(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryField {
    keys: Vec<Keyframe>,
}

impl MemoryField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: &[(f32, f32)]) -> Self {
        let mut field = Self::new();
        for &(time, value) in keys {
            field.add_key(time, value);
        }
        field
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

impl KeyframeField for MemoryField {
    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn key(&self, index: usize) -> Keyframe {
        self.keys[index]
    }

    fn add_key(&mut self, time: f32, value: f32) -> usize {
        let index = self.keys.partition_point(|k| k.time < time);
        self.keys.insert(index, Keyframe::new(time, value));
        index
    }

    fn remove_key(&mut self, index: usize) {
        self.keys.remove(index);
    }

    fn set_key_value(&mut self, index: usize, value: f32) {
        self.keys[index].value = value;
    }

    fn has_key_at(&self, time: f32) -> bool {
        self.keys.iter().any(|k| k.time == time)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryEmitter {
    fields: HashMap<String, MemoryField>,
}

impl MemoryEmitter {
    pub fn with_field(mut self, name: &str, keys: &[(f32, f32)]) -> Self {
        self.fields.insert(name.to_owned(), MemoryField::from_keys(keys));
        self
    }
}

/// In-memory asset used by the demo binary and the test suites.
#[derive(Debug, Clone, Default)]
pub struct MemoryAsset {
    fields: HashMap<String, MemoryField>,
    emitters: Vec<MemoryEmitter>,
    refresh_count: usize,
}

impl MemoryAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, name: &str, keys: &[(f32, f32)]) {
        self.fields.insert(name.to_owned(), MemoryField::from_keys(keys));
    }

    pub fn push_emitter(&mut self, emitter: MemoryEmitter) {
        self.emitters.push(emitter);
    }

    pub fn field(&self, name: &str) -> Option<&MemoryField> {
        self.fields.get(name)
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }
}

impl EffectAsset for MemoryAsset {
    fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    fn has_field(&self, scope: FieldScope, name: &str) -> bool {
        match scope {
            FieldScope::Asset => self.fields.contains_key(name),
            FieldScope::Emitter(index) => self
                .emitters
                .get(index)
                .is_some_and(|e| e.fields.contains_key(name)),
        }
    }

    fn field_mut(&mut self, scope: FieldScope, name: &str) -> Option<&mut dyn KeyframeField> {
        let field = match scope {
            FieldScope::Asset => self.fields.get_mut(name),
            FieldScope::Emitter(index) => self.emitters.get_mut(index)?.fields.get_mut(name),
        };
        field.map(|f| f as &mut dyn KeyframeField)
    }

    fn refresh(&mut self) {
        self.refresh_count += 1;
        tracing::debug!(refreshes = self.refresh_count, "asset refresh requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_key_keeps_time_order_and_returns_the_new_index() {
        let mut field = MemoryField::new();
        assert_eq!(field.add_key(0.0, 1.0), 0);
        assert_eq!(field.add_key(1.0, 2.0), 1);
        assert_eq!(field.add_key(0.5, 3.0), 1);
        let times: Vec<f32> = field.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn removal_renumbers_later_keys() {
        let mut field = MemoryField::from_keys(&[(0.0, 0.0), (0.5, 1.0), (1.0, 2.0)]);
        field.remove_key(1);
        assert_eq!(field.key_count(), 2);
        assert_eq!(field.key(1).time, 1.0);
    }

    #[test]
    fn has_key_at_matches_exact_times_only() {
        let field = MemoryField::from_keys(&[(0.0, 0.0), (0.25, 1.0)]);
        assert!(field.has_key_at(0.25));
        assert!(!field.has_key_at(0.250001));
    }

    #[test]
    fn asset_scopes_resolve_independent_collections() {
        let mut asset = MemoryAsset::new();
        asset.insert_field("Scale", &[(0.0, 1.0)]);
        asset.push_emitter(MemoryEmitter::default().with_field("Speed", &[(0.0, 2.0)]));

        assert!(asset.has_field(FieldScope::Asset, "Scale"));
        assert!(!asset.has_field(FieldScope::Asset, "Speed"));
        assert!(asset.has_field(FieldScope::Emitter(0), "Speed"));
        assert!(!asset.has_field(FieldScope::Emitter(1), "Speed"));
        assert!(asset.field_mut(FieldScope::Emitter(0), "Speed").is_some());
        assert!(asset.field_mut(FieldScope::Emitter(3), "Speed").is_none());
    }
}
