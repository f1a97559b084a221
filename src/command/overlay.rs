use egui::Pos2;

use crate::element::{DrawingObject, ObjectId};
use crate::geometry::TransformMatrix;

/// The committed drawing objects, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    objects: Vec<DrawingObject>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[DrawingObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawingObject> {
        self.objects.iter()
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&DrawingObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DrawingObject> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    /// Insert at `index`, clamped to the end of the list. Returns the index used.
    pub fn insert(&mut self, index: usize, object: DrawingObject) -> usize {
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        index
    }

    pub fn push(&mut self, object: DrawingObject) {
        self.objects.push(object);
    }

    /// Remove by identity, returning the object and the index it had.
    pub fn remove(&mut self, id: ObjectId) -> Option<(usize, DrawingObject)> {
        let index = self.index_of(id)?;
        Some((index, self.objects.remove(index)))
    }

    /// Topmost object under `pos`.
    pub fn hit_test(&self, pos: Pos2, stroke_padding: f32, text_padding: f32) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|object| object.hit_test_padded(pos, stroke_padding, text_padding))
            .map(DrawingObject::id)
    }

    pub fn transform_all(&mut self, matrix: &TransformMatrix) {
        for object in &mut self.objects {
            object.transform(matrix);
        }
    }

    /// Keep only objects for which `keep` returns true; returns how many were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&DrawingObject) -> bool) -> usize {
        let before = self.objects.len();
        self.objects.retain(keep);
        before - self.objects.len()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
