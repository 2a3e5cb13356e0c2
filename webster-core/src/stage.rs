//! The stage: every object on the canvas plus the current selection.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::object::{now_millis, Bounds, ObjectId, StageObject, Transform};
use crate::{CanvasError, CanvasResult};

/// Compare two objects by layering order.
///
/// Primary key is `z_index`. Ties resolve on `updated_at`: ascending for
/// the default and foreground layers, descending for background (negative)
/// layers, so the most recently touched background object stays furthest back.
fn layer_order(a: &StageObject, b: &StageObject) -> Ordering {
    match a.transform.z_index.cmp(&b.transform.z_index) {
        Ordering::Equal => {
            if a.transform.z_index < 0 {
                b.updated_at.cmp(&a.updated_at)
            } else {
                a.updated_at.cmp(&b.updated_at)
            }
        }
        other => other,
    }
}

/// All objects placed on the canvas, indexed by ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stage {
    /// Objects by ID.
    objects: HashMap<ObjectId, StageObject>,
    /// Currently selected object IDs, in selection order.
    selected: Vec<ObjectId>,
}

impl Stage {
    /// Create an empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the stage.
    pub fn add(&mut self, object: StageObject) -> ObjectId {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    /// Remove an object from the stage.
    ///
    /// The object is also dropped from the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn remove(&mut self, id: &ObjectId) -> CanvasResult<StageObject> {
        self.selected.retain(|oid| oid != id);
        self.objects
            .remove(id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))
    }

    /// Get an object by ID.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&StageObject> {
        self.objects.get(&id)
    }

    /// Get a mutable reference to an object by ID.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut StageObject> {
        self.objects.get_mut(&id)
    }

    /// Iterate over all objects, in no particular order.
    pub fn objects(&self) -> impl Iterator<Item = &StageObject> {
        self.objects.values()
    }

    /// Number of objects on the stage.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Check if the stage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Replace an object's transform, bumping its modification time.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn update_transform(&mut self, id: ObjectId, transform: Transform) -> CanvasResult<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        object.transform = transform;
        object.touch(now_millis());
        Ok(())
    }

    /// Replace the entire object list, clearing the selection.
    pub fn replace_all(&mut self, objects: Vec<StageObject>) {
        tracing::debug!("Replacing stage contents with {} objects", objects.len());
        self.selected.clear();
        self.objects = objects.into_iter().map(|o| (o.id, o)).collect();
    }

    /// Remove every object and clear the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected.clear();
    }

    /// All objects sorted back-to-front for drawing.
    #[must_use]
    pub fn ordered(&self) -> Vec<&StageObject> {
        let mut objects: Vec<_> = self.objects.values().collect();
        objects.sort_by(|a, b| layer_order(a, b));
        objects
    }

    fn max_z(&self) -> i32 {
        self.objects
            .values()
            .map(|o| o.transform.z_index)
            .max()
            .unwrap_or(0)
    }

    fn min_z(&self) -> i32 {
        self.objects
            .values()
            .map(|o| o.transform.z_index)
            .min()
            .unwrap_or(0)
    }

    /// Move an object above everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn bring_to_front(&mut self, id: ObjectId) -> CanvasResult<()> {
        let top = self.max_z();
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        object.transform.z_index = top + 1;
        object.touch(now_millis());
        Ok(())
    }

    /// Move an object below everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn send_to_back(&mut self, id: ObjectId) -> CanvasResult<()> {
        let bottom = self.min_z();
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        object.transform.z_index = bottom - 1;
        object.touch(now_millis());
        Ok(())
    }

    /// Raise an object one layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn raise(&mut self, id: ObjectId) -> CanvasResult<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        object.transform.z_index += 1;
        object.touch(now_millis());
        Ok(())
    }

    /// Lower an object one layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn lower(&mut self, id: ObjectId) -> CanvasResult<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        object.transform.z_index -= 1;
        object.touch(now_millis());
        Ok(())
    }

    /// Add an object to the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn select(&mut self, id: ObjectId) -> CanvasResult<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        object.selected = true;
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        Ok(())
    }

    /// Make an object the only selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn select_only(&mut self, id: ObjectId) -> CanvasResult<()> {
        self.deselect_all();
        self.select(id)
    }

    /// Deselect all objects.
    pub fn deselect_all(&mut self) {
        for id in &self.selected {
            if let Some(object) = self.objects.get_mut(id) {
                object.selected = false;
            }
        }
        self.selected.clear();
    }

    /// Currently selected object IDs, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Currently selected objects.
    pub fn selected_objects(&self) -> impl Iterator<Item = &StageObject> {
        self.selected.iter().filter_map(|id| self.objects.get(id))
    }

    /// Union bounding box of the selection, used by the multi-select
    /// transformer. `None` when nothing is selected.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for object in self.selected_objects() {
            let b = object.bounds();
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
        bounds
    }

    /// Translate every selected object by the given delta.
    pub fn move_selected(&mut self, dx: f32, dy: f32) {
        let timestamp = now_millis();
        for id in self.selected.clone() {
            if let Some(object) = self.objects.get_mut(&id) {
                object.transform.x += dx;
                object.transform.y += dy;
                object.touch(timestamp);
            }
        }
    }

    /// Find the object at the given frame coordinates.
    ///
    /// Returns the topmost draggable object by effective z-order. Callers
    /// with a scaled viewport must unproject screen coordinates first
    /// (divide by the frame scale).
    #[must_use]
    pub fn object_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        let mut hits: Vec<_> = self
            .objects
            .values()
            .filter(|o| o.draggable && o.contains_point(x, y))
            .collect();
        hits.sort_by(|a, b| layer_order(a, b));
        hits.last().map(|o| o.id)
    }
}
