//! Spatial Index Module
//!
//! R-tree over drawable bounding boxes, used by the select tool for hit
//! testing. Point queries are O(log n) instead of a scan over every object.

use crate::types::{Drawable, ObjectId};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A drawable's bounding box as stored in the tree.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub id: ObjectId,
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl SpatialEntry {
    pub fn new(id: ObjectId, drawable: &Drawable) -> Self {
        let (min_x, min_y, max_x, max_y) = drawable.bounds();
        Self {
            id,
            min: [min_x, min_y],
            max: [max_x, max_y],
        }
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Spatial index for the selectable drawables of one surface.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<ObjectId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh the entry for `id`.
    pub fn insert(&mut self, id: ObjectId, drawable: &Drawable) {
        self.remove(id);
        let entry = SpatialEntry::new(id, drawable);
        self.tree.insert(entry);
        self.entries.insert(id, entry);
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                self.tree.remove(&entry);
                true
            }
            None => false,
        }
    }

    /// Ids of every entry whose box contains the point, in no particular order.
    pub fn query_point(&self, x: f32, y: f32) -> Vec<ObjectId> {
        let point = AABB::from_point([x, y]);
        self.tree
            .locate_in_envelope_intersecting(&point)
            .filter(|entry| entry.contains_point(x, y))
            .map(|entry| entry.id)
            .collect()
    }

    /// Ids of every entry intersecting a rectangle.
    pub fn query_rect(&self, min: [f32; 2], max: [f32; 2]) -> Vec<ObjectId> {
        let envelope = AABB::from_corners(min, max);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.id)
            .collect()
    }

    /// Replace the whole index in one bulk load.
    pub fn rebuild<'a, I>(&mut self, drawables: I)
    where
        I: Iterator<Item = (ObjectId, &'a Drawable)>,
    {
        let entries: Vec<SpatialEntry> = drawables
            .map(|(id, drawable)| SpatialEntry::new(id, drawable))
            .collect();
        self.entries = entries.iter().map(|e| (e.id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
