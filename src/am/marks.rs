//! Numbered map marks: a growable list of map-space points. Labels are
//! the index + 1 at draw time, so removing the last mark renumbers
//! nothing. Exposed to the save/load collaborator through plain accessors;
//! points round-trip exactly.

use crate::fixed::MapPoint;

const INITIAL_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct MarkStore {
    points: Vec<MapPoint>,
}

impl Default for MarkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkStore {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append a mark. Amortized O(1); backing storage doubles when full.
    pub fn add(&mut self, p: MapPoint) {
        self.points.push(p);
    }

    /// Drop the newest mark; no-op when empty. Storage is kept.
    pub fn remove_last(&mut self) {
        self.points.pop();
    }

    /// Forget every mark (new level, explicit clear); storage is kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<MapPoint> {
        self.points.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = MapPoint> + '_ {
        self.points.iter().copied()
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
