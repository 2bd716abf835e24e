use nalgebra::Point3;
use slotmap::{new_key_type, SlotMap};

use crate::misc::{CurveError, FloatingPoint};

use super::ControlPoint;

new_key_type! {
    /// Stable handle of a [ControlPoint] inside a curve.
    /// Stays valid across insertions and removals of other points.
    pub struct PointHandle;
}

/// Ordered control points stored in an arena
/// The arena owns the points, the order is a list of handles into it.
#[derive(Clone, Debug)]
pub struct ControlPoints<T: FloatingPoint> {
    arena: SlotMap<PointHandle, ControlPoint<T>>,
    order: Vec<PointHandle>,
}

impl<T: FloatingPoint> Default for ControlPoints<T> {
    fn default() -> Self {
        Self {
            arena: SlotMap::with_key(),
            order: vec![],
        }
    }
}

impl<T: FloatingPoint> ControlPoints<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a point and return its handle
    pub fn push(&mut self, point: ControlPoint<T>) -> PointHandle {
        let handle = self.arena.insert(point);
        self.order.push(handle);
        handle
    }

    /// Insert a point before the point at `index`
    pub fn insert(&mut self, index: usize, point: ControlPoint<T>) -> anyhow::Result<PointHandle> {
        anyhow::ensure!(
            index <= self.order.len(),
            "Insertion index {} is out of bounds for {} control points",
            index,
            self.order.len()
        );
        let handle = self.arena.insert(point);
        self.order.insert(index, handle);
        Ok(handle)
    }

    /// Remove the point and return it
    pub fn remove(&mut self, handle: PointHandle) -> anyhow::Result<ControlPoint<T>> {
        let point = self
            .arena
            .remove(handle)
            .ok_or(CurveError::InvalidPointHandle)?;
        self.order.retain(|h| *h != handle);
        Ok(point)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.order.clear();
    }

    pub fn contains(&self, handle: PointHandle) -> bool {
        self.arena.contains_key(handle)
    }

    pub fn get(&self, handle: PointHandle) -> Option<&ControlPoint<T>> {
        self.arena.get(handle)
    }

    pub fn get_mut(&mut self, handle: PointHandle) -> Option<&mut ControlPoint<T>> {
        self.arena.get_mut(handle)
    }

    /// Position of the handle in the curve order
    pub fn index_of(&self, handle: PointHandle) -> Option<usize> {
        self.order.iter().position(|h| *h == handle)
    }

    pub fn set_position(&mut self, handle: PointHandle, position: Point3<T>) -> anyhow::Result<()> {
        self.get_mut(handle)
            .ok_or(CurveError::InvalidPointHandle)?
            .set_position(position);
        Ok(())
    }

    pub fn set_weight(&mut self, handle: PointHandle, weight: T) -> anyhow::Result<()> {
        self.get_mut(handle)
            .ok_or(CurveError::InvalidPointHandle)?
            .set_weight(weight);
        Ok(())
    }

    /// Handles in curve order
    pub fn handles(&self) -> &[PointHandle] {
        &self.order
    }

    /// Points in curve order
    pub fn iter(&self) -> impl Iterator<Item = &ControlPoint<T>> {
        self.order.iter().map(|h| &self.arena[*h])
    }

    /// Snapshot of the points in curve order
    pub fn to_vec(&self) -> Vec<ControlPoint<T>> {
        self.iter().copied().collect()
    }

    /// Reverse the curve order, handles are kept
    pub fn reverse(&mut self) {
        self.order.reverse();
    }
}

impl<T: FloatingPoint> FromIterator<ControlPoint<T>> for ControlPoints<T> {
    fn from_iter<I: IntoIterator<Item = ControlPoint<T>>>(iter: I) -> Self {
        let mut points = Self::new();
        iter.into_iter().for_each(|p| {
            points.push(p);
        });
        points
    }
}
