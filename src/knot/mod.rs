pub mod knot_vector;
pub use knot_vector::*;

/// A distinct knot value and how many times it repeats in a knot vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnotMultiplicity<T> {
    knot: T,
    multiplicity: usize,
}

impl<T> KnotMultiplicity<T> {
    pub fn new(knot: T, multiplicity: usize) -> Self {
        Self { knot, multiplicity }
    }

    pub fn knot(&self) -> &T {
        &self.knot
    }

    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    pub(crate) fn increment_multiplicity(&mut self) {
        self.multiplicity += 1;
    }
}
