/// Reverse the direction of a parametrized object
/// A reversed curve passes through `point_at(1 - t)` of the original; knot vectors are mirrored inside their domain.
pub trait Invertible: Clone {
    /// Reverse in place, refreshing whatever is derived from the reversed data
    fn invert(&mut self);

    /// A reversed copy, `self` is left untouched
    fn inverse(&self) -> Self {
        let mut reversed = self.clone();
        reversed.invert();
        reversed
    }
}
