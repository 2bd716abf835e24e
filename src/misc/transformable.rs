/// Apply a transform to the control data of a curve
/// Curves transform their control points and then resample, so the samples follow the transform.
pub trait Transformable<M>: Clone {
    fn transform(&mut self, transform: M);

    /// A transformed copy, `self` is left untouched
    fn transformed(&self, transform: M) -> Self {
        let mut moved = self.clone();
        moved.transform(transform);
        moved
    }
}
