#![allow(clippy::needless_range_loop)]

mod builder;
mod curve;
mod knot;
mod misc;
mod point;

pub mod prelude {
    pub use crate::builder::*;
    pub use crate::curve::*;
    pub use crate::knot::*;
    pub use crate::misc::*;
    pub use crate::point::*;
}
