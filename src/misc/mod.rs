pub mod binomial;
pub mod end_points;
pub mod error;
pub mod floating_point;
pub mod invertible;
pub mod transformable;

pub use binomial::*;
pub use end_points::*;
pub use error::*;
pub use floating_point::*;
pub use invertible::*;
pub use transformable::*;
