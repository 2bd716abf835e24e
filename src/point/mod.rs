pub mod control_point;
pub mod control_points;
pub use control_point::*;
pub use control_points::*;
