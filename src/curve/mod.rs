pub mod curve;
pub mod record;
pub use curve::*;
pub use record::*;
