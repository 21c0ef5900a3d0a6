pub mod annotation;
pub mod marker;
pub mod model;
pub mod visibility;

pub use annotation::*;
pub use marker::*;
pub use model::*;
pub use visibility::*;
