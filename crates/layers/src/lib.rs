pub mod imagery;
pub mod layer;
pub mod raster;
pub mod symbology;

pub use imagery::*;
pub use layer::*;
