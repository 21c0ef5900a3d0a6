pub mod controller;
pub mod shapes;

pub use controller::*;
pub use shapes::*;
