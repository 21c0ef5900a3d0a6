pub mod capture;
pub mod options;
pub mod viewer;

pub use capture::*;
pub use options::*;
pub use viewer::*;
