pub mod export_panel;
pub mod layer_panel;
pub mod model_panel;

pub use export_panel::*;
pub use layer_panel::*;
pub use model_panel::*;
