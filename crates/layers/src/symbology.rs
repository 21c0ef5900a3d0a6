#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    /// Compositing opacity in `[0, 1]`.
    pub alpha: f32,
}

impl LayerStyle {
    pub const fn new(visible: bool, alpha: f32) -> Self {
        Self { visible, alpha }
    }

    pub const fn hidden() -> Self {
        Self::new(false, 1.0)
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 1.0,
        }
    }
}
