use serde::{Deserialize, Serialize};

/// Construction options of the globe host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub shadows: bool,
    pub should_animate: bool,
    /// Keep the last rendered frame readable after presentation. Frame
    /// capture fails without it.
    pub preserve_drawing_buffer: bool,
    pub info_box: bool,
    pub selection_indicator: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            shadows: true,
            should_animate: true,
            preserve_drawing_buffer: true,
            info_box: false,
            selection_indicator: false,
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: ViewerOptions = serde_json::from_str(r#"{"width": 320, "shadows": false}"#)
            .expect("parse");
        assert_eq!(
            opts,
            ViewerOptions {
                width: 320,
                shadows: false,
                ..ViewerOptions::default()
            }
        );
        assert!(opts.preserve_drawing_buffer);
        assert!(!opts.info_box && !opts.selection_indicator);
    }
}
