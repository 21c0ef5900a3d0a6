use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EncodeError;

/// Base name every export is saved under.
pub const EXPORT_STEM: &str = "screenshot";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    #[default]
    Pdf,
    Jpg,
    Png,
    Svg,
}

impl ExportKind {
    pub const ALL: [ExportKind; 4] = [
        ExportKind::Pdf,
        ExportKind::Jpg,
        ExportKind::Png,
        ExportKind::Svg,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Jpg => "jpg",
            ExportKind::Png => "png",
            ExportKind::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "application/pdf",
            ExportKind::Jpg => "image/jpeg",
            ExportKind::Png => "image/png",
            ExportKind::Svg => "image/svg+xml",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export kind: {0:?}")]
pub struct UnknownExportKind(pub String);

impl FromStr for ExportKind {
    type Err = UnknownExportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("jpeg") {
            return Ok(ExportKind::Jpg);
        }
        ExportKind::ALL
            .into_iter()
            .find(|k| k.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownExportKind(s.to_string()))
    }
}

/// JPEG quality in tenths, `1..=10` (0.1 to 1.0).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub const MIN: JpegQuality = JpegQuality(1);
    pub const MAX: JpegQuality = JpegQuality(10);

    /// Snaps a fraction in `[0.1, 1.0]` to the nearest tenth.
    pub fn from_fraction(fraction: f32) -> Result<Self, EncodeError> {
        if !fraction.is_finite() || !(0.1 - 1e-4..=1.0 + 1e-4).contains(&fraction) {
            return Err(EncodeError::QualityOutOfRange(fraction));
        }
        let tenths = (fraction * 10.0).round().clamp(1.0, 10.0) as u8;
        Ok(Self(tenths))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_fraction(self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// Quality on the encoder's 1..=100 scale.
    pub fn percent(self) -> u8 {
        self.0 * 10
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(8)
    }
}
