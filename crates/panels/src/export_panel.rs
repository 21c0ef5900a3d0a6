use std::path::PathBuf;
use std::sync::Arc;

use formats::{EncodeError, ExportKind, JpegQuality};
use tokio::task::JoinHandle;
use viewer::{CaptureError, SharedViewer};

/// Receives finished export files.
pub trait ExportSink: Send + Sync {
    /// Stores `bytes` under `file_name` and returns where it went.
    fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// Writes exports into a directory, overwriting earlier files of the same
/// name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("an export is already in progress")]
    InProgress,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("writing export failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("export task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub kind: ExportKind,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Captures the host frame and encodes it off the host thread.
///
/// At most one export runs at a time; starting another while one is still
/// running is rejected with [`ExportError::InProgress`].
pub struct ExportPanel {
    viewer: SharedViewer,
    sink: Arc<dyn ExportSink>,
    kind: ExportKind,
    quality: JpegQuality,
    slot: Option<JoinHandle<Result<ExportOutcome, ExportError>>>,
}

impl ExportPanel {
    pub fn new(viewer: SharedViewer, sink: Arc<dyn ExportSink>) -> Self {
        Self {
            viewer,
            sink,
            kind: ExportKind::default(),
            quality: JpegQuality::default(),
            slot: None,
        }
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ExportKind) {
        self.kind = kind;
    }

    pub fn quality(&self) -> JpegQuality {
        self.quality
    }

    /// Sets JPEG quality from a fraction in `[0.1, 1.0]`, snapped to tenths.
    pub fn set_quality(&mut self, fraction: f32) -> Result<JpegQuality, ExportError> {
        self.quality = JpegQuality::from_fraction(fraction)?;
        Ok(self.quality)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Captures the current frame and starts encoding it.
    ///
    /// Must be called from within a tokio runtime. A finished export whose
    /// result was never collected is discarded.
    pub fn start(&mut self) -> Result<(), ExportError> {
        if self.is_pending() {
            return Err(ExportError::InProgress);
        }
        let frame = self.viewer.borrow().capture_frame()?;
        let (kind, quality, sink) = (self.kind, self.quality, self.sink.clone());
        tracing::info!(%kind, quality = quality.as_fraction(), "export started");

        self.slot = Some(tokio::task::spawn_blocking(move || -> Result<ExportOutcome, ExportError> {
            let bytes = formats::encode(kind, &frame, quality)?;
            let path = sink.save(&kind.file_name(), &bytes)?;
            Ok(ExportOutcome {
                kind,
                path,
                bytes: bytes.len(),
            })
        }));
        Ok(())
    }

    /// Waits for the running export. `None` if nothing was started.
    pub async fn finish(&mut self) -> Option<Result<ExportOutcome, ExportError>> {
        let handle = self.slot.take()?;
        let result = match handle.await {
            Ok(result) => result,
            Err(join) => Err(ExportError::Task(join.to_string())),
        };
        match &result {
            Ok(outcome) => {
                tracing::info!(path = %outcome.path.display(), bytes = outcome.bytes, "export saved")
            }
            Err(err) => tracing::error!(error = %err, "export failed"),
        }
        Some(result)
    }

    /// Starts an export and waits for it.
    pub async fn export(&mut self) -> Result<ExportOutcome, ExportError> {
        self.start()?;
        self.finish()
            .await
            .unwrap_or_else(|| Err(ExportError::Task("export slot empty".to_string())))
    }
}

impl std::fmt::Debug for ExportPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPanel")
            .field("kind", &self.kind)
            .field("quality", &self.quality)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use viewer::{Viewer, ViewerOptions};

    fn small_viewer(preserve: bool) -> SharedViewer {
        Viewer::shared(ViewerOptions {
            width: 32,
            height: 24,
            preserve_drawing_buffer: preserve,
            ..ViewerOptions::default()
        })
    }

    /// Blocks the first save until released.
    struct GatedSink {
        gate: Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl ExportSink for GatedSink {
        fn save(&self, file_name: &str, _bytes: &[u8]) -> std::io::Result<PathBuf> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(PathBuf::from(file_name))
        }
    }

    #[tokio::test]
    async fn writes_each_kind_to_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = ExportPanel::new(small_viewer(true), Arc::new(DirectorySink::new(dir.path())));

        for kind in ExportKind::ALL {
            panel.set_kind(kind);
            let outcome = panel.export().await.expect("exported");
            assert_eq!(outcome.path, dir.path().join(kind.file_name()));
            let written = std::fs::read(&outcome.path).unwrap();
            assert_eq!(written.len(), outcome.bytes);
        }
        assert!(dir.path().join("screenshot.pdf").exists());
        assert!(dir.path().join("screenshot.svg").exists());
    }

    #[tokio::test]
    async fn second_start_while_pending_is_rejected() {
        let (release, gate) = std::sync::mpsc::channel();
        let sink = Arc::new(GatedSink {
            gate: Mutex::new(gate),
        });
        let mut panel = ExportPanel::new(small_viewer(true), sink);
        panel.set_kind(ExportKind::Png);

        panel.start().expect("first export");
        assert!(panel.is_pending());
        assert!(matches!(panel.start(), Err(ExportError::InProgress)));

        release.send(()).unwrap();
        let outcome = panel.finish().await.expect("started").expect("saved");
        assert_eq!(outcome.path, PathBuf::from("screenshot.png"));
        assert!(!panel.is_pending());

        // Slot is free again.
        release.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(10), panel.export())
            .await
            .expect("no hang")
            .expect("second export");
    }

    #[tokio::test]
    async fn capture_failure_surfaces_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = ExportPanel::new(small_viewer(false), Arc::new(DirectorySink::new(dir.path())));
        assert!(matches!(
            panel.start(),
            Err(ExportError::Capture(CaptureError::DrawingBufferNotPreserved))
        ));
        assert!(!panel.is_pending());
        assert!(panel.finish().await.is_none());
    }

    #[test]
    fn quality_is_validated_and_snapped() {
        let mut panel = ExportPanel::new(small_viewer(true), Arc::new(DirectorySink::new(".")));
        assert_eq!(panel.quality().tenths(), 8);
        assert_eq!(panel.set_quality(0.46).unwrap().tenths(), 5);
        assert!(matches!(
            panel.set_quality(1.5),
            Err(ExportError::Encode(EncodeError::QualityOutOfRange(_)))
        ));
        assert_eq!(panel.quality().tenths(), 5);
        assert_eq!(panel.kind(), ExportKind::Pdf);
    }
}
