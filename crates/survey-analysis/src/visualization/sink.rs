//! Destinations for rendered figures.

use super::RenderedFigure;
use crate::error::{AnalysisError, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Trait for presenting rendered figures.
///
/// Implementations must be `Send + Sync` so a pipeline holding a sink can
/// be moved to a worker thread.
pub trait FigureSink: Send + Sync {
    /// Present one figure. Called once per selected plot, in selection order.
    fn present(&self, figure: &RenderedFigure) -> Result<()>;
}

/// Sink that only logs each figure. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFigureSink;

impl FigureSink for LoggingFigureSink {
    fn present(&self, figure: &RenderedFigure) -> Result<()> {
        info!(
            "Rendered '{}' for '{}' ({} bytes of SVG)",
            figure.title,
            figure.dataset,
            figure.svg.len()
        );
        Ok(())
    }
}

/// Sink that keeps every figure in memory.
#[derive(Debug, Default)]
pub struct MemoryFigureSink {
    figures: Mutex<Vec<RenderedFigure>>,
}

impl MemoryFigureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the figures presented so far.
    pub fn figures(&self) -> Vec<RenderedFigure> {
        self.figures.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.figures.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.lock().is_empty()
    }

    /// Remove and return all collected figures.
    pub fn take(&self) -> Vec<RenderedFigure> {
        std::mem::take(&mut *self.figures.lock())
    }
}

impl FigureSink for MemoryFigureSink {
    fn present(&self, figure: &RenderedFigure) -> Result<()> {
        self.figures.lock().push(figure.clone());
        Ok(())
    }
}

/// Sink that saves each figure as an `.svg` file in a directory.
#[derive(Debug, Clone)]
pub struct SvgDirectorySink {
    dir: PathBuf,
}

impl SvgDirectorySink {
    /// Create the sink, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AnalysisError::FigureSink(format!(
                "cannot create figure directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FigureSink for SvgDirectorySink {
    fn present(&self, figure: &RenderedFigure) -> Result<()> {
        let path = self.dir.join(figure.file_name());
        std::fs::write(&path, &figure.svg).map_err(|e| {
            AnalysisError::FigureSink(format!("cannot write '{}': {}", path.display(), e))
        })?;
        debug!("Saved figure to {}", path.display());
        Ok(())
    }
}
