use crate::render::RenderedTimeline;
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything one run of the generator produced
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub generated_at: String,
    pub output_dir: PathBuf,
    pub timelines: Vec<RenderedTimeline>,
    pub failures: Vec<String>,
}

impl RenderReport {
    pub fn new(output_dir: &Path, timelines: Vec<RenderedTimeline>, failures: Vec<String>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            output_dir: output_dir.to_path_buf(),
            timelines,
            failures,
        }
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write report")?;
        Ok(())
    }
}
