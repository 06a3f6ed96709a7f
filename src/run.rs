//! Run descriptors and the on-disk paths they imply.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{Result, SweepError};
use crate::parser::Artifact;

/// Where the executable reads its inputs and leaves its timing artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub base_name: String,
}

impl ArtifactLayout {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }

    fn stem(&self, grid_size: u32) -> String {
        format!("{}{}", self.base_name, grid_size)
    }

    /// `<input_dir>/<base><size>.txt`
    pub fn input_path(&self, grid_size: u32) -> PathBuf {
        self.input_dir.join(format!("{}.txt", self.stem(grid_size)))
    }

    /// `<output_dir>/<base><size>`
    pub fn output_dir(&self, grid_size: u32) -> PathBuf {
        self.output_dir.join(self.stem(grid_size))
    }

    /// `<output_dir>/<base><size>/<base><size>_<artifact>.txt`
    ///
    /// The worker count is not part of the path: every worker-count run for a
    /// given size overwrites the same three files.
    pub fn artifact_path(&self, grid_size: u32, artifact: Artifact) -> PathBuf {
        let stem = self.stem(grid_size);
        self.output_dir(grid_size)
            .join(format!("{}_{}.txt", stem, artifact.suffix()))
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::new("inputs", "outputs", "bacteria")
    }
}

/// One point of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunDescriptor {
    pub grid_size: u32,
    pub worker_count: u32,
}

impl RunDescriptor {
    pub fn new(grid_size: u32, worker_count: u32) -> Self {
        Self { grid_size, worker_count }
    }

    /// Process count handed to the executable: one extra for the coordinator.
    pub fn ranks(&self) -> u32 {
        self.worker_count + 1
    }

    pub fn input_path(&self, layout: &ArtifactLayout) -> PathBuf {
        layout.input_path(self.grid_size)
    }

    pub fn output_dir(&self, layout: &ArtifactLayout) -> PathBuf {
        layout.output_dir(self.grid_size)
    }

    pub fn artifact_path(&self, layout: &ArtifactLayout, artifact: Artifact) -> PathBuf {
        layout.artifact_path(self.grid_size, artifact)
    }

    /// Removes any artifacts left over from an earlier run of this grid size.
    /// Files that are already gone are fine; any other failure is reported.
    pub fn clear_artifacts(&self, layout: &ArtifactLayout) -> Result<()> {
        for artifact in Artifact::ALL {
            let path = self.artifact_path(layout, artifact);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SweepError::ClearArtifact {
                        grid_size: self.grid_size,
                        worker_count: self.worker_count,
                        artifact,
                        path,
                        source,
                    })
                }
            }
        }
        Ok(())
    }
}
