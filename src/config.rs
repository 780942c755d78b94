use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a sensible default, so `magpie` runs with no configuration
/// once the model is downloaded.
pub struct Config {
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Path to the samples file used by `magpie batch`
    pub samples_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("MAGPIE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embedding::download::default_model_dir());

        let samples_path = env::var("MAGPIE_SAMPLES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./samples.json"));

        Ok(Self {
            model_dir,
            samples_path,
        })
    }

    /// Check that the embedding model files are on disk.
    /// Call this before any operation that needs to score text.
    pub fn require_model(&self) -> Result<()> {
        if !crate::embedding::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `magpie download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
