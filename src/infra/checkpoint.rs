// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores a trained ConvNet using burn's CompactRecorder.
//
//   {dir}/
//     model.mpk           ← final weights (half-precision MessagePack)
//     model_config.json   ← ConvNetConfig, to rebuild the layers
//     train_config.json   ← TrainConfig, to rebuild the partitions
//
// Loading needs a model of the same architecture; the recorder
// fails on any parameter shape mismatch.

use anyhow::{Context, Result};
use burn::{
    config::Config,
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{ConvNet, ConvNetConfig};

const MODEL_FILE: &str = "model";
const MODEL_CONFIG_FILE: &str = "model_config.json";
const TRAIN_CONFIG_FILE: &str = "train_config.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// For writing: creates the directory if it is missing.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// For reading: the directory must already exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            anyhow::bail!(
                "Checkpoint dir '{}' does not exist. Run 'train --output-dir' first.",
                dir.display()
            );
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_model<B: Backend>(&self, model: &ConvNet<B>) -> Result<()> {
        let path = self.dir.join(MODEL_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;
        tracing::debug!("Saved model weights under '{}'", self.dir.display());
        Ok(())
    }

    /// Load the saved weights into `model`, which must have the saved architecture.
    pub fn load_model<B: Backend>(&self, model: ConvNet<B>, device: &B::Device) -> Result<ConvNet<B>> {
        let path = self.dir.join(MODEL_FILE);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load model from '{}'", path.display()))?;
        Ok(model.load_record(record))
    }

    pub fn save_model_config(&self, cfg: &ConvNetConfig) -> Result<()> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        cfg.save(&path)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_model_config(&self) -> Result<ConvNetConfig> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        ConvNetConfig::load(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read '{}': {e}", path.display()))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a valid training config", path.display()))
    }
}
