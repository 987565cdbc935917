//! ONNX model loader

use crate::config::ModelConfig;
use crate::models::classifier::{Classifier, OnnxClassifier};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

static RUNTIME: OnceLock<()> = OnceLock::new();

/// Commit the process-wide ONNX Runtime environment.
///
/// Only the first successful call commits; later calls are no-ops, so
/// model reloads on every prediction page visit reuse the environment.
pub fn init_runtime() -> Result<()> {
    if RUNTIME.get().is_some() {
        return Ok(());
    }
    ort::init().commit()?;
    let _ = RUNTIME.set(());
    info!("ONNX Runtime environment committed");
    Ok(())
}

pub fn runtime_initialized() -> bool {
    RUNTIME.get().is_some()
}

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for probabilities
    pub output_name: String,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        init_runtime()?;
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }

        info!(
            model = %name,
            path = %path.display(),
            threads = self.onnx_threads,
            "Loading ONNX model"
        );

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        // XGBoost exports carry "label" and "probabilities"
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }
}

/// Produces a fresh classifier each time the prediction page is rendered.
pub trait ModelSource {
    fn load(&self) -> Result<Box<dyn Classifier>>;
}

/// Model source reading an ONNX artifact from disk.
#[derive(Debug, Clone)]
pub struct OnnxModelSource {
    path: PathBuf,
    onnx_threads: usize,
}

impl OnnxModelSource {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            path: config.model_path.clone(),
            onnx_threads: config.onnx_threads,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for OnnxModelSource {
    fn load(&self) -> Result<Box<dyn Classifier>> {
        let loader = ModelLoader::with_threads(self.onnx_threads)?;
        let name = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        let model = loader.load_model(&self.path, name)?;
        Ok(Box::new(OnnxClassifier::new(model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let source = OnnxModelSource::new(&ModelConfig {
            model_path: PathBuf::from("/nonexistent/xgboost.onnx"),
            threshold: 0.5,
            onnx_threads: 1,
        });

        assert!(source.path().ends_with("xgboost.onnx"));
        let err = source.load().err().unwrap();
        assert!(err.to_string().contains("Model file not found"));
    }

    #[test]
    fn test_runtime_commits_once() {
        init_runtime().unwrap();
        assert!(runtime_initialized());

        // Reloading a model must not re-commit the environment.
        init_runtime().unwrap();
        ModelLoader::with_threads(1).unwrap();
        assert!(runtime_initialized());
    }
}
