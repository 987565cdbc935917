//! Laundering classifier: model loading and inference

pub mod classifier;
pub mod inference;
pub mod loader;

pub use classifier::{Classifier, OnnxClassifier};
pub use inference::{InferenceEngine, PredictionError};
pub use loader::{init_runtime, ModelLoader, ModelSource, OnnxModelSource};
