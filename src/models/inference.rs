//! Single-transaction inference for laundering detection

use crate::config::ModelConfig;
use crate::encoder::CategoricalEncoders;
use crate::error::{EncodingError, ValidationErrors};
use crate::feature_extractor::FeatureExtractor;
use crate::form::PredictionForm;
use crate::models::classifier::Classifier;
use crate::repository::TransactionTable;
use crate::types::report::PredictionReport;
use thiserror::Error;
use tracing::{debug, info};

/// Why a submitted form produced no verdict.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("inference failed: {0:#}")]
    Model(#[from] anyhow::Error),
}

/// Scores submitted transactions with one classifier.
pub struct InferenceEngine {
    extractor: FeatureExtractor,
    classifier: Box<dyn Classifier>,
    threshold: f64,
}

impl InferenceEngine {
    /// Fit encoders on `reference` and wrap `classifier`.
    pub fn new(
        reference: &TransactionTable,
        classifier: Box<dyn Classifier>,
        threshold: f64,
    ) -> Self {
        let encoders = CategoricalEncoders::fit(reference);
        info!(
            model = %classifier.name(),
            reference = %reference.name(),
            threshold = threshold,
            "Inference engine initialized"
        );

        Self {
            extractor: FeatureExtractor::new(encoders),
            classifier,
            threshold,
        }
    }

    pub fn from_config(
        reference: &TransactionTable,
        classifier: Box<dyn Classifier>,
        config: &ModelConfig,
    ) -> Self {
        Self::new(reference, classifier, config.threshold)
    }

    pub fn encoders(&self) -> &CategoricalEncoders {
        self.extractor.encoders()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Validate, encode and score one form submission.
    ///
    /// Resubmitting the same form re-runs the whole pipeline; nothing is
    /// carried over between calls.
    pub fn predict(&mut self, form: &PredictionForm) -> Result<PredictionReport, PredictionError> {
        let candidate = form.validate()?;
        let features = self.extractor.extract(&candidate)?;

        debug!(features = ?features, "Feature vector built");

        let probability = self.classifier.predict_proba(&features)?;
        let report = PredictionReport::new(probability, self.threshold)
            .with_features(self.extractor.feature_names(), &features);

        info!(
            report_id = %report.report_id,
            probability = probability,
            verdict = %report.verdict,
            "Prediction complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::Result;

    /// Classifier returning a fixed probability and remembering its input.
    pub struct FixedClassifier {
        pub probability: f64,
        pub calls: usize,
        pub last_features: Vec<f32>,
    }

    impl FixedClassifier {
        pub fn boxed(probability: f64) -> Box<dyn Classifier> {
            Box::new(Self {
                probability,
                calls: 0,
                last_features: Vec::new(),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict_proba(&mut self, features: &[f32]) -> Result<f64> {
            self.calls += 1;
            self.last_features = features.to_vec();
            Ok(self.probability)
        }
    }

    /// Classifier whose every call fails.
    pub struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict_proba(&mut self, _features: &[f32]) -> Result<f64> {
            anyhow::bail!("session closed")
        }
    }
}
