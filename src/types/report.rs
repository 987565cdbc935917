//! Prediction verdicts and reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary outcome of a laundering prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    SuspectLaundering,
    LowPossibility,
}

impl Verdict {
    /// Classify a class-1 probability against the decision threshold.
    /// A probability equal to the threshold is not suspect.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability > threshold {
            Verdict::SuspectLaundering
        } else {
            Verdict::LowPossibility
        }
    }

    /// Predicted class label (1 = laundering).
    pub fn class(&self) -> u8 {
        match self {
            Verdict::SuspectLaundering => 1,
            Verdict::LowPossibility => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::SuspectLaundering => "Suspect Laundering",
            Verdict::LowPossibility => "Low Possibility of Laundering",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one submitted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Unique report identifier
    pub report_id: String,

    pub verdict: Verdict,

    /// Model probability of the laundering class (0.0 - 1.0)
    pub probability: f64,

    /// Threshold the probability was compared against
    pub threshold: f64,

    /// Feature names paired with the values fed to the model
    pub features: Vec<(String, f32)>,

    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl PredictionReport {
    pub fn new(probability: f64, threshold: f64) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            verdict: Verdict::from_probability(probability, threshold),
            probability,
            threshold,
            features: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Attach the feature vector that produced this report
    pub fn with_features(mut self, names: &[&str], values: &[f32]) -> Self {
        self.features = names
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self
    }
}
