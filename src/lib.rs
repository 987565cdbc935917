//! AML Dashboard Library
//!
//! Descriptive analytics over the IBM anti-money-laundering transaction
//! datasets and single-transaction laundering prediction with a pre-trained
//! XGBoost model exported to ONNX.

pub mod analytics;
pub mod config;
pub mod encoder;
pub mod error;
pub mod feature_extractor;
pub mod form;
pub mod models;
pub mod render;
pub mod repository;
pub mod router;
pub mod session;
pub mod types;

pub use analytics::{AnalyticsReport, CurrencySelection};
pub use config::AppConfig;
pub use encoder::{CategoricalEncoders, LabelEncoder};
pub use feature_extractor::FeatureExtractor;
pub use form::{CandidateTransaction, FormField, PredictionForm};
pub use models::{Classifier, InferenceEngine, ModelSource, OnnxModelSource};
pub use repository::{DataRepository, TableView, TransactionTable};
pub use router::{Page, Router, Trigger};
pub use session::{Reply, Session};
pub use types::{PredictionReport, TransactionRecord, Verdict};
