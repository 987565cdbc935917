//! Binary classifiers behind a common interface

use crate::models::loader::LoadedModel;
use anyhow::{bail, Context, Result};
use ort::value::Tensor;
use tracing::{debug, warn};

/// A trained binary classifier over a single feature row.
pub trait Classifier {
    fn name(&self) -> &str;

    /// Probability of the laundering class for one feature row.
    fn predict_proba(&mut self, features: &[f32]) -> Result<f64>;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    model: LoadedModel,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel) -> Self {
        Self { model }
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.model.name
    }

    fn predict_proba(&mut self, features: &[f32]) -> Result<f64> {
        // Shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let outputs = self
            .model
            .session
            .run(ort::inputs![self.model.input_name.as_str() => input_tensor])?;

        extract_probability(&outputs, &self.model.output_name, &self.model.name)
    }
}

/// Extract the laundering probability from model output.
/// Prefers the probability tensor, falls back to the predicted label.
fn extract_probability(
    outputs: &ort::session::SessionOutputs,
    output_name: &str,
    model_name: &str,
) -> Result<f64> {
    if let Some(output) = outputs.get(output_name) {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let prob = positive_class_probability(shape, data)
                .with_context(|| format!("Model {} returned malformed probabilities", model_name))?;
            debug!(model = %model_name, prob = prob, "Extracted from probability tensor");
            return Ok(prob);
        }
    }

    for (name, output) in outputs.iter() {
        if !name.contains("label") {
            continue;
        }
        if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
            if let Some(&label) = labels.first() {
                warn!(model = %model_name, label = label, "No probability output, using label");
                return Ok(label_probability(label));
            }
        }
    }

    Err(anyhow::anyhow!(
        "Model {} produced neither probabilities nor a label",
        model_name
    ))
}

/// Laundering probability from a `[batch, classes]` or `[classes]` tensor.
fn positive_class_probability(shape: &ort::tensor::Shape, data: &[f32]) -> Result<f64> {
    let dims: Vec<i64> = shape.iter().copied().collect();

    let index = match dims.last().copied() {
        Some(c) if c >= 2 => 1,
        // Single logistic output
        Some(1) => 0,
        _ => bail!("probability tensor has no class dimension (shape {:?})", dims),
    };

    let prob = data.get(index).map(|&p| p as f64).with_context(|| {
        format!(
            "probability tensor of shape {:?} holds {} values, class 1 missing",
            dims,
            data.len()
        )
    })?;

    if !(0.0..=1.0).contains(&prob) {
        bail!("class 1 probability {} is outside [0, 1]", prob);
    }
    Ok(prob)
}

fn label_probability(label: i64) -> f64 {
    if label == 1 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ort::tensor::Shape;

    #[test]
    fn test_two_class_output_uses_second_column() {
        let shape = Shape::new([1_i64, 2]);
        let prob = positive_class_probability(&shape, &[0.25, 0.75]).unwrap();
        assert!((prob - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_single_logistic_output() {
        let shape = Shape::new([1_i64, 1]);
        let prob = positive_class_probability(&shape, &[0.4]).unwrap();
        assert!((prob - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_unbatched_class_vector() {
        let shape = Shape::new([2_i64]);
        let prob = positive_class_probability(&shape, &[0.9, 0.1]).unwrap();
        assert!((prob - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_short_tensor_is_an_error() {
        let shape = Shape::new([1_i64, 2]);
        let err = positive_class_probability(&shape, &[]).unwrap_err();
        assert!(err.to_string().contains("class 1 missing"));

        let err = positive_class_probability(&shape, &[0.3]).unwrap_err();
        assert!(err.to_string().contains("holds 1 values"));
    }

    #[test]
    fn test_scalar_and_out_of_range_outputs_are_errors() {
        assert!(positive_class_probability(&Shape::new(Vec::<i64>::new()), &[0.5]).is_err());
        assert!(positive_class_probability(&Shape::new([1_i64, 2]), &[-0.2, 1.2]).is_err());
    }

    #[test]
    fn test_label_fallback() {
        assert_eq!(label_probability(1), 1.0);
        assert_eq!(label_probability(0), 0.0);
    }
}
