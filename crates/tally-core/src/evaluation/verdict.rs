//! Turning a confidence vector into a prediction.

use crate::dataset::LabelIndex;
use crate::error::PipelineError;
use crate::math::argmax;
use crate::types::Verdict;

/// Compare the top-scoring class against the ground-truth index.
///
/// The confidence vector must be non-empty and finite, and its argmax must
/// name a label in the index.
pub fn eval_result(
    confidences: &[f32],
    ground_truth: usize,
    labels: &LabelIndex,
) -> Result<Verdict, PipelineError> {
    if confidences.iter().any(|c| !c.is_finite()) {
        return Err(PipelineError::InvalidInput(
            "Result confidence vector contains non-finite values".to_string(),
        ));
    }
    let predicted = argmax(confidences).ok_or_else(|| {
        PipelineError::InvalidInput("Result confidence vector is empty".to_string())
    })?;

    let correct_label = labels.label_of(ground_truth).ok_or_else(|| {
        PipelineError::InvalidInput(format!(
            "Ground truth index {ground_truth} is outside the {} known labels",
            labels.len()
        ))
    })?;
    let predicted_label = labels.label_of(predicted).ok_or_else(|| {
        PipelineError::InvalidInput(format!(
            "Predicted class {predicted} is outside the {} known labels",
            labels.len()
        ))
    })?;

    tracing::debug!("predicted: {predicted_label}, correct: {correct_label}");

    Ok(Verdict {
        prediction: predicted == ground_truth,
        correct_label: correct_label.to_string(),
        predicted_label: predicted_label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelIndex {
        LabelIndex::from_lines(["daisy", "roses", "tulips"])
    }

    #[test]
    fn test_correct_prediction() {
        let verdict = eval_result(&[0.1, 0.8, 0.1], 1, &labels()).unwrap();
        assert!(verdict.prediction);
        assert_eq!(verdict.correct_label, "roses");
        assert_eq!(verdict.predicted_label, "roses");
    }

    #[test]
    fn test_wrong_prediction() {
        let verdict = eval_result(&[0.6, 0.3, 0.1], 2, &labels()).unwrap();
        assert!(!verdict.prediction);
        assert_eq!(verdict.correct_label, "tulips");
        assert_eq!(verdict.predicted_label, "daisy");
    }

    #[test]
    fn test_invalid_confidences() {
        assert!(matches!(
            eval_result(&[], 0, &labels()),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            eval_result(&[0.1, f32::NAN], 0, &labels()),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_prediction_outside_label_range() {
        let result = eval_result(&[0.0, 0.0, 0.0, 1.0], 0, &labels());
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }
}
