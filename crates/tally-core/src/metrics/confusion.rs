//! Confusion matrix and the per-class statistics derived from it.

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::math::ratio_or;

/// Value reported for a class whose denominator is zero.
pub const UNDEFINED: f64 = -1.0;

/// Square confusion matrix.
///
/// Entry `[i][j]` counts samples whose **true** class is `i` and whose
/// **predicted** class is `j`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct ConfusionMatrix {
    rows: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Count true/predicted pairs into a `num_classes × num_classes` matrix.
    pub fn from_labels(
        truths: &[usize],
        predictions: &[usize],
        num_classes: usize,
    ) -> Result<Self, MetricsError> {
        if truths.len() != predictions.len() {
            return Err(MetricsError::InvalidInput(format!(
                "truth length {} != prediction length {}",
                truths.len(),
                predictions.len()
            )));
        }
        if num_classes == 0 {
            return Err(MetricsError::InvalidInput(
                "confusion matrix needs at least one class".to_string(),
            ));
        }

        let mut rows = vec![vec![0u64; num_classes]; num_classes];
        for (&t, &p) in truths.iter().zip(predictions) {
            if t >= num_classes || p >= num_classes {
                return Err(MetricsError::InvalidInput(format!(
                    "label pair ({t}, {p}) outside {num_classes} classes"
                )));
            }
            rows[t][p] += 1;
        }
        Ok(Self { rows })
    }

    /// Wrap existing counts, rejecting empty or non-square input.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, MetricsError> {
        check_square(&rows)?;
        Ok(Self { rows })
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.rows.len()
    }

    /// Count for a (true, predicted) pair.
    pub fn get(&self, truth: usize, predicted: usize) -> u64 {
        self.rows[truth][predicted]
    }

    /// Rows of counts, one per true class.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.rows.iter().flatten().sum()
    }

    /// Largest single count.
    pub fn max(&self) -> u64 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    fn row_sum(&self, i: usize) -> u64 {
        self.rows[i].iter().sum()
    }

    fn col_sum(&self, j: usize) -> u64 {
        self.rows.iter().map(|row| row[j]).sum()
    }

    /// Per-class sensitivity (recall): `cm[i][i] / row_sum(i)`, `-1` for empty rows.
    pub fn sensitivity(&self) -> Vec<f64> {
        (0..self.num_classes())
            .map(|i| ratio_or(self.rows[i][i], self.row_sum(i), UNDEFINED))
            .collect()
    }

    /// Per-class precision: `cm[j][j] / col_sum(j)`, `-1` for empty columns.
    pub fn precision(&self) -> Vec<f64> {
        (0..self.num_classes())
            .map(|j| ratio_or(self.rows[j][j], self.col_sum(j), UNDEFINED))
            .collect()
    }

    /// Fraction of samples on the diagonal, `-1` for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        let trace: u64 = (0..self.num_classes()).map(|i| self.rows[i][i]).sum();
        ratio_or(trace, self.total(), UNDEFINED)
    }

    /// Row-normalized matrix; rows without samples stay all zero.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let sum: u64 = row.iter().sum();
                row.iter().map(|&c| ratio_or(c, sum, 0.0)).collect()
            })
            .collect()
    }

    /// Ensure a class-name list matches the matrix dimension.
    pub fn check_classes<S: AsRef<str>>(&self, names: &[S]) -> Result<(), MetricsError> {
        if names.len() != self.num_classes() {
            return Err(MetricsError::InvalidInput(format!(
                "{} class names for a {}x{} confusion matrix",
                names.len(),
                self.num_classes(),
                self.num_classes()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u64>>> for ConfusionMatrix {
    type Error = MetricsError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<ConfusionMatrix> for Vec<Vec<u64>> {
    fn from(cm: ConfusionMatrix) -> Self {
        cm.rows
    }
}

/// Aligned text rendering of a confusion matrix.
pub struct MatrixDisplay<'a>(pub &'a ConfusionMatrix);

impl std::fmt::Display for MatrixDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.0.max().to_string().len().max(1);
        for row in self.0.rows() {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

fn check_square(rows: &[Vec<u64>]) -> Result<(), MetricsError> {
    if rows.is_empty() {
        return Err(MetricsError::InvalidInput(
            "Confusion matrix is empty".to_string(),
        ));
    }
    if let Some(row) = rows.iter().find(|row| row.len() != rows.len()) {
        return Err(MetricsError::InvalidInput(format!(
            "Confusion matrix is not square: {} rows but a row of length {}",
            rows.len(),
            row.len()
        )));
    }
    Ok(())
}

/// Per-class sensitivity of raw counts, validating the shape first.
pub fn sensitivity(rows: &[Vec<u64>]) -> Result<Vec<f64>, MetricsError> {
    check_square(rows)?;
    Ok(ConfusionMatrix {
        rows: rows.to_vec(),
    }
    .sensitivity())
}

/// Per-class precision of raw counts, validating the shape first.
pub fn precision(rows: &[Vec<u64>]) -> Result<Vec<f64>, MetricsError> {
    check_square(rows)?;
    Ok(ConfusionMatrix {
        rows: rows.to_vec(),
    }
    .precision())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_from_labels_counts_pairs() {
        let truths = [0, 0, 1, 1, 2];
        let preds = [0, 1, 1, 1, 0];
        let cm = ConfusionMatrix::from_labels(&truths, &preds, 3).unwrap();
        assert_eq!(cm.rows(), &[vec![1, 1, 0], vec![0, 2, 0], vec![1, 0, 0]]);
        assert_eq!(cm.total(), 5);
        assert_eq!(cm.get(2, 0), 1);
    }

    #[test]
    fn test_two_class_statistics() {
        let cm = ConfusionMatrix::from_rows(vec![vec![5, 1], vec![2, 8]]).unwrap();
        assert!(approx(&cm.sensitivity(), &[5.0 / 6.0, 0.8]));
        assert!(approx(&cm.precision(), &[5.0 / 7.0, 8.0 / 9.0]));
        assert!((cm.accuracy() - 13.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_row_gives_sentinel() {
        let cm = ConfusionMatrix::from_rows(vec![vec![3, 0], vec![0, 0]]).unwrap();
        let s = cm.sensitivity();
        assert_eq!(s[1], -1.0);
        assert_eq!(s[0], 1.0);
    }

    #[test]
    fn test_zero_column_gives_sentinel() {
        // class 1 is never predicted
        let cm = ConfusionMatrix::from_rows(vec![vec![4, 0], vec![2, 0]]).unwrap();
        let p = cm.precision();
        assert_eq!(p[1], -1.0);
        assert!((p[0] - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_square_rejected() {
        assert!(matches!(
            ConfusionMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]),
            Err(MetricsError::InvalidInput(_))
        ));
        assert!(sensitivity(&[vec![1, 2], vec![3]]).is_err());
        assert!(precision(&[]).is_err());
    }

    #[test]
    fn test_free_functions_match_methods() {
        let rows = vec![vec![5, 1], vec![2, 8]];
        assert!(approx(&sensitivity(&rows).unwrap(), &[5.0 / 6.0, 0.8]));
        assert!(approx(&precision(&rows).unwrap(), &[5.0 / 7.0, 8.0 / 9.0]));
    }

    #[test]
    fn test_label_out_of_range_rejected() {
        assert!(ConfusionMatrix::from_labels(&[0, 2], &[0, 1], 2).is_err());
        assert!(ConfusionMatrix::from_labels(&[0, 1], &[0], 2).is_err());
    }

    #[test]
    fn test_check_classes() {
        let cm = ConfusionMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
        assert!(cm.check_classes(&["a", "b"]).is_ok());
        assert!(cm.check_classes(&["a", "b", "c"]).is_err());
    }

    #[test]
    fn test_normalized_rows() {
        let cm = ConfusionMatrix::from_rows(vec![vec![1, 3], vec![0, 0]]).unwrap();
        let n = cm.normalized();
        assert!(approx(&n[0], &[0.25, 0.75]));
        assert!(approx(&n[1], &[0.0, 0.0]));
    }

    #[test]
    fn test_serde_rejects_non_square() {
        assert!(serde_json::from_str::<ConfusionMatrix>("[[1,2],[3,4]]").is_ok());
        assert!(serde_json::from_str::<ConfusionMatrix>("[[1,2],[3]]").is_err());
    }

    #[test]
    fn test_display_aligns_columns() {
        let cm = ConfusionMatrix::from_rows(vec![vec![12, 1], vec![0, 7]]).unwrap();
        let text = MatrixDisplay(&cm).to_string();
        assert_eq!(text, "[12  1]\n[ 0  7]\n");
    }
}
