// ============================================================
// Layer 4 - One-Hot Label Encoder
// ============================================================
// Turns integer class ids into one-hot rows.
//
// The class list is fixed up front (0..10 for digits) and the
// same encoder is used for both partitions. Fitting a separate
// encoder per partition would give a partition that happens to
// miss a digit fewer columns, or shifted ones.
//
// Example with classes [0, 1, 2]:
//   labels [2, 0]  →  [[0, 0, 1],
//                      [1, 0, 0]]

use crate::domain::error::{PipelineError, PipelineResult};

/// Number of digit classes
pub const NUM_DIGITS: usize = 10;

/// A dense row-major N x C matrix with exactly one 1.0 per row.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotMatrix {
    rows:   usize,
    cols:   usize,
    values: Vec<f32>,
}

impl OneHotMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    /// Column holding the 1.0 of a row (arg-max).
    pub fn hot_column(&self, index: usize) -> Option<usize> {
        self.row(index).map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
                .0
        })
    }
}

/// Encoder over a fixed, ordered list of class labels.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    classes: Vec<u8>,
}

impl OneHotEncoder {
    /// Build an encoder over an explicit class list.
    /// Column `i` of every encoded row stands for `classes[i]`.
    pub fn new(classes: Vec<u8>) -> PipelineResult<Self> {
        if classes.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "one-hot encoder needs at least one class".to_string(),
            ));
        }
        let mut sorted = classes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != classes.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "duplicate labels in class list {:?}",
                classes
            )));
        }
        Ok(Self { classes })
    }

    /// The ten digit classes 0..=9
    pub fn digits() -> Self {
        Self { classes: (0..NUM_DIGITS as u8).collect() }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    fn column_of(&self, label: u8) -> PipelineResult<usize> {
        self.classes
            .iter()
            .position(|&c| c == label)
            .ok_or(PipelineError::UnknownLabel {
                label,
                num_classes: self.classes.len(),
            })
    }

    /// Encode every label; fails on the first label outside the class list.
    pub fn encode(&self, labels: &[u8]) -> PipelineResult<OneHotMatrix> {
        let cols = self.classes.len();
        let mut values = vec![0.0f32; labels.len() * cols];
        for (row, &label) in labels.iter().enumerate() {
            let col = self.column_of(label)?;
            values[row * cols + col] = 1.0;
        }
        Ok(OneHotMatrix { rows: labels.len(), cols, values })
    }

    /// Map each row back to its class label.
    pub fn decode(&self, matrix: &OneHotMatrix) -> PipelineResult<Vec<u8>> {
        if matrix.cols() != self.classes.len() {
            return Err(PipelineError::ShapeMismatch(format!(
                "matrix has {} columns, encoder has {} classes",
                matrix.cols(),
                self.classes.len()
            )));
        }
        Ok((0..matrix.rows())
            .filter_map(|i| matrix.hot_column(i))
            .map(|col| self.classes[col])
            .collect())
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::digits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_encode_to_identity() {
        let labels: Vec<u8> = (0..10).collect();
        let m = OneHotEncoder::digits().encode(&labels).unwrap();
        assert_eq!((m.rows(), m.cols()), (10, 10));
        for i in 0..10 {
            for j in 0..10 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(m.row(i).unwrap()[j], expected);
            }
        }
    }

    #[test]
    fn test_rows_sum_to_one() {
        let m = OneHotEncoder::digits().encode(&[7, 7, 3, 0, 9]).unwrap();
        for i in 0..m.rows() {
            let row = m.row(i).unwrap();
            assert_eq!(row.iter().sum::<f32>(), 1.0);
            assert_eq!(row.iter().filter(|&&v| v == 1.0).count(), 1);
        }
    }

    #[test]
    fn test_decode_recovers_labels() {
        let enc    = OneHotEncoder::digits();
        let labels = vec![5, 0, 4, 1, 9, 2, 1, 3];
        let m      = enc.encode(&labels).unwrap();
        assert_eq!(enc.decode(&m).unwrap(), labels);
    }

    #[test]
    fn test_missing_class_keeps_column_layout() {
        // A partition without any 9s still gets ten columns,
        // and 3 still lands in column 3.
        let m = OneHotEncoder::digits().encode(&[3, 3, 0]).unwrap();
        assert_eq!(m.cols(), 10);
        assert_eq!(m.hot_column(0), Some(3));
    }

    #[test]
    fn test_unknown_label_fails() {
        let err = OneHotEncoder::digits().encode(&[1, 10]).unwrap_err();
        assert_eq!(err, PipelineError::UnknownLabel { label: 10, num_classes: 10 });
    }

    #[test]
    fn test_custom_class_order() {
        let enc = OneHotEncoder::new(vec![9, 4]).unwrap();
        let m   = enc.encode(&[4, 9]).unwrap();
        assert_eq!(m.hot_column(0), Some(1));
        assert_eq!(m.hot_column(1), Some(0));
    }

    #[test]
    fn test_rejects_duplicate_classes() {
        assert!(OneHotEncoder::new(vec![1, 2, 1]).is_err());
        assert!(OneHotEncoder::new(vec![]).is_err());
    }
}
