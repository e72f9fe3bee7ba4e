use std::io::Write;

use super::model::WfDataset;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error("no classes selected")]
    NoClasses,
    #[error("unknown class '{0}'")]
    UnknownClass(String),
    #[error("class '{class}' window {index} has {actual} values, expected {expected}")]
    RaggedRow {
        class: String,
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// FeatureMatrix – selected classes as fixed-width numeric rows
// ---------------------------------------------------------------------------

/// Windows of a chosen set of classes, flattened into equal-width rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// One row per window, in class-selection order then file order.
    pub rows: Vec<Vec<f64>>,
    /// For each row the index of its class in `class_names`.
    pub labels: Vec<usize>,
    /// Number of rows contributed by each class.
    pub class_sizes: Vec<usize>,
    pub class_names: Vec<String>,
    /// Values per row.
    pub width: usize,
}

/// Per-column statistics used by [`FeatureMatrix::standardize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Standardization {
    pub means: Vec<f64>,
    /// Population standard deviation per column.
    pub std_devs: Vec<f64>,
}

impl FeatureMatrix {
    /// Flatten every window of `classes` (in the given order).
    ///
    /// All windows must flatten to the same number of values; the first
    /// window seen fixes the width.
    pub fn from_classes<S: AsRef<str>>(
        dataset: &WfDataset,
        classes: &[S],
    ) -> Result<Self, FlattenError> {
        if classes.is_empty() {
            return Err(FlattenError::NoClasses);
        }

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut class_sizes = Vec::with_capacity(classes.len());
        let mut width: Option<usize> = None;

        for (class_idx, class) in classes.iter().enumerate() {
            let class = class.as_ref();
            let windows = dataset
                .windows(class)
                .ok_or_else(|| FlattenError::UnknownClass(class.to_string()))?;

            for (index, window) in windows.iter().enumerate() {
                let row = window.flatten();
                let expected = *width.get_or_insert(row.len());
                if row.len() != expected {
                    return Err(FlattenError::RaggedRow {
                        class: class.to_string(),
                        index,
                        expected,
                        actual: row.len(),
                    });
                }
                rows.push(row);
                labels.push(class_idx);
            }
            class_sizes.push(windows.len());
        }

        Ok(Self {
            rows,
            labels,
            class_sizes,
            class_names: classes.iter().map(|c| c.as_ref().to_string()).collect(),
            width: width.unwrap_or(0),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column means and population standard deviations.
    pub fn column_stats(&self) -> Standardization {
        let n = self.rows.len() as f64;
        let mut means = vec![0.0; self.width];
        let mut std_devs = vec![0.0; self.width];
        if self.rows.is_empty() {
            return Standardization { means, std_devs };
        }

        for row in &self.rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        for row in &self.rows {
            for ((s, v), m) in std_devs.iter_mut().zip(row).zip(&means) {
                *s += (v - m).powi(2);
            }
        }
        std_devs.iter_mut().for_each(|s| *s = (*s / n).sqrt());

        Standardization { means, std_devs }
    }

    /// Scale every column to zero mean and unit variance in place.
    ///
    /// Columns with zero variance are only centered.
    pub fn standardize(&mut self) -> Standardization {
        let stats = self.column_stats();
        for row in &mut self.rows {
            for ((v, m), s) in row.iter_mut().zip(&stats.means).zip(&stats.std_devs) {
                *v -= m;
                if *s > 0.0 {
                    *v /= s;
                }
            }
        }
        stats
    }

    /// Write as CSV: `class,f0,f1,...` then one record per row.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), FlattenError> {
        let mut writer = csv::Writer::from_writer(out);

        let mut header = Vec::with_capacity(self.width + 1);
        header.push("class".to_string());
        header.extend((0..self.width).map(|i| format!("f{i}")));
        writer.write_record(&header)?;

        for (row, &label) in self.rows.iter().zip(&self.labels) {
            let mut record = Vec::with_capacity(self.width + 1);
            record.push(self.class_names[label].clone());
            record.extend(row.iter().map(f64::to_string));
            writer.write_record(&record)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
