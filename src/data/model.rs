use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of one declared attribute position.
pub type AttributeName = String;

/// Name of a window category.
pub type ClassLabel = String;

// ---------------------------------------------------------------------------
// Feature – one slot of a window
// ---------------------------------------------------------------------------

/// A single feature value: either one number or a bracketed sub-vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Feature {
    Scalar(f64),
    /// May be empty (`[ ]` in the source line).
    Vector(Vec<f64>),
}

impl Feature {
    /// Number of values this feature contributes once flattened.
    pub fn width(&self) -> usize {
        match self {
            Feature::Scalar(_) => 1,
            Feature::Vector(v) => v.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Window – one observation
// ---------------------------------------------------------------------------

/// One observation: an ordered list of features.
///
/// The number of features is not tied to the declared attribute count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Window {
    pub features: Vec<Feature>,
}

impl Window {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Total number of values after expanding vector features.
    pub fn flat_len(&self) -> usize {
        self.features.iter().map(Feature::width).sum()
    }

    /// Scalars and vector elements, in order.
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.flat_len());
        for feature in &self.features {
            match feature {
                Feature::Scalar(v) => out.push(*v),
                Feature::Vector(values) => out.extend_from_slice(values),
            }
        }
        out
    }
}

impl From<Vec<Feature>> for Window {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

// ---------------------------------------------------------------------------
// WfDataset – the complete parsed file
// ---------------------------------------------------------------------------

/// Result of reading one WF file.
///
/// Classes keep the order in which their label first appeared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WfDataset {
    /// Declared attribute names, in header order.
    pub attribute_names: Vec<AttributeName>,
    /// Class label → windows in file order.
    pub windows_by_class: IndexMap<ClassLabel, Vec<Window>>,
}

impl WfDataset {
    /// Fold class blocks into a dataset. A label seen before has the
    /// block's windows appended to its existing list.
    pub fn from_blocks<I>(attribute_names: Vec<AttributeName>, blocks: I) -> Self
    where
        I: IntoIterator<Item = (ClassLabel, Vec<Window>)>,
    {
        let windows_by_class = blocks.into_iter().fold(
            IndexMap::<ClassLabel, Vec<Window>>::new(),
            |mut acc, (label, windows)| {
                acc.entry(label).or_default().extend(windows);
                acc
            },
        );
        Self {
            attribute_names,
            windows_by_class,
        }
    }

    /// Class labels in order of first appearance.
    pub fn class_labels(&self) -> impl Iterator<Item = &str> {
        self.windows_by_class.keys().map(String::as_str)
    }

    pub fn windows(&self, label: &str) -> Option<&[Window]> {
        self.windows_by_class.get(label).map(Vec::as_slice)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.windows_by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows_by_class.is_empty()
    }

    /// Number of windows across all classes.
    pub fn num_windows(&self) -> usize {
        self.windows_by_class.values().map(Vec::len).sum()
    }
}
