/// Data layer: core types, tokenizing, reading, writing and flattening.
///
/// Architecture:
/// ```text
///   .wf text file
///        │
///        ▼
///   ┌──────────┐
///   │  token    │  split line → Number / VectorStart / VectorEnd
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  reader   │  header, class blocks, windows → WfDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ WfDataset  │  attribute names, label → Vec<Window>
///   └───────────┘
///        │                    │
///        ▼                    ▼
///   ┌──────────┐        ┌──────────┐
///   │  writer   │        │ flatten   │  selected classes → FeatureMatrix
///   └──────────┘        └──────────┘
/// ```

pub mod error;
pub mod flatten;
pub mod model;
pub mod reader;
pub mod token;
pub mod writer;
