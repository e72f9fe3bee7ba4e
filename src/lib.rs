//! Reader for the window-feature (WF) text format.
//!
//! A WF file declares a list of attribute names followed by class blocks,
//! each holding a counted list of windows. See [`data`] for the layout of
//! the parsing pipeline.

pub mod data;

pub use data::error::{SyntaxConfigError, SyntaxError, WfError};
pub use data::model::{AttributeName, ClassLabel, Feature, WfDataset, Window};
pub use data::reader::WfReader;
pub use data::token::WfSyntax;
pub use data::writer::WfWriter;
