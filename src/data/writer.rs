use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

use super::model::{AttributeName, Feature, WfDataset, Window};
use super::error::SyntaxConfigError;
use super::token::WfSyntax;

pub const ATTRIBUTE_COUNT_KEY: &str = "attributeCount";
pub const ATTRIBUTE_NAME_KEY: &str = "attribute";
pub const CLASS_NAME_KEY: &str = "className";
pub const EXAMPLE_COUNT_KEY: &str = "exampleCount";

// ---------------------------------------------------------------------------
// WfWriter
// ---------------------------------------------------------------------------

/// Serializes a [`WfDataset`] back into WF text.
///
/// [`write`](Self::write) emits every class as one block, so a dataset read
/// from a file with repeated class labels comes back with the same windows
/// per class.
///
/// Reading the output back yields an equal dataset, except that non-finite
/// values (e.g. a parsed `1e999`) are written as `NaN`/`inf` and therefore
/// read back as `0`.
#[derive(Debug, Clone, Default)]
pub struct WfWriter {
    syntax: WfSyntax,
}

impl WfWriter {
    /// Writer for a custom syntax; rejected if its tokens are ambiguous.
    pub fn new(syntax: WfSyntax) -> Result<Self, SyntaxConfigError> {
        syntax.validate()?;
        Ok(Self { syntax })
    }

    /// Create (or truncate) `path` and write the dataset to it.
    pub fn write_file(&self, dataset: &WfDataset, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write(dataset, &mut out)?;
        out.flush()?;
        debug!("wrote {} windows to {}", dataset.num_windows(), path.display());
        Ok(())
    }

    pub fn write<W: Write>(&self, dataset: &WfDataset, out: &mut W) -> io::Result<()> {
        self.write_header(&dataset.attribute_names, out)?;
        for (label, windows) in &dataset.windows_by_class {
            self.write_block(label, windows, out)?;
        }
        Ok(())
    }

    /// Attribute count line followed by one name per line.
    ///
    /// Names are written bare unless they contain the property separator;
    /// those get an `attribute: ` prefix so the reader keeps the whole name.
    pub fn write_header<W: Write>(
        &self,
        attribute_names: &[AttributeName],
        out: &mut W,
    ) -> io::Result<()> {
        let sep = self.syntax.property_separator;
        writeln!(out, "{ATTRIBUTE_COUNT_KEY}{sep} {}", attribute_names.len())?;
        for name in attribute_names {
            if name.contains(sep) {
                writeln!(out, "{ATTRIBUTE_NAME_KEY}{sep} {name}")?;
            } else {
                writeln!(out, "{name}")?;
            }
        }
        Ok(())
    }

    /// One class block. Writing the same label twice is valid; readers
    /// append the second block's windows to the first.
    pub fn write_block<W: Write>(
        &self,
        label: &str,
        windows: &[Window],
        out: &mut W,
    ) -> io::Result<()> {
        let sep = self.syntax.property_separator;
        writeln!(out, "{CLASS_NAME_KEY}{sep} {label}")?;
        writeln!(out, "{EXAMPLE_COUNT_KEY}{sep} {}", windows.len())?;
        for window in windows {
            writeln!(out, "{}", self.format_window(window))?;
        }
        Ok(())
    }

    /// One window line, tokens joined by the value separator.
    pub fn format_window(&self, window: &Window) -> String {
        let mut tokens: Vec<String> = Vec::with_capacity(window.flat_len());
        for feature in &window.features {
            match feature {
                Feature::Scalar(v) => tokens.push(v.to_string()),
                Feature::Vector(values) => {
                    tokens.push(self.syntax.vector_start.clone());
                    tokens.extend(values.iter().map(f64::to_string));
                    tokens.push(self.syntax.vector_end.clone());
                }
            }
        }
        tokens.join(&self.syntax.value_separator.to_string())
    }
}
