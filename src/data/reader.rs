use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use super::error::{SyntaxConfigError, SyntaxError, WfError, WfResult};
use super::model::{AttributeName, ClassLabel, Feature, WfDataset, Window};
use super::token::{Token, WfSyntax};

// ---------------------------------------------------------------------------
// LineCursor – numbered line access over any BufRead
// ---------------------------------------------------------------------------

/// Reads lines one at a time and remembers the 1-based number of the last one.
pub struct LineCursor<R> {
    inner: R,
    line_number: usize,
    bytes: Vec<u8>,
    buf: String,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_number: 0,
            bytes: Vec::new(),
            buf: String::new(),
        }
    }

    /// Number of the most recently returned line (0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next line without its line terminator, or `None` at end of stream.
    ///
    /// A line that is not valid UTF-8 is [`WfError::Malformed`] at that line.
    pub fn next_line(&mut self) -> WfResult<Option<&str>> {
        self.bytes.clear();
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.bytes)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut end = self.bytes.len();
        while end > 0 && matches!(self.bytes[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        match std::str::from_utf8(&self.bytes[..end]) {
            Ok(text) => self.buf.push_str(text),
            Err(e) => {
                return Err(WfError::Malformed {
                    line: self.line_number,
                    source: SyntaxError::InvalidUtf8(e.valid_up_to()),
                })
            }
        }
        Ok(Some(self.buf.as_str()))
    }

    /// Like [`next_line`](Self::next_line) but end of stream is an error.
    pub fn expect_line(&mut self, expected: impl FnOnce() -> String) -> WfResult<&str> {
        let line = self.line_number;
        if self.next_line()?.is_none() {
            return Err(WfError::PrematureEnd {
                line,
                expected: expected(),
            });
        }
        Ok(self.buf.as_str())
    }

    fn malformed(&self, source: SyntaxError) -> WfError {
        WfError::Malformed {
            line: self.line_number,
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Window assembly state
// ---------------------------------------------------------------------------

enum Mode {
    Scalar,
    Vector(Vec<f64>),
}

// ---------------------------------------------------------------------------
// WfReader
// ---------------------------------------------------------------------------

/// Reader for WF files.
///
/// Holds nothing but its [`WfSyntax`]; every call to
/// [`read_wf_file`](Self::read_wf_file) produces an independent [`WfDataset`].
#[derive(Debug, Clone, Default)]
pub struct WfReader {
    syntax: WfSyntax,
}

impl WfReader {
    /// Reader for a custom syntax; rejected if its tokens are ambiguous.
    pub fn new(syntax: WfSyntax) -> Result<Self, SyntaxConfigError> {
        syntax.validate()?;
        Ok(Self { syntax })
    }

    /// Same as [`read_wf_file`](Self::read_wf_file).
    pub fn read_file(&self, path: impl AsRef<Path>) -> WfResult<WfDataset> {
        self.read_wf_file(path)
    }

    /// Read a whole WF file.
    ///
    /// Fails with [`WfError::NotFound`] before opening anything if `path`
    /// is not an existing file. Any other error aborts the read; no partial
    /// dataset is returned.
    pub fn read_wf_file(&self, path: impl AsRef<Path>) -> WfResult<WfDataset> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(WfError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => WfError::NotFound {
                path: path.to_path_buf(),
            },
            _ => WfError::Io(e),
        })?;

        let dataset = self.read_from(BufReader::new(file))?;
        info!(
            "read {}: {} attributes, {} classes, {} windows",
            path.display(),
            dataset.attribute_names.len(),
            dataset.len(),
            dataset.num_windows()
        );
        Ok(dataset)
    }

    /// Parse WF content from any buffered source.
    pub fn read_from<R: BufRead>(&self, reader: R) -> WfResult<WfDataset> {
        let mut cursor = LineCursor::new(reader);
        let attribute_names = self.read_attribute_names(&mut cursor)?;
        let blocks = std::iter::from_fn(|| self.read_class_block(&mut cursor).transpose())
            .collect::<WfResult<Vec<_>>>()?;
        Ok(WfDataset::from_blocks(attribute_names, blocks))
    }

    /// Parse WF content held in memory.
    pub fn parse_str(&self, content: &str) -> WfResult<WfDataset> {
        self.read_from(content.as_bytes())
    }

    /// Read the attribute count line and exactly that many name lines.
    ///
    /// Name lines are normally bare names. If one carries the property
    /// separator, the text after it is used.
    pub fn read_attribute_names<R: BufRead>(
        &self,
        cursor: &mut LineCursor<R>,
    ) -> WfResult<Vec<AttributeName>> {
        let line = cursor.expect_line(|| "attribute count".to_string())?;
        let count = self.extract_count(line);
        let count = count.map_err(|e| cursor.malformed(e))?;

        let mut names = Vec::with_capacity(count.min(1024));
        for i in 0..count {
            let line = cursor.expect_line(|| format!("attribute name {} of {count}", i + 1))?;
            let name = self.extract_name(line).map(str::to_string);
            names.push(name.map_err(|e| cursor.malformed(e))?);
        }
        Ok(names)
    }

    /// Read one class block, or `None` if the stream ends where a class
    /// label is expected. Blank lines before the label are skipped.
    fn read_class_block<R: BufRead>(
        &self,
        cursor: &mut LineCursor<R>,
    ) -> WfResult<Option<(ClassLabel, Vec<Window>)>> {
        let label = loop {
            match cursor.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    let label = self.extract_value(line).map(str::to_string);
                    break label.map_err(|e| cursor.malformed(e))?;
                }
            }
        };

        let line = cursor.expect_line(|| format!("example count of class '{label}'"))?;
        let count = self.extract_count(line);
        let count = count.map_err(|e| cursor.malformed(e))?;

        let mut windows = Vec::with_capacity(count.min(1024));
        for i in 0..count {
            let line =
                cursor.expect_line(|| format!("window {} of {count} of class '{label}'", i + 1))?;
            let window = self.extract_window(line);
            windows.push(window.map_err(|e| cursor.malformed(e))?);
        }
        debug!(
            "class '{label}': {} windows ending at line {}",
            windows.len(),
            cursor.line_number()
        );
        Ok(Some((label, windows)))
    }

    /// Text after the first property separator of a `key: value` line, trimmed.
    pub fn extract_value<'a>(&self, line: &'a str) -> Result<&'a str, SyntaxError> {
        let sep = self.syntax.property_separator;
        let (_, value) = line
            .split_once(sep)
            .ok_or(SyntaxError::MissingSeparator(sep))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(SyntaxError::EmptyValue);
        }
        Ok(value)
    }

    fn extract_count(&self, line: &str) -> Result<usize, SyntaxError> {
        let value = self.extract_value(line)?;
        value
            .parse::<usize>()
            .map_err(|_| SyntaxError::InvalidCount(value.to_string()))
    }

    fn extract_name<'a>(&self, line: &'a str) -> Result<&'a str, SyntaxError> {
        let name = match line.split_once(self.syntax.property_separator) {
            Some((_, value)) => value.trim(),
            None => line.trim(),
        };
        if name.is_empty() {
            return Err(SyntaxError::EmptyValue);
        }
        Ok(name)
    }

    /// Parse one window line.
    ///
    /// Bare numbers become [`Feature::Scalar`]; numbers between the vector
    /// markers become one [`Feature::Vector`]. NaN/infinity spellings read
    /// as `0.0`.
    pub fn extract_window(&self, line: &str) -> Result<Window, SyntaxError> {
        let mut features = Vec::new();
        let mut mode = Mode::Scalar;

        for token in self.syntax.tokenize(line) {
            mode = match (mode, token?) {
                (Mode::Scalar, Token::Number(v)) => {
                    features.push(Feature::Scalar(v));
                    Mode::Scalar
                }
                (Mode::Scalar, Token::VectorStart) => Mode::Vector(Vec::new()),
                (Mode::Scalar, Token::VectorEnd) => return Err(SyntaxError::UnmatchedVectorEnd),
                (Mode::Vector(mut acc), Token::Number(v)) => {
                    acc.push(v);
                    Mode::Vector(acc)
                }
                (Mode::Vector(acc), Token::VectorEnd) => {
                    features.push(Feature::Vector(acc));
                    Mode::Scalar
                }
                (Mode::Vector(_), Token::VectorStart) => return Err(SyntaxError::NestedVector),
            };
        }

        match mode {
            Mode::Scalar => Ok(Window::new(features)),
            Mode::Vector(_) => Err(SyntaxError::UnterminatedVector),
        }
    }
}
