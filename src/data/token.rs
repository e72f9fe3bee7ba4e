use serde::{Deserialize, Serialize};

use super::error::{SyntaxConfigError, SyntaxError};

// ---------------------------------------------------------------------------
// WfSyntax – the lexical configuration
// ---------------------------------------------------------------------------

/// The four lexical tokens of the WF grammar.
///
/// Loadable from JSON; missing fields fall back to the defaults
/// (`:`, space, `[`, `]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WfSyntax {
    /// Separates key from value in `key: value` lines.
    pub property_separator: char,
    /// Separates tokens in a window line.
    pub value_separator: char,
    pub vector_start: String,
    pub vector_end: String,
}

impl Default for WfSyntax {
    fn default() -> Self {
        Self {
            property_separator: ':',
            value_separator: ' ',
            vector_start: "[".to_string(),
            vector_end: "]".to_string(),
        }
    }
}

impl WfSyntax {
    /// Check that the tokens can be told apart from each other.
    pub fn validate(&self) -> Result<(), SyntaxConfigError> {
        if self.vector_start.trim().is_empty() || self.vector_end.trim().is_empty() {
            return Err(SyntaxConfigError::BlankVectorMarker);
        }
        if self.vector_start == self.vector_end {
            return Err(SyntaxConfigError::SameVectorMarkers(self.vector_start.clone()));
        }
        let sep = self.value_separator;
        if self.vector_start.contains(sep) || self.vector_end.contains(sep) {
            return Err(SyntaxConfigError::MarkerContainsSeparator(sep));
        }
        if self.property_separator == sep {
            return Err(SyntaxConfigError::SameSeparators(sep));
        }
        Ok(())
    }

    /// Split a window line into classified tokens. Empty pieces are skipped.
    pub fn tokenize<'a>(
        &'a self,
        line: &'a str,
    ) -> impl Iterator<Item = Result<Token, SyntaxError>> + 'a {
        line.split(self.value_separator)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(move |piece| self.classify(piece))
    }

    /// Classify one non-empty, trimmed piece of a window line.
    pub fn classify(&self, piece: &str) -> Result<Token, SyntaxError> {
        if piece == self.vector_start {
            return Ok(Token::VectorStart);
        }
        if piece == self.vector_end {
            return Ok(Token::VectorEnd);
        }
        if is_not_a_number(piece) {
            return Ok(Token::Number(0.0));
        }
        piece
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| SyntaxError::InvalidNumber(piece.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A classified piece of a window line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    VectorStart,
    VectorEnd,
}

/// Spellings of NaN and infinity that upstream tools emit for unstable
/// measurements. They are read as `0.0`.
fn is_not_a_number(piece: &str) -> bool {
    let unsigned = piece
        .strip_prefix('-')
        .or_else(|| piece.strip_prefix('+'))
        .unwrap_or(piece);
    ["nan", "inf", "infinity"]
        .iter()
        .any(|spelling| unsigned.eq_ignore_ascii_case(spelling))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<Token> {
        WfSyntax::default()
            .tokenize(line)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn classifies_markers_and_numbers() {
        assert_eq!(
            tokens("1.0 [ 2 ] -3e2"),
            vec![
                Token::Number(1.0),
                Token::VectorStart,
                Token::Number(2.0),
                Token::VectorEnd,
                Token::Number(-300.0),
            ]
        );
    }

    #[test]
    fn skips_repeated_separators_and_line_endings() {
        assert_eq!(
            tokens("  1   2 \r"),
            vec![Token::Number(1.0), Token::Number(2.0)]
        );
        assert!(tokens("").is_empty());
    }

    #[test]
    fn not_a_number_spellings_become_zero() {
        for spelling in ["nan", "-nan", "NaN", "inf", "Inf", "-inf", "NAN", "+inf", "Infinity"] {
            assert_eq!(
                WfSyntax::default().classify(spelling),
                Ok(Token::Number(0.0)),
                "{spelling}"
            );
        }
    }

    #[test]
    fn rejects_garbage() {
        let syntax = WfSyntax::default();
        assert_eq!(
            syntax.classify("1.0.0"),
            Err(SyntaxError::InvalidNumber("1.0.0".into()))
        );
        assert_eq!(
            syntax.classify("nanx"),
            Err(SyntaxError::InvalidNumber("nanx".into()))
        );
        // Markers must stand alone.
        assert_eq!(
            syntax.classify("[1"),
            Err(SyntaxError::InvalidNumber("[1".into()))
        );
    }

    #[test]
    fn custom_markers() {
        let syntax = WfSyntax {
            value_separator: ',',
            vector_start: "<".into(),
            vector_end: ">".into(),
            ..WfSyntax::default()
        };
        assert!(syntax.validate().is_ok());
        let toks: Vec<_> = syntax.tokenize("1,<,2,>").collect::<Result<_, _>>().unwrap();
        assert_eq!(
            toks,
            vec![Token::Number(1.0), Token::VectorStart, Token::Number(2.0), Token::VectorEnd]
        );
    }

    #[test]
    fn validate_rejects_ambiguous_syntax() {
        let same_markers = WfSyntax {
            vector_end: "[".into(),
            ..WfSyntax::default()
        };
        assert_eq!(
            same_markers.validate(),
            Err(SyntaxConfigError::SameVectorMarkers("[".into()))
        );

        let same_separators = WfSyntax {
            property_separator: ' ',
            ..WfSyntax::default()
        };
        assert_eq!(
            same_separators.validate(),
            Err(SyntaxConfigError::SameSeparators(' '))
        );

        let blank_marker = WfSyntax {
            vector_start: " ".into(),
            ..WfSyntax::default()
        };
        assert_eq!(blank_marker.validate(), Err(SyntaxConfigError::BlankVectorMarker));
    }

    #[test]
    fn syntax_loads_from_partial_json() {
        let syntax: WfSyntax = serde_json::from_str(r#"{ "value_separator": "\t" }"#).unwrap();
        assert_eq!(syntax.value_separator, '\t');
        assert_eq!(syntax.property_separator, ':');
        assert_eq!(syntax.vector_start, "[");
    }
}
