//! Error types for the texbox crate

use thiserror::Error;

/// Errors that can occur while building or breaking a formula layout
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A font table or configuration document could not be read
    #[error("Resource parsing error in {resource}: {element}")]
    ResourceParse { resource: String, element: String },

    /// A command could not be turned into an atom
    #[error("Formula parsing error at {line}:{column} in \\{command}: {message}")]
    FormulaParse {
        command: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// The font has no glyph registered under this symbol name
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// The font has no glyph for this character
    #[error("Missing glyph for {ch:?} in {style}")]
    MissingGlyph { ch: char, style: String },

    /// Font metrics that would make an assembly loop run forever
    #[error("Invalid font metrics: {0}")]
    InvalidFontMetrics(String),

    /// Invalid atom arguments
    #[error("Invalid math structure: {0}")]
    InvalidStructure(String),
}

impl LayoutError {
    /// Wrap a JSON error with the name of the resource being read
    pub fn resource(resource: impl Into<String>, err: serde_json::Error) -> Self {
        LayoutError::ResourceParse {
            resource: resource.into(),
            element: format!("line {} column {}: {}", err.line(), err.column(), err),
        }
    }
}

/// Result type for layout operations
pub type MathResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayoutError::UnknownSymbol("lbrack".to_string());
        assert_eq!(err.to_string(), "Unknown symbol: lbrack");
    }

    #[test]
    fn test_formula_parse_display() {
        let err = LayoutError::FormulaParse {
            command: "frac".to_string(),
            line: 2,
            column: 7,
            message: "expected 2 arguments, got 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Formula parsing error at 2:7 in \\frac: expected 2 arguments, got 1"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("{").unwrap_err();
        let err = LayoutError::resource("font.json", json_err);
        match err {
            LayoutError::ResourceParse { resource, .. } => assert_eq!(resource, "font.json"),
            other => panic!("Expected ResourceParse, got {other:?}"),
        }
    }
}
