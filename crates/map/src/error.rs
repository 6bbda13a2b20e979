use std::fmt;

/// Error raised when parsing a color-stop table fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteParseError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for PaletteParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "palette line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for PaletteParseError {}

/// Error raised when parsing a hint-map ASCII grid fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintMapParseError {
    pub message: String,
}

impl fmt::Display for HintMapParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hint map: {}", self.message)
    }
}

impl std::error::Error for HintMapParseError {}
