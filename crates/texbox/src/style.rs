//! TeX math styles and the transitions between them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight TeX rendering styles.
///
/// The discriminants follow TeX's own ordering: every even value is a normal
/// style and the following odd value is its cramped variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum TexStyle {
    #[default]
    Display = 0,
    DisplayCramped = 1,
    Text = 2,
    TextCramped = 3,
    Script = 4,
    ScriptCramped = 5,
    ScriptScript = 6,
    ScriptScriptCramped = 7,
}

impl TexStyle {
    const ALL: [TexStyle; 8] = [
        TexStyle::Display,
        TexStyle::DisplayCramped,
        TexStyle::Text,
        TexStyle::TextCramped,
        TexStyle::Script,
        TexStyle::ScriptCramped,
        TexStyle::ScriptScript,
        TexStyle::ScriptScriptCramped,
    ];

    fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index.min(7))]
    }

    fn index(self) -> u8 {
        self as u8
    }

    /// Style used for superscripts
    pub fn sup(self) -> Self {
        let s = self.index();
        Self::from_index(2 * (s / 4) + 4 + (s % 2))
    }

    /// Style used for subscripts (always cramped)
    pub fn sub(self) -> Self {
        let s = self.index();
        Self::from_index(2 * (s / 4) + 4 + 1)
    }

    /// Style used for fraction numerators
    pub fn num(self) -> Self {
        let s = self.index();
        Self::from_index(s + 2 - 2 * (s / 6))
    }

    /// Style used for fraction denominators (always cramped)
    pub fn denom(self) -> Self {
        let s = self.index();
        Self::from_index(2 * (s / 2) + 1 + 2 - 2 * (s / 6))
    }

    /// Style used for the index of an nth root
    pub fn root(self) -> Self {
        TexStyle::ScriptScript
    }

    /// Cramped variant of this style
    pub fn cramped(self) -> Self {
        let s = self.index();
        if s % 2 == 1 {
            self
        } else {
            Self::from_index(s + 1)
        }
    }

    pub fn is_cramped(self) -> bool {
        self.index() % 2 == 1
    }

    pub fn is_display(self) -> bool {
        self.index() < 2
    }

    /// True for script and scriptscript styles
    pub fn is_script_or_smaller(self) -> bool {
        self.index() >= 4
    }

    /// 0 for display/text, 1 for script, 2 for scriptscript
    pub fn size_index(self) -> usize {
        match self.index() {
            0..=3 => 0,
            4 | 5 => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for TexStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TexStyle::Display => "display",
            TexStyle::DisplayCramped => "display'",
            TexStyle::Text => "text",
            TexStyle::TextCramped => "text'",
            TexStyle::Script => "script",
            TexStyle::ScriptCramped => "script'",
            TexStyle::ScriptScript => "scriptscript",
            TexStyle::ScriptScriptCramped => "scriptscript'",
        };
        f.write_str(name)
    }
}
