//! A minimal WINGs property list: strings and arrays, with the compact and
//! indented text descriptions Window Maker reads.

use std::fmt;

/// Widest line an array may take before indented output breaks it up
const LINE_WIDTH: usize = 77;

/// Spaces per nesting level in indented output
const INDENT: usize = 2;

/// A property-list value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropList {
    /// A string
    String(String),
    /// An ordered array of values
    Array(Vec<PropList>),
}

impl PropList {
    /// Creates a string value
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates an array value
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Creates an array with no items
    #[must_use]
    pub const fn empty_array() -> Self {
        Self::Array(Vec::new())
    }

    /// Appends an item to an array
    ///
    /// # Panics
    /// Panics if `self` is a string.
    pub fn push(&mut self, item: Self) {
        match self {
            Self::Array(items) => items.push(item),
            Self::String(s) => panic!("cannot append to property-list string {s:?}"),
        }
    }

    /// Item of an array at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Takes the item of an array at `index`, dropping the rest
    #[must_use]
    pub fn into_item(self, index: usize) -> Option<Self> {
        match self {
            Self::Array(items) => items.into_iter().nth(index),
            Self::String(_) => None,
        }
    }

    /// Number of items of an array; 0 for a string
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_array().map_or(0, <[Self]>::len)
    }

    /// Whether this is an array with no items, or a string
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The string value, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Array(_) => None,
        }
    }

    /// The items, if this is an array
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            Self::String(_) => None,
        }
    }

    /// Single-line description, e.g. `(Office, (Writer, SHEXEC, writer))`
    #[must_use]
    pub fn description(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    /// Indented description: arrays that do not fit on one line get one
    /// item per line
    #[must_use]
    pub fn indented_description(&self) -> String {
        let mut out = String::new();
        self.write_indented(&mut out, 0);
        out
    }

    /// Compact or indented description
    #[must_use]
    pub fn description_with(&self, indented: bool) -> String {
        if indented {
            self.indented_description()
        } else {
            self.description()
        }
    }

    /// Appends the single-line form
    fn write_compact(&self, out: &mut String) {
        match self {
            Self::String(s) => write_string(s, out),
            Self::Array(items) => {
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_compact(out);
                }
                out.push(')');
            }
        }
    }

    /// Appends the indented form at nesting `level`
    fn write_indented(&self, out: &mut String, level: usize) {
        let Self::Array(items) = self else {
            self.write_compact(out);
            return;
        };

        let compact = self.description();
        if INDENT * (level + 1) + compact.len() <= LINE_WIDTH {
            out.push_str(&compact);
            return;
        }

        let pad = " ".repeat(INDENT * (level + 1));
        out.push_str("(\n");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n");
            }
            out.push_str(&pad);
            item.write_indented(out, level + 1);
        }
        out.push('\n');
        out.push_str(&" ".repeat(INDENT * level));
        out.push(')');
    }
}

impl fmt::Display for PropList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl From<&str> for PropList {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for PropList {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for PropList {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(items)
    }
}

/// Whether a string can be written without quotes
fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '+'))
}

/// Appends a string, quoted and escaped when needed
fn write_string(s: &str, out: &mut String) {
    if is_bare(s) {
        out.push_str(s);
        return;
    }

    out.push('"');
    for c in s.chars() {
        match c {
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
}
