//! Source ranges and provenance metadata.

use serde::{Deserialize, Serialize};

/// A span of lines in one source file.
///
/// Lines are 1-based and inclusive. The empty range (no file, line zero)
/// is reserved for values that did not come from source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub file: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl Range {
    pub fn new(file: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self {
            file: file.into(),
            start_line,
            end_line,
        }
    }

    /// A range covering a single line.
    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Self::new(file, line, line)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_empty() && self.start_line == 0 && self.end_line == 0
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &Range) -> bool {
        self.file == other.file
            && self.start_line <= other.start_line
            && other.end_line <= self.end_line
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "<no source>")
        } else if self.start_line == self.end_line {
            write!(f, "{}:{}", self.file, self.start_line)
        } else {
            write!(f, "{}:{}-{}", self.file, self.start_line, self.end_line)
        }
    }
}

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Declared in source.
    Explicit,
    /// The owning block exists but the attribute was absent or unusable.
    Defaulted,
    /// Synthesized because the owning block was never declared.
    Unmanaged,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Explicit => "explicit",
            Provenance::Defaulted => "defaulted",
            Provenance::Unmanaged => "unmanaged",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Range plus provenance, attached to every extracted value and entity.
///
/// Fields are private: only explicit metadata can carry a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Metadata {
    range: Range,
    provenance: Provenance,
}

impl Metadata {
    pub fn explicit(range: Range) -> Self {
        Self {
            range,
            provenance: Provenance::Explicit,
        }
    }

    pub fn defaulted() -> Self {
        Self {
            range: Range::empty(),
            provenance: Provenance::Defaulted,
        }
    }

    pub fn unmanaged() -> Self {
        Self {
            range: Range::empty(),
            provenance: Provenance::Unmanaged,
        }
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn is_explicit(&self) -> bool {
        self.provenance == Provenance::Explicit
    }

    pub fn is_defaulted(&self) -> bool {
        self.provenance == Provenance::Defaulted
    }

    /// False only for synthesized placeholders.
    pub fn is_managed(&self) -> bool {
        self.provenance != Provenance::Unmanaged
    }
}
