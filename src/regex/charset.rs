use super::Charset;
use crate::error::GrammarError;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

impl Charset {
    pub fn ascii() -> Self {
        Self {
            label: "ascii",
            ranges: vec![(0, 127)],
        }
    }

    pub fn extended_ascii() -> Self {
        Self {
            label: "extended ascii",
            ranges: vec![(0, 255)],
        }
    }

    /// The basic multilingual plane slice. Both `utf8` and `utf16` name this
    /// set; neither is true UTF-8 coverage.
    pub fn utf8() -> Self {
        Self {
            label: "utf8",
            ranges: vec![(0, 0xFFFF)],
        }
    }

    /// Resolve one of the recognized charset names.
    pub fn from_name(name: &str) -> Result<Self, GrammarError> {
        match name {
            "ascii" => Ok(Charset::ascii()),
            "extended ascii" => Ok(Charset::extended_ascii()),
            "utf8" | "utf16" => Ok(Charset::utf8()),
            other => Err(GrammarError::UnknownCharset {
                value: other.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn contains(&self, c: char) -> bool {
        let v = c as u32;
        self.ranges.iter().any(|&(lo, hi)| lo <= v && v <= hi)
    }

    /// Every character of the set, ascending. Surrogate code points are not
    /// scalar values and are skipped.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.ranges
            .iter()
            .flat_map(|&(lo, hi)| (lo..=hi).filter_map(char::from_u32))
    }

    pub fn len(&self) -> usize {
        self.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}
impl Eq for Charset {}

impl Hash for Charset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ranges.hash(state);
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
