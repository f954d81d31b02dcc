use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Flag switches as the page sends them (`{"global": true, "ignoreCase": false, ...}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegexFlags {
    /// Report every non-overlapping match instead of the first one.
    pub global: bool,
    pub ignore_case: bool,
    /// `^` and `$` also match at line breaks.
    pub multiline: bool,
    /// `.` also matches `\n`.
    pub dot_all: bool,
    /// Kept for parity with the page; matching is always Unicode-aware.
    pub unicode: bool,
    /// Each match must start exactly where the previous one ended.
    pub sticky: bool,
}

/// Letter, switch name, and help text for each flag, in display order.
pub const FLAG_TABLE: [(char, &str, &str); 6] = [
    (
        'g',
        "global",
        "Find all matches rather than stopping after the first match",
    ),
    ('i', "ignoreCase", "Case-insensitive matching"),
    ('m', "multiline", "^ and $ match at line breaks"),
    ('s', "dotAll", ". matches newline characters"),
    ('u', "unicode", "Unicode matching"),
    (
        'y',
        "sticky",
        "Matches only from the position where the previous match ended",
    ),
];

impl RegexFlags {
    fn get(&self, letter: char) -> bool {
        match letter {
            'g' => self.global,
            'i' => self.ignore_case,
            'm' => self.multiline,
            's' => self.dot_all,
            'u' => self.unicode,
            'y' => self.sticky,
            _ => false,
        }
    }

    fn slot(&mut self, letter: char) -> Option<&mut bool> {
        match letter {
            'g' => Some(&mut self.global),
            'i' => Some(&mut self.ignore_case),
            'm' => Some(&mut self.multiline),
            's' => Some(&mut self.dot_all),
            'u' => Some(&mut self.unicode),
            'y' => Some(&mut self.sticky),
            _ => None,
        }
    }
}

/// Renders the compact letter form, e.g. `gi`.
impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, _, _) in FLAG_TABLE {
            if self.get(letter) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// Parses the compact letter form; unknown or repeated letters are rejected.
impl FromStr for RegexFlags {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = RegexFlags::default();
        for letter in s.trim().chars() {
            let slot = flags
                .slot(letter)
                .ok_or_else(|| ToolError::InvalidFlags(format!("unknown flag '{letter}'")))?;
            if *slot {
                return Err(ToolError::InvalidFlags(format!("duplicate flag '{letter}'")));
            }
            *slot = true;
        }
        Ok(flags)
    }
}

/// Switch names and their help text, for the flag toggles in the UI.
pub fn flag_descriptions() -> Vec<(&'static str, &'static str)> {
    FLAG_TABLE
        .iter()
        .map(|(_, name, description)| (*name, *description))
        .collect()
}
