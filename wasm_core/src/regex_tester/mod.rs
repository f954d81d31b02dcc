//! Regex tester: compile a pattern with page-selected flags, list its matches,
//! and split the subject into highlighted and plain segments.

pub mod flags;
pub mod highlight;
pub mod matcher;
pub mod presets;

pub use flags::{flag_descriptions, RegexFlags};
pub use highlight::{highlight, HighlightSegment};
pub use matcher::{
    compile, compile_with, find_all, replace, CompiledPattern, MatchResult, TesterConfig,
};
pub use presets::{find_preset, Preset, PRESETS};
