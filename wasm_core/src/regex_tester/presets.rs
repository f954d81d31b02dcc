use serde::Serialize;

/// A ready-made pattern offered in the tester's pattern library.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub pattern: &'static str,
    pub description: &'static str,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Email",
        pattern: r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        description: "Basic email validation",
    },
    Preset {
        name: "Phone",
        pattern: r"\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})",
        description: "US phone number",
    },
    Preset {
        name: "URL",
        pattern: r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)",
        description: "URL validation",
    },
    Preset {
        name: "IPv4",
        pattern: r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
        description: "IPv4 address",
    },
    Preset {
        name: "Date (YYYY-MM-DD)",
        pattern: r"\d{4}-\d{2}-\d{2}",
        description: "ISO date format",
    },
    Preset {
        name: "Time (HH:MM)",
        pattern: r"([01]?[0-9]|2[0-3]):[0-5][0-9]",
        description: "24-hour time format",
    },
    Preset {
        name: "Hex Color",
        pattern: r"#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})",
        description: "Hexadecimal color codes",
    },
    Preset {
        name: "Credit Card",
        pattern: r"\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}",
        description: "Credit card number format",
    },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex_tester::{compile, find_all, RegexFlags};

    fn first_match(name: &str, subject: &str) -> Option<String> {
        let preset = find_preset(name).expect("preset exists");
        let pattern = compile(preset.pattern, RegexFlags::default()).expect("preset compiles");
        find_all(&pattern, subject)
            .into_iter()
            .next()
            .map(|m| m.matched_text)
    }

    #[test]
    fn every_preset_compiles() {
        for preset in PRESETS {
            assert!(
                compile(preset.pattern, RegexFlags::default()).is_ok(),
                "{} failed to compile",
                preset.name
            );
        }
    }

    #[test]
    fn presets_match_typical_input() {
        assert_eq!(
            first_match("email", "mail dev@example.org now").as_deref(),
            Some("dev@example.org")
        );
        assert_eq!(
            first_match("Phone", "call (555) 123-4567").as_deref(),
            Some("(555) 123-4567")
        );
        assert_eq!(
            first_match("URL", "see https://www.rust-lang.org/learn").as_deref(),
            Some("https://www.rust-lang.org/learn")
        );
        assert_eq!(
            first_match("IPv4", "host 192.168.1.254 up").as_deref(),
            Some("192.168.1.254")
        );
        assert_eq!(first_match("IPv4", "999.1.1.1 only"), None);
        assert_eq!(
            first_match("Hex Color", "color: #1a2B3c;").as_deref(),
            Some("#1a2B3c")
        );
        assert_eq!(
            first_match("Credit Card", "4111-1111-1111-1111").as_deref(),
            Some("4111-1111-1111-1111")
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(find_preset("hex color").is_some());
        assert!(find_preset("missing").is_none());
    }
}
