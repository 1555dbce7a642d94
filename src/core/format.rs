//! Output formats - which generator backend a scenario exercises.

use serde::{Deserialize, Serialize};

/// Environment variable that selects the format when none is given explicitly.
pub const FORMAT_ENV: &str = "TESTGYP_FORMAT";

/// A generator output format, one per supported backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Pretty-printed dump of the generator's input data
    Gypd,
    /// Makefiles driven by `make`
    Make,
    /// Visual Studio solutions driven by `devenv`
    Msvs,
    /// SConstruct files driven by `scons`
    Scons,
    /// Xcode projects driven by `xcodebuild`
    Xcode,
}

impl Format {
    /// Every known format, in listing order.
    pub const ALL: [Format; 5] = [
        Format::Gypd,
        Format::Make,
        Format::Msvs,
        Format::Scons,
        Format::Xcode,
    ];

    /// Get the format name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Gypd => "gypd",
            Format::Make => "make",
            Format::Msvs => "msvs",
            Format::Scons => "scons",
            Format::Xcode => "xcode",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Format::Gypd => "Generator data dump (no build tool)",
            Format::Make => "Makefile builds",
            Format::Msvs => "Visual Studio solution builds",
            Format::Scons => "SCons builds",
            Format::Xcode => "Xcode project builds",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Format {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gypd" => Ok(Format::Gypd),
            "make" => Ok(Format::Make),
            "msvs" => Ok(Format::Msvs),
            "scons" => Ok(Format::Scons),
            "xcode" => Ok(Format::Xcode),
            _ => Err(FormatParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatParseError(pub String);

impl std::fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown format '{}', valid values: gypd, make, msvs, scons, xcode",
            self.0
        )
    }
}

impl std::error::Error for FormatParseError {}

/// Restricts which formats a scenario is meaningful for.
///
/// Entries prefixed with `!` exclude a format. Any remaining entries form
/// an include-list; when it is non-empty, only those formats are admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatFilter {
    included: Vec<String>,
    excluded: Vec<String>,
}

impl FormatFilter {
    /// Build a filter from a list like `["make", "!xcode"]`.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = FormatFilter::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if let Some(name) = entry.strip_prefix('!') {
                filter.excluded.push(name.to_lowercase());
            } else if !entry.is_empty() {
                filter.included.push(entry.to_lowercase());
            }
        }
        filter
    }

    /// Whether a scenario should run under `format`.
    pub fn admits(&self, format: Format) -> bool {
        let name = format.as_str();
        if self.excluded.iter().any(|f| f == name) {
            return false;
        }
        self.included.is_empty() || self.included.iter().any(|f| f == name)
    }

    /// Whether the filter admits every format.
    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_roundtrip() {
        for format in Format::ALL {
            assert_eq!(format.as_str().parse::<Format>().unwrap(), format);
        }
        assert_eq!("MSVS".parse::<Format>().unwrap(), Format::Msvs);
    }

    #[test]
    fn test_format_parse_unknown() {
        let err = "ninja".parse::<Format>().unwrap_err();
        assert_eq!(err.0, "ninja");
        assert!(err.to_string().contains("valid values"));
    }

    #[test]
    fn test_filter_empty_admits_everything() {
        let filter = FormatFilter::new(Vec::<String>::new());
        assert!(filter.is_empty());
        assert!(Format::ALL.iter().all(|f| filter.admits(*f)));
    }

    #[test]
    fn test_filter_exclusion() {
        let filter = FormatFilter::new(["!msvs", "!xcode"]);
        assert!(filter.admits(Format::Make));
        assert!(filter.admits(Format::Scons));
        assert!(!filter.admits(Format::Msvs));
        assert!(!filter.admits(Format::Xcode));
    }

    #[test]
    fn test_filter_inclusion() {
        let filter = FormatFilter::new(["make", "scons"]);
        assert!(filter.admits(Format::Make));
        assert!(!filter.admits(Format::Xcode));
        assert!(!filter.admits(Format::Gypd));
    }

    #[test]
    fn test_filter_exclusion_wins_over_inclusion() {
        let filter = FormatFilter::new(["make", "!make"]);
        assert!(!filter.admits(Format::Make));
    }
}
