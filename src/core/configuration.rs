//! Build configuration (variant) selection.

/// Name used for both the output directory and the build variant when no
/// configuration has been set.
pub const DEFAULT_CONFIGURATION: &str = "Default";

/// The build variant a scenario builds and inspects.
///
/// May be a compound `config|platform` name, as used by IDE solutions;
/// only the part before `|` names an output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration(Option<String>);

impl Configuration {
    /// Create a configuration, `None` meaning "unset".
    pub fn new(name: Option<impl Into<String>>) -> Self {
        Configuration(name.map(Into::into).filter(|s: &String| !s.is_empty()))
    }

    /// Create a named configuration.
    pub fn named(name: impl Into<String>) -> Self {
        Configuration::new(Some(name))
    }

    /// Whether a configuration was explicitly set.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// The explicitly set name, if any.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Directory name for built output.
    pub fn dirname(&self) -> &str {
        match self.0.as_deref() {
            Some(name) => name.split('|').next().unwrap_or(name),
            None => DEFAULT_CONFIGURATION,
        }
    }

    /// Full name passed to build tools.
    pub fn buildname(&self) -> &str {
        self.0.as_deref().unwrap_or(DEFAULT_CONFIGURATION)
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.buildname())
    }
}
