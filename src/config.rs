/// Extraction settings, shared read-only by every printing and extraction call.
///
/// # Examples
///
/// ```
/// use kclause::config::Config;
///
/// let config = Config::default()
///     .with_prefix("KCONFIG_")
///     .with_reverse_dependencies(false);
/// assert_eq!(config.prefix, "KCONFIG_");
/// assert!(!config.reverse_dependencies);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prepended to every symbol name in constraint output (default: `CONFIG_`).
    pub prefix: String,
    /// Emit `select` and `rev_dep` rules (default: true).
    pub reverse_dependencies: bool,
    /// Debug-level diagnostics (default: false).
    pub verbose: bool,
    /// Symbols excluded from the defaults listing, in the order given.
    pub force_off: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "CONFIG_".to_string(),
            reverse_dependencies: true,
            verbose: false,
            force_off: Vec::new(),
        }
    }
}

impl Config {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn without_prefix(self) -> Self {
        self.with_prefix("")
    }

    pub fn with_reverse_dependencies(mut self, enabled: bool) -> Self {
        self.reverse_dependencies = enabled;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_force_off<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_off.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_forced_off(&self, name: &str) -> bool {
        self.force_off.iter().any(|n| n == name)
    }

    /// Log level matching the verbosity setting.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prefix, "CONFIG_");
        assert!(config.reverse_dependencies);
        assert!(!config.verbose);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_without_prefix() {
        let config = Config::default().with_prefix("X_").without_prefix();
        assert_eq!(config.prefix, "");
    }

    #[test]
    fn test_force_off() {
        let config = Config::default()
            .with_force_off(["FOO"])
            .with_force_off(vec![String::from("BAR")]);
        assert_eq!(config.force_off, vec!["FOO", "BAR"]);
        assert!(config.is_forced_off("BAR"));
        assert!(!config.is_forced_off("BAZ"));
    }
}
