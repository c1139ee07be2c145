//! Engine configuration
//!
//! A [`Config`] is validated once, when it is built, and never changes while
//! the engine runs. It can be assembled in code through [`ConfigBuilder`] or
//! deserialized from the same options object the script-tag API accepts:
//!
//! ```rust
//! use animere_core::config::{Axis, Config};
//!
//! let config = Config::from_json(r#"{ "prefix": "reveal", "offset": 0.5, "axis": "y" }"#)
//!     .unwrap();
//! assert_eq!(config.prefix(), "reveal");
//! assert_eq!(config.axis(), Some(Axis::Y));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::naming::{to_camel_case, DATA_PREFIX};

/// Default attribute prefix (`data-animere`)
pub const DEFAULT_PREFIX: &str = "animere";

/// Default share of an element that has to be visible before it animates
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.2;

/// Default class prefix, matching Animate.css
pub const DEFAULT_CLASS_PREFIX: &str = "animate__";

/// Axis used by the axis-restricted qualification policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal overlap (left/right edges)
    X,
    /// Vertical overlap (top/bottom edges)
    Y,
}

/// Raw, unvalidated options
///
/// Every field is optional; missing fields fall back to the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimereOptions {
    /// Prefix for `data` attributes
    pub prefix: Option<String>,
    /// Ratio of the element that must be visible before it animates
    #[serde(alias = "offset")]
    pub visibility_threshold: Option<f64>,
    /// Restrict qualification to overlap along one axis
    pub axis: Option<Axis>,
    /// Watch the document for inserted elements
    #[serde(alias = "watchDOM")]
    pub dynamic_watch: Option<bool>,
    /// Prefix for the transient animation classes
    pub class_prefix: Option<String>,
    /// Force-finish animations whose end event never arrives
    pub finish_timeout_ms: Option<u64>,
}

/// Validated engine configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    prefix: String,
    visibility_threshold: f64,
    axis: Option<Axis>,
    dynamic_watch: bool,
    class_prefix: String,
    finish_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            axis: None,
            dynamic_watch: false,
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            finish_timeout: None,
        }
    }
}

impl Config {
    /// Start building a configuration from the defaults
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate a set of raw options
    pub fn from_options(options: AnimereOptions) -> Result<Self> {
        let mut builder = ConfigBuilder::default();
        if let Some(prefix) = options.prefix {
            builder = builder.prefix(prefix);
        }
        if let Some(threshold) = options.visibility_threshold {
            builder = builder.visibility_threshold(threshold);
        }
        if let Some(axis) = options.axis {
            builder = builder.axis(axis);
        }
        if let Some(watch) = options.dynamic_watch {
            builder = builder.dynamic_watch(watch);
        }
        if let Some(class_prefix) = options.class_prefix {
            builder = builder.class_prefix(class_prefix);
        }
        if let Some(ms) = options.finish_timeout_ms {
            builder = builder.finish_timeout(Duration::from_millis(ms));
        }
        builder.build()
    }

    /// Parse and validate a JSON options object
    pub fn from_json(json: &str) -> Result<Self> {
        let options: AnimereOptions = serde_json::from_str(json)?;
        Self::from_options(options)
    }

    /// The attribute prefix, e.g. `animere`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn visibility_threshold(&self) -> f64 {
        self.visibility_threshold
    }

    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    pub fn dynamic_watch(&self) -> bool {
        self.dynamic_watch
    }

    /// Prefix for the transient classes, e.g. `animate__`
    pub fn class_prefix(&self) -> &str {
        &self.class_prefix
    }

    pub fn finish_timeout(&self) -> Option<Duration> {
        self.finish_timeout
    }

    /// Attribute holding the animation name (`data-animere`)
    pub fn name_attribute(&self) -> String {
        format!("{}{}", DATA_PREFIX, self.prefix)
    }

    /// Attribute excluding an element from enumeration (`data-animere-skip`)
    pub fn skip_attribute(&self) -> String {
        format!("{}{}-skip", DATA_PREFIX, self.prefix)
    }

    /// Attribute written once an element has finished (`data-animere-finished`)
    pub fn finished_attribute(&self) -> String {
        format!("{}{}-finished", DATA_PREFIX, self.prefix)
    }

    /// The prefix as it appears in dataset keys (`my-anim` -> `myAnim`)
    pub fn dataset_prefix(&self) -> String {
        to_camel_case(&self.prefix)
    }
}

/// Builder for [`Config`]
///
/// Nothing is checked until [`build`](ConfigBuilder::build), which fails
/// fast instead of clamping.
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn visibility_threshold(mut self, threshold: f64) -> Self {
        self.config.visibility_threshold = threshold;
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.config.axis = Some(axis);
        self
    }

    pub fn dynamic_watch(mut self, watch: bool) -> Self {
        self.config.dynamic_watch = watch;
        self
    }

    pub fn class_prefix(mut self, class_prefix: impl Into<String>) -> Self {
        self.config.class_prefix = class_prefix.into();
        self
    }

    pub fn finish_timeout(mut self, timeout: Duration) -> Self {
        self.config.finish_timeout = Some(timeout);
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<Config> {
        let config = self.config;
        validate_prefix(&config.prefix)?;

        let threshold = config.visibility_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }

        Ok(config)
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(ConfigError::EmptyPrefix);
    }

    let valid_chars = prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || prefix.starts_with('-') || prefix.ends_with('-') || prefix.contains("--")
    {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prefix(), "animere");
        assert_eq!(config.visibility_threshold(), 0.2);
        assert_eq!(config.axis(), None);
        assert!(!config.dynamic_watch());
        assert_eq!(config.class_prefix(), "animate__");
        assert_eq!(config.finish_timeout(), None);
    }

    #[test]
    fn test_attribute_names() {
        let config = Config::builder().prefix("my-anim").build().unwrap();
        assert_eq!(config.name_attribute(), "data-my-anim");
        assert_eq!(config.skip_attribute(), "data-my-anim-skip");
        assert_eq!(config.finished_attribute(), "data-my-anim-finished");
        assert_eq!(config.dataset_prefix(), "myAnim");
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Config::builder().visibility_threshold(0.0).build().is_ok());
        assert!(Config::builder().visibility_threshold(1.0).build().is_ok());
        assert!(matches!(
            Config::builder().visibility_threshold(1.5).build(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
        assert!(matches!(
            Config::builder().visibility_threshold(-0.1).build(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
        assert!(matches!(
            Config::builder().visibility_threshold(f64::NAN).build(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
    }

    #[test]
    fn test_prefix_validation() {
        assert!(matches!(
            Config::builder().prefix("").build(),
            Err(ConfigError::EmptyPrefix)
        ));
        for bad in ["Animere", "ani mere", "-anim", "anim-", "a--b", "ani_mere"] {
            assert!(
                matches!(
                    Config::builder().prefix(bad).build(),
                    Err(ConfigError::InvalidPrefix(_))
                ),
                "{bad} should be rejected"
            );
        }
        assert!(Config::builder().prefix("reveal-2").build().is_ok());
    }

    #[test]
    fn test_from_json_aliases() {
        let config = Config::from_json(r#"{ "offset": 0.5, "watchDOM": true }"#).unwrap();
        assert_eq!(config.visibility_threshold(), 0.5);
        assert!(config.dynamic_watch());

        let config = Config::from_json(
            r#"{ "visibilityThreshold": 0.75, "dynamicWatch": true, "axis": "x", "finishTimeoutMs": 1500 }"#,
        )
        .unwrap();
        assert_eq!(config.visibility_threshold(), 0.75);
        assert_eq!(config.axis(), Some(Axis::X));
        assert_eq!(config.finish_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Options(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "offset": 2 }"#),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "axis": "z" }"#),
            Err(ConfigError::Options(_))
        ));
    }

    #[test]
    fn test_empty_options_are_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
