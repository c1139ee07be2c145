//! Attribute configuration resolver
//!
//! Turns the declarative attributes of one element into a [`Directive`]:
//!
//! ```html
//! <div data-animere="fadeIn" data-animere-delay="2s" data-animere-duration="500ms">
//! ```
//!
//! resolves to the animation `fadeIn` with the custom properties
//! `--animate-delay: 2s` and `--animate-duration: 500ms`, plus
//! `animation-delay: var(--animate-delay)`.
//!
//! Attribute names are matched through their dataset keys, so a prefix of
//! `my-anim` selects `data-my-anim-*` just like `element.dataset` would.

use smallvec::SmallVec;

use crate::config::Config;
use crate::host::Host;
use crate::naming::dataset_key;

/// Namespace token for the generated custom properties
pub const PROPERTY_NAMESPACE: &str = "animate";

/// Option that also drives `animation-delay`
pub const DELAY_OPTION: &str = "delay";

/// Option that also drives `animation-iteration-count`
pub const REPEAT_OPTION: &str = "repeat";

pub const ANIMATION_DELAY: &str = "animation-delay";
pub const ANIMATION_ITERATION_COUNT: &str = "animation-iteration-count";

/// One custom property write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleOverride {
    /// Custom property name, e.g. `--animate-delay`
    pub property: String,
    /// Raw attribute value
    pub value: String,
}

/// Resolved animation settings for one element
///
/// Created fresh every time an element qualifies and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    /// Value of the bare prefix attribute, e.g. `bounce`
    pub animation_name: String,
    /// Custom property writes, in attribute order
    pub overrides: SmallVec<[StyleOverride; 4]>,
    /// `animation-delay` value when a `delay` option is present
    pub delay_override: Option<String>,
    /// `animation-iteration-count` value when a `repeat` option is present
    pub repeat_override: Option<String>,
}

impl Directive {
    /// Write every override onto `node`
    ///
    /// Each write is independent, so applying a directive twice leaves the
    /// element in the same state as applying it once.
    pub fn apply<H: Host>(&self, host: &mut H, node: H::Node) {
        for entry in &self.overrides {
            host.set_style_property(node, &entry.property, &entry.value);
        }
        if let Some(delay) = &self.delay_override {
            host.set_style_property(node, ANIMATION_DELAY, delay);
        }
        if let Some(repeat) = &self.repeat_override {
            host.set_style_property(node, ANIMATION_ITERATION_COUNT, repeat);
        }
    }
}

/// Custom property name for an option (`delay` -> `--animate-delay`)
pub fn custom_property(option: &str) -> String {
    format!("--{}-{}", PROPERTY_NAMESPACE, option)
}

/// Resolve the directive for `node`, or `None` when the element carries no
/// prefix attribute
pub fn resolve<H: Host>(host: &H, node: H::Node, config: &Config) -> Option<Directive> {
    let attributes = host.attributes(node);
    resolve_attributes(
        attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
        config,
    )
}

/// Resolve a directive from raw `(name, value)` attribute pairs
pub fn resolve_attributes<'a, I>(attributes: I, config: &Config) -> Option<Directive>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let prefix = config.dataset_prefix();
    let mut animation_name = None;
    let mut overrides = SmallVec::new();
    let mut delay_override = None;
    let mut repeat_override = None;

    for (name, value) in attributes {
        let Some(key) = dataset_key(name) else {
            continue;
        };

        if key == prefix {
            animation_name = Some(value.to_string());
            continue;
        }

        let Some(rest) = key.strip_prefix(prefix.as_str()) else {
            continue;
        };

        let option = rest.to_ascii_lowercase();
        let property = custom_property(&option);

        match option.as_str() {
            DELAY_OPTION => delay_override = Some(format!("var({})", property)),
            REPEAT_OPTION => repeat_override = Some(format!("var({})", property)),
            _ => {}
        }

        overrides.push(StyleOverride {
            property,
            value: value.to_string(),
        });
    }

    Some(Directive {
        animation_name: animation_name?,
        overrides,
        delay_override,
        repeat_override,
    })
}
