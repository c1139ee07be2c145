//! Name normalization between attribute and property casing
//!
//! Attributes are written in kebab case (`data-animere-delay`) while the
//! dataset view of an element exposes them in camel case (`animereDelay`).
//! Both conversions are ASCII-only and never consult the locale.
//!
//! ```rust
//! use animere_core::naming::{to_camel_case, to_kebab_case};
//!
//! assert_eq!(to_camel_case("foo-bar"), "fooBar");
//! assert_eq!(to_kebab_case("fooBar"), "foo-bar");
//! ```

/// Prefix shared by all dataset-backed attributes
pub const DATA_PREFIX: &str = "data-";

/// Convert `foo-bar` to `fooBar`
///
/// Only a hyphen directly followed by a lowercase ASCII letter is folded.
/// Anything else (leading/trailing hyphens, digits, already camel-cased
/// input) is kept as-is.
pub fn to_camel_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

/// Convert `fooBar` to `foo-bar`
///
/// A hyphen is inserted between a lowercase ASCII letter and the uppercase
/// letter that follows it, then the whole name is lowercased.
pub fn to_kebab_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev: Option<char> = None;

    for c in value.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
        prev = Some(c);
    }

    out
}

/// Dataset key for a `data-*` attribute name (`data-animere-delay` -> `animereDelay`)
///
/// Returns `None` for attributes outside the dataset namespace.
pub fn dataset_key(attribute: &str) -> Option<String> {
    attribute.strip_prefix(DATA_PREFIX).map(to_camel_case)
}

/// Attribute name for a dataset key (`animereFinished` -> `data-animere-finished`)
pub fn data_attribute(key: &str) -> String {
    format!("{}{}", DATA_PREFIX, to_kebab_case(key))
}
