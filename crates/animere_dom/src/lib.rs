//! Animere Headless Document
//!
//! An in-memory document that implements [`animere_core::Host`]. It keeps
//! a small element tree with attributes, classes and inline style, lays
//! every element out as a rectangle in document coordinates, and emulates
//! the three platform services the engine relies on:
//!
//! - **Intersection observers**: ratios computed against a scrollable
//!   viewport, reported on observe and then on threshold crossings or on
//!   every geometry change, as each observer asks
//! - **Mutation observation**: child-list records for the body subtree
//! - **Animation events**: once-only `animationend` listeners
//!
//! # Example
//!
//! ```rust
//! use animere_core::{AlwaysInit, Animere, Config, Rect};
//! use animere_dom::{flush, Document};
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! let body = doc.body();
//! let hero = doc.append_element(body, "div", &[("data-animere", "bounce")]);
//! doc.set_rect(hero, Rect::new(0.0, 1000.0, 800.0, 200.0));
//!
//! let mut animere = Animere::init_with_gate(&mut doc, Config::default(), &AlwaysInit);
//! flush(&mut doc, &mut animere);
//! assert!(!doc.has_class(hero, "animate__bounce"));
//!
//! doc.scroll_to(0.0, 700.0);
//! flush(&mut doc, &mut animere);
//! assert!(doc.has_class(hero, "animate__bounce"));
//! ```

pub mod document;
pub mod driver;
pub mod events;
pub mod host;
pub mod observer;

pub use document::{Document, NodeId, NodeKind};
pub use driver::{end_animations, flush, flush_at, FlushStats};
pub use observer::{DocumentEntry, ObserverId};
