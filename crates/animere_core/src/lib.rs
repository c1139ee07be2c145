//! Animere Core
//!
//! CSS-driven, scroll-triggered animations for elements described by `data`
//! attributes:
//!
//! - **Attribute resolution**: `data-animere="bounce"` names the animation,
//!   `data-animere-<option>` becomes the custom property `--animate-<option>`
//! - **One-shot triggers**: each element animates the first time it becomes
//!   visible, then is never observed again
//! - **Completion signal**: animation classes are removed on `animationend`
//!   and the element is marked with `data-animere-finished="true"`
//! - **Dynamic watching**: elements inserted later are picked up from
//!   mutation records
//! - **Axis policy**: optional one-dimensional overlap qualification
//!
//! The engine is host-driven. A [`Host`] implementation (browser bindings, a
//! headless document, ...) performs the actual reads and writes and hands
//! intersection and mutation notifications back to [`Animere`].
//!
//! # Example
//!
//! ```ignore
//! use animere_core::{Animere, Config};
//!
//! let mut animere = Animere::init(&mut host, Config::default());
//! animere.handle_intersections(&mut host, &entries);
//!
//! // Or against an explicit clock
//! animere.handle_intersections_at(&mut host, &entries, now);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod host;
pub mod naming;
pub mod policy;
pub mod resolver;
pub mod runner;
pub mod trigger;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use config::{AnimereOptions, Axis, Config, ConfigBuilder};
pub use engine::Animere;
pub use error::{ConfigError, Result};
pub use gate::{is_crawler, AlwaysInit, Environment, EnvironmentGate, InitGate};
pub use geometry::Rect;
pub use host::{
    AnimationEndListener, Host, HostEntry, HostMutation, IntersectionEntry, MutationRecord,
    Reporting,
};
pub use policy::{axis_overlap, Qualifier};
pub use resolver::{resolve, resolve_attributes, Directive, StyleOverride};
pub use runner::{AnimationRunner, Completion};
pub use trigger::{Trigger, TriggerState};
pub use watcher::MutationWatcher;
