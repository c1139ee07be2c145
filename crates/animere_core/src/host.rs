//! Host abstraction
//!
//! The engine never touches a concrete document. Everything it reads or
//! writes goes through [`Host`], and everything that happens on the host side
//! (elements scrolling into view, nodes being inserted, CSS animations
//! ending) is delivered back to the engine as plain data.
//!
//! ```text
//! Host (browser bindings, headless document, ...)
//!     ↓ IntersectionEntry / MutationRecord
//! Animere::handle_intersections / handle_mutations
//!     ↓ Trigger state machine
//! Host::set_style_property / add_class / once_animation_end
//! ```
//!
//! Execution is single-threaded: listeners are plain boxed closures and
//! receive the host mutably when they fire.

use std::fmt::Debug;
use std::hash::Hash;

use crate::gate::Environment;
use crate::geometry::Rect;

/// Listener invoked once when an element's CSS animation ends
pub type AnimationEndListener<H> = Box<dyn FnOnce(&mut H, <H as Host>::Node)>;

/// The document an engine runs against
pub trait Host: Sized + 'static {
    /// Handle to a node in the document
    type Node: Copy + Eq + Hash + Debug + 'static;

    /// Handle to a registered intersection observer
    type Observer: Copy + Eq + Debug + 'static;

    /// Snapshot of the environment, consulted by the init gate
    fn environment(&self) -> Environment;

    /// Elements carrying `attribute`, in document order
    fn query_attribute(&self, attribute: &str) -> Vec<Self::Node>;

    /// Whether `node` is an element (as opposed to text and other node kinds)
    fn is_element(&self, node: Self::Node) -> bool;

    /// Whether `node` is still attached to the document
    fn is_connected(&self, node: Self::Node) -> bool;

    /// All attributes of `node` as `(name, value)` pairs, in source order
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Inline style property (`visibility`, `--animate-delay`, ...)
    fn style_property(&self, node: Self::Node, name: &str) -> Option<String>;

    fn set_style_property(&mut self, node: Self::Node, name: &str, value: &str);

    fn add_class(&mut self, node: Self::Node, class: &str);

    fn remove_class(&mut self, node: Self::Node, class: &str);

    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Start observing `node` against the viewport
    ///
    /// Each call creates an independent observer that reports once right away
    /// and afterwards as `reporting` asks.
    fn observe_intersection(&mut self, node: Self::Node, reporting: Reporting) -> Self::Observer;

    /// Stop an observer; it must not report again
    fn unobserve_intersection(&mut self, observer: Self::Observer);

    /// Start recording child-list mutations for the body subtree
    fn observe_mutations(&mut self);

    /// Register a listener that runs on the next `animationend` of `node`
    /// and is removed right after
    fn once_animation_end(&mut self, node: Self::Node, listener: AnimationEndListener<Self>);
}

/// When an intersection observer reports after its initial entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reporting {
    /// Whenever the visible ratio crosses the threshold, in either direction
    Threshold(f64),
    /// On every geometry change while the target intersects the root, and
    /// once when it stops intersecting
    Continuous,
}

/// Visibility report for one observed element
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<N, O> {
    pub target: N,
    pub observer: O,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    pub bounding_rect: Rect,
    pub root_bounds: Rect,
}

/// One batch of child-list changes
#[derive(Clone, Debug, PartialEq)]
pub struct MutationRecord<N> {
    pub added: Vec<N>,
    pub removed: Vec<N>,
}

impl<N> MutationRecord<N> {
    pub fn added(nodes: Vec<N>) -> Self {
        Self {
            added: nodes,
            removed: Vec::new(),
        }
    }

    pub fn removed(nodes: Vec<N>) -> Self {
        Self {
            added: Vec::new(),
            removed: nodes,
        }
    }
}

/// Entry type for a given host
pub type HostEntry<H> = IntersectionEntry<<H as Host>::Node, <H as Host>::Observer>;

/// Mutation record type for a given host
pub type HostMutation<H> = MutationRecord<<H as Host>::Node>;
