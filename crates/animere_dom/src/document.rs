//! Element tree, attributes, classes and inline style

use animere_core::{Environment, MutationRecord, Rect};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::events::Listeners;
use crate::observer::{Observation, ObserverId};

new_key_type! {
    /// Handle to a node in a [`Document`]
    pub struct NodeId;
}

/// What a node is
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with its tag name
    Element(String),
    /// A text node with its content
    Text(String),
}

pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) classes: IndexSet<String>,
    pub(crate) style: IndexMap<String, String>,
    /// Layout box in document coordinates
    pub(crate) rect: Rect,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
            classes: IndexSet::new(),
            style: IndexMap::new(),
            rect: Rect::ZERO,
        }
    }
}

/// Headless document
///
/// Nodes are created detached and become part of the document once
/// appended below [`body`](Document::body). Removing a node detaches it
/// but keeps it alive, so it can be inserted again.
pub struct Document {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    pub(crate) body: NodeId,
    /// Visible region in document coordinates (scroll offset + size)
    pub(crate) viewport: Rect,
    pub(crate) environment: Environment,
    pub(crate) observations: SlotMap<ObserverId, Observation>,
    pub(crate) observing_mutations: bool,
    pub(crate) mutation_queue: Vec<MutationRecord<NodeId>>,
    pub(crate) listeners: FxHashMap<NodeId, Listeners>,
}

impl Document {
    /// Create an empty document with the given viewport
    pub fn new(viewport: Rect) -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData::new(NodeKind::Element("body".to_string())));

        Self {
            nodes,
            body,
            viewport,
            environment: Environment::interactive(),
            observations: SlotMap::with_key(),
            observing_mutations: false,
            mutation_queue: Vec::new(),
            listeners: FxHashMap::default(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // ========================================================================
    // Tree
    // ========================================================================

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes
            .insert(NodeData::new(NodeKind::Element(tag.to_string())))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.nodes
            .insert(NodeData::new(NodeKind::Text(text.to_string())))
    }

    /// Create an element with attributes and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value);
        }
        self.append_child(parent, node);
        node
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node).map(|n| &n.kind)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`
    ///
    /// A child that already has a parent is moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(parent) || !self.nodes.contains_key(child)
        {
            return;
        }
        if self.is_ancestor(child, parent) {
            tracing::debug!(?parent, ?child, "refusing to append an ancestor");
            return;
        }
        if self.parent(child).is_some() {
            self.remove(child);
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);

        if self.observing_mutations && self.is_connected(parent) {
            self.mutation_queue
                .push(MutationRecord::added(vec![child]));
        }
    }

    /// Detach `node` from its parent
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let was_connected = self.is_connected(parent);

        self.nodes[parent].children.retain(|&c| c != node);
        self.nodes[node].parent = None;

        if self.observing_mutations && was_connected {
            self.mutation_queue
                .push(MutationRecord::removed(vec![node]));
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `node` is the body or one of its descendants
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.body || self.is_ancestor(self.body, node)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(NodeKind::Element(_)))
    }

    /// Connected elements in document order (pre-order, body excluded)
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.extend(self.children(self.body).iter().rev().copied());

        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Set an attribute; names are lowercased like HTML attributes
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            if matches!(data.kind, NodeKind::Element(_)) {
                data.attributes
                    .insert(name.to_ascii_lowercase(), value.to_string());
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.attributes.shift_remove(&name.to_ascii_lowercase());
        }
    }

    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.nodes
            .get(node)
            .map(|n| {
                n.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // Classes
    // ========================================================================

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.classes.shift_remove(class);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.classes.contains(class))
    }

    /// Class list in insertion order
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.nodes
            .get(node)
            .map(|n| n.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Inline style
    // ========================================================================

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|n| n.style.get(property))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.style.insert(property.to_string(), value.to_string());
        }
    }

    /// Inline style declarations in write order
    pub fn style_properties(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.nodes
            .get(node)
            .map(|n| {
                n.style
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Inline style serialized as a `style` attribute value
    pub fn style_text(&self, node: NodeId) -> String {
        self.nodes
            .get(node)
            .map(|n| {
                n.style
                    .iter()
                    .map(|(k, v)| format!("{}: {};", k, v))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Layout box of `node` in document coordinates
    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes.get(node).map(|n| n.rect).unwrap_or(Rect::ZERO)
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.rect = rect;
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.x = x;
        self.viewport.y = y;
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.viewport = self.viewport.translate(dx, dy);
    }

    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Bounding rectangle relative to the viewport, like `getBoundingClientRect`
    pub fn bounding_client_rect(&self, node: NodeId) -> Rect {
        self.rect(node)
            .translate(-self.viewport.x, -self.viewport.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn test_tree_order() {
        let mut doc = doc();
        let body = doc.body();
        let a = doc.append_element(body, "section", &[]);
        let a1 = doc.append_element(a, "div", &[]);
        let text = doc.create_text("hello");
        doc.append_child(a, text);
        let b = doc.append_element(body, "section", &[]);

        assert_eq!(doc.elements(), [a, a1, b]);
        assert!(doc.is_connected(a1));
        assert!(!doc.is_element(text));
    }

    #[test]
    fn test_remove_and_reinsert() {
        let mut doc = doc();
        let body = doc.body();
        let a = doc.append_element(body, "div", &[]);
        let child = doc.append_element(a, "span", &[]);

        doc.remove(a);
        assert!(!doc.is_connected(a));
        assert!(!doc.is_connected(child));
        assert_eq!(doc.parent(child), Some(a));

        doc.append_child(body, a);
        assert!(doc.is_connected(child));
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = doc();
        let body = doc.body();
        let a = doc.append_element(body, "div", &[]);
        let b = doc.append_element(body, "div", &[]);
        let c = doc.append_element(a, "div", &[]);

        doc.append_child(b, c);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), [c]);

        // Cycles are refused
        doc.append_child(c, b);
        assert_eq!(doc.parent(b), Some(body));
    }

    #[test]
    fn test_attributes_classes_style() {
        let mut doc = doc();
        let body = doc.body();
        let el = doc.append_element(body, "div", &[("Data-Animere", "bounce")]);

        assert_eq!(doc.attribute(el, "data-animere"), Some("bounce"));
        doc.set_attribute(el, "data-animere-delay", "1s");
        doc.remove_attribute(el, "Data-Animere");
        assert!(!doc.has_attribute(el, "data-animere"));
        doc.remove_attribute(el, "data-animere-delay");
        assert!(doc.attributes(el).is_empty());

        doc.add_class(el, "a");
        doc.add_class(el, "b");
        doc.add_class(el, "a");
        assert_eq!(doc.classes(el), ["a", "b"]);
        doc.remove_class(el, "a");
        assert_eq!(doc.classes(el), ["b"]);

        doc.set_style(el, "visibility", "hidden");
        doc.set_style(el, "--animate-delay", "2s");
        assert_eq!(doc.style_text(el), "visibility: hidden; --animate-delay: 2s;");
    }

    #[test]
    fn test_text_nodes_have_no_attributes() {
        let mut doc = doc();
        let text = doc.create_text("x");
        doc.set_attribute(text, "data-animere", "bounce");
        assert!(!doc.has_attribute(text, "data-animere"));
    }

    #[test]
    fn test_client_rect_follows_scroll() {
        let mut doc = doc();
        let body = doc.body();
        let el = doc.append_element(body, "div", &[]);
        doc.set_rect(el, Rect::new(0.0, 1000.0, 100.0, 100.0));

        doc.scroll_by(0.0, 900.0);
        assert_eq!(doc.bounding_client_rect(el), Rect::new(0.0, 100.0, 100.0, 100.0));
    }
}
