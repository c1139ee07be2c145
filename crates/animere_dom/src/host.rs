//! [`Host`] implementation for [`Document`]

use animere_core::{AnimationEndListener, Environment, Host, Reporting};

use crate::document::{Document, NodeId};
use crate::observer::ObserverId;

impl Host for Document {
    type Node = NodeId;
    type Observer = ObserverId;

    fn environment(&self) -> Environment {
        self.environment.clone()
    }

    fn query_attribute(&self, attribute: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&node| Document::has_attribute(self, node, attribute))
            .collect()
    }

    fn is_element(&self, node: NodeId) -> bool {
        Document::is_element(self, node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        Document::is_connected(self, node)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        Document::attributes(self, node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        Document::attribute(self, node, name).map(str::to_string)
    }

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        Document::has_attribute(self, node, name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        Document::set_attribute(self, node, name, value);
    }

    fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.style(node, name).map(str::to_string)
    }

    fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        self.set_style(node, name, value);
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        Document::add_class(self, node, class);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        Document::remove_class(self, node, class);
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        Document::has_class(self, node, class)
    }

    fn observe_intersection(&mut self, node: NodeId, reporting: Reporting) -> ObserverId {
        self.observe(node, reporting)
    }

    fn unobserve_intersection(&mut self, observer: ObserverId) {
        self.unobserve(observer);
    }

    fn observe_mutations(&mut self) {
        self.start_mutation_recording();
    }

    fn once_animation_end(&mut self, node: NodeId, listener: AnimationEndListener<Self>) {
        self.add_animation_end_listener(node, listener);
    }
}
