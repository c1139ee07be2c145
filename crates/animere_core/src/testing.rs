//! Minimal in-crate host for unit tests

use rustc_hash::FxHashMap;

use crate::gate::Environment;
use crate::geometry::Rect;
use crate::host::{AnimationEndListener, Host, IntersectionEntry, MutationRecord, Reporting};

#[derive(Default)]
struct MockElement {
    is_element: bool,
    connected: bool,
    attributes: Vec<(String, String)>,
    style: FxHashMap<String, String>,
    classes: Vec<String>,
}

/// Flat element store with counters for the operations tests assert on
pub(crate) struct MockHost {
    pub env: Environment,
    elements: FxHashMap<u32, MockElement>,
    order: Vec<u32>,
    next_node: u32,
    observers: FxHashMap<u32, (u32, Reporting)>,
    next_observer: u32,
    listeners: Vec<(u32, AnimationEndListener<MockHost>)>,
    pub mutations_observed: bool,
    pub class_adds: usize,
    pub class_removes: usize,
    /// Order-sensitive log of writes (`hide`, `observe`, ...)
    pub log: Vec<String>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            env: Environment::interactive(),
            elements: FxHashMap::default(),
            order: Vec::new(),
            next_node: 1,
            observers: FxHashMap::default(),
            next_observer: 1,
            listeners: Vec::new(),
            mutations_observed: false,
            class_adds: 0,
            class_removes: 0,
            log: Vec::new(),
        }
    }

    pub fn element(&mut self, attributes: &[(&str, &str)]) -> u32 {
        let id = self.next_node;
        self.next_node += 1;
        self.elements.insert(
            id,
            MockElement {
                is_element: true,
                connected: true,
                attributes: attributes
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                ..Default::default()
            },
        );
        self.order.push(id);
        id
    }

    pub fn text(&mut self) -> u32 {
        let id = self.next_node;
        self.next_node += 1;
        self.elements.insert(
            id,
            MockElement {
                connected: true,
                ..Default::default()
            },
        );
        self.order.push(id);
        id
    }

    pub fn detach(&mut self, node: u32) {
        if let Some(el) = self.elements.get_mut(&node) {
            el.connected = false;
        }
    }

    pub fn clear_attributes(&mut self, node: u32) {
        if let Some(el) = self.elements.get_mut(&node) {
            el.attributes.clear();
        }
    }

    pub fn classes(&self, node: u32) -> Vec<String> {
        self.elements[&node].classes.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn observer_of(&self, node: u32) -> Option<u32> {
        self.observers
            .iter()
            .find(|(_, (target, _))| *target == node)
            .map(|(id, _)| *id)
    }

    pub fn reporting_of(&self, node: u32) -> Option<Reporting> {
        self.observers
            .values()
            .find(|(target, _)| *target == node)
            .map(|(_, reporting)| *reporting)
    }

    pub fn pending_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Entry for `node` as reported by its current observer
    pub fn entry(&self, node: u32, ratio: f64) -> IntersectionEntry<u32, u32> {
        let observer = self.observer_of(node).unwrap_or(0);
        IntersectionEntry {
            target: node,
            observer,
            is_intersecting: ratio > 0.0,
            intersection_ratio: ratio,
            bounding_rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            root_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
        }
    }

    pub fn added(&self, nodes: &[u32]) -> MutationRecord<u32> {
        MutationRecord::added(nodes.to_vec())
    }

    /// Dispatch `animationend`, returning how many listeners ran
    pub fn fire_animation_end(&mut self, node: u32) -> usize {
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|(target, _)| *target == node);
        self.listeners = kept;
        let count = fired.len();
        for (target, listener) in fired {
            listener(self, target);
        }
        count
    }
}

impl Host for MockHost {
    type Node = u32;
    type Observer = u32;

    fn environment(&self) -> Environment {
        self.env.clone()
    }

    fn query_attribute(&self, attribute: &str) -> Vec<u32> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                let el = &self.elements[id];
                el.connected && el.attributes.iter().any(|(n, _)| n == attribute)
            })
            .collect()
    }

    fn is_element(&self, node: u32) -> bool {
        self.elements.get(&node).is_some_and(|el| el.is_element)
    }

    fn is_connected(&self, node: u32) -> bool {
        self.elements.get(&node).is_some_and(|el| el.connected)
    }

    fn attributes(&self, node: u32) -> Vec<(String, String)> {
        self.elements[&node].attributes.clone()
    }

    fn attribute(&self, node: u32, name: &str) -> Option<String> {
        self.elements[&node]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, node: u32, name: &str, value: &str) {
        self.log.push(format!("attr {name}={value}"));
        let el = self.elements.get_mut(&node).unwrap();
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn style_property(&self, node: u32, name: &str) -> Option<String> {
        self.elements[&node].style.get(name).cloned()
    }

    fn set_style_property(&mut self, node: u32, name: &str, value: &str) {
        self.log.push(format!("style {name}={value}"));
        self.elements
            .get_mut(&node)
            .unwrap()
            .style
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&mut self, node: u32, class: &str) {
        self.class_adds += 1;
        self.log.push(format!("add {class}"));
        let classes = &mut self.elements.get_mut(&node).unwrap().classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: u32, class: &str) {
        self.class_removes += 1;
        self.log.push(format!("remove {class}"));
        self.elements
            .get_mut(&node)
            .unwrap()
            .classes
            .retain(|c| c != class);
    }

    fn has_class(&self, node: u32, class: &str) -> bool {
        self.elements[&node].classes.iter().any(|c| c == class)
    }

    fn observe_intersection(&mut self, node: u32, reporting: Reporting) -> u32 {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.insert(id, (node, reporting));
        self.log.push("observe".to_string());
        id
    }

    fn unobserve_intersection(&mut self, observer: u32) {
        self.observers.remove(&observer);
        self.log.push("unobserve".to_string());
    }

    fn observe_mutations(&mut self) {
        self.mutations_observed = true;
    }

    fn once_animation_end(&mut self, node: u32, listener: AnimationEndListener<Self>) {
        self.listeners.push((node, listener));
    }
}
