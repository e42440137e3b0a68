//! In-memory live presentation tree.
//!
//! `Dom` is the committed side of a render pass: elements and text nodes in a slot-map
//! arena, with focus, selection, and IME composition state on text-capable elements.
//! It also simulates the user side (typing, composition) so the runtime can be driven
//! end to end without a real windowing backend.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::Result;
use crate::node::Handler;

new_key_type! {
    pub struct NodeId;
}

#[derive(Clone, Debug)]
pub struct Event {
    /// Lowercase event name, e.g. `input` or `compositionend`.
    pub kind: String,
    pub target: NodeId,
    /// The target's value at dispatch time.
    pub value: String,
    pub is_composing: bool,
}

#[derive(Debug)]
pub enum LiveNode {
    Text(String),
    Element(Element),
}

#[derive(Debug)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    class_name: String,
    value: String,
    selection: Option<(usize, usize)>,
    composing: bool,
    listeners: Vec<(String, Handler)>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            attributes: Vec::new(),
            class_name: String::new(),
            value: String::new(),
            selection: None,
            composing: false,
            listeners: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn listener_names(&self) -> impl Iterator<Item = &str> {
        self.listeners.iter().map(|(n, _)| n.as_str())
    }

    /// Inputs and textareas carry focus keys, selection and composition.
    pub fn is_text_capable(&self) -> bool {
        self.tag.eq_ignore_ascii_case("input") || self.tag.eq_ignore_ascii_case("textarea")
    }
}

#[derive(Default)]
struct DomInner {
    nodes: SlotMap<NodeId, LiveNode>,
    active: Option<NodeId>,
}

impl DomInner {
    fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id) {
            Some(LiveNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id) {
            Some(LiveNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if self.active == Some(next) {
                self.active = None;
            }
            if let Some(LiveNode::Element(el)) = self.nodes.remove(next) {
                stack.extend(el.children);
            }
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.nodes.get(id) {
            Some(LiveNode::Text(t)) => out.push_str(t),
            Some(LiveNode::Element(el)) => {
                for child in &el.children {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }
}

/// Shared handle to one live tree. Cloning is cheap; all clones see the same nodes.
#[derive(Clone, Default)]
pub struct Dom {
    inner: Rc<RefCell<DomInner>>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .nodes
            .insert(LiveNode::Element(Element::new(tag)))
    }

    pub fn create_text(&self, text: impl Into<String>) -> NodeId {
        self.inner
            .borrow_mut()
            .nodes
            .insert(LiveNode::Text(text.into()))
    }

    /// Number of live nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(id)
    }

    pub fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&LiveNode) -> R) -> Option<R> {
        self.inner.borrow().nodes.get(id).map(f)
    }

    pub fn with_element<R>(&self, id: NodeId, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.inner.borrow().element(id).map(f)
    }

    /// Sets a plain attribute. `value` is mirrored into the element's current value,
    /// the same way a fresh input picks up its `value` attribute.
    pub fn set_attribute(&self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut inner = self.inner.borrow_mut();
        let Some(el) = inner.element_mut(id) else {
            return;
        };
        if name == "value" {
            el.value = value.clone();
        }
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => el.attributes.push((name.to_owned(), value)),
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.with_element(id, |el| el.attribute(name).map(str::to_owned))
            .flatten()
    }

    pub fn set_class_name(&self, id: NodeId, class: impl Into<String>) {
        if let Some(el) = self.inner.borrow_mut().element_mut(id) {
            el.class_name = class.into();
        }
    }

    pub fn class_name(&self, id: NodeId) -> Option<String> {
        self.with_element(id, |el| el.class_name.clone())
    }

    pub fn tag(&self, id: NodeId) -> Option<String> {
        self.with_element(id, |el| el.tag.clone())
    }

    pub fn add_listener(&self, id: NodeId, event: impl Into<String>, handler: Handler) {
        if let Some(el) = self.inner.borrow_mut().element_mut(id) {
            el.listeners.push((event.into(), handler));
        }
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.append_children(parent, &[child]);
    }

    pub fn append_children(&self, parent: NodeId, children: &[NodeId]) {
        if let Some(el) = self.inner.borrow_mut().element_mut(parent) {
            el.children.extend_from_slice(children);
        }
    }

    /// Swaps the whole child list of `parent` in one step. The previous children and
    /// their subtrees are freed; focus is dropped if it lived among them.
    pub fn replace_children(&self, parent: NodeId, children: Vec<NodeId>) {
        let mut inner = self.inner.borrow_mut();
        let Some(el) = inner.element_mut(parent) else {
            return;
        };
        let old = std::mem::replace(&mut el.children, children);
        for id in old {
            inner.remove_subtree(id);
        }
    }

    /// Frees `id` and everything below it. Callers detach it from its parent first.
    pub fn remove(&self, id: NodeId) {
        self.inner.borrow_mut().remove_subtree(id);
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.with_element(id, |el| el.children.clone())
            .unwrap_or_default()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.inner.borrow().collect_text(id, &mut out);
        out
    }

    /// First descendant of `root` (pre-order, `root` excluded) whose attribute
    /// `name` equals `value`.
    pub fn query_attr(&self, root: NodeId, name: &str, value: &str) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let mut stack: Vec<NodeId> = inner.element(root)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(el) = inner.element(id) {
                if el.attribute(name) == Some(value) {
                    return Some(id);
                }
                stack.extend(el.children.iter().rev().copied());
            }
        }
        None
    }

    /// First descendant element of `root` with the given tag.
    pub fn query_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let mut stack: Vec<NodeId> = inner.element(root)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(el) = inner.element(id) {
                if el.tag.eq_ignore_ascii_case(tag) {
                    return Some(id);
                }
                stack.extend(el.children.iter().rev().copied());
            }
        }
        None
    }

    pub fn focus(&self, id: NodeId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.element(id).is_none() {
            return false;
        }
        inner.active = Some(id);
        true
    }

    pub fn blur(&self) {
        self.inner.borrow_mut().active = None;
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.borrow().active
    }

    pub fn is_text_capable(&self, id: NodeId) -> bool {
        self.with_element(id, Element::is_text_capable)
            .unwrap_or(false)
    }

    pub fn value(&self, id: NodeId) -> Option<String> {
        self.with_element(id, |el| el.value.clone())
    }

    pub fn set_value(&self, id: NodeId, value: impl Into<String>) {
        if let Some(el) = self.inner.borrow_mut().element_mut(id) {
            el.value = value.into();
        }
    }

    pub fn selection(&self, id: NodeId) -> Option<(usize, usize)> {
        self.with_element(id, |el| el.selection).flatten()
    }

    pub fn set_selection_range(&self, id: NodeId, start: usize, end: usize) {
        if let Some(el) = self.inner.borrow_mut().element_mut(id) {
            el.selection = Some((start, end));
        }
    }

    pub fn is_composing(&self, id: NodeId) -> bool {
        self.with_element(id, |el| el.composing).unwrap_or(false)
    }

    pub fn set_composing(&self, id: NodeId, composing: bool) {
        if let Some(el) = self.inner.borrow_mut().element_mut(id) {
            el.composing = composing;
        }
    }

    /// Calls every listener registered on `target` for `kind`. Listeners are cloned
    /// out first, so a handler may re-render (and free `target`) safely.
    pub fn dispatch(&self, target: NodeId, kind: &str) -> Result<()> {
        let (handlers, event) = {
            let inner = self.inner.borrow();
            let Some(el) = inner.element(target) else {
                return Ok(());
            };
            let handlers: Vec<Handler> = el
                .listeners
                .iter()
                .filter(|(name, _)| name == kind)
                .map(|(_, h)| h.clone())
                .collect();
            let event = Event {
                kind: kind.to_owned(),
                target,
                value: el.value.clone(),
                is_composing: el.composing,
            };
            (handlers, event)
        };
        for handler in handlers {
            handler.call(&event)?;
        }
        Ok(())
    }

    /// Plain typing: the element's value becomes `value`, then `input` fires.
    pub fn input(&self, target: NodeId, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let caret = value.chars().count();
        self.set_value(target, value);
        self.set_selection_range(target, caret, caret);
        self.dispatch(target, "input")
    }

    pub fn composition_start(&self, target: NodeId) -> Result<()> {
        self.set_composing(target, true);
        self.dispatch(target, "compositionstart")
    }

    /// An intermediate IME keystroke: `input` fires with `is_composing` set.
    pub fn composition_update(&self, target: NodeId, value: impl Into<String>) -> Result<()> {
        self.set_value(target, value);
        self.dispatch(target, "input")
    }

    pub fn composition_end(&self, target: NodeId, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let caret = value.chars().count();
        self.set_composing(target, false);
        self.set_value(target, value);
        self.set_selection_range(target, caret, caret);
        self.dispatch(target, "compositionend")
    }
}
