//! Turns a description tree into live nodes.

use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::node::{AttrValue, Attributes, Child, NodeType, format_number};

/// Text nodes are clamped to this many chars.
pub const MAX_TEXT_LEN: usize = 2000;

/// Attribute routed to the element's class field instead of its attribute list.
pub const CLASS_ATTR: &str = "className";

/// Attributes starting with this prefix and holding a handler become listeners.
pub const HANDLER_PREFIX: &str = "on";

/// Materializes `child` into detached live nodes and returns their ids in order
/// (a `Child::List` yields several). Nested components run here, fresh, with their
/// props. On failure every node created so far is freed again.
pub fn materialize(dom: &Dom, child: &Child) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    if let Err(err) = materialize_into(dom, child, &mut out) {
        for id in out {
            dom.remove(id);
        }
        return Err(err);
    }
    Ok(out)
}

fn materialize_into(dom: &Dom, child: &Child, out: &mut Vec<NodeId>) -> Result<()> {
    match child {
        Child::Empty | Child::Bool(_) => out.push(dom.create_text("")),
        Child::Text(text) => out.push(dom.create_text(clamp_text(text))),
        Child::Number(n) => out.push(dom.create_text(clamp_text(&format_number(*n)))),
        Child::List(items) => {
            for item in items {
                materialize_into(dom, item, out)?;
            }
        }
        Child::Node(node) => match node.ty() {
            NodeType::Component(component) => {
                let rendered = component.call(node.props())?;
                materialize_into(dom, &rendered, out)?;
            }
            NodeType::Primitive(tag) => {
                let el = dom.create_element(tag);
                out.push(el);
                apply_attributes(dom, el, node.attrs());

                let mut kids = Vec::with_capacity(node.children().len());
                let built = node
                    .children()
                    .iter()
                    .try_for_each(|c| materialize_into(dom, c, &mut kids));
                // Attach whatever was built so a failure frees it together with `el`.
                dom.append_children(el, &kids);
                built?;
            }
        },
    }
    Ok(())
}

fn apply_attributes(dom: &Dom, el: NodeId, attrs: &Attributes) {
    for (name, value) in attrs.iter() {
        match value {
            AttrValue::Handler(handler) if is_handler_name(name) => {
                dom.add_listener(el, event_name(name), handler.clone());
            }
            AttrValue::Handler(_) => {
                log::warn!("materialize: handler bound to `{name}` has no `on` prefix; dropped");
            }
            _ => {
                let Some(text) = value.as_text() else {
                    continue;
                };
                if name == CLASS_ATTR {
                    dom.set_class_name(el, text);
                } else {
                    dom.set_attribute(el, name, text);
                }
            }
        }
    }
}

fn is_handler_name(name: &str) -> bool {
    name.len() > HANDLER_PREFIX.len() && name.starts_with(HANDLER_PREFIX)
}

/// `onCompositionEnd` listens for `compositionend`.
fn event_name(attr: &str) -> String {
    attr[HANDLER_PREFIX.len()..].to_ascii_lowercase()
}

fn clamp_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_LEN) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
