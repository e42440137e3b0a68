use crate::dom::{Dom, NodeId};

/// Attribute carrying an explicit focus key.
pub const FOCUS_KEY_ATTR: &str = "data-focus-key";

/// Attributes consulted, in order, to identify the focused element across a rebuild.
pub const FOCUS_KEY_ATTRS: [&str; 3] = [FOCUS_KEY_ATTR, "name", "id"];

/// Focus state of the live tree just before a commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub key: Option<String>,
    pub selection_start: Option<usize>,
    pub selection_end: Option<usize>,
    pub composing: bool,
}

impl FocusSnapshot {
    /// Records the focused input or textarea. Selection is only read when no IME
    /// composition is running on it.
    pub fn capture(dom: &Dom) -> Self {
        let Some(active) = dom.active_element() else {
            return Self::default();
        };
        if !dom.is_text_capable(active) {
            return Self::default();
        }

        // The first attribute present wins, even if it is empty.
        let key = FOCUS_KEY_ATTRS
            .iter()
            .find_map(|name| dom.attribute(active, name))
            .filter(|key| !key.is_empty());
        let composing = dom.is_composing(active);
        let selection = if composing {
            None
        } else {
            dom.selection(active)
        };

        Self {
            key,
            selection_start: selection.map(|(start, _)| start),
            selection_end: selection.map(|(_, end)| end),
            composing,
        }
    }

    /// Focuses the element under `container` matching the captured key. A running
    /// composition carries over to the new element; otherwise the selection is put
    /// back clamped to the new value. Without a recorded selection the caret goes to
    /// the end.
    pub fn restore(&self, dom: &Dom, container: NodeId) -> Option<NodeId> {
        let key = self.key.as_deref()?;
        let next = FOCUS_KEY_ATTRS
            .iter()
            .find_map(|name| dom.query_attr(container, name, key))?;
        dom.focus(next);

        if self.composing {
            dom.set_composing(next, true);
        } else if dom.is_text_capable(next) {
            let len = dom
                .value(next)
                .map(|v| v.chars().count())
                .unwrap_or(0);
            let start = self.selection_start.map_or(len, |s| s.min(len));
            let end = self.selection_end.map_or(len, |e| e.min(len));
            dom.set_selection_range(next, start, end);
        }
        Some(next)
    }
}
