use sprout_core::{AttrValue, Attributes, Child, Component, Node, children, h};
use sprout_ui::{Div, Li, Strong};

use crate::model::{ChatMessage, format_time};

const OWN_BUBBLE: &str = "margin:6px 0; text-align:right;";
const OTHER_BUBBLE: &str = "margin:6px 0; text-align:left;";
const OWN_MESSAGE: &str = "display:inline-block; background:#d1e7ff; color:#0b3b75; padding:6px 10px; border-radius:12px 12px 0 12px;";
const OTHER_MESSAGE: &str = "display:inline-block; background:#f2f2f2; color:#222; padding:6px 10px; border-radius:12px 12px 12px 0;";

/// One chat bubble. Own messages are right-aligned; the time is shown `utc_offset`
/// seconds east of UTC.
pub fn MessageItem(message: &ChatMessage, own: bool, utc_offset: i64) -> Node {
    let item = Component::new("MessageItem", |props| {
        let attrs = &props.attrs;
        let name = attrs.text("name").unwrap_or_default();
        let message = attrs.text("message").unwrap_or_default();
        let ts = match attrs.get("ts") {
            Some(AttrValue::Number(ts)) => *ts as i64,
            _ => 0,
        };
        let own = matches!(attrs.get("own"), Some(AttrValue::Bool(true)));
        let offset = match attrs.get("utc-offset") {
            Some(AttrValue::Number(offset)) => *offset as i64,
            _ => 0,
        };

        Ok(Child::from(Li(
            Attributes::new().attr("style", if own { OWN_BUBBLE } else { OTHER_BUBBLE }),
            children![
                Div(
                    Attributes::new().attr("style", if own { OWN_MESSAGE } else { OTHER_MESSAGE }),
                    children![Strong(Attributes::new(), children![format!("{name}: ")]), message],
                ),
                Div(
                    Attributes::new().attr("style", "font-size:12px; color:#666; margin-top:2px;"),
                    children![format_time(ts, offset)],
                ),
            ],
        )))
    });

    h(
        item,
        Attributes::new()
            .attr("name", message.name.as_str())
            .attr("message", message.message.as_str())
            .attr("ts", message.ts)
            .attr("own", own)
            .attr("utc-offset", utc_offset),
        Vec::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{Dom, materialize};

    fn render(message: &ChatMessage, own: bool) -> (Dom, sprout_core::NodeId) {
        render_at(message, own, 0)
    }

    fn render_at(message: &ChatMessage, own: bool, offset: i64) -> (Dom, sprout_core::NodeId) {
        let dom = Dom::new();
        let nodes = materialize(&dom, &MessageItem(message, own, offset).into()).unwrap();
        (dom, nodes[0])
    }

    fn alice() -> ChatMessage {
        ChatMessage {
            id: 1,
            name: "Alice".into(),
            message: "Hi".into(),
            ts: 3_600,
        }
    }

    #[test]
    fn test_bubble_text() {
        let (dom, li) = render(&alice(), false);
        assert_eq!(dom.tag(li).as_deref(), Some("li"));
        assert_eq!(dom.text_content(li), "Alice: Hi01:00:00");
        assert_eq!(dom.attribute(li, "style").as_deref(), Some(OTHER_BUBBLE));
    }

    #[test]
    fn test_own_bubble_is_right_aligned() {
        let (dom, li) = render(&alice(), true);
        assert_eq!(dom.attribute(li, "style").as_deref(), Some(OWN_BUBBLE));
    }

    #[test]
    fn test_time_uses_configured_offset() {
        let (dom, li) = render_at(&alice(), false, 9 * 3_600);
        assert_eq!(dom.text_content(li), "Alice: Hi10:00:00");
    }
}
