//! One helper per element tag, so page code reads like markup.
//!
//! ```rust
//! use sprout_core::{Attributes, children};
//! use sprout_ui::{Li, Strong, Ul};
//!
//! let list = Ul(
//!     Attributes::new().class("chat-list"),
//!     children![Li(Attributes::new(), children![Strong(Attributes::new(), children!["Alice: "]), "Hi"])],
//! );
//! assert_eq!(list.tag(), Some("ul"));
//! ```

use sprout_core::{Attributes, Child, Component, Node, h};

macro_rules! elements {
    ($($name:ident => $tag:literal),* $(,)?) => {
        $(
            #[doc = concat!("`<", $tag, ">`")]
            pub fn $name(attrs: Attributes, children: Vec<Child>) -> Node {
                h($tag, attrs, children)
            }
        )*
    };
}

elements!(
    Main => "main",
    Header => "header",
    Section => "section",
    Div => "div",
    Form => "form",
    Label => "label",
    Button => "button",
    Ul => "ul",
    Li => "li",
    P => "p",
    Span => "span",
    Strong => "strong",
    H1 => "h1",
    Textarea => "textarea",
);

/// `<input>` never has children.
pub fn Input(attrs: Attributes) -> Node {
    h("input", attrs, Vec::new())
}

/// Groups children without a wrapping element. They are spliced into the parent
/// when the tree is materialized; no children yields a single empty placeholder.
pub fn Fragment(attrs: Attributes, children: Vec<Child>) -> Node {
    let fragment = Component::new("Fragment", |props| {
        if props.children.is_empty() {
            Ok(Child::Empty)
        } else {
            Ok(Child::List(props.children.clone()))
        }
    });
    h(fragment, attrs, children)
}
