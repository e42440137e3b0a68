//! Description nodes: the immutable tree a component returns for one render pass.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::Result;
use crate::dom::Event;

/// Event listener attached through an `on*` attribute.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event) -> Result<()>>);

impl Handler {
    pub fn new(f: impl Fn(&Event) -> Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) -> Result<()> {
        (self.0)(event)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<handler>")
    }
}

#[derive(Clone, Debug)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Handler(Handler),
}

impl AttrValue {
    /// String coercion used when the value lands on an element as a plain attribute.
    /// Handlers have no string form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            AttrValue::Text(s) => Some(s.clone()),
            AttrValue::Number(n) => Some(format_number(*n)),
            AttrValue::Bool(b) => Some(b.to_string()),
            AttrValue::Handler(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<Handler> for AttrValue {
    fn from(v: Handler) -> Self {
        AttrValue::Handler(v)
    }
}

macro_rules! numeric_attr {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(v: $t) -> Self {
                    AttrValue::Number(v as f64)
                }
            }
        )*
    };
}

numeric_attr!(i32, i64, u32, u64, usize, f32, f64);

/// Ordered attribute list. Setting a name twice keeps the position of the first
/// write and the value of the last.
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
    children: Option<Box<Child>>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Like [`Attributes::attr`], but `None` leaves the attribute out entirely.
    pub fn maybe<V: Into<AttrValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr(crate::CLASS_ATTR, class.into())
    }

    /// Registers `f` under an `on*` attribute name, e.g. `"onInput"`.
    pub fn handler(
        self,
        name: impl Into<String>,
        f: impl Fn(&Event) -> Result<()> + 'static,
    ) -> Self {
        self.attr(name, Handler::new(f))
    }

    /// Children carried in the attributes; used by [`build`] only when no
    /// children are passed directly.
    pub fn children(mut self, children: impl Into<Child>) -> Self {
        self.children = Some(Box::new(children.into()));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(AttrValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A component function nested below the root. It only ever sees its props, so it
/// has no access to hooks and is evaluated from scratch every pass.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Rc<dyn Fn(&Props) -> Result<Child>>,
}

impl Component {
    pub fn new(name: &'static str, render: impl Fn(&Props) -> Result<Child> + 'static) -> Self {
        Self {
            name,
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, props: &Props) -> Result<Child> {
        (self.render)(props)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.name)
    }
}

#[derive(Clone, Debug)]
pub enum NodeType {
    Primitive(Cow<'static, str>),
    Component(Component),
}

impl From<&'static str> for NodeType {
    fn from(tag: &'static str) -> Self {
        NodeType::Primitive(Cow::Borrowed(tag))
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::Primitive(Cow::Owned(tag))
    }
}

impl From<Component> for NodeType {
    fn from(c: Component) -> Self {
        NodeType::Component(c)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Props {
    pub attrs: Attributes,
    pub children: Vec<Child>,
}

#[derive(Clone, Debug)]
pub struct Node {
    ty: NodeType,
    props: Props,
}

impl Node {
    pub fn ty(&self) -> &NodeType {
        &self.ty
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.ty {
            NodeType::Primitive(tag) => Some(tag.as_ref()),
            NodeType::Component(_) => None,
        }
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn attrs(&self) -> &Attributes {
        &self.props.attrs
    }

    pub fn children(&self) -> &[Child] {
        &self.props.children
    }
}

#[derive(Clone, Debug)]
pub enum Child {
    Node(Node),
    Text(String),
    Number(f64),
    Bool(bool),
    /// `null` / absent: materializes as an empty text node.
    Empty,
    /// A sequence that was nested deeper than the one level [`build`] flattens.
    List(Vec<Child>),
}

impl From<Node> for Child {
    fn from(n: Node) -> Self {
        Child::Node(n)
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Text(s.to_owned())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Text(s)
    }
}

impl From<&String> for Child {
    fn from(s: &String) -> Self {
        Child::Text(s.clone())
    }
}

impl From<bool> for Child {
    fn from(b: bool) -> Self {
        Child::Bool(b)
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(v: Option<T>) -> Self {
        v.map_or(Child::Empty, Into::into)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(v: Vec<T>) -> Self {
        Child::List(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! numeric_child {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Child {
                fn from(v: $t) -> Self {
                    Child::Number(v as f64)
                }
            }
        )*
    };
}

numeric_child!(i32, i64, u32, u64, usize, f32, f64);

/// Builds a description node. Children are flattened one level; a child that is
/// itself a list nested inside a list survives as a [`Child::List`].
pub fn build(ty: impl Into<NodeType>, mut attrs: Attributes, children: Vec<Child>) -> Node {
    let children = if !children.is_empty() {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Child::List(items) => flat.extend(items),
                other => flat.push(other),
            }
        }
        flat
    } else {
        match attrs.children.take().map(|c| *c) {
            Some(Child::List(items)) => items,
            Some(child) => vec![child],
            None => Vec::new(),
        }
    };

    Node {
        ty: ty.into(),
        props: Props { attrs, children },
    }
}

/// Short alias for [`build`].
pub fn h(ty: impl Into<NodeType>, attrs: Attributes, children: Vec<Child>) -> Node {
    build(ty, attrs, children)
}

/// `children![a, b, c]` converts each argument with `Child::from`.
#[macro_export]
macro_rules! children {
    ($($child:expr),* $(,)?) => {
        vec![$($crate::Child::from($child)),*]
    };
}

/// Stringifies a number the way text content expects: integral values without a
/// fraction, `NaN` and `Infinity` spelled out.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_owned()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
