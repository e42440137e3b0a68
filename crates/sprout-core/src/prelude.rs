pub use crate::dom::{Dom, Event, NodeId};
pub use crate::effects::{Dep, Deps, Dispose, on_cleanup};
pub use crate::error::*;
pub use crate::focus::FOCUS_KEY_ATTR;
pub use crate::hooks::{Cx, Setter};
pub use crate::identity::StrictEq;
pub use crate::node::{Attributes, Child, Component, Handler, Node, Props, build, h};
pub use crate::runtime::{Renderer, mount};
pub use crate::{children, deps};
