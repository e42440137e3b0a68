//! # Components, hooks, and render passes
//!
//! Sprout is a small synchronous UI runtime. A root component is a function from a
//! render context to a description tree; every state change rebuilds the whole live
//! tree, keeping focus, selection and IME composition intact across the swap.
//!
//! There are four pieces:
//!
//! - `build` / `h` — immutable description nodes (`Node`, `Child`).
//! - `Cx::use_state` / `Cx::use_effect` — order-based hook slots.
//! - `Renderer` — one render pass: build, commit, restore focus, drain effects.
//! - `Dom` — the live tree the pass commits into.
//!
//! ## State
//!
//! ```rust
//! use sprout_core::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let dom = Dom::new();
//! let root = dom.create_element("div");
//! let setter = Rc::new(RefCell::new(None));
//!
//! let slot = setter.clone();
//! let app = move |cx: &Cx| -> Result<Node> {
//!     let (count, set_count) = cx.use_state(0)?;
//!     *slot.borrow_mut() = Some(set_count);
//!     Ok(h("span", Attributes::new(), children![count]))
//! };
//!
//! let _renderer = mount(app, &dom, root).unwrap();
//! assert_eq!(dom.text_content(root), "0");
//!
//! let set_count = setter.borrow().clone().unwrap();
//! set_count.update(|n| n + 1).unwrap();
//! assert_eq!(dom.text_content(root), "1");
//! ```
//!
//! - The Nth `use_state` and Mth `use_effect` call of a pass always address the
//!   same slots; a pass that calls a different number of hooks fails with
//!   `Error::HookOrderChanged`.
//! - Setting a value identical to the current one (see `StrictEq`) does nothing.
//!
//! ## Effects and cleanup
//!
//! `use_effect` queues work to run after the pass commits. The effect may return a
//! `Dispose` that runs right before the same slot runs again:
//!
//! ```rust
//! use sprout_core::prelude::*;
//!
//! fn Clock(cx: &Cx) -> Result<Node> {
//!     let (tick, _set_tick) = cx.use_state(0u64)?;
//!     cx.use_effect(
//!         move || {
//!             log::info!("tick is now {tick}");
//!             Ok(on_cleanup(|| log::info!("leaving tick")))
//!         },
//!         deps![tick],
//!     )?;
//!     Ok(h("p", Attributes::new(), children![tick]))
//! }
//! # let dom = Dom::new();
//! # let root = dom.create_element("div");
//! # mount(Clock, &dom, root).unwrap();
//! ```
//!
//! Nested components (`Component`) get only their props; they have no hooks and are
//! re-evaluated from scratch every pass.

pub mod dom;
pub mod effects;
pub mod error;
pub mod focus;
pub mod hooks;
pub mod identity;
pub mod materialize;
pub mod node;
pub mod prelude;
pub mod runtime;
mod tests;

pub use dom::*;
pub use effects::*;
pub use error::*;
pub use focus::*;
pub use hooks::*;
pub use identity::*;
pub use materialize::*;
pub use node::*;
pub use runtime::*;

#[doc(hidden)]
pub use smallvec;
