use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};
use crate::focus::FocusSnapshot;
use crate::hooks::{Cx, HookStore};
use crate::materialize::materialize;
use crate::node::{Child, Node};

/// The root component: called once per pass with that pass's [`Cx`].
pub type RootComponent = dyn Fn(&Cx) -> Result<Node>;

/// The single persistent component instance behind a [`Renderer`].
pub(crate) struct Instance {
    component: Rc<RootComponent>,
    dom: Dom,
    container: NodeId,
    pub(crate) hooks: RefCell<HookStore>,
    building: Cell<bool>,
    passes: Cell<u64>,
    last_pass: Cell<Duration>,
}

impl Instance {
    pub(crate) fn is_building(&self) -> bool {
        self.building.get()
    }
}

/// Marks the instance as building for the lifetime of the guard and resets the hook
/// cursors. Dropping it unbinds, including when the component fails.
struct PassGuard<'a> {
    inst: &'a Instance,
}

impl<'a> PassGuard<'a> {
    fn begin(inst: &'a Instance) -> Self {
        inst.building.set(true);
        inst.hooks.borrow_mut().begin_pass();
        PassGuard { inst }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.inst.building.set(false);
    }
}

/// Render bookkeeping exposed for tools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Passes that committed.
    pub passes: u64,
    /// Build + commit time of the latest committed pass (effects excluded).
    pub last_pass: Duration,
    pub live_nodes: usize,
}

/// Drives render passes for one root component mounted into one container.
#[derive(Clone)]
pub struct Renderer {
    inst: Rc<Instance>,
}

impl Renderer {
    /// Binds `component` to `container` without rendering.
    pub fn new(
        component: impl Fn(&Cx) -> Result<Node> + 'static,
        dom: &Dom,
        container: NodeId,
    ) -> Self {
        Self {
            inst: Rc::new(Instance {
                component: Rc::new(component),
                dom: dom.clone(),
                container,
                hooks: RefCell::new(HookStore::default()),
                building: Cell::new(false),
                passes: Cell::new(0),
                last_pass: Cell::new(Duration::ZERO),
            }),
        }
    }

    pub(crate) fn from_instance(inst: Rc<Instance>) -> Self {
        Self { inst }
    }

    /// Runs one full pass: build, commit, restore focus, drain effects.
    ///
    /// Effects that set state run nested passes to completion before the next
    /// queued effect. If the component fails the previous tree stays committed.
    pub fn render(&self) -> Result<()> {
        let inst = &self.inst;
        if inst.is_building() {
            return Err(Error::RenderInProgress);
        }
        let started = Instant::now();

        let (tree, effects) = {
            let _pass = PassGuard::begin(inst);
            let cx = Cx {
                inst: self.inst.clone(),
            };
            let tree = (inst.component)(&cx)?;
            let effects = inst.hooks.borrow_mut().finish_pass()?;
            (tree, effects)
        };

        let focus = FocusSnapshot::capture(&inst.dom);
        let nodes = materialize(&inst.dom, &Child::Node(tree))?;
        inst.dom.replace_children(inst.container, nodes);
        focus.restore(&inst.dom, inst.container);

        let pass = inst.passes.get() + 1;
        inst.passes.set(pass);
        inst.last_pass.set(started.elapsed());
        log::debug!(
            "render pass #{pass} committed: {} live nodes, {} effects queued",
            inst.dom.len(),
            effects.len()
        );

        effects.drain()
    }

    /// Runs every cleanup the effects registered. The effects become due again, so
    /// a later [`Renderer::render`] starts them fresh.
    pub fn cleanup_effects(&self) {
        let cleanups = self.inst.hooks.borrow_mut().take_cleanups();
        log::debug!("running {} effect cleanups", cleanups.len());
        for cleanup in cleanups {
            cleanup.run();
        }
    }

    pub fn stats(&self) -> PassStats {
        PassStats {
            passes: self.inst.passes.get(),
            last_pass: self.inst.last_pass.get(),
            live_nodes: self.inst.dom.len(),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.inst.dom
    }

    pub fn container(&self) -> NodeId {
        self.inst.container
    }
}

/// Binds `component` to `container` and commits the first pass.
///
/// The instance lives as long as anything can still set its state; the returned
/// [`Renderer`] is only needed for explicit renders, stats and cleanup.
#[must_use = "the renderer is needed for explicit renders, stats and effect cleanup"]
pub fn mount(
    component: impl Fn(&Cx) -> Result<Node> + 'static,
    dom: &Dom,
    container: NodeId,
) -> Result<Renderer> {
    let renderer = Renderer::new(component, dom, container);
    renderer.render()?;
    Ok(renderer)
}
