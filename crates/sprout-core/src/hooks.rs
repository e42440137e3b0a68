//! Order-based hook slots.
//!
//! The Nth `use_state` call of a pass always addresses state slot N, and the Mth
//! `use_effect` call addresses effect slot M. Call order is the only identity a slot
//! has, so hooks must not be called conditionally or in loops of varying length; the
//! store checks slot counts after every pass and fails with
//! [`Error::HookOrderChanged`] when they move.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::effects::{Deps, EffectQueue, EffectSlot, IntoCleanup, deps_changed, effect_job};
use crate::error::{Error, HookKind, Result};
use crate::identity::StrictEq;
use crate::runtime::{Instance, Renderer};

#[derive(Default)]
pub(crate) struct HookStore {
    /// Each entry is an `Rc<RefCell<T>>` for the slot's `T`.
    states: Vec<Box<dyn Any>>,
    effects: Vec<Rc<RefCell<EffectSlot>>>,
    state_index: usize,
    effect_index: usize,
    /// Slot counts of the last pass that built successfully.
    committed: Option<(usize, usize)>,
    pending: EffectQueue,
}

impl HookStore {
    pub(crate) fn begin_pass(&mut self) {
        self.state_index = 0;
        self.effect_index = 0;
        self.pending = EffectQueue::default();
    }

    /// Checks this pass used the same number of slots as the previous one and hands
    /// back the effects it scheduled.
    pub(crate) fn finish_pass(&mut self) -> Result<EffectQueue> {
        if let Some((states, effects)) = self.committed {
            if states != self.state_index {
                return Err(Error::HookOrderChanged {
                    kind: HookKind::State,
                    previous: states,
                    current: self.state_index,
                });
            }
            if effects != self.effect_index {
                return Err(Error::HookOrderChanged {
                    kind: HookKind::Effect,
                    previous: effects,
                    current: self.effect_index,
                });
            }
        }
        self.committed = Some((self.state_index, self.effect_index));
        Ok(std::mem::take(&mut self.pending))
    }

    fn next_state<T: 'static>(&mut self) -> Result<(usize, Option<Rc<RefCell<T>>>)> {
        let index = self.state_index;
        self.state_index += 1;
        match self.states.get(index) {
            Some(slot) => slot
                .downcast_ref::<Rc<RefCell<T>>>()
                .cloned()
                .map(|slot| (index, Some(slot)))
                .ok_or(Error::HookTypeMismatch {
                    kind: HookKind::State,
                    index,
                }),
            None => match self.committed {
                Some((previous, _)) => Err(Error::HookOrderChanged {
                    kind: HookKind::State,
                    previous,
                    current: index + 1,
                }),
                None => Ok((index, None)),
            },
        }
    }

    fn insert_state<T: 'static>(&mut self, index: usize, slot: Rc<RefCell<T>>) -> Result<()> {
        if index != self.states.len() {
            return Err(Error::HookOrderChanged {
                kind: HookKind::State,
                previous: self.states.len(),
                current: index,
            });
        }
        self.states.push(Box::new(slot));
        Ok(())
    }

    fn next_effect(&mut self) -> Result<Rc<RefCell<EffectSlot>>> {
        let index = self.effect_index;
        self.effect_index += 1;
        if let Some(slot) = self.effects.get(index) {
            return Ok(slot.clone());
        }
        if let Some((_, previous)) = self.committed {
            return Err(Error::HookOrderChanged {
                kind: HookKind::Effect,
                previous,
                current: index + 1,
            });
        }
        let slot = Rc::new(RefCell::new(EffectSlot::default()));
        self.effects.push(slot.clone());
        Ok(slot)
    }

    /// Takes every stored cleanup, leaving the slots due to run again.
    pub(crate) fn take_cleanups(&mut self) -> Vec<crate::Dispose> {
        self.effects
            .iter()
            .filter_map(|slot| {
                let mut slot = slot.borrow_mut();
                slot.last_deps = None;
                slot.cleanup.take()
            })
            .collect()
    }
}

/// Render context handed to the root component for one pass.
///
/// Hooks are methods on `Cx`. A `Cx` that escapes its pass (moved into a handler or
/// an effect) refuses hook calls with [`Error::NotRendering`].
#[derive(Clone)]
pub struct Cx {
    pub(crate) inst: Rc<Instance>,
}

impl Cx {
    fn ensure_building(&self, hook: &'static str) -> Result<()> {
        if self.inst.is_building() {
            Ok(())
        } else {
            Err(Error::NotRendering { hook })
        }
    }

    /// Returns the slot's current value and a setter. `initial` is stored on the
    /// first pass only.
    pub fn use_state<T>(&self, initial: T) -> Result<(T, Setter<T>)>
    where
        T: Clone + StrictEq + 'static,
    {
        self.use_state_with(move || initial)
    }

    /// Like [`Cx::use_state`], but `init` runs only when the slot is created.
    pub fn use_state_with<T>(&self, init: impl FnOnce() -> T) -> Result<(T, Setter<T>)>
    where
        T: Clone + StrictEq + 'static,
    {
        self.ensure_building("use_state")?;
        let (index, existing) = self.inst.hooks.borrow_mut().next_state::<T>()?;
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = Rc::new(RefCell::new(init()));
                self.inst
                    .hooks
                    .borrow_mut()
                    .insert_state(index, slot.clone())?;
                slot
            }
        };
        let value = slot.borrow().clone();
        Ok((
            value,
            Setter {
                slot,
                owner: self.inst.clone(),
            },
        ))
    }

    /// Schedules `effect` to run after this pass commits when `deps` changed.
    ///
    /// `None` runs it after every pass, `deps![]` once. The effect may return a
    /// [`crate::Dispose`] which runs right before the next run of the same slot.
    pub fn use_effect<F, O>(&self, effect: F, deps: impl Into<Option<Deps>>) -> Result<()>
    where
        F: FnOnce() -> Result<O> + 'static,
        O: IntoCleanup + 'static,
    {
        self.ensure_building("use_effect")?;
        let deps = deps.into();
        let mut hooks = self.inst.hooks.borrow_mut();
        let slot = hooks.next_effect()?;
        let due = deps_changed(slot.borrow().last_deps.as_ref(), deps.as_ref());
        if due {
            hooks.pending.push(effect_job(slot, effect, deps));
        }
        Ok(())
    }
}

/// Updates one state slot and re-renders its instance.
///
/// A setter keeps its instance alive, so state changes keep rendering after the
/// [`Renderer`] returned by [`crate::mount`] is dropped.
pub struct Setter<T> {
    slot: Rc<RefCell<T>>,
    owner: Rc<Instance>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            owner: self.owner.clone(),
        }
    }
}

impl<T: StrictEq + 'static> Setter<T> {
    /// Stores `next` and runs a full render pass before returning, unless `next` is
    /// identical to the current value.
    pub fn set(&self, next: T) -> Result<()> {
        if self.slot.borrow().strict_eq(&next) {
            log::trace!("set_state: value unchanged, skipping render");
            return Ok(());
        }
        if self.owner.is_building() {
            return Err(Error::RenderInProgress);
        }
        *self.slot.borrow_mut() = next;
        Renderer::from_instance(self.owner.clone()).render()
    }

    /// Computes the next value from the current one, then behaves like [`Setter::set`].
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let next = {
            let current = self.slot.borrow();
            f(&current)
        };
        self.set(next)
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.slot.borrow().clone()
    }
}
