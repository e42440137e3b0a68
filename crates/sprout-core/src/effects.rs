use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::Result;
use crate::identity::StrictEq;

#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }
}

impl fmt::Debug for Dispose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispose")
    }
}

/// Helper to return a cleanup from an effect.
pub fn on_cleanup(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// What an effect may hand back: nothing, or a cleanup to run before its next run.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Dispose>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Dispose> {
        None
    }
}

impl IntoCleanup for Dispose {
    fn into_cleanup(self) -> Option<Dispose> {
        Some(self)
    }
}

impl IntoCleanup for Option<Dispose> {
    fn into_cleanup(self) -> Option<Dispose> {
        self
    }
}

/// One effect dependency, compared by [`StrictEq`] against the same position on the
/// previous run.
pub struct Dep {
    value: Box<dyn Any>,
    same: fn(&dyn Any, &dyn Any) -> bool,
}

impl Dep {
    pub fn new<T: StrictEq + 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            same: same_as::<T>,
        }
    }

    pub fn same_as(&self, other: &Dep) -> bool {
        (self.same)(self.value.as_ref(), other.value.as_ref())
    }
}

fn same_as<T: StrictEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a.strict_eq(b),
        _ => false,
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dep")
    }
}

pub type Deps = SmallVec<[Dep; 4]>;

/// `deps![a, b]` builds the dependency list for `use_effect`; `deps![]` means
/// "run once".
#[macro_export]
macro_rules! deps {
    ($($dep:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut deps = $crate::Deps::new();
        $(deps.push($crate::Dep::new($dep));)*
        deps
    }};
}

/// No previous run or no deps at all means the effect is due.
pub(crate) fn deps_changed(prev: Option<&Deps>, next: Option<&Deps>) -> bool {
    match (prev, next) {
        (Some(prev), Some(next)) => {
            prev.len() != next.len() || prev.iter().zip(next.iter()).any(|(a, b)| !a.same_as(b))
        }
        _ => true,
    }
}

#[derive(Default)]
pub(crate) struct EffectSlot {
    pub(crate) last_deps: Option<Deps>,
    pub(crate) cleanup: Option<Dispose>,
    /// Bumped every time a run stores its result.
    pub(crate) runs: u64,
}

type Job = Box<dyn FnOnce() -> Result<()>>;

/// Effects scheduled by one render pass, drained in order after that pass commits.
#[derive(Default)]
pub struct EffectQueue {
    jobs: VecDeque<Job>,
}

impl EffectQueue {
    pub fn push(&mut self, job: impl FnOnce() -> Result<()> + 'static) {
        self.jobs.push_back(Box::new(job));
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Runs every job front to back. A failing job stops the drain; the jobs after it
    /// are dropped and their effects stay due for the next pass.
    pub fn drain(mut self) -> Result<()> {
        while let Some(job) = self.jobs.pop_front() {
            job()?;
        }
        Ok(())
    }
}

/// Builds the queued job for one effect slot: run the previous cleanup, record the
/// deps, run the effect, then keep its cleanup.
///
/// Deps are recorded before the effect runs, so an effect that sets state sees its
/// own slot as up to date in the nested pass. A job whose slot was re-run by a later
/// pass before the job got its turn does nothing.
pub(crate) fn effect_job<F, O>(
    slot: Rc<RefCell<EffectSlot>>,
    effect: F,
    deps: Option<Deps>,
) -> impl FnOnce() -> Result<()> + 'static
where
    F: FnOnce() -> Result<O> + 'static,
    O: IntoCleanup + 'static,
{
    let queued = slot.borrow().runs;
    move || {
        if slot.borrow().runs != queued {
            log::trace!("effect: slot already re-ran in a later pass, skipping stale run");
            return Ok(());
        }
        let previous = slot.borrow_mut().cleanup.take();
        if let Some(previous) = previous {
            previous.run();
        }
        let (started, previous_deps) = {
            let mut slot = slot.borrow_mut();
            (slot.runs, std::mem::replace(&mut slot.last_deps, deps))
        };

        let outcome = effect();

        let mut slot = slot.borrow_mut();
        let superseded = slot.runs != started;
        match outcome {
            Err(err) => {
                // Due again on the next pass.
                if !superseded {
                    slot.last_deps = previous_deps;
                }
                Err(err)
            }
            Ok(out) => {
                let cleanup = out.into_cleanup();
                if superseded {
                    // A pass nested inside `effect` already re-ran this slot; its result is newer.
                    drop(slot);
                    if let Some(cleanup) = cleanup {
                        cleanup.run();
                    }
                    return Ok(());
                }
                slot.cleanup = cleanup;
                slot.runs += 1;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_runs_at_most_once() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let d = on_cleanup(move || *c.borrow_mut() += 1);
        d.run();
        d.clone().run();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_deps_compare_by_length_and_position() {
        let a = deps![1, "x"];
        assert!(!deps_changed(Some(&a), Some(&deps![1, "x"])));
        assert!(deps_changed(Some(&a), Some(&deps![2, "x"])));
        assert!(deps_changed(Some(&a), Some(&deps![1])));
        assert!(deps_changed(None, Some(&a)));
        assert!(deps_changed(Some(&a), None));
        assert!(!deps_changed(Some(&deps![]), Some(&deps![])));
    }

    #[test]
    fn test_deps_of_different_types_never_match() {
        assert!(deps_changed(Some(&deps![1i32]), Some(&deps![1i64])));
    }

    #[test]
    fn test_queue_drains_front_to_back_and_stops_on_error() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EffectQueue::default();
        for i in 0..3 {
            let log = log.clone();
            queue.push(move || {
                log.borrow_mut().push(i);
                if i == 1 {
                    return Err(crate::Error::component("boom"));
                }
                Ok(())
            });
        }
        assert_eq!(queue.len(), 3);
        assert!(queue.drain().is_err());
        assert_eq!(*log.borrow(), vec![0, 1]);
    }
}
