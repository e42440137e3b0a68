//! Composition-aware handlers for controlled text inputs.
//!
//! While an input method is composing (Japanese kana, Chinese pinyin, ...) every
//! keystroke fires `input` with a half-finished value. Writing that value back into
//! state would rebuild the element mid-composition, so these handlers hold updates
//! until `compositionend` and then commit the final text once.

use std::cell::Cell;
use std::rc::Rc;

use sprout_core::{Attributes, Event, Handler, Result};

pub const ON_INPUT: &str = "onInput";
pub const ON_COMPOSITION_START: &str = "onCompositionStart";
pub const ON_COMPOSITION_END: &str = "onCompositionEnd";

/// The three listeners of one logical input. They share a single `composing` flag,
/// so create one set per input.
#[derive(Clone, Debug)]
pub struct InputHandlers {
    pub on_input: Handler,
    pub on_composition_start: Handler,
    pub on_composition_end: Handler,
}

impl InputHandlers {
    /// Adds the handlers to `attrs` under their `on*` names.
    pub fn apply(&self, attrs: Attributes) -> Attributes {
        attrs
            .attr(ON_INPUT, self.on_input.clone())
            .attr(ON_COMPOSITION_START, self.on_composition_start.clone())
            .attr(ON_COMPOSITION_END, self.on_composition_end.clone())
    }
}

/// Builds handlers that forward the input's value to `update`, except while a
/// composition is running.
///
/// - `compositionstart` marks the input as composing.
/// - `input` is ignored while composing (by our flag or the event's own).
/// - `compositionend` clears the flag and always forwards the committed value.
pub fn make_input_handlers(update: impl Fn(String) -> Result<()> + 'static) -> InputHandlers {
    let composing = Rc::new(Cell::new(false));
    let update = Rc::new(update);

    let on_input = {
        let composing = composing.clone();
        let update = update.clone();
        Handler::new(move |ev: &Event| {
            if composing.get() || ev.is_composing {
                log::trace!("input: composing, holding {:?}", ev.value);
                return Ok(());
            }
            update(ev.value.clone())
        })
    };

    let on_composition_start = {
        let composing = composing.clone();
        Handler::new(move |_| {
            composing.set(true);
            Ok(())
        })
    };

    let on_composition_end = Handler::new(move |ev: &Event| {
        composing.set(false);
        update(ev.value.clone())
    });

    InputHandlers {
        on_input,
        on_composition_start,
        on_composition_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::NodeId;
    use std::cell::RefCell;

    fn event(kind: &str, value: &str, is_composing: bool) -> Event {
        Event {
            kind: kind.to_owned(),
            target: NodeId::default(),
            value: value.to_owned(),
            is_composing,
        }
    }

    fn recorder() -> (Rc<RefCell<String>>, InputHandlers) {
        let value = Rc::new(RefCell::new(String::new()));
        let sink = value.clone();
        let handlers = make_input_handlers(move |v| {
            *sink.borrow_mut() = v;
            Ok(())
        });
        (value, handlers)
    }

    #[test]
    fn test_plain_input_updates() {
        let (value, handlers) = recorder();
        handlers.on_input.call(&event("input", "abc", false)).unwrap();
        assert_eq!(*value.borrow(), "abc");
    }

    #[test]
    fn test_update_waits_for_composition_end() {
        let (value, handlers) = recorder();
        handlers
            .on_composition_start
            .call(&event("compositionstart", "", false))
            .unwrap();
        handlers.on_input.call(&event("input", "あ", true)).unwrap();
        assert_eq!(*value.borrow(), "");

        handlers
            .on_composition_end
            .call(&event("compositionend", "あ", false))
            .unwrap();
        assert_eq!(*value.borrow(), "あ");
    }

    #[test]
    fn test_multi_keystroke_composition_commits_once() {
        let count = Rc::new(Cell::new(0));
        let last = Rc::new(RefCell::new(String::new()));
        let (c, l) = (count.clone(), last.clone());
        let handlers = make_input_handlers(move |v| {
            c.set(c.get() + 1);
            *l.borrow_mut() = v;
            Ok(())
        });

        handlers
            .on_composition_start
            .call(&event("compositionstart", "", false))
            .unwrap();
        for partial in ["s", "sy", "sya"] {
            handlers.on_input.call(&event("input", partial, true)).unwrap();
        }
        assert_eq!(count.get(), 0);

        handlers
            .on_composition_end
            .call(&event("compositionend", "しゃ", false))
            .unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(*last.borrow(), "しゃ");
    }

    #[test]
    fn test_own_flag_blocks_input_even_without_event_flag() {
        let (value, handlers) = recorder();
        handlers
            .on_composition_start
            .call(&event("compositionstart", "", false))
            .unwrap();
        handlers.on_input.call(&event("input", "k", false)).unwrap();
        assert_eq!(*value.borrow(), "");
    }

    #[test]
    fn test_rapid_typing_updates_every_time() {
        let (value, handlers) = recorder();
        for ch in ["a", "s", "d", "f"] {
            let next = format!("{}{ch}", value.borrow());
            handlers.on_input.call(&event("input", &next, false)).unwrap();
        }
        assert_eq!(*value.borrow(), "asdf");
    }

    #[test]
    fn test_apply_sets_all_three_attributes() {
        let (_, handlers) = recorder();
        let attrs = handlers.apply(Attributes::new().attr("name", "msg"));
        let names: Vec<&str> = attrs.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["name", ON_INPUT, ON_COMPOSITION_START, ON_COMPOSITION_END]
        );
    }
}
