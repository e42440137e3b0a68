#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::prelude::*;
    use crate::{HookKind, PassStats};

    type Log<T> = Rc<RefCell<Vec<T>>>;

    fn log<T>() -> Log<T> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn stash<T>() -> Rc<RefCell<Option<T>>> {
        Rc::new(RefCell::new(None))
    }

    fn container() -> (Dom, NodeId) {
        let dom = Dom::new();
        let root = dom.create_element("div");
        (dom, root)
    }

    /// A counter that records every effect run and hands its setter out.
    fn counter(
        seen: Log<i32>,
        setter: Rc<RefCell<Option<Setter<i32>>>>,
    ) -> impl Fn(&Cx) -> Result<Node> + 'static {
        move |cx: &Cx| -> Result<Node> {
            let (count, set_count) = cx.use_state(0)?;
            *setter.borrow_mut() = Some(set_count);
            let seen = seen.clone();
            cx.use_effect(
                move || {
                    seen.borrow_mut().push(count);
                    Ok(())
                },
                deps![count],
            )?;
            Ok(h("span", Attributes::new(), children![count]))
        }
    }

    #[test]
    fn test_state_changes_rerun_effects_with_changed_deps() {
        let (dom, root) = container();
        let seen = log();
        let setter = stash();
        let renderer = mount(counter(seen.clone(), setter.clone()), &dom, root).unwrap();
        let set_count = setter.borrow().clone().unwrap();

        set_count.set(1).unwrap();
        set_count.set(1).unwrap();
        set_count.set(2).unwrap();

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        assert_eq!(dom.text_content(root), "2");
        assert_eq!(renderer.stats().passes, 3);
    }

    #[test]
    fn test_identical_value_skips_the_pass() {
        let (dom, root) = container();
        let setter = stash();
        let renderer = mount(counter(log(), setter.clone()), &dom, root).unwrap();
        let span = dom.children(root)[0];

        let set_count = setter.borrow().clone().unwrap();
        set_count.set(0).unwrap();

        assert_eq!(renderer.stats().passes, 1);
        // Nothing was rebuilt, so the same live node is still there.
        assert_eq!(dom.children(root), vec![span]);
    }

    #[test]
    fn test_update_reads_current_value() {
        let (dom, root) = container();
        let setter = stash();
        mount(counter(log(), setter.clone()), &dom, root).unwrap();
        let set_count = setter.borrow().clone().unwrap();

        set_count.update(|n| n + 5).unwrap();
        set_count.update(|n| n * 2).unwrap();

        assert_eq!(set_count.get(), 10);
        assert_eq!(dom.text_content(root), "10");
    }

    #[test]
    fn test_effect_setting_state_renders_nested_passes() {
        let (dom, root) = container();
        let seen = log();
        let record = seen.clone();
        let renderer = mount(
            move |cx: &Cx| -> Result<Node> {
                let (count, set_count) = cx.use_state(0)?;
                let record = record.clone();
                cx.use_effect(
                    move || {
                        record.borrow_mut().push(count);
                        if count < 2 {
                            set_count.set(count + 1)?;
                        }
                        Ok(())
                    },
                    deps![count],
                )?;
                Ok(h("span", Attributes::new(), children![count]))
            },
            &dom,
            root,
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        assert_eq!(dom.text_content(root), "2");
        assert_eq!(renderer.stats().passes, 3);
    }

    #[test]
    fn test_nested_pass_effects_run_before_remaining_outer_effects() {
        let (dom, root) = container();
        let seen: Log<String> = log();
        let record = seen.clone();
        mount(
            move |cx: &Cx| -> Result<Node> {
                let (n, set_n) = cx.use_state(0)?;
                let first = record.clone();
                cx.use_effect(
                    move || {
                        first.borrow_mut().push(format!("a{n}"));
                        if n == 0 {
                            set_n.set(1)?;
                        }
                        Ok(())
                    },
                    deps![n],
                )?;
                let second = record.clone();
                cx.use_effect(
                    move || {
                        second.borrow_mut().push(format!("b{n}"));
                        Ok(())
                    },
                    deps![n],
                )?;
                Ok(h("p", Attributes::new(), vec![]))
            },
            &dom,
            root,
        )
        .unwrap();

        // `b0` was overtaken by the nested pass and never runs.
        assert_eq!(*seen.borrow(), vec!["a0", "a1", "b1"]);
    }

    #[test]
    fn test_effects_observe_the_committed_tree() {
        let (dom, root) = container();
        let seen = log();
        let record = seen.clone();
        let observed = dom.clone();
        mount(
            move |cx: &Cx| -> Result<Node> {
                let record = record.clone();
                let observed = observed.clone();
                cx.use_effect(
                    move || {
                        record.borrow_mut().push(observed.text_content(root));
                        Ok(())
                    },
                    None,
                )?;
                Ok(h("p", Attributes::new(), children!["ready"]))
            },
            &dom,
            root,
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["ready".to_string()]);
    }

    #[test]
    fn test_empty_deps_run_once_and_no_deps_run_every_pass() {
        let (dom, root) = container();
        let once = Rc::new(Cell::new(0));
        let every = Rc::new(Cell::new(0));
        let setter = stash();
        let (o, e, s) = (once.clone(), every.clone(), setter.clone());
        mount(
            move |cx: &Cx| -> Result<Node> {
                let (n, set_n) = cx.use_state(0)?;
                *s.borrow_mut() = Some(set_n);
                let o = o.clone();
                cx.use_effect(
                    move || {
                        o.set(o.get() + 1);
                        Ok(())
                    },
                    deps![],
                )?;
                let e = e.clone();
                cx.use_effect(
                    move || {
                        e.set(e.get() + 1);
                        Ok(())
                    },
                    None,
                )?;
                Ok(h("p", Attributes::new(), children![n]))
            },
            &dom,
            root,
        )
        .unwrap();

        let set_n = setter.borrow().clone().unwrap();
        set_n.set(1).unwrap();
        set_n.set(2).unwrap();

        assert_eq!(once.get(), 1);
        assert_eq!(every.get(), 3);
    }

    #[test]
    fn test_cleanup_runs_before_next_run_and_on_cleanup_effects() {
        let (dom, root) = container();
        let events: Log<String> = log();
        let setter = stash();
        let (ev, s) = (events.clone(), setter.clone());
        let renderer = mount(
            move |cx: &Cx| -> Result<Node> {
                let (n, set_n) = cx.use_state(0)?;
                *s.borrow_mut() = Some(set_n);
                let ev = ev.clone();
                cx.use_effect(
                    move || {
                        ev.borrow_mut().push(format!("run {n}"));
                        Ok(on_cleanup(move || ev.borrow_mut().push(format!("clean {n}"))))
                    },
                    deps![n],
                )?;
                Ok(h("p", Attributes::new(), vec![]))
            },
            &dom,
            root,
        )
        .unwrap();

        let set_n = setter.borrow().clone().unwrap();
        set_n.set(1).unwrap();
        renderer.cleanup_effects();
        renderer.cleanup_effects();
        assert_eq!(*events.borrow(), vec!["run 0", "clean 0", "run 1", "clean 1"]);

        // Deps are forgotten, so the effect is due again even though `n` is unchanged.
        renderer.render().unwrap();
        assert_eq!(events.borrow().last().map(String::as_str), Some("run 1"));
    }

    #[test]
    fn test_hooks_outside_a_pass_are_rejected() {
        let (dom, root) = container();
        let escaped = stash();
        let slot = escaped.clone();
        mount(
            move |cx: &Cx| -> Result<Node> {
                *slot.borrow_mut() = Some(cx.clone());
                Ok(h("p", Attributes::new(), vec![]))
            },
            &dom,
            root,
        )
        .unwrap();

        let cx = escaped.borrow().clone().unwrap();
        assert!(matches!(
            cx.use_state(0),
            Err(Error::NotRendering { hook: "use_state" })
        ));
        assert!(matches!(
            cx.use_effect(|| Ok(()), None),
            Err(Error::NotRendering { hook: "use_effect" })
        ));
    }

    #[test]
    fn test_conditional_state_hook_is_detected() {
        let (dom, root) = container();
        let extra = Rc::new(Cell::new(false));
        let setter = stash();
        let (flag, s) = (extra.clone(), setter.clone());
        mount(
            move |cx: &Cx| -> Result<Node> {
                let (n, set_n) = cx.use_state(0)?;
                *s.borrow_mut() = Some(set_n);
                if flag.get() {
                    cx.use_state("late")?;
                }
                Ok(h("p", Attributes::new(), children![n]))
            },
            &dom,
            root,
        )
        .unwrap();

        extra.set(true);
        let set_n = setter.borrow().clone().unwrap();
        let err = set_n.set(1).unwrap_err();
        assert!(matches!(
            err,
            Error::HookOrderChanged {
                kind: HookKind::State,
                previous: 1,
                current: 2,
            }
        ));
        assert_eq!(dom.text_content(root), "0");
    }

    #[test]
    fn test_skipped_effect_hook_is_detected() {
        let (dom, root) = container();
        let skip = Rc::new(Cell::new(false));
        let setter = stash();
        let (flag, s) = (skip.clone(), setter.clone());
        mount(
            move |cx: &Cx| -> Result<Node> {
                let (n, set_n) = cx.use_state(0)?;
                *s.borrow_mut() = Some(set_n);
                if !flag.get() {
                    cx.use_effect(|| Ok(()), deps![])?;
                }
                Ok(h("p", Attributes::new(), children![n]))
            },
            &dom,
            root,
        )
        .unwrap();

        skip.set(true);
        let set_n = setter.borrow().clone().unwrap();
        let err = set_n.set(1).unwrap_err();
        assert!(matches!(
            err,
            Error::HookOrderChanged {
                kind: HookKind::Effect,
                previous: 1,
                current: 0,
            }
        ));
    }

    #[test]
    fn test_setting_state_while_building_fails() {
        let (dom, root) = container();
        let result = mount(
            |cx: &Cx| -> Result<Node> {
                let (n, set_n) = cx.use_state(0)?;
                set_n.set(n + 1)?;
                Ok(h("p", Attributes::new(), vec![]))
            },
            &dom,
            root,
        );
        assert!(matches!(result, Err(Error::RenderInProgress)));
        assert!(dom.children(root).is_empty());
    }

    #[test]
    fn test_failing_component_keeps_previous_tree() {
        let (dom, root) = container();
        let setter = stash();
        let s = setter.clone();
        let renderer = mount(
            move |cx: &Cx| -> Result<Node> {
                let (text, set_text) = cx.use_state(String::from("ok"))?;
                *s.borrow_mut() = Some(set_text);
                if text == "boom" {
                    return Err(Error::component("boom"));
                }
                Ok(h("p", Attributes::new(), children![text]))
            },
            &dom,
            root,
        )
        .unwrap();
        let set_text = setter.borrow().clone().unwrap();
        let live = dom.len();

        let err = set_text.set("boom".into()).unwrap_err();
        assert!(matches!(err, Error::Component(_)));
        assert_eq!(dom.text_content(root), "ok");
        assert_eq!(dom.len(), live);
        assert_eq!(renderer.stats().passes, 1);

        set_text.set("fine".into()).unwrap();
        assert_eq!(dom.text_content(root), "fine");
    }

    #[test]
    fn test_nested_component_failure_keeps_previous_tree() {
        let (dom, root) = container();
        let setter = stash();
        let s = setter.clone();
        let fragile = Component::new("Fragile", |props| {
            match props.attrs.get("broken") {
                Some(crate::AttrValue::Bool(true)) => Err(Error::component("broken")),
                _ => Ok(Child::from("fragile")),
            }
        });
        mount(
            move |cx: &Cx| -> Result<Node> {
                let (broken, set_broken) = cx.use_state(false)?;
                *s.borrow_mut() = Some(set_broken);
                Ok(h(
                    "div",
                    Attributes::new(),
                    children![h(fragile.clone(), Attributes::new().attr("broken", broken), vec![])],
                ))
            },
            &dom,
            root,
        )
        .unwrap();

        let set_broken = setter.borrow().clone().unwrap();
        assert!(set_broken.set(true).is_err());
        assert_eq!(dom.text_content(root), "fragile");
    }

    /// An input bound to state through `onInput`, plus an echo of the value.
    fn echo_form(cx: &Cx) -> Result<Node> {
        let (value, set_value) = cx.use_state(String::new())?;
        Ok(h(
            "form",
            Attributes::new(),
            children![
                h(
                    "input",
                    Attributes::new()
                        .attr("name", "msg")
                        .attr("value", value.clone())
                        .handler("onInput", move |ev| set_value.set(ev.value.clone())),
                    vec![],
                ),
                h("p", Attributes::new(), children![value]),
            ],
        ))
    }

    #[test]
    fn test_focus_and_caret_survive_rebuild() {
        let (dom, root) = container();
        mount(echo_form, &dom, root).unwrap();
        let input = dom.query_attr(root, "name", "msg").unwrap();
        dom.focus(input);

        dom.input(input, "hey").unwrap();

        let next = dom.query_attr(root, "name", "msg").unwrap();
        assert_ne!(next, input);
        assert!(!dom.contains(input));
        assert_eq!(dom.active_element(), Some(next));
        assert_eq!(dom.value(next).as_deref(), Some("hey"));
        assert_eq!(dom.selection(next), Some((3, 3)));
        assert_eq!(dom.text_content(root), "hey");
    }

    #[test]
    fn test_mid_text_selection_is_restored() {
        let (dom, root) = container();
        mount(echo_form, &dom, root).unwrap();
        let input = dom.query_attr(root, "name", "msg").unwrap();
        dom.focus(input);

        dom.set_value(input, "hello");
        dom.set_selection_range(input, 1, 3);
        dom.dispatch(input, "input").unwrap();

        let next = dom.active_element().unwrap();
        assert_eq!(dom.attribute(next, "name").as_deref(), Some("msg"));
        assert_eq!(dom.selection(next), Some((1, 3)));
    }

    #[test]
    fn test_composing_element_keeps_focus_without_selection_reset() {
        let (dom, root) = container();
        mount(echo_form, &dom, root).unwrap();
        let input = dom.query_attr(root, "name", "msg").unwrap();
        dom.focus(input);

        dom.composition_start(input).unwrap();
        dom.composition_update(input, "に").unwrap();

        let next = dom.active_element().unwrap();
        assert_ne!(next, input);
        assert_eq!(dom.value(next).as_deref(), Some("に"));
        assert_eq!(dom.selection(next), None);
    }

    #[test]
    fn test_setter_keeps_rendering_after_renderer_is_dropped() {
        let (dom, root) = container();
        let seen = log();
        let setter = stash();
        let renderer = mount(counter(seen.clone(), setter.clone()), &dom, root).unwrap();
        let set_count = setter.borrow().clone().unwrap();
        drop(renderer);

        set_count.set(7).unwrap();
        assert_eq!(set_count.get(), 7);
        assert_eq!(dom.text_content(root), "7");
        assert_eq!(*seen.borrow(), vec![0, 7]);
    }

    #[test]
    fn test_handlers_render_without_a_held_renderer() {
        let (dom, root) = container();
        mount(echo_form, &dom, root).unwrap();
        let input = dom.query_attr(root, "name", "msg").unwrap();
        dom.focus(input);

        dom.input(input, "hi").unwrap();
        assert_eq!(dom.text_content(root), "hi");
    }

    #[test]
    fn test_render_from_inside_a_pass_fails() {
        let (dom, root) = container();
        let handle: Rc<RefCell<Option<Renderer>>> = stash();
        let inner = handle.clone();
        let renderer = Renderer::new(
            move |_cx: &Cx| -> Result<Node> {
                if let Some(renderer) = inner.borrow().as_ref() {
                    renderer.render()?;
                }
                Ok(h("p", Attributes::new(), vec![]))
            },
            &dom,
            root,
        );
        *handle.borrow_mut() = Some(renderer.clone());

        assert!(matches!(renderer.render(), Err(Error::RenderInProgress)));
        handle.borrow_mut().take();
    }

    #[test]
    fn test_stats_track_committed_passes() {
        let (dom, root) = container();
        let setter = stash();
        let renderer = Renderer::new(counter(log(), setter.clone()), &dom, root);
        assert_eq!(renderer.stats(), PassStats {
                live_nodes: 1,
                ..PassStats::default()
            });

        renderer.render().unwrap();
        let stats = renderer.stats();
        assert_eq!(stats.passes, 1);
        // container, span, text
        assert_eq!(stats.live_nodes, 3);
        assert_eq!(renderer.container(), root);
    }
}
