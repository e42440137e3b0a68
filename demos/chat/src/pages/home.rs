use sprout_core::prelude::*;
use sprout_ui::{Button, Div, Form, H1, Input, Label, Main, P, Span, make_input_handlers};

use crate::deps::{AppDeps, ConnectionHandlers};
use crate::model::{EventPayload, parse_frame};

pub const EMPTY_NAME: &str = "Please enter a name";

/// Landing page: pick a display name, see how many people are connected.
pub fn HomeApp(deps: AppDeps) -> impl Fn(&Cx) -> Result<Node> + 'static {
    move |cx: &Cx| -> Result<Node> {
        let AppDeps {
            transport,
            storage,
            navigator,
            config,
            ..
        } = deps.clone();

        let (name, set_name) =
            cx.use_state_with(|| storage.get_item(&config.name_key).unwrap_or_default())?;
        let (count, set_count) = cx.use_state(None::<u32>)?;
        let (error, set_error) = cx.use_state(None::<String>)?;
        let name_handlers = make_input_handlers(move |v| set_name.set(v));

        let socket_path = config.socket_path.clone();
        cx.use_effect(
            move || {
                let handlers = ConnectionHandlers::new(
                    |_| Ok(()),
                    move |frame| match parse_frame(frame) {
                        Some(EventPayload::Presence { count }) => set_count.set(Some(count)),
                        _ => Ok(()),
                    },
                );
                let conn = transport.connect(&socket_path, handlers);
                Ok(on_cleanup(move || conn.close()))
            },
            deps![],
        )?;

        let submit = {
            let name = name.clone();
            move |_: &Event| -> Result<()> {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return set_error.set(Some(EMPTY_NAME.to_owned()));
                }
                storage.set_item(&config.name_key, trimmed);
                navigator.navigate(&config.chat_path);
                Ok(())
            }
        };

        let connected: Child = match count {
            Some(count) => count.into(),
            None => "-".into(),
        };

        Ok(Main(
            Attributes::new().class("page home-center"),
            children![Div(
                Attributes::new().class("card"),
                children![
                    H1(Attributes::new().class("home-title"), children!["Sprout Chat"]),
                    P(
                        Attributes::new().class("home-sub"),
                        children!["Lightweight WebSocket chat. Choose a name to enter."],
                    ),
                    Form(
                        Attributes::new()
                            .class("form-grid")
                            .handler("onSubmit", submit),
                        children![
                            Label(
                                Attributes::new()
                                    .class("muted")
                                    .attr("style", "display:flex; flex-direction:column; gap:6px;"),
                                children![
                                    Span(Attributes::new(), children!["Name"]),
                                    Input(name_handlers.apply(
                                        Attributes::new()
                                            .class("input")
                                            .attr(FOCUS_KEY_ATTR, "name")
                                            .attr("value", name),
                                    )),
                                ],
                            ),
                            Button(
                                Attributes::new().class("button").attr("type", "submit"),
                                children!["Enter chat"],
                            ),
                        ],
                    ),
                    P(
                        Attributes::new().class("muted").attr("style", "margin-top:14px;"),
                        children!["Connected: ", connected],
                    ),
                    error.map(|error| P(
                        Attributes::new().attr("style", "color:#ff8a8a; margin-top:8px;"),
                        children![error],
                    )),
                ],
            )],
        ))
    }
}
