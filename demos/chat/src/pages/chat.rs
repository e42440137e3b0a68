use std::cell::RefCell;
use std::rc::Rc;

use sprout_core::prelude::*;
use sprout_ui::{Button, Div, Form, H1, Header, Input, Main, P, Section, Ul, make_input_handlers};

use super::MessageItem;
use crate::deps::{AppDeps, Connection, ConnectionHandlers};
use crate::model::{ChatMessage, ClientFrame, EventPayload, NAME_TAKEN, NewMessage, encode_frame, parse_frame};

pub const NAME_TAKEN_ALERT: &str = "Someone with that name is already here. Please choose another name.";

/// The socket the chat page currently owns, shared with whoever needs to close it.
pub type SocketRef = Rc<RefCell<Option<Rc<dyn Connection>>>>;

/// The chat room: history, live messages, and the composer.
pub fn ChatApp(deps: AppDeps, socket: SocketRef) -> impl Fn(&Cx) -> Result<Node> + 'static {
    move |cx: &Cx| -> Result<Node> {
        let AppDeps {
            transport,
            history,
            storage,
            navigator,
            config,
        } = deps.clone();

        let (messages, set_messages) = cx.use_state(Rc::new(Vec::<ChatMessage>::new()))?;
        let (input, set_input) = cx.use_state(String::new())?;
        let (username, set_username) =
            cx.use_state_with(|| storage.get_item(&config.name_key).unwrap_or_default())?;
        let msg_handlers = make_input_handlers({
            let set_input = set_input.clone();
            move |v| set_input.set(v)
        });

        // No name: back to the landing page.
        {
            let navigator = navigator.clone();
            let home = config.home_path.clone();
            let missing = username.is_empty();
            cx.use_effect(
                move || {
                    if missing {
                        navigator.navigate(&home);
                    }
                    Ok(())
                },
                deps![username.clone()],
            )?;
        }

        {
            let set_messages = set_messages.clone();
            cx.use_effect(
                move || {
                    match history.fetch_messages() {
                        Ok(list) => set_messages.set(Rc::new(list))?,
                        Err(err) => log::warn!("could not load history: {err}"),
                    }
                    Ok(())
                },
                deps![],
            )?;
        }

        {
            let socket = socket.clone();
            let storage = storage.clone();
            let navigator = navigator.clone();
            let name_key = config.name_key.clone();
            let socket_path = config.socket_path.clone();
            let limit = config.history_limit;
            let name = username.clone();
            cx.use_effect(
                move || {
                    if name.is_empty() {
                        return Ok(None);
                    }
                    let on_open = {
                        let name = name.clone();
                        move |conn: &dyn Connection| -> Result<()> {
                            conn.send(&encode_frame(&ClientFrame::Join { name: name.clone() })?);
                            Ok(())
                        }
                    };
                    let on_message = move |frame: &str| -> Result<()> {
                        match parse_frame(frame) {
                            Some(EventPayload::Chat { payload }) => set_messages.update(|prev| {
                                let mut next = Vec::with_capacity(limit);
                                next.push(payload.clone());
                                next.extend(prev.iter().cloned());
                                next.truncate(limit);
                                Rc::new(next)
                            }),
                            Some(EventPayload::Error { reason }) if reason == NAME_TAKEN => {
                                navigator.alert(NAME_TAKEN_ALERT);
                                storage.remove_item(&name_key);
                                set_username.set(String::new())
                            }
                            _ => Ok(()),
                        }
                    };

                    let conn =
                        transport.connect(&socket_path, ConnectionHandlers::new(on_open, on_message));
                    *socket.borrow_mut() = Some(conn.clone());
                    Ok(Some(on_cleanup(move || {
                        let ours = socket
                            .borrow()
                            .as_ref()
                            .is_some_and(|current| Rc::ptr_eq(current, &conn));
                        if ours {
                            socket.borrow_mut().take();
                        }
                        conn.close();
                    })))
                },
                deps![username.clone()],
            )?;
        }

        let submit = {
            let socket = socket.clone();
            let history = deps.history.clone();
            let input = input.clone();
            let username = username.clone();
            move |_: &Event| -> Result<()> {
                let trimmed = input.trim();
                if trimmed.is_empty() || username.is_empty() {
                    return Ok(());
                }
                let message = NewMessage {
                    name: username.clone(),
                    message: trimmed.to_owned(),
                };
                set_input.set(String::new())?;

                let open = socket.borrow().as_ref().filter(|conn| conn.is_open()).cloned();
                match open {
                    Some(conn) => conn.send(&encode_frame(&ClientFrame::Chat { payload: message })?),
                    None => {
                        if let Err(err) = history.post_message(&message) {
                            log::warn!("could not post message: {err}");
                        }
                    }
                }
                Ok(())
            }
        };

        let exit = {
            let socket = socket.clone();
            move |_: &Event| -> Result<()> {
                storage.remove_item(&config.name_key);
                let conn = socket.borrow().clone();
                if let Some(conn) = conn {
                    conn.close();
                }
                navigator.navigate(&config.home_path);
                Ok(())
            }
        };

        let utc_offset = deps.config.utc_offset;
        let signed_in = if username.is_empty() { "guest".to_owned() } else { username.clone() };

        Ok(Main(
            Attributes::new().class("chat-shell"),
            children![
                Header(
                    Attributes::new().class("chat-header"),
                    children![
                        H1(Attributes::new().class("chat-header-title"), children!["Chat Room"]),
                        Div(
                            Attributes::new().attr(
                                "style",
                                "display:flex; align-items:center; justify-content: space-between; gap: 12px;",
                            ),
                            children![
                                P(
                                    Attributes::new().class("muted").attr("style", "margin:4px 0 0;"),
                                    children!["Signed in as ", signed_in],
                                ),
                                Button(
                                    Attributes::new()
                                        .class("button chat-exit")
                                        .attr("type", "button")
                                        .handler("onClick", exit),
                                    children!["Exit"],
                                ),
                            ],
                        ),
                    ],
                ),
                Section(
                    Attributes::new().class("chat-body"),
                    children![Ul(
                        Attributes::new().class("chat-list"),
                        messages
                            .iter()
                            .map(|m| Child::from(MessageItem(m, m.name == username, utc_offset)))
                            .collect(),
                    )],
                ),
                Div(
                    Attributes::new().class("chat-composer"),
                    children![Form(
                        Attributes::new()
                            .class("composer-form")
                            .handler("onSubmit", submit),
                        children![
                            Input(msg_handlers.apply(
                                Attributes::new()
                                    .class("input composer-input")
                                    .attr("name", "message")
                                    .attr(FOCUS_KEY_ATTR, "chat")
                                    .attr("autocomplete", "off")
                                    .attr("value", input),
                            )),
                            Button(
                                Attributes::new().class("button").attr("type", "submit"),
                                children!["Send"],
                            ),
                        ],
                    )],
                ),
            ],
        ))
    }
}
