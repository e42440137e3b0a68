use std::rc::Rc;

use anyhow::anyhow;
use sprout_chat::memory::{LoopbackTransport, MemoryHistory, MemoryStorage, RecordingNavigator, unix_now};
use sprout_chat::{AppDeps, ChatClient, ChatConfig, ChatMessage, ClientFrame, EventPayload, PAGE_ATTR};
use sprout_core::Dom;
use sprout_devtools::Inspector;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ChatConfig::default();
    let transport = Rc::new(LoopbackTransport::default());
    let history = Rc::new(MemoryHistory::with_messages(vec![ChatMessage {
        id: 1,
        name: "Bob".into(),
        message: "Welcome!".into(),
        ts: unix_now(),
    }]));
    let storage = Rc::new(MemoryStorage::with_item(&config.name_key, "Alice"));
    let navigator = Rc::new(RecordingNavigator::default());
    let client = ChatClient::new(AppDeps {
        transport: transport.clone(),
        history,
        storage,
        navigator,
        config,
    });

    let dom = Dom::new();
    let root = dom.create_element("div");
    dom.set_attribute(root, PAGE_ATTR, "chat");
    let renderer = client.mount(&dom, root)?;
    transport.open_all()?;

    // Compose a message through the IME path and send it.
    let input = dom
        .query_attr(root, "name", "message")
        .ok_or_else(|| anyhow!("composer input missing"))?;
    dom.focus(input);
    dom.composition_start(input)?;
    dom.composition_update(input, "konnichiha")?;
    dom.composition_end(input, "こんにちは")?;
    let form = dom
        .query_tag(root, "form")
        .ok_or_else(|| anyhow!("composer form missing"))?;
    dom.dispatch(form, "submit")?;

    // Play the server: every chat frame comes back as a stored message.
    let mut next_id = 2;
    for conn in transport.connections() {
        for frame in conn.sent() {
            if let Ok(ClientFrame::Chat { payload }) = serde_json::from_str(&frame) {
                let event = EventPayload::Chat {
                    payload: ChatMessage {
                        id: next_id,
                        name: payload.name,
                        message: payload.message,
                        ts: unix_now(),
                    },
                };
                next_id += 1;
                transport.deliver(&serde_json::to_string(&event)?)?;
            }
        }
    }

    let mut inspector = Inspector::new();
    inspector.toggle();
    if let Some(report) = inspector.frame(&renderer) {
        println!("{report}");
    }

    renderer.cleanup_effects();
    let open = transport.connections().iter().filter(|c| !c.is_closed()).count();
    log::info!("demo finished, {open} sockets left open");
    Ok(())
}
