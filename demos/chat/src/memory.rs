//! In-process stand-ins for the browser and server collaborators.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use web_time::{SystemTime, UNIX_EPOCH};

use crate::deps::{Connection, ConnectionHandlers, DepError, History, Navigator, Storage, Transport};
use crate::model::{ChatMessage, NewMessage};

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.set_item(key, value);
        storage
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Newest message first, the order the chat list shows them in.
#[derive(Default)]
pub struct MemoryHistory {
    messages: RefCell<Vec<ChatMessage>>,
    next_id: Cell<i64>,
    /// When set, every call fails with this reason.
    pub failure: RefCell<Option<String>>,
}

impl MemoryHistory {
    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Self {
            messages: RefCell::new(messages),
            next_id: Cell::new(next_id),
            failure: RefCell::new(None),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    fn check(&self) -> Result<(), DepError> {
        match self.failure.borrow().as_ref() {
            Some(reason) => Err(DepError::Request(reason.clone())),
            None => Ok(()),
        }
    }
}

impl History for MemoryHistory {
    fn fetch_messages(&self) -> Result<Vec<ChatMessage>, DepError> {
        self.check()?;
        Ok(self.messages())
    }

    fn post_message(&self, message: &NewMessage) -> Result<(), DepError> {
        self.check()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.messages.borrow_mut().insert(
            0,
            ChatMessage {
                id,
                name: message.name.clone(),
                message: message.message.clone(),
                ts: unix_now(),
            },
        );
        Ok(())
    }
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Records every visited path and alert.
#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        log::info!("navigate to {path}");
        self.visited.borrow_mut().push(path.to_owned());
    }

    fn alert(&self, message: &str) {
        log::warn!("alert: {message}");
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

/// One socket of a [`LoopbackTransport`].
pub struct LoopbackConnection {
    pub path: String,
    open: Cell<bool>,
    closed: Cell<bool>,
    sent: RefCell<Vec<String>>,
    handlers: ConnectionHandlers,
}

impl LoopbackConnection {
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Connection for LoopbackConnection {
    fn send(&self, text: &str) {
        if !self.is_open() {
            log::warn!("send on a socket that is not open; dropped");
            return;
        }
        self.sent.borrow_mut().push(text.to_owned());
    }

    fn close(&self) {
        self.open.set(false);
        self.closed.set(true);
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}

/// A transport with no network: the test (or demo) plays the server by opening
/// sockets and delivering frames by hand.
#[derive(Default)]
pub struct LoopbackTransport {
    connections: RefCell<Vec<Rc<LoopbackConnection>>>,
}

impl LoopbackTransport {
    pub fn connections(&self) -> Vec<Rc<LoopbackConnection>> {
        self.connections.borrow().clone()
    }

    /// Completes the handshake of every pending socket.
    pub fn open_all(&self) -> sprout_core::Result<()> {
        for conn in self.connections() {
            if conn.closed.get() || conn.open.get() {
                continue;
            }
            conn.open.set(true);
            (conn.handlers.on_open)(conn.as_ref())?;
        }
        Ok(())
    }

    /// Pushes `frame` to every open socket.
    pub fn deliver(&self, frame: &str) -> sprout_core::Result<()> {
        for conn in self.connections() {
            if conn.is_open() {
                (conn.handlers.on_message)(frame)?;
            }
        }
        Ok(())
    }
}

impl Transport for LoopbackTransport {
    fn connect(&self, path: &str, handlers: ConnectionHandlers) -> Rc<dyn Connection> {
        log::debug!("connecting to {path}");
        let conn = Rc::new(LoopbackConnection {
            path: path.to_owned(),
            open: Cell::new(false),
            closed: Cell::new(false),
            sent: RefCell::new(Vec::new()),
            handlers,
        });
        self.connections.borrow_mut().push(conn.clone());
        conn
    }
}
