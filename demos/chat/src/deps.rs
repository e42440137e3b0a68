//! Everything the pages need from the outside world, behind traits so tests and the
//! headless demo can swap in fakes.

use std::rc::Rc;

use thiserror::Error;

use crate::config::ChatConfig;
use crate::model::{ChatMessage, NewMessage};

#[derive(Debug, Error)]
pub enum DepError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("bad response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An open (or opening) socket.
pub trait Connection {
    fn send(&self, text: &str);
    fn close(&self);
    fn is_open(&self) -> bool;
}

pub type OpenHandler = Rc<dyn Fn(&dyn Connection) -> sprout_core::Result<()>>;
pub type MessageHandler = Rc<dyn Fn(&str) -> sprout_core::Result<()>>;

#[derive(Clone)]
pub struct ConnectionHandlers {
    pub on_open: OpenHandler,
    pub on_message: MessageHandler,
}

impl ConnectionHandlers {
    pub fn new(
        on_open: impl Fn(&dyn Connection) -> sprout_core::Result<()> + 'static,
        on_message: impl Fn(&str) -> sprout_core::Result<()> + 'static,
    ) -> Self {
        Self {
            on_open: Rc::new(on_open),
            on_message: Rc::new(on_message),
        }
    }
}

pub trait Transport {
    /// Starts connecting to `path`. `handlers` are called by the transport as the
    /// socket opens and frames arrive.
    fn connect(&self, path: &str, handlers: ConnectionHandlers) -> Rc<dyn Connection>;
}

/// Server-side message log.
pub trait History {
    fn fetch_messages(&self) -> Result<Vec<ChatMessage>, DepError>;
    /// Fallback for sending while no socket is open.
    fn post_message(&self, message: &NewMessage) -> Result<(), DepError>;
}

pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

pub trait Navigator {
    fn navigate(&self, path: &str);

    fn alert(&self, message: &str) {
        log::warn!("alert: {message}");
    }
}

/// The collaborators one mounted page works with.
#[derive(Clone)]
pub struct AppDeps {
    pub transport: Rc<dyn Transport>,
    pub history: Rc<dyn History>,
    pub storage: Rc<dyn Storage>,
    pub navigator: Rc<dyn Navigator>,
    pub config: ChatConfig,
}
