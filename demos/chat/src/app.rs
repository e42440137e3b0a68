use std::cell::RefCell;
use std::rc::Rc;

use sprout_core::{Dom, NodeId, Renderer, Result, mount};

use crate::deps::{AppDeps, Connection};
use crate::pages::{ChatApp, HomeApp, SocketRef};

/// Attribute on the mount root naming the page to show.
pub const PAGE_ATTR: &str = "data-page";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Chat,
}

impl Page {
    /// `data-page="chat"` selects the chat room; anything else is the landing page.
    pub fn of(dom: &Dom, root: NodeId) -> Self {
        match dom.attribute(root, PAGE_ATTR).as_deref() {
            Some("chat") => Page::Chat,
            _ => Page::Home,
        }
    }
}

/// Client entry point. Holds the collaborators and the chat socket shared between
/// the page and its handlers.
pub struct ChatClient {
    deps: AppDeps,
    socket: SocketRef,
}

impl ChatClient {
    pub fn new(deps: AppDeps) -> Self {
        Self {
            deps,
            socket: Rc::new(RefCell::new(None)),
        }
    }

    /// Mounts the page selected by the root's [`PAGE_ATTR`] and renders it once.
    pub fn mount(&self, dom: &Dom, root: NodeId) -> Result<Renderer> {
        let page = Page::of(dom, root);
        log::info!("mounting {page:?} page");
        match page {
            Page::Chat => mount(ChatApp(self.deps.clone(), self.socket.clone()), dom, root),
            Page::Home => mount(HomeApp(self.deps.clone()), dom, root),
        }
    }

    /// The chat page's current socket, if it holds one.
    pub fn socket(&self) -> Option<Rc<dyn Connection>> {
        self.socket.borrow().clone()
    }
}
