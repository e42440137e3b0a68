#![allow(non_snake_case)]
//! Chat client pages on top of Sprout.
//!
//! The pages never touch a network or a browser directly: sockets, message history,
//! key/value storage and navigation come in through [`deps::AppDeps`]. [`memory`] has
//! in-process versions of all four for tests and the headless demo.

pub mod app;
pub mod config;
pub mod deps;
pub mod memory;
pub mod model;
pub mod pages;

pub use app::{ChatClient, PAGE_ATTR, Page};
pub use config::ChatConfig;
pub use deps::{AppDeps, Connection, ConnectionHandlers, DepError, History, Navigator, Storage, Transport};
pub use model::{ChatMessage, ClientFrame, EventPayload, NewMessage};
pub use pages::{ChatApp, HomeApp, MessageItem};
