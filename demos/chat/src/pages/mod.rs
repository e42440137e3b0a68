mod chat;
mod home;
mod message_item;

pub use chat::{ChatApp, NAME_TAKEN_ALERT, SocketRef};
pub use home::{EMPTY_NAME, HomeApp};
pub use message_item::MessageItem;
