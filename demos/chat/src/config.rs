/// Paths and keys the chat pages agree on with the server and the browser shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatConfig {
    /// WebSocket endpoint, relative to the page origin.
    pub socket_path: String,
    /// Messages kept on screen; new ones push the oldest out.
    pub history_limit: usize,
    /// Storage key holding the chosen display name.
    pub name_key: String,
    pub home_path: String,
    pub chat_path: String,
    /// Seconds east of UTC used for message timestamps.
    pub utc_offset: i64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            socket_path: "/ws".into(),
            history_limit: 20,
            name_key: "chat_name".into(),
            home_path: "/".into(),
            chat_path: "/chat".into(),
            utc_offset: 0,
        }
    }
}
