use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which kind of hook slot an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    State,
    Effect,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookKind::State => f.write_str("state"),
            HookKind::Effect => f.write_str("effect"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{hook} must be used inside a render pass")]
    NotRendering { hook: &'static str },

    #[error("{kind} hooks called {current} times this pass but {previous} times last pass")]
    HookOrderChanged {
        kind: HookKind,
        previous: usize,
        current: usize,
    },

    #[error("{kind} slot {index} was read back with a different type")]
    HookTypeMismatch { kind: HookKind, index: usize },

    #[error("state was set while its component was still building")]
    RenderInProgress,

    #[error("component failed: {0}")]
    Component(String),
}

impl Error {
    pub fn component(message: impl Into<String>) -> Self {
        Error::Component(message.into())
    }
}
