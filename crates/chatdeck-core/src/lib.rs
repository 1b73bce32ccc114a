//! Chat panel core: reconciles streamed gateway chat events into display
//! state and manages model selection for the session.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod models;
pub mod panel;
pub mod reduce;
pub mod session;
pub mod state;
pub mod test_utils;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{CatalogEntry, RequestClient, StaticCatalogClient};
pub use config::{GatewayMethods, PanelConfig};
pub use error::{Error, Result};
pub use event::{ChatEvent, ChatEventKind, ChatEventPayload, ChatEventState, ChatOutcome};
pub use message::{
    ContentBlock, KnownBlock, Message, MessageParseError, Role, TextBlock, ThinkingBlock,
};
pub use models::{model_command, model_options};
pub use panel::ChatPanel;
pub use reduce::{handle_chat_event, reduce};
pub use state::{ChatState, ModelOption};
pub use types::{RunId, SessionKey, Timestamp};
