//! bizchat - embeddable business chat client core
//!
//! Maintains a single conversation against a remote chat backend: tracks
//! history, serializes user turns, interprets replies (assistant messages,
//! lead/meeting flags, suggested meeting slots) and keeps the presentation
//! layer consistent even when the network fails.

pub mod config;
pub mod gateway;
pub mod session;
pub mod state_machine;
pub mod types;

pub use config::{ConfigError, WidgetConfig};
pub use gateway::{BackendGateway, GatewayBuildError, HttpGateway, LoggingGateway};
pub use session::{ConversationSession, RenderSink, SessionHandle};
pub use types::{BackendResult, Message, Role, SuggestedSlot, TurnOutcome};
