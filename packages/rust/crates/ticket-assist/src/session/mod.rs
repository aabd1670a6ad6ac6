//! Ticket sessions: state, per-turn rules, and the registry of active tickets.

mod controller;
mod model;
mod registry;
mod reply;

pub use controller::{SessionController, TurnOutcome};
pub use model::{RetireReason, Session, SessionProfile, SessionState};
pub use registry::SessionRegistry;
pub use reply::{
    LANGUAGE_INSTRUCTION, REPLY_PLACEHOLDER, extract_reply, mentions, strip_citations,
    turn_instruction,
};
