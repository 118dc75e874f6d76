//! These models represent the objects passed between the council and its members
//!
//! There are two related formats we need to interact with:
//! - openai-style chat messages, sent from the council to every member model
//! - the chat completion response returned by a member, reduced to its first choice
//!
//! Messages are forwarded to the remote endpoint exactly as the caller built them, so the
//! internal structs serialize directly to the wire format.
pub mod message;
pub mod outcome;
pub mod role;
