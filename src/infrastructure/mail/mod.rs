//! Inbound message decoding.

mod message;

pub use message::{MessageContent, MessageError};
