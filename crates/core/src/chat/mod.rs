//! Conversational flow: ports and the chat service

pub mod ports;
pub mod service;

pub use service::{ChatService, ChatTurn};
