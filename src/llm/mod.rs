mod client;
mod dto;
mod error;

pub use client::{Completer, GroqClient};
pub use error::CompletionError;
