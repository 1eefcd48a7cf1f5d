//! Roleplay chat relay for the Gemini API, plus the client-side pieces
//! (history windowing, saved-chat storage, terminal front end) that talk
//! to it.

pub mod client;
pub mod config;
pub mod error;
pub mod gemini;
pub mod web;
