//! Chat widget client.
//!
//! A transcript, a typing indicator and a reset control wired to a
//! conversation service's `/send_message` and `/reset_conversation`
//! endpoints. The [`controller`] owns the state; [`ui`] renders it with
//! Dioxus and the `chat-cli` binary drives it from a terminal.

pub mod backend;
pub mod config;
pub mod controller;
pub mod theme;
pub mod transcript;
pub mod types;
pub mod ui;
pub mod views;
