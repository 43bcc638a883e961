//! Core terminal emulation components.
//!
//! This module contains everything that does not touch the screen:
//!
//! - **tokenizer**: splits a command line into arguments
//! - **commands**: the built-in command table
//! - **action** / **engine**: the delegated command engine and its replies
//! - **dispatcher**: runs a submitted line against either backend
//! - **controller**: key events → draft/history updates and effects
//! - **session**: per-terminal state (transcript, input line, theme)
//! - **terminal**: one instance wiring the pieces together
//!
//! # Architecture
//!
//! ```text
//! Terminal
//! ├── Session
//! │   ├── Lines (transcript)
//! │   ├── InputState (draft + CommandHistory)
//! │   └── Theme
//! └── Dispatcher
//!     └── Backend
//!         ├── Local(CommandTable)
//!         └── Delegated(DelegatedEngine)
//! ```

pub mod action;
pub mod commands;
pub mod controller;
pub mod dispatcher;
pub mod engine;
pub mod session;
pub mod terminal;
pub mod tokenizer;
