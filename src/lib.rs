//! # tutor - Conversational English Tutor
//!
//! `tutor` lets a learner practice English conversation with a hosted
//! generative model acting as a friendly tutor.
//!
//! ## Features
//!
//! - **Relay server**: `POST /api/chat` forwards the transcript to Gemini with
//!   the tutor persona attached, and serves static assets for other paths
//! - **Terminal chat**: replies rendered as paragraphs and bullet lists
//! - **Translation**: each reply can be followed by a translation into the
//!   learner's language (Indonesian by default)
//! - **Speech**: replies are read aloud through espeak-ng, and an external
//!   capture command can provide voice input
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the relay (reads GEMINI_API_KEY)
//! tutor serve
//!
//! # Practice in another terminal
//! tutor chat
//!
//! # Translate replies into Japanese, without speech
//! tutor chat --to ja --mute
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/tutor/config.toml`:
//!
//! ```toml
//! [server]
//! port = 3000
//! model = "gemini-2.5-flash"
//! static_dir = "public"
//!
//! [client]
//! endpoint = "http://localhost:3000"
//! translate_to = "id"
//!
//! [speech]
//! program = "espeak-ng"
//! recognizer = ["my-stt", "--once"]
//! ```

/// Interactive chat client and conversation orchestration.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and settings resolution.
pub mod config;

/// Conversation turns and wire types shared by relay and client.
pub mod conversation;

/// File system utilities.
pub mod fs;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Relay service in front of the generative model.
pub mod relay;

/// Formatting of chat messages for display.
pub mod render;

/// Speech synthesis, voice selection and recognition.
pub mod speech;

/// Translation prompts and supported languages.
pub mod translation;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;
