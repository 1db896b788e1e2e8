//! A terminal writing pad with an on-demand "continue writing" command.
//!
//! The [`session`] owns the document and an explicit state machine that
//! allows one generation at a time. Generations run in the background
//! ([`generation`]) and their results are typed back into the document by
//! the [`streaming`] inserter.

pub mod config;
pub mod display;
pub mod document;
pub mod event;
pub mod generation;
pub mod session;
pub mod streaming;
