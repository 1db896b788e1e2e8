//! The document the user writes into, and the adapter the orchestrator uses
//! to read it and write generated text back.

pub mod adapter;
pub mod model;

pub use adapter::{ContentAdapter, CursorPosition, DocumentSnapshot, EditorFrame};
pub use model::{Document, Selection};
