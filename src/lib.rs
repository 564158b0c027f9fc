//! A piece-table text buffer: mmap-backed load, in-memory append buffers,
//! multi-level undo/redo over a two-stack Action/Change history, and
//! crash-safe save via temp-file-then-rename.
//!
//! [`Editor`] is the only type most callers need; everything else in this
//! crate exists to make it correct and fast.

mod config;
mod editor;
mod error;
mod piece_table;

pub use config::{EditorConfig, BUFFER_MIN};
pub use editor::{Cursor, Editor};
pub use error::{EditorError, Result};
