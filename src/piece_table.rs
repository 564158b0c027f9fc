//! The piece sequence: backing buffers, the piece arena, spans and the
//! change/action history. [`crate::Editor`] is the only thing that composes
//! these into something a caller drives directly.

pub(crate) mod arena;
pub(crate) mod buffers;
pub(crate) mod change;
pub(crate) mod span;
