use super::buffers::BufferId;

/// A stable index into the piece arena. Pieces are never moved; `prev` and
/// `next` are ids rather than owning references, which sidesteps the cyclic
/// ownership a naive doubly linked list would require (see the design notes
/// on arena-of-ids for piece sequences).
pub(crate) type PieceId = usize;

/// Fixed id of the zero-length sentinel that precedes the first real piece.
pub(crate) const BEGIN: PieceId = 0;
/// Fixed id of the zero-length sentinel that follows the last real piece.
pub(crate) const END: PieceId = 1;

/// An immutable (logically) descriptor of a byte range in one backing
/// buffer, plus its position in the piece sequence.
///
/// `prev`/`next` are only meaningful while a piece is part of the active
/// sequence; once a piece is swapped out it keeps whatever `prev`/`next` it
/// last held; a later `span_swap` that reactivates it restores the correct
/// neighbors because those neighbor-facing links are never mutated for the
/// interior of a span, only rewritten on the two boundary pieces that
/// actually change neighbors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Piece {
    pub(crate) buffer: BufferId,
    pub(crate) pos: usize,
    pub(crate) len: usize,
    pub(crate) prev: PieceId,
    pub(crate) next: PieceId,
}

/// Slab of pieces, indexed by stable [`PieceId`]s. Freed slots are recycled
/// via `free_list` so that ids stay dense without ever invalidating a live
/// id held elsewhere.
#[derive(Debug)]
pub(crate) struct PieceArena {
    slots: Vec<Option<Piece>>,
    free_list: Vec<PieceId>,
}

impl PieceArena {
    pub(crate) fn new() -> PieceArena {
        let mut slots = Vec::with_capacity(2);
        // begin and end are zero length and link to each other for an
        // empty document; real content splices itself in between.
        slots.push(Some(Piece {
            buffer: 0,
            pos: 0,
            len: 0,
            prev: BEGIN,
            next: END,
        }));
        slots.push(Some(Piece {
            buffer: 0,
            pos: 0,
            len: 0,
            prev: BEGIN,
            next: END,
        }));
        PieceArena {
            slots,
            free_list: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: PieceId) -> &Piece {
        self.slots[id]
            .as_ref()
            .expect("dereferenced a freed piece id")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: PieceId) -> &mut Piece {
        self.slots[id]
            .as_mut()
            .expect("dereferenced a freed piece id")
    }

    #[inline]
    pub(crate) fn len_of(&self, id: PieceId) -> usize {
        self.get(id).len
    }

    pub(crate) fn alloc(&mut self, piece: Piece) -> PieceId {
        if let Some(id) = self.free_list.pop() {
            self.slots[id] = Some(piece);
            id
        } else {
            self.slots.push(Some(piece));
            self.slots.len() - 1
        }
    }

    /// Frees a piece that is no longer reachable from the active sequence
    /// or from any surviving Action. Used only to eagerly drop the `new`
    /// pieces of a discarded redo Change.
    pub(crate) fn free(&mut self, id: PieceId) {
        debug_assert!(id != BEGIN && id != END, "sentinels are never freed");
        self.slots[id] = None;
        self.free_list.push(id);
    }

    /// Walks `start..=end` via `next` links, collecting every piece id in
    /// the span. Valid even for inactive spans, since interior links are
    /// fixed at piece creation and never rewritten afterwards.
    pub(crate) fn walk(&self, start: PieceId, end: PieceId) -> Vec<PieceId> {
        let mut ids = Vec::new();
        let mut cur = start;
        loop {
            ids.push(cur);
            if cur == end {
                break;
            }
            cur = self.get(cur).next;
        }
        ids
    }
}
