use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use memmap::MmapMut;

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::piece_table::arena::{Piece, PieceArena, PieceId, BEGIN, END};
use crate::piece_table::buffers::{BufferStore, OriginalBuffer, ORIGINAL_BUFFER};
use crate::piece_table::change::{Action, Change};
use crate::piece_table::span::Span;

/// Which kind of edit most recently established or extended the cache
/// piece. A cache hit additionally requires the requested operation to
/// match this, so that e.g. a `delete` landing on the piece a preceding
/// `insert` just created is not silently folded into that insert's Change
/// — it is a different edit and gets its own Action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Insert,
    Delete,
}

/// Top-level facade composing the piece arena, backing buffers and the
/// undo/redo history into load/save/insert/delete/replace/undo/redo/
/// snapshot/iterate operations.
///
/// Not thread-safe: all operations on one `Editor` must be serialized by
/// the caller (see the concurrency model in the design document this crate
/// implements).
pub struct Editor {
    arena: PieceArena,
    buffers: BufferStore,
    size: usize,

    /// Piece eligible for the append-coalescing fast path, if any, and the
    /// kind of edit that put it there.
    cache: Option<(PieceId, EditKind)>,

    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
    /// Whether `undo_stack.last()` is still open for new Changes, i.e. no
    /// `snapshot()`/`undo()`/`redo()` has happened since it was created.
    current_open: bool,
    next_action_id: u64,
    /// Action id captured at the last successful `save`; `None` means
    /// "never saved" (equivalently, the undo stack was empty at save time).
    saved_marker: Option<u64>,

    config: EditorConfig,
    path: Option<PathBuf>,
}

impl Editor {
    /// Creates a new, empty document.
    pub fn empty() -> Editor {
        Editor::with_config(EditorConfig::default())
    }

    /// Creates a new, empty document with non-default knobs.
    pub fn with_config(config: EditorConfig) -> Editor {
        Editor {
            arena: PieceArena::new(),
            buffers: BufferStore::new(OriginalBuffer::empty(), config.append_buffer_min),
            size: 0,
            cache: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            current_open: false,
            next_action_id: 0,
            saved_marker: None,
            config,
            path: None,
        }
    }

    /// Loads `path` by memory-mapping it whole; the mapping is held read-only
    /// for the editor's lifetime and is never written through.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Editor> {
        Editor::open_with_config(path, EditorConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: EditorConfig) -> Result<Editor> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(EditorError::NotRegularFile(path.to_path_buf()));
        }

        let len = metadata.len() as usize;
        let original = OriginalBuffer::from_file(&file, len)?;

        let mut editor = Editor::with_config(config);
        editor.buffers = BufferStore::new(original, config.append_buffer_min);
        editor.path = Some(path.to_path_buf());

        if len > 0 {
            let id = editor.arena.alloc(Piece {
                buffer: ORIGINAL_BUFFER,
                pos: 0,
                len,
                prev: BEGIN,
                next: END,
            });
            editor.arena.get_mut(BEGIN).next = id;
            editor.arena.get_mut(END).prev = id;
            editor.size = len;
        }

        log::debug!("loaded {} ({} bytes)", path.display(), len);
        Ok(editor)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Path the document was loaded from, if any. Unrelated to where
    /// `save` writes; `save` always takes an explicit target.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True iff the document's content differs from what was on disk at the
    /// last successful `save` (or, if never saved, iff any edit has been
    /// made at all).
    pub fn modified(&self) -> bool {
        let top = self.undo_stack.last().map(|a| a.id);
        top != self.saved_marker
    }

    // -- position lookup -----------------------------------------------

    /// Resolves `pos` to the piece containing it and the offset within
    /// that piece. `pos == size` resolves to the last real piece at its own
    /// length (a boundary at its end); `pos == 0` resolves to the `begin`
    /// sentinel.
    fn locate(&self, pos: usize) -> Result<(PieceId, usize)> {
        if pos > self.size {
            return Err(EditorError::OutOfRange {
                pos,
                size: self.size,
            });
        }

        let mut cumulative = 0usize;
        let mut cur = BEGIN;
        loop {
            let len = self.arena.len_of(cur);
            if pos <= cumulative + len {
                return Ok((cur, pos - cumulative));
            }
            cumulative += len;
            cur = self.arena.get(cur).next;
        }
    }

    fn content(&self, piece: PieceId) -> &[u8] {
        let p = self.arena.get(piece);
        self.buffers.slice(p.buffer, p.pos, p.len)
    }

    // -- mutation --------------------------------------------------------

    /// Inserts `text` at byte offset `pos`. `pos` may equal `size` (append).
    pub fn insert(&mut self, pos: usize, text: &[u8]) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let (p, off) = self.locate(pos)?;

        if self.cache_insert(p, off, text) {
            log::trace!("insert: cache hit pos={pos} len={}", text.len());
            return Ok(());
        }

        let stored = self.buffers.store(text)?;
        let plen = self.arena.len_of(p);

        let (old, new, cache_piece) = if off == plen {
            // Boundary insert: attach the new piece between `p` and `p.next`.
            let next = self.arena.get(p).next;
            let n = self.arena.alloc(Piece {
                buffer: stored.buffer,
                pos: stored.pos,
                len: stored.len,
                prev: p,
                next,
            });
            (Span::empty(), Span::single(n, stored.len), n)
        } else {
            // Mid-piece insert: split `p` into a prefix and suffix around
            // the freshly stored text.
            let piece = *self.arena.get(p);
            let b = self.arena.alloc(Piece {
                buffer: piece.buffer,
                pos: piece.pos,
                len: off,
                prev: piece.prev,
                next: BEGIN, // patched below
            });
            let n = self.arena.alloc(Piece {
                buffer: stored.buffer,
                pos: stored.pos,
                len: stored.len,
                prev: b,
                next: BEGIN, // patched below
            });
            let a = self.arena.alloc(Piece {
                buffer: piece.buffer,
                pos: piece.pos + off,
                len: piece.len - off,
                prev: n,
                next: piece.next,
            });
            self.arena.get_mut(b).next = n;
            self.arena.get_mut(n).next = a;

            let new_len = off + stored.len + (piece.len - off);
            (Span::new(p, p, piece.len), Span::new(b, a, new_len), n)
        };

        self.push_change(Change { old, new });
        self.span_swap(&old, &new);
        self.cache = Some((cache_piece, EditKind::Insert));

        log::debug!("insert pos={pos} len={} piece={cache_piece}", text.len());
        Ok(())
    }

    /// Deletes `len` bytes starting at `pos`.
    pub fn delete(&mut self, pos: usize, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        if pos + len > self.size {
            return Err(EditorError::OutOfRange {
                pos: pos + len,
                size: self.size,
            });
        }

        let (p, off) = self.locate(pos)?;

        if self.cache_delete(p, off, len) {
            log::trace!("delete: cache hit pos={pos} len={len}");
            return Ok(());
        }

        let midway_start = off > 0;
        let start = if midway_start {
            p
        } else {
            self.arena.get(p).next
        };

        let mut cur = start;
        let mut cumulative = 0usize;
        let end = loop {
            let inner_off = if cur == start && midway_start { off } else { 0 };
            let avail = self.arena.len_of(cur) - inner_off;
            cumulative += avail;
            if cumulative >= len {
                break cur;
            }
            cur = self.arena.get(cur).next;
        };
        let excess = cumulative - len;
        let midway_end = excess > 0;

        let start_piece = *self.arena.get(start);
        let end_piece = *self.arena.get(end);
        let neighbor_before = start_piece.prev;
        let neighbor_after = end_piece.next;

        let b = if midway_start {
            Some(self.arena.alloc(Piece {
                buffer: start_piece.buffer,
                pos: start_piece.pos,
                len: off,
                prev: neighbor_before,
                next: neighbor_after,
            }))
        } else {
            None
        };
        let a = if midway_end {
            Some(self.arena.alloc(Piece {
                buffer: end_piece.buffer,
                pos: end_piece.pos + end_piece.len - excess,
                len: excess,
                prev: neighbor_before,
                next: neighbor_after,
            }))
        } else {
            None
        };
        if let (Some(bi), Some(ai)) = (b, a) {
            self.arena.get_mut(bi).next = ai;
            self.arena.get_mut(ai).prev = bi;
        }

        let new = match (b, a) {
            (Some(bi), Some(ai)) => Span::new(bi, ai, off + excess),
            (Some(bi), None) => Span::single(bi, off),
            (None, Some(ai)) => Span::single(ai, excess),
            (None, None) => Span::empty(),
        };
        let old_len = cumulative + if midway_start { off } else { 0 };
        let old = Span::new(start, end, old_len);

        self.push_change(Change { old, new });
        self.span_swap(&old, &new);
        self.cache = None;

        log::debug!("delete pos={pos} len={len}");
        Ok(())
    }

    /// Deletes `text.len()` bytes at `pos`, then inserts `text` at `pos`,
    /// within the same Action. Succeeds iff both sub-operations succeed; a
    /// failed delete still allows the insert to proceed (matching the
    /// conservative fallthrough this was specified against).
    pub fn replace(&mut self, pos: usize, text: &[u8]) -> Result<()> {
        let deleted = self.delete(pos, text.len());
        let inserted = self.insert(pos, text);
        inserted?;
        deleted?;
        Ok(())
    }

    /// Ends the current Action. The next mutation starts a fresh one.
    /// Idempotent: `snapshot(); snapshot()` behaves as a single call.
    pub fn snapshot(&mut self) {
        self.current_open = false;
        self.cache = None;
    }

    pub fn undo(&mut self) -> Result<bool> {
        let Some(action) = self.undo_stack.pop() else {
            return Ok(false);
        };
        for change in action.changes.iter().rev() {
            self.span_swap(&change.new, &change.old);
        }
        self.redo_stack.push(action);
        self.current_open = false;
        self.cache = None;
        log::debug!("undo: size={}", self.size);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let Some(action) = self.redo_stack.pop() else {
            return Ok(false);
        };
        for change in action.changes.iter() {
            self.span_swap(&change.old, &change.new);
        }
        self.undo_stack.push(action);
        self.current_open = false;
        self.cache = None;
        log::debug!("redo: size={}", self.size);
        Ok(true)
    }

    // -- span swap, the single point of commit ---------------------------

    /// Replaces `remove` with `insert` in the active sequence. Its own
    /// inverse: `span_swap(a, b)` undone by `span_swap(b, a)`.
    fn span_swap(&mut self, remove: &Span, insert: &Span) {
        if remove.is_empty() && insert.is_empty() {
            return;
        }

        let (l, r) = if !remove.is_empty() {
            (
                self.arena.get(remove.start.unwrap()).prev,
                self.arena.get(remove.end.unwrap()).next,
            )
        } else {
            (
                self.arena.get(insert.start.unwrap()).prev,
                self.arena.get(insert.end.unwrap()).next,
            )
        };

        if !insert.is_empty() {
            let s = insert.start.unwrap();
            let e = insert.end.unwrap();
            self.arena.get_mut(s).prev = l;
            self.arena.get_mut(e).next = r;
            self.arena.get_mut(l).next = s;
            self.arena.get_mut(r).prev = e;
        } else {
            self.arena.get_mut(l).next = r;
            self.arena.get_mut(r).prev = l;
        }

        self.size = self.size - remove.len + insert.len;
    }

    // -- history bookkeeping ----------------------------------------------

    fn ensure_open_action(&mut self) {
        if !self.current_open {
            self.clear_redo();
            let id = self.next_action_id;
            self.next_action_id += 1;
            self.undo_stack.push(Action::new(id));
            self.current_open = true;
        }
    }

    fn push_change(&mut self, change: Change) {
        self.ensure_open_action();
        self.undo_stack
            .last_mut()
            .expect("ensure_open_action just opened one")
            .changes
            .push(change);
    }

    /// Frees the `new` pieces of every Change on the redo stack; the `old`
    /// pieces stay active in the document (or reachable from the surviving
    /// undo stack) and are left alone.
    fn clear_redo(&mut self) {
        for action in self.redo_stack.drain(..) {
            for change in &action.changes {
                if let (Some(start), Some(end)) = (change.new.start, change.new.end) {
                    for id in self.arena.walk(start, end) {
                        self.arena.free(id);
                    }
                }
            }
        }
    }

    // -- append cache ------------------------------------------------------

    /// Structural half of cache eligibility: is `p` the piece the cache is
    /// currently tracking, with its bytes still sitting at the tail of the
    /// head append buffer. Does not check *which kind* of edit is asking.
    fn cache_tracks(&self, p: PieceId) -> bool {
        if !self.config.cache_enabled {
            return false;
        }
        if self.cache.map(|(id, _)| id) != Some(p) {
            return false;
        }
        if !self.current_open {
            return false;
        }
        let Some(action) = self.undo_stack.last() else {
            return false;
        };
        let Some(change) = action.changes.last() else {
            return false;
        };
        if change.new.start != Some(p) || change.new.end != Some(p) {
            return false;
        }

        let piece = self.arena.get(p);
        let Some(head) = self.buffers.head() else {
            return false;
        };
        if piece.buffer != head {
            return false;
        }
        let buf = self.buffers.head_buffer().expect("head() returned Some");
        piece.pos + piece.len == buf.used
    }

    /// Full eligibility: `p` is cache-tracked *and* `kind` is a continuation
    /// of the edit that put it there. A structural match on the wrong kind
    /// (e.g. a `delete` right after the `insert` that created `p`) is not a
    /// continuation — the caller closes the action out instead of merging.
    fn cache_eligible(&mut self, p: PieceId, kind: EditKind) -> bool {
        if !self.cache_tracks(p) {
            return false;
        }
        if self.cache.map(|(_, k)| k) != Some(kind) {
            // Same piece, different kind of edit: this is not a
            // continuation of the run that produced it. End that Action
            // here so the new edit gets its own, rather than silently
            // folding into the previous one.
            self.current_open = false;
            self.cache = None;
            return false;
        }
        true
    }

    fn cache_insert(&mut self, p: PieceId, off: usize, text: &[u8]) -> bool {
        if !self.cache_eligible(p, EditKind::Insert) {
            return false;
        }
        let remaining = self
            .buffers
            .head_buffer()
            .expect("cache_eligible implies a head buffer")
            .remaining();
        if remaining < text.len() {
            return false;
        }

        let piece = *self.arena.get(p);
        {
            let buf = self.buffers.head_buffer_mut().unwrap();
            let insert_at = piece.pos + off;
            let old_used = buf.used;
            if off < piece.len {
                buf.content.copy_within(insert_at..old_used, insert_at + text.len());
            }
            buf.content[insert_at..insert_at + text.len()].copy_from_slice(text);
            buf.used = old_used + text.len();
        }

        self.arena.get_mut(p).len += text.len();
        self.size += text.len();
        if let Some(change) = self
            .undo_stack
            .last_mut()
            .and_then(|a| a.changes.last_mut())
        {
            change.new.len += text.len();
        }
        true
    }

    fn cache_delete(&mut self, p: PieceId, off: usize, len: usize) -> bool {
        if !self.cache_eligible(p, EditKind::Delete) {
            return false;
        }
        let piece = *self.arena.get(p);
        if off + len > piece.len {
            return false;
        }

        {
            let buf = self.buffers.head_buffer_mut().unwrap();
            let remove_at = piece.pos + off;
            buf.content.copy_within(remove_at + len..buf.used, remove_at);
            buf.used -= len;
        }

        self.arena.get_mut(p).len -= len;
        self.size -= len;
        if let Some(change) = self
            .undo_stack
            .last_mut()
            .and_then(|a| a.changes.last_mut())
        {
            change.new.len -= len;
        }
        true
    }

    // -- iteration ---------------------------------------------------------

    /// Calls `f(absolute_pos, bytes)` for every active piece from `pos`
    /// onward, until `f` returns `false` or the sequence ends.
    pub fn iterate<F: FnMut(usize, &[u8]) -> bool>(&self, pos: usize, mut f: F) -> Result<()> {
        let (mut cur, mut cur_off) = self.locate(pos)?;
        let mut abs_pos = pos;

        loop {
            if cur == END {
                break;
            }
            let piece_len = self.arena.len_of(cur);
            if piece_len > cur_off {
                let bytes = &self.content(cur)[cur_off..];
                let keep_going = f(abs_pos, bytes);
                abs_pos += bytes.len();
                if !keep_going {
                    break;
                }
            }
            cur = self.arena.get(cur).next;
            cur_off = 0;
        }

        Ok(())
    }

    /// Collects the whole document (or, if you only need a slice, prefer
    /// `iterate` directly) into a fresh `Vec<u8>`.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size);
        let _ = self.iterate(0, |_, bytes| {
            out.extend_from_slice(bytes);
            true
        });
        out
    }

    /// Opaque read-only cursor positioned at `pos`.
    pub fn iterator_get(&self, pos: usize) -> Result<Cursor<'_>> {
        let (mut p, off) = self.locate(pos)?;
        if off == self.arena.len_of(p) {
            p = self.arena.get(p).next;
        }
        Ok(Cursor { editor: self, piece: p })
    }

    // -- persistence ---------------------------------------------------------

    /// Writes the document to a sibling temp file and atomically renames it
    /// over `path`. On success, marks the document unmodified and ends the
    /// current Action.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = tmp_path_for(path)?;

        if let Err(e) = self.write_tmp(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        fs::rename(&tmp_path, path)?;

        self.saved_marker = self.undo_stack.last().map(|a| a.id);
        self.snapshot();
        log::info!("saved {} ({} bytes)", path.display(), self.size);
        Ok(())
    }

    fn write_tmp(&self, tmp_path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(tmp_path)?;
        file.set_len(self.size as u64)?;

        if self.size > 0 {
            let mut mmap = unsafe { MmapMut::map_mut(&file)? };
            let mut offset = 0usize;
            self.iterate(0, |_, bytes| {
                mmap[offset..offset + bytes.len()].copy_from_slice(bytes);
                offset += bytes.len();
                true
            })?;
            mmap.flush()?;
        }

        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        EditorError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "save path has no file name",
        ))
    })?;

    let mut tmp_name = OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    Ok(dir.join(tmp_name))
}

/// Read-only cursor over the piece sequence. `valid()` is false once the
/// cursor has walked onto a sentinel.
pub struct Cursor<'a> {
    editor: &'a Editor,
    piece: PieceId,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn valid(&self) -> bool {
        self.piece != BEGIN && self.piece != END
    }

    /// Content of the piece the cursor is currently on, or `None` at a
    /// sentinel.
    pub fn get(&self) -> Option<(&'a [u8], usize)> {
        if !self.valid() {
            return None;
        }
        let bytes = self.editor.content(self.piece);
        Some((bytes, bytes.len()))
    }

    /// Advances to the next piece; returns whether the new position is valid.
    pub fn next(&mut self) -> bool {
        self.piece = self.editor.arena.get(self.piece).next;
        self.valid()
    }

    /// Moves to the previous piece; returns whether the new position is valid.
    pub fn prev(&mut self) -> bool {
        self.piece = self.editor.arena.get(self.piece).prev;
        self.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(ed: &Editor) -> Vec<u8> {
        ed.to_vec()
    }

    fn s(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn insert_into_empty() {
        let mut ed = Editor::empty();
        ed.insert(0, b"hello").unwrap();
        assert_eq!(s(&content(&ed)), "hello");
        assert_eq!(ed.size(), 5);
        assert!(ed.modified());
    }

    #[test]
    fn two_inserts_coalesce_and_undo() {
        let mut ed = Editor::empty();
        ed.insert(0, b"hello").unwrap();
        ed.insert(5, b" world").unwrap();
        assert_eq!(s(&content(&ed)), "hello world");
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "");
        assert!(!ed.modified());
    }

    #[test]
    fn insert_delete_undo_redo() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abcdef").unwrap();
        ed.delete(2, 2).unwrap();
        assert_eq!(s(&content(&ed)), "abef");
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "abcdef");
        assert!(ed.redo().unwrap());
        assert_eq!(s(&content(&ed)), "abef");
    }

    #[test]
    fn snapshot_splits_actions() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        ed.snapshot();
        ed.insert(3, b"def").unwrap();
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "abc");
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "");
        assert!(!ed.undo().unwrap());
    }

    #[test]
    fn snapshot_then_two_edits_undo_together() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abcdef").unwrap();
        ed.snapshot();
        ed.delete(1, 4).unwrap();
        ed.insert(1, b"XY").unwrap();
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "abcdef");
    }

    #[test]
    fn replace_is_delete_then_insert_one_action() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abcdef").unwrap();
        ed.replace(2, b"ZZ").unwrap();
        assert_eq!(s(&content(&ed)), "abZZef");
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "abcdef");
    }

    #[test]
    fn replace_failed_delete_still_inserts() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        // text.len() == 5 makes the delete sub-operation OutOfRange, but the
        // insert still proceeds per the documented fallthrough.
        assert!(ed.replace(2, b"XYZZZ").is_err());
        assert_eq!(s(&content(&ed)), "abXYZZZc");
    }

    #[test]
    fn insert_out_of_range() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        assert!(matches!(
            ed.insert(4, b"x"),
            Err(EditorError::OutOfRange { pos: 4, size: 3 })
        ));
    }

    #[test]
    fn delete_out_of_range_leaves_content_untouched() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        assert!(ed.delete(1, 10).is_err());
        assert_eq!(s(&content(&ed)), "abc");
    }

    #[test]
    fn empty_insert_and_delete_are_noops() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        ed.insert(1, b"").unwrap();
        ed.delete(1, 0).unwrap();
        assert_eq!(s(&content(&ed)), "abc");

        // no-ops must not have opened their own Actions
        assert!(ed.undo().unwrap());
        assert_eq!(s(&content(&ed)), "");
        assert!(!ed.undo().unwrap());
    }

    #[test]
    fn insert_composition_law() {
        let mut a = Editor::empty();
        a.insert(0, b"foo").unwrap();
        a.insert(3, b"bar").unwrap();

        let mut b = Editor::empty();
        b.insert(0, b"foobar").unwrap();

        assert_eq!(content(&a), content(&b));
    }

    #[test]
    fn delete_insert_round_trip_law() {
        let mut ed = Editor::empty();
        ed.insert(0, b"hello world").unwrap();
        let before = content(&ed);
        ed.insert(5, b", there").unwrap();
        ed.delete(5, 7).unwrap();
        assert_eq!(content(&ed), before);
    }

    #[test]
    fn full_undo_then_redo_matches_pre_undo_state() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        ed.snapshot();
        ed.insert(3, b"def").unwrap();
        ed.snapshot();
        ed.delete(0, 2).unwrap();
        let mid = content(&ed);
        ed.undo().unwrap();
        ed.undo().unwrap();
        ed.undo().unwrap();
        ed.redo().unwrap();
        ed.redo().unwrap();
        ed.redo().unwrap();
        assert_eq!(content(&ed), mid);
    }

    #[test]
    fn double_snapshot_is_single_snapshot() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        ed.snapshot();
        ed.snapshot();
        ed.insert(3, b"def").unwrap();
        ed.undo().unwrap();
        assert_eq!(s(&content(&ed)), "abc");
        ed.undo().unwrap();
        assert_eq!(s(&content(&ed)), "");
    }

    #[test]
    fn size_matches_iterated_length() {
        let mut ed = Editor::empty();
        ed.insert(0, b"the quick brown fox").unwrap();
        ed.delete(4, 6).unwrap();
        let mut total = 0usize;
        ed.iterate(0, |_, bytes| {
            total += bytes.len();
            true
        })
        .unwrap();
        assert_eq!(total, ed.size());
    }

    #[test]
    fn cursor_walks_forward_and_back() {
        let mut ed = Editor::empty();
        ed.insert(0, b"abc").unwrap();
        ed.snapshot();
        ed.insert(3, b"def").unwrap();

        let mut cur = ed.iterator_get(0).unwrap();
        let mut collected = Vec::new();
        while cur.valid() {
            let (bytes, _) = cur.get().unwrap();
            collected.extend_from_slice(bytes);
            if !cur.next() {
                break;
            }
        }
        assert_eq!(s(&collected), "abcdef");
        assert!(cur.prev());
    }

    #[test]
    fn disabled_cache_still_produces_correct_content() {
        let config = EditorConfig {
            cache_enabled: false,
            ..EditorConfig::default()
        };
        let mut ed = Editor::with_config(config);
        ed.insert(0, b"abcdef").unwrap();
        ed.insert(6, b"ghi").unwrap();
        ed.delete(2, 2).unwrap();
        assert_eq!(s(&content(&ed)), "abefghi");
    }
}
