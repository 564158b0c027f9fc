use std::fs::File;
use std::io;

use memmap::Mmap;

use crate::error::EditorError;

/// Index of a [`BackingBuffer`] within an [`Editor`](crate::Editor)'s buffer
/// list. Index `0` is always the original buffer.
pub(crate) type BufferId = usize;

pub(crate) const ORIGINAL_BUFFER: BufferId = 0;

/// A contiguous append-only byte arena.
///
/// The original buffer is a read-only memory map of the file the document
/// was loaded from (or empty, for a document created from scratch). Append
/// buffers are heap allocated and only ever grown by pushing bytes onto
/// their tail; `store` is the only writer, except for the append-coalescing
/// cache in [`crate::Editor`], which is allowed to rewrite bytes strictly
/// within `[0, used)` of the latest append buffer.
#[derive(Debug)]
pub(crate) enum BackingBuffer {
    Original(OriginalBuffer),
    Append(AppendBuffer),
}

impl BackingBuffer {
    #[inline]
    pub(crate) fn slice(&self, pos: usize, len: usize) -> &[u8] {
        match self {
            BackingBuffer::Original(orig) => &orig.bytes()[pos..pos + len],
            BackingBuffer::Append(app) => &app.content[pos..pos + len],
        }
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        match self {
            BackingBuffer::Original(orig) => orig.bytes().len(),
            BackingBuffer::Append(app) => app.used,
        }
    }

    pub(crate) fn as_append(&self) -> Option<&AppendBuffer> {
        match self {
            BackingBuffer::Append(app) => Some(app),
            BackingBuffer::Original(_) => None,
        }
    }

    pub(crate) fn as_append_mut(&mut self) -> Option<&mut AppendBuffer> {
        match self {
            BackingBuffer::Append(app) => Some(app),
            BackingBuffer::Original(_) => None,
        }
    }
}

/// The read-only, memory-mapped view of the file an `Editor` was loaded
/// from. Never appended to. A document created without a backing file has
/// an empty original buffer and never references it from any piece.
#[derive(Debug, Default)]
pub(crate) struct OriginalBuffer {
    mmap: Option<Mmap>,
}

impl OriginalBuffer {
    pub(crate) fn empty() -> OriginalBuffer {
        OriginalBuffer { mmap: None }
    }

    /// Maps `file` (already verified to be a regular file by the caller) as
    /// a read-only `MAP_SHARED` region.
    pub(crate) fn from_file(file: &File, len: usize) -> io::Result<OriginalBuffer> {
        if len == 0 {
            // mmap-ing a zero length file fails on most platforms; an empty
            // original buffer behaves identically for our purposes.
            return Ok(OriginalBuffer::empty());
        }

        let mmap = unsafe { Mmap::map(file)? };
        Ok(OriginalBuffer { mmap: Some(mmap) })
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }
}

/// A heap-allocated, append-only arena of a fixed capacity.
#[derive(Debug)]
pub(crate) struct AppendBuffer {
    pub(crate) content: Vec<u8>,
    pub(crate) capacity: usize,
    pub(crate) used: usize,
}

impl AppendBuffer {
    /// Fails with `OutOfMemory` rather than aborting the process when the
    /// allocation can't be satisfied.
    pub(crate) fn with_capacity(capacity: usize) -> crate::error::Result<AppendBuffer> {
        let mut content = Vec::new();
        content
            .try_reserve_exact(capacity)
            .map_err(|_| EditorError::OutOfMemory)?;
        content.resize(capacity, 0u8);
        Ok(AppendBuffer {
            content,
            capacity,
            used: 0,
        })
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Appends `bytes` to the tail, returning the offset they were written
    /// at. Caller must have checked `remaining() >= bytes.len()`.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> usize {
        debug_assert!(self.remaining() >= bytes.len());
        let pos = self.used;
        self.content[pos..pos + bytes.len()].copy_from_slice(bytes);
        self.used += bytes.len();
        pos
    }
}

/// Where a freshly stored byte range landed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StoreRef {
    pub(crate) buffer: BufferId,
    pub(crate) pos: usize,
    pub(crate) len: usize,
}

/// Owns the original buffer plus the chain of append buffers, in allocation
/// order. `buffers[0]` is always the original buffer; every later entry is
/// an append buffer, with `buffers.last()` being the "head" that `store`
/// writes into.
#[derive(Debug)]
pub(crate) struct BufferStore {
    buffers: Vec<BackingBuffer>,
    append_min: usize,
}

impl BufferStore {
    pub(crate) fn new(original: OriginalBuffer, append_min: usize) -> BufferStore {
        BufferStore {
            buffers: vec![BackingBuffer::Original(original)],
            append_min,
        }
    }

    pub(crate) fn slice(&self, buffer: BufferId, pos: usize, len: usize) -> &[u8] {
        self.buffers[buffer].slice(pos, len)
    }

    pub(crate) fn get(&self, buffer: BufferId) -> &BackingBuffer {
        &self.buffers[buffer]
    }

    /// Index of the append buffer currently being written to, if any append
    /// buffer has ever been allocated.
    pub(crate) fn head(&self) -> Option<BufferId> {
        if self.buffers.len() > 1 {
            Some(self.buffers.len() - 1)
        } else {
            None
        }
    }

    pub(crate) fn head_buffer(&self) -> Option<&AppendBuffer> {
        self.head().and_then(|id| self.buffers[id].as_append())
    }

    pub(crate) fn head_buffer_mut(&mut self) -> Option<&mut AppendBuffer> {
        let head = self.head()?;
        self.buffers[head].as_append_mut()
    }

    /// Copies `bytes` into the head append buffer if there's room, else
    /// allocates a new append buffer of `max(bytes.len(), append_min)` and
    /// links it as the new head. Fails with `OutOfMemory` if that
    /// allocation can't be satisfied.
    pub(crate) fn store(&mut self, bytes: &[u8]) -> crate::error::Result<StoreRef> {
        if let Some(head) = self.head_buffer_mut() {
            if head.remaining() >= bytes.len() {
                let pos = head.append(bytes);
                return Ok(StoreRef {
                    buffer: self.buffers.len() - 1,
                    pos,
                    len: bytes.len(),
                });
            }
        }

        let capacity = bytes.len().max(self.append_min);
        let mut buf = AppendBuffer::with_capacity(capacity)?;
        let pos = buf.append(bytes);
        self.buffers.push(BackingBuffer::Append(buf));
        Ok(StoreRef {
            buffer: self.buffers.len() - 1,
            pos,
            len: bytes.len(),
        })
    }
}
