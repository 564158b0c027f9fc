/// Minimum size of a freshly allocated append buffer, unless a larger size is
/// requested to fit the text being stored.
pub const BUFFER_MIN: usize = 1024 * 1024;

/// Construction-time knobs for an [`Editor`](crate::Editor).
///
/// Kept as an explicit, passed-in value rather than read from the
/// environment or a global, so that two editors in the same process can
/// disagree (e.g. tests wanting a tiny `append_buffer_min` to exercise
/// buffer rollover, or wanting the append cache disabled to assert on the
/// exact shape of the Change/Action history).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Minimum capacity of a newly allocated append buffer, in bytes.
    pub append_buffer_min: usize,
    /// Whether the append-coalescing cache fast path is active.
    pub cache_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            append_buffer_min: BUFFER_MIN,
            cache_enabled: true,
        }
    }
}
