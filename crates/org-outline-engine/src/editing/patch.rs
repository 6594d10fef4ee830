/// Result of applying a command or swap to a document.
pub struct Patch {
    /// Byte ranges the operation rewrote.
    pub changed: Vec<std::ops::Range<usize>>,
    /// Selection after the operation.
    pub new_selection: std::ops::Range<usize>,
    /// Document version after the operation.
    pub version: u64,
}
