//! # Editing Core
//!
//! The buffer collaborator and the mutation primitives built on the parsed
//! structure:
//!
//! - **`document`**: [`Document`], the xi-rope buffer plus the single
//!   selection, the fold set, and an edit version counter.
//! - **`swap`**: the region swap engine with closed-form cursor and fold
//!   projection.
//! - **`commands`**: [`Cmd`], node moves, checkbox toggling, TODO-state
//!   cycling.
//! - **`folding`**: section folds and whole-document visibility cycling.
//! - **`navigate`**: link-at-point resolution and `#+LINK` abbreviation
//!   expansion.
//! - **`archive`**: archive-entry extraction for the section under the
//!   cursor.
//!
//! Every structural operation parses the buffer fresh via
//! [`Document::outline`]; nothing here caches a tree across edits.

pub mod archive;
pub mod commands;
pub mod document;
pub mod folding;
pub mod navigate;
pub mod patch;
pub mod swap;

pub use archive::{ArchiveEntry, extract_archive_entry};
pub use commands::Cmd;
pub use document::Document;
pub use folding::{cycle_global_visibility, toggle_section_fold};
pub use navigate::{LinkTarget, link_at_point, resolve_link_target};
pub use patch::Patch;
pub use swap::{project_point_after_swap, swap_spans};

/// Errors for editing operations.
///
/// These are caller-side precondition violations or lookups the caller asked
/// for by position; malformed document text is never an error anywhere in
/// the engine.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("cannot run this command with a selection")]
    SelectionNotEmpty,
    #[error("swap regions must not overlap")]
    OverlappingRegions,
    #[error("{0} region must begin at line start")]
    RegionStartNotAligned(&'static str),
    #[error("{0} region must end at line start")]
    RegionEndNotAligned(&'static str),
    #[error("cursor is not positioned over a headline")]
    NotOnHeadline,
    #[error("cursor is not on a link")]
    NotOnLink,
    #[error("link expansion limit exceeded while expanding `{0}`")]
    LinkExpansionLimit(String),
}
