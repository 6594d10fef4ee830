pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{LineRef, full_lines_in_span};
pub use slice::{preview, slice_to_string};
pub use span::Span;
