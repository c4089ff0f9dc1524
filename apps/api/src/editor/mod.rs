// Resume editor: one in-memory draft bound to both the form and the preview.
// The preview is a pure projection of the draft; saving is always explicit.

pub mod draft;
pub mod preview;

pub use draft::{EntryList, Key, ResumeEditor};
pub use preview::render_preview;
