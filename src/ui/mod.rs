//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer reads the document and widget state and turns them into cells
//! on the terminal.  It never mutates the document.

pub mod halfblocks;
pub mod layout;
pub mod preview;
pub mod theme;
