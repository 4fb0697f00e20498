//! Core logic – source parsing, page generation, and the widget model.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Widgets
//! operate on the in-memory [`document::Document`], so every behaviour is
//! testable without a browser or a terminal.

pub mod accordion;
pub mod carousel;
pub mod document;
pub mod markup;
pub mod page;
pub mod tabs;
pub mod widgets;
