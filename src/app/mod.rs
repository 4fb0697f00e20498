//! Preview orchestration — state, event reader, and input handling.

pub mod event;
pub mod handler;
pub mod images;
pub mod state;
