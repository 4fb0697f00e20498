//! Central preview state.
//!
//! All mutable state lives here so that rendering is a function over
//! `&mut AppState` and input handling only mutates through widget commands.

use std::path::PathBuf;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::document::Document;
use crate::core::widgets::{WidgetCommand, WidgetRef, Widgets};

use super::images::ImageCache;

/// What a click on a screen region does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Move focus to the widget at this position in the list.
    Focus(usize),
    Command(WidgetCommand),
}

/// A clickable region recorded during the last draw.
#[derive(Debug, Clone)]
pub struct HitZone {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Top-level preview state.
pub struct AppState {
    pub doc: Document,
    pub widgets: Widgets,
    pub config: AppConfig,
    /// Index into `widgets.order` of the focused widget.
    pub focus: usize,
    /// Highlighted section per accordion.
    pub accordion_cursor: Vec<usize>,
    pub images: ImageCache,
    /// Clickable regions from the most recent frame.
    pub hit_zones: Vec<HitZone>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(mut doc: Document, config: AppConfig, image_dir: PathBuf) -> Self {
        let widgets = Widgets::load(&mut doc, config.highlight);
        let accordion_cursor = vec![0; widgets.accordions.len()];
        Self {
            doc,
            widgets,
            config,
            focus: 0,
            accordion_cursor,
            images: ImageCache::new(image_dir),
            hit_zones: Vec::new(),
            status_message: None,
            should_quit: false,
        }
    }

    pub fn focused(&self) -> Option<WidgetRef> {
        self.widgets.order.get(self.focus).copied()
    }

    /// Apply a widget command, surfacing failures in the status bar.
    pub fn run(&mut self, command: WidgetCommand) {
        match self.widgets.apply(&mut self.doc, &command) {
            Ok(()) => self.status_message = None,
            Err(e) => {
                tracing::warn!(?command, "command failed: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }
}
