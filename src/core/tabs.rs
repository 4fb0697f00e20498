//! Tab switcher — mutually exclusive panels behind a row of trigger buttons.
//!
//! Class names are looked up once in [`TabGroup::resolve`]; afterwards the
//! group only holds element handles.

use super::document::{Display, Document, ElementId};
use super::widgets::WidgetError;

/// Class added to the active trigger.
pub const ACTIVE_CLASS: &str = "tab_active";

/// How the active trigger is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightStyle {
    /// Add [`ACTIVE_CLASS`] to the trigger.
    #[default]
    Class,
    /// Paint the trigger (and every panel) with the trigger's colour.
    Color,
}

/// One tab: its trigger button and the panel it opens.
#[derive(Debug, Clone)]
pub struct Tab {
    pub name: String,
    pub trigger: ElementId,
    pub panel: ElementId,
    pub color: String,
}

/// A resolved tab group.
#[derive(Debug, Clone)]
pub struct TabGroup {
    pub tabs: Vec<Tab>,
    pub style: HighlightStyle,
    /// Index into `tabs` of the open tab.
    pub active: Option<usize>,
    default_trigger: Option<usize>,
}

impl TabGroup {
    /// Resolve the triggers and panels under a `tab_group` container.
    ///
    /// Triggers are paired with the panel whose id equals the trigger label.
    /// Triggers without a matching panel are dropped with a warning.
    pub fn resolve(doc: &Document, container: ElementId, style: HighlightStyle) -> Self {
        let panels = doc.children_by_class(container, "tab_content");
        let default_el = doc.by_id(container, "defaultOpen");
        let mut tabs = Vec::new();
        let mut default_trigger = None;

        for trigger in doc.children_by_class(container, "tab_button") {
            let el = doc.get(trigger);
            let Some(panel) = panels
                .iter()
                .copied()
                .find(|&p| doc.get(p).id.as_deref() == Some(el.text.as_str()))
            else {
                tracing::warn!(tab = %el.text, "tab trigger has no panel");
                continue;
            };
            if Some(trigger) == default_el {
                default_trigger = Some(tabs.len());
            }
            tabs.push(Tab {
                name: el.text.clone(),
                trigger,
                panel,
                color: el.color.clone().unwrap_or_else(|| "white".into()),
            });
        }

        Self {
            tabs,
            style,
            active: None,
            default_trigger,
        }
    }

    /// Page-load behaviour: click the `defaultOpen` trigger once.
    pub fn open_default(&mut self, doc: &mut Document) {
        let default = self
            .default_trigger
            .or_else(|| (!self.tabs.is_empty()).then_some(0));
        if let Some(i) = default {
            self.activate_index(doc, i);
        }
    }

    /// Open the panel named `panel`.
    pub fn activate(&mut self, doc: &mut Document, panel: &str) -> Result<(), WidgetError> {
        let index = self
            .tabs
            .iter()
            .position(|t| t.name == panel)
            .ok_or_else(|| WidgetError::UnknownPanel(panel.to_string()))?;
        self.activate_index(doc, index);
        Ok(())
    }

    /// Open the tab at `index` (0-based).  Out-of-range indices are ignored.
    pub fn activate_index(&mut self, doc: &mut Document, index: usize) {
        let Some(tab) = self.tabs.get(index) else {
            return;
        };

        for t in &self.tabs {
            doc.set_display(t.panel, Display::Hidden);
            match self.style {
                HighlightStyle::Class => doc.remove_class(t.trigger, ACTIVE_CLASS),
                HighlightStyle::Color => doc.set_background(t.trigger, None),
            }
        }

        doc.set_display(tab.panel, Display::Block);
        match self.style {
            HighlightStyle::Class => doc.add_class(tab.trigger, ACTIVE_CLASS),
            HighlightStyle::Color => {
                doc.set_background(tab.trigger, Some(&tab.color));
                for t in &self.tabs {
                    doc.set_background(t.panel, Some(&tab.color));
                }
            }
        }

        tracing::debug!(tab = %tab.name, "activated tab");
        self.active = Some(index);
    }

    /// Step to the neighbouring tab, wrapping at either end.
    pub fn cycle(&mut self, doc: &mut Document, delta: i64) {
        let n = self.tabs.len() as i64;
        if n == 0 {
            return;
        }
        let current = self.active.unwrap_or(0) as i64;
        let next = (current + delta.rem_euclid(n)).rem_euclid(n) as usize;
        self.activate_index(doc, next);
    }

    /// Whether `tab`'s trigger carries the active marker for this style.
    pub fn is_marked(&self, doc: &Document, tab: &Tab) -> bool {
        let el = doc.get(tab.trigger);
        match self.style {
            HighlightStyle::Class => el.has_class(ACTIVE_CLASS),
            HighlightStyle::Color => el.background.is_some(),
        }
    }
}
