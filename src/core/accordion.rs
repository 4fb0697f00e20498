//! Accordion — stacked sections that open and close independently.

use super::document::{Display, Document, ElementId};
use super::widgets::WidgetError;

pub const ACTIVE_CLASS: &str = "accordion_active";

#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub trigger: ElementId,
    pub panel: ElementId,
}

#[derive(Debug, Clone)]
pub struct Accordion {
    pub sections: Vec<Section>,
}

impl Accordion {
    /// Pair every `accordion_button` with the `accordion_panel` that follows it.
    pub fn resolve(doc: &Document, container: ElementId) -> Self {
        let buttons = doc.children_by_class(container, "accordion_button");
        let panels = doc.children_by_class(container, "accordion_panel");
        let sections = buttons
            .into_iter()
            .zip(panels)
            .map(|(trigger, panel)| Section {
                name: doc.get(trigger).text.clone(),
                trigger,
                panel,
            })
            .collect();
        Self { sections }
    }

    /// Open the first section, as the page's `defaultOpen` click does.
    pub fn open_default(&self, doc: &mut Document) {
        if !self.sections.is_empty() {
            // Section 0 exists, so this cannot fail.
            let _ = self.toggle(doc, 0);
        }
    }

    /// Flip section `index` open/closed.  Returns whether it is now open.
    pub fn toggle(&self, doc: &mut Document, index: usize) -> Result<bool, WidgetError> {
        let section = self
            .sections
            .get(index)
            .ok_or(WidgetError::UnknownSection(index))?;
        let open = doc.toggle_class(section.trigger, ACTIVE_CLASS);
        let display = if open { Display::Block } else { Display::Hidden };
        doc.set_display(section.panel, display);
        tracing::debug!(section = %section.name, open, "toggled accordion section");
        Ok(open)
    }

    pub fn is_open(&self, doc: &Document, index: usize) -> bool {
        self.sections
            .get(index)
            .is_some_and(|s| doc.get(s.panel).is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accordion(doc: &mut Document, names: &[&str]) -> ElementId {
        let container = doc.append(0, "div", &["accordion"]);
        for name in names {
            let b = doc.append(container, "button", &["accordion_button"]);
            doc.get_mut(b).text = name.to_string();
            let p = doc.append(container, "div", &["accordion_panel"]);
            doc.get_mut(p).display = Display::Hidden;
        }
        container
    }

    #[test]
    fn sections_toggle_independently() {
        let mut doc = Document::new();
        let c = accordion(&mut doc, &["one", "two", "three"]);
        let acc = Accordion::resolve(&doc, c);
        acc.open_default(&mut doc);
        assert!(acc.is_open(&doc, 0));
        assert!(!acc.is_open(&doc, 1));

        assert!(acc.toggle(&mut doc, 2).unwrap());
        assert!(acc.is_open(&doc, 0) && acc.is_open(&doc, 2));
        assert!(!acc.toggle(&mut doc, 0).unwrap());
        assert!(!acc.is_open(&doc, 0));
        assert!(doc.get(acc.sections[2].trigger).has_class(ACTIVE_CLASS));
    }

    #[test]
    fn unknown_section_is_an_error() {
        let mut doc = Document::new();
        let c = accordion(&mut doc, &["one"]);
        let acc = Accordion::resolve(&doc, c);
        assert!(matches!(acc.toggle(&mut doc, 5), Err(WidgetError::UnknownSection(5))));
    }
}
