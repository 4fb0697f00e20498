//! In-memory element tree standing in for the browser document.
//!
//! Elements live in a flat arena and reference each other by [`ElementId`],
//! the same way the generated page nests its `div`s, buttons and dots.
//! Widgets only ever touch the three attributes the page scripts touch:
//! display, class list and inline background colour.

use super::markup::{Page, TabData, TabGroupData, TabKind};

// ───────────────────────────────────────── element ───────────

/// Index into [`Document::elements`].
pub type ElementId = usize;

/// The `style.display` value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// No inline style set; the stylesheet decides.
    #[default]
    Inherit,
    Block,
    Hidden,
}

/// A single node of the document.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub display: Display,
    pub background: Option<String>,
    /// Colour argument wired into a trigger's click handler.
    pub color: Option<String>,
    /// Text content (button label, panel body, caption, image source).
    pub text: String,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            display: Display::Inherit,
            background: None,
            color: None,
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Visible unless explicitly hidden.
    pub fn is_visible(&self) -> bool {
        self.display != Display::Hidden
    }
}

// ───────────────────────────────────────── document ──────────

/// Arena-backed element tree.  Element 0 is the `body`.
#[derive(Debug, Clone)]
pub struct Document {
    pub elements: Vec<Element>,
    pub body: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            body: 0,
        }
    }

    /// Append a new element under `parent` with the given classes.
    pub fn append(&mut self, parent: ElementId, tag: &'static str, classes: &[&str]) -> ElementId {
        let id = self.elements.len();
        let mut el = Element::new(tag);
        el.classes = classes.iter().map(|c| c.to_string()).collect();
        el.parent = Some(parent);
        self.elements.push(el);
        self.elements[parent].children.push(id);
        id
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id]
    }

    /// `getElementById` scoped to `root`: first descendant in document order
    /// with this id.  Generated pages repeat ids across groups.
    pub fn by_id(&self, root: ElementId, id: &str) -> Option<ElementId> {
        self.walk(root)
            .into_iter()
            .find(|&e| e != root && self.elements[e].id.as_deref() == Some(id))
    }

    /// `getElementsByClassName` over the whole document, in document order.
    pub fn by_class(&self, class: &str) -> Vec<ElementId> {
        self.children_by_class(self.body, class)
    }

    /// Descendants of `root` carrying `class`, in document order.
    pub fn children_by_class(&self, root: ElementId, class: &str) -> Vec<ElementId> {
        self.walk(root)
            .into_iter()
            .filter(|&e| e != root && self.elements[e].has_class(class))
            .collect()
    }

    /// Pre-order traversal starting at (and including) `root`.
    fn walk(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.elements[id].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    // ── mutation ──────────────────────────────────────────────

    pub fn set_display(&mut self, id: ElementId, display: Display) {
        self.elements[id].display = display;
    }

    /// Add `class` unless already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let el = &mut self.elements[id];
        if !el.has_class(class) {
            el.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.elements[id].classes.retain(|c| c != class);
    }

    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.elements[id].has_class(class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    /// Set (or with `None`, clear) the inline background colour.
    pub fn set_background(&mut self, id: ElementId, color: Option<&str>) {
        self.elements[id].background = color.map(str::to_string);
    }

    // ── construction from a parsed page ───────────────────────

    /// Build the element structure the generator emits for `page`.
    ///
    /// Panels and slides start hidden, matching the stylesheets; the widgets
    /// reveal the defaults when they are loaded.
    pub fn from_page(page: &Page) -> Self {
        let mut doc = Self::new();
        let mut carousel_count = 0usize;

        for file in &page.files {
            for group in &file.groups {
                let Some(first) = group.tabs.first() else {
                    continue;
                };
                match first.kind {
                    TabKind::Tab => doc.append_tab_group(group),
                    TabKind::Accordion => doc.append_accordion(group),
                    TabKind::Image => {
                        carousel_count += 1;
                        doc.append_carousel(group, carousel_count);
                    }
                }
            }
        }

        doc
    }

    fn append_tab_group(&mut self, group: &TabGroupData) {
        let body = self.body;
        let container = self.append(body, "div", &["tab_group"]);
        let bar = self.append(container, "div", &["tab_buttons"]);
        let tabs: Vec<&TabData> = group.tabs.iter().filter(|t| t.kind == TabKind::Tab).collect();

        for (i, tab) in tabs.iter().enumerate() {
            let button = self.append(bar, "button", &["tab_button"]);
            let el = self.get_mut(button);
            el.text = tab.name.clone();
            el.color = Some(tab.color.clone());
            if i == 0 {
                el.id = Some("defaultOpen".into());
            }
        }
        for tab in &tabs {
            let panel = self.append(container, "div", &["tab_content"]);
            let el = self.get_mut(panel);
            el.id = Some(tab.name.clone());
            el.text = tab.lines.join("\n");
            el.display = Display::Hidden;
        }
    }

    fn append_accordion(&mut self, group: &TabGroupData) {
        let body = self.body;
        let container = self.append(body, "div", &["accordion"]);
        let mut first = true;

        for tab in group.tabs.iter().filter(|t| t.kind == TabKind::Accordion) {
            let button = self.append(container, "button", &["accordion_button"]);
            let el = self.get_mut(button);
            el.text = tab.name.clone();
            if first {
                el.id = Some("defaultOpen".into());
                first = false;
            }
            let panel = self.append(container, "div", &["accordion_panel"]);
            let el = self.get_mut(panel);
            el.text = tab.lines.join("\n");
            el.display = Display::Hidden;
        }
    }

    fn append_carousel(&mut self, group: &TabGroupData, number: usize) {
        let body = self.body;
        let container = self.append(body, "div", &["image_container"]);
        let slides_class = format!("image_slides_{number}");
        let dot_class = format!("image_dot_{number}");
        let total = group.tabs.len();

        for (i, tab) in group.tabs.iter().enumerate() {
            let slide = self.append(container, "div", &[slides_class.as_str(), "image_slides", "image_fade"]);
            self.get_mut(slide).display = Display::Hidden;

            let counter = self.append(slide, "div", &["image_number"]);
            self.get_mut(counter).text = format!("{} / {}", i + 1, total);
            let img = self.append(slide, "img", &[]);
            self.get_mut(img).text = tab.name.clone();
            let caption = self.append(slide, "div", &["image_text"]);
            self.get_mut(caption).text = tab.desc.clone();
        }

        self.append(container, "a", &["image_prev"]);
        self.append(container, "a", &["image_next"]);

        let dots = self.append(body, "div", &["image_dots"]);
        for _ in 0..total {
            self.append(dots, "span", &[dot_class.as_str(), "image_dot"]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_queries_follow_document_order() {
        let mut doc = Document::new();
        let a = doc.append(0, "div", &["x"]);
        let b = doc.append(a, "div", &["x", "y"]);
        let c = doc.append(0, "div", &["x"]);
        assert_eq!(doc.by_class("x"), vec![a, b, c]);
        assert_eq!(doc.children_by_class(a, "x"), vec![b]);
        assert_eq!(doc.by_class("y"), vec![b]);
    }

    #[test]
    fn class_add_remove_is_set_like() {
        let mut doc = Document::new();
        let a = doc.append(0, "button", &["tab_button"]);
        doc.add_class(a, "tab_active");
        doc.add_class(a, "tab_active");
        assert_eq!(doc.get(a).classes, vec!["tab_button", "tab_active"]);
        doc.remove_class(a, "tab_active");
        assert!(!doc.get(a).has_class("tab_active"));
        assert!(doc.toggle_class(a, "open"));
        assert!(!doc.toggle_class(a, "open"));
    }

    #[test]
    fn by_id_is_scoped_to_its_root() {
        let mut doc = Document::new();
        let first = doc.append(0, "div", &["tab_group"]);
        let second = doc.append(0, "div", &["tab_group"]);
        let a = doc.append(first, "div", &[]);
        let b = doc.append(second, "div", &[]);
        doc.get_mut(a).id = Some("Tab1".into());
        doc.get_mut(b).id = Some("Tab1".into());

        assert_eq!(doc.by_id(doc.body, "Tab1"), Some(a));
        assert_eq!(doc.by_id(second, "Tab1"), Some(b));
        assert_eq!(doc.by_id(second, "missing"), None);
    }
}
