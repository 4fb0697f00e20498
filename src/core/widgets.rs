//! Page-level widget registry and the command interface that drives it.
//!
//! [`Widgets::load`] resolves every tab group, accordion and carousel in a
//! [`Document`] once and runs the page-load defaults.  Input bindings then
//! translate user actions into [`WidgetCommand`]s and hand them to
//! [`Widgets::apply`].

use thiserror::Error;

use super::accordion::Accordion;
use super::carousel::CarouselManager;
use super::document::Document;
use super::tabs::{HighlightStyle, TabGroup};

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("no tab panel named '{0}'")]
    UnknownPanel(String),

    #[error("no tab group #{0}")]
    UnknownTabGroup(usize),

    #[error("no accordion #{0}")]
    UnknownAccordion(usize),

    #[error("no accordion section #{0}")]
    UnknownSection(usize),

    #[error("no carousel #{0}")]
    UnknownCarousel(usize),

    #[error("carousel #{0} has no slides")]
    EmptyCarousel(usize),
}

/// A user-level action on one widget.  Group/accordion indices are 0-based
/// positions in [`Widgets`]; carousel numbers are the page's 1-based ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    /// Open the named panel of a tab group.
    Activate { group: usize, panel: String },
    /// Open the neighbouring tab, wrapping at either end.
    CycleTab { group: usize, delta: i64 },
    /// Previous/next slide.
    Step { carousel: usize, delta: i64 },
    /// Jump to a slide (1-based).
    Select { carousel: usize, slide: i64 },
    /// Open or close an accordion section.
    Toggle { accordion: usize, section: usize },
}

/// A widget in document order, for focus handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetRef {
    Tabs(usize),
    Accordion(usize),
    Carousel(usize),
}

/// Every interactive widget on a page.
#[derive(Debug, Clone, Default)]
pub struct Widgets {
    pub tab_groups: Vec<TabGroup>,
    pub accordions: Vec<Accordion>,
    pub carousels: CarouselManager,
    /// All widgets in the order they appear in the document.
    pub order: Vec<WidgetRef>,
}

impl Widgets {
    /// Resolve all widgets in `doc` and apply the page-load defaults: each
    /// tab group opens its default tab, each accordion its first section, and
    /// every carousel shows slide 1.
    pub fn load(doc: &mut Document, style: HighlightStyle) -> Self {
        let mut widgets = Self {
            carousels: CarouselManager::resolve(doc),
            ..Self::default()
        };

        for &top in &doc.get(doc.body).children {
            let el = doc.get(top);
            if el.has_class("tab_group") {
                widgets.order.push(WidgetRef::Tabs(widgets.tab_groups.len()));
                widgets.tab_groups.push(TabGroup::resolve(doc, top, style));
            } else if el.has_class("accordion") {
                widgets.order.push(WidgetRef::Accordion(widgets.accordions.len()));
                widgets.accordions.push(Accordion::resolve(doc, top));
            } else if let Some(c) = widgets
                .carousels
                .carousels
                .iter()
                .find(|c| c.container == top)
            {
                widgets.order.push(WidgetRef::Carousel(c.number));
            }
        }

        for group in &mut widgets.tab_groups {
            group.open_default(doc);
        }
        for accordion in &widgets.accordions {
            accordion.open_default(doc);
        }
        widgets.carousels.initialize(doc);

        tracing::info!(
            tab_groups = widgets.tab_groups.len(),
            accordions = widgets.accordions.len(),
            carousels = widgets.carousels.carousels.len(),
            "widgets loaded"
        );
        widgets
    }

    /// Run one command against the document.
    pub fn apply(&mut self, doc: &mut Document, command: &WidgetCommand) -> Result<(), WidgetError> {
        tracing::debug!(?command, "apply");
        match command {
            WidgetCommand::Activate { group, panel } => {
                self.tab_group_mut(*group)?.activate(doc, panel)
            }
            WidgetCommand::CycleTab { group, delta } => {
                self.tab_group_mut(*group)?.cycle(doc, *delta);
                Ok(())
            }
            WidgetCommand::Step { carousel, delta } => {
                self.carousels.step(doc, *carousel, *delta).map(|_| ())
            }
            WidgetCommand::Select { carousel, slide } => {
                self.carousels.select(doc, *carousel, *slide).map(|_| ())
            }
            WidgetCommand::Toggle { accordion, section } => self
                .accordions
                .get(*accordion)
                .ok_or(WidgetError::UnknownAccordion(*accordion))?
                .toggle(doc, *section)
                .map(|_| ()),
        }
    }

    fn tab_group_mut(&mut self, group: usize) -> Result<&mut TabGroup, WidgetError> {
        self.tab_groups
            .get_mut(group)
            .ok_or(WidgetError::UnknownTabGroup(group))
    }
}
