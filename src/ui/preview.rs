//! Draws the preview: widget list, the focused widget, and the status bar.
//!
//! Every clickable element drawn here is recorded as a [`HitZone`] so the
//! mouse handler can map clicks back to widget commands.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::state::{AppState, HitTarget, HitZone};
use crate::core::document::{Document, ElementId};
use crate::core::tabs::HighlightStyle;
use crate::core::widgets::{WidgetCommand, WidgetRef};

use super::halfblocks;
use super::layout::AppLayout;
use super::theme::Theme;

/// Render one frame and refresh `state.hit_zones`.
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());
    let mut zones = Vec::new();
    let buf = frame.buffer_mut();

    render_list(state, layout.list_area, buf, &mut zones);

    match state.focused() {
        Some(WidgetRef::Tabs(group)) => render_tabs(state, group, layout.detail_area, buf, &mut zones),
        Some(WidgetRef::Carousel(n)) => render_carousel(state, n, layout.detail_area, buf, &mut zones),
        Some(WidgetRef::Accordion(a)) => {
            render_accordion(state, a, layout.detail_area, buf, &mut zones)
        }
        None => Paragraph::new("No tabs, accordions or carousels on this page.")
            .style(Theme::muted_style())
            .block(detail_block(" Preview "))
            .render(layout.detail_area, buf),
    }

    let (text, style) = match &state.status_message {
        Some(msg) => (msg.clone(), Theme::error_style()),
        None => (state.config.status_bar_hint(), Theme::status_bar_style()),
    };
    Paragraph::new(text).style(style).render(layout.status_area, buf);

    state.hit_zones = zones;
}

fn detail_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style())
}

// ───────────────────────────────────────── widget list ───────

fn render_list(state: &AppState, area: Rect, buf: &mut Buffer, zones: &mut Vec<HitZone>) {
    let block = detail_block(" Widgets ");
    let inner = block.inner(area);
    block.render(area, buf);

    for (i, widget) in state.widgets.order.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.bottom() {
            break;
        }
        let label = match *widget {
            WidgetRef::Tabs(g) => {
                format!("Tabs #{} ({})", g + 1, state.widgets.tab_groups[g].tabs.len())
            }
            WidgetRef::Accordion(a) => format!(
                "Accordion #{} ({})",
                a + 1,
                state.widgets.accordions[a].sections.len()
            ),
            WidgetRef::Carousel(n) => {
                let slides = state
                    .widgets
                    .carousels
                    .carousels
                    .get(n - 1)
                    .map_or(0, |c| c.len());
                format!("Carousel #{n} ({slides})")
            }
        };
        let style = if i == state.focus {
            Theme::focused_style()
        } else {
            Theme::list_item_style()
        };
        let row = Rect::new(inner.x, y, inner.width, 1);
        Paragraph::new(format!(" {label}")).style(style).render(row, buf);
        zones.push(HitZone {
            rect: row,
            target: HitTarget::Focus(i),
        });
    }
}

// ───────────────────────────────────────── tabs ──────────────

fn render_tabs(state: &AppState, g: usize, area: Rect, buf: &mut Buffer, zones: &mut Vec<HitZone>) {
    let group = &state.widgets.tab_groups[g];
    let block = detail_block(" Tabs ");
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height < 2 {
        return;
    }

    let mut x = inner.x;
    for tab in &group.tabs {
        let style = if group.is_marked(&state.doc, tab) {
            match group.style {
                HighlightStyle::Class => Theme::active_tab_style(),
                HighlightStyle::Color => match tab.color.parse::<Color>() {
                    Ok(color) => Style::default().fg(Color::Black).bg(color),
                    Err(_) => Theme::active_tab_style(),
                },
            }
        } else {
            Theme::tab_style()
        };
        let span = Span::styled(format!(" {} ", tab.name), style);
        let width = (span.width() as u16).min(inner.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        buf.set_span(x, inner.y, &span, width);
        zones.push(HitZone {
            rect: Rect::new(x, inner.y, width, 1),
            target: HitTarget::Command(WidgetCommand::Activate {
                group: g,
                panel: tab.name.clone(),
            }),
        });
        x += width + 1;
    }

    let body = Rect::new(inner.x, inner.y + 2, inner.width, inner.height.saturating_sub(2));
    let text = group
        .tabs
        .iter()
        .find(|t| state.doc.get(t.panel).is_visible())
        .map(|t| plain_text(&state.doc.get(t.panel).text))
        .unwrap_or_default();
    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .render(body, buf);
}

// ───────────────────────────────────────── carousel ──────────

/// What the visible slide shows.
struct SlideView {
    counter: String,
    src: String,
    caption: String,
}

fn slide_view(doc: &Document, slide: ElementId) -> SlideView {
    let mut view = SlideView {
        counter: String::new(),
        src: String::new(),
        caption: String::new(),
    };
    for &child in &doc.get(slide).children {
        let el = doc.get(child);
        if el.has_class("image_number") {
            view.counter = el.text.clone();
        } else if el.has_class("image_text") {
            view.caption = el.text.clone();
        } else if el.tag == "img" {
            view.src = el.text.clone();
        }
    }
    view
}

fn render_carousel(
    state: &mut AppState,
    n: usize,
    area: Rect,
    buf: &mut Buffer,
    zones: &mut Vec<HitZone>,
) {
    let Ok(carousel) = state.widgets.carousels.get(n) else {
        Paragraph::new("This carousel has no slides.")
            .style(Theme::muted_style())
            .block(detail_block(" Carousel "))
            .render(area, buf);
        return;
    };

    let view = slide_view(&state.doc, carousel.slides[carousel.current - 1]);
    let dots: Vec<bool> = carousel
        .dots
        .iter()
        .map(|&d| state.doc.get(d).has_class(crate::core::carousel::DOT_ACTIVE_CLASS))
        .collect();

    let block = detail_block(" Carousel ").title(
        Line::from(format!(" {} ", view.counter)).alignment(Alignment::Right),
    );
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height < 3 || inner.width < 8 {
        return;
    }

    // Prev/next arrows on the vertical centre of the image row band.
    let image_area = Rect::new(
        inner.x + 3,
        inner.y,
        inner.width - 6,
        inner.height - 2,
    );
    let mid = image_area.y + image_area.height / 2;
    let prev = Rect::new(inner.x, mid, 2, 1);
    let next = Rect::new(inner.right() - 2, mid, 2, 1);
    buf.set_span(prev.x, prev.y, &Span::styled("◀ ", Theme::arrow_style()), 2);
    buf.set_span(next.x, next.y, &Span::styled(" ▶", Theme::arrow_style()), 2);
    zones.push(HitZone {
        rect: prev,
        target: HitTarget::Command(WidgetCommand::Step { carousel: n, delta: -1 }),
    });
    zones.push(HitZone {
        rect: next,
        target: HitTarget::Command(WidgetCommand::Step { carousel: n, delta: 1 }),
    });

    match state.images.get(&view.src) {
        Some(img) => halfblocks::render(&img, image_area, buf),
        None => Paragraph::new(format!("[{}]", view.src))
            .style(Theme::muted_style())
            .alignment(Alignment::Center)
            .render(Rect::new(image_area.x, mid, image_area.width, 1), buf),
    }

    let caption_row = Rect::new(inner.x, inner.bottom() - 2, inner.width, 1);
    Paragraph::new(Span::styled(view.caption, Theme::caption_style()))
        .alignment(Alignment::Center)
        .render(caption_row, buf);

    let dots_width = (dots.len() as u16 * 2).min(inner.width);
    let mut x = inner.x + (inner.width - dots_width) / 2;
    let y = inner.bottom() - 1;
    for (i, active) in dots.iter().enumerate() {
        if x + 2 > inner.right() {
            break;
        }
        let (symbol, style) = if *active {
            ("●", Theme::active_dot_style())
        } else {
            ("○", Theme::dot_style())
        };
        buf.set_span(x, y, &Span::styled(symbol, style), 1);
        zones.push(HitZone {
            rect: Rect::new(x, y, 2, 1),
            target: HitTarget::Command(WidgetCommand::Select {
                carousel: n,
                slide: i as i64 + 1,
            }),
        });
        x += 2;
    }
}

// ───────────────────────────────────────── accordion ─────────

fn render_accordion(state: &AppState, a: usize, area: Rect, buf: &mut Buffer, zones: &mut Vec<HitZone>) {
    let accordion = &state.widgets.accordions[a];
    let block = detail_block(" Accordion ");
    let inner = block.inner(area);
    block.render(area, buf);

    let mut y = inner.y;
    for (i, section) in accordion.sections.iter().enumerate() {
        if y >= inner.bottom() {
            break;
        }
        let open = accordion.is_open(&state.doc, i);
        let marker = if open { "▾" } else { "▸" };
        let style = if state.accordion_cursor[a] == i {
            Theme::focused_style()
        } else {
            Theme::list_item_style()
        };
        let row = Rect::new(inner.x, y, inner.width, 1);
        Paragraph::new(format!("{marker} {}", section.name))
            .style(style)
            .render(row, buf);
        zones.push(HitZone {
            rect: row,
            target: HitTarget::Command(WidgetCommand::Toggle {
                accordion: a,
                section: i,
            }),
        });
        y += 1;

        if open {
            for line in plain_text(&state.doc.get(section.panel).text).lines() {
                if y >= inner.bottom() {
                    break;
                }
                buf.set_stringn(inner.x + 2, y, line, inner.width.saturating_sub(2) as usize, Style::default());
                y += 1;
            }
        }
    }
}

// ───────────────────────────────────────── text ──────────────

/// Strip tags and decode the common entities so panel HTML reads as text.
/// Blank lines left behind by tag-only lines are dropped.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    decoded
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::config::AppConfig;
    use crate::core::markup::Page;

    #[test]
    fn plain_text_strips_markup() {
        assert_eq!(
            plain_text("<p>Fish &amp; chips</p>\n<br>\n  <b>hot</b> &lt;3"),
            "Fish & chips\n  hot <3"
        );
    }

    fn state(src: &str) -> AppState {
        let mut page = Page::default();
        page.add_source(Path::new("demo.html"), src).unwrap();
        AppState::new(
            crate::core::document::Document::from_page(&page),
            AppConfig::default(),
            PathBuf::from("/nonexistent"),
        )
    }

    fn screen(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        let buf = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn tabs_show_the_open_panel_and_record_zones() {
        let mut s = state(
            "<!-- CTAB_TAB: name=intro -->\n<p>Welcome aboard</p>\n<!-- CTAB_TAB: name=details -->\n<p>Fine print</p>\n",
        );
        let text = screen(&mut s);
        assert!(text.contains("Tabs #1 (2)"));
        assert!(text.contains("Welcome aboard"));
        assert!(!text.contains("Fine print"));

        let activates = s
            .hit_zones
            .iter()
            .filter(|z| matches!(z.target, HitTarget::Command(WidgetCommand::Activate { .. })))
            .count();
        assert_eq!(activates, 2);
    }

    #[test]
    fn carousel_shows_counter_caption_and_dots() {
        let mut s = state(
            "<!-- CTAB_IMAGE: image=a.png desc=\"Sunrise\" -->\n<!-- CTAB_IMAGE: image=b.png -->\n<!-- CTAB_IMAGE: image=c.png -->\n",
        );
        s.run(WidgetCommand::Step { carousel: 1, delta: 1 });
        let text = screen(&mut s);
        assert!(text.contains("2 / 3"));
        assert!(text.contains("[b.png]"));
        assert!(text.contains("○ ● ○"));

        let selects = s
            .hit_zones
            .iter()
            .filter(|z| matches!(z.target, HitTarget::Command(WidgetCommand::Select { .. })))
            .count();
        assert_eq!(selects, 3);
    }

    #[test]
    fn accordion_lists_sections() {
        let mut s = state(
            "<!-- CTAB_ACCORDION: name=First -->\n<p>Opened by default</p>\n<!-- CTAB_ACCORDION: name=Second -->\n<p>Hidden</p>\n",
        );
        let text = screen(&mut s);
        assert!(text.contains("▾ First"));
        assert!(text.contains("▸ Second"));
        assert!(text.contains("Opened by default"));
        assert!(!text.contains("Hidden"));
    }
}
