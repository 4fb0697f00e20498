//! HTML page generation.
//!
//! Emits the markup the widget scripts expect: `tab_button` / `tab_content`
//! pairs, accordion sections, and numbered carousels with their dots.

use std::fmt::{self, Write};

use super::markup::{Page, TabData, TabFile, TabGroupData, TabKind};

/// Tab bar placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Accepts `h`, `horizontal`, `v`, `vertical`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "h" | "horizontal" => Some(Self::Horizontal),
            "v" | "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Page-level output switches.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub orientation: Orientation,
    pub title: Option<String>,
    /// Emit only the fragment, without `<html>`/`<head>`/`<body>`.
    pub embed: bool,
    /// Use the full-page tab stylesheet and colour-highlight script.
    pub fullpage: bool,
    /// Inline the widget scripts instead of linking them.
    pub inline_scripts: bool,
}

const TABS_JS: &str = include_str!("../../assets/tabs.js");
const FULL_TABS_JS: &str = include_str!("../../assets/full_tabs.js");
const ACCORDION_JS: &str = include_str!("../../assets/accordion.js");
const IMAGES_JS: &str = include_str!("../../assets/images.js");

impl PageOptions {
    fn stylesheet(&self, kind: TabKind) -> Option<&'static str> {
        match kind {
            TabKind::Tab => match (self.fullpage, self.orientation) {
                (true, Orientation::Horizontal) => Some("full_htabs.css"),
                // No full-page vertical stylesheet exists.
                (true, Orientation::Vertical) => None,
                (false, Orientation::Horizontal) => Some("htabs.css"),
                (false, Orientation::Vertical) => Some("vtabs.css"),
            },
            TabKind::Accordion => Some("accordion.css"),
            TabKind::Image => Some("images.css"),
        }
    }

    /// Script file name and bundled source for a widget kind.
    fn script(&self, kind: TabKind) -> (&'static str, &'static str) {
        match kind {
            TabKind::Tab if self.fullpage => ("full_tabs.js", FULL_TABS_JS),
            TabKind::Tab => ("tabs.js", TABS_JS),
            TabKind::Accordion => ("accordion.js", ACCORDION_JS),
            TabKind::Image => ("images.js", IMAGES_JS),
        }
    }
}

/// Render the whole page to a string.
pub fn render_html(page: &Page, opts: &PageOptions) -> String {
    let mut out = String::new();
    // Formatting into a `String` cannot fail.
    let _ = write_page(&mut out, page, opts);
    out
}

fn write_page(out: &mut String, page: &Page, opts: &PageOptions) -> fmt::Result {
    let kinds = page.kinds();
    let title = opts.title.as_deref().filter(|t| !t.is_empty());

    if !opts.embed {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>")?;
        writeln!(out, "<head>")?;
        if let Some(title) = title {
            writeln!(out, "<title>{title}</title>")?;
        }
    }

    if !kinds.is_empty() {
        writeln!(out)?;
        for &kind in &kinds {
            if let Some(css) = opts.stylesheet(kind) {
                writeln!(out, r#"<link href="{css}" rel="stylesheet" type="text/css"/>"#)?;
            }
        }
        writeln!(out)?;
    }

    if !opts.embed {
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        if let Some(title) = title {
            writeln!(out, "<h1>{title}</h1>")?;
        }
    }

    let mut carousel_no = 0;
    for file in &page.files {
        write_file(out, file, &mut carousel_no)?;
    }

    if !kinds.is_empty() {
        writeln!(out)?;
        for &kind in &kinds {
            let (name, source) = opts.script(kind);
            if opts.inline_scripts {
                writeln!(out, "<script type=\"text/javascript\">")?;
                out.push_str(source);
                if !source.ends_with('\n') {
                    writeln!(out)?;
                }
                writeln!(out, "</script>")?;
            } else {
                writeln!(out, r#"<script src="{name}" type="text/javascript"></script>"#)?;
            }
        }
        writeln!(out)?;
    }

    if !opts.embed {
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
    }

    Ok(())
}

fn write_file(out: &mut String, file: &TabFile, carousel_no: &mut usize) -> fmt::Result {
    for line in &file.start_lines {
        writeln!(out, "{line}")?;
    }

    if let Some(title) = file.title.as_deref() {
        writeln!(out, "<h2>{title}</h2>")?;
    }

    for group in &file.groups {
        match group.kind() {
            None => {}
            Some(TabKind::Tab) => write_tab_group(out, group)?,
            Some(TabKind::Accordion) => write_accordion(out, group)?,
            Some(TabKind::Image) => {
                *carousel_no += 1;
                write_carousel(out, group, *carousel_no)?;
            }
        }
    }

    for line in &file.end_lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn of_kind(group: &TabGroupData, kind: TabKind) -> impl Iterator<Item = &TabData> {
    group.tabs.iter().filter(move |t| t.kind == kind)
}

fn write_tab_group(out: &mut String, group: &TabGroupData) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, r#"<div class="tab_group">"#)?;
    writeln!(out, "<!-- Tab buttons -->")?;
    writeln!(out, r#"<div class="tab_buttons">"#)?;

    for (i, tab) in of_kind(group, TabKind::Tab).enumerate() {
        let handler = if tab.mouse_over { "onmouseover" } else { "onclick" };
        write!(
            out,
            r#"  <button class="tab_button" {handler}="openTab(event, '{name}', this, '{color}')""#,
            name = tab.name,
            color = tab.color,
        )?;
        if i == 0 {
            write!(out, r#" id="defaultOpen""#)?;
        }
        writeln!(out, ">{}</button>", tab.name)?;
    }
    writeln!(out, "</div>")?;

    writeln!(out)?;
    writeln!(out, "<!-- Tab content -->")?;
    for tab in of_kind(group, TabKind::Tab) {
        writeln!(out, r#"<div id="{}" class="tab_content">"#, tab.name)?;
        for line in &tab.lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</div>")?;
    writeln!(out)
}

fn write_accordion(out: &mut String, group: &TabGroupData) -> fmt::Result {
    writeln!(out, "<!-- Tab buttons and content -->")?;
    writeln!(out, r#"<div class="accordion">"#)?;

    for (i, tab) in of_kind(group, TabKind::Accordion).enumerate() {
        write!(out, r#"<button class="accordion_button""#)?;
        if i == 0 {
            write!(out, r#" id="defaultOpen""#)?;
        }
        writeln!(out, ">{}</button>", tab.name)?;

        writeln!(out, r#"<div class="accordion_panel">"#)?;
        for line in &tab.lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</div>")
}

fn write_carousel(out: &mut String, group: &TabGroupData, number: usize) -> fmt::Result {
    let total = group.tabs.len();

    writeln!(out)?;
    writeln!(out, "<!-- Image container -->")?;
    writeln!(out, r#"<div class="image_container">"#)?;
    writeln!(out)?;
    writeln!(out, "<!-- Full-width images with number and caption text -->")?;

    for (i, tab) in group.tabs.iter().enumerate() {
        writeln!(out, r#"<div class="image_slides_{number} image_slides image_fade">"#)?;
        writeln!(out, r#"  <div class="image_number">{} / {total}</div>"#, i + 1)?;
        writeln!(out, r#"  <img src="{}" style="width:100%">"#, tab.name)?;
        writeln!(out, r#"  <div class="image_text">{}</div>"#, tab.desc)?;
        writeln!(out, "</div>")?;
        writeln!(out)?;
    }

    writeln!(out, "<!-- Next and previous buttons -->")?;
    writeln!(out, r#"<a class="image_prev" onclick="plusSlides({number}, -1)">&#10094;</a>"#)?;
    writeln!(out, r#"<a class="image_next" onclick="plusSlides({number}, 1)">&#10095;</a>"#)?;
    writeln!(out, "</div>")?;
    writeln!(out, "<br>")?;
    writeln!(out)?;
    writeln!(out, "<!-- The dots/circles -->")?;
    writeln!(out, r#"<div class="image_dots" style="text-align:center">"#)?;
    for i in 1..=total {
        writeln!(
            out,
            r#"  <span class="image_dot_{number} image_dot" onclick="currentSlide({number}, {i})"></span>"#
        )?;
    }
    writeln!(out, "</div>")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn page(src: &str) -> Page {
        let mut page = Page::default();
        page.add_source(Path::new("p.html"), src).unwrap();
        page
    }

    #[test]
    fn full_document_wraps_fragment() {
        let html = render_html(
            &page("<!-- CTAB_TAB: name=intro -->\n<p>hi</p>\n"),
            &PageOptions {
                title: Some("Demo".into()),
                ..PageOptions::default()
            },
        );
        assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>\n<title>Demo</title>\n"));
        assert!(html.contains(r#"<link href="htabs.css" rel="stylesheet" type="text/css"/>"#));
        assert!(html.contains("<h1>Demo</h1>"));
        assert!(html.contains(r#"<script src="tabs.js" type="text/javascript"></script>"#));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn embed_emits_only_the_fragment() {
        let html = render_html(
            &page("<!-- CTAB_TAB: name=a -->\n"),
            &PageOptions {
                embed: true,
                title: Some("ignored".into()),
                ..PageOptions::default()
            },
        );
        assert!(!html.contains("<html>"));
        assert!(!html.contains("<title>"));
        assert!(html.contains(r#"class="tab_content""#));
    }

    #[test]
    fn tab_buttons_wire_open_tab() {
        let html = render_html(
            &page("<!-- CTAB_TAB: name=intro color=red -->\n<p>x</p>\n<!-- CTAB_TAB: name=more mouseOver=yes -->\n"),
            &PageOptions::default(),
        );
        assert!(html.contains(
            r#"<button class="tab_button" onclick="openTab(event, 'intro', this, 'red')" id="defaultOpen">intro</button>"#
        ));
        assert!(html.contains(
            r#"<button class="tab_button" onmouseover="openTab(event, 'more', this, 'white')">more</button>"#
        ));
        assert!(html.contains("<div id=\"intro\" class=\"tab_content\">\n<p>x</p>\n</div>\n"));
    }

    #[test]
    fn carousels_are_numbered_and_prev_steps_back() {
        let html = render_html(
            &page(
                "<!-- CTAB_IMAGE: image=a.png desc=A -->\n<!-- CTAB_IMAGE: image=b.png -->\n\
                 <!-- CTAB_GROUP -->\n<!-- CTAB_IMAGE: image=c.png -->\n",
            ),
            &PageOptions::default(),
        );
        assert!(html.contains(r#"<div class="image_number">2 / 2</div>"#));
        assert!(html.contains(r#"<div class="image_text">b.png</div>"#));
        assert!(html.contains(r#"onclick="plusSlides(1, -1)""#));
        assert!(html.contains(r#"onclick="plusSlides(1, 1)""#));
        assert!(html.contains(r#"onclick="currentSlide(2, 1)""#));
        assert!(html.contains(r#"class="image_slides_2 image_slides image_fade""#));
        assert!(html.contains(r#"<link href="images.css""#));
    }

    #[test]
    fn stylesheets_follow_orientation_and_fullpage() {
        let p = page("<!-- CTAB_TAB -->\n<!-- CTAB_GROUP -->\n<!-- CTAB_ACCORDION -->\n");
        let vertical = render_html(
            &p,
            &PageOptions {
                orientation: Orientation::Vertical,
                ..PageOptions::default()
            },
        );
        assert!(vertical.contains("vtabs.css"));
        assert!(vertical.contains("accordion.css"));
        assert!(vertical.contains(r#"<script src="accordion.js""#));

        let full = render_html(
            &p,
            &PageOptions {
                fullpage: true,
                ..PageOptions::default()
            },
        );
        assert!(full.contains("full_htabs.css"));
        assert!(full.contains(r#"<script src="full_tabs.js""#));
    }

    #[test]
    fn inline_scripts_embed_the_bundled_sources() {
        let html = render_html(
            &page("<!-- CTAB_IMAGE: image=a.png -->\n"),
            &PageOptions {
                inline_scripts: true,
                ..PageOptions::default()
            },
        );
        assert!(!html.contains("<script src="));
        assert!(html.contains("function plusSlides("));
    }

    #[test]
    fn repeated_panel_ids_stay_inside_their_group() {
        let src = "<!-- CTAB_TAB -->\n<p>one</p>\n<!-- CTAB_GROUP -->\n<!-- CTAB_TAB -->\n<p>two</p>\n";
        for fullpage in [false, true] {
            let html = render_html(
                &page(src),
                &PageOptions {
                    fullpage,
                    inline_scripts: true,
                    ..PageOptions::default()
                },
            );
            // Default names restart per group.
            assert_eq!(html.matches(r#"<div id="Tab1" class="tab_content">"#).count(), 2);
            assert_eq!(html.matches(r#"<div class="tab_group">"#).count(), 2);
            assert!(html.contains("openTab(event, 'Tab1', this,"));

            // The switcher must resolve the panel among the group's own panels.
            assert!(!html.contains("getElementById"));
            assert!(html.contains(r#"group.getElementsByClassName("tab_content")"#));
            assert!(html.contains("panels[i].id === tabName"));
        }
    }

    #[test]
    fn orientation_names() {
        assert_eq!(Orientation::parse("v"), Some(Orientation::Vertical));
        assert_eq!(Orientation::parse("horizontal"), Some(Orientation::Horizontal));
        assert_eq!(Orientation::parse("diagonal"), None);
    }
}
