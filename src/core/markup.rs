//! Source markup parser — turns annotated HTML fragments into a [`Page`].
//!
//! A source file is plain HTML with directive comments on their own line:
//!
//! ```text
//! <!-- CTAB_HEAD: title="Release notes" -->
//! <!-- CTAB_TAB: name=intro color=#ccc -->
//! <p>Welcome.</p>
//! <!-- CTAB_IMAGE: image=one.png desc="First" -->
//! ```
//!
//! Directives open tabs, accordion sections and carousel slides; every other
//! line is content for whatever is currently open.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("'{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: can't have body contents after tail", path.display())]
    BodyAfterTail { path: PathBuf, line: usize },

    #[error("{}:{line}: invalid skip value '{value}'", path.display())]
    InvalidSkip {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{}:{line}: image slide without an image name", path.display())]
    MissingImage { path: PathBuf, line: usize },
}

// ───────────────────────────────────────── data ──────────────

/// What a directive opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TabKind {
    Tab,
    Accordion,
    Image,
}

/// One tab, accordion section or carousel slide.
#[derive(Debug, Clone)]
pub struct TabData {
    /// Global 1-based id across the page.
    pub id: usize,
    pub kind: TabKind,
    /// Tab label / panel id, or the image source for slides.
    pub name: String,
    /// Highlight colour passed to the tab switcher.
    pub color: String,
    /// Activate on hover instead of click.
    pub mouse_over: bool,
    /// Slide caption.
    pub desc: String,
    pub lines: Vec<String>,
}

/// Tabs that switch together.  The kind of the first tab decides how the
/// group is rendered.
#[derive(Debug, Clone, Default)]
pub struct TabGroupData {
    pub id: usize,
    pub tabs: Vec<TabData>,
    current: Option<usize>,
}

impl TabGroupData {
    pub fn kind(&self) -> Option<TabKind> {
        self.tabs.first().map(|t| t.kind)
    }
}

/// Which part of the source file plain lines belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DocPart {
    #[default]
    None,
    Head,
    BodyStart,
    BodyEnd,
    Tail,
}

/// Everything parsed out of one source file.
#[derive(Debug, Clone, Default)]
pub struct TabFile {
    pub path: PathBuf,
    pub title: Option<String>,
    /// Body lines emitted before the tab groups.
    pub start_lines: Vec<String>,
    /// Body lines emitted after the tab groups.
    pub end_lines: Vec<String>,
    pub groups: Vec<TabGroupData>,
    part: DocPart,
    skip: usize,
}

/// All parsed source files, with ids numbered across the whole page.
#[derive(Debug, Clone)]
pub struct Page {
    pub files: Vec<TabFile>,
    default_color: String,
    group_count: usize,
    tab_count: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self::new("white")
    }
}

// ───────────────────────────────────────── directives ────────

const TAGS: &[&str] = &[
    "CTAB_HEAD",
    "CTAB_TAIL",
    "CTAB_BODY",
    "CTAB_SKIP",
    "CTAB_GROUP",
    "CTAB_TAB",
    "CTAB_ACCORDION",
    "CTAB_IMAGE",
];

/// Match `<!-- TAG -->` or `<!-- TAG: args -->`, returning the tag and the
/// raw argument text.
fn parse_directive(line: &str) -> Option<(&'static str, &str)> {
    let inner = line.trim().strip_prefix("<!-- ")?.strip_suffix(" -->")?;
    for &tag in TAGS {
        if inner == tag {
            return Some((tag, ""));
        }
        if let Some(rest) = inner.strip_prefix(tag).and_then(|r| r.strip_prefix(':')) {
            return Some((tag, rest.trim()));
        }
    }
    None
}

/// Decode `name=value` pairs.  Values may be quoted with `"` or `'`.
pub fn decode_name_values(s: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let mut rest = s.trim_start();

    while !rest.is_empty() {
        let (name, after) = match rest.find('=') {
            Some(eq) => (&rest[..eq], &rest[eq + 1..]),
            None => (rest, ""),
        };
        let after = after.trim_start();

        let (value, remaining) = match after.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &after[1..];
                match body.find(q) {
                    Some(end) => (&body[..end], &body[end + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };

        out.insert(name.trim().to_string(), value.to_string());
        rest = remaining.trim_start();
    }

    out
}

fn flag(value: Option<&String>) -> bool {
    matches!(value.map(String::as_str), Some("1" | "true" | "yes"))
}

// ───────────────────────────────────────── parser ────────────

impl Page {
    /// Create an empty page; `default_color` is used for tabs that don't
    /// name a colour.
    pub fn new(default_color: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            default_color: default_color.into(),
            group_count: 0,
            tab_count: 0,
        }
    }

    /// Every tab kind used anywhere on the page, in a stable order.
    pub fn kinds(&self) -> BTreeSet<TabKind> {
        self.files
            .iter()
            .flat_map(|f| &f.groups)
            .flat_map(|g| &g.tabs)
            .map(|t| t.kind)
            .collect()
    }

    /// Read and parse a source file.
    pub fn add_file(&mut self, path: &Path) -> Result<(), MarkupError> {
        if !path.exists() {
            return Err(MarkupError::MissingFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| MarkupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_source(path, &text)
    }

    /// Parse already-loaded source text.  `path` is used for error messages
    /// and to resolve `file=` includes.
    pub fn add_source(&mut self, path: &Path, text: &str) -> Result<(), MarkupError> {
        let mut file = TabFile {
            path: path.to_path_buf(),
            ..TabFile::default()
        };
        self.push_group(&mut file);

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;

            if file.skip > 0 {
                file.skip -= 1;
                continue;
            }

            let Some((tag, args)) = parse_directive(line) else {
                push_line(&mut file, line);
                continue;
            };

            match tag {
                "CTAB_HEAD" => {
                    let nv = decode_name_values(args);
                    if let Some(title) = nv.get("title").filter(|t| !t.is_empty()) {
                        file.title = Some(title.clone());
                    }
                    file.part = DocPart::Head;
                    close_tab(&mut file);
                }
                "CTAB_TAIL" => {
                    file.part = DocPart::Tail;
                    close_tab(&mut file);
                }
                "CTAB_BODY" => {
                    file.part = match file.part {
                        DocPart::Head => DocPart::BodyStart,
                        DocPart::Tail => {
                            return Err(MarkupError::BodyAfterTail {
                                path: file.path,
                                line: line_no,
                            })
                        }
                        _ => DocPart::BodyEnd,
                    };
                    close_tab(&mut file);
                }
                "CTAB_SKIP" => {
                    file.skip = if args.is_empty() {
                        1
                    } else {
                        match args.parse::<i64>() {
                            Ok(n) if n > 0 => n as usize,
                            _ => {
                                return Err(MarkupError::InvalidSkip {
                                    path: file.path,
                                    line: line_no,
                                    value: args.to_string(),
                                })
                            }
                        }
                    };
                }
                "CTAB_GROUP" => self.push_group(&mut file),
                "CTAB_TAB" => self.open_tab(&mut file, TabKind::Tab, args)?,
                "CTAB_ACCORDION" => self.open_tab(&mut file, TabKind::Accordion, args)?,
                "CTAB_IMAGE" => {
                    let nv = decode_name_values(args);
                    let image = nv.get("image").cloned().unwrap_or_default();
                    if image.is_empty() {
                        return Err(MarkupError::MissingImage {
                            path: file.path,
                            line: line_no,
                        });
                    }
                    let desc = nv
                        .get("desc")
                        .filter(|d| !d.is_empty())
                        .cloned()
                        .unwrap_or_else(|| image.clone());
                    let tab = self.push_tab(&mut file, TabKind::Image, image);
                    tab.desc = desc;
                }
                _ => unreachable!("unknown directive {tag}"),
            }
        }

        tracing::debug!(
            path = %path.display(),
            groups = file.groups.len(),
            "parsed tab source"
        );
        self.files.push(file);
        Ok(())
    }

    fn open_tab(&mut self, file: &mut TabFile, kind: TabKind, args: &str) -> Result<(), MarkupError> {
        let nv = decode_name_values(args);

        let name = match nv.get("name").filter(|n| !n.is_empty()) {
            Some(n) => n.clone(),
            None => format!("Tab{}", current_group(file).tabs.len() + 1),
        };
        let color = nv
            .get("color")
            .filter(|c| !c.is_empty())
            .cloned()
            .unwrap_or_else(|| self.default_color.clone());

        let mut lines = Vec::new();
        if let Some(include) = nv.get("file").filter(|f| !f.is_empty()) {
            let include = resolve_include(&file.path, include);
            if !include.exists() {
                return Err(MarkupError::MissingFile(include));
            }
            let text = std::fs::read_to_string(&include).map_err(|source| MarkupError::Io {
                path: include.clone(),
                source,
            })?;
            lines.extend(text.lines().map(str::to_string));
        }

        let tab = self.push_tab(file, kind, name);
        tab.color = color;
        tab.mouse_over = flag(nv.get("mouseOver"));
        tab.lines = lines;
        Ok(())
    }

    fn push_group(&mut self, file: &mut TabFile) {
        self.group_count += 1;
        file.groups.push(TabGroupData {
            id: self.group_count,
            ..TabGroupData::default()
        });
    }

    fn push_tab<'f>(&mut self, file: &'f mut TabFile, kind: TabKind, name: String) -> &'f mut TabData {
        self.tab_count += 1;
        let tab = TabData {
            id: self.tab_count,
            kind,
            name,
            color: self.default_color.clone(),
            mouse_over: false,
            desc: String::new(),
            lines: Vec::new(),
        };
        let group = current_group(file);
        group.tabs.push(tab);
        group.current = Some(group.tabs.len() - 1);
        let last = group.tabs.len() - 1;
        &mut group.tabs[last]
    }
}

fn current_group(file: &mut TabFile) -> &mut TabGroupData {
    if file.groups.is_empty() {
        file.groups.push(TabGroupData::default());
    }
    let last = file.groups.len() - 1;
    &mut file.groups[last]
}

fn close_tab(file: &mut TabFile) {
    current_group(file).current = None;
}

fn push_line(file: &mut TabFile, line: &str) {
    let part = file.part;
    let group = current_group(file);
    if let Some(i) = group.current {
        group.tabs[i].lines.push(line.to_string());
        return;
    }
    match part {
        DocPart::BodyStart => file.start_lines.push(line.to_string()),
        DocPart::BodyEnd => file.end_lines.push(line.to_string()),
        _ => {}
    }
}

/// Includes are relative to the including file's directory.
fn resolve_include(source: &Path, include: &str) -> PathBuf {
    let include = Path::new(include);
    if include.is_absolute() {
        return include.to_path_buf();
    }
    match source.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(include),
        _ => include.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Page {
        let mut page = Page::default();
        page.add_source(Path::new("page.html"), text).unwrap();
        page
    }

    #[test]
    fn name_values_handle_quotes_and_bare_words() {
        let nv = decode_name_values(r#"name="Two words" color=red desc='a caption' mouseOver=yes"#);
        assert_eq!(nv["name"], "Two words");
        assert_eq!(nv["color"], "red");
        assert_eq!(nv["desc"], "a caption");
        assert_eq!(nv["mouseOver"], "yes");
    }

    #[test]
    fn directives_require_exact_comment_form() {
        assert_eq!(parse_directive("<!-- CTAB_TAB -->"), Some(("CTAB_TAB", "")));
        assert_eq!(
            parse_directive("<!-- CTAB_TAB: name=a -->"),
            Some(("CTAB_TAB", "name=a"))
        );
        assert_eq!(parse_directive("<!-- CTAB_TABS: name=a -->"), None);
        assert_eq!(parse_directive("<!--CTAB_TAB-->"), None);
        assert_eq!(parse_directive("<p>CTAB_TAB</p>"), None);
    }

    #[test]
    fn tabs_collect_their_lines() {
        let page = parse(
            "<!-- CTAB_TAB: name=intro color=#ccc -->\n<p>hi</p>\n<!-- CTAB_TAB -->\n<p>second</p>\n",
        );
        let group = &page.files[0].groups[0];
        assert_eq!(group.tabs.len(), 2);
        assert_eq!(group.tabs[0].name, "intro");
        assert_eq!(group.tabs[0].color, "#ccc");
        assert_eq!(group.tabs[0].lines, vec!["<p>hi</p>"]);
        assert_eq!(group.tabs[1].name, "Tab2");
        assert_eq!(group.tabs[1].color, "white");
    }

    #[test]
    fn body_sections_route_loose_lines() {
        let page = parse(
            "<!-- CTAB_HEAD: title=Notes -->\ndropped\n<!-- CTAB_BODY -->\nbefore\n\
             <!-- CTAB_TAB: name=a -->\ninside\n<!-- CTAB_BODY -->\nafter\n<!-- CTAB_TAIL -->\nignored\n",
        );
        let file = &page.files[0];
        assert_eq!(file.title.as_deref(), Some("Notes"));
        assert_eq!(file.start_lines, vec!["before"]);
        assert_eq!(file.end_lines, vec!["after"]);
        assert_eq!(file.groups[0].tabs[0].lines, vec!["inside"]);
    }

    #[test]
    fn body_after_tail_is_rejected() {
        let mut page = Page::default();
        let err = page
            .add_source(Path::new("x.html"), "<!-- CTAB_TAIL -->\n<!-- CTAB_BODY -->\n")
            .unwrap_err();
        assert!(matches!(err, MarkupError::BodyAfterTail { line: 2, .. }));
    }

    #[test]
    fn skip_drops_following_lines() {
        let page = parse("<!-- CTAB_TAB: name=a -->\n<!-- CTAB_SKIP: 2 -->\nx\ny\nz\n<!-- CTAB_SKIP -->\nw\n");
        assert_eq!(page.files[0].groups[0].tabs[0].lines, vec!["z"]);

        let mut page = Page::default();
        let err = page
            .add_source(Path::new("x.html"), "<!-- CTAB_SKIP: zero -->\n")
            .unwrap_err();
        assert!(matches!(err, MarkupError::InvalidSkip { .. }));
    }

    #[test]
    fn groups_and_ids_are_numbered_across_files() {
        let mut page = Page::default();
        page.add_source(
            Path::new("a.html"),
            "<!-- CTAB_IMAGE: image=1.png -->\n<!-- CTAB_GROUP -->\n<!-- CTAB_TAB -->\n",
        )
        .unwrap();
        page.add_source(Path::new("b.html"), "<!-- CTAB_ACCORDION: name=faq -->\n")
            .unwrap();

        let ids: Vec<usize> = page.files.iter().flat_map(|f| &f.groups).map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(page.files[1].groups[0].tabs[0].id, 3);
        assert_eq!(page.files[0].groups[0].tabs[0].desc, "1.png");
        assert_eq!(
            page.kinds().into_iter().collect::<Vec<_>>(),
            vec![TabKind::Tab, TabKind::Accordion, TabKind::Image]
        );
    }

    #[test]
    fn image_requires_a_name() {
        let mut page = Page::default();
        let err = page
            .add_source(Path::new("x.html"), "<!-- CTAB_IMAGE: desc=oops -->\n")
            .unwrap_err();
        assert!(matches!(err, MarkupError::MissingImage { line: 1, .. }));
    }

    #[test]
    fn file_includes_resolve_next_to_the_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("body.html"), "<p>included</p>\n").unwrap();
        let source = dir.path().join("page.html");
        std::fs::write(&source, "<!-- CTAB_TAB: name=a file=body.html mouseOver=1 -->\n").unwrap();

        let mut page = Page::default();
        page.add_file(&source).unwrap();
        let tab = &page.files[0].groups[0].tabs[0];
        assert_eq!(tab.lines, vec!["<p>included</p>"]);
        assert!(tab.mouse_over);

        let err = Page::default()
            .add_file(&dir.path().join("nope.html"))
            .unwrap_err();
        assert!(matches!(err, MarkupError::MissingFile(_)));
    }
}
