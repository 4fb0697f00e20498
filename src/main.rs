//! Tabbed HTML page generator.
//!
//! Reads annotated HTML fragments and writes a page with tab groups,
//! accordions and image carousels.  Run with `--preview` to drive the same
//! widgets in the terminal instead.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{
    event::{spawn_event_reader, PreviewEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::document::Document;
use crate::core::markup::Page;
use crate::core::page::{render_html, Orientation, PageOptions};
use crate::core::tabs::HighlightStyle;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Generate tabbed HTML pages from annotated fragments")]
struct Cli {
    /// Source files, concatenated in order.
    #[arg(required_unless_present = "write_config")]
    files: Vec<PathBuf>,

    /// Tab bar orientation: horizontal, vertical, h or v.
    #[arg(short, long, default_value = "horizontal", value_parser = parse_orientation)]
    orientation: Orientation,

    /// Page title (`<title>` and `<h1>`).
    #[arg(long)]
    title: Option<String>,

    /// Full-page tabs highlighted by colour.
    #[arg(long)]
    fullpage: bool,

    /// Emit only the fragment, without the html/head/body wrapper.
    #[arg(long)]
    embed: bool,

    /// Inline the widget scripts instead of linking them.
    #[arg(long)]
    inline_scripts: bool,

    /// Write the page here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Open the interactive terminal preview.
    #[arg(long, conflicts_with = "output")]
    preview: bool,

    /// Write the current configuration (defaults included) and exit.
    #[arg(long)]
    write_config: bool,
}

fn parse_orientation(s: &str) -> Result<Orientation, String> {
    Orientation::parse(s).ok_or_else(|| format!("unknown orientation '{s}'"))
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // stdout carries the page
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load();

    if cli.write_config {
        let path = config.save()?;
        eprintln!("wrote {}", path.display());
        return Ok(());
    }

    let mut page = Page::new(config.default_color.clone());
    for file in &cli.files {
        page.add_file(file)?;
    }
    tracing::info!(
        files = page.files.len(),
        groups = page.files.iter().map(|f| f.groups.len()).sum::<usize>(),
        kinds = ?page.kinds(),
        "parsed sources"
    );

    if cli.preview {
        if cli.fullpage {
            config.highlight = HighlightStyle::Color;
        }
        let image_dir = cli
            .files
            .first()
            .and_then(|f| f.parent())
            .map(PathBuf::from)
            .unwrap_or_default();
        return run_preview(Document::from_page(&page), config, image_dir).await;
    }

    let opts = PageOptions {
        orientation: cli.orientation,
        title: cli.title,
        embed: cli.embed,
        fullpage: cli.fullpage,
        inline_scripts: cli.inline_scripts,
    };
    let html = render_html(&page, &opts);

    match &cli.output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(html.as_bytes())
            .context("failed to write page to stdout")?,
    }
    Ok(())
}

// ───────────────────────────────────────── preview ──────────

async fn run_preview(doc: Document, config: AppConfig, image_dir: PathBuf) -> Result<()> {
    let tick = Duration::from_millis(config.tick_ms);
    let mut state = AppState::new(doc, config, image_dir);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(tick);

    // ── event loop ────────────────────────────────────────────
    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::preview::draw(frame, &mut state)) {
            break Err::<(), _>(e).context("failed to draw preview");
        }

        tokio::select! {
            event = events.recv() => match event {
                Some(PreviewEvent::Key(k)) => handler::handle_key(&mut state, k),
                Some(PreviewEvent::Mouse(m)) => handler::handle_mouse(&mut state, m),
                Some(PreviewEvent::Resize) | Some(PreviewEvent::Tick) => {}
                // Reader task gone; nothing more will arrive.
                None => break Ok(()),
            },
        }

        if state.should_quit {
            break Ok(());
        }
    };

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}
