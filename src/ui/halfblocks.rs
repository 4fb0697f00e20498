//! Image rendering with Unicode `▀` half-blocks (2 pixels per cell).

use image::imageops::FilterType;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

/// Fit `img` inside `area`, preserving aspect ratio, centred both ways.
///
/// Each cell is 1 pixel wide and 2 pixels tall: the upper pixel becomes the
/// foreground of `▀`, the lower one the background.
pub fn render(img: &image::RgbaImage, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 || img.width() == 0 || img.height() == 0 {
        return;
    }

    let max_px_w = area.width as f64;
    let max_px_h = (area.height as f64) * 2.0;
    let src_w = img.width() as f64;
    let src_h = img.height() as f64;

    let scale = (max_px_w / src_w).min(max_px_h / src_h).min(1.0);
    let fit_w = (src_w * scale).round().max(1.0) as u32;
    let fit_h = (src_h * scale).round().max(1.0) as u32;

    let rgba = image::imageops::resize(img, fit_w, fit_h, FilterType::Triangle);
    let (iw, ih) = (rgba.width(), rgba.height());

    let col_offset = area.width.saturating_sub(iw as u16) / 2;
    let row_offset = area.height.saturating_sub(ih.div_ceil(2) as u16) / 2;

    for row in 0..area.height - row_offset {
        let yt = (row as u32) * 2;
        if yt >= ih {
            break;
        }
        let yb = yt + 1;
        for col in 0..iw.min(area.width as u32) {
            let t = rgba.get_pixel(col, yt);
            let fg = Color::Rgb(t[0], t[1], t[2]);
            let bg = if yb < ih {
                let b = rgba.get_pixel(col, yb);
                Color::Rgb(b[0], b[1], b[2])
            } else {
                Color::Reset
            };
            let pos = Position::new(area.x + col_offset + col as u16, area.y + row_offset + row);
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}
