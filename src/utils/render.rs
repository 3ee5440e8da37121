//! PNG rendering of filled crosswords

use crate::crossword::Crossword;
use crate::generate::Solution;
use ab_glyph::{FontRef, PxScale};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

/// Side of one grid cell in pixels
pub const CELL_SIZE: u32 = 100;
const CELL_BORDER: u32 = 2;
const INTERIOR_SIZE: u32 = CELL_SIZE - 2 * CELL_BORDER;
const FONT_SIZE: f32 = 80.0;

const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OPEN_CELL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LETTER: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Draw the grid on a black canvas: open cells are white squares inset by
/// the border, letters are centered in their cell.
pub fn render_png(crossword: &Crossword, solution: &Solution) -> Result<RgbaImage> {
    let font = FontRef::try_from_slice(FONT_BYTES).context("Failed to load embedded font")?;
    let scale = PxScale::from(FONT_SIZE);
    let letters = solution.letter_grid();

    let width = crossword.width() as u32 * CELL_SIZE;
    let height = crossword.height() as u32 * CELL_SIZE;
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);

    for row in 0..crossword.height() {
        for col in 0..crossword.width() {
            if !crossword.is_open(row, col) {
                continue;
            }

            let x = (col as u32 * CELL_SIZE + CELL_BORDER) as i32;
            let y = (row as u32 * CELL_SIZE + CELL_BORDER) as i32;
            draw_filled_rect_mut(&mut canvas, Rect::at(x, y).of_size(INTERIOR_SIZE, INTERIOR_SIZE), OPEN_CELL);

            let Some(letter) = letters.get(row).and_then(|r| r.get(col).copied()).flatten() else {
                continue;
            };
            let text = letter.to_string();
            let (w, h) = text_size(scale, &font, &text);
            let offset_x = (INTERIOR_SIZE as i32 - w as i32) / 2;
            let offset_y = (INTERIOR_SIZE as i32 - h as i32) / 2;
            draw_text_mut(&mut canvas, LETTER, x + offset_x, y + offset_y, scale, &font, &text);
        }
    }

    Ok(canvas)
}

/// Render and write the grid as a PNG file
pub fn save_png<P: AsRef<Path>>(crossword: &Crossword, solution: &Solution, path: P) -> Result<()> {
    let path = path.as_ref();
    let canvas = render_png(crossword, solution)?;
    canvas
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write image {}", path.display()))?;
    Ok(())
}

/// Whether `path` names a PNG file
pub fn is_png_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
