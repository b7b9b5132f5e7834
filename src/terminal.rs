use terminal_size::{terminal_size, Height, Width};

use crate::error::EncodeError;
use crate::qr::{module_rows, CodeStyle};
use crate::record::EncodedPayload;

fn term_dimensions() -> (usize, usize) {
    terminal_size()
        .map(|(Width(w), Height(h))| {
            if w < 40 || h < 30 {
                (120, 60)
            } else {
                (w as usize, h as usize)
            }
        })
        .unwrap_or((120, 60))
}

/// Draw the code with half-block characters, two module rows per line,
/// centred horizontally in the current terminal.
pub fn render_to_terminal(
    payload: &EncodedPayload,
    style: &CodeStyle,
) -> Result<String, EncodeError> {
    let rows = module_rows(payload, style)?;
    let (term_width, _) = term_dimensions();
    Ok(draw_half_blocks(&rows, term_width))
}

/// Whether the preview fits without wrapping, leaving room for the caption.
pub fn fits_in_terminal(payload: &EncodedPayload, style: &CodeStyle) -> Result<bool, EncodeError> {
    let side = module_rows(payload, style)?.len();
    let (term_width, term_height) = term_dimensions();
    Ok(side <= term_width && side.div_ceil(2) + 6 <= term_height)
}

fn draw_half_blocks(rows: &[Vec<bool>], term_width: usize) -> String {
    let side = rows.len();
    let left_pad = " ".repeat(term_width.saturating_sub(side) / 2);
    let is_dark = |row: usize, col: usize| rows.get(row).is_some_and(|r| r[col]);

    let mut result = String::new();
    for top_row in (0..side).step_by(2) {
        result.push_str(&left_pad);
        for col in 0..side {
            let ch = match (is_dark(top_row, col), is_dark(top_row + 1, col)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            };
            result.push(ch);
        }
        result.push('\n');
    }
    result
}
