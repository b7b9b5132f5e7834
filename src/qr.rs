use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[cfg(feature = "decode")]
use image::GrayImage;
#[cfg(feature = "decode")]
use rqrr::PreparedImage;

use crate::error::EncodeError;
use crate::logo::Logo;
use crate::record::EncodedPayload;

/// Largest overlay, as a fraction of the code width, that level H still
/// recovers from.
pub const MAX_OVERLAY_RATIO: f32 = 0.25;

/// Rendering options shared by the preview and the export raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyle {
    /// Quiet zone around the export raster, in modules.
    pub margin: u32,
    /// Quiet zone around the SVG preview, in modules.
    pub preview_margin: u32,
    /// Exact pixel width of the export raster.
    pub raster_width: u32,
    /// Display size of the SVG preview, in CSS pixels.
    pub preview_size: u32,
    /// Side of the excavated square as a fraction of the code width.
    pub overlay_ratio: f32,
    pub dark: [u8; 3],
    pub light: [u8; 3],
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            margin: 1,
            preview_margin: 4,
            raster_width: 600,
            preview_size: 280,
            overlay_ratio: 0.22,
            dark: [0, 0, 0],
            light: [255, 255, 255],
        }
    }
}

/// What to do with the centre of the code.
#[derive(Debug, Clone)]
pub enum Overlay {
    /// Clear the centre and draw the logo into it.
    Embed(Logo),
    /// Clear the centre only; the logo is placed later by the document.
    Reserve,
}

impl Overlay {
    fn logo(&self) -> Option<&Logo> {
        match self {
            Overlay::Embed(logo) => Some(logo),
            Overlay::Reserve => None,
        }
    }
}

/// Cleared square in module units, margin included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Excavation {
    /// Exact (unrounded) square the logo occupies.
    pub x: f32,
    pub size: f32,
    /// Whole modules cleared to make room for it.
    pub first_module: u32,
    pub module_span: u32,
}

impl Excavation {
    fn centred(total_modules: u32, ratio: f32) -> Self {
        let size = total_modules as f32 * ratio;
        let x = (total_modules as f32 - size) / 2.0;
        let first_module = x.floor() as u32;
        let module_span = (size + x - first_module as f32).ceil() as u32;
        Self {
            x,
            size,
            first_module,
            module_span,
        }
    }

    fn covers(&self, col: u32, row: u32) -> bool {
        let end = self.first_module + self.module_span;
        (self.first_module..end).contains(&col) && (self.first_module..end).contains(&row)
    }
}

/// Module grid with the quiet zone folded in.
struct ModuleGrid {
    total: u32,
    margin: u32,
    width: u32,
    colors: Vec<Color>,
    excavation: Option<Excavation>,
}

impl ModuleGrid {
    fn encode(
        payload: &str,
        margin: u32,
        ratio: f32,
        overlay: Option<&Overlay>,
    ) -> Result<Self, EncodeError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
        let width = code.width() as u32;
        let total = width + 2 * margin;
        let excavation = overlay.map(|_| Excavation::centred(total, ratio));

        tracing::debug!(
            version = ?code.version(),
            modules = width,
            excavated = excavation.is_some(),
            "encoded QR matrix"
        );

        Ok(Self {
            total,
            margin,
            width,
            colors: code.to_colors(),
            excavation,
        })
    }

    fn is_dark(&self, col: u32, row: u32) -> bool {
        if col < self.margin || row < self.margin {
            return false;
        }
        let (x, y) = (col - self.margin, row - self.margin);
        if x >= self.width || y >= self.width {
            return false;
        }
        if self.excavation.is_some_and(|e| e.covers(col, row)) {
            return false;
        }
        self.colors[(y * self.width + x) as usize] == Color::Dark
    }
}

/// SVG preview of a payload.
#[derive(Debug, Clone)]
pub struct VectorCode {
    pub svg: String,
    /// Width of the code in modules, margin included.
    pub modules: u32,
    pub excavation: Option<Excavation>,
}

/// Export raster of a payload.
#[derive(Debug, Clone)]
pub struct RasterCode {
    pub image: RgbImage,
    pub png: Vec<u8>,
    pub modules: u32,
    pub excavation: Option<Excavation>,
}

fn hex(c: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", c[0], c[1], c[2])
}

/// Escape text for use inside a double-quoted XML attribute.
fn xml_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the on-screen preview. Runs entirely on the calling thread.
pub fn render_vector(
    payload: &EncodedPayload,
    overlay: Option<&Overlay>,
    style: &CodeStyle,
) -> Result<VectorCode, EncodeError> {
    let grid = ModuleGrid::encode(
        payload.as_str(),
        style.preview_margin,
        style.overlay_ratio,
        overlay,
    )?;
    let n = grid.total;

    let mut path = String::new();
    for row in 0..n {
        for col in 0..n {
            if grid.is_dark(col, row) {
                let _ = write!(path, "M{col} {row}h1v1h-1z");
            }
        }
    }

    let mut svg = String::new();
    let _ = write!(
        svg,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" height="{size}" width="{size}" "#,
            r#"viewBox="0 0 {n} {n}" shape-rendering="crispEdges">"#
        ),
        size = style.preview_size,
        n = n
    );
    let _ = write!(
        svg,
        r#"<path fill="{}" d="M0,0 h{n}v{n}H0z"/><path fill="{}" d="{path}"/>"#,
        hex(style.light),
        hex(style.dark)
    );
    if let (Some(e), Some(logo)) = (grid.excavation, overlay.and_then(Overlay::logo)) {
        let _ = write!(
            svg,
            concat!(
                r#"<image href="{}" x="{x}" y="{x}" width="{s}" height="{s}" "#,
                r#"preserveAspectRatio="none"/>"#
            ),
            xml_attr(logo.data_uri()),
            x = e.x,
            s = e.size
        );
    }
    svg.push_str("</svg>");

    Ok(VectorCode {
        svg,
        modules: n,
        excavation: grid.excavation,
    })
}

fn rasterize(
    payload: &str,
    overlay: Option<&Overlay>,
    style: &CodeStyle,
) -> Result<RasterCode, EncodeError> {
    let grid = ModuleGrid::encode(payload, style.margin, style.overlay_ratio, overlay)?;
    let scale = (style.raster_width / grid.total).max(1);
    let side = grid.total * scale;

    let dark = Rgb(style.dark);
    let mut image = RgbImage::from_pixel(side, side, Rgb(style.light));
    for row in 0..grid.total {
        for col in 0..grid.total {
            if grid.is_dark(col, row) {
                draw_filled_rect_mut(
                    &mut image,
                    Rect::at((col * scale) as i32, (row * scale) as i32).of_size(scale, scale),
                    dark,
                );
            }
        }
    }

    if side != style.raster_width {
        let w = style.raster_width;
        image = imageops::resize(&image, w, w, FilterType::Nearest);
    }

    if let (Some(e), Some(logo)) = (grid.excavation, overlay.and_then(Overlay::logo)) {
        let px_per_module = style.raster_width as f32 / grid.total as f32;
        let logo_px = (e.size * px_per_module).round().max(1.0) as u32;
        let offset = (e.x * px_per_module).round() as i64;
        let flat = logo.to_rgb_on_white();
        let scaled = imageops::resize(&flat, logo_px, logo_px, FilterType::Triangle);
        imageops::overlay(&mut image, &scaled, offset, offset);
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(RasterCode {
        image,
        png,
        modules: grid.total,
        excavation: grid.excavation,
    })
}

/// Render the export raster. The work is moved off the calling task; the
/// caller must await the result before using it.
pub async fn render_raster(
    payload: &EncodedPayload,
    overlay: Option<&Overlay>,
    style: &CodeStyle,
) -> Result<RasterCode, EncodeError> {
    let payload = payload.as_str().to_owned();
    let overlay = overlay.cloned();
    let style = style.clone();

    let raster =
        tokio::task::spawn_blocking(move || rasterize(&payload, overlay.as_ref(), &style)).await??;

    tracing::debug!(
        width = raster.image.width(),
        bytes = raster.png.len(),
        "rendered export raster"
    );
    Ok(raster)
}

#[cfg(feature = "decode")]
pub fn decode_raster(img: &DynamicImage) -> Result<String, EncodeError> {
    decode_qr_from_gray(&img.to_luma8())
}

#[cfg(feature = "decode")]
pub fn decode_qr_from_gray(gray: &GrayImage) -> Result<String, EncodeError> {
    let mut prepared = PreparedImage::prepare(gray.clone());
    let grids = prepared.detect_grids();

    let grid = grids.first().ok_or(EncodeError::NotFound)?;
    let (_, content) = grid.decode().map_err(|e| EncodeError::Decode {
        message: format!("{:?}", e),
    })?;

    Ok(content)
}

/// Iterate the modules of a payload for text renderers.
pub(crate) fn module_rows(
    payload: &EncodedPayload,
    style: &CodeStyle,
) -> Result<Vec<Vec<bool>>, EncodeError> {
    let grid = ModuleGrid::encode(payload.as_str(), style.margin, style.overlay_ratio, None)?;
    Ok((0..grid.total)
        .map(|row| (0..grid.total).map(|col| grid.is_dark(col, row)).collect())
        .collect())
}
