//! Page layout and PDF serialization for the exported contact card.
//!
//! Layout is computed in millimetres on an A4 page with the origin at the
//! top-left corner. [`compose`] produces a list of [`DrawOp`]s that can be
//! inspected directly; [`ComposedPage::to_pdf`] flips the geometry into PDF
//! user space and writes the file with `lopdf`.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EncodeError, ExportError};
use crate::logo::Logo;
use crate::qr::{CodeStyle, RasterCode};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const PT_PER_MM: f32 = 72.0 / 25.4;
const KAPPA: f32 = 0.552_284_7;

const CODE_SIZE: f32 = 150.0;
const CODE_LIFT: f32 = 10.0;
const BACKING_PADDING: f32 = 10.0;
const BACKING_RADIUS: f32 = 5.0;
const SHADOW_OFFSET: f32 = 1.0;
const BADGE_MARGIN: f32 = 8.0;
const BADGE_RADIUS: f32 = 3.0;
const FOOTER_FROM_BOTTOM: f32 = 15.0;
const FOOTER_LINE_GAP: f32 = 5.0;

const WHITE: [u8; 3] = [255, 255, 255];
const SHADOW: [u8; 3] = [240, 240, 240];
const BACKING_BORDER: [u8; 3] = [220, 220, 220];
const BADGE_BORDER: [u8; 3] = [200, 200, 200];
const ATTRIBUTION_COLOR: [u8; 3] = [120, 120, 120];
const LINK_COLOR: [u8; 3] = [79, 70, 229];

/// The two footer lines printed under the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub attribution: String,
    pub link: String,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            attribution: "Powered by Botivate.in".to_string(),
            link: "www.botivate.in".to_string(),
        }
    }
}

/// Axis-aligned rectangle in millimetres, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Area {
    fn square(x: f32, y: f32, side: f32) -> Self {
        Self { x, y, w: side, h: side }
    }

    fn grow(self, by: f32) -> Self {
        Self {
            x: self.x - by,
            y: self.y - by,
            w: self.w + 2.0 * by,
            h: self.h + 2.0 * by,
        }
    }

    fn shift(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Square of `side` sharing this area's centre.
    fn centred_square(self, side: f32) -> Self {
        Self::square(
            self.x + (self.w - side) / 2.0,
            self.y + (self.h - side) / 2.0,
            side,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill([u8; 3]),
    Stroke { color: [u8; 3], width: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Code,
    Logo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect { area: Area, paint: Paint },
    RoundedRect { area: Area, radius: f32, paint: Paint },
    Image { area: Area, slot: ImageSlot },
    /// Helvetica text centred on `center_x`, sitting on `baseline`.
    Text {
        text: String,
        center_x: f32,
        baseline: f32,
        size: f32,
        color: [u8; 3],
    },
}

/// A part of the page that had to be left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The raster could not be produced; no code region was drawn.
    MissingCode { reason: String },
    /// The logo could not be drawn; the code has no badge.
    MissingOverlay { reason: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::MissingCode { reason } => {
                write!(f, "the QR code could not be drawn, so the page has none ({reason})")
            }
            Degradation::MissingOverlay { reason } => write!(
                f,
                "the logo could not be drawn, so the code is printed without it ({reason})"
            ),
        }
    }
}

/// A laid-out page ready for serialization.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub ops: Vec<DrawOp>,
    pub degraded: Vec<Degradation>,
    badge: Option<Area>,
    code: Option<RgbImage>,
    logo: Option<RgbImage>,
}

impl ComposedPage {
    fn area_of(&self, slot: ImageSlot) -> Option<Area> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Image { area, slot: s } if *s == slot => Some(*area),
            _ => None,
        })
    }

    pub fn code_region(&self) -> Option<Area> {
        self.area_of(ImageSlot::Code)
    }

    pub fn logo_region(&self) -> Option<Area> {
        self.area_of(ImageSlot::Logo)
    }

    /// The white square drawn behind the logo.
    pub fn badge(&self) -> Option<Area> {
        self.badge
    }
}

/// Lay out the page. A failed raster or an unreadable logo degrades the page
/// instead of aborting it; each omission is logged and recorded.
pub fn compose(
    raster: Result<&RasterCode, &EncodeError>,
    logo_uri: Option<&str>,
    footer: &Footer,
) -> ComposedPage {
    let page = Area {
        x: 0.0,
        y: 0.0,
        w: PAGE_WIDTH_MM,
        h: PAGE_HEIGHT_MM,
    };
    let mut ops = vec![DrawOp::Rect {
        area: page,
        paint: Paint::Fill(WHITE),
    }];
    let mut degraded = Vec::new();
    let mut badge = None;
    let mut code = None;
    let mut logo = None;

    match raster {
        Ok(raster) => {
            let region = Area::square(
                (PAGE_WIDTH_MM - CODE_SIZE) / 2.0,
                (PAGE_HEIGHT_MM - CODE_SIZE) / 2.0 - CODE_LIFT,
                CODE_SIZE,
            );
            let backing = region.grow(BACKING_PADDING);

            ops.push(DrawOp::RoundedRect {
                area: backing.shift(SHADOW_OFFSET, SHADOW_OFFSET),
                radius: BACKING_RADIUS,
                paint: Paint::Fill(SHADOW),
            });
            ops.push(DrawOp::RoundedRect {
                area: backing,
                radius: BACKING_RADIUS,
                paint: Paint::Fill(WHITE),
            });
            ops.push(DrawOp::RoundedRect {
                area: backing,
                radius: BACKING_RADIUS,
                paint: Paint::Stroke {
                    color: BACKING_BORDER,
                    width: 0.5,
                },
            });
            ops.push(DrawOp::Image {
                area: region,
                slot: ImageSlot::Code,
            });
            code = Some(raster.image.clone());

            if let Some(uri) = logo_uri.filter(|u| !u.is_empty()) {
                match Logo::from_data_uri(uri) {
                    Ok(decoded) => {
                        let ratio = raster
                            .excavation
                            .map(|e| e.size / raster.modules as f32)
                            .unwrap_or_else(|| CodeStyle::default().overlay_ratio);
                        let logo_area = region.centred_square(CODE_SIZE * ratio);
                        let badge_area = logo_area.grow(BADGE_MARGIN / 2.0);

                        ops.push(DrawOp::RoundedRect {
                            area: badge_area,
                            radius: BADGE_RADIUS,
                            paint: Paint::Fill(WHITE),
                        });
                        ops.push(DrawOp::RoundedRect {
                            area: badge_area,
                            radius: BADGE_RADIUS,
                            paint: Paint::Stroke {
                                color: BADGE_BORDER,
                                width: 0.2,
                            },
                        });
                        ops.push(DrawOp::Image {
                            area: logo_area,
                            slot: ImageSlot::Logo,
                        });
                        badge = Some(badge_area);
                        logo = Some(decoded.to_rgb_on_white());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "logo unreadable, exporting without overlay");
                        degraded.push(Degradation::MissingOverlay {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "QR raster unavailable, exporting page without code");
            degraded.push(Degradation::MissingCode {
                reason: e.to_string(),
            });
        }
    }

    let footer_y = PAGE_HEIGHT_MM - FOOTER_FROM_BOTTOM;
    ops.push(DrawOp::Text {
        text: footer.attribution.clone(),
        center_x: PAGE_WIDTH_MM / 2.0,
        baseline: footer_y,
        size: 10.0,
        color: ATTRIBUTION_COLOR,
    });
    ops.push(DrawOp::Text {
        text: footer.link.clone(),
        center_x: PAGE_WIDTH_MM / 2.0,
        baseline: footer_y + FOOTER_LINE_GAP,
        size: 9.0,
        color: LINK_COLOR,
    });

    ComposedPage {
        ops,
        degraded,
        badge,
        code,
        logo,
    }
}

/// Advance widths of Helvetica for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667,
    611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500,
    222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Width of `text` set in Helvetica at `size` points, in points.
pub fn helvetica_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Encode text for a simple font using `WinAnsiEncoding`. Characters the
/// encoding lacks become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => match c {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => b'?',
            },
        })
        .collect()
}

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

fn real(v: f32) -> Object {
    v.into()
}

fn rgb(c: [u8; 3]) -> Vec<Object> {
    c.iter().map(|&v| real(v as f32 / 255.0)).collect()
}

fn reals<const N: usize>(values: [f32; N]) -> Vec<Object> {
    values.into_iter().map(real).collect()
}

/// `(x, y, w, h)` in PDF points with a bottom-left origin.
fn to_user_space(area: Area) -> (f32, f32, f32, f32) {
    (
        pt(area.x),
        pt(PAGE_HEIGHT_MM - area.y - area.h),
        pt(area.w),
        pt(area.h),
    )
}

fn rounded_rect_path(ops: &mut Vec<Operation>, area: Area, radius: f32) {
    let (x, y, w, h) = to_user_space(area);
    let r = pt(radius).min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA;

    ops.push(Operation::new("m", reals([x + r, y])));
    ops.push(Operation::new("l", reals([x + w - r, y])));
    let (right, top) = (x + w, y + h);
    ops.push(Operation::new("c", reals([right - r + k, y, right, y + r - k, right, y + r])));
    ops.push(Operation::new("l", reals([right, top - r])));
    ops.push(Operation::new("c", reals([right, top - r + k, right - r + k, top, right - r, top])));
    ops.push(Operation::new("l", reals([x + r, top])));
    ops.push(Operation::new("c", reals([x + r - k, top, x, top - r + k, x, top - r])));
    ops.push(Operation::new("l", reals([x, y + r])));
    ops.push(Operation::new("c", reals([x, y + r - k, x + r - k, y, x + r, y])));
    ops.push(Operation::new("h", vec![]));
}

fn paint(ops: &mut Vec<Operation>, paint: Paint) {
    match paint {
        Paint::Fill(color) => {
            ops.push(Operation::new("rg", rgb(color)));
            ops.push(Operation::new("f", vec![]));
        }
        Paint::Stroke { color, width } => {
            ops.push(Operation::new("RG", rgb(color)));
            ops.push(Operation::new("w", vec![real(pt(width))]));
            ops.push(Operation::new("S", vec![]));
        }
    }
}

fn image_xobject(image: &RgbImage) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        image.as_raw().clone(),
    )
}

impl ComposedPage {
    pub fn to_pdf(&self) -> Result<Vec<u8>, ExportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut xobjects = Dictionary::new();
        for (slot, name, image) in [
            (ImageSlot::Code, "ImCode", &self.code),
            (ImageSlot::Logo, "ImLogo", &self.logo),
        ] {
            if let (Some(image), Some(_)) = (image, self.area_of(slot)) {
                let id = doc.add_object(image_xobject(image));
                xobjects.set(name, id);
            }
        }

        let mut ops = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::Rect { area, paint: p } => {
                    let (x, y, w, h) = to_user_space(*area);
                    ops.push(Operation::new("re", reals([x, y, w, h])));
                    paint(&mut ops, *p);
                }
                DrawOp::RoundedRect { area, radius, paint: p } => {
                    rounded_rect_path(&mut ops, *area, *radius);
                    paint(&mut ops, *p);
                }
                DrawOp::Image { area, slot } => {
                    let name = match slot {
                        ImageSlot::Code => "ImCode",
                        ImageSlot::Logo => "ImLogo",
                    };
                    if !xobjects.has(name.as_bytes()) {
                        continue;
                    }
                    let (x, y, w, h) = to_user_space(*area);
                    ops.push(Operation::new("q", vec![]));
                    ops.push(Operation::new("cm", reals([w, 0.0, 0.0, h, x, y])));
                    ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
                    ops.push(Operation::new("Q", vec![]));
                }
                DrawOp::Text {
                    text,
                    center_x,
                    baseline,
                    size,
                    color,
                } => {
                    let x = pt(*center_x) - helvetica_width(text, *size) / 2.0;
                    let y = pt(PAGE_HEIGHT_MM - baseline);
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new("rg", rgb(*color)));
                    ops.push(Operation::new("Tf", vec!["F1".into(), real(*size)]));
                    ops.push(Operation::new("Td", reals([x, y])));
                    let encoded = Object::String(win_ansi(text), StringFormat::Literal);
                    ops.push(Operation::new("Tj", vec![encoded]));
                    ops.push(Operation::new("ET", vec![]));
                }
            }
        }

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().map_err(ExportError::serialize)?,
        ));

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => xobjects,
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(pt(PAGE_WIDTH_MM)),
                real(pt(PAGE_HEIGHT_MM)),
            ],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1_i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(ExportError::serialize)?;

        tracing::debug!(bytes = bytes.len(), degraded = self.degraded.len(), "serialized PDF");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::png_data_uri;
    use crate::qr::{render_raster, Overlay};
    use crate::record::{build_payload, ContactForm};
    use image::{DynamicImage, Rgba};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    async fn raster(reserve: bool) -> RasterCode {
        let payload = build_payload(&ContactForm {
            person_name: "John Smith".into(),
            company_name: "Acme".into(),
            phone_no: "555-1234".into(),
            email: "j@acme.com".into(),
            ..Default::default()
        })
        .unwrap();
        let overlay = reserve.then_some(Overlay::Reserve);
        render_raster(&payload, overlay.as_ref(), &CodeStyle::default())
            .await
            .unwrap()
    }

    fn logo_uri() -> String {
        let img = image::ImageBuffer::from_pixel(16, 16, Rgba([0, 128, 255, 255]));
        png_data_uri(&DynamicImage::ImageRgba8(img)).unwrap()
    }

    fn image_count(pdf: &[u8]) -> usize {
        let doc = Document::load_mem(pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        doc.objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| matches!(s.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image"))
            .count()
    }

    #[tokio::test]
    async fn test_code_region_geometry() {
        let raster = raster(false).await;
        let page = compose(Ok(&raster), None, &Footer::default());
        let region = page.code_region().unwrap();
        assert!(close(region.x, 30.0));
        assert!(close(region.y, 63.5));
        assert!(close(region.w, 150.0));
        assert!(page.badge().is_none());
        assert!(page.degraded.is_empty());
    }

    #[tokio::test]
    async fn test_backing_drawn_shadow_first() {
        let raster = raster(false).await;
        let page = compose(Ok(&raster), None, &Footer::default());
        let rounded: Vec<_> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::RoundedRect { area, paint, .. } => Some((*area, *paint)),
                _ => None,
            })
            .collect();
        assert_eq!(rounded.len(), 3);
        assert_eq!(rounded[0].1, Paint::Fill(SHADOW));
        assert!(close(rounded[0].0.x, 21.0));
        assert!(close(rounded[1].0.x, 20.0));
        assert!(close(rounded[1].0.w, 170.0));
        assert!(matches!(rounded[2].1, Paint::Stroke { .. }));
    }

    #[tokio::test]
    async fn test_badge_matches_excavation() {
        let raster = raster(true).await;
        let uri = logo_uri();
        let page = compose(Ok(&raster), Some(&uri), &Footer::default());
        let region = page.code_region().unwrap();
        let logo = page.logo_region().unwrap();
        let badge = page.badge().unwrap();

        let excavated = raster.excavation.unwrap().size / raster.modules as f32;
        assert!(close(logo.w / region.w, excavated));
        assert!(close(logo.w, 33.0));
        assert!(close(badge.w, 41.0));
        assert!(close(badge.x + badge.w / 2.0, region.x + region.w / 2.0));
        assert!(close(badge.y + badge.h / 2.0, region.y + region.h / 2.0));
    }

    #[tokio::test]
    async fn test_bad_logo_degrades_to_plain_code() {
        let raster = raster(true).await;
        let broken = "data:image/png;base64,AAAA";
        let page = compose(Ok(&raster), Some(broken), &Footer::default());
        assert!(page.code_region().is_some());
        assert!(page.logo_region().is_none());
        assert!(page.badge().is_none());
        assert!(matches!(page.degraded[..], [Degradation::MissingOverlay { .. }]));
        assert_eq!(image_count(&page.to_pdf().unwrap()), 1);
    }

    #[test]
    fn test_failed_raster_still_has_footer() {
        let err = EncodeError::NotFound;
        let page = compose(Err(&err), Some(&logo_uri()), &Footer::default());
        assert!(page.code_region().is_none());
        assert!(page.logo_region().is_none());
        assert!(matches!(page.degraded[..], [Degradation::MissingCode { .. }]));

        let texts: Vec<_> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, baseline, .. } => Some((text.as_str(), *baseline)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![("Powered by Botivate.in", 282.0), ("www.botivate.in", 287.0)]
        );
        assert_eq!(image_count(&page.to_pdf().unwrap()), 0);
    }

    #[tokio::test]
    async fn test_pdf_embeds_code_and_logo() {
        let raster = raster(true).await;
        let uri = logo_uri();
        let page = compose(Ok(&raster), Some(&uri), &Footer::default());
        let pdf = page.to_pdf().unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));
        assert_eq!(image_count(&pdf), 2);
    }

    #[test]
    fn test_degradation_reads_as_prose() {
        let missing = Degradation::MissingOverlay {
            reason: "not a base64 data URI".into(),
        };
        let text = missing.to_string();
        assert!(text.starts_with("the logo could not be drawn"));
        assert!(text.ends_with("(not a base64 data URI)"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_footer_text_is_win_ansi() {
        assert_eq!(win_ansi("www.botivate.in"), b"www.botivate.in".to_vec());
        assert_eq!(win_ansi("Café – 5€"), b"Caf\xE9 \x96 5\x80".to_vec());
        assert_eq!(win_ansi("東京"), b"??".to_vec());
    }

    #[test]
    fn test_non_ascii_footer_serializes() {
        let err = EncodeError::NotFound;
        let footer = Footer {
            attribution: "Réalisé à Zürich".into(),
            ..Footer::default()
        };
        let pdf = compose(Err(&err), None, &footer).to_pdf().unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<_> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands[0].as_str().ok())
            .collect();
        assert_eq!(shown[0], b"R\xE9alis\xE9 \xE0 Z\xFCrich");
    }

    #[test]
    fn test_helvetica_width() {
        assert!(close(helvetica_width("www", 10.0), 21.66));
        assert!(close(helvetica_width("é", 1.0), 0.556));
    }
}
