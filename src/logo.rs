//! Decoding of the uploaded logo.
//!
//! The form keeps the logo as a `data:` URI, exactly as a browser file
//! reader would produce it. The encoder and composer work with the decoded
//! raster, so a [`Logo`] carries both.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::Path;

use crate::error::LogoError;

#[derive(Debug, Clone)]
pub struct Logo {
    data_uri: String,
    image: DynamicImage,
}

impl Logo {
    pub fn from_data_uri(uri: &str) -> Result<Self, LogoError> {
        let rest = uri.strip_prefix("data:").ok_or(LogoError::NotDataUri)?;
        let (meta, encoded) = rest.split_once(',').ok_or(LogoError::NotDataUri)?;
        let subtype = meta
            .strip_prefix("image/")
            .and_then(|m| m.strip_suffix(";base64"))
            .ok_or(LogoError::NotDataUri)?;
        if !is_mime_token(subtype) {
            return Err(LogoError::NotDataUri);
        }

        let bytes = BASE64.decode(encoded.trim())?;
        let image = image::load_from_memory(&bytes)?;

        Ok(Self {
            data_uri: uri.to_string(),
            image,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LogoError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        let data_uri = format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            BASE64.encode(bytes)
        );

        Ok(Self { data_uri, image })
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// The logo flattened onto a white background, for targets without alpha.
    pub fn to_rgb_on_white(&self) -> RgbImage {
        let rgba = self.image.to_rgba8();
        let mut out = RgbImage::new(rgba.width(), rgba.height());
        for (x, y, px) in rgba.enumerate_pixels() {
            let a = px[3] as u32;
            let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
            out.put_pixel(x, y, Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
        }
        out
    }
}

fn is_mime_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Read a logo from disk. This is the single in-flight "upload" read.
pub async fn read_logo_file(path: &Path) -> Result<Logo, LogoError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LogoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Logo::from_bytes(&bytes)
}

/// PNG-encode an image and wrap it as a data URI.
pub fn png_data_uri(image: &DynamicImage) -> Result<String, image::ImageError> {
    let mut png = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn red_square() -> DynamicImage {
        DynamicImage::ImageRgba8(image::ImageBuffer::from_pixel(8, 8, Rgba([200, 0, 0, 255])))
    }

    #[test]
    fn test_data_uri_roundtrip() {
        let uri = png_data_uri(&red_square()).unwrap();
        let logo = Logo::from_data_uri(&uri).unwrap();
        assert_eq!(logo.image().width(), 8);
        assert_eq!(logo.data_uri(), uri);
    }

    #[test]
    fn test_from_bytes_builds_uri() {
        let mut png = Vec::new();
        red_square()
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let logo = Logo::from_bytes(&png).unwrap();
        assert!(logo.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(matches!(
            Logo::from_data_uri("https://example.com/logo.png"),
            Err(LogoError::NotDataUri)
        ));
        assert!(matches!(
            Logo::from_data_uri("data:image/png;base64,!!!"),
            Err(LogoError::Base64(_))
        ));
    }

    #[test]
    fn test_rejects_markup_in_media_type() {
        let uri = png_data_uri(&red_square()).unwrap();
        let body = uri.split_once(',').unwrap().1;
        for meta in [
            "image/png\" onload=\"alert(1);base64",
            "text/html;base64",
            "image/;base64",
            "image/svg+xml;charset=utf-8;base64",
        ] {
            let crafted = format!("data:{meta},{body}");
            assert!(
                matches!(Logo::from_data_uri(&crafted), Err(LogoError::NotDataUri)),
                "{meta}"
            );
        }
        assert!(Logo::from_data_uri(&format!("data:image/x-icon;base64,{body}")).is_ok());
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let clear = image::ImageBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let uri = png_data_uri(&DynamicImage::ImageRgba8(clear)).unwrap();
        let logo = Logo::from_data_uri(&uri).unwrap();
        assert_eq!(logo.to_rgb_on_white().get_pixel(0, 0), &Rgb([255, 255, 255]));
    }
}
