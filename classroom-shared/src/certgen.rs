/// Certificate image rendering
///
/// Draws a completion certificate onto an 800×600 white canvas: a heading,
/// the student's name, the course title, and the issue date. The output is
/// PNG-encoded bytes ready for the media store.
///
/// The TrueType font is loaded once at startup from a configurable path;
/// when the font is missing the server still runs and certificate rows are
/// issued without an artifact.

use std::io::Cursor;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use chrono::NaiveDate;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

/// Canvas size, matching the classic 4:3 certificate layout
const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Text scale in pixels
const TEXT_SCALE: f32 = 40.0;

/// Error type for certificate rendering
#[derive(Debug, thiserror::Error)]
pub enum CertgenError {
    /// Failed to read or parse the font file
    #[error("Failed to load certificate font: {0}")]
    FontLoad(String),

    /// Failed to encode the rendered image
    #[error("Failed to encode certificate image: {0}")]
    Encode(String),
}

/// Renders certificate PNGs with a single loaded font
pub struct CertificateRenderer {
    font: FontVec,
}

impl CertificateRenderer {
    /// Loads the renderer's font from a TrueType file
    ///
    /// # Errors
    ///
    /// Returns `CertgenError::FontLoad` when the file can't be read or
    /// isn't a parseable font.
    pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, CertgenError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CertgenError::FontLoad(format!("{}: {}", path.display(), e)))?;

        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| CertgenError::FontLoad(format!("{}: {}", path.display(), e)))?;

        Ok(Self { font })
    }

    /// Renders a certificate to PNG bytes
    pub fn render(
        &self,
        student_name: &str,
        course_title: &str,
        issued_on: NaiveDate,
    ) -> Result<Vec<u8>, CertgenError> {
        let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([255, 255, 255]));

        let black = Rgb([0, 0, 0]);
        let scale = PxScale::from(TEXT_SCALE);

        draw_text_mut(
            &mut img,
            black,
            200,
            100,
            scale,
            &self.font,
            "Certificate of Completion",
        );
        draw_text_mut(
            &mut img,
            black,
            200,
            200,
            scale,
            &self.font,
            &format!("Awarded to {}", student_name),
        );
        draw_text_mut(
            &mut img,
            black,
            200,
            300,
            scale,
            &self.font,
            &format!("For completing {}", course_title),
        );
        draw_text_mut(
            &mut img,
            black,
            200,
            400,
            scale,
            &self.font,
            &format!("Date: {}", issued_on),
        );

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| CertgenError::Encode(e.to_string()))?;

        Ok(buf)
    }
}

/// Lowercases and dash-joins a string for use in filenames
///
/// Non-alphanumeric runs collapse to a single dash; leading and trailing
/// dashes are stripped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_dash = true; // suppress a leading dash

    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Filename for a certificate artifact
pub fn certificate_filename(student_name: &str, course_title: &str) -> String {
    format!(
        "cert_{}_{}.png",
        slugify(student_name),
        slugify(course_title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Algebra I"), "algebra-i");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("C++ & Rust!"), "c-rust");
        assert_eq!(slugify("already-slugged"), "already-slugged");
        assert_eq!(slugify("ÜmläütFree"), "ml-tfree");
    }

    #[test]
    fn test_certificate_filename() {
        assert_eq!(
            certificate_filename("JDoe", "Algebra I"),
            "cert_jdoe_algebra-i.png"
        );
    }

    #[test]
    fn test_from_font_file_missing() {
        let result = CertificateRenderer::from_font_file("/nonexistent/font.ttf");
        assert!(matches!(result, Err(CertgenError::FontLoad(_))));
    }
}
