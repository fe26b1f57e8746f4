//! Printable Wi-Fi card.
//!
//! A card is a white canvas with the QR code in the upper square and text
//! rows below it:
//!
//! ```text
//! +-----------------+
//! |   +---------+   |
//! |   |   QR    |   |
//! |   +---------+   |
//! |   SSID          |
//! |   <ssid>        |
//! |                 |
//! |   Password      |
//! |   <password>    |
//! |                 |
//! |   Encryption    |
//! |   WPA/WPA2      |
//! +-----------------+
//! ```
//!
//! The card knows nothing about credentials; [`render_card`] composes one
//! from a [`Credential`].

use ab_glyph::PxScale;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use log::debug;
use std::path::Path;

use crate::Result;
use crate::api::models::{Credential, WifiCardError};
use crate::core::qr::QrMatrix;
use crate::types::constants::{card, qr};
use crate::util::fonts::{CardFonts, FontConfig};

/// Geometry of a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Text size in pixels, also the row height
    pub font_size: u32,
    /// Fraction of the width taken by the QR code
    pub width_used_by_qr_image: f32,
}

impl Default for CardLayout {
    /// 650 x 1004 canvas, 30px text, QR code over 80% of the width.
    fn default() -> Self {
        Self {
            width: card::WIDTH,
            height: card::HEIGHT,
            font_size: card::FONT_SIZE,
            width_used_by_qr_image: card::WIDTH_USED_BY_QR_IMAGE,
        }
    }
}

impl CardLayout {
    /// Left margin of every element, and top margin of the QR code.
    pub fn offset(&self) -> u32 {
        let relative = (1.0 - self.width_used_by_qr_image.clamp(0.0, 1.0)) / 2.0;
        (self.width as f32 * relative).round() as u32
    }

    /// Side length of the placed QR code.
    pub fn qr_width(&self) -> u32 {
        (self.width as f32 * self.width_used_by_qr_image.clamp(0.0, 1.0)).round() as u32
    }

    /// Top of text row `row`. Rows start below the square holding the code.
    pub fn row_y(&self, row: u32) -> u32 {
        self.width + self.font_size * row
    }
}

/// A card canvas being composed.
pub struct Card {
    layout: CardLayout,
    image: RgbImage,
    fonts: Option<CardFonts>,
    written_rows: u32,
}

impl Card {
    /// Creates a blank white card. Text needs [`with_fonts`](Card::with_fonts).
    pub fn new(layout: CardLayout) -> Self {
        Self {
            image: RgbImage::from_pixel(layout.width, layout.height, Rgb(card::WHITE)),
            layout,
            fonts: None,
            written_rows: 0,
        }
    }

    /// Sets the fonts used by the text methods.
    #[must_use]
    pub fn with_fonts(mut self, fonts: CardFonts) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Number of text rows written so far.
    pub fn written_rows(&self) -> u32 {
        self.written_rows
    }

    /// Generates a QR code for `payload` and places it on the card.
    pub fn add_qr_code(&mut self, payload: &str) -> Result<()> {
        let matrix = QrMatrix::generate(payload, qr::CARD_BOX_SIZE, Some(qr::CARD_BORDER))?;
        self.add_qr_matrix(&matrix)
    }

    /// Scales `matrix` to the layout's QR width and places it at the offset.
    ///
    /// # Errors
    ///
    /// Returns [`WifiCardError::InvalidLayout`] if `width_used_by_qr_image`
    /// is not in `(0, 1]` or the code would be less than a pixel wide.
    pub fn add_qr_matrix(&mut self, matrix: &QrMatrix) -> Result<()> {
        let ratio = self.layout.width_used_by_qr_image;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(WifiCardError::InvalidLayout(format!(
                "width_used_by_qr_image must be in (0, 1], got {ratio}"
            )));
        }
        let side = self.layout.qr_width();
        if side == 0 {
            return Err(WifiCardError::InvalidLayout(format!(
                "a {}px wide card leaves no room for the QR code",
                self.layout.width
            )));
        }
        let rendered = matrix.to_image(Rgb(card::BLACK), Rgb(card::WHITE));
        let scaled = imageops::resize(&rendered, side, side, FilterType::Nearest);
        let offset = i64::from(self.layout.offset());
        imageops::replace(&mut self.image, &scaled, offset, offset);
        debug!("Placed {side}x{side} QR code at ({offset}, {offset})");
        Ok(())
    }

    /// Writes `text` in the regular font on the next row.
    pub fn add_text_line(&mut self, text: &str) -> Result<()> {
        self.draw_line(text, false)
    }

    /// Writes `text` in the bold font on the next row.
    pub fn add_bold_text_line(&mut self, text: &str) -> Result<()> {
        self.draw_line(text, true)
    }

    fn draw_line(&mut self, text: &str, bold: bool) -> Result<()> {
        let fonts = self.fonts.as_ref().ok_or_else(|| {
            WifiCardError::FontUnavailable("no fonts loaded for card text".into())
        })?;
        let font = if bold { &fonts.bold } else { &fonts.regular };

        let y = self.layout.row_y(self.written_rows);
        self.written_rows += 1;

        draw_text_mut(
            &mut self.image,
            Rgb(card::BLACK),
            self.layout.offset() as i32,
            y as i32,
            PxScale::from(self.layout.font_size as f32),
            font,
            text,
        );
        Ok(())
    }

    /// Draws a black frame `size` pixels thick along the canvas edges.
    pub fn draw_border(&mut self, size: u32) {
        let (width, height) = self.image.dimensions();
        let size = size.min(width / 2).min(height / 2);
        if size == 0 {
            return;
        }

        let color = Rgb(card::BLACK);
        let (w, h) = (width as i32, height as i32);
        let s = size as i32;
        for rect in [
            Rect::at(0, 0).of_size(width, size),
            Rect::at(0, h - s).of_size(width, size),
            Rect::at(0, 0).of_size(size, height),
            Rect::at(w - s, 0).of_size(size, height),
        ] {
            draw_filled_rect_mut(&mut self.image, rect, color);
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Saves the card; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        debug!("Saved card to {}", path.display());
        Ok(())
    }
}

/// Options for [`render_card`].
#[derive(Debug, Clone, PartialEq)]
pub struct CardOptions {
    pub layout: CardLayout,
    pub fonts: FontConfig,
    /// Frame the card with a border as thick as the font size
    pub draw_border: bool,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            layout: CardLayout::default(),
            fonts: FontConfig::default(),
            draw_border: true,
        }
    }
}

/// Composes the card for `credential`.
///
/// # Errors
///
/// Fails if the credential cannot be serialized, the payload does not fit
/// in a QR code, the layout has no room for the code, or no font is
/// available.
pub fn render_card(credential: &Credential, options: &CardOptions) -> Result<Card> {
    let payload = credential.uri()?;
    render_card_with_payload(credential, &payload, options)
}

/// Composes the card for `credential` around an already serialized
/// `payload`, for callers that hold it from [`Credential::uri`].
pub fn render_card_with_payload(
    credential: &Credential,
    payload: &str,
    options: &CardOptions,
) -> Result<Card> {
    let fonts = CardFonts::load(&options.fonts)?;
    let mut card = Card::new(options.layout).with_fonts(fonts);

    card.add_qr_code(payload)?;

    card.add_bold_text_line("SSID")?;
    card.add_text_line(&credential.ssid)?;

    card.add_text_line("")?;
    card.add_bold_text_line("Password")?;
    card.add_text_line(&credential.password)?;

    card.add_text_line("")?;
    match credential.encryption_type.card_label() {
        Some(label) => {
            card.add_bold_text_line("Encryption")?;
            card.add_text_line(label)?;
        }
        None => card.add_bold_text_line("No Encryption")?,
    }

    if options.draw_border {
        card.draw_border(options.layout.font_size);
    }

    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::qr::QrCodeIo;
    use image::DynamicImage;

    #[test]
    fn default_layout_geometry() {
        let layout = CardLayout::default();
        assert_eq!(layout.offset(), 65);
        assert_eq!(layout.qr_width(), 520);
        assert_eq!(layout.row_y(0), 650);
        assert_eq!(layout.row_y(3), 740);
    }

    #[test]
    fn new_card_is_white() {
        let card = Card::new(CardLayout::default());
        assert_eq!(card.image().dimensions(), (650, 1004));
        assert!(card.image().pixels().all(|p| *p == Rgb(card::WHITE)));
    }

    #[test]
    fn text_without_fonts_fails() {
        let mut card = Card::new(CardLayout::default());
        assert!(matches!(
            card.add_text_line("SSID"),
            Err(WifiCardError::FontUnavailable(_))
        ));
        assert_eq!(card.written_rows(), 0);
    }

    #[test]
    fn border_frames_the_canvas() {
        let mut card = Card::new(CardLayout::default());
        card.draw_border(30);
        let image = card.image();
        assert_eq!(image.get_pixel(0, 0), &Rgb(card::BLACK));
        assert_eq!(image.get_pixel(29, 500), &Rgb(card::BLACK));
        assert_eq!(image.get_pixel(649, 1003), &Rgb(card::BLACK));
        assert_eq!(image.get_pixel(30, 30), &Rgb(card::WHITE));
        assert_eq!(image.get_pixel(325, 970), &Rgb(card::WHITE));
    }

    #[test]
    fn placed_code_scans_back() {
        let mut card = Card::new(CardLayout::default());
        card.add_qr_code("WIFI:T:WPA;S:SSID;;").unwrap();
        card.draw_border(30);

        let decoded = QrCodeIo::decode(&DynamicImage::ImageRgb8(card.into_image())).unwrap();
        assert_eq!(decoded, "WIFI:T:WPA;S:SSID;;");
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        for ratio in [0.0, -0.5, 1.5, f32::NAN] {
            let layout = CardLayout {
                width_used_by_qr_image: ratio,
                ..CardLayout::default()
            };
            let mut card = Card::new(layout);
            assert!(
                matches!(card.add_qr_code("x"), Err(WifiCardError::InvalidLayout(_))),
                "ratio {ratio}"
            );
            assert!(card.image().pixels().all(|p| *p == Rgb(card::WHITE)));
        }
    }

    #[test]
    fn full_width_ratio_is_accepted() {
        let layout = CardLayout {
            width_used_by_qr_image: 1.0,
            ..CardLayout::default()
        };
        let mut card = Card::new(layout);
        card.add_qr_code("WIFI:T:WPA;S:SSID;;").unwrap();
        assert_eq!(card.layout().offset(), 0);
    }

    #[test]
    fn code_starts_at_offset() {
        let mut card = Card::new(CardLayout::default());
        card.add_qr_code("x").unwrap();
        let image = card.image();
        // Border-less code: the finder's corner sits exactly at the offset.
        assert_eq!(image.get_pixel(64, 64), &Rgb(card::WHITE));
        assert_eq!(image.get_pixel(65, 65), &Rgb(card::BLACK));
    }
}
