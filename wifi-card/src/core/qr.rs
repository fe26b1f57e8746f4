//! QR code generation and detection.
//!
//! Generation goes through the `qrcode` crate at the highest error
//! correction level; detection goes through `rqrr`, which only recognises
//! QR symbology. Both raster and text output use the `qrcode` renderer
//! with the matrix's own module size and quiet zone.

use image::{DynamicImage, ImageError, ImageFormat, Rgb, RgbImage};
use log::debug;
use qrcode::render::{Renderer, unicode::Dense1x2};
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::path::Path;

use crate::Result;
use crate::api::models::WifiCardError;
use crate::types::constants::{card, qr};

/// Default pixels per module for standalone PNG output.
pub const DEFAULT_BOX_SIZE: u32 = qr::DEFAULT_BOX_SIZE;

/// A generated QR code together with its raster geometry.
///
/// `box_size` is the number of pixels per module, `border` the quiet zone
/// in modules.
pub struct QrMatrix {
    code: QrCode,
    box_size: u32,
    border: u32,
}

impl QrMatrix {
    /// Generates the smallest QR code that holds `payload`.
    ///
    /// Error correction is always level H. When `border` is `None` it
    /// defaults to half the box size (rounded down). A zero box size is
    /// treated as one pixel per module.
    ///
    /// # Errors
    ///
    /// Returns [`WifiCardError::QrEncode`] if the payload does not fit in
    /// any QR version.
    pub fn generate(payload: &str, box_size: u32, border: Option<u32>) -> Result<Self> {
        let box_size = box_size.max(1);
        let border = border.unwrap_or(box_size / 2);
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;

        debug!(
            "Generated QR code: {} modules, version {:?}, box {box_size}px, border {border}",
            code.width(),
            code.version()
        );

        Ok(Self {
            code,
            box_size,
            border,
        })
    }

    /// Number of modules per side, without the border.
    pub fn modules(&self) -> u32 {
        self.code.width() as u32
    }

    /// Pixels per module.
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Quiet zone in modules.
    pub fn border(&self) -> u32 {
        self.border
    }

    /// Side length of the rendered image in pixels.
    pub fn pixel_width(&self) -> u32 {
        (self.modules() + 2 * self.border) * self.box_size
    }

    /// Renders the code as an RGB raster.
    pub fn to_image(&self, fill: Rgb<u8>, back: Rgb<u8>) -> RgbImage {
        let colors = self.code.to_colors();
        Renderer::<Rgb<u8>>::new(&colors, self.code.width(), self.border)
            .module_dimensions(self.box_size, self.box_size)
            .dark_color(fill)
            .light_color(back)
            .build()
    }

    /// Renders the code as text, two module rows per line.
    ///
    /// Uses `█`, `▀`, `▄` and space, so dark modules print as filled
    /// blocks. The box size does not apply to text output.
    pub fn to_ascii(&self) -> String {
        let colors = self.code.to_colors();
        let mut out = Renderer::<Dense1x2>::new(&colors, self.code.width(), self.border)
            .module_dimensions(1, 1)
            .build();
        out.push('\n');
        out
    }
}

/// Result of looking for QR codes in an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Exactly one code, with its decoded text.
    Found(String),
    /// No code in the image.
    NotFound,
    /// More than one code; holds the count.
    ///
    /// Every located finder grid counts, including one whose data cannot
    /// be read, so a readable code next to a damaged one is `Multiple(2)`.
    Multiple(usize),
}

/// Reads and writes single QR codes.
///
/// Colors apply to PNG output only. A light foreground on a dark or
/// transparent background will not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrCodeIo {
    /// Dark module color
    pub fill: Rgb<u8>,
    /// Light module and quiet zone color
    pub back: Rgb<u8>,
}

impl Default for QrCodeIo {
    /// Black modules on white.
    fn default() -> Self {
        Self {
            fill: Rgb(card::BLACK),
            back: Rgb(card::WHITE),
        }
    }
}

impl QrCodeIo {
    /// Creates an adapter with custom colors.
    pub fn new(fill: Rgb<u8>, back: Rgb<u8>) -> Self {
        Self { fill, back }
    }

    /// Renders `payload` as a QR raster.
    pub fn encode(&self, payload: &str, box_size: u32, border: Option<u32>) -> Result<RgbImage> {
        let matrix = QrMatrix::generate(payload, box_size, border)?;
        Ok(matrix.to_image(self.fill, self.back))
    }

    /// Writes `payload` as a QR code PNG to `path`.
    pub fn write_png(
        &self,
        payload: &str,
        path: impl AsRef<Path>,
        box_size: u32,
        border: Option<u32>,
    ) -> Result<()> {
        let path = path.as_ref();
        let image = self.encode(payload, box_size, border)?;
        image.save_with_format(path, ImageFormat::Png)?;
        debug!("Wrote QR code PNG to {}", path.display());
        Ok(())
    }

    /// Writes `payload` as a text QR code to `path`.
    pub fn write_txt(
        payload: &str,
        path: impl AsRef<Path>,
        box_size: u32,
        border: Option<u32>,
    ) -> Result<()> {
        let path = path.as_ref();
        let matrix = QrMatrix::generate(payload, box_size, border)?;
        fs::write(path, matrix.to_ascii())?;
        debug!("Wrote QR code text to {}", path.display());
        Ok(())
    }

    /// Looks for QR codes in `image` and decodes the only one, if any.
    ///
    /// # Errors
    ///
    /// Returns [`WifiCardError::QrDecode`] if exactly one code is found but
    /// its data cannot be read.
    pub fn detect(image: &DynamicImage) -> Result<Detection> {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                luma.get_pixel(x as u32, y as u32).0[0]
            });
        let grids = prepared.detect_grids();
        debug!("Detected {} QR grid(s) in {width}x{height} image", grids.len());

        match grids.as_slice() {
            [] => Ok(Detection::NotFound),
            [grid] => {
                let (_meta, content) = grid
                    .decode()
                    .map_err(|e| WifiCardError::QrDecode(e.to_string()))?;
                Ok(Detection::Found(content))
            }
            many => Ok(Detection::Multiple(many.len())),
        }
    }

    /// Decodes the single QR code in `image`.
    ///
    /// # Errors
    ///
    /// - [`WifiCardError::NoCodeFound`] if the image holds no code
    /// - [`WifiCardError::MultipleCodesFound`] if it holds more than one
    pub fn decode(image: &DynamicImage) -> Result<String> {
        match Self::detect(image)? {
            Detection::Found(content) => Ok(content),
            Detection::NotFound => Err(WifiCardError::NoCodeFound),
            Detection::Multiple(count) => Err(WifiCardError::MultipleCodesFound(count)),
        }
    }

    /// Loads the image at `path` and decodes its single QR code.
    pub fn decode_file(path: impl AsRef<Path>) -> Result<String> {
        let image = load_image(path.as_ref())?;
        Self::decode(&image)
    }
}

/// Opens a raster image, reporting file access failures as plain I/O errors.
pub(crate) fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| match e {
        ImageError::IoError(io) => WifiCardError::Io(io),
        other => WifiCardError::Image(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_defaults_to_half_box_size() {
        let matrix = QrMatrix::generate("text", 4, None).unwrap();
        assert_eq!(matrix.border(), 2);
        let matrix = QrMatrix::generate("text", 3, None).unwrap();
        assert_eq!(matrix.border(), 1);
    }

    #[test]
    fn explicit_border_is_kept() {
        let matrix = QrMatrix::generate("text", 3, Some(0)).unwrap();
        assert_eq!(matrix.border(), 0);
        assert_eq!(matrix.pixel_width(), matrix.modules() * 3);
    }

    #[test]
    fn image_size_includes_border() {
        let matrix = QrMatrix::generate("text", 2, Some(4)).unwrap();
        let image = matrix.to_image(Rgb([0, 0, 0]), Rgb([255, 255, 255]));
        let expected = (matrix.modules() + 8) * 2;
        assert_eq!(image.dimensions(), (expected, expected));
        // Quiet zone is light, top-left finder is dark.
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(8, 8), &Rgb([0, 0, 0]));
    }

    #[test]
    fn raster_follows_module_grid() {
        let matrix = QrMatrix::generate("WIFI:T:WPA;S:SSID;;", 3, Some(2)).unwrap();
        let (fill, back) = (Rgb([10, 20, 30]), Rgb([240, 230, 220]));
        let image = matrix.to_image(fill, back);
        assert_eq!(image.width(), matrix.pixel_width());

        let colors = matrix.code.to_colors();
        let modules = matrix.modules();
        for my in 0..modules {
            for mx in 0..modules {
                let expected = match colors[(my * modules + mx) as usize] {
                    qrcode::Color::Dark => fill,
                    qrcode::Color::Light => back,
                };
                // Sample the last pixel of each module box.
                let (px, py) = ((mx + 2) * 3 + 2, (my + 2) * 3 + 2);
                assert_eq!(image.get_pixel(px, py), &expected, "module ({mx}, {my})");
            }
        }
    }

    #[test]
    fn ascii_has_one_line_per_two_rows() {
        let matrix = QrMatrix::generate("text", 1, Some(1)).unwrap();
        let ascii = matrix.to_ascii();
        let span = matrix.modules() + 2;
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len() as u32, span.div_ceil(2));
        assert!(lines.iter().all(|l| l.chars().count() as u32 == span));
        // First line is the light border over the finder's top edge.
        assert!(lines[0].starts_with(" ▄▄▄"));
    }

    #[test]
    fn zero_box_size_is_clamped() {
        let matrix = QrMatrix::generate("text", 0, None).unwrap();
        assert_eq!(matrix.box_size(), 1);
        assert_eq!(matrix.border(), 0);
    }

    #[test]
    fn blank_image_has_no_code() {
        let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 120, Rgb([255, 255, 255])));
        assert_eq!(QrCodeIo::detect(&blank).unwrap(), Detection::NotFound);
        assert!(matches!(
            QrCodeIo::decode(&blank),
            Err(WifiCardError::NoCodeFound)
        ));
    }

    #[test]
    fn encode_then_detect() {
        let io = QrCodeIo::default();
        let image = io.encode("WIFI:T:WPA;S:SSID;;", 4, Some(4)).unwrap();
        let detection = QrCodeIo::detect(&DynamicImage::ImageRgb8(image)).unwrap();
        assert_eq!(detection, Detection::Found("WIFI:T:WPA;S:SSID;;".into()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("wifi-card-does-not-exist.png");
        assert!(matches!(
            QrCodeIo::decode_file(&path),
            Err(WifiCardError::Io(_))
        ));
    }
}
