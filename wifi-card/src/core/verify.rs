//! Round-trip verification of QR payloads.
//!
//! A payload source is either known text or something to decode. Comparing
//! two sources answers "do these images carry the same code?" and "does this
//! freshly written image scan back to what we put in?".

use image::DynamicImage;
use log::debug;
use std::borrow::Cow;
use std::path::Path;

use crate::Result;
use crate::api::models::WifiCardError;
use crate::core::qr::QrCodeIo;

/// Something that resolves to a payload string.
#[derive(Debug, Clone, Copy)]
pub enum PayloadSource<'a> {
    /// The payload itself
    Text(&'a str),
    /// An image holding exactly one QR code
    Image(&'a DynamicImage),
    /// A file holding exactly one QR code
    File(&'a Path),
}

impl<'a> PayloadSource<'a> {
    /// Resolves the source to its payload, decoding if needed.
    pub fn resolve(self) -> Result<Cow<'a, str>> {
        match self {
            PayloadSource::Text(text) => Ok(Cow::Borrowed(text)),
            PayloadSource::Image(image) => QrCodeIo::decode(image).map(Cow::Owned),
            PayloadSource::File(path) => QrCodeIo::decode_file(path).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a str> for PayloadSource<'a> {
    fn from(text: &'a str) -> Self {
        PayloadSource::Text(text)
    }
}

impl<'a> From<&'a DynamicImage> for PayloadSource<'a> {
    fn from(image: &'a DynamicImage) -> Self {
        PayloadSource::Image(image)
    }
}

impl<'a> From<&'a Path> for PayloadSource<'a> {
    fn from(path: &'a Path) -> Self {
        PayloadSource::File(path)
    }
}

/// Returns `true` if both sources resolve to the same payload.
///
/// # Errors
///
/// Propagates decoding failures of either source, including
/// [`WifiCardError::NoCodeFound`] and [`WifiCardError::MultipleCodesFound`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use wifi_card::same_payload;
///
/// # fn example() -> wifi_card::Result<()> {
/// let same = same_payload(Path::new("a.png"), Path::new("b.png"))?;
/// let scans = same_payload("WIFI:T:WPA;S:SSID;;", Path::new("a.png"))?;
/// # Ok(())
/// # }
/// ```
pub fn same_payload<'a, 'b>(
    a: impl Into<PayloadSource<'a>>,
    b: impl Into<PayloadSource<'b>>,
) -> Result<bool> {
    let a = a.into().resolve()?;
    let b = b.into().resolve()?;
    Ok(a == b)
}

/// Decodes the image at `path` and checks it carries `expected`.
///
/// # Errors
///
/// Returns [`WifiCardError::PayloadMismatch`] if the decoded text differs,
/// or any decoding error.
pub fn verify_round_trip(expected: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let found = QrCodeIo::decode_file(path)?;
    if found != expected {
        return Err(WifiCardError::PayloadMismatch {
            expected: expected.to_string(),
            found,
        });
    }
    debug!("Round trip verified for {}", path.display());
    Ok(())
}
