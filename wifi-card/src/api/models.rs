use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::uri;
use crate::types::constants::encryption_label;

/// Encryption type advertised in the `T:` field of the payload.
///
/// Only [`Wpa`](EncryptionType::Wpa), [`Wep`](EncryptionType::Wep) and
/// [`Open`](EncryptionType::Open) can be serialized. Any other label coming
/// from text input is kept as [`Other`](EncryptionType::Other) so that a
/// credential can still be built; serialization then fails with
/// [`WifiCardError::InvalidEncryptionType`].
///
/// # Examples
///
/// ```rust
/// use wifi_card::EncryptionType;
///
/// assert_eq!(EncryptionType::from("WPA"), EncryptionType::Wpa);
/// assert_eq!(EncryptionType::Open.as_str(), "No encryption");
/// assert!(!EncryptionType::from("WPA3").is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EncryptionType {
    /// WPA/WPA2 personal.
    #[default]
    Wpa,
    /// WEP. Serializes, but with a [`Warning::WeakEncryption`].
    Wep,
    /// No encryption.
    Open,
    /// Unrecognised label.
    Other(String),
}

impl EncryptionType {
    /// Returns the label written after `T:` in the payload.
    pub fn as_str(&self) -> &str {
        match self {
            EncryptionType::Wpa => encryption_label::WPA,
            EncryptionType::Wep => encryption_label::WEP,
            EncryptionType::Open => encryption_label::OPEN,
            EncryptionType::Other(label) => label,
        }
    }

    /// Returns `true` for the three serializable types.
    pub fn is_valid(&self) -> bool {
        !matches!(self, EncryptionType::Other(_))
    }

    /// Human-readable label printed on a card, `None` for open networks.
    pub fn card_label(&self) -> Option<&'static str> {
        match self {
            EncryptionType::Wpa => Some("WPA/WPA2"),
            EncryptionType::Wep => Some("WEP"),
            EncryptionType::Open | EncryptionType::Other(_) => None,
        }
    }
}

impl From<&str> for EncryptionType {
    fn from(label: &str) -> Self {
        match label {
            encryption_label::WPA => EncryptionType::Wpa,
            encryption_label::WEP => EncryptionType::Wep,
            encryption_label::OPEN => EncryptionType::Open,
            other => EncryptionType::Other(other.to_string()),
        }
    }
}

impl From<String> for EncryptionType {
    fn from(label: String) -> Self {
        match EncryptionType::from(label.as_str()) {
            EncryptionType::Other(_) => EncryptionType::Other(label),
            known => known,
        }
    }
}

impl From<EncryptionType> for String {
    fn from(value: EncryptionType) -> Self {
        match value {
            EncryptionType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shareable credentials of one Wi-Fi network.
///
/// Fields are public and assigned without validation; checks happen when
/// the credential is serialized, so a half-built value is always legal.
/// Empty strings mean "omit this field".
///
/// # Examples
///
/// ```rust
/// use wifi_card::Credential;
///
/// let mut credential = Credential::new("SSID").with_hidden(true);
/// credential.id_printable = "ID".into();
///
/// assert_eq!(credential.uri().unwrap(), "WIFI:T:WPA;S:SSID;H:true;I:ID;;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credential {
    /// Network name
    pub ssid: String,
    /// Security type written to `T:`
    pub encryption_type: EncryptionType,
    /// Pre-shared key, written to `P:`
    pub password: String,
    /// Stealth SSID, written as `H:true`
    pub hidden: bool,
    /// Transition Disable bitmap as hex digits, written to `R:`
    pub transition_disable: String,
    /// SAE password identifier, written to `I:`
    pub id_printable: String,
    /// Base64 SAE-PK public key, written to `K:`
    pub public_key: String,
}

impl Credential {
    /// Creates a WPA credential for `ssid` with every other field empty.
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            ..Self::default()
        }
    }

    /// Sets the encryption type.
    #[must_use]
    pub fn with_encryption_type(mut self, encryption_type: impl Into<EncryptionType>) -> Self {
        self.encryption_type = encryption_type.into();
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Marks the SSID as hidden.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets the Transition Disable hex digits.
    #[must_use]
    pub fn with_transition_disable(mut self, value: impl Into<String>) -> Self {
        self.transition_disable = value.into();
        self
    }

    /// Sets the SAE password identifier.
    #[must_use]
    pub fn with_id_printable(mut self, id: impl Into<String>) -> Self {
        self.id_printable = id.into();
        self
    }

    /// Sets the SAE-PK public key from its base64 form.
    #[must_use]
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = key.into();
        self
    }

    /// Sets the SAE-PK public key from the DER of its SubjectPublicKeyInfo.
    ///
    /// The bytes are stored base64 encoded, as the `K:` field expects.
    #[must_use]
    pub fn with_public_key_der(mut self, der: &[u8]) -> Self {
        self.public_key = STANDARD.encode(der);
        self
    }

    /// Serializes the credential to its `WIFI:` payload.
    ///
    /// Warnings are forwarded to the `log` facade. Use
    /// [`encode`](crate::encode) to receive them as values instead.
    ///
    /// # Errors
    ///
    /// Returns [`WifiCardError::InvalidEncryptionType`] if the encryption
    /// type is not WPA, WEP or open.
    pub fn uri(&self) -> crate::Result<String> {
        let encoded = uri::encode(self)?;
        for warning in &encoded.warnings {
            warn!("{warning}");
        }
        Ok(encoded.payload)
    }
}

/// Non-fatal diagnostics raised while serializing a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// WEP was selected. The payload is produced, but WEP support in
    /// scanners is experimental and the network itself is weak.
    WeakEncryption,
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::WeakEncryption => {
                write!(f, "WEP support is experimental, the code may not scan correctly")
            }
        }
    }
}

/// Errors that can occur while encoding credentials or handling QR images.
///
/// # Examples
///
/// ```no_run
/// use wifi_card::{QrCodeIo, WifiCardError};
///
/// match QrCodeIo::decode_file("card.png") {
///     Ok(payload) => println!("{payload}"),
///     Err(WifiCardError::NoCodeFound) => eprintln!("no QR code in image"),
///     Err(WifiCardError::MultipleCodesFound(n)) => eprintln!("{n} codes, expected one"),
///     Err(e) => eprintln!("Error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum WifiCardError {
    /// The encryption type is not one of WPA, WEP or open.
    #[error("invalid encryption type {0:?}: expected one of WPA, WEP, No encryption")]
    InvalidEncryptionType(String),

    /// The image contains no QR code.
    #[error("cannot extract QR code from image")]
    NoCodeFound,

    /// The image contains more than one QR code.
    #[error("multiple QR codes found in image ({0})")]
    MultipleCodesFound(usize),

    /// A QR code was located but its contents could not be read.
    #[error("QR code could not be decoded: {0}")]
    QrDecode(String),

    /// The payload could not be turned into a QR code.
    #[error("QR code generation failed: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    /// Loading or saving a raster image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The card geometry cannot hold a QR code.
    #[error("invalid card layout: {0}")]
    InvalidLayout(String),

    /// No usable font was configured or discovered.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// A decoded image did not contain the expected payload.
    #[error("payload mismatch: expected {expected:?}, found {found:?}")]
    PayloadMismatch {
        /// Payload that was written
        expected: String,
        /// Payload read back
        found: String,
    },
}
