//! A Rust library for sharing Wi-Fi credentials as QR codes.
//!
//! This crate turns a network's credentials into the `WIFI:` payload that
//! phone cameras understand, renders it as a QR code, and checks that the
//! rendered image scans back to the same text:
//!
//! - Building credentials for WPA, WEP and open networks
//! - Serializing them to the canonical `WIFI:...;;` payload
//! - Writing QR codes as PNG rasters or ASCII text
//! - Decoding QR images with explicit zero/one/many discrimination
//! - Composing a printable card with the code and its labels
//!
//! # Example
//!
//! ```no_run
//! use wifi_card::{Credential, EncryptionType, QrCodeIo};
//!
//! # fn example() -> wifi_card::Result<()> {
//! let credential = Credential::new("HomeNetwork")
//!     .with_encryption_type(EncryptionType::Wpa)
//!     .with_password("correct horse");
//!
//! let payload = credential.uri()?;
//! assert_eq!(payload, "WIFI:T:WPA;S:HomeNetwork;P:correct horse;;");
//!
//! let io = QrCodeIo::default();
//! io.write_png(&payload, "home.png", 3, None)?;
//! assert_eq!(QrCodeIo::decode_file("home.png")?, payload);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T, WifiCardError>`. Detection
//! failures are distinct variants so callers can tell an empty image from
//! an ambiguous one.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade. To see log
//! output, add a logging implementation like `env_logger`.

// Internal implementation modules
mod types;
mod util;

// Public API modules
pub mod api;
pub mod core;

// Re-exported public API
pub use crate::api::models::{Credential, EncryptionType, Warning, WifiCardError};
pub use crate::core::card::{
    Card, CardLayout, CardOptions, render_card, render_card_with_payload,
};
pub use crate::core::qr::{Detection, QrCodeIo, QrMatrix};
pub use crate::core::uri::{Encoded, encode, escape_value};
pub use crate::core::verify::{PayloadSource, same_payload, verify_round_trip};
pub use crate::util::fonts::{CardFonts, FontConfig};

/// A specialized `Result` type for credential encoding and QR operations.
pub type Result<T> = std::result::Result<T, WifiCardError>;
