//! Constants for the `WIFI:` payload grammar and the printed card.
//!
//! Field tags follow the Wi-Fi Alliance QR code grammar:
//!
//! ```text
//! WIFI-qr = "WIFI:" [type ";"] [trdisable ";"] ssid ";" [hidden ";"]
//!           [id ";"] [password ";"] [public-key ";"] ";"
//! ```

/// Payload field tags, in emission order.
pub mod uri_field {
    pub const PREFIX: &str = "WIFI:";
    pub const TYPE: &str = "T:";
    pub const TRANSITION_DISABLE: &str = "R:";
    pub const SSID: &str = "S:";
    pub const HIDDEN: &str = "H:true";
    pub const ID: &str = "I:";
    pub const PASSWORD: &str = "P:";
    pub const PUBLIC_KEY: &str = "K:";
    pub const SEPARATOR: char = ';';
}

/// Wire labels for the `T:` field.
pub mod encryption_label {
    pub const WPA: &str = "WPA";
    pub const WEP: &str = "WEP";
    pub const OPEN: &str = "No encryption";
}

/// Characters that must be percent-encoded inside a field value.
pub const RESERVED_CHARS: [char; 5] = ['%', ';', ':', ',', '\\'];

/// QR rendering defaults.
pub mod qr {
    /// Pixels per module for standalone PNG/ASCII output.
    pub const DEFAULT_BOX_SIZE: u32 = 3;
    /// Pixels per module when the code is placed on a card (scaled later).
    pub const CARD_BOX_SIZE: u32 = 5;
    /// Quiet zone when the code is placed on a card.
    pub const CARD_BORDER: u32 = 0;
}

/// Card geometry.
///
/// 650 x 1004 pixels matches a 5.5 cm x 8.5 cm card.
pub mod card {
    pub const WIDTH: u32 = 650;
    pub const HEIGHT: u32 = 1004;
    pub const FONT_SIZE: u32 = 30;
    pub const WIDTH_USED_BY_QR_IMAGE: f32 = 0.8;
    pub const BLACK: [u8; 3] = [0, 0, 0];
    pub const WHITE: [u8; 3] = [255, 255, 255];
}
