//! Encoding, QR handling and card composition.

pub mod card;
pub mod qr;
pub mod uri;
pub mod verify;
