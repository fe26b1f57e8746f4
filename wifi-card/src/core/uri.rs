//! `WIFI:` payload serializer.
//!
//! Fields are emitted in a fixed order; only their presence depends on the
//! credential. Values are written verbatim. Callers that need values with
//! reserved characters to survive a strict parser can pre-escape them with
//! [`escape_value`].

use std::borrow::Cow;
use std::fmt::Write;

use crate::Result;
use crate::api::models::{Credential, EncryptionType, Warning, WifiCardError};
use crate::types::constants::{RESERVED_CHARS, uri_field};

/// Output of [`encode`]: the payload plus any non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// The `WIFI:...;;` payload
    pub payload: String,
    /// Diagnostics raised while encoding
    pub warnings: Vec<Warning>,
}

/// Serializes a credential to its `WIFI:` payload.
///
/// # Errors
///
/// Returns [`WifiCardError::InvalidEncryptionType`] when the encryption type
/// is [`EncryptionType::Other`]. No output is produced in that case.
///
/// # Examples
///
/// ```rust
/// use wifi_card::{Credential, EncryptionType, Warning, encode};
///
/// let credential = Credential::new("SSID").with_encryption_type(EncryptionType::Wep);
/// let encoded = encode(&credential).unwrap();
///
/// assert_eq!(encoded.payload, "WIFI:T:WEP;S:SSID;;");
/// assert_eq!(encoded.warnings, vec![Warning::WeakEncryption]);
/// ```
pub fn encode(credential: &Credential) -> Result<Encoded> {
    let mut warnings = Vec::new();
    let encryption = validate_type(&credential.encryption_type, &mut warnings)?;

    let mut payload = String::from(uri_field::PREFIX);

    if !encryption.is_empty() {
        push_field(&mut payload, uri_field::TYPE, encryption);
    }
    if !credential.transition_disable.is_empty() {
        push_field(
            &mut payload,
            uri_field::TRANSITION_DISABLE,
            &credential.transition_disable,
        );
    }
    push_field(&mut payload, uri_field::SSID, &credential.ssid);
    if credential.hidden {
        push_field(&mut payload, uri_field::HIDDEN, "");
    }
    if !credential.id_printable.is_empty() {
        push_field(&mut payload, uri_field::ID, &credential.id_printable);
    }
    if !credential.password.is_empty() {
        push_field(&mut payload, uri_field::PASSWORD, &credential.password);
    }
    if !credential.public_key.is_empty() {
        push_field(&mut payload, uri_field::PUBLIC_KEY, &credential.public_key);
    }

    // Trailing empty segment
    payload.push(uri_field::SEPARATOR);

    Ok(Encoded { payload, warnings })
}

/// Percent-encodes the characters the payload grammar reserves.
///
/// `%`, `;`, `:`, `,` and `\` become `%XX` with upper-case hex digits.
/// Values without reserved characters are returned borrowed.
///
/// ```rust
/// use wifi_card::escape_value;
///
/// assert_eq!(escape_value("plain"), "plain");
/// assert_eq!(escape_value("a;b:c"), "a%3Bb%3Ac");
/// ```
pub fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.contains(RESERVED_CHARS) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if RESERVED_CHARS.contains(&c) {
            // Reserved characters are all ASCII.
            let _ = write!(escaped, "%{:02X}", c as u32);
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

fn validate_type<'a>(
    encryption_type: &'a EncryptionType,
    warnings: &mut Vec<Warning>,
) -> Result<&'a str> {
    match encryption_type {
        EncryptionType::Other(label) => Err(WifiCardError::InvalidEncryptionType(label.clone())),
        EncryptionType::Wep => {
            warnings.push(Warning::WeakEncryption);
            Ok(encryption_type.as_str())
        }
        EncryptionType::Wpa | EncryptionType::Open => Ok(encryption_type.as_str()),
    }
}

fn push_field(payload: &mut String, tag: &str, value: &str) {
    payload.push_str(tag);
    payload.push_str(value);
    payload.push(uri_field::SEPARATOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(credential: &Credential) -> String {
        encode(credential).unwrap().payload
    }

    #[test]
    fn only_ssid() {
        assert_eq!(payload(&Credential::new("SSID")), "WIFI:T:WPA;S:SSID;;");
    }

    #[test]
    fn each_valid_type_with_only_ssid() {
        for t in [EncryptionType::Wpa, EncryptionType::Wep, EncryptionType::Open] {
            let credential = Credential::new("net").with_encryption_type(t.clone());
            assert_eq!(payload(&credential), format!("WIFI:T:{t};S:net;;"));
        }
    }

    #[test]
    fn open_uses_label() {
        let credential = Credential::new("SSID").with_encryption_type(EncryptionType::Open);
        assert_eq!(payload(&credential), "WIFI:T:No encryption;S:SSID;;");
    }

    #[test]
    fn transition_disable_follows_type() {
        let credential = Credential::new("SSID").with_transition_disable("trhex");
        assert_eq!(payload(&credential), "WIFI:T:WPA;R:trhex;S:SSID;;");
    }

    #[test]
    fn hidden_precedes_id() {
        let credential = Credential::new("SSID").with_hidden(true).with_id_printable("ID");
        assert_eq!(payload(&credential), "WIFI:T:WPA;S:SSID;H:true;I:ID;;");
    }

    #[test]
    fn id_precedes_password() {
        let credential = Credential::new("SSID")
            .with_hidden(true)
            .with_id_printable("id")
            .with_password("pw");
        assert_eq!(payload(&credential), "WIFI:T:WPA;S:SSID;H:true;I:id;P:pw;;");
    }

    #[test]
    fn password_precedes_public_key() {
        let credential = Credential::new("SSID")
            .with_id_printable("id")
            .with_password("passwd")
            .with_public_key("key");
        assert_eq!(payload(&credential), "WIFI:T:WPA;S:SSID;I:id;P:passwd;K:key;;");
    }

    #[test]
    fn public_key_without_id() {
        let credential = Credential::new("SSID")
            .with_password("passwd")
            .with_public_key("key");
        assert_eq!(payload(&credential), "WIFI:T:WPA;S:SSID;P:passwd;K:key;;");
    }

    #[test]
    fn all_fields() {
        let credential = Credential {
            ssid: "net".into(),
            encryption_type: EncryptionType::Wpa,
            password: "pw".into(),
            hidden: true,
            transition_disable: "1".into(),
            id_printable: "id".into(),
            public_key: "AAAA".into(),
        };
        assert_eq!(
            payload(&credential),
            "WIFI:T:WPA;R:1;S:net;H:true;I:id;P:pw;K:AAAA;;"
        );
    }

    #[test]
    fn wep_warns_but_serializes() {
        let credential = Credential::new("SSID").with_encryption_type(EncryptionType::Wep);
        let encoded = encode(&credential).unwrap();
        assert_eq!(encoded.payload, "WIFI:T:WEP;S:SSID;;");
        assert_eq!(encoded.warnings, vec![Warning::WeakEncryption]);
    }

    #[test]
    fn wpa_has_no_warnings() {
        assert!(encode(&Credential::new("SSID")).unwrap().warnings.is_empty());
    }

    #[test]
    fn invalid_type_is_rejected() {
        let credential = Credential::new("SSID")
            .with_encryption_type("WPA3")
            .with_password("pw")
            .with_hidden(true);
        match encode(&credential) {
            Err(WifiCardError::InvalidEncryptionType(label)) => assert_eq!(label, "WPA3"),
            other => panic!("expected InvalidEncryptionType, got {other:?}"),
        }
    }

    #[test]
    fn empty_label_is_rejected() {
        let credential = Credential::new("SSID").with_encryption_type("");
        assert!(matches!(
            encode(&credential),
            Err(WifiCardError::InvalidEncryptionType(_))
        ));
    }

    #[test]
    fn values_are_not_escaped() {
        let credential = Credential::new("a;b").with_password("p:w");
        assert_eq!(payload(&credential), "WIFI:T:WPA;S:a;b;P:p:w;;");
    }

    #[test]
    fn escape_reserved_characters() {
        assert_eq!(escape_value(r"a\b,c%"), "a%5Cb%2Cc%25");
        assert_eq!(escape_value("Café"), "Café");
        assert!(matches!(escape_value("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn encoding_is_deterministic() {
        let credential = Credential::new("SSID").with_password("pw");
        assert_eq!(encode(&credential).unwrap(), encode(&credential).unwrap());
    }
}
