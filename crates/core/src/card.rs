// crates/core/src/card.rs
//! Shareable contact cards
//!
//! A card is a small versioned JSON payload, base64-encoded for embedding in
//! a URL query parameter. There is no integrity check; the `version` field is
//! read but not currently branched on.

use crate::error::{CoreError, CoreResult};
use crate::types::{Birthdate, GiftIdea, Person};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Current card payload version
pub const CARD_VERSION: u32 = 1;

/// The shareable subset of a person record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactCard {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<Birthdate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gift_ideas: Vec<GiftIdea>,
}

impl ContactCard {
    /// Builds a card from a person record
    pub fn from_person(person: &Person) -> Self {
        Self {
            version: CARD_VERSION,
            name: person.name.clone(),
            interests: person.interests.clone(),
            dislikes: person.dislikes.clone(),
            birthdate: person.birthdate.clone(),
            gift_ideas: person.gift_ideas.clone(),
        }
    }
}

/// Encodes a card as a URL-safe base64 string
pub fn encode_card(card: &ContactCard) -> CoreResult<String> {
    let json = serde_json::to_vec(card)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a card from a URL-safe base64 string
pub fn decode_card(encoded: &str) -> CoreResult<ContactCard> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| CoreError::InvalidCard(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| CoreError::InvalidCard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionGoal;

    #[test]
    fn test_card_roundtrip() {
        let mut person = Person::new("Alex", ConnectionGoal::new("call", 14));
        person.interests = vec!["climbing".to_string()];
        person.dislikes = vec!["surprises".to_string()];
        person.gift_ideas.push(GiftIdea::new("Chalk bag"));

        let card = ContactCard::from_person(&person);
        let encoded = encode_card(&card).unwrap();
        let decoded = decode_card(&encoded).unwrap();

        assert_eq!(decoded, card);
        assert_eq!(decoded.version, CARD_VERSION);
        assert_eq!(decoded.name, "Alex");
    }

    #[test]
    fn test_card_is_url_safe() {
        let card = ContactCard {
            version: CARD_VERSION,
            name: "Alex?&=".to_string(),
            interests: vec!["a/b".to_string(); 8],
            dislikes: Vec::new(),
            birthdate: None,
            gift_ideas: Vec::new(),
        };
        let encoded = encode_card(&card).unwrap();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_card("!!! not base64 !!!").is_err());

        // Valid base64 but not a card.
        let encoded = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        assert!(decode_card(&encoded).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_birthdate() {
        // A crafted card must fail at decode time, not later when the
        // birthdate is interpreted.
        let json = r#"{"version":1,"name":"Mallory","birthdate":"x"}"#;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        assert!(matches!(
            decode_card(&encoded),
            Err(CoreError::InvalidCard(_))
        ));
    }

    #[test]
    fn test_decode_reads_unknown_version() {
        // The version field is read but not branched on.
        let json = r#"{"version":99,"name":"Alex"}"#;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let card = decode_card(&encoded).unwrap();
        assert_eq!(card.version, 99);
        assert!(card.interests.is_empty());
    }
}
