use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Badge categories printed on a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BadgeType {
    Attendee,
    Speaker,
    Sponsor,
    Staff,
}

impl BadgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeType::Attendee => "ATTENDEE",
            BadgeType::Speaker => "SPEAKER",
            BadgeType::Sponsor => "SPONSOR",
            BadgeType::Staff => "STAFF",
        }
    }
}

impl fmt::Display for BadgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BadgeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ATTENDEE" => Ok(BadgeType::Attendee),
            "SPEAKER" => Ok(BadgeType::Speaker),
            "SPONSOR" => Ok(BadgeType::Sponsor),
            "STAFF" => Ok(BadgeType::Staff),
            other => Err(format!(
                "unknown badge type '{}', expected ATTENDEE, SPEAKER, SPONSOR or STAFF",
                other
            )),
        }
    }
}

/// Ticket category as returned by the event API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketType {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Raw ticket. Fields the badges don't need are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub token: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Normalized record handed to badge rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    pub firstname: String,
    pub lastname: String,
    pub token: String,
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
}

/// Remote `type.id` values for each badge category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeIds {
    pub attendee: String,
    pub speaker: String,
    pub sponsor: String,
    pub staff: String,
}

/// Forced category per ticket token. `None` keeps the derived category.
pub type Exceptions = HashMap<String, Option<BadgeType>>;

/// Name override per ticket token, as `(firstname, lastname)`.
pub type Corrections = HashMap<String, (String, String)>;

#[derive(Debug, Clone)]
pub struct RenderedBadge {
    pub record: BadgeRecord,
    pub barcode_file: String,
    pub barcode_png: Vec<u8>,
    pub badge_file: String,
    pub badge_svg: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for type id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_accepts_numeric_type_id() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "token": "A",
            "type": {"id": 6343, "name": "Conference"},
            "firstname": "Jo",
            "lastname": null,
            "email": "jo@example.com"
        }))
        .unwrap();

        assert_eq!(ticket.ticket_type.id, "6343");
        assert_eq!(ticket.firstname.as_deref(), Some("Jo"));
        assert_eq!(ticket.lastname, None);
        assert_eq!(ticket.extra.get("email").unwrap(), "jo@example.com");
    }

    #[test]
    fn test_badge_type_names() {
        assert_eq!("staff".parse::<BadgeType>().unwrap(), BadgeType::Staff);
        assert!("VIP".parse::<BadgeType>().is_err());

        let record = BadgeRecord {
            firstname: "Jo".to_string(),
            lastname: "X".to_string(),
            token: "A".to_string(),
            badge_type: BadgeType::Attendee,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"firstname": "Jo", "lastname": "X", "token": "A", "type": "ATTENDEE"})
        );
    }
}
