use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::status::parse_date;

/// Kind of tracked container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CartType {
    #[default]
    #[serde(rename = "Code Cart")]
    CodeCart,
    #[serde(rename = "P-Bag")]
    PBag,
}

impl std::fmt::Display for CartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartType::CodeCart => write!(f, "Code Cart"),
            CartType::PBag => write!(f, "P-Bag"),
        }
    }
}

impl std::str::FromStr for CartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "codecart" | "cart" | "cc" => Ok(CartType::CodeCart),
            "pbag" | "bag" | "pb" => Ok(CartType::PBag),
            _ => Err(format!("Invalid cart type: {}", s)),
        }
    }
}

/// Editable fields of an item, i.e. everything the add/edit form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub identifier: String,
    pub cart_type: CartType,
    pub location: String,
    pub employee_initials: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub drug_expiration_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub supply_expiration_date: Option<NaiveDate>,
}

/// `null`, a missing field and `""` all mean "no date".
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
    }
}

impl ItemData {
    /// Apply the storage normalization rules: location is uppercased and
    /// an empty location becomes "N/A".
    pub fn normalized(mut self) -> Self {
        self.location = normalize_location(&self.location);
        self
    }
}

/// A tracked code cart or P-bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCartItem {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: ItemData,
    pub created_at: DateTime<Utc>,
}

impl CodeCartItem {
    pub fn new(data: ItemData, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: data.normalized(),
            created_at,
        }
    }

    /// First seven characters of the id, for display and CLI lookups.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..7].to_string()
    }
}

pub fn normalize_location(location: &str) -> String {
    if location.is_empty() {
        "N/A".to_string()
    } else {
        location.to_uppercase()
    }
}
