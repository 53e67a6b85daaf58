//! Expiration triage for cart and bag dates.
//!
//! Every status in the crate comes from [`ExpirationStatus::for_date`] so the
//! list badges, the summary line and the `--status` filter always agree.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entity::CodeCartItem;

pub const DEFAULT_URGENT_DAYS: i64 = 7;
pub const DEFAULT_SOON_DAYS: i64 = 30;

/// Day-count boundaries between the status bands.
///
/// * expired: days < 0
/// * urgent: 0 <= days <= `urgent_days`
/// * expiring soon: `urgent_days` < days <= `soon_days`
/// * good: days > `soon_days`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub urgent_days: i64,
    pub soon_days: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            urgent_days: DEFAULT_URGENT_DAYS,
            soon_days: DEFAULT_SOON_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpirationStatus {
    Expired,
    Urgent,
    ExpiringSoon,
    Good,
    Na,
}

impl ExpirationStatus {
    pub const ALL: [ExpirationStatus; 5] = [
        ExpirationStatus::Expired,
        ExpirationStatus::Urgent,
        ExpirationStatus::ExpiringSoon,
        ExpirationStatus::Good,
        ExpirationStatus::Na,
    ];

    pub fn for_date(
        date: Option<NaiveDate>,
        today: NaiveDate,
        thresholds: &StatusThresholds,
    ) -> Self {
        let Some(date) = date else {
            return ExpirationStatus::Na;
        };

        let days = days_until(date, today);
        if days < 0 {
            ExpirationStatus::Expired
        } else if days <= thresholds.urgent_days {
            ExpirationStatus::Urgent
        } else if days <= thresholds.soon_days {
            ExpirationStatus::ExpiringSoon
        } else {
            ExpirationStatus::Good
        }
    }

    /// Status of an ISO `YYYY-MM-DD` string. Blank or unparseable input is
    /// treated like a missing date.
    pub fn for_str(date: Option<&str>, today: NaiveDate, thresholds: &StatusThresholds) -> Self {
        Self::for_date(date.and_then(parse_date), today, thresholds)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpirationStatus::Expired => "EXPIRED",
            ExpirationStatus::Urgent => "URGENT",
            ExpirationStatus::ExpiringSoon => "EXPIRING SOON",
            ExpirationStatus::Good => "GOOD",
            ExpirationStatus::Na => "N/A",
        }
    }
}

impl std::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationStatus::Expired => write!(f, "expired"),
            ExpirationStatus::Urgent => write!(f, "urgent"),
            ExpirationStatus::ExpiringSoon => write!(f, "expiring_soon"),
            ExpirationStatus::Good => write!(f, "good"),
            ExpirationStatus::Na => write!(f, "na"),
        }
    }
}

impl std::str::FromStr for ExpirationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "expired" => Ok(ExpirationStatus::Expired),
            "urgent" => Ok(ExpirationStatus::Urgent),
            "expiring_soon" | "expiringsoon" | "soon" => Ok(ExpirationStatus::ExpiringSoon),
            "good" => Ok(ExpirationStatus::Good),
            "na" | "n/a" | "none" => Ok(ExpirationStatus::Na),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Whole calendar days from `today` until `date`; negative once past.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The local calendar date. The only place the crate reads the clock for
/// status purposes; everything else takes `today` as a parameter.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Both per-field statuses of an item, drug first.
pub fn item_statuses(
    item: &CodeCartItem,
    today: NaiveDate,
    thresholds: &StatusThresholds,
) -> (ExpirationStatus, ExpirationStatus) {
    (
        ExpirationStatus::for_date(item.data.drug_expiration_date, today, thresholds),
        ExpirationStatus::for_date(item.data.supply_expiration_date, today, thresholds),
    )
}

/// The most pressing of an item's two statuses.
pub fn worst_status(
    item: &CodeCartItem,
    today: NaiveDate,
    thresholds: &StatusThresholds,
) -> ExpirationStatus {
    let (drug, supply) = item_statuses(item, today, thresholds);
    drug.min(supply)
}

/// Per-status counts over every date field in a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub expired: usize,
    pub urgent: usize,
    pub expiring_soon: usize,
    pub good: usize,
    pub na: usize,
}

impl StatusSummary {
    pub fn collect(items: &[CodeCartItem], today: NaiveDate, thresholds: &StatusThresholds) -> Self {
        let mut summary = Self::default();
        for item in items {
            let (drug, supply) = item_statuses(item, today, thresholds);
            summary.record(drug);
            summary.record(supply);
        }
        summary
    }

    fn record(&mut self, status: ExpirationStatus) {
        match status {
            ExpirationStatus::Expired => self.expired += 1,
            ExpirationStatus::Urgent => self.urgent += 1,
            ExpirationStatus::ExpiringSoon => self.expiring_soon += 1,
            ExpirationStatus::Good => self.good += 1,
            ExpirationStatus::Na => self.na += 1,
        }
    }

    pub fn needs_attention(&self) -> usize {
        self.expired + self.urgent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CartType, ItemData};
    use chrono::{Duration, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn status_in(days: i64) -> ExpirationStatus {
        let today = day(2025, 6, 1);
        ExpirationStatus::for_date(
            Some(today + Duration::days(days)),
            today,
            &StatusThresholds::default(),
        )
    }

    #[test]
    fn test_past_dates_are_expired() {
        assert_eq!(status_in(-1), ExpirationStatus::Expired);
        assert_eq!(status_in(-365), ExpirationStatus::Expired);
    }

    #[test]
    fn test_missing_date_is_na() {
        let today = day(2025, 6, 1);
        let t = StatusThresholds::default();
        assert_eq!(ExpirationStatus::for_date(None, today, &t), ExpirationStatus::Na);
        assert_eq!(ExpirationStatus::for_str(None, today, &t), ExpirationStatus::Na);
        assert_eq!(ExpirationStatus::for_str(Some(""), today, &t), ExpirationStatus::Na);
        assert_eq!(
            ExpirationStatus::for_str(Some("not-a-date"), today, &t),
            ExpirationStatus::Na
        );
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(status_in(0), ExpirationStatus::Urgent);
        assert_eq!(status_in(DEFAULT_URGENT_DAYS), ExpirationStatus::Urgent);
        assert_eq!(status_in(DEFAULT_URGENT_DAYS + 1), ExpirationStatus::ExpiringSoon);
        assert_eq!(status_in(DEFAULT_SOON_DAYS), ExpirationStatus::ExpiringSoon);
        assert_eq!(status_in(DEFAULT_SOON_DAYS + 1), ExpirationStatus::Good);
    }

    #[test]
    fn test_custom_thresholds() {
        let today = day(2025, 6, 1);
        let t = StatusThresholds {
            urgent_days: 2,
            soon_days: 5,
        };
        let in_days = |n| ExpirationStatus::for_date(Some(today + Duration::days(n)), today, &t);
        assert_eq!(in_days(3), ExpirationStatus::ExpiringSoon);
        assert_eq!(in_days(6), ExpirationStatus::Good);
    }

    #[test]
    fn test_for_str_parses_iso_dates() {
        let today = day(2025, 6, 1);
        let t = StatusThresholds::default();
        assert_eq!(
            ExpirationStatus::for_str(Some("2025-05-31"), today, &t),
            ExpirationStatus::Expired
        );
        assert_eq!(
            ExpirationStatus::for_str(Some(" 2025-12-31 "), today, &t),
            ExpirationStatus::Good
        );
    }

    #[test]
    fn test_days_until_crosses_months() {
        assert_eq!(days_until(day(2025, 3, 1), day(2025, 2, 27)), 2);
        assert_eq!(days_until(day(2025, 2, 27), day(2025, 3, 1)), -2);
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in ExpirationStatus::ALL {
            assert_eq!(status.to_string().parse::<ExpirationStatus>().unwrap(), status);
        }
        assert!("rotten".parse::<ExpirationStatus>().is_err());
    }

    #[test]
    fn test_worst_status_and_summary() {
        let today = day(2025, 6, 1);
        let t = StatusThresholds::default();
        let item = CodeCartItem::new(
            ItemData {
                identifier: "CC-1".to_string(),
                cart_type: CartType::CodeCart,
                location: "ICU".to_string(),
                employee_initials: "AB".to_string(),
                drug_expiration_date: Some(day(2025, 5, 1)),
                supply_expiration_date: None,
            },
            Utc::now(),
        );

        assert_eq!(worst_status(&item, today, &t), ExpirationStatus::Expired);

        let summary = StatusSummary::collect(&[item], today, &t);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.na, 1);
        assert_eq!(summary.needs_attention(), 1);
    }
}
