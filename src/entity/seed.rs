//! Bootstrap records shown on a fresh install.
//!
//! The set covers every status category so a new user sees what each badge
//! looks like. Dates are relative to `today` and entry timestamps lie in the
//! past relative to `now`.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{CartType, CodeCartItem, ItemData};

struct Example {
    identifier: &'static str,
    cart_type: CartType,
    location: &'static str,
    initials: &'static str,
    drug_in_days: Option<i64>,
    supply_in_days: Option<i64>,
    entered_days_ago: i64,
}

const EXAMPLES: &[Example] = &[
    Example {
        identifier: "CC-EXPIRED",
        cart_type: CartType::CodeCart,
        location: "STORAGE ROOM A (OLD)",
        initials: "SYS",
        drug_in_days: Some(-30),
        supply_in_days: Some(-15),
        entered_days_ago: 100,
    },
    Example {
        identifier: "PB-URGENT",
        cart_type: CartType::PBag,
        location: "ER BAY 5",
        initials: "RNX",
        drug_in_days: Some(5),
        supply_in_days: Some(30),
        entered_days_ago: 5,
    },
    Example {
        identifier: "CC-SOON",
        cart_type: CartType::CodeCart,
        location: "ICU ROOM 102",
        initials: "MDT",
        drug_in_days: Some(120),
        supply_in_days: Some(10),
        entered_days_ago: 2,
    },
    Example {
        identifier: "PB-GOOD",
        cart_type: CartType::PBag,
        location: "PEDIATRIC WARD SUPPLY",
        initials: "JDS",
        drug_in_days: Some(180),
        supply_in_days: Some(200),
        entered_days_ago: 1,
    },
    Example {
        identifier: "CC-URGENT-SUPPLY",
        cart_type: CartType::CodeCart,
        location: "OR PREP AREA",
        initials: "SRG",
        drug_in_days: Some(45),
        supply_in_days: Some(2),
        entered_days_ago: 7,
    },
    Example {
        identifier: "CC-NO-DRUG-EXP",
        cart_type: CartType::CodeCart,
        location: "TRAINING ROOM 1",
        initials: "EDU",
        drug_in_days: None,
        supply_in_days: Some(300),
        entered_days_ago: 15,
    },
];

/// Build the example collection, newest entry first.
pub fn example_items(today: NaiveDate, now: DateTime<Utc>) -> Vec<CodeCartItem> {
    let offset = |days: i64| today + Duration::days(days);

    let mut items: Vec<CodeCartItem> = EXAMPLES
        .iter()
        .map(|ex| {
            let data = ItemData {
                identifier: ex.identifier.to_string(),
                cart_type: ex.cart_type,
                location: ex.location.to_string(),
                employee_initials: ex.initials.to_string(),
                drug_expiration_date: ex.drug_in_days.map(offset),
                supply_expiration_date: ex.supply_in_days.map(offset),
            };
            CodeCartItem::new(data, now - Duration::days(ex.entered_days_ago))
        })
        .collect();

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_sorted_newest_first() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let items = example_items(today, Utc::now());

        assert_eq!(items.len(), 6);
        assert_eq!(items[0].data.identifier, "PB-GOOD");
        assert_eq!(items[5].data.identifier, "CC-EXPIRED");
        assert!(items.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_seed_dates_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let items = example_items(today, Utc::now());
        let expired = items
            .iter()
            .find(|i| i.data.identifier == "CC-EXPIRED")
            .unwrap();

        assert_eq!(
            expired.data.drug_expiration_date,
            NaiveDate::from_ymd_opt(2025, 5, 2)
        );
    }
}
