use chrono::NaiveDate;

use crate::entity::CodeCartItem;
use crate::status::{days_until, item_statuses, ExpirationStatus, StatusSummary, StatusThresholds};

/// Whether to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Plain,
    Ansi,
}

impl Palette {
    /// Colors when stdout is a terminal.
    pub fn detect() -> Self {
        if atty::is(atty::Stream::Stdout) {
            Palette::Ansi
        } else {
            Palette::Plain
        }
    }

    fn paint(&self, status: ExpirationStatus, text: &str) -> String {
        match self {
            Palette::Plain => text.to_string(),
            Palette::Ansi => {
                let code = match status {
                    ExpirationStatus::Expired => "1;31",
                    ExpirationStatus::Urgent => "1;33",
                    ExpirationStatus::ExpiringSoon => "33",
                    ExpirationStatus::Good => "32",
                    ExpirationStatus::Na => "2",
                };
                format!("\x1b[{}m{}\x1b[0m", code, text)
            }
        }
    }
}

/// A date with its status badge, e.g. `2025-06-04 [URGENT, 3d]`.
pub fn badge(
    date: Option<NaiveDate>,
    today: NaiveDate,
    thresholds: &StatusThresholds,
    palette: Palette,
) -> String {
    let status = ExpirationStatus::for_date(date, today, thresholds);
    let text = match date {
        Some(d) => {
            let days = days_until(d, today);
            let when = if days < 0 {
                format!("{}d ago", -days)
            } else {
                format!("{}d", days)
            };
            format!("{} [{}, {}]", d, status.label(), when)
        }
        None => format!("[{}]", status.label()),
    };
    palette.paint(status, &text)
}

pub fn render_item(
    item: &CodeCartItem,
    today: NaiveDate,
    thresholds: &StatusThresholds,
    palette: Palette,
) -> String {
    let d = &item.data;
    let mut out = format!(
        "  ({}) {} [{}] @ {}\n",
        item.short_id(),
        d.identifier,
        d.cart_type,
        d.location
    );
    out.push_str(&format!(
        "      drugs:    {}\n",
        badge(d.drug_expiration_date, today, thresholds, palette)
    ));
    out.push_str(&format!(
        "      supplies: {}\n",
        badge(d.supply_expiration_date, today, thresholds, palette)
    ));
    out.push_str(&format!(
        "      checked by {} on {}\n",
        d.employee_initials,
        item.created_at.format("%Y-%m-%d %H:%M")
    ));
    out
}

pub fn render_list(
    items: &[CodeCartItem],
    today: NaiveDate,
    thresholds: &StatusThresholds,
    palette: Palette,
) -> String {
    if items.is_empty() {
        return "No code carts or P-bags found. Add one with 'codecart add'.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        out.push_str(&render_item(item, today, thresholds, palette));
        out.push('\n');
    }
    out
}

/// One-line triage over both dates of every item.
pub fn render_summary(
    items: &[CodeCartItem],
    today: NaiveDate,
    thresholds: &StatusThresholds,
) -> String {
    let s = StatusSummary::collect(items, today, thresholds);
    let mut line = format!(
        "{} items: {} expired, {} urgent, {} expiring soon, {} good, {} n/a",
        items.len(),
        s.expired,
        s.urgent,
        s.expiring_soon,
        s.good,
        s.na
    );
    if s.needs_attention() > 0 {
        let flagged = items
            .iter()
            .filter(|item| {
                let (drug, supply) = item_statuses(item, today, thresholds);
                drug <= ExpirationStatus::Urgent || supply <= ExpirationStatus::Urgent
            })
            .count();
        line.push_str(&format!(" ({} need attention)", flagged));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{example_items, CartType, ItemData};
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_badge_plain() {
        let t = StatusThresholds::default();
        let soon = badge(Some(today() + Duration::days(3)), today(), &t, Palette::Plain);
        assert_eq!(soon, "2025-06-04 [URGENT, 3d]");

        let past = badge(Some(today() - Duration::days(2)), today(), &t, Palette::Plain);
        assert_eq!(past, "2025-05-30 [EXPIRED, 2d ago]");

        assert_eq!(badge(None, today(), &t, Palette::Plain), "[N/A]");
    }

    #[test]
    fn test_badge_ansi_wraps_text() {
        let t = StatusThresholds::default();
        let b = badge(Some(today() - Duration::days(1)), today(), &t, Palette::Ansi);
        assert!(b.starts_with("\x1b[1;31m"));
        assert!(b.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_render_item_fields() {
        let item = CodeCartItem::new(
            ItemData {
                identifier: "PB-7".to_string(),
                cart_type: CartType::PBag,
                location: "icu".to_string(),
                employee_initials: "JD".to_string(),
                drug_expiration_date: None,
                supply_expiration_date: Some(today() + Duration::days(90)),
            },
            Utc::now(),
        );
        let out = render_item(&item, today(), &StatusThresholds::default(), Palette::Plain);

        assert!(out.contains(&item.short_id()));
        assert!(out.contains("PB-7 [P-Bag] @ ICU"));
        assert!(out.contains("drugs:    [N/A]"));
        assert!(out.contains("[GOOD, 90d]"));
        assert!(out.contains("checked by JD"));
    }

    #[test]
    fn test_render_empty_list() {
        let out = render_list(&[], today(), &StatusThresholds::default(), Palette::Plain);
        assert!(out.contains("No code carts"));
    }

    #[test]
    fn test_summary_over_seed() {
        let items = example_items(today(), Utc::now());
        let line = render_summary(&items, today(), &StatusThresholds::default());

        assert!(line.starts_with("6 items: 2 expired, 2 urgent, 2 expiring soon, 5 good, 1 n/a"));
        assert!(line.contains("(3 need attention)"));
    }
}
