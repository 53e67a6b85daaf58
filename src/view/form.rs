use serde::{Deserialize, Serialize};

use crate::entity::{CartType, CodeCartItem, ItemData};
use crate::error::{CodeCartError, Result};
use crate::status::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Add,
    Edit,
}

/// Raw form fields as the user typed them. Dates stay strings until
/// [`ItemForm::validate`] so bad input can be reported instead of dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemForm {
    pub identifier: String,
    pub cart_type: CartType,
    pub location: String,
    pub employee_initials: String,
    pub drug_expiration_date: String,
    pub supply_expiration_date: String,
}

impl ItemForm {
    /// Defaults for add mode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-populated fields for edit mode. `id` and `created_at` are not
    /// part of the form.
    pub fn from_item(item: &CodeCartItem) -> Self {
        let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        Self {
            identifier: item.data.identifier.clone(),
            cart_type: item.data.cart_type,
            location: item.data.location.clone(),
            employee_initials: item.data.employee_initials.clone(),
            drug_expiration_date: date(item.data.drug_expiration_date),
            supply_expiration_date: date(item.data.supply_expiration_date),
        }
    }

    pub fn validate(&self) -> Result<ItemData> {
        let required = |name: &str, value: &str| {
            if value.trim().is_empty() {
                Err(CodeCartError::Validation(format!("{} is required", name)))
            } else {
                Ok(value.trim().to_string())
            }
        };
        let date = |name: &str, value: &str| {
            if value.trim().is_empty() {
                return Ok(None);
            }
            parse_date(value).map(Some).ok_or_else(|| {
                CodeCartError::Validation(format!(
                    "{} '{}' is not a date (expected YYYY-MM-DD)",
                    name, value
                ))
            })
        };

        Ok(ItemData {
            identifier: required("identifier", &self.identifier)?,
            cart_type: self.cart_type,
            location: required("location", &self.location)?,
            employee_initials: required("employee initials", &self.employee_initials)?,
            drug_expiration_date: date("drug expiration date", &self.drug_expiration_date)?,
            supply_expiration_date: date("supply expiration date", &self.supply_expiration_date)?,
        })
    }
}
