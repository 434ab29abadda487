//! Itemized bill produced by the reconciler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::numeric::round2;

/// Identifies a line item independently of its display text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemCode {
    /// Contracted quota at the discounted tariff
    Quota,
    /// Energy beyond the quota at the full tariff
    Excess,
    PublicLighting,
    TariffFlag,
    OtherCharges,
}

impl LineItemCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemCode::Quota => "quota",
            LineItemCode::Excess => "excess",
            LineItemCode::PublicLighting => "public_lighting",
            LineItemCode::TariffFlag => "tariff_flag",
            LineItemCode::OtherCharges => "other_charges",
        }
    }

    /// Description printed on the bill
    pub fn description(&self) -> &'static str {
        match self {
            LineItemCode::Quota => "Energia contratada (Kc)",
            LineItemCode::Excess => "Energia excedente",
            LineItemCode::PublicLighting => "Contribuição de iluminação pública (CIP)",
            LineItemCode::TariffFlag => "Bandeira tarifária",
            LineItemCode::OtherCharges => "Outros encargos",
        }
    }
}

/// One row of the bill. `value` is already rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub code: LineItemCode,
    pub description: String,
    pub value: f64,
    /// Whether the item counts toward the total
    pub included: bool,
}

impl LineItem {
    pub fn new(code: LineItemCode, raw_value: f64, included: bool) -> Self {
        Self {
            code,
            description: code.description().to_string(),
            value: round2(raw_value),
            included,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillMetadata {
    pub state: String,
    pub distributor: String,
    pub reference_month: Option<String>,
    pub contract_id: String,
    pub computed_at: DateTime<Utc>,
    pub engine_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub items: Vec<LineItem>,
    pub total: f64,
    /// Energy billed at the full tariff (kWh), never negative
    pub excess_kwh: f64,
    pub metadata: BillMetadata,
    pub summary: String,
}

impl Bill {
    /// Build a bill from its items; the total is derived, never supplied.
    pub fn from_items(items: Vec<LineItem>, excess_kwh: f64, metadata: BillMetadata, summary: String) -> Self {
        let total = Self::total_of(&items);
        Self {
            items,
            total,
            excess_kwh,
            metadata,
            summary,
        }
    }

    /// Sum of the included items' rounded values, rounded again
    pub fn total_of(items: &[LineItem]) -> f64 {
        round2(items.iter().filter(|i| i.included).map(|i| i.value).sum())
    }

    pub fn included_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(|i| i.included)
    }

    pub fn item(&self, code: LineItemCode) -> Option<&LineItem> {
        self.items.iter().find(|i| i.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> BillMetadata {
        BillMetadata {
            state: "SP".into(),
            distributor: "ENEL SP".into(),
            reference_month: None,
            contract_id: "C-1".into(),
            computed_at: DateTime::<Utc>::UNIX_EPOCH,
            engine_version: "test".into(),
        }
    }

    #[test]
    fn test_total_ignores_excluded_items() {
        let items = vec![
            LineItem::new(LineItemCode::Quota, 100.004, true),
            LineItem::new(LineItemCode::Excess, 0.0, false),
            LineItem::new(LineItemCode::OtherCharges, 50.0, false),
            LineItem::new(LineItemCode::PublicLighting, 10.126, true),
        ];
        let bill = Bill::from_items(items, 0.0, metadata(), String::new());

        assert_eq!(bill.items[0].value, 100.0);
        assert_eq!(bill.items[3].value, 10.13);
        assert_eq!(bill.total, 110.13);
        assert_eq!(bill.included_items().count(), 2);
    }

    #[test]
    fn test_item_lookup_and_codes() {
        let bill = Bill::from_items(
            vec![LineItem::new(LineItemCode::TariffFlag, 3.0, true)],
            0.0,
            metadata(),
            String::new(),
        );
        let flag = bill.item(LineItemCode::TariffFlag).unwrap();
        assert_eq!(flag.description, "Bandeira tarifária");
        assert!(bill.item(LineItemCode::Quota).is_none());
        assert_eq!(LineItemCode::PublicLighting.as_str(), "public_lighting");
        assert_eq!(serde_json::to_string(&LineItemCode::OtherCharges).unwrap(), "\"other_charges\"");
    }
}
