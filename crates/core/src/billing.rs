//! Billing math: deposit policy, invoice line items, reference formatting.
//!
//! All amounts are [`Money`] (`rust_decimal::Decimal`) and every derived
//! figure is rounded to 2 decimal places, so `deposit + remaining == total`
//! holds exactly with no float drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Money};

/// Deposit percentage required up front, per the agency's standard terms.
pub const DEPOSIT_PERCENT: u32 = 20;

/// Currency scale: pennies.
const MONEY_DP: u32 = 2;

/// A deposit/remaining split of an invoice total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositSplit {
    pub deposit: Money,
    pub remaining: Money,
}

/// Split a total into the up-front deposit and the remaining balance.
///
/// The deposit is 20% of the total rounded half-away-from-zero to 2 dp; the
/// remainder absorbs any rounding so the two always sum back to `total`.
pub fn split_deposit(total: Money) -> DepositSplit {
    let rate = Decimal::new(DEPOSIT_PERCENT as i64, 2);
    let deposit = (total * rate).round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    DepositSplit {
        deposit,
        remaining: total - deposit,
    }
}

/// One billable line on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub rate: Money,
    pub total: Money,
}

impl LineItem {
    /// A single-quantity line, with `total` derived from the rate.
    pub fn single(description: impl Into<String>, rate: Money) -> Self {
        Self {
            description: description.into(),
            quantity: Decimal::ONE,
            rate,
            total: rate,
        }
    }
}

/// Compute an invoice's total from its line items.
///
/// The invoice amount is never caller-supplied; it is always this sum.
/// Rejects an empty item list, a negative line total, or an item whose
/// `total` disagrees with `quantity * rate` (2 dp).
pub fn invoice_total(items: &[LineItem]) -> Result<Money, CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(
            "An invoice requires at least one line item".into(),
        ));
    }

    let mut sum = Decimal::ZERO;
    for (idx, item) in items.iter().enumerate() {
        if item.total.is_sign_negative() {
            return Err(CoreError::Validation(format!(
                "Line item {idx} has a negative total"
            )));
        }
        let expected = (item.quantity * item.rate)
            .round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
        if item.total.round_dp(MONEY_DP) != expected {
            return Err(CoreError::Validation(format!(
                "Line item {idx} total {} does not match quantity x rate ({})",
                item.total, expected
            )));
        }
        sum += item.total;
    }
    Ok(sum.round_dp(MONEY_DP))
}

/// Human-readable quote reference, e.g. `QT-2026-007`.
///
/// Derived once from the quote's primary key at insert time; display-only.
pub fn quote_reference(year: i32, id: DbId) -> String {
    format!("QT-{year}-{id:03}")
}

/// Human-readable invoice number, e.g. `INV-2026-012`.
pub fn invoice_number(year: i32, id: DbId) -> String {
    format!("INV-{year}-{id:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn splits_round_total() {
        let split = split_deposit(money("1000.00"));
        assert_eq!(split.deposit, money("200.00"));
        assert_eq!(split.remaining, money("800.00"));
    }

    #[test]
    fn split_always_sums_back() {
        for raw in ["0.01", "0.99", "33.33", "123.45", "999999.99", "0.00"] {
            let total = money(raw);
            let split = split_deposit(total);
            assert_eq!(split.deposit + split.remaining, total, "total {raw}");
        }
    }

    #[test]
    fn split_rounds_half_away_from_zero() {
        // 20% of 0.13 is 0.026 -> 0.03.
        let split = split_deposit(money("0.13"));
        assert_eq!(split.deposit, money("0.03"));
        assert_eq!(split.remaining, money("0.10"));
    }

    #[test]
    fn total_sums_line_items() {
        let items = vec![
            LineItem {
                description: "Design".into(),
                quantity: money("2"),
                rate: money("150.00"),
                total: money("300.00"),
            },
            LineItem::single("Deployment", money("250.00")),
        ];
        assert_eq!(invoice_total(&items).unwrap(), money("550.00"));
    }

    #[test]
    fn empty_items_rejected() {
        let err = invoice_total(&[]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn mismatched_item_total_rejected() {
        let items = vec![LineItem {
            description: "Design".into(),
            quantity: money("2"),
            rate: money("150.00"),
            total: money("301.00"),
        }];
        let err = invoice_total(&items).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn negative_item_total_rejected() {
        let items = vec![LineItem {
            description: "Refund".into(),
            quantity: money("1"),
            rate: money("-10.00"),
            total: money("-10.00"),
        }];
        let err = invoice_total(&items).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn references_zero_pad() {
        assert_eq!(quote_reference(2026, 7), "QT-2026-007");
        assert_eq!(quote_reference(2026, 1234), "QT-2026-1234");
        assert_eq!(invoice_number(2026, 12), "INV-2026-012");
    }
}
