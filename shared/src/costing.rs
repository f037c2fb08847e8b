//! Read-side aggregation over the cost ledger and sales
//!
//! The ledger itself is append-only; everything here is derived on demand.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{round_cents, CostCategory, CostTransaction, FinishedGoodLot, SalesRecord};

/// Number of calendar days in the revenue trend, today included
pub const REVENUE_WINDOW_DAYS: i64 = 7;

// ============================================================================
// Totals & Breakdown
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTotals {
    pub raw_material: Decimal,
    pub packaging: Decimal,
    pub labor: Decimal,
    pub wastage: Decimal,
    pub total: Decimal,
}

impl CostTotals {
    pub fn from_transactions(transactions: &[CostTransaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut acc, tx| {
            acc.raw_material += tx.raw_material_cost;
            acc.packaging += tx.packaging_cost;
            acc.labor += tx.labor_cost;
            acc.wastage += tx.wastage_cost;
            acc.total += tx.total_cost;
            acc
        })
    }

    pub fn amount(&self, category: CostCategory) -> Decimal {
        match category {
            CostCategory::RawMaterial => self.raw_material,
            CostCategory::Packaging => self.packaging,
            CostCategory::Labor => self.labor,
            CostCategory::Wastage => self.wastage,
        }
    }
}

/// One category's share of total cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostShare {
    pub category: CostCategory,
    pub amount: Decimal,
    /// Percent of the grand total, 2 dp; zero when nothing has been spent
    pub percent: Decimal,
}

pub fn cost_breakdown(totals: &CostTotals) -> Vec<CostShare> {
    [
        CostCategory::RawMaterial,
        CostCategory::Packaging,
        CostCategory::Labor,
        CostCategory::Wastage,
    ]
    .into_iter()
    .map(|category| {
        let amount = totals.amount(category);
        let percent = if totals.total.is_zero() {
            Decimal::ZERO
        } else {
            (amount / totals.total * Decimal::ONE_HUNDRED).round_dp(2)
        };
        CostShare {
            category,
            amount,
            percent,
        }
    })
    .collect()
}

// ============================================================================
// Revenue & Profitability
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Revenue from delivered sales only
pub fn delivered_revenue(sales: &[SalesRecord]) -> Decimal {
    sales
        .iter()
        .filter(|s| s.is_delivered())
        .map(|s| s.total_amount)
        .sum()
}

/// Delivered revenue per day for the trailing week ending `today`
///
/// Sales are bucketed by the day they were invoiced. Days without sales
/// are present with zero revenue; the result is oldest first.
pub fn weekly_revenue(sales: &[SalesRecord], today: NaiveDate) -> Vec<DailyRevenue> {
    (0..REVENUE_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let revenue = sales
                .iter()
                .filter(|s| s.is_delivered() && s.date_created.date_naive() == date)
                .map(|s| s.total_amount)
                .sum();
            DailyRevenue { date, revenue }
        })
        .collect()
}

/// Units ever packed, regardless of how many have since been sold
pub fn units_produced(lots: &[FinishedGoodLot]) -> i64 {
    lots.iter().map(|l| l.quantity_packed).sum()
}

pub fn average_cost_per_unit(total_cost: Decimal, units: i64) -> Decimal {
    if units <= 0 {
        return Decimal::ZERO;
    }
    round_cents(total_cost / Decimal::from(units))
}

pub fn net_profit(revenue: Decimal, total_cost: Decimal) -> Decimal {
    revenue - total_cost
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub totals: CostTotals,
    pub breakdown: Vec<CostShare>,
    pub delivered_revenue: Decimal,
    pub net_profit: Decimal,
    pub units_produced: i64,
    pub average_cost_per_unit: Decimal,
    pub weekly_revenue: Vec<DailyRevenue>,
}

pub fn financial_summary(
    transactions: &[CostTransaction],
    sales: &[SalesRecord],
    lots: &[FinishedGoodLot],
    today: NaiveDate,
) -> FinancialSummary {
    let totals = CostTotals::from_transactions(transactions);
    let revenue = delivered_revenue(sales);
    let units = units_produced(lots);

    FinancialSummary {
        breakdown: cost_breakdown(&totals),
        delivered_revenue: revenue,
        net_profit: net_profit(revenue, totals.total),
        units_produced: units,
        average_cost_per_unit: average_cost_per_unit(totals.total, units),
        weekly_revenue: weekly_revenue(sales, today),
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostEntry, PaymentMethod, SalesStatus};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn tx(entry: CostEntry) -> CostTransaction {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        CostTransaction::new("COST-1".into(), "BATCH-1".into(), date, entry)
    }

    fn sale(day: u32, amount: &str, status: SalesStatus) -> SalesRecord {
        SalesRecord {
            id: format!("SALE-{}", day),
            invoice_id: format!("INV-{}", day),
            customer_id: "CUST-1".into(),
            customer_name: "Green Grocer".into(),
            customer_email: None,
            customer_phone: None,
            items: vec![],
            total_amount: dec(amount),
            payment_method: PaymentMethod::Cash,
            status,
            date_created: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            date_delivered: None,
        }
    }

    // ========================================================================
    // Breakdown
    // ========================================================================

    #[test]
    fn test_empty_breakdown_is_all_zero() {
        let breakdown = cost_breakdown(&CostTotals::default());
        assert_eq!(breakdown.len(), 4);
        assert!(breakdown
            .iter()
            .all(|s| s.amount.is_zero() && s.percent.is_zero()));
    }

    #[test]
    fn test_breakdown_percentages() {
        let txs = vec![
            tx(CostEntry::raw_material(dec("800"), dec("100"))),
            tx(CostEntry::packaging(dec("100"))),
            tx(CostEntry::processing(dec("75"), dec("25"), dec("6"))),
        ];
        let totals = CostTotals::from_transactions(&txs);
        assert_eq!(totals.total, dec("1000"));

        let breakdown = cost_breakdown(&totals);
        let raw = breakdown
            .iter()
            .find(|s| s.category == CostCategory::RawMaterial)
            .unwrap();
        assert_eq!(raw.percent, dec("80"));
        let labor = breakdown
            .iter()
            .find(|s| s.category == CostCategory::Labor)
            .unwrap();
        assert_eq!(labor.percent, dec("7.5"));
    }

    // ========================================================================
    // Revenue
    // ========================================================================

    #[test]
    fn test_weekly_revenue_zero_filled_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let sales = vec![
            sale(10, "30", SalesStatus::Delivered),
            sale(10, "15", SalesStatus::Delivered),
            sale(6, "45", SalesStatus::Delivered),
            sale(9, "99", SalesStatus::Invoiced),
            sale(2, "500", SalesStatus::Delivered),
        ];

        let week = weekly_revenue(&sales, today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(week[6].date, today);
        assert_eq!(week[6].revenue, dec("45"));
        assert_eq!(week[2].revenue, dec("45"));
        assert_eq!(week[5].revenue, Decimal::ZERO);
        assert_eq!(week.iter().map(|d| d.revenue).sum::<Decimal>(), dec("90"));
    }

    #[test]
    fn test_net_profit_uses_delivered_revenue_only() {
        let sales = vec![
            sale(1, "200", SalesStatus::Delivered),
            sale(2, "300", SalesStatus::Invoiced),
        ];
        let txs = vec![tx(CostEntry::raw_material(dec("150"), dec("10")))];
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let summary = financial_summary(&txs, &sales, &[], today);
        assert_eq!(summary.delivered_revenue, dec("200"));
        assert_eq!(summary.net_profit, dec("50"));
        assert_eq!(summary.average_cost_per_unit, Decimal::ZERO);
    }

    #[test]
    fn test_average_cost_per_unit() {
        assert_eq!(average_cost_per_unit(dec("100"), 0), Decimal::ZERO);
        assert_eq!(average_cost_per_unit(dec("100"), 3), dec("33.33"));
        assert_eq!(average_cost_per_unit(dec("50"), 100), dec("0.50"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Grand total always equals the sum of its parts
        #[test]
        fn prop_totals_match_components(
            rows in proptest::collection::vec((0i64..100_000, 0i64..100_000, 0i64..100_000, 0i64..100_000), 0..20)
        ) {
            let txs: Vec<_> = rows
                .iter()
                .map(|(r, p, l, w)| tx(CostEntry {
                    raw_material_cost: Decimal::new(*r, 2),
                    packaging_cost: Decimal::new(*p, 2),
                    labor_cost: Decimal::new(*l, 2),
                    wastage_cost: Decimal::new(*w, 2),
                    ..CostEntry::default()
                }))
                .collect();
            let totals = CostTotals::from_transactions(&txs);
            prop_assert_eq!(
                totals.total,
                totals.raw_material + totals.packaging + totals.labor + totals.wastage
            );
        }
    }
}
