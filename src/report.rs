use crate::data::{Equipment, MarketData};
use crate::model::RentalPlan;

/// Slack for comparing solver values, which carry floating-point noise even
/// on integer variables.
const FEAS_TOL: f64 = 1e-6;

/// One row of the diagnostic rental summary: a post-hoc consistency check
/// comparing realized rentals against the inventory available that week.
#[derive(Debug, PartialEq)]
pub struct SummaryRow {
    pub equipment: &'static str,
    pub week: usize,
    pub total_rentals: f64,
    pub available_inventory: f64,
    pub exceeds_inventory: bool,
}

impl SummaryRow {
    pub fn status(&self) -> &'static str {
        if self.exceeds_inventory {
            "Exceeds Inventory"
        } else {
            "Normal"
        }
    }
}

/// Builds the per-(equipment, week) rental summary. Week 0 reports the
/// initial fleet as the available inventory.
pub fn rental_summary(market: &MarketData, plan: &RentalPlan) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for (e, equipment) in Equipment::ALL.into_iter().enumerate() {
        for week in 0..market.num_weeks() {
            let total_rentals = plan.total_rentals(equipment, week);
            let available_inventory = if week == 0 {
                market.initial_inventory[e]
            } else {
                plan.inventory[e][week]
            };
            rows.push(SummaryRow {
                equipment: equipment.name(),
                week,
                total_rentals,
                available_inventory,
                exceeds_inventory: total_rentals > available_inventory + FEAS_TOL,
            });
        }
    }
    rows
}

/// Prints the first `limit` summary rows as an aligned text table.
pub fn print_summary_head(rows: &[SummaryRow], limit: usize) {
    println!(
        "{:<12} {:>5} {:>14} {:>20} {:>18}",
        "Equipment", "Week", "Total Rentals", "Available Inventory", "Inventory Status"
    );
    for row in rows.iter().take(limit) {
        println!(
            "{:<12} {:>5} {:>14.1} {:>20.1} {:>18}",
            row.equipment,
            row.week,
            row.total_rentals,
            row.available_inventory,
            row.status()
        );
    }
}

/// Formats an amount as pounds sterling with thousands grouping,
/// e.g. `£1,234,567.89`.
pub fn format_gbp(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let pence = (amount.abs() * 100.0).round() as u64;
    let whole = (pence / 100).to_string();
    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}£{grouped}.{:02}", pence % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{NUM_DURATIONS, RentalTable};
    use crate::model::solve;

    #[test]
    fn formats_pounds_with_grouping() {
        assert_eq!(format_gbp(0.0), "£0.00");
        assert_eq!(format_gbp(5.5), "£5.50");
        assert_eq!(format_gbp(1234.0), "£1,234.00");
        assert_eq!(format_gbp(1_234_567.891), "£1,234,567.89");
        assert_eq!(format_gbp(-42.0), "-£42.00");
    }

    #[test]
    fn summary_row_status_text() {
        let mut row = SummaryRow {
            equipment: "Cranes",
            week: 3,
            total_rentals: 4.0,
            available_inventory: 6.0,
            exceeds_inventory: false,
        };
        assert_eq!(row.status(), "Normal");
        row.exceeds_inventory = true;
        assert_eq!(row.status(), "Exceeds Inventory");
    }

    #[test]
    fn optimal_summary_has_no_violations() {
        let table = RentalTable {
            demand: vec![[2.0; NUM_DURATIONS]; 4],
            price: vec![[75.0; NUM_DURATIONS]; 4],
        };
        let mut market = MarketData::new([table.clone(), table.clone(), table]).unwrap();
        market.initial_inventory = [6.0; 3];

        let plan = solve(&market);
        assert!(plan.is_optimal());

        let rows = rental_summary(&market, &plan);
        assert_eq!(rows.len(), Equipment::ALL.len() * market.num_weeks());
        assert_eq!(rows[0].equipment, "Excavators");
        assert_eq!(rows[0].available_inventory, 6.0);
        assert!(rows.iter().all(|row| !row.exceeds_inventory));
    }
}
