use serde::{Deserialize, Serialize};

use crate::error::{ensure_quantity, Result};

/// kg CO2 absorbed by one tree per year.
pub const KG_PER_TREE: f64 = 20.0;
/// kg CO2 avoided by one solar panel per year.
pub const KG_PER_SOLAR_PANEL: f64 = 500.0;
/// One credit offsets one tonne.
pub const KG_PER_CARBON_CREDIT: f64 = 1000.0;

/// Unit prices in local currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetPrices {
    pub tree: f64,
    pub solar_panel: f64,
    pub carbon_credit: f64,
}

impl Default for OffsetPrices {
    fn default() -> Self {
        OffsetPrices {
            tree: 100.0,
            solar_panel: 15_000.0,
            carbon_credit: 1_000.0,
        }
    }
}

/// Unrounded count and its cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetOption {
    pub count: f64,
    pub cost: f64,
}

impl OffsetOption {
    fn new(total_kg: f64, kg_per_unit: f64, unit_price: f64) -> Self {
        let count = total_kg / kg_per_unit;
        OffsetOption {
            count,
            cost: count * unit_price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetPlan {
    pub trees: OffsetOption,
    pub solar_panels: OffsetOption,
    pub carbon_credits: OffsetOption,
}

/// Offsets for an annual total at canonical prices.
pub fn estimate(total_kg_co2e: f64) -> Result<OffsetPlan> {
    estimate_with(total_kg_co2e, &OffsetPrices::default())
}

pub fn estimate_with(total_kg_co2e: f64, prices: &OffsetPrices) -> Result<OffsetPlan> {
    ensure_quantity("total emissions", total_kg_co2e)?;
    Ok(OffsetPlan {
        trees: OffsetOption::new(total_kg_co2e, KG_PER_TREE, prices.tree),
        solar_panels: OffsetOption::new(total_kg_co2e, KG_PER_SOLAR_PANEL, prices.solar_panel),
        carbon_credits: OffsetOption::new(total_kg_co2e, KG_PER_CARBON_CREDIT, prices.carbon_credit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FootprintError;

    #[test]
    fn test_ten_tonnes() {
        let plan = estimate(10_000.0).unwrap();
        assert_eq!(plan.trees.count, 500.0);
        assert_eq!(plan.trees.cost, 500.0 * 100.0);
        assert_eq!(plan.solar_panels.count, 20.0);
        assert_eq!(plan.solar_panels.cost, 20.0 * 15_000.0);
        assert_eq!(plan.carbon_credits.count, 10.0);
        assert_eq!(plan.carbon_credits.cost, 10.0 * 1_000.0);
    }

    #[test]
    fn test_counts_are_not_rounded() {
        let plan = estimate(3646.0).unwrap();
        assert_eq!(plan.trees.count, 182.3);
        assert!((plan.carbon_credits.count - 3.646).abs() < 1e-12);
    }

    #[test]
    fn test_custom_prices() {
        let prices = OffsetPrices {
            tree: 2.0,
            ..OffsetPrices::default()
        };
        let plan = estimate_with(1_000.0, &prices).unwrap();
        assert_eq!(plan.trees.cost, 100.0);
    }

    #[test]
    fn test_zero_and_negative_totals() {
        let plan = estimate(0.0).unwrap();
        assert_eq!(plan.solar_panels.count, 0.0);
        assert!(matches!(estimate(-1.0), Err(FootprintError::InvalidInput(_))));
    }
}
