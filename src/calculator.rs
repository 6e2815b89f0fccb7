use serde::{Deserialize, Serialize};

use crate::error::{ensure_quantity, FootprintError, Result};
use crate::factors::{
    Category, CookingFuel, DietType, EmissionFactorTable, FactorKey, TransportMode, WasteKind,
};

const DAYS_PER_YEAR: f64 = 365.0;
const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;
/// Each flight is modelled as a fixed 1000 km trip.
const KM_PER_FLIGHT: f64 = 1000.0;

pub const MIN_MEALS_PER_DAY: u8 = 1;
pub const MAX_MEALS_PER_DAY: u8 = 5;

/// Weekly waste mass per kind, kg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyWaste {
    pub organic_kg: f64,
    pub plastic_kg: f64,
    pub paper_kg: f64,
    pub metal_kg: f64,
}

impl WeeklyWaste {
    pub fn get(&self, kind: WasteKind) -> f64 {
        match kind {
            WasteKind::Organic => self.organic_kg,
            WasteKind::Plastic => self.plastic_kg,
            WasteKind::Paper => self.paper_kg,
            WasteKind::Metal => self.metal_kg,
        }
    }
}

/// One snapshot of self-reported lifestyle inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleInput {
    pub transport: TransportMode,
    pub daily_distance_km: f64,
    /// Only counted when `transport` is `Airplane`.
    pub flights_per_year: u32,
    pub monthly_electricity_kwh: f64,
    pub cooking_fuel: CookingFuel,
    /// Only counted for combustible fuels.
    pub monthly_fuel_kg: f64,
    pub diet: DietType,
    pub meals_per_day: u8,
    pub weekly_waste: WeeklyWaste,
}

impl LifestyleInput {
    /// Range checks; nothing else is validated.
    pub fn validate(&self) -> Result<()> {
        ensure_quantity("daily_distance_km", self.daily_distance_km)?;
        ensure_quantity("monthly_electricity_kwh", self.monthly_electricity_kwh)?;
        ensure_quantity("monthly_fuel_kg", self.monthly_fuel_kg)?;
        for kind in WasteKind::ALL {
            ensure_quantity(&format!("weekly {kind:?} waste"), self.weekly_waste.get(kind))?;
        }
        if !(MIN_MEALS_PER_DAY..=MAX_MEALS_PER_DAY).contains(&self.meals_per_day) {
            return Err(FootprintError::invalid(format!(
                "meals_per_day must be between {MIN_MEALS_PER_DAY} and {MAX_MEALS_PER_DAY} (got {})",
                self.meals_per_day
            )));
        }
        Ok(())
    }
}

/// Annual emissions per category, kg CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub transport: f64,
    pub energy: f64,
    pub diet: f64,
    pub waste: f64,
    pub total: f64,
}

impl EmissionResult {
    pub fn from_categories(transport: f64, energy: f64, diet: f64, waste: f64) -> Self {
        EmissionResult {
            transport,
            energy,
            diet,
            waste,
            total: transport + energy + diet + waste,
        }
    }

    pub fn category(&self, category: Category) -> f64 {
        match category {
            Category::Transport => self.transport,
            Category::Energy => self.energy,
            Category::Diet => self.diet,
            Category::Waste => self.waste,
        }
    }

    pub fn total_tonnes(&self) -> f64 {
        self.total / 1000.0
    }

    pub fn category_tonnes(&self, category: Category) -> f64 {
        self.category(category) / 1000.0
    }
}

// ---- Calculator -----------------------------------------------------------

/// Maps one lifestyle snapshot to annual per-category emissions.
pub fn compute(
    input: &LifestyleInput,
    factors: &EmissionFactorTable,
    region: &str,
) -> Result<EmissionResult> {
    input.validate()?;

    let transport = transport_emissions(input, factors, region)?;
    let energy = energy_emissions(input, factors, region)?;
    let diet = f64::from(input.meals_per_day) * DAYS_PER_YEAR * factors.factor(region, input.diet)?;
    let waste = waste_emissions(input, factors, region)?;

    Ok(EmissionResult::from_categories(transport, energy, diet, waste))
}

fn transport_emissions(
    input: &LifestyleInput,
    factors: &EmissionFactorTable,
    region: &str,
) -> Result<f64> {
    let mut kg = input.daily_distance_km * DAYS_PER_YEAR * factors.factor(region, input.transport)?;
    if input.transport == TransportMode::Airplane {
        kg += f64::from(input.flights_per_year)
            * KM_PER_FLIGHT
            * factors.factor(region, FactorKey::Airplane)?;
    }
    Ok(kg)
}

fn energy_emissions(
    input: &LifestyleInput,
    factors: &EmissionFactorTable,
    region: &str,
) -> Result<f64> {
    let mut kg = input.monthly_electricity_kwh
        * MONTHS_PER_YEAR
        * factors.factor(region, FactorKey::Electricity)?;
    if let Some(key) = input.cooking_fuel.factor_key() {
        kg += input.monthly_fuel_kg * MONTHS_PER_YEAR * factors.factor(region, key)?;
    }
    Ok(kg)
}

fn waste_emissions(
    input: &LifestyleInput,
    factors: &EmissionFactorTable,
    region: &str,
) -> Result<f64> {
    let mut kg = 0.0;
    for kind in WasteKind::ALL {
        kg += input.weekly_waste.get(kind) * WEEKS_PER_YEAR * factors.factor(region, kind)?;
    }
    Ok(kg)
}

// ---- Comparison with per-capita averages ----------------------------------

/// Per-capita reference averages, tonnes CO2/person/year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceAverages {
    pub global_tonnes: f64,
    pub regional_tonnes: f64,
}

impl Default for ReferenceAverages {
    fn default() -> Self {
        ReferenceAverages {
            global_tonnes: 4.79,
            regional_tonnes: 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub total_tonnes: f64,
    pub percent_of_global: f64,
    pub percent_of_regional: f64,
    pub below_global: bool,
    pub below_regional: bool,
}

impl Comparison {
    pub fn against(result: &EmissionResult, averages: &ReferenceAverages) -> Self {
        let total_tonnes = result.total_tonnes();
        let percent = |avg: f64| {
            if avg > 0.0 {
                total_tonnes / avg * 100.0
            } else {
                0.0
            }
        };
        Comparison {
            total_tonnes,
            percent_of_global: percent(averages.global_tonnes),
            percent_of_regional: percent(averages.regional_tonnes),
            below_global: total_tonnes < averages.global_tonnes,
            below_regional: total_tonnes < averages.regional_tonnes,
        }
    }
}

// ---- Recommendations ------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub tip: &'static str,
}

/// Category thresholds in tonnes above which a tip is offered.
const RECOMMENDATION_RULES: [(Category, f64, &str); 4] = [
    (
        Category::Transport,
        2.0,
        "Consider using public transport or carpooling to reduce emissions.",
    ),
    (
        Category::Energy,
        1.5,
        "Switch to energy-efficient appliances and LED lighting.",
    ),
    (
        Category::Waste,
        0.5,
        "Increase recycling and composting efforts.",
    ),
    (
        Category::Diet,
        1.0,
        "Consider reducing meat consumption and choosing local produce.",
    ),
];

pub fn recommendations(result: &EmissionResult) -> Vec<Recommendation> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|(category, limit, _)| result.category_tonnes(*category) > *limit)
        .map(|&(category, _, tip)| Recommendation { category, tip })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::DEFAULT_REGION;

    fn commuter() -> LifestyleInput {
        LifestyleInput {
            transport: TransportMode::Car,
            daily_distance_km: 10.0,
            flights_per_year: 0,
            monthly_electricity_kwh: 200.0,
            cooking_fuel: CookingFuel::Electric,
            monthly_fuel_kg: 0.0,
            diet: DietType::Vegetarian,
            meals_per_day: 3,
            weekly_waste: WeeklyWaste::default(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_commuter_scenario() {
        let table = EmissionFactorTable::canonical();
        let r = compute(&commuter(), &table, DEFAULT_REGION).unwrap();
        assert!(approx(r.transport, 730.0));
        assert!(approx(r.energy, 2040.0));
        assert!(approx(r.diet, 876.0));
        assert_eq!(r.waste, 0.0);
        assert!(approx(r.total, 3646.0));
        assert!(approx(r.total_tonnes(), 3.646));
    }

    #[test]
    fn test_total_is_exact_sum() {
        let table = EmissionFactorTable::canonical();
        let mut input = commuter();
        input.transport = TransportMode::Airplane;
        input.daily_distance_km = 3.7;
        input.flights_per_year = 4;
        input.cooking_fuel = CookingFuel::Lpg;
        input.monthly_fuel_kg = 13.3;
        input.weekly_waste = WeeklyWaste {
            organic_kg: 2.1,
            plastic_kg: 0.7,
            paper_kg: 1.3,
            metal_kg: 0.45,
        };
        let r = compute(&input, &table, DEFAULT_REGION).unwrap();
        assert_eq!(r.total, r.transport + r.energy + r.diet + r.waste);
    }

    #[test]
    fn test_compute_is_bit_identical() {
        let table = EmissionFactorTable::canonical();
        let a = compute(&commuter(), &table, DEFAULT_REGION).unwrap();
        let b = compute(&commuter(), &table, DEFAULT_REGION).unwrap();
        assert_eq!(a.total.to_bits(), b.total.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_flights_only_count_for_air_travel() {
        let table = EmissionFactorTable::canonical();
        let mut input = commuter();
        input.flights_per_year = 6;
        let car = compute(&input, &table, DEFAULT_REGION).unwrap();
        assert!(approx(car.transport, 730.0));

        input.transport = TransportMode::Airplane;
        input.daily_distance_km = 0.0;
        let air = compute(&input, &table, DEFAULT_REGION).unwrap();
        assert!(approx(air.transport, 6.0 * 1000.0 * 0.25));
    }

    #[test]
    fn test_fuel_only_counts_when_combustible() {
        let table = EmissionFactorTable::canonical();
        let mut input = commuter();
        input.monthly_fuel_kg = 10.0;
        let electric = compute(&input, &table, DEFAULT_REGION).unwrap();
        assert!(approx(electric.energy, 2040.0));

        input.cooking_fuel = CookingFuel::Cng;
        let cng = compute(&input, &table, DEFAULT_REGION).unwrap();
        assert!(approx(cng.energy, 2040.0 + 10.0 * 12.0 * 2.2));
    }

    #[test]
    fn test_waste_uses_52_weeks() {
        let table = EmissionFactorTable::canonical();
        let mut input = commuter();
        input.weekly_waste.plastic_kg = 1.0;
        input.weekly_waste.metal_kg = 0.5;
        let r = compute(&input, &table, DEFAULT_REGION).unwrap();
        assert!(approx(r.waste, 52.0 * 2.5 + 0.5 * 52.0 * 2.0));
    }

    #[test]
    fn test_meals_out_of_range_rejected() {
        let table = EmissionFactorTable::canonical();
        for meals in [0u8, 6, 200] {
            let mut input = commuter();
            input.meals_per_day = meals;
            assert!(matches!(
                compute(&input, &table, DEFAULT_REGION),
                Err(FootprintError::InvalidInput(_))
            ));
        }
        let mut input = commuter();
        input.meals_per_day = 5;
        assert!(compute(&input, &table, DEFAULT_REGION).is_ok());
    }

    #[test]
    fn test_negative_quantities_rejected() {
        let table = EmissionFactorTable::canonical();
        let mut input = commuter();
        input.daily_distance_km = -1.0;
        assert!(compute(&input, &table, DEFAULT_REGION).is_err());

        let mut input = commuter();
        input.weekly_waste.paper_kg = -0.5;
        assert!(compute(&input, &table, DEFAULT_REGION).is_err());

        let mut input = commuter();
        input.monthly_electricity_kwh = f64::NAN;
        assert!(compute(&input, &table, DEFAULT_REGION).is_err());
    }

    #[test]
    fn test_unknown_region() {
        let table = EmissionFactorTable::canonical();
        assert!(matches!(
            compute(&commuter(), &table, "Mars"),
            Err(FootprintError::UnknownRegion(_))
        ));
    }

    #[test]
    fn test_comparison_against_averages() {
        let result = EmissionResult::from_categories(730.0, 2040.0, 876.0, 0.0);
        let cmp = Comparison::against(&result, &ReferenceAverages::default());
        assert!(cmp.below_global);
        assert!(!cmp.below_regional);
        assert!((cmp.percent_of_global - 3.646 / 4.79 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_follow_thresholds() {
        let result = EmissionResult::from_categories(730.0, 2040.0, 876.0, 0.0);
        let recs = recommendations(&result);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, Category::Energy);

        let heavy = EmissionResult::from_categories(2500.0, 1600.0, 1200.0, 600.0);
        let cats: Vec<Category> = recommendations(&heavy).iter().map(|r| r.category).collect();
        assert_eq!(
            cats,
            vec![Category::Transport, Category::Energy, Category::Waste, Category::Diet]
        );
    }
}
