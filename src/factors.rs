use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};

/// Region whose coefficients ship with the crate.
pub const DEFAULT_REGION: &str = "India";

// ---- Activity subtypes ----------------------------------------------------

/// Primary mode of daily transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Car,
    Bus,
    Train,
    Motorcycle,
    Airplane,
}

impl TransportMode {
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Motorcycle,
        TransportMode::Airplane,
    ];
}

/// Fuel used for cooking. Only combustible fuels carry a per-kg factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookingFuel {
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "CNG")]
    Cng,
    Electric,
}

impl CookingFuel {
    pub fn is_combustible(self) -> bool {
        matches!(self, CookingFuel::Lpg | CookingFuel::Cng)
    }

    /// Factor key for the fuel mass, `None` for electric cooking.
    pub fn factor_key(self) -> Option<FactorKey> {
        match self {
            CookingFuel::Lpg => Some(FactorKey::Lpg),
            CookingFuel::Cng => Some(FactorKey::Cng),
            CookingFuel::Electric => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietType {
    Vegan,
    Vegetarian,
    #[serde(rename = "Non-vegetarian")]
    NonVegetarian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteKind {
    Organic,
    Plastic,
    Paper,
    Metal,
}

impl WasteKind {
    pub const ALL: [WasteKind; 4] = [
        WasteKind::Organic,
        WasteKind::Plastic,
        WasteKind::Paper,
        WasteKind::Metal,
    ];
}

/// Emission categories reported in a result breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Transport,
    Energy,
    Diet,
    Waste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Transport,
        Category::Energy,
        Category::Diet,
        Category::Waste,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Transport => "Transportation",
            Category::Energy => "Energy",
            Category::Diet => "Diet",
            Category::Waste => "Waste",
        }
    }
}

// ---- Factor keys ----------------------------------------------------------

/// Every coefficient a region table may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FactorKey {
    Car,
    Bus,
    Train,
    Motorcycle,
    Airplane,
    Electricity,
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "CNG")]
    Cng,
    Vegan,
    Vegetarian,
    #[serde(rename = "Non-vegetarian")]
    NonVegetarian,
    Organic,
    Plastic,
    Paper,
    Metal,
}

impl FactorKey {
    pub const ALL: [FactorKey; 15] = [
        FactorKey::Car,
        FactorKey::Bus,
        FactorKey::Train,
        FactorKey::Motorcycle,
        FactorKey::Airplane,
        FactorKey::Electricity,
        FactorKey::Lpg,
        FactorKey::Cng,
        FactorKey::Vegan,
        FactorKey::Vegetarian,
        FactorKey::NonVegetarian,
        FactorKey::Organic,
        FactorKey::Plastic,
        FactorKey::Paper,
        FactorKey::Metal,
    ];

    pub fn category(self) -> Category {
        use FactorKey::*;
        match self {
            Car | Bus | Train | Motorcycle | Airplane => Category::Transport,
            Electricity | Lpg | Cng => Category::Energy,
            Vegan | Vegetarian | NonVegetarian => Category::Diet,
            Organic | Plastic | Paper | Metal => Category::Waste,
        }
    }

    /// Activity unit the coefficient is expressed per.
    pub fn unit(self) -> &'static str {
        match self.category() {
            Category::Transport => "km",
            Category::Energy if self == FactorKey::Electricity => "kWh",
            Category::Energy => "kg",
            Category::Diet => "meal",
            Category::Waste => "kg",
        }
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FactorKey::Lpg => "LPG",
            FactorKey::Cng => "CNG",
            FactorKey::NonVegetarian => "Non-vegetarian",
            other => return write!(f, "{other:?}"),
        };
        f.write_str(label)
    }
}

impl From<TransportMode> for FactorKey {
    fn from(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Car => FactorKey::Car,
            TransportMode::Bus => FactorKey::Bus,
            TransportMode::Train => FactorKey::Train,
            TransportMode::Motorcycle => FactorKey::Motorcycle,
            TransportMode::Airplane => FactorKey::Airplane,
        }
    }
}

impl From<DietType> for FactorKey {
    fn from(diet: DietType) -> Self {
        match diet {
            DietType::Vegan => FactorKey::Vegan,
            DietType::Vegetarian => FactorKey::Vegetarian,
            DietType::NonVegetarian => FactorKey::NonVegetarian,
        }
    }
}

impl From<WasteKind> for FactorKey {
    fn from(kind: WasteKind) -> Self {
        match kind {
            WasteKind::Organic => FactorKey::Organic,
            WasteKind::Plastic => FactorKey::Plastic,
            WasteKind::Paper => FactorKey::Paper,
            WasteKind::Metal => FactorKey::Metal,
        }
    }
}

// ---- Factor table ---------------------------------------------------------

/// Coefficients for one region, kg CO2e per activity unit.
pub type RegionFactors = BTreeMap<FactorKey, f64>;

/// Immutable (region, subtype) -> coefficient table.
///
/// The canonical Indian table is built in; alternative sets can be loaded
/// from JSON shaped as `{"regions": {"India": {"Car": 0.2, ...}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactorTable {
    regions: BTreeMap<String, RegionFactors>,
}

impl EmissionFactorTable {
    /// Canonical coefficient set for India.
    pub fn canonical() -> Self {
        use FactorKey::*;
        let india: RegionFactors = [
            (Car, 0.2),
            (Bus, 0.1),
            (Train, 0.05),
            (Motorcycle, 0.1),
            (Airplane, 0.25),
            (Electricity, 0.85),
            (Lpg, 2.5),
            (Cng, 2.2),
            (Vegan, 0.5),
            (Vegetarian, 0.8),
            (NonVegetarian, 1.5),
            (Organic, 0.5),
            (Plastic, 2.5),
            (Paper, 1.0),
            (Metal, 2.0),
        ]
        .into_iter()
        .collect();

        let mut regions = BTreeMap::new();
        regions.insert(DEFAULT_REGION.to_string(), india);
        EmissionFactorTable { regions }
    }

    /// Table with a single region; coefficients are validated.
    pub fn single_region(region: impl Into<String>, factors: RegionFactors) -> Result<Self> {
        let mut regions = BTreeMap::new();
        regions.insert(region.into(), factors);
        let table = EmissionFactorTable { regions };
        table.validate()?;
        Ok(table)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: EmissionFactorTable = serde_json::from_str(json)
            .map_err(|e| FootprintError::Config(format!("factor table: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| FootprintError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Every coefficient must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for factors in self.regions.values() {
            for (key, &value) in factors {
                if !value.is_finite() || value < 0.0 {
                    return Err(FootprintError::InvalidFactor {
                        key: key.to_string(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn factor(&self, region: &str, key: impl Into<FactorKey>) -> Result<f64> {
        let key = key.into();
        let factors = self
            .regions
            .get(region)
            .ok_or_else(|| FootprintError::UnknownRegion(region.to_string()))?;
        factors
            .get(&key)
            .copied()
            .ok_or_else(|| FootprintError::UnknownFactor {
                region: region.to_string(),
                key: key.to_string(),
            })
    }
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self::canonical()
    }
}
