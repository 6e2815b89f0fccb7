use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculator::ReferenceAverages;
use crate::certificates::CertificateThresholds;
use crate::chatbot::DEFAULT_MESSAGE_LIMIT;
use crate::error::{FootprintError, Result};
use crate::factors::{EmissionFactorTable, DEFAULT_REGION};
use crate::offset::OffsetPrices;

/// Journey entries kept by default, one year of weekly checks.
pub const DEFAULT_JOURNEY_CAPACITY: usize = 52;

/// Engine configuration. Every field has a default, so a partial JSON file
/// only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    pub region: String,
    /// JSON factor table; the built-in canonical table when absent.
    pub factors_path: Option<PathBuf>,
    pub progress_dir: PathBuf,
    pub thresholds: CertificateThresholds,
    pub averages: ReferenceAverages,
    pub offset_prices: OffsetPrices,
    pub chat_message_limit: usize,
    pub journey_capacity: usize,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        FootprintConfig {
            region: DEFAULT_REGION.to_string(),
            factors_path: None,
            progress_dir: PathBuf::from("data"),
            thresholds: CertificateThresholds::default(),
            averages: ReferenceAverages::default(),
            offset_prices: OffsetPrices::default(),
            chat_message_limit: DEFAULT_MESSAGE_LIMIT,
            journey_capacity: DEFAULT_JOURNEY_CAPACITY,
        }
    }
}

impl FootprintConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: FootprintConfig = serde_json::from_str(json)
            .map_err(|e| FootprintError::Config(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| FootprintError::Config(format!("{}: {e}", path.display())))?;
        let cfg = Self::from_json_str(&raw)?;
        info!(path = %path.display(), region = %cfg.region, "config loaded");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(FootprintError::Config("region must not be empty".into()));
        }
        if self.chat_message_limit == 0 {
            return Err(FootprintError::Config("chat_message_limit must be at least 1".into()));
        }
        if self.journey_capacity == 0 {
            return Err(FootprintError::Config("journey_capacity must be at least 1".into()));
        }
        let t = &self.thresholds;
        for (name, value) in [
            ("eco_warrior_tonnes", t.eco_warrior_tonnes),
            ("climate_champion_tonnes", t.climate_champion_tonnes),
            ("earth_guardian_tonnes", t.earth_guardian_tonnes),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FootprintError::Config(format!("{name} must be a non-negative number")));
            }
        }
        if t.eco_warrior_cycles == 0 {
            return Err(FootprintError::Config("eco_warrior_cycles must be at least 1".into()));
        }
        Ok(())
    }

    /// Factor table for this config; the configured region must be present.
    pub fn factor_table(&self) -> Result<EmissionFactorTable> {
        let table = match &self.factors_path {
            Some(path) => {
                let table = EmissionFactorTable::from_json_file(path)?;
                info!(path = %path.display(), "factor table loaded");
                table
            }
            None => EmissionFactorTable::canonical(),
        };
        if !table.has_region(&self.region) {
            return Err(FootprintError::UnknownRegion(self.region.clone()));
        }
        Ok(table)
    }
}
