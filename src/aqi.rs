//! US EPA air quality index from PM2.5 concentration.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_quantity, Result};

/// Highest reportable index; concentrations past the last breakpoint saturate here.
pub const AQI_MAX: u16 = 500;

/// (pm_low, pm_high, aqi_low, aqi_high), µg/m³ against index.
const BREAKPOINTS: [(f64, f64, u16, u16); 6] = [
    (0.0, 12.0, 0, 50),
    (12.1, 35.4, 51, 100),
    (35.5, 55.4, 101, 150),
    (55.5, 150.4, 151, 200),
    (150.5, 250.4, 201, 300),
    (250.5, 500.4, 301, 500),
];

/// Truncate to one decimal so 12.05 lands in the first band, not between bands.
fn truncate_tenths(pm25: f64) -> f64 {
    ((pm25 * 10.0) + 1e-9).floor() / 10.0
}

/// Linear interpolation inside the matching breakpoint band.
pub fn aqi_from_pm25(pm25: f64) -> Result<u16> {
    ensure_quantity("pm25", pm25)?;
    let pm = truncate_tenths(pm25);
    for (pm_lo, pm_hi, aqi_lo, aqi_hi) in BREAKPOINTS {
        if pm >= pm_lo && pm <= pm_hi {
            let slope = f64::from(aqi_hi - aqi_lo) / (pm_hi - pm_lo);
            let aqi = (slope * (pm - pm_lo) + f64::from(aqi_lo)).round();
            return Ok((aqi as u16).min(AQI_MAX));
        }
    }
    Ok(AQI_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiTier {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiTier {
    pub const ALL: [AqiTier; 6] = [
        AqiTier::Good,
        AqiTier::Moderate,
        AqiTier::UnhealthyForSensitiveGroups,
        AqiTier::Unhealthy,
        AqiTier::VeryUnhealthy,
        AqiTier::Hazardous,
    ];

    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiTier::Good,
            51..=100 => AqiTier::Moderate,
            101..=150 => AqiTier::UnhealthyForSensitiveGroups,
            151..=200 => AqiTier::Unhealthy,
            201..=300 => AqiTier::VeryUnhealthy,
            _ => AqiTier::Hazardous,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AqiTier::Good => "Good",
            AqiTier::Moderate => "Moderate",
            AqiTier::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiTier::Unhealthy => "Unhealthy",
            AqiTier::VeryUnhealthy => "Very Unhealthy",
            AqiTier::Hazardous => "Hazardous",
        }
    }

    pub fn health_message(self) -> &'static str {
        match self {
            AqiTier::Good => {
                "Air quality is satisfactory, and air pollution poses little or no risk."
            }
            AqiTier::Moderate => {
                "Air quality is acceptable. However, there may be a risk for some people."
            }
            AqiTier::UnhealthyForSensitiveGroups | AqiTier::Unhealthy => {
                "Some members of the general public may experience health effects."
            }
            AqiTier::VeryUnhealthy => {
                "Health alert: The risk of health effects is increased for everyone."
            }
            AqiTier::Hazardous => {
                "Health warning of emergency conditions: everyone is more likely to be affected."
            }
        }
    }
}

/// Classified reading. Missing data is `Unknown`, never index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiReading {
    Known { aqi: u16, tier: AqiTier },
    Unknown,
}

impl AqiReading {
    pub fn from_pm25(pm25: Option<f64>) -> Result<Self> {
        match pm25 {
            None => Ok(AqiReading::Unknown),
            Some(pm) => {
                let aqi = aqi_from_pm25(pm)?;
                Ok(AqiReading::Known {
                    aqi,
                    tier: AqiTier::from_aqi(aqi),
                })
            }
        }
    }

    pub fn aqi(&self) -> Option<u16> {
        match self {
            AqiReading::Known { aqi, .. } => Some(*aqi),
            AqiReading::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiReading::Known { tier, .. } => tier.name(),
            AqiReading::Unknown => "Unknown",
        }
    }

    pub fn health_message(&self) -> &'static str {
        match self {
            AqiReading::Known { tier, .. } => tier.health_message(),
            AqiReading::Unknown => "No data available",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FootprintError;

    #[test]
    fn test_band_edges() {
        assert_eq!(aqi_from_pm25(0.0).unwrap(), 0);
        assert_eq!(aqi_from_pm25(12.0).unwrap(), 50);
        assert_eq!(aqi_from_pm25(12.1).unwrap(), 51);
        assert_eq!(aqi_from_pm25(35.4).unwrap(), 100);
        assert_eq!(aqi_from_pm25(35.5).unwrap(), 101);
        assert_eq!(aqi_from_pm25(500.4).unwrap(), 500);
    }

    #[test]
    fn test_gap_values_are_truncated() {
        assert_eq!(aqi_from_pm25(12.05).unwrap(), 50);
        assert_eq!(aqi_from_pm25(35.45).unwrap(), 100);
    }

    #[test]
    fn test_saturates_above_scale() {
        assert_eq!(aqi_from_pm25(600.0).unwrap(), 500);
        assert_eq!(aqi_from_pm25(500.5).unwrap(), 500);
    }

    #[test]
    fn test_mid_band_interpolation() {
        // 50/12 * 6 = 25
        assert_eq!(aqi_from_pm25(6.0).unwrap(), 25);
        assert_eq!(AqiTier::from_aqi(aqi_from_pm25(41.0).unwrap()), AqiTier::UnhealthyForSensitiveGroups);
    }

    #[test]
    fn test_rejects_bad_concentrations() {
        assert!(matches!(aqi_from_pm25(-1.0), Err(FootprintError::InvalidInput(_))));
        assert!(aqi_from_pm25(f64::NAN).is_err());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(AqiTier::from_aqi(50), AqiTier::Good);
        assert_eq!(AqiTier::from_aqi(51), AqiTier::Moderate);
        assert_eq!(AqiTier::from_aqi(300), AqiTier::VeryUnhealthy);
        assert_eq!(AqiTier::from_aqi(301), AqiTier::Hazardous);
        assert_eq!(AqiTier::Hazardous.name(), "Hazardous");
    }

    #[test]
    fn test_missing_reading_is_unknown() {
        let reading = AqiReading::from_pm25(None).unwrap();
        assert_eq!(reading, AqiReading::Unknown);
        assert_eq!(reading.aqi(), None);
        assert_eq!(reading.label(), "Unknown");
        assert_eq!(reading.health_message(), "No data available");
    }

    #[test]
    fn test_zero_is_a_real_reading() {
        let reading = AqiReading::from_pm25(Some(0.0)).unwrap();
        assert_eq!(
            reading,
            AqiReading::Known {
                aqi: 0,
                tier: AqiTier::Good
            }
        );
    }
}
