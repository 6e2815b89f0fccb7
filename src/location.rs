//! Location assessment against an external geocoding / air-quality provider.
//!
//! The provider itself lives outside this crate. This module validates
//! coordinates, classifies whatever PM2.5 the provider returned and decodes
//! OpenAQ-style payloads for providers that fetch raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::aqi::AqiReading;
use crate::error::{FootprintError, Result};

/// Raw measurements for one place. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

pub trait LocationProvider {
    fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Option<String>;
    fn fetch_air_quality(&self, latitude: f64, longitude: f64) -> Option<AirQualitySample>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub sample: Option<AirQualitySample>,
    pub reading: AqiReading,
}

impl LocationReport {
    /// The provider's sample, or `MissingData` when it returned nothing.
    pub fn require_sample(&self) -> Result<&AirQualitySample> {
        self.sample.as_ref().ok_or_else(|| {
            FootprintError::MissingData(format!(
                "no air quality data near ({}, {})",
                self.latitude, self.longitude
            ))
        })
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(FootprintError::invalid(format!(
            "latitude must be within [-90, 90] (got {latitude})"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(FootprintError::invalid(format!(
            "longitude must be within [-180, 180] (got {longitude})"
        )));
    }
    Ok(())
}

/// Classify a provider value; an unusable concentration reads as `Unknown`.
fn reading_or_unknown(pm25: Option<f64>) -> AqiReading {
    AqiReading::from_pm25(pm25).unwrap_or_else(|e| {
        debug!(error = %e, "unusable pm25 value");
        AqiReading::Unknown
    })
}

/// Only the coordinates can fail the assessment. Absent or malformed
/// provider fields come back as `None` / `Unknown`.
pub fn assess_location<P: LocationProvider + ?Sized>(
    provider: &P,
    latitude: f64,
    longitude: f64,
) -> Result<LocationReport> {
    validate_coordinates(latitude, longitude)?;
    let address = provider.reverse_geocode(latitude, longitude);
    let sample = provider.fetch_air_quality(latitude, longitude);
    let reading = reading_or_unknown(sample.and_then(|s| s.pm25));
    debug!(latitude, longitude, aqi = ?reading.aqi(), "location assessed");
    Ok(LocationReport {
        latitude,
        longitude,
        address,
        sample,
        reading,
    })
}

// ---- OpenAQ payloads --------------------------------------------------------

/// One classified PM2.5 measurement from a history query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiPoint {
    pub timestamp: DateTime<Utc>,
    pub reading: AqiReading,
}

fn results(payload: &Value) -> Result<&Vec<Value>> {
    payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| FootprintError::MissingData("payload has no results array".into()))
}

/// Decode a `latest` response: first station, `pm25` and `pm10` measurements.
pub fn parse_latest(payload: &Value) -> Result<AirQualitySample> {
    let station = results(payload)?
        .first()
        .ok_or_else(|| FootprintError::MissingData("no stations in range".into()))?;
    let measurements = station
        .get("measurements")
        .and_then(Value::as_array)
        .ok_or_else(|| FootprintError::MissingData("station has no measurements".into()))?;

    let value_of = |parameter: &str| {
        measurements
            .iter()
            .find(|m| m.get("parameter").and_then(Value::as_str) == Some(parameter))
            .and_then(|m| m.get("value"))
            .and_then(Value::as_f64)
    };

    Ok(AirQualitySample {
        pm25: value_of("pm25"),
        pm10: value_of("pm10"),
        ..AirQualitySample::default()
    })
}

/// Decode a `measurements` response into time-ordered PM2.5 AQI points.
/// Rows for other parameters are skipped; unusable values become `Unknown`.
pub fn parse_history(payload: &Value) -> Result<Vec<AqiPoint>> {
    let mut points = Vec::new();
    for row in results(payload)? {
        if row.get("parameter").and_then(Value::as_str) != Some("pm25") {
            continue;
        }
        let stamp = row
            .get("date")
            .and_then(|d| d.get("utc"))
            .and_then(Value::as_str)
            .ok_or_else(|| FootprintError::MissingData("measurement without date.utc".into()))?;
        let timestamp = DateTime::parse_from_rfc3339(stamp)
            .map_err(|e| FootprintError::MissingData(format!("bad timestamp {stamp:?}: {e}")))?
            .with_timezone(&Utc);
        let value = row.get("value").and_then(Value::as_f64);
        let reading = reading_or_unknown(value);
        points.push(AqiPoint { timestamp, reading });
    }
    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}
