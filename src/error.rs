use thiserror::Error;

/// Errors raised by the footprint engine and its persistence layer.
#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no emission factors for region {0:?}")]
    UnknownRegion(String),
    #[error("region {region:?} has no factor for {key}")]
    UnknownFactor { region: String, key: String },
    #[error("invalid emission factor for {key}: {value}")]
    InvalidFactor { key: String, value: f64 },
    #[error("missing data: {0}")]
    MissingData(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("chat limit of {limit} messages reached, clear the chat to continue")]
    ChatLimitReached { limit: usize },
    #[error("configuration error: {0}")]
    Config(String),
}

impl FootprintError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FootprintError::InvalidInput(msg.into())
    }
}

impl From<std::io::Error> for FootprintError {
    fn from(e: std::io::Error) -> Self {
        FootprintError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for FootprintError {
    fn from(e: serde_json::Error) -> Self {
        FootprintError::Persistence(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FootprintError>;

/// Rejects negative and non-finite quantities.
pub(crate) fn ensure_quantity(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FootprintError::invalid(format!("{name} must be a finite number")));
    }
    if value < 0.0 {
        return Err(FootprintError::invalid(format!(
            "{name} must not be negative (got {value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_quantity() {
        assert!(ensure_quantity("distance_km", 0.0).is_ok());
        assert!(ensure_quantity("distance_km", 12.5).is_ok());
        assert!(matches!(
            ensure_quantity("distance_km", -0.1),
            Err(FootprintError::InvalidInput(_))
        ));
        assert!(ensure_quantity("distance_km", f64::NAN).is_err());
        assert!(ensure_quantity("distance_km", f64::INFINITY).is_err());
    }

    #[test]
    fn test_display_messages() {
        let err = FootprintError::UnknownFactor {
            region: "India".into(),
            key: "Car".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("India"), "got: {msg}");
        assert!(msg.contains("Car"), "got: {msg}");

        let err = FootprintError::ChatLimitReached { limit: 10 };
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_io_error_maps_to_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FootprintError = io.into();
        assert!(matches!(err, FootprintError::Persistence(_)));
    }
}
