#![forbid(unsafe_code)]

//! Personal carbon footprint engine: annual emissions from lifestyle inputs,
//! certificate and weekly-challenge progress, offset estimates, an FAQ
//! assistant and PM2.5 air quality classification.

pub mod aqi;
pub mod calculator;
pub mod certificates;
pub mod challenge;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod factors;
pub mod location;
pub mod offset;
pub mod session;
pub mod store;

pub use aqi::{aqi_from_pm25, AqiReading, AqiTier};
pub use calculator::{
    compute, recommendations, Comparison, EmissionResult, LifestyleInput, Recommendation,
    ReferenceAverages, WeeklyWaste,
};
pub use certificates::{
    evaluate, on_challenge_day_complete, AchievementRecord, Certificate, CertificateThresholds,
    ProgressState,
};
pub use challenge::{DayOutcome, WeeklyChallenge};
pub use chatbot::{get_response, get_suggestions, ChatSession, Topic};
pub use config::FootprintConfig;
pub use error::{FootprintError, Result};
pub use factors::{
    Category, CookingFuel, DietType, EmissionFactorTable, FactorKey, TransportMode, WasteKind,
};
pub use location::{assess_location, AirQualitySample, LocationProvider, LocationReport};
pub use offset::{estimate, OffsetPlan, OffsetPrices};
pub use session::{CalculationOutcome, ChallengeOutcome, FootprintSession, PersistStatus};
pub use store::{BlobStore, FileBlobStore, MemoryBlobStore};
