use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use cyboair_footprint::store::{load_progress, PROGRESS_KEY};
use cyboair_footprint::{
    BlobStore, Certificate, CookingFuel, DietType, EmissionFactorTable, FileBlobStore,
    FootprintConfig, FootprintSession, LifestyleInput, MemoryBlobStore, TransportMode,
    WeeklyWaste,
};

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

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cyboair_footprint_e2e_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_commuter_scenario() {
    let mut session = FootprintSession::with_store(
        FootprintConfig::default(),
        EmissionFactorTable::canonical(),
        Box::new(MemoryBlobStore::new()),
    );
    let now = Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap();
    let outcome = session.calculate_at(&commuter(), now).unwrap();

    let r = outcome.result;
    assert!((r.transport - 730.0).abs() < 1e-9);
    assert!((r.energy - 2040.0).abs() < 1e-9);
    assert!((r.diet - 876.0).abs() < 1e-9);
    assert_eq!(r.waste, 0.0);
    assert!((r.total - 3646.0).abs() < 1e-9);
    assert_eq!(r.total, r.transport + r.energy + r.diet + r.waste);

    assert_eq!(
        outcome.newly_earned,
        vec![Certificate::GreenNovice, Certificate::EcoWarrior]
    );
    let progress = session.progress();
    assert!(progress.is_earned(Certificate::EcoWarrior));
    assert!(!progress.is_earned(Certificate::ClimateChampion));
    assert!(!progress.is_earned(Certificate::EarthGuardian));
    assert_eq!(
        progress.record(Certificate::EcoWarrior).unwrap().earned_at,
        Some(now)
    );

    assert!(outcome.comparison.below_global);
    assert!(!outcome.comparison.below_regional);
    // Energy at 2.04 t is the only category over its tip threshold.
    assert_eq!(outcome.recommendations.len(), 1);

    let plan = session.offsets(r.total).unwrap();
    assert!((plan.trees.count - 182.3).abs() < 1e-9);
}

#[test]
fn test_progress_survives_reopen() {
    let dir = test_dir("reopen");
    let config = FootprintConfig {
        progress_dir: dir.clone(),
        ..FootprintConfig::default()
    };

    {
        let mut session = FootprintSession::open(config.clone()).unwrap();
        let outcome = session.calculate(&commuter()).unwrap();
        assert!(outcome.persist.is_saved());
        for _ in 0..3 {
            session.mark_challenge_day();
        }
    }
    assert!(dir.join("user_progress.json").exists());
    assert!(!dir.join("user_progress.json.tmp").exists());

    let session = FootprintSession::open(config).unwrap();
    let progress = session.progress();
    assert!(progress.is_earned(Certificate::GreenNovice));
    assert!(progress.is_earned(Certificate::EcoWarrior));
    assert!(!progress.is_earned(Certificate::ClimateChampion));
    assert_eq!(progress.challenge.completed_days, 3);
    assert_eq!(progress.journey.len(), 1);

    let store = FileBlobStore::new(&dir);
    assert!(store.get(PROGRESS_KEY).unwrap().is_some());
    assert_eq!(&load_progress(&store), progress);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_worse_result_never_revokes() {
    let mut session = FootprintSession::with_store(
        FootprintConfig::default(),
        EmissionFactorTable::canonical(),
        Box::new(MemoryBlobStore::new()),
    );
    session.calculate(&commuter()).unwrap();

    let mut heavy = commuter();
    heavy.transport = TransportMode::Airplane;
    heavy.flights_per_year = 20;
    let outcome = session.calculate(&heavy).unwrap();
    assert!(outcome.result.total_tonnes() > 4.79);
    assert!(outcome.newly_earned.is_empty());
    assert!(session.progress().is_earned(Certificate::EcoWarrior));
}
