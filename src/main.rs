use std::error::Error;

use cyboair_footprint::{
    assess_location, get_suggestions, AirQualitySample, Certificate, CookingFuel, DietType,
    FootprintConfig, FootprintSession, LifestyleInput, LocationProvider, TransportMode,
    WeeklyWaste,
};
use tracing_subscriber::EnvFilter;

/// Offline stand-in for a geocoding / OpenAQ client.
struct StaticProvider;

impl LocationProvider for StaticProvider {
    fn reverse_geocode(&self, _latitude: f64, _longitude: f64) -> Option<String> {
        Some("Connaught Place, New Delhi, India".to_string())
    }

    fn fetch_air_quality(&self, _latitude: f64, _longitude: f64) -> Option<AirQualitySample> {
        Some(AirQualitySample {
            pm25: Some(85.5),
            pm10: Some(180.0),
            ..AirQualitySample::default()
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional config path as the first argument.
    let config = match std::env::args().nth(1) {
        Some(path) => FootprintConfig::from_json_file(path)?,
        None => FootprintConfig::default(),
    };
    let mut session = FootprintSession::open(config)?;

    // 10 km/day by car, 200 kWh/month, electric cooking, vegetarian x3.
    let input = LifestyleInput {
        transport: TransportMode::Car,
        daily_distance_km: 10.0,
        flights_per_year: 0,
        monthly_electricity_kwh: 200.0,
        cooking_fuel: CookingFuel::Electric,
        monthly_fuel_kg: 0.0,
        diet: DietType::Vegetarian,
        meals_per_day: 3,
        weekly_waste: WeeklyWaste::default(),
    };
    let outcome = session.calculate(&input)?;
    let r = outcome.result;
    println!(
        "footprint,{:.1},{:.1},{:.1},{:.1},{:.1},{:.2}t",
        r.transport,
        r.energy,
        r.diet,
        r.waste,
        r.total,
        r.total_tonnes()
    );
    println!(
        "vs_average,global={:.0}%,regional={:.0}%",
        outcome.comparison.percent_of_global, outcome.comparison.percent_of_regional
    );
    for tip in &outcome.recommendations {
        println!("tip,{},{}", tip.category.label(), tip.tip);
    }

    for cert in Certificate::ALL {
        let progress = session.progress().record(cert).map_or(0.0, |rec| rec.progress);
        println!(
            "certificate,{},{},{:.2}",
            cert.name(),
            session.progress().is_earned(cert),
            progress
        );
    }

    let plan = session.offsets(r.total)?;
    println!(
        "offsets,trees={:.1} ({:.0}),solar={:.2} ({:.0}),credits={:.2} ({:.0})",
        plan.trees.count,
        plan.trees.cost,
        plan.solar_panels.count,
        plan.solar_panels.cost,
        plan.carbon_credits.count,
        plan.carbon_credits.cost
    );

    let day = session.mark_challenge_day();
    let ch = &session.progress().challenge;
    println!(
        "challenge,{},{}/{},{:?}",
        ch.title, ch.completed_days, ch.target_days, day.day
    );

    let report = assess_location(&StaticProvider, 28.6315, 77.2167)?;
    println!(
        "air,{},{},{}",
        report.address.as_deref().unwrap_or("unknown"),
        report.reading.aqi().map_or("n/a".to_string(), |a| a.to_string()),
        report.reading.label()
    );

    let question = get_suggestions()[1];
    let answer = session.chat(question)?;
    println!("chat,{question}");
    println!("{answer}");

    if !outcome.persist.is_saved() {
        eprintln!("warning: progress was not saved");
    }
    Ok(())
}
