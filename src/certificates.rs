use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculator::EmissionResult;
use crate::challenge::{DayOutcome, WeeklyChallenge};

/// Version stamp of the persisted progress record.
pub const PROGRESS_VERSION: u32 = 1;

// ---- Certificate catalogue ------------------------------------------------

/// The fixed set of certificates a user can earn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Certificate {
    #[serde(rename = "Green Novice")]
    GreenNovice,
    #[serde(rename = "Eco Warrior")]
    EcoWarrior,
    #[serde(rename = "Climate Champion")]
    ClimateChampion,
    #[serde(rename = "Earth Guardian")]
    EarthGuardian,
}

impl Certificate {
    pub const ALL: [Certificate; 4] = [
        Certificate::GreenNovice,
        Certificate::EcoWarrior,
        Certificate::ClimateChampion,
        Certificate::EarthGuardian,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Certificate::GreenNovice => "Green Novice",
            Certificate::EcoWarrior => "Eco Warrior",
            Certificate::ClimateChampion => "Climate Champion",
            Certificate::EarthGuardian => "Earth Guardian",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Certificate::GreenNovice => "🌱",
            Certificate::EcoWarrior => "⚔️",
            Certificate::ClimateChampion => "🏆",
            Certificate::EarthGuardian => "🌍",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Certificate::GreenNovice => {
                "Awarded for taking the first step in calculating your carbon footprint"
            }
            Certificate::EcoWarrior => {
                "Keep emissions below global average or complete weekly challenges"
            }
            Certificate::ClimateChampion => "Maintain emissions below the regional average",
            Certificate::EarthGuardian => "Achieve extremely low carbon emissions",
        }
    }

    /// Requirement lines rendered on the certificate card.
    pub fn requirements(self, thresholds: &CertificateThresholds) -> Vec<String> {
        match self {
            Certificate::GreenNovice => {
                vec!["Complete your first carbon footprint calculation".to_string()]
            }
            Certificate::EcoWarrior => vec![
                format!(
                    "Emissions below {} tonnes CO2/year",
                    thresholds.eco_warrior_tonnes
                ),
                format!(
                    "OR complete {} weekly challenges",
                    thresholds.eco_warrior_cycles
                ),
            ],
            Certificate::ClimateChampion => vec![format!(
                "Emissions below {} tonnes CO2/year",
                thresholds.climate_champion_tonnes
            )],
            Certificate::EarthGuardian => vec![format!(
                "Emissions below {} tonnes CO2/year",
                thresholds.earth_guardian_tonnes
            )],
        }
    }
}

/// Emission thresholds (tonnes/year) and the challenge-cycle goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateThresholds {
    pub eco_warrior_tonnes: f64,
    pub climate_champion_tonnes: f64,
    pub earth_guardian_tonnes: f64,
    pub eco_warrior_cycles: u32,
}

impl Default for CertificateThresholds {
    fn default() -> Self {
        CertificateThresholds {
            eco_warrior_tonnes: 4.79,
            climate_champion_tonnes: 1.9,
            earth_guardian_tonnes: 1.0,
            eco_warrior_cycles: 3,
        }
    }
}

// ---- Records --------------------------------------------------------------

/// Earned flag plus progress in [0,1] for one certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub earned: bool,
    pub progress: f64,
    #[serde(default)]
    pub earned_at: Option<DateTime<Utc>>,
}

impl AchievementRecord {
    /// Mark earned, returning true only on the false -> true transition.
    fn award(&mut self, now: DateTime<Utc>) -> bool {
        self.progress = 1.0;
        if self.earned {
            return false;
        }
        self.earned = true;
        self.earned_at = Some(now);
        true
    }

    /// Progress never moves backwards.
    fn raise_progress(&mut self, progress: f64) {
        if !self.earned {
            self.progress = self.progress.max(progress.clamp(0.0, 1.0));
        }
    }
}

/// One calculation in the user's carbon journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyEntry {
    pub recorded_at: DateTime<Utc>,
    pub result: EmissionResult,
}

/// Everything persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub version: u32,
    pub certificates: BTreeMap<Certificate, AchievementRecord>,
    pub challenge: WeeklyChallenge,
    /// Weekly challenges completed in full.
    pub completed_cycles: u32,
    pub calculations: u64,
    #[serde(default)]
    pub journey: Vec<JourneyEntry>,
}

impl Default for ProgressState {
    fn default() -> Self {
        ProgressState {
            version: PROGRESS_VERSION,
            certificates: Certificate::ALL
                .iter()
                .map(|&c| (c, AchievementRecord::default()))
                .collect(),
            challenge: WeeklyChallenge::default(),
            completed_cycles: 0,
            calculations: 0,
            journey: Vec::new(),
        }
    }
}

impl ProgressState {
    pub fn record(&self, certificate: Certificate) -> Option<&AchievementRecord> {
        self.certificates.get(&certificate)
    }

    pub fn is_earned(&self, certificate: Certificate) -> bool {
        self.record(certificate).is_some_and(|r| r.earned)
    }

    pub fn earned(&self) -> Vec<Certificate> {
        Certificate::ALL
            .into_iter()
            .filter(|&c| self.is_earned(c))
            .collect()
    }

    fn record_mut(&mut self, certificate: Certificate) -> &mut AchievementRecord {
        self.certificates.entry(certificate).or_default()
    }

    /// Fill in records missing from an older or hand-edited file.
    pub fn normalize(&mut self) {
        for c in Certificate::ALL {
            self.certificates.entry(c).or_default();
        }
        self.challenge.completed_days = self.challenge.completed_days.min(self.challenge.target_days);
    }

    /// Append to the journey, dropping the oldest entries beyond `capacity`.
    pub fn push_journey(&mut self, entry: JourneyEntry, capacity: usize) {
        self.journey.push(entry);
        if self.journey.len() > capacity {
            let excess = self.journey.len() - capacity;
            self.journey.drain(..excess);
        }
    }

    /// Explicit "reset all progress"; the only path that clears earned flags.
    pub fn reset_all(&mut self) {
        *self = ProgressState::default();
    }
}

// ---- Evaluation -----------------------------------------------------------

/// Apply a new calculation result. Returns certificates newly earned.
///
/// Monotonic and idempotent: re-evaluating the same result changes nothing,
/// and no input ever clears an earned flag.
pub fn evaluate(
    result: &EmissionResult,
    state: &mut ProgressState,
    thresholds: &CertificateThresholds,
    now: DateTime<Utc>,
) -> Vec<Certificate> {
    let tonnes = result.total_tonnes();
    let mut newly = Vec::new();

    if state.record_mut(Certificate::GreenNovice).award(now) {
        newly.push(Certificate::GreenNovice);
    }

    let tiers = [
        (Certificate::EcoWarrior, thresholds.eco_warrior_tonnes),
        (Certificate::ClimateChampion, thresholds.climate_champion_tonnes),
        (Certificate::EarthGuardian, thresholds.earth_guardian_tonnes),
    ];
    for (certificate, limit) in tiers {
        if tonnes < limit && state.record_mut(certificate).award(now) {
            newly.push(certificate);
        }
    }

    apply_cycle_progress(state, thresholds, now, &mut newly);
    newly
}

/// Mark one weekly-challenge day. Completing a week counts one cycle toward
/// the Eco Warrior cycle goal.
pub fn on_challenge_day_complete(
    state: &mut ProgressState,
    thresholds: &CertificateThresholds,
    now: DateTime<Utc>,
) -> (DayOutcome, Vec<Certificate>) {
    let outcome = state.challenge.mark_day();
    let mut newly = Vec::new();
    if outcome == DayOutcome::CycleCompleted {
        state.completed_cycles += 1;
        apply_cycle_progress(state, thresholds, now, &mut newly);
    }
    (outcome, newly)
}

fn apply_cycle_progress(
    state: &mut ProgressState,
    thresholds: &CertificateThresholds,
    now: DateTime<Utc>,
    newly: &mut Vec<Certificate>,
) {
    let goal = thresholds.eco_warrior_cycles;
    let cycles = state.completed_cycles;
    let record = state.record_mut(Certificate::EcoWarrior);
    if cycles >= goal {
        if record.award(now) {
            newly.push(Certificate::EcoWarrior);
        }
    } else {
        record.raise_progress(f64::from(cycles) / f64::from(goal));
    }
}
