//! Per-user session service: factor table, config, progress and store in one
//! owner. Every mutation persists the whole progress record afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::calculator::{self, Comparison, EmissionResult, LifestyleInput, Recommendation};
use crate::certificates::{self, Certificate, JourneyEntry, ProgressState};
use crate::challenge::DayOutcome;
use crate::chatbot::ChatSession;
use crate::config::FootprintConfig;
use crate::error::Result;
use crate::factors::EmissionFactorTable;
use crate::offset::{self, OffsetPlan};
use crate::store::{self, BlobStore, FileBlobStore};

/// Whether the post-mutation save reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PersistStatus {
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The in-memory update stands; only the write failed.
    Failed(String),
}

impl PersistStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistStatus::Saved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationOutcome {
    pub result: EmissionResult,
    pub newly_earned: Vec<Certificate>,
    pub comparison: Comparison,
    pub recommendations: Vec<Recommendation>,
    pub persist: PersistStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeOutcome {
    pub day: DayOutcome,
    pub newly_earned: Vec<Certificate>,
    pub persist: PersistStatus,
}

pub struct FootprintSession {
    config: FootprintConfig,
    factors: EmissionFactorTable,
    state: ProgressState,
    store: Box<dyn BlobStore>,
    chat: ChatSession,
    last_result: Option<EmissionResult>,
}

impl FootprintSession {
    /// Session backed by a file store under `config.progress_dir`.
    pub fn open(config: FootprintConfig) -> Result<Self> {
        config.validate()?;
        let factors = config.factor_table()?;
        let store = FileBlobStore::new(&config.progress_dir);
        Ok(Self::with_store(config, factors, Box::new(store)))
    }

    /// Session over any store; saved progress is loaded once here.
    pub fn with_store(
        config: FootprintConfig,
        factors: EmissionFactorTable,
        store: Box<dyn BlobStore>,
    ) -> Self {
        let state = store::load_progress(store.as_ref());
        let chat = ChatSession::new(config.chat_message_limit);
        info!(region = %config.region, earned = state.earned().len(), "session opened");
        FootprintSession {
            config,
            factors,
            state,
            store,
            chat,
            last_result: None,
        }
    }

    pub fn config(&self) -> &FootprintConfig {
        &self.config
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    pub fn progress(&self) -> &ProgressState {
        &self.state
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    pub fn last_result(&self) -> Option<&EmissionResult> {
        self.last_result.as_ref()
    }

    fn persist(&mut self) -> PersistStatus {
        match store::save_progress(self.store.as_mut(), &self.state) {
            Ok(()) => PersistStatus::Saved,
            Err(e) => {
                warn!(error = %e, "progress not saved, keeping in-memory state");
                PersistStatus::Failed(e.to_string())
            }
        }
    }

    // ---- Calculation ------------------------------------------------------

    pub fn calculate(&mut self, input: &LifestyleInput) -> Result<CalculationOutcome> {
        self.calculate_at(input, Utc::now())
    }

    /// Invalid input is rejected before any state changes.
    pub fn calculate_at(
        &mut self,
        input: &LifestyleInput,
        now: DateTime<Utc>,
    ) -> Result<CalculationOutcome> {
        let result = calculator::compute(input, &self.factors, &self.config.region)?;

        self.state.calculations += 1;
        let newly_earned = certificates::evaluate(&result, &mut self.state, &self.config.thresholds, now);
        self.state.push_journey(
            JourneyEntry {
                recorded_at: now,
                result,
            },
            self.config.journey_capacity,
        );
        self.last_result = Some(result);
        info!(
            total_kg = result.total,
            newly_earned = newly_earned.len(),
            "footprint calculated"
        );

        let persist = self.persist();
        Ok(CalculationOutcome {
            result,
            newly_earned,
            comparison: Comparison::against(&result, &self.config.averages),
            recommendations: calculator::recommendations(&result),
            persist,
        })
    }

    pub fn offsets(&self, total_kg_co2e: f64) -> Result<OffsetPlan> {
        offset::estimate_with(total_kg_co2e, &self.config.offset_prices)
    }

    // ---- Weekly challenge ---------------------------------------------------

    pub fn mark_challenge_day(&mut self) -> ChallengeOutcome {
        self.mark_challenge_day_at(Utc::now())
    }

    pub fn mark_challenge_day_at(&mut self, now: DateTime<Utc>) -> ChallengeOutcome {
        let (day, newly_earned) =
            certificates::on_challenge_day_complete(&mut self.state, &self.config.thresholds, now);
        if day == DayOutcome::AlreadyComplete {
            return ChallengeOutcome {
                day,
                newly_earned,
                persist: PersistStatus::Unchanged,
            };
        }
        info!(
            completed_days = self.state.challenge.completed_days,
            cycles = self.state.completed_cycles,
            "challenge day marked"
        );
        let persist = self.persist();
        ChallengeOutcome {
            day,
            newly_earned,
            persist,
        }
    }

    pub fn reset_challenge(&mut self) -> PersistStatus {
        self.state.challenge.reset();
        info!("weekly challenge reset");
        self.persist()
    }

    /// Explicit user action: wipes certificates, cycles and journey.
    pub fn reset_all(&mut self) -> PersistStatus {
        self.state.reset_all();
        self.last_result = None;
        warn!("all progress reset");
        self.persist()
    }

    // ---- Chat -----------------------------------------------------------------

    pub fn chat(&mut self, text: &str) -> Result<&'static str> {
        self.chat.ask(text)
    }

    pub fn chat_session(&self) -> &ChatSession {
        &self.chat
    }

    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }
}
