use serde::{Deserialize, Serialize};

/// The single active weekly challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChallenge {
    pub title: String,
    pub description: String,
    /// Display text, e.g. "2.5 kg CO2".
    pub carbon_saving: String,
    pub target_days: u32,
    pub completed_days: u32,
}

impl Default for WeeklyChallenge {
    fn default() -> Self {
        WeeklyChallenge {
            title: "Walk or Cycle to Work".to_string(),
            description: "Replace your usual commute with walking or cycling for at least 3 days this week."
                .to_string(),
            carbon_saving: "2.5 kg CO2".to_string(),
            target_days: 7,
            completed_days: 0,
        }
    }
}

/// Result of marking one challenge day as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOutcome {
    /// Counter advanced but the week is not finished.
    Progressed { completed_days: u32 },
    /// This mark finished the week.
    CycleCompleted,
    /// Counter already at target; nothing changed.
    AlreadyComplete,
}

impl WeeklyChallenge {
    pub fn is_complete(&self) -> bool {
        self.completed_days >= self.target_days
    }

    /// Completed fraction in [0,1].
    pub fn fraction(&self) -> f64 {
        if self.target_days == 0 {
            return 1.0;
        }
        (f64::from(self.completed_days) / f64::from(self.target_days)).min(1.0)
    }

    /// Increment the day counter, capped at the target.
    pub fn mark_day(&mut self) -> DayOutcome {
        if self.is_complete() {
            return DayOutcome::AlreadyComplete;
        }
        self.completed_days += 1;
        if self.is_complete() {
            DayOutcome::CycleCompleted
        } else {
            DayOutcome::Progressed {
                completed_days: self.completed_days,
            }
        }
    }

    pub fn reset(&mut self) {
        self.completed_days = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_day_until_complete() {
        let mut ch = WeeklyChallenge::default();
        for day in 1..7 {
            assert_eq!(ch.mark_day(), DayOutcome::Progressed { completed_days: day });
        }
        assert_eq!(ch.mark_day(), DayOutcome::CycleCompleted);
        assert!(ch.is_complete());
        assert_eq!(ch.fraction(), 1.0);
    }

    #[test]
    fn test_counter_is_capped() {
        let mut ch = WeeklyChallenge::default();
        ch.completed_days = 7;
        assert_eq!(ch.mark_day(), DayOutcome::AlreadyComplete);
        assert_eq!(ch.completed_days, 7);
    }

    #[test]
    fn test_reset() {
        let mut ch = WeeklyChallenge::default();
        ch.mark_day();
        ch.mark_day();
        ch.reset();
        assert_eq!(ch.completed_days, 0);
        assert_eq!(ch.fraction(), 0.0);
    }

    #[test]
    fn test_zero_target_is_always_complete() {
        let mut ch = WeeklyChallenge {
            target_days: 0,
            ..WeeklyChallenge::default()
        };
        assert_eq!(ch.mark_day(), DayOutcome::AlreadyComplete);
    }
}
