//! Debounced intrusion alarm.
//!
//! The alarm is a two-state machine (inactive/active) with a time-decayed
//! exit: it switches on as soon as any confirmed track is inside a zone and
//! only switches off after no intrusion has been seen for the cooldown
//! period. This suppresses flicker when a foot-point hovers on a zone edge
//! or a track is briefly occluded.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Seconds without intrusion before the alarm deactivates
    pub cooldown_seconds: f64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 3.0,
        }
    }
}

impl AlarmConfig {
    /// Check that the cooldown is a usable duration.
    pub fn validate(&self) -> Result<()> {
        self.cooldown().map(|_| ())
    }

    /// The cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.cooldown_seconds).map_err(|_| {
            Error::InvalidConfig(format!(
                "cooldown_seconds must be a finite value >= 0, got {}",
                self.cooldown_seconds
            ))
        })
    }
}

/// Snapshot of the alarm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmState {
    pub active: bool,
    /// When the current activation began
    pub activated_at: Option<Instant>,
    /// Most recent cycle with at least one intruder
    pub last_intrusion_at: Option<Instant>,
    /// Intruders seen in the most recent intruding cycle
    pub intruding_track_ids: BTreeSet<u64>,
}

/// What changed during an alarm update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmTransition {
    Unchanged,
    Activated,
    /// First cycle without intruders while active
    CooldownStarted,
    Deactivated,
}

/// Global intrusion alarm with a cooldown before switching off.
#[derive(Debug, Clone)]
pub struct AlarmController {
    cooldown: Duration,
    state: AlarmState,
    cooling_down: bool,
}

impl AlarmController {
    /// Create an inactive alarm with the given cooldown.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: AlarmState::default(),
            cooling_down: false,
        }
    }

    /// Create an inactive alarm from validated configuration.
    pub fn from_config(config: &AlarmConfig) -> Result<Self> {
        Ok(Self::new(config.cooldown()?))
    }

    /// Get the current alarm snapshot.
    pub fn state(&self) -> &AlarmState {
        &self.state
    }

    /// Whether the alarm is currently raised.
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Get the configured cooldown.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Fold one cycle's intruding set into the alarm state.
    pub fn update(&mut self, intruders: &BTreeSet<u64>, now: Instant) -> AlarmTransition {
        if !intruders.is_empty() {
            let was_active = self.state.active;
            self.state.active = true;
            self.state.last_intrusion_at = Some(now);
            self.state.intruding_track_ids.clone_from(intruders);
            self.cooling_down = false;

            if !was_active {
                self.state.activated_at = Some(now);
                warn!(intruders = ?intruders, "alarm activated");
                return AlarmTransition::Activated;
            }
            return AlarmTransition::Unchanged;
        }

        if !self.state.active {
            return AlarmTransition::Unchanged;
        }

        if self.cooldown_elapsed(now) {
            self.state.active = false;
            self.state.activated_at = None;
            self.state.intruding_track_ids.clear();
            self.cooling_down = false;
            info!("alarm deactivated");
            return AlarmTransition::Deactivated;
        }

        if !self.cooling_down {
            self.cooling_down = true;
            info!(cooldown = ?self.cooldown, "alarm cooldown started");
            return AlarmTransition::CooldownStarted;
        }
        AlarmTransition::Unchanged
    }

    /// Time left before the alarm switches off if no new intrusion occurs.
    ///
    /// Zero when the alarm is inactive or the last cycle still had intruders.
    pub fn cooldown_remaining(&self, now: Instant) -> Duration {
        if !self.state.active || !self.cooling_down {
            return Duration::ZERO;
        }
        match self.state.last_intrusion_at {
            Some(last) => self
                .cooldown
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Return to the startup state.
    pub fn reset(&mut self) {
        self.state = AlarmState::default();
        self.cooling_down = false;
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.state.last_intrusion_at {
            Some(last) => now.saturating_duration_since(last) >= self.cooldown,
            None => true,
        }
    }
}
