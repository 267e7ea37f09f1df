//! Top-level simulation configuration.

use crate::{QnetError, QnetResult, Time};

// ── QueueDiscipline ───────────────────────────────────────────────────────────

/// How vehicles are released from a link's queue.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueueDiscipline {
    /// Strict entry order: an ineligible or blocked front vehicle holds back
    /// everything behind it (models spillback on single-lane links).
    #[default]
    Fifo,
    /// Any eligible vehicle may leave; an eligible vehicle blocked downstream
    /// can be overtaken (models lane overtaking on multi-lane links).
    Passing,
}

impl QueueDiscipline {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueDiscipline::Fifo    => "fifo",
            QueueDiscipline::Passing => "passing",
        }
    }
}

// ── StuckPolicy ───────────────────────────────────────────────────────────────

/// What to do with a vehicle that cannot advance past the stuck-time threshold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StuckPolicy {
    /// Log a stuck event, teleport the agent to its leg destination, and
    /// continue the run.
    #[default]
    TeleportOut,
    /// Abort the whole run with a fatal error naming the stuck agent.
    Abort,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Configuration values consumed by the simulation core.
///
/// Typically assembled from a scenario config file by the application crate;
/// the core only sees the resolved values.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// First simulated second (inclusive).
    pub start_time: Time,

    /// Last simulated second (exclusive) — the engine stops when the clock
    /// reaches it.  Agents still mid-plan at that point are reported as
    /// unfinished, not failed.
    pub end_time: Time,

    /// Scales every link's flow capacity, e.g. 0.1 when simulating a 10%
    /// population sample.
    pub flow_capacity_factor: f64,

    /// Scales every link's storage capacity, same rationale.
    pub storage_capacity_factor: f64,

    /// Seconds over which a link's `capacity` attribute is expressed.
    /// 3600 means "capacity is vehicles per hour".
    pub capacity_period_secs: u32,

    /// Queueing discipline applied to every link.
    pub queue_discipline: QueueDiscipline,

    /// Seconds a vehicle may sit unable to advance before it is flagged stuck.
    pub stuck_time: u32,

    /// What happens to a stuck vehicle.
    pub stuck_policy: StuckPolicy,

    /// Master RNG seed for scenario synthesis and calibration layers.  The
    /// engine itself is deterministic and draws no random numbers.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time:              Time::ZERO,
            end_time:                Time(30 * 3_600), // 30:00:00, late-night tail included
            flow_capacity_factor:    1.0,
            storage_capacity_factor: 1.0,
            capacity_period_secs:    3_600,
            queue_discipline:        QueueDiscipline::Fifo,
            stuck_time:              600,
            stuck_policy:            StuckPolicy::TeleportOut,
            seed:                    4711,
        }
    }
}

impl SimConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> QnetResult<()> {
        if self.end_time <= self.start_time {
            return Err(QnetError::Config(format!(
                "end_time {} must be after start_time {}",
                self.end_time, self.start_time
            )));
        }
        if !(self.flow_capacity_factor > 0.0) {
            return Err(QnetError::Config(format!(
                "flow_capacity_factor must be positive, got {}",
                self.flow_capacity_factor
            )));
        }
        if !(self.storage_capacity_factor > 0.0) {
            return Err(QnetError::Config(format!(
                "storage_capacity_factor must be positive, got {}",
                self.storage_capacity_factor
            )));
        }
        if self.capacity_period_secs == 0 {
            return Err(QnetError::Config("capacity_period_secs must be > 0".into()));
        }
        if self.stuck_time == 0 {
            return Err(QnetError::Config("stuck_time must be > 0".into()));
        }
        Ok(())
    }

    /// A link's effective outflow in vehicles per simulated second, given its
    /// raw `capacity` attribute (vehicles per `capacity_period_secs`).
    #[inline]
    pub fn flow_per_second(&self, capacity: f64) -> f64 {
        capacity * self.flow_capacity_factor / self.capacity_period_secs as f64
    }
}
