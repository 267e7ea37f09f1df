//! `qnet-sim` — the queue-based network flow engine.
//!
//! Executes every person's plan on the network simultaneously, one simulated
//! second at a time, producing the ordered event stream that scoring and
//! learning consume.
//!
//! | module       | contents                                              |
//! |--------------|-------------------------------------------------------|
//! | `link_queue` | per-link vehicle queue with flow and storage bounds   |
//! | `agent`      | plan-execution state machine per person               |
//! | `schedule`   | sparse time-keyed wake-up queues                      |
//! | `context`    | shared mutable state threaded through transitions     |
//! | `engine`     | the deterministic three-phase step loop               |
//! | `builder`    | validated assembly of a runnable simulation           |
//! | `observer`   | progress hooks                                        |

pub mod agent;
pub mod builder;
pub mod context;
pub mod engine;
pub mod error;
pub mod link_queue;
pub mod observer;
pub mod schedule;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{AgentState, PlanAgent};
pub use builder::SimBuilder;
pub use engine::{Sim, SimReport};
pub use error::{SimError, SimResult};
pub use link_queue::LinkQueue;
pub use observer::{NoopObserver, SimObserver};
pub use vehicle::QueuedVehicle;
