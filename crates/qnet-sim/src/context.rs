//! Shared mutable engine state, threaded through every step and transition.
//!
//! Agent transitions need to emit events, register future wake-ups, and push
//! departing vehicles into link wait lists.  Bundling those collections in
//! one context struct (separate from the agent vector) lets the engine hold
//! `&mut` agents and `&mut` context simultaneously without aliasing.

use qnet_core::LinkId;
use qnet_events::EventStream;
use qnet_network::Network;

use crate::link_queue::LinkQueue;
use crate::schedule::TimeQueue;

pub struct SimContext {
    pub(crate) network: Network,

    /// One queue per link, indexed by `LinkId`.
    pub(crate) queues: Vec<LinkQueue>,

    /// Agents due to end their current activity, keyed by end time.
    pub(crate) activity_schedule: TimeQueue,

    /// Agents mid-teleport, keyed by arrival time.
    pub(crate) teleport_schedule: TimeQueue,

    pub(crate) events: EventStream,
}

impl SimContext {
    #[inline]
    pub fn queue(&self, link: LinkId) -> &LinkQueue {
        &self.queues[link.index()]
    }

    #[inline]
    pub(crate) fn queue_mut(&mut self, link: LinkId) -> &mut LinkQueue {
        &mut self.queues[link.index()]
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}
