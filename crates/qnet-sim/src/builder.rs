//! Simulation assembly: validate inputs, build queues and agents, wire the
//! initial schedule.

use qnet_core::SimConfig;
use qnet_events::EventStream;
use qnet_network::Network;
use qnet_population::Population;

use crate::agent::PlanAgent;
use crate::context::SimContext;
use crate::engine::Sim;
use crate::error::SimResult;
use crate::link_queue::LinkQueue;
use crate::schedule::TimeQueue;

/// Build a [`Sim`] from a network, a population, and a config.
///
/// `build()` is the single choke point where all load-time validation runs;
/// the engine afterwards treats its inputs as structurally sound.
///
/// # Example
///
/// ```no_run
/// use qnet_core::SimConfig;
/// use qnet_network::Network;
/// use qnet_population::Population;
/// use qnet_sim::SimBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let network    = Network::empty();
/// let population = Population::from_plans(vec![]);
/// let mut sim = SimBuilder::new(network, population)
///     .config(SimConfig::default())
///     .build()?;
/// let report = sim.run()?;
/// println!("{} unfinished", report.unfinished.len());
/// # Ok(())
/// # }
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    network:    Network,
    population: Population,
}

impl SimBuilder {
    pub fn new(network: Network, population: Population) -> Self {
        Self {
            config: SimConfig::default(),
            network,
            population,
        }
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate everything and assemble the simulation.
    ///
    /// Resolves coordinate-only activity locations against the network first,
    /// then validates the config and every plan.  Agents whose first activity
    /// would have ended before the start time depart in the first step.
    pub fn build(self) -> SimResult<Sim> {
        let Self { config, network, mut population } = self;

        config.validate()?;
        population.resolve_locations(&network);
        population.validate(&network)?;

        let queues: Vec<LinkQueue> = network
            .links()
            .iter()
            .map(|link| LinkQueue::new(link, &config))
            .collect();

        let mut activity_schedule = TimeQueue::new();
        let agents: Vec<PlanAgent> = population
            .persons()
            .iter()
            .map(|person| {
                let agent = PlanAgent::new(person.id, &person.plan, config.start_time);
                if !agent.is_finished() {
                    activity_schedule.push(agent.activity_end_time(), person.id);
                }
                agent
            })
            .collect();

        let ctx = SimContext {
            network,
            queues,
            activity_schedule,
            teleport_schedule: TimeQueue::new(),
            events: EventStream::new(config.start_time),
        };

        Ok(Sim {
            now: config.start_time,
            config,
            population,
            agents,
            ctx,
        })
    }
}
