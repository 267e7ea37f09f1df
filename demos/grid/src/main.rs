//! grid — commuter-day demo for the rust_qnet queue simulation.
//!
//! Synthesizes a 6×6 Manhattan grid and a population of commuters with
//! routed car trips (plus a share of walkers), runs one simulated day, and
//! writes the full event stream to `output/grid/events.csv`.  Everything is
//! derived from one seed, so repeated runs are byte-identical.

mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use qnet_core::{Coord, LegMode, LinkId, SimConfig, SimRng, Time, hms};
use qnet_events::EventWriter;
use qnet_network::Network;
use qnet_population::{Leg, Plan, PlanBuilder, Population};
use qnet_sim::{SimBuilder, SimObserver, SimReport};

use network::{build_grid, route_between};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 100;
const SEED:        u64   = 4711;

/// Share of agents who walk instead of driving.
const WALK_SHARE: f64 = 0.2;
const WALK_SPEED: f64 = 1.3; // m/s, crow-fly

// ── Scenario synthesis ────────────────────────────────────────────────────────

fn link_midpoint(network: &Network, link: LinkId) -> Coord {
    let link = network.link(link).expect("link ids are dense");
    let from = network.node(link.from).expect("node ids are dense");
    let to = network.node(link.to).expect("node ids are dense");
    from.coord.midpoint(to.coord)
}

fn commuter_plan(network: &Network, rng: &mut SimRng) -> Result<Plan> {
    let links = network.links();
    let home = rng.choose(links).context("network has no links")?.id;
    let work = loop {
        let candidate = rng.choose(links).context("network has no links")?.id;
        if candidate != home {
            break candidate;
        }
    };

    let leave_home = hms(6, 30, 0).offset(rng.gen_range(0..7_200));
    let work_secs = rng.gen_range(7 * 3_600..9 * 3_600);

    let plan = if rng.gen_bool(WALK_SHARE) {
        let crow_fly = link_midpoint(network, home).distance(link_midpoint(network, work));
        let walk_secs = (crow_fly / WALK_SPEED).ceil() as u32;
        PlanBuilder::new()
            .act_at("home", home, Some(leave_home))
            .leg(Leg::teleport(LegMode::Walk, walk_secs))
            .act_for("work", work, work_secs)
            .leg(Leg::teleport(LegMode::Walk, walk_secs))
            .act_open("home", home)
            .build()
    } else {
        let outbound =
            route_between(network, home, work).context("grid is strongly connected")?;
        let inbound =
            route_between(network, work, home).context("grid is strongly connected")?;
        PlanBuilder::new()
            .act_at("home", home, Some(leave_home))
            .leg(Leg::drive(outbound))
            .act_for("work", work, work_secs)
            .leg(Leg::drive(inbound))
            .act_open("home", home)
            .build()
    };
    Ok(plan)
}

// ── Progress observer ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Progress {
    steps: u64,
}

impl SimObserver for Progress {
    fn on_step_end(&mut self, now: Time) {
        self.steps += 1;
        if now.0 % (6 * 3_600) == 0 && now.0 > 0 {
            println!("  clock {now}");
        }
    }

    fn on_sim_end(&mut self, report: &SimReport) {
        println!("  clock {} (drained)", report.completed_at);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== grid — rust_qnet queue simulation ===");
    println!("Agents: {AGENT_COUNT}  |  Seed: {SEED}");
    println!();

    // 1. Network.
    let network = build_grid()?;
    println!(
        "Grid network: {} nodes, {} links",
        network.node_count(),
        network.link_count()
    );

    // 2. Population.
    let mut rng = SimRng::new(SEED);
    let mut demand_rng = rng.child(1);
    let plans: Vec<Plan> = (0..AGENT_COUNT)
        .map(|_| commuter_plan(&network, &mut demand_rng))
        .collect::<Result<_>>()?;
    let population = Population::from_plans(plans);
    println!("Synthesized {} commuter plans", population.len());

    // 3. Config: one day plus a late-night tail.
    let config = SimConfig {
        start_time: Time::ZERO,
        end_time:   Time(30 * 3_600),
        seed:       SEED,
        ..SimConfig::default()
    };

    // 4. Build and run.
    let mut sim = SimBuilder::new(network, population).config(config).build()?;
    let mut progress = Progress::default();
    let t0 = Instant::now();
    let report = sim.run_with(&mut progress)?;
    let elapsed = t0.elapsed();
    println!();
    println!(
        "Simulation complete in {:.3} s ({} steps)",
        elapsed.as_secs_f64(),
        progress.steps
    );

    // 5. Write the event stream.
    std::fs::create_dir_all("output/grid")?;
    let mut writer = EventWriter::create(Path::new("output/grid/events.csv"))?;
    writer.write_all(sim.events())?;
    writer.finish()?;

    // 6. Summary.
    let count = |label: &str| {
        sim.events().iter().filter(|e| e.kind.label() == label).count()
    };
    println!("  events.csv : {} rows", report.events_emitted);
    println!("  departures : {}", count("departure"));
    println!("  arrivals   : {}", count("arrival"));
    println!("  stuck      : {}", count("stuck"));
    println!("  unfinished : {}", report.unfinished.len());

    Ok(())
}
