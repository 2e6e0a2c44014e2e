//! SAT Overlap demo
//!
//! Builds a seeded scene, runs a fixed number of collision steps and logs
//! overlap events. Usage: `sat-overlap [settings.json] --seed <SEED> --steps <STEPS>`

use clap::{Command, arg, value_parser};
use sat_overlap::sim::{Deferred, OverlapListener, ShapeHandle, random_scene, step};
use sat_overlap::{EngineSettings, World};

/// Counts begin/end notifications delivered by the world
#[derive(Debug, Default)]
struct EventCounter {
    begins: usize,
    ends: usize,
}

impl OverlapListener for EventCounter {
    fn on_overlap_begin(&mut self, _shape: ShapeHandle, _other: ShapeHandle, _: &mut Deferred) {
        self.begins += 1;
    }

    fn on_overlap_end(&mut self, _shape: ShapeHandle, _other: ShapeHandle, _: &mut Deferred) {
        self.ends += 1;
    }
}

fn cli() -> Command {
    Command::new("sat-overlap")
        .about("Steps a seeded scene through the SAT overlap engine.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(arg!([SETTINGS] "Engine settings '.json' file"))
        .arg(
            arg!(-s --seed <SEED> "Scene seed")
                .value_parser(value_parser!(u64))
                .default_value("12345"),
        )
        .arg(
            arg!(-n --steps <STEPS> "Number of collision steps")
                .value_parser(value_parser!(u32))
                .default_value("120"),
        )
}

fn run(mut world: World, steps: u32) -> EventCounter {
    let mut counter = EventCounter::default();
    for _ in 0..steps {
        let summary = step(&mut world);
        if summary.contacts > 0 {
            log::debug!("step {}: {:?}", world.step_count, summary);
        }
        world.dispatch(&mut counter);
    }
    counter
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("SAT Overlap (native) starting...");

    let matches = cli().get_matches();
    let settings = matches
        .get_one::<String>("SETTINGS")
        .map(EngineSettings::load)
        .unwrap_or_default();
    let seed = matches.get_one::<u64>("seed").copied().unwrap_or(12345);
    let steps = matches.get_one::<u32>("steps").copied().unwrap_or(120);

    let mut world = random_scene(seed, 40, 40.0);
    world.settings = settings;
    let counter = run(world, steps);

    println!(
        "seed {}: {} steps, {} begin and {} end notifications",
        seed, steps, counter.begins, counter.ends
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {}
