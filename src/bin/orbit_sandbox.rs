//! Orbit Sandbox
//!
//! Run with: `cargo run --bin orbit_sandbox -- [--verbose] [--config tuning.json]`
//!
//! Headless demo of a full simulation on a small planet:
//! - One character walks toward a lake and floats once it reaches the water
//! - A second character circles as a moving target
//! - The first character locks on and fires a homing missile at it
//!
//! Events are reported through the logger (`RUST_LOG` is honored).

use std::error::Error;
use std::path::PathBuf;

use glam::Vec3;
use log::{info, warn};

use gravwell_engine::config::SimConfig;
use gravwell_engine::gravity::FluidVolume;
use gravwell_engine::logging;
use gravwell_engine::physics::SimplePhysicsWorld;
use gravwell_engine::player::{CharacterDesc, CharacterInput};
use gravwell_engine::projectile::RecordingEffects;
use gravwell_engine::simulation::{EntityRef, Simulation};

// ============================================================================
// SCENE
// ============================================================================

const PLANET_RADIUS: f32 = 60.0;
const LAKE_RADIUS: f32 = 6.0;
const MISSILE_SPEED: f32 = 35.0;
const DURATION_SECS: f32 = 12.0;

/// Point on the planet surface `angle` radians from the north pole, toward -Z.
fn surface_point(angle: f32, altitude: f32) -> Vec3 {
    Vec3::new(0.0, angle.cos(), -angle.sin()) * (PLANET_RADIUS + altitude)
}

struct Args {
    verbose: bool,
    config: Option<PathBuf>,
    unknown: Vec<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        config: None,
        unknown: Vec::new(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "--config" => args.config = iter.next().map(PathBuf::from),
            other => args.unknown.push(other.to_string()),
        }
    }
    args
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args();
    logging::init(args.verbose);
    for arg in &args.unknown {
        warn!("ignoring unknown argument `{arg}`");
    }

    let config = match &args.config {
        Some(path) => {
            info!("loading tuning overrides from {}", path.display());
            SimConfig::from_json_file(path)?
        }
        None => SimConfig::default(),
    };

    let mut world = SimplePhysicsWorld::new();
    world.add_planet(Vec3::ZERO, PLANET_RADIUS);

    let mut sim = Simulation::new(config, world, RecordingEffects::new())?;
    sim.add_fluid(FluidVolume::Sphere {
        center: surface_point(0.6, 0.0),
        radius: LAKE_RADIUS,
    });

    let walker = sim.add_character(&CharacterDesc::at(surface_point(0.0, 1.0)));
    let runner = sim.add_character(&CharacterDesc::at(surface_point(0.3, 1.0)));
    let runner_target = sim.register_character_target(runner)?;

    // Settle both characters onto the surface
    for _ in 0..60 {
        sim.step();
    }

    sim.set_input(
        runner,
        CharacterInput {
            forward: 1.0,
            run: true,
            ..Default::default()
        },
    )?;
    // Look up a little before firing so the missile clears the horizon
    sim.set_input(
        walker,
        CharacterInput {
            pitch_delta: 0.25,
            ..Default::default()
        },
    )?;
    sim.step();

    let lock = sim.acquire_target(walker)?;
    match lock {
        Some(target) if target == runner_target => info!("walker locked onto the runner"),
        Some(target) => info!("walker locked onto {:?}", target),
        None => warn!("no lock; the missile will fly unguided"),
    }
    let missile = sim.fire_missile_from(walker, MISSILE_SPEED, lock)?;
    info!("missile {:?} away", missile);

    let ticks = (DURATION_SECS * sim.config().tick_rate) as u64;
    let report_every = sim.config().tick_rate.max(1.0) as u64;
    for tick in 0..ticks {
        let circle = CharacterInput {
            forward: 1.0,
            run: true,
            yaw_delta: 0.02,
            ..Default::default()
        };
        sim.set_input(runner, circle)?;
        sim.set_input(
            walker,
            CharacterInput {
                forward: 1.0,
                ..Default::default()
            },
        )?;

        let report = sim.step();
        for detonation in &report.detonations {
            info!(
                "detonation of {:?} ({:?}) at altitude {:.2} m",
                detonation.projectile,
                detonation.reason,
                detonation.position.length() - PLANET_RADIUS
            );
        }

        if tick % report_every == 0 {
            for (entity, pose) in sim.poses() {
                let altitude = pose.position.length() - PLANET_RADIUS;
                match entity {
                    EntityRef::Character(id) => {
                        let regime = sim.character(id).map(|c| c.regime());
                        info!("t={:>3}s {:?} {:?} altitude {:.2} m", tick / report_every, id, regime, altitude);
                    }
                    EntityRef::Projectile(id) => {
                        info!("t={:>3}s {:?} altitude {:.2} m", tick / report_every, id, altitude);
                    }
                }
            }
        }
    }

    info!(
        "done after {} ticks: {} explosion(s), {} projectile(s) still live",
        sim.tick_count(),
        sim.effects().len(),
        sim.projectiles().active_count()
    );
    Ok(())
}
