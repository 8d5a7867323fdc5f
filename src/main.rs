//! Headless Gas Properties run
//!
//! Pumps particles into the ideal-gas container and logs temperature,
//! pressure and volume as the model runs.

use clap::Parser;
use gas_physics::Species;
use gas_simulation::{IdealGasModel, SimulationParams, Timescale};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of heavy particles to pump in
    #[arg(long, default_value_t = 200)]
    heavy: usize,

    /// Number of light particles to pump in
    #[arg(long, default_value_t = 0)]
    light: usize,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    steps: usize,

    /// Wall-clock seconds per frame, scaled to model time by the timescale
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Run at the slow timescale
    #[arg(long, action)]
    slow: bool,

    /// Log readouts every this many frames
    #[arg(long, default_value_t = 60)]
    log_every: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!("Starting gas properties simulation...");

    let mut params = SimulationParams::default();
    params.seed = args.seed;
    let mut model = IdealGasModel::new(params)?;
    if args.slow {
        model.time_controls_mut().timescale = Timescale::Slow;
    }
    model.set_number_of_particles(Species::Heavy, args.heavy)?;
    model.set_number_of_particles(Species::Light, args.light)?;
    log::info!("✓ Pumped in {} heavy and {} light particles", args.heavy, args.light);

    let log_every = args.log_every.max(1);
    for frame in 1..=args.steps {
        let Some(report) = model.advance(args.dt)? else {
            continue;
        };
        if report.lid_blown_off {
            log::warn!("Lid blew off at frame {frame}");
        }
        if frame % log_every == 0 {
            log::info!(
                "t = {:7.2} ps  T = {:>8}  P = {:9.2} kPa  V = {:.3e} pm³  wall hits = {}",
                model.elapsed_time(),
                model
                    .temperature()
                    .map_or_else(|| "-".to_string(), |t| format!("{t:.1} K")),
                model.pressure_gauge().pressure(),
                model.volume(),
                report.particle_container_collisions
            );
        }
    }

    log::info!(
        "✓ Finished {} frames, {} particles inside, {} still outside",
        args.steps,
        model.total_number_of_particles(),
        model.heavy_particles_outside().len() + model.light_particles_outside().len()
    );
    Ok(())
}
