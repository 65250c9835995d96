use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;
use std::time::Instant;

use boidlight::config::FlockConfig;
use boidlight::flock::{Boid, FlockSimulation, FlockStats};
use boidlight::gpu::{GpuContext, GpuFlock};
use boidlight::math::{focal_from_fov, view_from_pose, Affine3x4};
use boidlight::shadow::{rasterize_depth, shade_samples, Camera, DepthImage, Instance, Mesh};
use boidlight::time::Time;
use clap::{Parser, Subcommand};
use glam::{Quat, Vec3};

#[derive(Parser, Debug)]
#[command(author, version, about = "Boids flocking and shadow-mapping kernels", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the flocking simulation and print a summary
    Flock {
        /// JSON flock configuration; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(short, long, default_value_t = 100)]
        ticks: u32,

        /// Override the configured boid count
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Run the compute kernel on the GPU instead of the CPU
        #[arg(long)]
        gpu: bool,

        /// Write the effective configuration to this path
        #[arg(long)]
        save_config: Option<PathBuf>,
    },
    /// Render the demo scene's shadow map on the CPU and report the lit fraction
    Shadow {
        /// Shadow map resolution (square)
        #[arg(short, long, default_value_t = 256)]
        resolution: u32,

        /// Samples per side of the ground grid
        #[arg(short, long, default_value_t = 64)]
        grid: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Command::Flock {
            config,
            ticks,
            count,
            seed,
            gpu,
            save_config,
        } => {
            let mut config = match config {
                Some(path) => FlockConfig::load(path)?,
                None => FlockConfig::default(),
            };
            if let Some(count) = count {
                config.boid_count = count;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.validate()?;
            if let Some(path) = save_config {
                config.save(&path)?;
                log::info!("Saved flock config to {}", path.display());
            }

            let stats = if gpu {
                run_flock_gpu(&config, ticks)?
            } else {
                run_flock_cpu(&config, ticks)?
            };
            println!(
                "{} boids after {} ticks: centroid ({:.4}, {:.4}), mean speed {:.4}, max speed {:.4}",
                stats.count,
                ticks,
                stats.centroid.x,
                stats.centroid.y,
                stats.mean_speed,
                stats.max_speed
            );
        }
        Command::Shadow { resolution, grid } => {
            let lit = run_shadow_demo(resolution, grid);
            println!("Lit fraction of the ground grid: {:.3}", lit);
        }
    }

    Ok(())
}

fn run_flock_cpu(
    config: &FlockConfig,
    ticks: u32,
) -> Result<FlockStats, Box<dyn std::error::Error>> {
    let mut sim = FlockSimulation::from_config(config)?;
    let mut time = Time::fixed(config.dt);
    time.set_time_scale(config.speed);

    let started = Instant::now();
    for _ in 0..ticks {
        sim.step_timed(&mut time)?;
    }
    log::info!(
        "CPU flock ran {} ticks in {:.3}s ({:.1} ticks/s)",
        ticks,
        started.elapsed().as_secs_f32(),
        time.ticks_per_second()
    );
    Ok(sim.stats())
}

fn run_flock_gpu(
    config: &FlockConfig,
    ticks: u32,
) -> Result<FlockStats, Box<dyn std::error::Error>> {
    let sim = FlockSimulation::from_config(config)?;
    let params = config.sim_params(config.dt * config.speed);
    let context = GpuContext::new_blocking()?;
    let mut flock = GpuFlock::new(context, sim.boids(), &params)?;

    flock.step(ticks);
    let boids: Vec<Boid> = flock.read_boids()?;
    log::info!(
        "GPU flock ran {} ticks on {}",
        flock.tick(),
        flock.adapter_info().name
    );
    Ok(FlockStats::from_boids(&boids))
}

/// Ground plane with a cube hovering above it, lit from straight above.
fn run_shadow_demo(resolution: u32, grid: u32) -> f32 {
    let light_pose = Affine3x4::from_scale_rotation_translation(
        Vec3::ONE,
        Quat::from_rotation_x(FRAC_PI_2),
        Vec3::new(0.0, 5.0, 0.0),
    );
    let light = Camera::new(&view_from_pose(&light_pose, focal_from_fov(FRAC_PI_2, 1.0)), 0.1);

    let eye = Vec3::new(0.0, 4.0, -6.0);
    let camera_pose = Affine3x4::from_scale_rotation_translation(
        Vec3::ONE,
        Quat::from_rotation_arc(Vec3::Z, (-eye).normalize()),
        eye,
    );
    let camera = Camera::new(&view_from_pose(&camera_pose, focal_from_fov(1.0, 16.0 / 9.0)), 0.1);

    let ground = Mesh::quad(3.0);
    let ground_instance = Instance::default();
    let cube = Mesh::cube(0.5);
    let cube_instance = Instance::new(&Affine3x4::from_translation(Vec3::new(0.0, 1.5, 0.0)));

    let mut shadow_map = DepthImage::new(resolution, resolution);
    let written = rasterize_depth(&light, &ground, &[ground_instance], &mut shadow_map)
        + rasterize_depth(&light, &cube, &[cube_instance], &mut shadow_map);
    log::debug!("Depth pass wrote {} texels", written);

    let step = 4.0 / grid.max(1) as f32;
    let cell_centre = |k: u32| -2.0 + (k as f32 + 0.5) * step;
    let points: Vec<Vec3> = (0..grid)
        .flat_map(|j| (0..grid).map(move |i| (i, j)))
        .map(|(i, j)| Vec3::new(cell_centre(i), 0.0, cell_centre(j)))
        .collect();
    let lit = shade_samples(&points, &ground_instance, &camera, &light, &shadow_map);

    if lit.is_empty() {
        return 0.0;
    }
    lit.iter().sum::<f32>() / lit.len() as f32
}
