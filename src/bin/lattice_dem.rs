//! CLI for running a lattice mesh record through the solver.

use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Parser;
use ftlog::{LevelFilter, LoggerGuard};

use lattice_dem::{ConnectivityPolicy, MeshLoader, MeshRecord, MonitorPolicy, RunConfig, Simulation};

/// Scanning strategies for the monitored DOF.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
enum MonitorArg {
    /// First DOF with a non-zero applied force.
    #[default]
    FirstLoaded,
    /// First free DOF right after a restrained one.
    BesideRestraint,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the mesh record (JSON with coordinates, connect, forces, restrictions).
    #[arg(short('i'), long)]
    input: PathBuf,

    /// Path of the result file to write.
    #[arg(short('o'), long, default_value = "output.json")]
    output: PathBuf,

    /// Optional JSON file with run parameters; flags below override it.
    #[arg(short('c'), long)]
    config: Option<PathBuf>,

    /// Number of integration steps.
    #[arg(short('n'), long)]
    steps: Option<usize>,

    /// Integration step size.
    #[arg(long)]
    time_step: Option<f64>,

    /// Particle radius; springs rest at twice this length.
    #[arg(long)]
    radius: Option<f64>,

    /// Lumped mass shared by every particle.
    #[arg(long)]
    mass: Option<f64>,

    /// Contact spring stiffness.
    #[arg(long)]
    stiffness: Option<f64>,

    /// How to choose the monitored DOF when `--dof` is not given.
    #[arg(short('m'), long, value_enum)]
    monitor: Option<MonitorArg>,

    /// Explicit monitored DOF in flattened [x0, y0, x1, y1, ...] order.
    #[arg(long)]
    dof: Option<usize>,

    /// Abort once any displacement magnitude exceeds this value.
    #[arg(long)]
    max_displacement: Option<f64>,

    /// Add missing reverse adjacency entries instead of rejecting the mesh.
    #[arg(long)]
    symmetrize: bool,

    /// Evaluate contact forces on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Maximum log level written to stderr.
    #[arg(short('l'), long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path).map_err(|e| format!("{path:?}: {e}"))?;
                serde_json::from_reader(BufReader::new(file)).map_err(|e| format!("{path:?}: {e}"))?
            }
            None => RunConfig::default(),
        };
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(time_step) = self.time_step {
            config.time_step = time_step;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(mass) = self.mass {
            config.mass = mass;
        }
        if let Some(stiffness) = self.stiffness {
            config.stiffness = stiffness;
        }
        if let Some(bound) = self.max_displacement {
            config.divergence_bound = Some(bound);
        }
        match (self.dof, self.monitor) {
            (Some(dof), _) => config.monitor = MonitorPolicy::Fixed(dof),
            (None, Some(MonitorArg::FirstLoaded)) => config.monitor = MonitorPolicy::FirstLoaded,
            (None, Some(MonitorArg::BesideRestraint)) => config.monitor = MonitorPolicy::FirstFreeBesideRestraint,
            (None, None) => {}
        }
        Ok(config)
    }
}

fn configure_logger(level: LevelFilter) -> Result<LoggerGuard, String> {
    ftlog::Builder::new()
        .max_log_level(level)
        .try_init()
        .map_err(|e| e.to_string())
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    let _guard = configure_logger(args.log_level)?;

    let config = args.run_config()?;
    let policy = if args.symmetrize {
        ConnectivityPolicy::Symmetrize
    } else {
        ConnectivityPolicy::Reject
    };

    ftlog::info!("Reading mesh from {:?}", args.input);
    let record = MeshRecord::from_path(&args.input).map_err(|e| e.to_string())?;
    let system = MeshLoader::new(policy).load(&record).map_err(|e| e.to_string())?;

    let mut simulation = Simulation::new(system, config).map_err(|e| e.to_string())?;
    if args.sequential {
        simulation.set_parallel_enabled(false);
    }
    let series = simulation.run().map_err(|e| e.to_string())?;

    series.write_to_path(&args.output).map_err(|e| e.to_string())?;
    ftlog::info!(
        "Wrote {} samples of DOF {} to {:?}",
        series.len(),
        series.dof,
        args.output
    );
    Ok(())
}
