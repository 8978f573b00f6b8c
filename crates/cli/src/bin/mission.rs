use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lunar_transfer_calculator::config::{
    VehicleConfig, VehiclePropulsionConfig, load_bodies, load_vehicle_configs, system_from_catalog,
};
use lunar_transfer_calculator::constants::EarthMoonSystem;
use lunar_transfer_calculator::export::{TrajectoryRecord, write_json, write_waypoints};
use lunar_transfer_calculator::transfer::{
    CriteriaWeights, TrajectoryRequest, TransferKind, assess_trajectory,
    compare_transfer_strategies, generate_earth_moon_trajectory,
};

#[derive(Parser)]
#[command(author, version, about = "Earth-Moon transfer planner")]
struct Cli {
    /// Transfer model for the translunar leg
    #[arg(long, value_enum, default_value_t = TransferMode::Hohmann)]
    transfer: TransferMode,

    /// Launch epoch (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, default_value = "2026-01-01")]
    launch: String,

    /// Requested flight time in hours (recomputed on the Hohmann path)
    #[arg(long, default_value_t = 96.0)]
    flight_time: f64,

    /// Spacecraft dry mass in kg
    #[arg(long, default_value_t = 15_000.0)]
    dry_mass: f64,

    /// Engine specific impulse in seconds
    #[arg(long, default_value_t = 450.0)]
    isp: f64,

    /// Initial thrust-to-weight ratio
    #[arg(long, default_value_t = 0.8)]
    twr: f64,

    /// Optional body catalog (YAML file or directory of TOML records)
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Optional vehicle catalog; overrides --dry-mass/--isp/--twr
    #[arg(long)]
    vehicles: Option<PathBuf>,

    /// Vehicle name to select from the catalog (defaults to the first entry)
    #[arg(long)]
    vehicle: Option<String>,

    /// Write the display-rounded trajectory record as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the sampled waypoints as CSV
    #[arg(long)]
    waypoints: Option<PathBuf>,

    /// Also score the alternative transfer model and report the comparison
    #[arg(long, default_value_t = false)]
    compare: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum TransferMode {
    Hohmann,
    Lambert,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let system = match &cli.bodies {
        Some(path) => {
            let catalog = load_bodies(path)?;
            system_from_catalog(&catalog)
                .ok_or_else(|| anyhow::anyhow!("catalog must contain EARTH and MOON records"))?
        }
        None => EarthMoonSystem::default(),
    };

    let (dry_mass, isp, twr) = match &cli.vehicles {
        Some(path) => {
            let catalog = load_vehicle_configs(path)?;
            let vehicle = select_vehicle(&catalog, cli.vehicle.as_deref())?;
            match &vehicle.propulsion {
                VehiclePropulsionConfig::Impulsive {
                    isp_seconds,
                    thrust_to_weight,
                    ..
                } => (vehicle.dry_mass_kg, *isp_seconds, *thrust_to_weight),
                VehiclePropulsionConfig::Unsupported => {
                    return Err(anyhow::anyhow!(
                        "vehicle '{}' has an unsupported propulsion type",
                        vehicle.name
                    ));
                }
            }
        }
        None => (cli.dry_mass, cli.isp, cli.twr),
    };

    let request = TrajectoryRequest {
        launch_epoch: cli.launch.clone(),
        transfer: match cli.transfer {
            TransferMode::Hohmann => TransferKind::Hohmann,
            TransferMode::Lambert => TransferKind::Lambert,
        },
        flight_time_hours: cli.flight_time,
        dry_mass_kg: dry_mass,
        isp_seconds: isp,
        thrust_to_weight: twr,
        ..TrajectoryRequest::default()
    };

    let trajectory = generate_earth_moon_trajectory(&request, &system)?;
    let assessment = assess_trajectory(&trajectory);
    let (d, h, m) = format_duration(trajectory.flight_time_hours * 3_600.0);

    println!("=== Trajectory Plan ===");
    println!("Launch epoch   : {}", trajectory.launch_epoch);
    println!("Transfer model : {:?}", trajectory.transfer);
    println!(
        "Total delta-v  : {:.3} km/s (injection + insertion)",
        trajectory.total_delta_v_km_s
    );
    println!(
        "Flight time    : {:.1} h ({}d {}h {}m)",
        trajectory.flight_time_hours, d, h, m
    );
    println!(
        "Insertion      : {:?}, {:.3} km/s",
        trajectory.insertion.strategy, trajectory.insertion.total_dv_km_s
    );
    println!(
        "Propellant     : {:.0} kg (mass ratio {:.2}, burn {:.0} s)",
        trajectory.fuel_mass_kg, trajectory.fuel.mass_ratio, trajectory.fuel.burn_time_s
    );
    println!(
        "Efficiency     : {:.1}% of the Hohmann floor, safety score {:.0}",
        trajectory.efficiency_percent, assessment.safety_score
    );
    for risk in &trajectory.risk_factors {
        println!("Risk           : {risk}");
    }

    if cli.compare {
        let comparison =
            compare_transfer_strategies(&request, &system, &CriteriaWeights::default())?;
        println!("=== Strategy Comparison ===");
        for alternative in &comparison.alternatives {
            println!(
                "{:?}: score {:.3}, dv {:.3} km/s, {:.1} h",
                alternative.transfer,
                alternative.score,
                alternative.trajectory.total_delta_v_km_s,
                alternative.trajectory.flight_time_hours
            );
        }
        println!("Preferred: {:?}", comparison.best);
    }

    if let Some(path) = &cli.json {
        write_json(path, &TrajectoryRecord::from(&trajectory))?;
        println!("Wrote JSON record to {}", path.display());
    }
    if let Some(path) = &cli.waypoints {
        write_waypoints(path, &trajectory)?;
        println!("Wrote waypoints to {}", path.display());
    }

    Ok(())
}

fn select_vehicle<'a>(
    catalog: &'a [VehicleConfig],
    requested: Option<&str>,
) -> anyhow::Result<&'a VehicleConfig> {
    if catalog.is_empty() {
        return Err(anyhow::anyhow!("vehicle catalog is empty"));
    }
    match requested {
        Some(name) => catalog
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("vehicle '{}' not found in catalog", name)),
        None => Ok(&catalog[0]),
    }
}

fn format_duration(seconds: f64) -> (i64, i64, i64) {
    let total_seconds = seconds.max(0.0);
    let days = (total_seconds / 86_400.0).floor() as i64;
    let remaining = total_seconds - (days as f64 * 86_400.0);
    let hours = (remaining / 3_600.0).floor() as i64;
    let minutes = ((remaining - hours as f64 * 3_600.0) / 60.0).floor() as i64;
    (days, hours, minutes)
}
