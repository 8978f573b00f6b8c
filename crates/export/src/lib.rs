//! Export helpers for JSON and CSV trajectory artifacts.
//!
//! Rounding happens here, on the way out: the engine keeps full precision
//! and the record carries display-ready numbers.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use lunar_transfer::TrajectoryResult;
use serde::Serialize;

const WAYPOINT_HEADER: &str = "index,x_km,y_km,z_km";

/// Display-rounded mirror of a [`TrajectoryResult`], the shape handed to
/// storage or HTTP collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryRecord {
    pub launch_epoch: String,
    pub transfer_type: String,
    /// Total delta-v, rounded to 3 decimals (km/s).
    pub total_delta_v_km_s: f64,
    /// Flight time, rounded to 1 decimal (hours).
    pub flight_time_hours: f64,
    /// Propellant mass, rounded to whole kilograms.
    pub fuel_mass_kg: f64,
    /// Efficiency, rounded to 1 decimal (percent).
    pub efficiency_percent: f64,
    pub risk_factors: Vec<String>,
    pub waypoint_count: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl From<&TrajectoryResult> for TrajectoryRecord {
    fn from(result: &TrajectoryResult) -> Self {
        Self {
            launch_epoch: result.launch_epoch.clone(),
            transfer_type: format!("{:?}", result.transfer).to_lowercase(),
            total_delta_v_km_s: round_to(result.total_delta_v_km_s, 3),
            flight_time_hours: round_to(result.flight_time_hours, 1),
            fuel_mass_kg: result.fuel_mass_kg.round(),
            efficiency_percent: round_to(result.efficiency_percent, 1),
            risk_factors: result.risk_factors.clone(),
            waypoint_count: result.points.len(),
        }
    }
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Write the display-rounded record as pretty JSON.
pub fn write_json(path: &Path, record: &TrajectoryRecord) -> io::Result<()> {
    let mut writer = writer_for_path(path)?;
    serde_json::to_writer_pretty(&mut writer, record)?;
    writeln!(writer)
}

/// Write the sampled waypoints as CSV with the standard header.
pub fn write_waypoints(path: &Path, result: &TrajectoryResult) -> io::Result<()> {
    let mut writer = writer_for_path(path)?;
    writeln!(writer, "{}", WAYPOINT_HEADER)?;
    for (index, point) in result.points.iter().enumerate() {
        writeln!(
            writer,
            "{},{:.3},{:.3},{:.3}",
            index, point[0], point[1], point[2]
        )?;
    }
    Ok(())
}
