use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render an XY projection of an exported waypoint CSV"
)]
struct Cli {
    /// Waypoint CSV produced by the mission binary (--waypoints)
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/trajectory.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let points = read_waypoints(&cli.input)?;
    if points.is_empty() {
        return Err(anyhow::anyhow!("No waypoints in the provided CSV"));
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;

    let (mut x_min, mut x_max, mut y_min, mut y_max) =
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let pad_x = 0.05 * (x_max - x_min).max(1.0);
    let pad_y = 0.05 * (y_max - y_min).max(1.0);

    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Earth-Moon transfer (XY projection)", ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(x_min - pad_x..x_max + pad_x, y_min - pad_y..y_max + pad_y)?;

    chart
        .configure_mesh()
        .x_desc("x (km)")
        .y_desc("y (km)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label("trajectory")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    // Earth at the origin, Moon at the mean separation on the x axis.
    chart.draw_series(std::iter::once(Circle::new((0.0, 0.0), 6, GREEN.filled())))?;
    chart.draw_series(std::iter::once(Circle::new(
        (384_400.0, 0.0),
        4,
        RGBColor(128, 128, 128).filled(),
    )))?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()?;
    root.present()?;

    println!("Wrote {}", cli.output.display());
    Ok(())
}

fn read_waypoints(path: &PathBuf) -> anyhow::Result<Vec<(f64, f64)>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let x_idx = headers
        .iter()
        .position(|h| h == "x_km")
        .ok_or_else(|| anyhow::anyhow!("CSV is missing the x_km column"))?;
    let y_idx = headers
        .iter()
        .position(|h| h == "y_km")
        .ok_or_else(|| anyhow::anyhow!("CSV is missing the y_km column"))?;

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let x: f64 = record
            .get(x_idx)
            .ok_or_else(|| anyhow::anyhow!("short CSV row"))?
            .parse()?;
        let y: f64 = record
            .get(y_idx)
            .ok_or_else(|| anyhow::anyhow!("short CSV row"))?
            .parse()?;
        points.push((x, y));
    }
    Ok(points)
}
