use crate::building::{Building, DispatchPolicy};
use crate::core::{SimError, SimTime};
use log::info;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default file name of the per-floor mean wait summary
pub const WAIT_SUMMARY_FILE: &str = "db.txt";
/// Default file name of the per-floor table
pub const FLOOR_TABLE_FILE: &str = "trace.txt";

/// Statistics of one floor over the measured phase
#[derive(Debug, Clone, PartialEq)]
pub struct FloorSummary {
    pub floor: usize,
    /// Passengers that left the floor's queue during the measured phase
    pub samples: u64,
    /// Time-weighted mean queue length
    pub mean_queue_length: f64,
    /// Mean length of stay in the queue
    pub mean_wait: f64,
    pub max_wait: f64,
}

/// Result of one complete run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub policy: DispatchPolicy,
    pub floors: Vec<FloorSummary>,
    /// Passengers delivered during the measured phase
    pub completed_journeys: u64,
    pub mean_journey: f64,
    /// Passengers still queued on a floor when the run ended
    pub still_waiting: usize,
    /// Floors travelled per car over the whole run
    pub car_moves: Vec<u64>,
    pub finished_at: SimTime,
}

impl SimulationReport {
    /// Snapshot the building's statistics at `now`
    pub fn from_building(building: &Building, policy: DispatchPolicy, now: SimTime) -> Self {
        let floors = building
            .floors()
            .iter()
            .map(|floor| FloorSummary {
                floor: floor.level(),
                samples: floor.length_of_stay().count(),
                mean_queue_length: floor.mean_queue_length(now),
                mean_wait: floor.length_of_stay().mean(),
                max_wait: floor.length_of_stay().max().unwrap_or(0.0),
            })
            .collect();

        Self {
            policy,
            floors,
            completed_journeys: building.journeys().count(),
            mean_journey: building.journeys().mean(),
            still_waiting: building.waiting_count(),
            car_moves: building.cars().iter().map(|car| car.moves()).collect(),
            finished_at: now,
        }
    }

    /// Total number of wait samples over all floors
    pub fn total_samples(&self) -> u64 {
        self.floors.iter().map(|floor| floor.samples).sum()
    }

    /// Sample-weighted mean wait over the whole building
    pub fn overall_mean_wait(&self) -> f64 {
        let samples = self.total_samples();
        if samples == 0 {
            return 0.0;
        }
        let total: f64 = self
            .floors
            .iter()
            .map(|floor| floor.mean_wait * floor.samples as f64)
            .sum();
        total / samples as f64
    }
}

#[derive(Serialize)]
struct WaitRecord {
    floor: usize,
    mean_wait: f64,
}

/// Write `floor,mean_wait` lines, one per floor in floor order
pub fn write_wait_summary<W: Write>(writer: W, report: &SimulationReport) -> Result<(), SimError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for floor in &report.floors {
        wtr.serialize(WaitRecord {
            floor: floor.floor,
            mean_wait: floor.mean_wait,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the fixed-width per-floor table with a header line
pub fn write_floor_table<W: Write>(mut writer: W, report: &SimulationReport) -> Result<(), SimError> {
    writeln!(
        writer,
        "{:<6}{:>8}{:>15}{:>15}",
        "floor", "people", "queue length", "length of stay"
    )?;
    for floor in &report.floors {
        writeln!(
            writer,
            "{:<6}{:>8}{:>15.3}{:>15.3}",
            floor.floor, floor.samples, floor.mean_queue_length, floor.mean_wait
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Paths of the two result artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub wait_summary: PathBuf,
    pub floor_table: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            wait_summary: dir.join(WAIT_SUMMARY_FILE),
            floor_table: dir.join(FLOOR_TABLE_FILE),
        }
    }
}

/// Write both artifacts into `dir`, creating it if needed
pub fn write_artifacts(dir: &Path, report: &SimulationReport) -> Result<ArtifactPaths, SimError> {
    fs::create_dir_all(dir)?;
    let paths = ArtifactPaths::in_dir(dir);

    write_wait_summary(BufWriter::new(File::create(&paths.wait_summary)?), report)?;
    write_floor_table(BufWriter::new(File::create(&paths.floor_table)?), report)?;

    info!(
        "Wrote {} and {}",
        paths.wait_summary.display(),
        paths.floor_table.display()
    );
    Ok(paths)
}
