// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use fleet_reshuffle_model::prelude::*;
use fleet_reshuffle_solver::prelude::*;
use serde::Serialize;
use std::{
    env,
    fmt::Display,
    fs::File,
    io::BufWriter,
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InvalidEnvError {
    var: &'static str,
    value: String,
}

impl Display for InvalidEnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment variable {} has invalid value {:?}", self.var, self.value)
    }
}

impl std::error::Error for InvalidEnvError {}

#[derive(Debug)]
enum RunError {
    Env(InvalidEnvError),
    Loader(LoaderError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<InvalidEnvError> for RunError {
    fn from(e: InvalidEnvError) -> Self {
        Self::Env(e)
    }
}

impl From<LoaderError> for RunError {
    fn from(e: LoaderError) -> Self {
        Self::Loader(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for RunError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RunError::*;
        match self {
            Env(e) => write!(f, "{e}"),
            Loader(e) => write!(f, "failed to load fleet data: {e}"),
            Io(e) => write!(f, "I/O error: {e}"),
            Json(e) => write!(f, "failed to write report: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

#[derive(Debug, Clone, PartialEq)]
struct RunConfig {
    data_dir: PathBuf,
    report_path: PathBuf,
    max_trips: Option<usize>,
    reshuffle: ReshuffleConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            report_path: PathBuf::from("report.json"),
            max_trips: Some(5_000),
            reshuffle: ReshuffleConfig::default(),
        }
    }
}

fn parse_env<V: std::str::FromStr>(var: &'static str) -> Result<Option<V>, InvalidEnvError> {
    match env::var(var) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| InvalidEnvError { var, value: raw }),
        Err(_) => Ok(None),
    }
}

impl RunConfig {
    /// Defaults overridden by `FLEET_DATA_DIR`, `FLEET_REPORT_PATH`,
    /// `FLEET_BUFFER_MINUTES`, `FLEET_MAX_TRIPS` (`0` keeps every trip) and
    /// `FLEET_PARALLEL`.
    fn from_env() -> Result<Self, InvalidEnvError> {
        let mut cfg = Self::default();
        if let Some(dir) = parse_env::<PathBuf>("FLEET_DATA_DIR")? {
            cfg.data_dir = dir;
        }
        if let Some(path) = parse_env::<PathBuf>("FLEET_REPORT_PATH")? {
            cfg.report_path = path;
        }
        if let Some(minutes) = parse_env::<u32>("FLEET_BUFFER_MINUTES")? {
            cfg.reshuffle.buffer_minutes = minutes;
        }
        if let Some(n) = parse_env::<usize>("FLEET_MAX_TRIPS")? {
            cfg.max_trips = (n > 0).then_some(n);
        }
        if let Some(parallel) = parse_env::<bool>("FLEET_PARALLEL")? {
            cfg.reshuffle.parallel = parallel;
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize)]
struct RunReport<'a> {
    data_dir: String,
    buffer_minutes: u32,
    max_trips: Option<usize>,
    vehicles: usize,
    reservations: usize,
    skipped_unknown_vehicle: usize,
    window_hours: f64,
    leftovers: Vec<ReservationId>,
    before: &'a UtilizationReport,
    after: &'a UtilizationReport,
    summary: ImprovementSummary,
    reshuffle_elapsed_ms: u128,
}

fn banner(title: &str) {
    let rule = "=".repeat(title.len());
    println!("{rule}");
    println!("{title}");
    println!("{rule}");
}

fn run(cfg: &RunConfig) -> Result<(), RunError> {
    let mut loader = FleetLoader::new();
    if let Some(n) = cfg.max_trips {
        loader = loader.max_trips(n);
    }
    let schedule = loader.from_dir(&cfg.data_dir)?;

    info!(buffer_minutes = cfg.reshuffle.buffer_minutes, "reshuffling");
    let t0 = Instant::now();
    let outcome = Reshuffler::new(&schedule)
        .with_config(cfg.reshuffle.clone())
        .run();
    let elapsed = t0.elapsed();

    let engine = MetricsEngine::new(schedule.window());
    let before = UtilizationReport::for_assignment(&engine, schedule.original());
    let after = UtilizationReport::for_assignment(&engine, outcome.assignment());
    let summary = ImprovementSummary::new(&before, &after, outcome.leftovers().len());

    banner("STATISTICS BEFORE RESHUFFLING");
    println!("{before}");
    println!();
    banner("STATISTICS AFTER RESHUFFLING");
    println!("{after}");
    println!();
    banner("IMPROVEMENT STATISTICS");
    println!("{summary}");

    let report = RunReport {
        data_dir: cfg.data_dir.display().to_string(),
        buffer_minutes: cfg.reshuffle.buffer_minutes,
        max_trips: cfg.max_trips,
        vehicles: schedule.catalog().len(),
        reservations: schedule.reservation_count(),
        skipped_unknown_vehicle: schedule.skipped().len(),
        window_hours: schedule.window().hours(),
        leftovers: outcome.leftovers().iter().map(Reservation::id).collect(),
        before: &before,
        after: &after,
        summary,
        reshuffle_elapsed_ms: elapsed.as_millis(),
    };

    let file = File::create(&cfg.report_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)?;

    println!();
    println!("Wrote: {}", cfg.report_path.display());
    Ok(())
}

fn main() -> ExitCode {
    enable_tracing();

    let result = RunConfig::from_env()
        .map_err(RunError::from)
        .and_then(|cfg| run(&cfg));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "run failed");
            ExitCode::FAILURE
        }
    }
}
