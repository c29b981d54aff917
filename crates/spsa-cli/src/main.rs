use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use spsa_optimizer::{
    optimize, ExtraArgs, ParamVector, PlainObjective, ProgressLog, SpsaConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Starting point plus run configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct RunFile {
    theta0: ParamVector,
    config: SpsaConfig,
}

impl Default for RunFile {
    /// Minimize x² + y² + z² subject to x >= 0.5, y >= 0.4, z >= 0.3.
    fn default() -> Self {
        Self {
            theta0: ParamVector::from([2.0, 3.0, 1.0]),
            config: SpsaConfig::new(1000)
                .with_extra_args(["Extra parameter", "Another parameter"])
                .with_theta_min([0.5, 0.4, 0.3])
                .with_report_stride(5)
                .with_progress_stride(5),
        }
    }
}

fn sphere(theta: &[f64], _: &ExtraArgs) -> f64 {
    theta.iter().map(|x| x * x).sum()
}

fn load_run(path: &Path) -> anyhow::Result<RunFile> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

/// Dump `progress` as JSON to `path`. Returns whether anything was written.
fn write_progress(path: &Path, progress: Option<&ProgressLog>) -> anyhow::Result<bool> {
    let Some(progress) = progress else {
        warn!(
            "SPSA_PROGRESS_OUT={} ignored: no progress_stride configured",
            path.display()
        );
        return Ok(false);
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, progress)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    info!("Wrote {} progress samples to {}", progress.len(), path.display());
    Ok(true)
}

fn parse_var<T>(name: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {name}: {raw:?}"))
}

fn env_override<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => parse_var(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut run = match std::env::args_os().nth(1) {
        Some(path) => load_run(Path::new(&path))?,
        None => RunFile::default(),
    };
    if let Some(n_iter) = env_override::<usize>("SPSA_ITERATIONS")? {
        run.config.n_iter = n_iter;
    }
    if let Some(seed) = env_override::<u64>("SPSA_SEED")? {
        run.config.seed = Some(seed);
    }
    let progress_out = std::env::var_os("SPSA_PROGRESS_OUT").map(PathBuf::from);

    let mut objective = PlainObjective::new(sphere);
    let outcome = optimize(&mut objective, run.theta0.clone(), &run.config)?;

    println!(
        "The parameters that minimise the function are {}\nThe minimum value of f is: {}",
        outcome.theta, outcome.value
    );

    if let Some(path) = progress_out {
        write_progress(&path, outcome.progress.as_ref())?;
    }

    Ok(())
}
