use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use mimic_cluster::KMeansConfig;
use mimic_io::{
    ExperimentName, FrameReader, GestureData, GestureReader, TemplateEntry, TemplateWriter,
    read_templates,
};
use mimic_stream::{CalibrationConfig, GestureModel, Match, StreamMatcher, TrainingConfig};

#[derive(Parser)]
#[command(name = "mimic")]
#[command(about = "Learn gesture prototypes from recorded examples and detect them in motion streams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Seed of the calibration noise generator
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel training (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared tuning parameters for prototype clustering.
#[derive(Args, Debug, Clone)]
struct ClusterArgs {
    /// Number of k-means update/reassign rounds
    #[arg(long, default_value_t = 10)]
    max_iter: usize,

    /// Maximum DBA iterations per centroid update
    #[arg(long, default_value_t = 10)]
    dba_max_iter: usize,

    /// DBA convergence tolerance
    #[arg(long, default_value_t = 0.01)]
    dba_tol: f64,

    /// Seed string for the initial centroid draw
    #[arg(long, default_value = "Labeling")]
    kmeans_seed: String,
}

impl ClusterArgs {
    fn config(&self, k: usize) -> Result<KMeansConfig> {
        Ok(KMeansConfig::new(k)?
            .with_max_iter(self.max_iter)
            .with_dba_max_iter(self.dba_max_iter)
            .with_dba_tol(self.dba_tol)
            .with_seed(self.kmeans_seed.as_str()))
    }
}

/// Threshold calibration parameters.
#[derive(Args, Debug, Clone)]
struct CalibrationArgs {
    /// Threshold step as a fraction of the example variance
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    /// Number of thresholds to try
    #[arg(long, default_value_t = 5)]
    calibration_iter: usize,

    /// Noise frames placed before and after each held-out example
    #[arg(long, default_value_t = 10)]
    padding: usize,

    /// Per-axis amplitude of the padding noise
    #[arg(long, default_value_t = 1024.0)]
    noise_amplitude: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Train one template per gesture and write them to {experiment}_templates.json
    Train {
        /// Path to the gesture set JSON file
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Number of clusters per gesture; the prototype is the largest cluster's centroid
        #[arg(long, default_value_t = 1)]
        k: usize,

        #[command(flatten)]
        cluster: ClusterArgs,

        #[command(flatten)]
        calibration: CalibrationArgs,
    },

    /// Cluster the examples of one gesture with k-means over DTW
    Cluster {
        /// Path to the gesture set JSON file
        #[arg(long)]
        data: PathBuf,

        /// Name of the gesture to cluster
        #[arg(long)]
        gesture: String,

        /// Number of clusters
        #[arg(long)]
        k: usize,

        #[command(flatten)]
        cluster: ClusterArgs,
    },

    /// Run trained templates over a recorded frame stream
    Detect {
        /// Path to a {experiment}_templates.json file
        #[arg(long)]
        templates: PathBuf,

        /// Path to the frame stream CSV file (x,y,z header)
        #[arg(long)]
        frames: PathBuf,

        /// Stream time of the first frame
        #[arg(long, default_value_t = 0)]
        start_offset: u64,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct TrainOutput {
    experiment: String,
    path: PathBuf,
    gestures: Vec<GestureOutput>,
}

#[derive(Serialize)]
struct GestureOutput {
    name: String,
    class_id: u32,
    n_examples: usize,
    trained: bool,
    threshold: Option<f64>,
    avg_length: Option<usize>,
    prototype_len: Option<usize>,
    detected_all: Option<bool>,
}

#[derive(Serialize)]
struct ClusterOutput {
    gesture: String,
    k: usize,
    n_examples: usize,
    clusters: Vec<ClusterEntry>,
}

#[derive(Serialize)]
struct ClusterEntry {
    members: Vec<usize>,
    variance: f64,
    centroid_len: usize,
}

#[derive(Serialize)]
struct DetectOutput {
    experiment: String,
    n_frames: usize,
    matches: Vec<DetectedMatch>,
}

#[derive(Serialize)]
struct DetectedMatch {
    gesture: String,
    #[serde(flatten)]
    detection: Match,
}

fn train_gesture(
    gesture: &GestureData,
    config: TrainingConfig,
) -> Result<(GestureOutput, Option<TemplateEntry>)> {
    let mut model = GestureModel::new(gesture.class_id, config);
    model
        .update(&gesture.examples)
        .with_context(|| format!("failed to train gesture \"{}\"", gesture.name))?;

    let template = model.template();
    let output = GestureOutput {
        name: gesture.name.clone(),
        class_id: gesture.class_id,
        n_examples: gesture.examples.len(),
        trained: model.is_running(),
        threshold: template.map(|t| t.threshold),
        avg_length: template.map(|t| t.avg_length),
        prototype_len: template.map(|t| t.prototype.len()),
        detected_all: model.calibration().map(|c| c.detected_all),
    };
    let entry = template.map(|t| TemplateEntry {
        name: gesture.name.clone(),
        template: t.clone(),
    });
    Ok((output, entry))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train {
            data,
            experiment,
            output_dir,
            k,
            cluster,
            calibration,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let set = GestureReader::new(&data)
                .read()
                .context("failed to read gesture set")?;

            let config = TrainingConfig::new()
                .with_kmeans(cluster.config(k)?)
                .with_calibration(
                    CalibrationConfig::new()
                        .with_step(calibration.step)
                        .with_max_iter(calibration.calibration_iter)
                        .with_padding(calibration.padding)
                        .with_noise_amplitude(calibration.noise_amplitude)
                        .with_seed(cli.seed),
                );

            // Gestures train independently.
            let trained = set
                .gestures()
                .par_iter()
                .map(|g| train_gesture(g, config.clone()))
                .collect::<Result<Vec<_>>>()?;

            let mut gestures = Vec::with_capacity(trained.len());
            let mut entries = Vec::new();
            for (output, entry) in trained {
                if !output.trained {
                    warn!(gesture = %output.name, "no examples, gesture skipped");
                }
                gestures.push(output);
                entries.extend(entry);
            }

            let writer = TemplateWriter::new(&output_dir, experiment_name)?;
            let path = writer.write(entries).context("failed to write templates")?;

            let output = TrainOutput {
                experiment,
                path,
                gestures,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Cluster {
            data,
            gesture,
            k,
            cluster,
        } => {
            let set = GestureReader::new(&data)
                .read()
                .context("failed to read gesture set")?;
            let Some(target) = set.get(&gesture) else {
                anyhow::bail!("gesture \"{gesture}\" not found in {}", data.display());
            };

            let clusters = cluster
                .config(k)?
                .fit(&target.examples)
                .with_context(|| format!("clustering gesture \"{gesture}\" failed"))?;
            info!(n_clusters = clusters.len(), "clustering finished");

            let output = ClusterOutput {
                gesture,
                k,
                n_examples: target.examples.len(),
                clusters: clusters
                    .into_iter()
                    .map(|c| ClusterEntry {
                        centroid_len: c.centroid.len(),
                        variance: c.variance,
                        members: c.members,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Detect {
            templates,
            frames,
            start_offset,
        } => {
            let set = read_templates(&templates).context("failed to read templates")?;
            let stream = FrameReader::new(&frames)
                .read()
                .context("failed to read frame stream")?;

            let mut matches = Vec::new();
            for entry in &set.templates {
                let config = entry.template.matcher_config().with_start_offset(start_offset);
                let prototype = entry.template.prototype.as_slice().to_vec();
                let mut matcher = StreamMatcher::new(prototype, config)
                    .with_context(|| format!("invalid template \"{}\"", entry.name))?;
                matches.extend(matcher.find_matches(&stream).into_iter().map(|detection| {
                    DetectedMatch {
                        gesture: entry.name.clone(),
                        detection,
                    }
                }));
            }
            matches.sort_by_key(|m| (m.detection.end_time, m.detection.class_id));
            info!(n_matches = matches.len(), "detection finished");

            let output = DetectOutput {
                experiment: set.experiment,
                n_frames: stream.len(),
                matches,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
