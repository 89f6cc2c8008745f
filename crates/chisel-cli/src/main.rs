//! `chisel`: meshes chiselled micro-voxel blocks into a Wavefront OBJ.
//!
//! Loads a block registry manifest and one or more block files, meshes every
//! block on the worker pool and writes the combined mesh.
//!
//! Run with: `cargo run -p chisel-cli -- --registry blocks.ron house.ron`

mod input;
mod obj;

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chisel_config::{CliArgs, Config, ExportConfig, MeshConfig};
use chisel_mesh::{MeshingPipeline, MeshingResult, MeshingTask};
use chisel_voxel::{BlockRegistry, BlockTable};
use clap::Parser;
use glam::IVec3;
use tracing::{info, warn};

use crate::input::BlockFile;
use crate::obj::ObjWriter;

/// Where a task came from, for log messages.
struct TaskLabel {
    path: PathBuf,
    index: usize,
}

/// Outcome counts for the final report.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    meshed: usize,
    failed: usize,
    faces: usize,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("chisel: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => Config::default_dir()?,
    };
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);

    chisel_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    // Config loading ran before a subscriber existed.
    info!("config: {}", Config::path_in(&config_dir).display());
    info!(
        "chisel {} | workers={} budget={} air={}",
        env!("CARGO_PKG_VERSION"),
        config.mesh.workers,
        config.mesh.budget,
        config.mesh.air_id
    );

    let registry = BlockTable::load(&args.registry)
        .map_err(|err| format!("registry {}: {err}", args.registry.display()))?;

    let (tasks, labels) = collect_tasks(&args.inputs, &config.mesh.default_biome)?;
    info!("meshing {} blocks from {} files", tasks.len(), args.inputs.len());

    let results = mesh_batch(tasks, Arc::new(registry), &config.mesh)?;
    for result in &results {
        if let Err(err) = &result.outcome
            && let Some(label) = labels.get(result.id as usize)
        {
            warn!(
                "skipping block {} of {} at {}: {err}",
                label.index,
                label.path.display(),
                result.origin
            );
        }
    }

    let summary = write_obj(&results, &config.export)?;
    println!(
        "wrote {} faces for {} blocks to {} ({} failed)",
        summary.faces,
        summary.meshed,
        config.export.output.display(),
        summary.failed
    );
    Ok(())
}

/// Reads every input file into meshing tasks; task ids index `labels`.
fn collect_tasks(
    inputs: &[PathBuf],
    default_biome: &str,
) -> Result<(Vec<MeshingTask>, Vec<TaskLabel>), Box<dyn Error>> {
    let mut tasks = Vec::new();
    let mut labels = Vec::new();
    for path in inputs {
        let file = BlockFile::load(path)?;
        for (index, block) in file.blocks.into_iter().enumerate() {
            let (x, y, z) = block.origin;
            tasks.push(MeshingTask {
                id: labels.len() as u64,
                entity: block.entity,
                origin: IVec3::new(x, y, z),
                biome: block.biome.unwrap_or_else(|| default_biome.to_string()),
            });
            labels.push(TaskLabel {
                path: path.clone(),
                index,
            });
        }
    }
    Ok((tasks, labels))
}

/// Meshes all tasks on a worker pool, returning results ordered by task id.
fn mesh_batch<R>(
    tasks: Vec<MeshingTask>,
    registry: Arc<R>,
    config: &MeshConfig,
) -> Result<Vec<MeshingResult>, Box<dyn Error>>
where
    R: BlockRegistry + Send + Sync + 'static,
{
    let pipeline = MeshingPipeline::new(
        config.workers.max(1),
        config.budget.max(1),
        registry,
        &config.air_id,
    );

    let mut results = Vec::with_capacity(tasks.len());
    for mut task in tasks {
        // Wait for a free slot whenever the budget is exhausted.
        while let Err(rejected) = pipeline.submit(task) {
            task = rejected;
            match pipeline.recv() {
                Some(result) => results.push(result),
                None => return Err("meshing workers are unavailable".into()),
            }
        }
    }
    while let Some(result) = pipeline.recv() {
        results.push(result);
    }

    results.sort_by_key(|r| r.id);
    Ok(results)
}

fn write_obj(results: &[MeshingResult], export: &ExportConfig) -> Result<Summary, Box<dyn Error>> {
    let file = File::create(&export.output)
        .map_err(|err| format!("cannot create {}: {err}", export.output.display()))?;
    let mut writer = ObjWriter::new(BufWriter::new(file), export.scale)?;

    let mut summary = Summary::default();
    for result in results {
        match &result.outcome {
            Ok(boxes) => {
                let o = result.origin;
                writer.object(&format!("block_{}_{}_{}", o.x, o.y, o.z))?;
                for faces in &boxes.boxes {
                    writer.write_box(faces)?;
                }
                summary.meshed += 1;
            }
            Err(_) => summary.failed += 1,
        }
    }
    summary.faces = writer.face_count();
    writer.finish()?;
    Ok(summary)
}
