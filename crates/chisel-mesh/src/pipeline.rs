//! Batch meshing pipeline: meshes many micro-voxel blocks on a pool of worker
//! threads, delivering one result per block through a channel.
//!
//! Each task owns its block entity, so workers share nothing mutable. Every
//! result carries its own [`BoxCollector`], which keeps sink writes sharded per
//! task; the caller merges them on its own thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use chisel_voxel::{BitsBlockEntity, BlockRegistry};
use glam::IVec3;

use crate::sink::BoxCollector;
use crate::{BitsMesher, MeshError};

/// A self-contained meshing task that can run on any thread.
pub struct MeshingTask {
    /// Caller-chosen identifier used to match results to tasks.
    pub id: u64,
    /// The block entity to decode and mesh.
    pub entity: BitsBlockEntity,
    /// World position of the block.
    pub origin: IVec3,
    /// Biome used for material lookup.
    pub biome: String,
}

/// The result of a completed meshing task.
pub struct MeshingResult {
    /// Identifier of the task this result belongs to.
    pub id: u64,
    /// World position of the block.
    pub origin: IVec3,
    /// The emitted boxes, or why this block could not be meshed.
    pub outcome: Result<BoxCollector, MeshError>,
}

/// Meshing pipeline backed by a thread pool.
///
/// Submit tasks with [`submit`](Self::submit) and collect results with
/// [`drain_results`](Self::drain_results) or [`recv`](Self::recv). A failing
/// block yields an `Err` outcome and never stops the other workers.
pub struct MeshingPipeline {
    /// Channel sender for submitting tasks to workers.
    task_sender: Option<crossbeam_channel::Sender<MeshingTask>>,
    /// Channel receiver for collecting completed results.
    result_receiver: crossbeam_channel::Receiver<MeshingResult>,
    /// Handles to the worker threads (for shutdown).
    worker_handles: Vec<JoinHandle<()>>,
    /// Maximum number of tasks that can be in-flight simultaneously.
    budget: usize,
    /// Tasks submitted but not yet collected. Only the submitting side
    /// updates this, so a full budget always has a result to wait for.
    in_flight: AtomicUsize,
}

impl MeshingPipeline {
    /// Creates a pipeline with `worker_count` threads and room for `budget`
    /// in-flight tasks. `registry` is shared read-only by all workers.
    pub fn new<R>(worker_count: usize, budget: usize, registry: Arc<R>, air_id: &str) -> Self
    where
        R: BlockRegistry + Send + Sync + 'static,
    {
        let (task_tx, task_rx) = crossbeam_channel::bounded(budget);
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let in_flight = AtomicUsize::new(0);
        let air_id: Arc<str> = Arc::from(air_id);

        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let rx: crossbeam_channel::Receiver<MeshingTask> = task_rx.clone();
            let tx = result_tx.clone();
            let reg = Arc::clone(&registry);
            let air = Arc::clone(&air_id);

            let spawned = std::thread::Builder::new()
                .name(format!("chisel-mesh-{worker}"))
                .spawn(move || {
                    let mesher = BitsMesher::new(&*reg).with_air_id(&*air);
                    while let Ok(task) = rx.recv() {
                        let mut sink = BoxCollector::new();
                        let outcome = mesher
                            .mesh_entity(&task.entity, task.origin, &task.biome, &mut sink)
                            .map(|_| sink);
                        if let Err(err) = &outcome {
                            tracing::warn!(id = task.id, origin = ?task.origin, "meshing failed: {err}");
                        }

                        let _ = tx.send(MeshingResult {
                            id: task.id,
                            origin: task.origin,
                            outcome,
                        });
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => tracing::error!("failed to spawn meshing worker {worker}: {err}"),
            }
        }

        Self {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            worker_handles: handles,
            budget,
            in_flight,
        }
    }

    /// Submit a meshing task. Hands the task back if the budget is exhausted
    /// or the pipeline has been shut down.
    pub fn submit(&self, task: MeshingTask) -> Result<(), MeshingTask> {
        let Some(sender) = &self.task_sender else {
            return Err(task);
        };
        if self.worker_handles.is_empty() || self.in_flight.load(Ordering::Relaxed) >= self.budget {
            return Err(task);
        }
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        sender.send(task).map_err(|err| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            err.into_inner()
        })
    }

    /// Maximum number of tasks accepted at once.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Drain all completed results without blocking.
    pub fn drain_results(&self) -> Vec<MeshingResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            results.push(result);
        }
        results
    }

    /// Blocks until the next result arrives. Returns `None` when no submitted
    /// task is awaiting collection, or once every worker has exited.
    pub fn recv(&self) -> Option<MeshingResult> {
        if self.in_flight_count() == 0 {
            return None;
        }
        let result = self.result_receiver.recv().ok()?;
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        Some(result)
    }

    /// Number of submitted tasks whose results have not been collected yet.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Shut down all worker threads gracefully.
    ///
    /// Drops the task sender to signal workers to exit, then joins all threads.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for MeshingPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
