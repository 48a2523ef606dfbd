//! # Task Pool Module
//!
//! Optional worker pool that moves chunk generation and meshing off the
//! main thread. The main thread stays the sole owner of the chunk map:
//! workers receive owned task data (a coordinate to generate, or a captured
//! mesh snapshot), compute, and send owned results back through a channel
//! that the streamer drains once per tick.
//!
//! ## Architecture
//!
//! Each worker thread gets a dedicated channel pair. Tasks are dispatched
//! round-robin across workers with a small per-channel in-flight cap;
//! overflow waits in a FIFO queue that is pumped every tick as capacity
//! frees up. Workers hold their own clone of the generator, so generation
//! needs no shared state at all.
//!
//! Dropping the pool closes the task channels, which ends each worker's
//! receive loop and lets the threads exit.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

use crate::generation::WorldGenerator;
use crate::meshing::mesh::ChunkMesh;
use crate::meshing::{build_mesh, MeshSnapshot};
use crate::voxels::chunk::Chunk;
use crate::voxels::chunk_store::ChunkCoord;

/// A unit of background work.
pub enum EngineTask {
    /// Generate the chunk at a coordinate.
    Generate {
        /// Coordinate to generate.
        coord: ChunkCoord,
    },
    /// Build a mesh from a captured snapshot.
    BuildMesh {
        /// Snapshot of the chunk and its neighbor boundary planes.
        snapshot: MeshSnapshot,
    },
}

/// The result of a completed [`EngineTask`].
pub enum TaskOutcome {
    /// A freshly generated chunk, ready to install.
    Generated {
        /// The generated chunk.
        chunk: Chunk,
    },
    /// A freshly built mesh, ready to upload.
    Meshed {
        /// Coordinate the mesh belongs to.
        coord: ChunkCoord,
        /// The built mesh.
        mesh: ChunkMesh,
    },
}

/// Maximum tasks in flight per worker channel. Small on purpose: it keeps
/// dispatch latency low while the FIFO queue absorbs bursts.
const MAX_TASKS_IN_FLIGHT: usize = 2;

struct TaskChannel {
    sender: Sender<EngineTask>,
    receiver: Receiver<TaskOutcome>,
    in_flight: usize,
    _worker: JoinHandle<()>,
}

/// A pool of worker threads for generation and meshing.
pub struct TaskPool {
    channels: Vec<TaskChannel>,
    queued: VecDeque<EngineTask>,
    next_channel: usize,
}

impl TaskPool {
    /// Spawns `num_workers` worker threads (at least one), each owning a
    /// clone of the generator.
    pub fn new(num_workers: usize, generator: WorldGenerator) -> Self {
        let num_workers = num_workers.max(1);
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_sender, task_receiver) = channel::<EngineTask>();
            let (result_sender, result_receiver) = channel::<TaskOutcome>();
            let worker_generator = generator.clone();

            let worker = std::thread::spawn(move || {
                while let Ok(task) = task_receiver.recv() {
                    let outcome = match task {
                        EngineTask::Generate { coord } => TaskOutcome::Generated {
                            chunk: worker_generator.generate(coord),
                        },
                        EngineTask::BuildMesh { snapshot } => {
                            let coord = snapshot.coord();
                            TaskOutcome::Meshed {
                                coord,
                                mesh: build_mesh(&snapshot, coord),
                            }
                        }
                    };
                    if result_sender.send(outcome).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                sender: task_sender,
                receiver: result_receiver,
                in_flight: 0,
                _worker: worker,
            });
        }

        log::info!("task pool started with {num_workers} workers");
        TaskPool {
            channels,
            queued: VecDeque::new(),
            next_channel: 0,
        }
    }

    /// Submits a task, dispatching immediately if a worker has capacity and
    /// queueing otherwise. Returns whether the task was dispatched now.
    pub fn submit(&mut self, task: EngineTask) -> bool {
        match self.find_available_channel() {
            Some(index) => match self.try_send(task, index) {
                Ok(()) => {
                    self.next_channel = (index + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued.push_back(task);
                    false
                }
            },
            None => {
                self.queued.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers while capacity lasts. Call once per
    /// tick.
    pub fn pump(&mut self) {
        while let Some(task) = self.queued.pop_front() {
            let Some(index) = self.find_available_channel() else {
                self.queued.push_front(task);
                return;
            };
            if let Err(task) = self.try_send(task, index) {
                // Worker is gone; put the task back and stop.
                self.queued.push_front(task);
                return;
            }
        }
    }

    /// Collects every completed outcome without blocking.
    pub fn drain(&mut self) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::new();
        for channel in &mut self.channels {
            while let Ok(outcome) = channel.receiver.try_recv() {
                channel.in_flight -= 1;
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Number of tasks dispatched or queued but not yet drained.
    pub fn outstanding(&self) -> usize {
        self.queued.len() + self.channels.iter().map(|c| c.in_flight).sum::<usize>()
    }

    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        let start = self.next_channel;
        let mut current = start;
        loop {
            if self.channels[current].in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start {
                return None;
            }
        }
    }

    fn try_send(&mut self, task: EngineTask, index: usize) -> Result<(), EngineTask> {
        match self.channels[index].sender.send(task) {
            Ok(()) => {
                self.channels[index].in_flight += 1;
                Ok(())
            }
            Err(error) => Err(error.0),
        }
    }
}
