use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use cube_chunk::{ChunkGenerateResult, generate_chunk_grid};
use cube_world::{ChunkCoord, TerrainGenerator};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Background generation: jobs go onto the rayon pool, finished grids come
/// back through one unbounded channel. Without a pool, jobs run inline but
/// still land on the channel.
pub struct GenWorkers {
    terrain: Arc<TerrainGenerator>,
    pool: Option<ThreadPool>,
    res_tx: Sender<ChunkGenerateResult>,
    res_rx: Receiver<ChunkGenerateResult>,
    inflight: Arc<AtomicUsize>,
}

impl GenWorkers {
    pub fn new(
        terrain: Arc<TerrainGenerator>,
        workers: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let (res_tx, res_rx) = unbounded();
        let pool = if workers > 0 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("cube-gen-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self {
            terrain,
            pool,
            res_tx,
            res_rx,
            inflight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn submit(&self, coord: ChunkCoord) {
        match &self.pool {
            Some(pool) => {
                let terrain = Arc::clone(&self.terrain);
                let tx = self.res_tx.clone();
                let inflight = Arc::clone(&self.inflight);
                inflight.fetch_add(1, Ordering::Relaxed);
                pool.spawn(move || {
                    let out = generate_chunk_grid(terrain.as_ref(), coord);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    // Receiver gone means the streamer shut down.
                    let _ = tx.send(out);
                });
            }
            None => {
                let _ = self.res_tx.send(generate_chunk_grid(self.terrain.as_ref(), coord));
            }
        }
    }

    #[inline]
    pub fn try_recv(&self) -> Option<ChunkGenerateResult> {
        self.res_rx.try_recv().ok()
    }

    /// Finished results waiting to be drained.
    pub fn queued(&self) -> usize {
        self.res_rx.len()
    }

    /// Jobs still running on the pool.
    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::Relaxed)
    }

    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(0, |p| p.current_num_threads())
    }
}
