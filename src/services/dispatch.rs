use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::core::{Catalog, Router};
use crate::models::{AdPlacement, InboundEvent, RiderProfile};
use crate::services::store::MemoryStore;

/// Unrecoverable engine failures. Anything here means the process should
/// stop rather than keep consuming events.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("partition {0} is no longer accepting events")]
    PartitionClosed(usize),

    #[error("ad sink closed while partition {0} had a placement to emit")]
    AdSinkClosed(usize),

    #[error("partition {0} worker panicked")]
    WorkerPanicked(usize),
}

/// Partition a rider id onto one of `partitions` workers.
///
/// Events sharing a rider id always land on the same worker, which is what
/// gives each rider strictly in-order, single-threaded processing.
#[inline]
pub fn partition_for(user_id: i64, partitions: usize) -> usize {
    user_id.rem_euclid(partitions as i64) as usize
}

/// Delivers inbound events to per-partition workers.
///
/// Each worker owns its shard of the rider profiles and a router; events
/// for one partition are processed one at a time in arrival order. Across
/// partitions there is no ordering guarantee. Matched placements flow
/// through a shared channel to the ad sink.
pub struct Dispatcher {
    senders: Vec<mpsc::Sender<InboundEvent>>,
    workers: Vec<JoinHandle<Result<(), EngineError>>>,
}

impl Dispatcher {
    /// Shard the bootstrapped riders and spawn one worker per partition.
    pub fn spawn(
        partitions: usize,
        queue_depth: usize,
        riders: Vec<RiderProfile>,
        catalog: Arc<Catalog>,
        interest_min_duration_ms: i64,
        ad_tx: mpsc::UnboundedSender<AdPlacement>,
    ) -> Self {
        let partitions = partitions.max(1);

        let mut shards: Vec<Vec<RiderProfile>> = (0..partitions).map(|_| Vec::new()).collect();
        for rider in riders {
            shards[partition_for(rider.user_id, partitions)].push(rider);
        }

        let mut senders = Vec::with_capacity(partitions);
        let mut workers = Vec::with_capacity(partitions);

        for (partition, shard) in shards.into_iter().enumerate() {
            let store: MemoryStore<i64, RiderProfile> =
                shard.into_iter().map(|r| (r.user_id, r)).collect();
            let router = Router::new(store, Arc::clone(&catalog))
                .with_interest_threshold(interest_min_duration_ms);

            let (tx, rx) = mpsc::channel(queue_depth);
            senders.push(tx);
            workers.push(tokio::spawn(run_partition(
                partition,
                rx,
                router,
                ad_tx.clone(),
            )));
        }

        Self { senders, workers }
    }

    pub fn partitions(&self) -> usize {
        self.senders.len()
    }

    /// True while every partition worker is still consuming.
    pub fn is_accepting(&self) -> bool {
        self.senders.iter().all(|tx| !tx.is_closed())
    }

    /// Enqueue an event to its owning partition, returning the partition
    /// index. Backpressure is the bounded channel: this suspends when the
    /// partition's queue is full.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<usize, EngineError> {
        let partition = partition_for(event.partition_key(), self.senders.len());
        self.senders[partition]
            .send(event)
            .await
            .map_err(|_| EngineError::PartitionClosed(partition))?;
        Ok(partition)
    }

    /// Close the inbound side and drain every worker to completion.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        drop(self.senders);
        for (partition, handle) in self.workers.into_iter().enumerate() {
            match handle.await {
                Ok(result) => result?,
                Err(_) => return Err(EngineError::WorkerPanicked(partition)),
            }
        }
        Ok(())
    }
}

async fn run_partition(
    partition: usize,
    mut rx: mpsc::Receiver<InboundEvent>,
    mut router: Router,
    ads: mpsc::UnboundedSender<AdPlacement>,
) -> Result<(), EngineError> {
    info!(partition, "partition worker started");

    while let Some(event) = rx.recv().await {
        if let Some(placement) = router.handle(event) {
            ads.send(placement)
                .map_err(|_| EngineError::AdSinkClosed(partition))?;
        }
    }

    info!(partition, "partition worker drained, stopping");
    Ok(())
}
