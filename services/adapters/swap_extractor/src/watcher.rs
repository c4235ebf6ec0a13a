//! Pending transaction watcher
//!
//! Every announced hash is handled as an independent task: fetch the
//! transaction, skip it unless its destination is a registered router,
//! extract and hand the record to the single writer task. A failure in one
//! transaction never affects the others. At most `max_in_flight` hashes are
//! processed at once; further hashes wait in the feed channel.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dex::{format_address, SwapExtraction, SwapExtractor};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};
use web3::types::H256;

use crate::output::SwapWriter;
use crate::pending_feed::PendingTransactionFeed;
use crate::rpc_client::{call_data_from_transaction, format_hash, RpcClient};

const HASH_CHANNEL_CAPACITY: usize = 1024;
const RECORD_CHANNEL_CAPACITY: usize = 256;

pub struct Watcher {
    extractor: SwapExtractor,
    rpc: Arc<RpcClient>,
    writer: SwapWriter,
    max_in_flight: usize,
}

impl Watcher {
    pub fn new(extractor: SwapExtractor, rpc: RpcClient, writer: SwapWriter) -> Self {
        Self {
            extractor,
            rpc: Arc::new(rpc),
            writer,
            max_in_flight: config::defaults::rpc::MAX_IN_FLIGHT,
        }
    }

    /// Bound on concurrently processed transactions, at least one
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Run until the feed stops
    pub async fn run(self, ws_url: String, reconnect_delay: Duration) {
        let (hash_tx, hash_rx) = mpsc::channel::<H256>(HASH_CHANNEL_CAPACITY);
        let (record_tx, mut record_rx) = mpsc::channel::<SwapExtraction>(RECORD_CHANNEL_CAPACITY);

        let feed = PendingTransactionFeed::new(ws_url, reconnect_delay);
        let feed_task = tokio::spawn(async move { feed.run(hash_tx).await });

        let writer = self.writer.clone();
        let writer_task = tokio::spawn(async move {
            while let Some(record) = record_rx.recv().await {
                if let Err(e) = writer.write(&record).await {
                    warn!("{:#}", e);
                }
            }
        });

        let extractor = self.extractor;
        let rpc = self.rpc;
        let sink = record_tx.clone();
        for_each_bounded(hash_rx, self.max_in_flight, move |hash| {
            let extractor = extractor.clone();
            let rpc = Arc::clone(&rpc);
            let record_tx = sink.clone();
            async move {
                if let Some(record) = process_pending(&extractor, &rpc, hash).await {
                    let _ = record_tx.send(record).await;
                }
            }
        })
        .await;

        drop(record_tx);
        let _ = feed_task.await;
        let _ = writer_task.await;
    }
}

/// Spawn `handler` for every received item with at most `limit` running at
/// once. Returns after the channel closes and every spawned task finished.
async fn for_each_bounded<T, F, Fut>(mut items: mpsc::Receiver<T>, limit: usize, handler: F)
where
    T: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(limit));

    while let Some(item) = items.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let task = handler(item);
        tokio::spawn(async move {
            task.await;
            drop(permit);
        });
    }

    // Draining every permit waits out the tasks still running
    if let Ok(limit) = u32::try_from(limit) {
        let _ = permits.acquire_many(limit).await;
    }
}

async fn process_pending(
    extractor: &SwapExtractor,
    rpc: &RpcClient,
    hash: H256,
) -> Option<SwapExtraction> {
    let tx = match rpc.transaction(hash).await {
        Ok(Some(tx)) => tx,
        Ok(None) => {
            debug!("Pending transaction {} no longer available", format_hash(&hash));
            return None;
        }
        Err(e) => {
            debug!("Failed to fetch {}: {}", format_hash(&hash), e);
            return None;
        }
    };

    let call = call_data_from_transaction(&tx).ok()?;
    if !extractor.is_router(&call.destination) {
        return None;
    }

    match extractor.extract(&call) {
        Ok(extraction) => {
            info!(
                "Swap {} on {}: {} tokens, input {:?}, output {:?}",
                format_hash(&hash),
                format_address(&call.destination),
                extraction.path.len(),
                extraction.input_token(),
                extraction.output_token()
            );
            Some(extraction)
        }
        Err(e) => {
            warn!("Extraction failed for {}: {}", format_hash(&hash), e);
            None
        }
    }
}
