//! Bounded-concurrency fan-out with ordered results.

use futures_util::future::try_join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Apply an async mapping to every item with at most `limit` in flight.
///
/// Results come back in input order: `results[i]` corresponds to `items[i]`
/// no matter when each mapper finishes. `min(limit, items.len())` cooperative
/// workers each claim the next unclaimed index from a shared counter, so no
/// item is mapped twice. A `limit` of zero is treated as one, which makes
/// the call equivalent to sequential mapping.
///
/// The first mapper failure fails the whole call; the remaining workers are
/// cancelled and any partial results are discarded. Retry policy belongs to
/// the caller.
pub async fn dispatch_ordered<T, R, E, F, Fut>(
    items: Vec<T>,
    limit: usize,
    map: F,
) -> Result<Vec<R>, E>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let items: Vec<Mutex<Option<T>>> = items
        .into_iter()
        .map(|item| Mutex::new(Some(item)))
        .collect();
    let slots: Vec<Mutex<Option<R>>> = std::iter::repeat_with(|| Mutex::new(None))
        .take(total)
        .collect();
    let next = AtomicUsize::new(0);

    let map = &map;
    let items = &items;
    let slots = &slots;
    let next = &next;

    let workers = (0..limit.clamp(1, total)).map(|_| async move {
        loop {
            let index = next.fetch_add(1, Ordering::SeqCst);
            if index >= total {
                return Ok(());
            }
            // The counter hands out each index exactly once.
            let item = items[index]
                .lock()
                .await
                .take()
                .expect("index claimed twice");
            let result = map(item, index).await?;
            *slots[index].lock().await = Some(result);
        }
    });

    try_join_all(workers).await?;

    Ok(slots
        .iter()
        .map(|slot| {
            slot.try_lock()
                .expect("workers have finished")
                .take()
                .expect("slot filled on success")
        })
        .collect())
}
