use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::store::AnalysisStore;

/// Periodically delete expired analyses. The first sweep runs immediately.
pub fn spawn_sweeper(store: AnalysisStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = every.as_secs(), dir = %store.dir().display(), "Starting store sweeper");
        let mut ticker = interval(every.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.sweep()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("Store sweep failed: {e}"),
                Err(e) => warn!("Store sweep task panicked: {e}"),
            }
        }
    })
}
