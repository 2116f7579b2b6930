use tokio::sync::broadcast;

use crate::error::{AvrError, Result};
use crate::notification::Notification;

/// Stream of state changes that passed deduplication
///
/// The channel belongs to the device's [`StateCache`](crate::StateCache), not
/// to the Telnet session. [`AvrReceiver::close`](crate::AvrReceiver::close)
/// leaves it open, and values fed through
/// [`AvrReceiver::ingest`](crate::AvrReceiver::ingest) keep arriving. It only
/// closes once the receiver and every zone, Audyssey and sound mode handle
/// cloned from it have been dropped.
pub struct StateReceiver {
    rx: broadcast::Receiver<Notification>,
}

impl StateReceiver {
    pub(crate) fn new(rx: broadcast::Receiver<Notification>) -> Self {
        Self { rx }
    }

    /// Wait for the next propagated change
    ///
    /// Fails with `ConnectionClosed` once the state cache is gone, and with
    /// `ChannelError` when this subscriber fell more than the channel capacity
    /// behind. A lagging subscriber keeps receiving from the oldest retained
    /// change on the next call.
    pub async fn recv(&mut self) -> Result<Notification> {
        self.rx.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => AvrError::ConnectionClosed,
            broadcast::error::RecvError::Lagged(n) => lagged(n),
        })
    }

    /// Take a pending change without waiting
    ///
    /// Returns `None` if nothing is pending.
    pub fn try_recv(&mut self) -> Result<Option<Notification>> {
        match self.rx.try_recv() {
            Ok(change) => Ok(Some(change)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Closed) => Err(AvrError::ConnectionClosed),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Err(lagged(n)),
        }
    }
}

fn lagged(skipped: u64) -> AvrError {
    AvrError::ChannelError(format!("Lagged by {} state changes", skipped))
}

#[cfg(test)]
mod tests {
    use crate::error::AvrError;
    use crate::state::StateCache;
    use crate::types::{Param, Zone};

    #[tokio::test]
    async fn test_closes_when_cache_dropped() {
        let cache = StateCache::new();
        let mut rx = cache.subscribe();

        cache.ingest(Zone::Main, "PS", "LFC ON");
        drop(cache);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.param, Param::Lfc);
        assert!(matches!(rx.recv().await, Err(AvrError::ConnectionClosed)));
    }

    #[test]
    fn test_lagging_subscriber_resumes() {
        let cache = StateCache::new();
        let mut rx = cache.subscribe();

        for minutes in 1..=120 {
            cache.ingest(Zone::Main, "SLP", &format!("{:03}", minutes));
        }

        assert!(matches!(rx.try_recv(), Err(AvrError::ChannelError(_))));
        let next = rx.try_recv().unwrap().unwrap();
        assert_eq!(next.param, Param::Sleep);
    }
}
