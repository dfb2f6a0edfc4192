//! Highlight clear timers.
//!
//! One `tokio` task per armed slot sleeps until the ticket is due and then
//! posts [`Message::HighlightExpired`]. Re-arming a slot aborts its previous
//! task, and dropping the timer set aborts everything still pending, so no
//! callback outlives the view that armed it.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::tracker::{ClearTicket, SlotKey};

use super::event::Message;

struct Pending {
    generation: u64,
    handle: AbortHandle,
}

/// Timer set owned by one depth view.
pub struct HighlightTimers {
    pending: HashMap<SlotKey, Pending>,
    tx: mpsc::UnboundedSender<Message>,
}

impl HighlightTimers {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            pending: HashMap::new(),
            tx,
        }
    }

    /// Arms a timer for `ticket`, cancelling any earlier timer on the same slot.
    ///
    /// Must be called from within a `tokio` runtime.
    pub fn schedule(&mut self, ticket: ClearTicket) {
        let tx = self.tx.clone();
        let due = tokio::time::Instant::from_std(ticket.due);
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(due).await;
            let _ = tx.send(Message::HighlightExpired(ticket));
        })
        .abort_handle();

        let previous = self.pending.insert(
            ticket.key,
            Pending {
                generation: ticket.generation,
                handle,
            },
        );
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    /// Forgets the timer for a fired ticket if it is still the current one.
    pub fn complete(&mut self, ticket: &ClearTicket) {
        if self
            .pending
            .get(&ticket.key)
            .is_some_and(|p| p.generation == ticket.generation)
        {
            self.pending.remove(&ticket.key);
        }
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn outstanding(&self) -> usize {
        self.pending
            .values()
            .filter(|p| !p.handle.is_finished())
            .count()
    }

    /// Aborts every pending timer.
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }
}

impl Drop for HighlightTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Ticket due `delay_ms` after the (possibly paused) runtime clock.
    fn ticket(generation: u64, delay_ms: u64) -> ClearTicket {
        ClearTicket {
            key: SlotKey::new(Side::Bid, 0),
            generation,
            due: (Instant::now() + Duration::from_millis(delay_ms)).into_std(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_due() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = HighlightTimers::new(tx);
        timers.schedule(ticket(1, 300));
        assert_eq!(timers.outstanding(), 1);

        match rx.recv().await {
            Some(Message::HighlightExpired(t)) => {
                assert_eq!(t.generation, 1);
                timers.complete(&t);
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(timers.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_cancels_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = HighlightTimers::new(tx);
        let start = Instant::now();
        timers.schedule(ticket(1, 300));
        tokio::time::advance(Duration::from_millis(150)).await;
        timers.schedule(ticket(2, 300));

        // Past the first ticket's due time: nothing fires.
        tokio::time::advance(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        match rx.recv().await {
            Some(Message::HighlightExpired(t)) => assert_eq!(t.generation, 2),
            other => panic!("unexpected message {other:?}"),
        }
        assert!(Instant::now() >= start + Duration::from_millis(450));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_outstanding_timers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = HighlightTimers::new(tx);
        timers.schedule(ticket(1, 300));
        timers.schedule(ClearTicket {
            key: SlotKey::new(Side::Ask, 2),
            ..ticket(2, 300)
        });
        assert_eq!(timers.outstanding(), 2);

        drop(timers);
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
