//! Per-rank price change detection.
//!
//! Slots are keyed by side and rank, never by level id or price: the
//! question answered is "did the price shown at this row move", so a new
//! best bid highlights every row whose displayed price shifted.
//!
//! Each slot moves `Stable -> Changed -> Stable`. A change arms a window
//! (300 ms by default) tagged with a generation number. Clearing is
//! freshness-checked against that generation, so a timer armed for an older
//! change cannot clobber a newer highlight. The tracker owns no timers
//! itself: hosts either call [`ChangeTracker::expire`] from a tick, or
//! schedule each returned [`ClearTicket`] and hand it back to
//! [`ChangeTracker::clear`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use crate::config::DEFAULT_HIGHLIGHT_WINDOW_MS;
use crate::models::{BookSnapshot, Side};

/// Direction of the most recent price move at a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Identifies a row position: side plus rank from the best price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub side: Side,
    pub rank: usize,
}

impl SlotKey {
    pub fn new(side: Side, rank: usize) -> Self {
        Self { side, rank }
    }
}

/// Handle for clearing one armed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearTicket {
    pub key: SlotKey,
    pub generation: u64,
    pub due: Instant,
}

#[derive(Debug, Clone, Copy)]
struct ActiveChange {
    direction: Direction,
    expires_at: Instant,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    price: Decimal,
    change: Option<ActiveChange>,
}

/// Tracks the last seen price per slot and any armed highlight.
#[derive(Debug)]
pub struct ChangeTracker {
    slots: HashMap<SlotKey, Slot>,
    window: Duration,
    next_generation: u64,
}

impl ChangeTracker {
    /// Creates a tracker whose highlights last `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            slots: HashMap::new(),
            window,
            next_generation: 1,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Compares `snapshot` against the previous one and arms changed slots.
    ///
    /// The first observation of a slot only records a baseline. Equal prices
    /// never arm, regardless of size. A re-armed slot gets a fresh window and
    /// the latest direction. Ranks absent from `snapshot` are forgotten.
    pub fn observe(&mut self, snapshot: &BookSnapshot, now: Instant) -> Vec<ClearTicket> {
        let mut tickets = Vec::new();

        for side in [Side::Bid, Side::Ask] {
            let levels = snapshot.side(side);
            self.slots
                .retain(|key, _| key.side != side || key.rank < levels.len());

            for (rank, level) in levels.iter().enumerate() {
                let key = SlotKey::new(side, rank);
                match self.slots.get_mut(&key) {
                    None => {
                        self.slots.insert(
                            key,
                            Slot {
                                price: level.price,
                                change: None,
                            },
                        );
                    }
                    Some(slot) => {
                        if level.price != slot.price {
                            let direction = if level.price > slot.price {
                                Direction::Up
                            } else {
                                Direction::Down
                            };
                            let generation = self.next_generation;
                            self.next_generation += 1;
                            let expires_at = now + self.window;
                            slot.change = Some(ActiveChange {
                                direction,
                                expires_at,
                                generation,
                            });
                            tracing::trace!(
                                side = %side,
                                rank,
                                from = %slot.price,
                                to = %level.price,
                                direction = direction.as_str(),
                                generation,
                                "price change armed"
                            );
                            tickets.push(ClearTicket {
                                key,
                                generation,
                                due: expires_at,
                            });
                        }
                        slot.price = level.price;
                    }
                }
            }
        }

        tickets
    }

    /// Returns the active direction for a slot, treating expired windows as cleared.
    pub fn direction(&self, side: Side, rank: usize, now: Instant) -> Option<Direction> {
        self.slots
            .get(&SlotKey::new(side, rank))
            .and_then(|slot| slot.change)
            .filter(|change| now < change.expires_at)
            .map(|change| change.direction)
    }

    /// Clears the change named by `ticket` if it is still the current one.
    ///
    /// Returns `false` (and does nothing) for stale or already-cleared tickets.
    pub fn clear(&mut self, ticket: &ClearTicket) -> bool {
        let Some(slot) = self.slots.get_mut(&ticket.key) else {
            return false;
        };
        match slot.change {
            Some(change) if change.generation == ticket.generation => {
                slot.change = None;
                tracing::trace!(
                    side = %ticket.key.side,
                    rank = ticket.key.rank,
                    generation = ticket.generation,
                    "price change cleared"
                );
                true
            }
            _ => false,
        }
    }

    /// Clears every change due at or before `now`; returns how many were cleared.
    pub fn expire(&mut self, now: Instant) -> usize {
        let mut cleared = 0;
        for slot in self.slots.values_mut() {
            if slot.change.is_some_and(|change| change.expires_at <= now) {
                slot.change = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Number of slots with an armed change, expired or not.
    pub fn armed(&self) -> usize {
        self.slots.values().filter(|s| s.change.is_some()).count()
    }

    /// Number of slots with a recorded baseline price.
    pub fn tracked(&self) -> usize {
        self.slots.len()
    }

    /// Drops all baselines and armed changes.
    pub fn reset(&mut self) {
        self.slots.clear();
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_HIGHLIGHT_WINDOW_MS))
    }
}
