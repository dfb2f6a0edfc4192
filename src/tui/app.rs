//! Application state for the depth view.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::chart::{ChartGeometry, ChartLayout, DepthChart, LayoutSubscription, Viewport};
use crate::config::DepthConfig;
use crate::events::DepthEvent;
use crate::models::{BookSnapshot, SentimentReading, Side};
use crate::table::{LevelRow, LevelTable, TableOptions, TableView};
use crate::tracker::{ChangeTracker, ClearTicket};

/// How long a notice stays in the status bar.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    // -- Configuration --
    pub config: DepthConfig,
    pub options: TableOptions,

    // -- Book State --
    /// Latest snapshot supplied by the feed.
    pub snapshot: Option<BookSnapshot>,
    /// Per-rank change highlights.
    pub tracker: ChangeTracker,
    /// Latest sentiment reading.
    pub sentiment: Option<SentimentReading>,
    /// Number of snapshots applied.
    pub snapshots_seen: u64,

    // -- Chart State --
    /// Chart viewport and resize listeners.
    pub layout: ChartLayout,
    chart: Option<ChartGeometry>,
    chart_stale: Rc<Cell<bool>>,
    _layout_subscription: LayoutSubscription,

    // -- UI State --
    /// Whether the feed is live (as opposed to paused).
    pub live: bool,
    /// Currently selected row.
    pub selection: Selection,
    /// Rows per side that fit the book panel; `None` until the first layout.
    pub book_rows: Option<usize>,
    /// Short-lived status message.
    pub notice: Option<Notice>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App with an empty book.
    pub fn new(config: DepthConfig, viewport: Viewport) -> Self {
        let layout = ChartLayout::new(viewport);
        let chart_stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&chart_stale);
        let subscription = layout.subscribe(move |_| flag.set(true));

        Self {
            options: TableOptions::from(&config),
            tracker: ChangeTracker::new(config.highlight_window()),
            config,
            snapshot: None,
            sentiment: None,
            snapshots_seen: 0,

            layout,
            chart: None,
            chart_stale,
            _layout_subscription: subscription,

            live: true,
            selection: Selection::default(),
            book_rows: None,
            notice: None,

            should_quit: false,
        }
    }

    /// Applies a new snapshot and returns the highlights it armed.
    ///
    /// When no sentiment is supplied the reading is derived from the book.
    pub fn apply_snapshot(
        &mut self,
        snapshot: BookSnapshot,
        sentiment: Option<SentimentReading>,
        now: Instant,
    ) -> Vec<ClearTicket> {
        if snapshot.is_crossed() {
            tracing::warn!(spread = %snapshot.spread, "crossed book received");
        }

        let tickets = if self.options.highlight_changes {
            self.tracker.observe(&snapshot, now)
        } else {
            Vec::new()
        };

        self.sentiment = Some(
            sentiment
                .unwrap_or_else(|| SentimentReading::from_book(&snapshot, self.options.levels)),
        );
        self.chart = DepthChart::from_snapshot(&snapshot, self.layout.viewport());
        self.snapshot = Some(snapshot);
        self.snapshots_seen += 1;
        self.clamp_selection();

        tracing::debug!(
            seen = self.snapshots_seen,
            armed = tickets.len(),
            "snapshot applied"
        );
        tickets
    }

    /// Clears a highlight once its timer fires.
    pub fn expire_highlight(&mut self, ticket: &ClearTicket) -> bool {
        self.tracker.clear(ticket)
    }

    /// Resizes the chart viewport; listeners mark the cached geometry stale.
    pub fn resize_chart(&mut self, viewport: Viewport) {
        self.layout.resize(viewport.width, viewport.height);
        if self.chart_stale.replace(false)
            && let Some(snapshot) = &self.snapshot
        {
            self.chart = DepthChart::from_snapshot(snapshot, self.layout.viewport());
        }
    }

    /// Cached chart geometry for the current snapshot and viewport.
    pub fn chart(&self) -> Option<&ChartGeometry> {
        self.chart.as_ref()
    }

    /// Records how many rows per side the book panel can draw.
    pub fn set_book_rows(&mut self, rows: usize) {
        self.book_rows = Some(rows);
        self.clamp_selection();
    }

    /// Rows rendered per side: the configured level count, capped by the panel.
    pub fn visible_levels(&self) -> usize {
        match self.book_rows {
            Some(rows) => self.options.levels.min(rows),
            None => self.options.levels,
        }
    }

    /// Renders the level table as of `now`, windowed to the visible rows so
    /// depth bars fill the rows actually on screen.
    pub fn table_view(&self, now: Instant) -> Option<TableView> {
        let snapshot = self.snapshot.as_ref()?;
        let options = TableOptions {
            levels: self.visible_levels(),
            ..self.options.clone()
        };
        Some(LevelTable::render(
            snapshot,
            &options,
            Some((&self.tracker, now)),
        ))
    }

    /// Returns the selected row, if it is currently displayed.
    pub fn selected_row(&self, now: Instant) -> Option<LevelRow> {
        self.table_view(now)?
            .row(self.selection.side, self.selection.rank)
            .cloned()
    }

    /// Moves the selection through the on-screen order: asks from the deepest
    /// displayed down to the best, then bids from the best outward.
    pub fn move_selection(&mut self, delta: isize) {
        let (asks, bids) = self.displayed_counts();
        let total = asks + bids;
        if total == 0 {
            return;
        }
        let current = self.selection.display_index(asks);
        let next = (current as isize + delta).clamp(0, total as isize - 1) as usize;
        self.selection = Selection::from_display_index(next, asks);
    }

    /// Flips the live flag and returns the event to relay to the host.
    pub fn toggle_live(&mut self) -> DepthEvent {
        self.live = !self.live;
        DepthEvent::LiveToggle
    }

    /// Shows a status message.
    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears notices older than five seconds.
    pub fn clear_stale_notice(&mut self) {
        if let Some(ref notice) = self.notice
            && notice.timestamp.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }

    fn displayed_counts(&self) -> (usize, usize) {
        let levels = self.visible_levels();
        match &self.snapshot {
            Some(snapshot) => (
                snapshot.asks.len().min(levels),
                snapshot.bids.len().min(levels),
            ),
            None => (0, 0),
        }
    }

    fn clamp_selection(&mut self) {
        let (asks, bids) = self.displayed_counts();
        let count = match self.selection.side {
            Side::Ask => asks,
            Side::Bid => bids,
        };
        if count == 0 {
            self.selection = if bids > 0 {
                Selection::new(Side::Bid, 0)
            } else {
                Selection::new(Side::Ask, 0)
            };
        } else if self.selection.rank >= count {
            self.selection.rank = count - 1;
        }
    }
}

/// A row position in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub side: Side,
    pub rank: usize,
}

impl Selection {
    pub fn new(side: Side, rank: usize) -> Self {
        Self { side, rank }
    }

    fn display_index(&self, asks_shown: usize) -> usize {
        match self.side {
            Side::Ask => asks_shown.saturating_sub(1).saturating_sub(self.rank),
            Side::Bid => asks_shown + self.rank,
        }
    }

    fn from_display_index(index: usize, asks_shown: usize) -> Self {
        if index < asks_shown {
            Self::new(Side::Ask, asks_shown - 1 - index)
        } else {
            Self::new(Side::Bid, index - asks_shown)
        }
    }
}

impl Default for Selection {
    /// Best bid.
    fn default() -> Self {
        Self::new(Side::Bid, 0)
    }
}

/// Status message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct Notice {
    pub message: String,
    pub timestamp: Instant,
}
