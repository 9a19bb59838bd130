//! Time playback over the distinct dates of a dataset.
//!
//! The host owns the clock and calls [`AnimationController::advance`] with
//! the elapsed wall time; the controller never spawns threads.

use std::time::Duration;

use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::primitives::{datetime_to_unix_seconds, parse_date};
use crate::core::types::DataPoint;

/// Interval between two active-date steps while playing.
pub const PLAYBACK_TICK: Duration = Duration::from_millis(2000);

const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Paused,
    Playing,
}

/// Repeating tick source that only exists while playback is running.
///
/// Dropping the timer cancels it.
#[derive(Debug)]
pub struct PlaybackTimer {
    interval: Duration,
    pending: Duration,
}

impl PlaybackTimer {
    fn start(interval: Duration) -> Self {
        debug!(interval_ms = interval.as_millis() as u64, "playback timer started");
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    /// Accumulates `elapsed` and returns how many ticks fired.
    ///
    /// Accumulated time saturates at `Duration::MAX`; the remainder below one
    /// interval carries over to the next call.
    fn advance(&mut self, elapsed: Duration) -> u128 {
        if self.interval.is_zero() {
            return 0;
        }
        let pending = self.pending.saturating_add(elapsed).as_nanos();
        let interval = self.interval.as_nanos();
        let rest = pending % interval;
        self.pending = Duration::new(
            (rest / NANOS_PER_SEC) as u64,
            (rest % NANOS_PER_SEC) as u32,
        );
        pending / interval
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next tick.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.pending)
    }
}

impl Drop for PlaybackTimer {
    fn drop(&mut self) {
        debug!("playback timer cancelled");
    }
}

/// Parses every point's `date` with `format`.
///
/// Points without a date, or with an unparseable one, map to `None`.
#[must_use]
pub fn parse_point_dates(points: &[DataPoint], format: &str) -> Vec<Option<NaiveDateTime>> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let raw = point.date.as_deref()?;
            match parse_date(raw, format) {
                Ok(date) => Some(date),
                Err(err) => {
                    warn!(index, raw, error = %err, "skipping unparseable data point date");
                    None
                }
            }
        })
        .collect()
}

/// Play/pause state machine over a sorted set of unique dates.
#[derive(Debug)]
pub struct AnimationController {
    dates: Vec<NaiveDateTime>,
    current_index: usize,
    interval: Duration,
    timer: Option<PlaybackTimer>,
    disposed: bool,
}

impl AnimationController {
    /// Builds the controller from any date sequence.
    ///
    /// With `auto_play` playback starts at the first date; otherwise the
    /// controller is paused on the last date.
    pub fn new<I>(dates: I, auto_play: bool) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut dates: Vec<NaiveDateTime> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();

        let mut controller = Self {
            current_index: if auto_play {
                0
            } else {
                dates.len().saturating_sub(1)
            },
            dates,
            interval: PLAYBACK_TICK,
            timer: None,
            disposed: false,
        };
        if auto_play {
            controller.play();
        }
        controller
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        if self.timer.is_some() {
            self.timer = Some(PlaybackTimer::start(interval));
        }
        self
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_date(&self) -> Option<NaiveDateTime> {
        self.dates.get(self.current_index).copied()
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn timer(&self) -> Option<&PlaybackTimer> {
        self.timer.as_ref()
    }

    /// Starts playback. No-op when already playing, disposed, or empty.
    pub fn play(&mut self) {
        if self.disposed || self.dates.is_empty() || self.timer.is_some() {
            return;
        }
        self.timer = Some(PlaybackTimer::start(self.interval));
    }

    pub fn pause(&mut self) {
        self.timer = None;
    }

    pub fn toggle_play(&mut self) -> PlaybackState {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.state()
    }

    /// Feeds host clock time into the running timer.
    ///
    /// Returns `true` when the active date changed. Each tick advances the
    /// index by one and wraps to the first date after the last, so ticks
    /// that complete whole loops land back on the same date and return
    /// `false`.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.disposed {
            return false;
        }
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        let ticks = timer.advance(elapsed);
        if ticks == 0 || self.dates.is_empty() {
            return false;
        }
        let previous = self.current_index;
        let len = self.dates.len();
        let step = (ticks % len as u128) as usize;
        self.current_index = (self.current_index + step) % len;
        trace!(previous, current = self.current_index, ticks, "playback tick");
        previous != self.current_index
    }

    /// Moves to the known date nearest to `target`; ties pick the earlier date.
    ///
    /// Returns the new index, or `None` when there are no dates.
    pub fn scrub_to(&mut self, target: NaiveDateTime) -> Option<usize> {
        let target = datetime_to_unix_seconds(target);
        let nearest = self
            .dates
            .iter()
            .enumerate()
            .min_by_key(|(index, date)| {
                (
                    OrderedFloat((datetime_to_unix_seconds(**date) - target).abs()),
                    *index,
                )
            })
            .map(|(index, _)| index)?;
        Some(self.scrub_to_index(nearest))
    }

    /// Moves to `index`, clamped to the last date.
    pub fn scrub_to_index(&mut self, index: usize) -> usize {
        self.current_index = index.min(self.dates.len().saturating_sub(1));
        if let Some(timer) = self.timer.as_mut() {
            timer.pending = Duration::ZERO;
        }
        self.current_index
    }

    /// Cancels the timer for good. Later `play`/`advance` calls are no-ops.
    pub fn dispose(&mut self) {
        self.timer = None;
        self.disposed = true;
    }
}
