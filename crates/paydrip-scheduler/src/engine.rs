//! Dispatch engine — the recurring tick loop and one batch cycle.
//!
//! One cooperative task owns everything: the live window, the tick timer,
//! and the sequential dispatch loop. The cycle is awaited before the next
//! tick fires, so cycles never overlap.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use paydrip_core::PaydripError;

use crate::dispatch::Dispatcher;
use crate::store::RecordStore;
use crate::window::{DailyWindow, REFERENCE_ZONE};

/// Fixed cadence of the recurring tick.
const TICK_INTERVAL: Duration = Duration::from_secs(60);
/// Slept after every dispatch attempt to throttle the endpoint.
const RECORD_SPACING: Duration = Duration::from_secs(1);
/// Scheduled cycles start after a uniform 0..=59s delay.
const MAX_JITTER_SECS: u64 = 60;

/// The live window plus the reference-zone day it was drawn for.
///
/// Single writer: only the tick loop touches this, once per rollover.
#[derive(Debug)]
pub struct SchedulerState {
    window: DailyWindow,
    day: NaiveDate,
}

impl SchedulerState {
    pub fn new(now: DateTime<Utc>) -> Self {
        let day = now.with_timezone(&REFERENCE_ZONE).date_naive();
        let window = DailyWindow::generate(day);
        info!("🌙 Daily window for {day}: {window}");
        Self { window, day }
    }

    /// Replace the window when the reference-zone day has changed.
    /// Calling this again on the same day keeps the existing window.
    pub fn roll(&mut self, now: DateTime<Utc>) {
        let today = now.with_timezone(&REFERENCE_ZONE).date_naive();
        if today != self.day {
            self.window = DailyWindow::generate(today);
            self.day = today;
            info!("🌙 Daily window for {today}: {}", self.window);
        }
    }

    pub fn window(&self) -> &DailyWindow {
        &self.window
    }
}

/// Drives fetch → filter → dispatch on a fixed tick, gated by quiet hours.
pub struct DispatchEngine {
    store: Arc<dyn RecordStore>,
    dispatcher: Arc<dyn Dispatcher>,
    state: SchedulerState,
    spacing: Duration,
}

impl DispatchEngine {
    pub fn new(store: Arc<dyn RecordStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            store,
            dispatcher,
            state: SchedulerState::new(Utc::now()),
            spacing: RECORD_SPACING,
        }
    }

    /// Run forever. The interval's immediate first tick is the startup run
    /// and skips the jitter; every later tick sleeps a random 0..=59s
    /// before its cycle. Quiet-hours ticks are skipped outright.
    pub async fn run(mut self) {
        info!("⏰ Dispatch engine started (tick every {}s)", TICK_INTERVAL.as_secs());
        let mut ticker = time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut startup = true;

        loop {
            ticker.tick().await;
            let now = Utc::now();
            self.state.roll(now);

            if !self.state.window().is_active(now) {
                info!("🔕 Quiet hours ({}), skipping tick", self.state.window());
                startup = false;
                continue;
            }

            if !startup {
                let jitter = rand::thread_rng().gen_range(0..MAX_JITTER_SECS);
                debug!(jitter_secs = jitter, "Delaying cycle");
                time::sleep(Duration::from_secs(jitter)).await;
            }
            startup = false;

            self.run_cycle().await;
        }
    }

    /// One fetch-filter-dispatch cycle. Never propagates an error: a failed
    /// fetch aborts the cycle, a failed dispatch only affects its record.
    pub async fn run_cycle(&self) {
        info!("Checking for paid payments...");
        let records = match self.store.fetch_paid().await {
            Ok(records) => records,
            Err(e) => {
                error!("Fetch failed, aborting cycle: {e}");
                return;
            }
        };
        info!("Found {} paid payment(s) to process", records.len());

        for record in &records {
            let now = Utc::now();
            if !record.is_dispatchable(now) {
                debug!(
                    id = %record.id,
                    next = ?record.next_submit_date,
                    "Skipping deferred payment"
                );
                continue;
            }

            info!(id = %record.id, "Processing payment");
            match self.dispatcher.submit(&record.id).await {
                Ok(payload) => info!(id = %record.id, "✅ Payment processed: {payload}"),
                Err(err) => {
                    warn!(id = %record.id, "⚠️ Payment dispatch failed: {err}");
                    if let PaydripError::Dispatch { body: Some(body), .. } = &err {
                        warn!(id = %record.id, "Response body: {body}");
                    }
                }
            }

            time::sleep(self.spacing).await;
        }
    }
}
