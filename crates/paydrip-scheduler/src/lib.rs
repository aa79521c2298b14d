//! # Paydrip Scheduler
//!
//! Quiet-hours gating and the sequential payment resubmission engine.
//!
//! ## Architecture
//! ```text
//! DispatchEngine (tokio interval, 60s)
//!   ├── day rollover → DailyWindow::generate (randomized stop/resume)
//!   ├── DailyWindow::is_active → skip tick during quiet hours
//!   └── jitter 0..=59s → run_cycle
//!         ├── RecordStore::fetch_paid (created-ascending)
//!         ├── PaymentRecord::is_dispatchable (distancing backoff)
//!         └── Dispatcher::submit, one record per second
//! ```
//!
//! Dispatch is intentionally sequential — one record at a time with fixed
//! spacing — to bound load on the downstream endpoint.

pub mod dispatch;
pub mod engine;
pub mod records;
pub mod store;
pub mod window;

pub use dispatch::{Dispatcher, HttpDispatcher};
pub use engine::{DispatchEngine, SchedulerState};
pub use records::{PaymentRecord, PaymentStatus};
pub use store::{PocketBaseStore, RecordStore};
pub use window::{DailyWindow, REFERENCE_ZONE};
