use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::warn;

use samodelkin_shared::stats::SiteCounters;

use crate::storage::SimulationStore;

pub const KEY_ONLINE_ACTIVE: &str = "admin_simulation_online_active";
pub const KEY_TOTAL_ACTIVE: &str = "admin_simulation_total_active";
pub const KEY_TOTAL_FAKE: &str = "admin_simulation_total_fake";
pub const KEY_HISTORY: &str = "admin_simulation_history";

const ONLINE_FAKE_MIN: i64 = 100;
const ONLINE_FAKE_MAX: i64 = 200;
const TOTAL_FAKE_MIN: i64 = 0;
const TOTAL_FAKE_MAX: i64 = 1000;
const TOTAL_FAKE_DEFAULT: i64 = 207;
const HISTORY_CAP: usize = 50;
const ONLINE_TICK: Duration = Duration::from_secs(5);

/// One audit-log entry describing a state-changing admin action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub action: String,
    /// Field name -> {old, new} mapping, or a descriptive value.
    pub changes: serde_json::Value,
    pub admin: String,
}

/// Defensive copy of the full simulation state.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub online_fake: i64,
    pub online_active: bool,
    pub total_fake: i64,
    pub total_active: bool,
    pub history: Vec<HistoryRecord>,
}

/// Display-ready combination of real counts with the fake offsets. The fake
/// components are reported as 0 while their simulation is inactive.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedStats {
    pub online_shown: i64,
    pub online_fake: i64,
    pub online_active: bool,
    pub total_shown: i64,
    pub total_fake: i64,
    pub total_active: bool,
    pub history: Vec<HistoryRecord>,
}

struct SimState {
    online_fake: i64,
    online_active: bool,
    total_fake: i64,
    total_active: bool,
    history: VecDeque<HistoryRecord>,
    generator: Option<JoinHandle<()>>,
}

impl SimState {
    fn record(&mut self, action: &str, changes: serde_json::Value, admin: &str) {
        self.history.push_front(HistoryRecord {
            timestamp: Utc::now().to_rfc3339(),
            action: action.to_string(),
            changes,
            admin: admin.to_string(),
        });
        self.history.truncate(HISTORY_CAP);
    }

    fn persist(&self, store: &dyn SimulationStore) {
        store.save(KEY_ONLINE_ACTIVE, bool_str(self.online_active));
        store.save(KEY_TOTAL_ACTIVE, bool_str(self.total_active));
        store.save(KEY_TOTAL_FAKE, &self.total_fake.to_string());
        match serde_json::to_string(&self.history) {
            Ok(raw) => store.save(KEY_HISTORY, &raw),
            Err(e) => warn!("Failed to serialize simulation history: {}", e),
        }
    }
}

fn bool_str(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

fn random_online_fake() -> i64 {
    rand::random_range(ONLINE_FAKE_MIN..=ONLINE_FAKE_MAX)
}

/// Owner of the two fake-counter subsystems.
///
/// All mutation goes through these methods and is written through to the
/// injected store immediately; storage failures never reach the caller. The
/// online generator is a tokio interval task owned exclusively by this
/// service and cancelled through its `JoinHandle` by `stop`/`reset`/
/// `destroy`.
pub struct SimulationService {
    store: Arc<dyn SimulationStore>,
    inner: Arc<Mutex<SimState>>,
    tick: Duration,
}

impl SimulationService {
    pub fn new(store: Arc<dyn SimulationStore>) -> Self {
        Self::with_tick_period(store, ONLINE_TICK)
    }

    /// Must be called from within a tokio runtime: a persisted active flag
    /// schedules the generator task right away.
    pub fn with_tick_period(store: Arc<dyn SimulationStore>, tick: Duration) -> Self {
        let online_active = matches!(store.load(KEY_ONLINE_ACTIVE).as_deref(), Some("true"));
        let total_active = matches!(store.load(KEY_TOTAL_ACTIVE).as_deref(), Some("true"));

        let total_fake = store
            .load(KEY_TOTAL_FAKE)
            .and_then(|raw| match raw.trim().parse::<i64>() {
                Ok(v) => Some(v.clamp(TOTAL_FAKE_MIN, TOTAL_FAKE_MAX)),
                Err(e) => {
                    warn!("Stored total offset {:?} is not a number ({}), using default", raw, e);
                    None
                }
            })
            .unwrap_or(TOTAL_FAKE_DEFAULT);

        let mut history = store
            .load(KEY_HISTORY)
            .and_then(|raw| match serde_json::from_str::<VecDeque<HistoryRecord>>(&raw) {
                Ok(h) => Some(h),
                Err(e) => {
                    warn!("Stored simulation history is corrupt ({}), discarding", e);
                    None
                }
            })
            .unwrap_or_default();
        history.truncate(HISTORY_CAP);

        let service = Self {
            store,
            inner: Arc::new(Mutex::new(SimState {
                // The fake online count is never persisted; every process
                // start regenerates it, active or not.
                online_fake: random_online_fake(),
                online_active,
                total_fake,
                total_active,
                history,
                generator: None,
            })),
            tick,
        };

        if online_active {
            // Resume after a restart. Not an admin action, so no history record.
            let task = service.spawn_generator();
            service.inner.lock().unwrap().generator = Some(task);
        }

        service
    }

    fn spawn_generator(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let store = Arc::clone(&self.store);
        let period = self.tick;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            // the first interval fire is immediate; regeneration starts one
            // period after scheduling
            tick.tick().await;
            loop {
                tick.tick().await;
                let mut st = inner.lock().unwrap();
                st.online_fake = random_online_fake();
                st.persist(store.as_ref());
            }
        })
    }

    /// Idempotent: a full no-op while a generator task is already scheduled.
    pub fn start_online_simulation(&self, admin: &str) {
        let mut st = self.inner.lock().unwrap();
        if st.generator.is_some() {
            return;
        }
        let old = st.online_active;
        st.online_active = true;
        st.record(
            "Online simulation started",
            json!({ "online_active": { "old": old, "new": true } }),
            admin,
        );
        let task = self.spawn_generator();
        st.generator = Some(task);
        st.persist(self.store.as_ref());
    }

    pub fn stop_online_simulation(&self, admin: &str) {
        let mut st = self.inner.lock().unwrap();
        if let Some(task) = st.generator.take() {
            task.abort();
        }
        let old = st.online_active;
        st.online_active = false;
        st.record(
            "Online simulation stopped",
            json!({ "online_active": { "old": old, "new": false } }),
            admin,
        );
        st.persist(self.store.as_ref());
    }

    /// Returns the new flag value.
    pub fn toggle_online_simulation(&self, admin: &str) -> bool {
        let active = self.inner.lock().unwrap().online_active;
        if active {
            self.stop_online_simulation(admin);
            false
        } else {
            self.start_online_simulation(admin);
            true
        }
    }

    pub fn increment_total_fake(&self, admin: &str) {
        self.adjust_total_fake(admin, 1);
    }

    pub fn decrement_total_fake(&self, admin: &str) {
        self.adjust_total_fake(admin, -1);
    }

    fn adjust_total_fake(&self, admin: &str, delta: i64) {
        let mut st = self.inner.lock().unwrap();
        let next = st.total_fake + delta;
        if !(TOTAL_FAKE_MIN..=TOTAL_FAKE_MAX).contains(&next) {
            // saturating: already at the bound
            return;
        }
        let old = st.total_fake;
        st.total_fake = next;
        let action = if delta > 0 {
            "Total offset incremented"
        } else {
            "Total offset decremented"
        };
        st.record(
            action,
            json!({ "total_fake": { "old": old, "new": next } }),
            admin,
        );
        st.persist(self.store.as_ref());
    }

    /// Clamps to [0, 1000]; records history only when the clamped value
    /// actually differs from the current one.
    pub fn set_total_fake(&self, admin: &str, value: i64) {
        let mut st = self.inner.lock().unwrap();
        let clamped = value.clamp(TOTAL_FAKE_MIN, TOTAL_FAKE_MAX);
        if clamped != st.total_fake {
            let old = st.total_fake;
            st.total_fake = clamped;
            st.record(
                "Total offset set",
                json!({ "total_fake": { "old": old, "new": clamped } }),
                admin,
            );
        }
        st.persist(self.store.as_ref());
    }

    /// Returns the new flag value.
    pub fn toggle_total_simulation(&self, admin: &str) -> bool {
        let mut st = self.inner.lock().unwrap();
        let old = st.total_active;
        st.total_active = !old;
        st.record(
            "Total simulation toggled",
            json!({ "total_active": { "old": old, "new": !old } }),
            admin,
        );
        st.persist(self.store.as_ref());
        !old
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let st = self.inner.lock().unwrap();
        SimulationSnapshot {
            online_fake: st.online_fake,
            online_active: st.online_active,
            total_fake: st.total_fake,
            total_active: st.total_active,
            history: st.history.iter().cloned().collect(),
        }
    }

    /// Pure combination of externally supplied real counts with the fake
    /// offsets. Inactive subsystems contribute nothing and report 0.
    pub fn combined_stats(&self, real: &SiteCounters) -> CombinedStats {
        let st = self.inner.lock().unwrap();
        let online_fake = if st.online_active { st.online_fake } else { 0 };
        let total_fake = if st.total_active { st.total_fake } else { 0 };
        CombinedStats {
            online_shown: real.online_real + online_fake,
            online_fake,
            online_active: st.online_active,
            total_shown: real.total_real + total_fake,
            total_fake,
            total_active: st.total_active,
            history: st.history.iter().cloned().collect(),
        }
    }

    /// Cancels the generator, restores full defaults and leaves the history
    /// with a single record describing the reset.
    pub fn reset(&self, admin: &str) {
        let mut st = self.inner.lock().unwrap();
        if let Some(task) = st.generator.take() {
            task.abort();
        }
        st.online_fake = random_online_fake();
        st.online_active = false;
        st.total_fake = TOTAL_FAKE_DEFAULT;
        st.total_active = false;
        st.history.clear();
        st.record(
            "Simulation reset",
            json!("all values restored to defaults"),
            admin,
        );
        st.persist(self.store.as_ref());
    }

    /// Cancels any running generator without touching persisted state.
    pub fn destroy(&self) {
        // also runs from Drop, so a poisoned lock must not double-panic
        let Ok(mut st) = self.inner.lock() else {
            return;
        };
        if let Some(task) = st.generator.take() {
            task.abort();
        }
    }

    pub fn online_generator_running(&self) -> bool {
        self.inner.lock().unwrap().generator.is_some()
    }
}

impl Drop for SimulationService {
    fn drop(&mut self) {
        self.destroy();
    }
}
