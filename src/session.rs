use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::Config;
use crate::pipeline::{Visualization, visualize};

/// Handle for one submitted input. Only the most recent ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

struct Published {
    ticket: u64,
    visualization: Arc<Visualization>,
}

/// Last-write-wins holder for the visualization of an editor buffer.
///
/// Recomputations may overlap when callers run them on other threads; a
/// result is only published if no newer input was submitted in the
/// meantime, so a stale graph never replaces a fresher one.
pub struct Session {
    config: Config,
    latest: AtomicU64,
    published: RwLock<Published>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            latest: AtomicU64::new(0),
            published: RwLock::new(Published {
                ticket: 0,
                visualization: Arc::new(Visualization::default()),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn submit(&self) -> Ticket {
        // Taken under the publish lock so a submission can never slip in
        // between the freshness check in `complete` and the publish.
        let _guard = self.lock_published();
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn lock_published(&self) -> std::sync::RwLockWriteGuard<'_, Published> {
        match self.published.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Publishes `visualization` if `ticket` is still the latest submission.
    /// Returns whether it was published.
    pub fn complete(&self, ticket: Ticket, visualization: Visualization) -> bool {
        self.publish(ticket, visualization).is_some()
    }

    fn publish(&self, ticket: Ticket, visualization: Visualization) -> Option<Arc<Visualization>> {
        let mut published = self.lock_published();
        if !self.is_current(ticket) || ticket.0 <= published.ticket {
            log::debug!("dropping stale result for ticket {}", ticket.0);
            return None;
        }
        let visualization = Arc::new(visualization);
        published.ticket = ticket.0;
        published.visualization = Arc::clone(&visualization);
        Some(visualization)
    }

    /// Recomputes from `input` and returns that result once published, or
    /// `None` when a newer input overtook this one.
    pub fn update(&self, input: &str) -> Option<Arc<Visualization>> {
        let ticket = self.submit();
        self.publish(ticket, visualize(input, &self.config))
    }

    pub fn current(&self) -> Arc<Visualization> {
        match self.published.read() {
            Ok(guard) => Arc::clone(&guard.visualization),
            Err(poisoned) => Arc::clone(&poisoned.into_inner().visualization),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
