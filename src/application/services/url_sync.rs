//! Mirror of navigation state as a query string

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::application::state::{to_query_string, LibraryParams, SessionSnapshot};
use crate::domain::value_objects::{EntityKind, Section};

/// Publishes the session snapshot whenever a mirrored value changes
#[derive(Clone)]
pub struct UrlSync {
    sender: Arc<watch::Sender<SessionSnapshot>>,
}

impl UrlSync {
    pub fn new(initial: SessionSnapshot) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    pub fn query_string(&self) -> String {
        to_query_string(&self.sender.borrow())
    }

    pub fn set_section(&self, section: Section) {
        self.publish(|snapshot| {
            if snapshot.section == section {
                return false;
            }
            snapshot.section = section;
            true
        });
    }

    pub fn set_library(&self, kind: EntityKind, params: LibraryParams) {
        self.publish(|snapshot| {
            let slot = match kind {
                EntityKind::Character => &mut snapshot.characters,
                EntityKind::MagicItem => &mut snapshot.items,
                EntityKind::Spell => &mut snapshot.spells,
                EntityKind::Creature => &mut snapshot.creatures,
            };
            if *slot == params {
                return false;
            }
            *slot = params;
            true
        });
    }

    fn publish(&self, modify: impl FnOnce(&mut SessionSnapshot) -> bool) {
        let changed = self.sender.send_if_modified(modify);
        if changed {
            debug!(query = %self.query_string(), "URL updated");
        }
    }
}
