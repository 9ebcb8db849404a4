//! Non-fatal notifications raised while writing to the registry.
//!
//! Advisories never block a write. Each one is logged through `tracing`
//! and fanned out to any live subscribers.

use crate::mismatch::MismatchRecord;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

/// Advisories buffered per subscriber before new ones are dropped for it.
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A parameter was rewritten with a materially different value.
    Mismatch(MismatchRecord),
    /// A formula id was registered twice; the later record won.
    FormulaReplaced { id: String },
    /// A section id was registered twice; the later record won.
    SectionReplaced { id: String },
}

#[derive(Debug, Default)]
pub struct AdvisoryBus {
    subscribers: Vec<SyncSender<Advisory>>,
}

impl AdvisoryBus {
    /// Attach a subscriber with a queue of [`SUBSCRIBER_QUEUE_CAPACITY`].
    pub fn subscribe(&mut self) -> Receiver<Advisory> {
        let (tx, rx) = mpsc::sync_channel(SUBSCRIBER_QUEUE_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    /// Log `advisory` and deliver it to every live subscriber.
    ///
    /// Never blocks. A subscriber whose queue is full misses this advisory;
    /// one whose receiver was dropped is pruned.
    pub fn raise(&mut self, advisory: Advisory) {
        match &advisory {
            Advisory::Mismatch(record) => tracing::warn!(
                path = %record.path,
                previous_source = %record.previous_source,
                new_source = %record.new_source,
                previous_value = %record.previous_value,
                new_value = %record.new_value,
                "parameter value mismatch"
            ),
            Advisory::FormulaReplaced { id } => {
                tracing::warn!(formula_id = %id, "formula already registered; replacing")
            }
            Advisory::SectionReplaced { id } => {
                tracing::warn!(section_id = %id, "section already registered; replacing")
            }
        }

        self.subscribers
            .retain(|tx| match tx.try_send(advisory.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!("advisory subscriber queue full; dropping advisory");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
