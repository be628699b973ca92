//! # Edit Session State Machine
//!
//! [`EditSession`] wraps a [`PendingLedger`] with the commit protocol. It is driven by
//! discrete [`EditEvent`]s and has no I/O of its own: when a commit should start it hands
//! back an [`Effect::Submit`] and waits for `CommitSucceeded` / `CommitFailed`.
//!
//! ```text
//!            set_value                commit_requested
//!   Clean ─────────────▶ Dirty ──────────────────────▶ Committing
//!     ▲                  │  ▲                              │
//!     └──── revert ──────┘  └──────── failed ─────────────┤
//!     ▲                                                    │
//!     └──────────────────────── succeeded ─────────────────┘
//! ```
//!
//! Only one batch may be outstanding. Edits keep flowing while `Committing`.

use crate::ledger::PendingLedger;
use crate::resource::Change;
use serde::Serialize;
use std::collections::BTreeMap;

/// Where the session is in the commit protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Clean,
    Dirty,
    Committing,
}

/// Discrete inputs to the state machine.
#[derive(Debug, Clone)]
pub enum EditEvent<K, V> {
    ValueChanged { id: K, value: V },
    CommitRequested,
    CommitSucceeded { seq: u64 },
    /// `applied` lists ids the backend confirmed before failing.
    CommitFailed { seq: u64, applied: Vec<K> },
    BaselineRefreshed { values: Vec<(K, V)> },
    DiscardRequested,
}

/// A batch handed out for submission, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitTicket<K, V> {
    pub seq: u64,
    pub batch: Vec<Change<K, V>>,
}

/// What the caller has to do after an event was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<K, V> {
    None,
    Submit(CommitTicket<K, V>),
}

/// Events the session refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("A batch commit is already in flight")]
    CommitInFlight,
    #[error("No commit with sequence {0} is in flight")]
    StaleCompletion(u64),
}

/// Read-only copy of a session, published for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerView<K: Ord, V> {
    pub phase: Phase,
    pub baseline: BTreeMap<K, V>,
    pub pending: BTreeMap<K, V>,
    pub displayed: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for LedgerView<K, V> {
    fn default() -> Self {
        Self {
            phase: Phase::Clean,
            baseline: BTreeMap::new(),
            pending: BTreeMap::new(),
            displayed: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> LedgerView<K, V> {
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The commit affordance is offered only with pending edits and no batch in flight.
    pub fn can_commit(&self) -> bool {
        self.phase == Phase::Dirty
    }
}

/// The pending-edit ledger plus the commit protocol.
#[derive(Debug, Clone)]
pub struct EditSession<K: Ord, V> {
    ledger: PendingLedger<K, V>,
    in_flight: Option<CommitTicket<K, V>>,
    next_seq: u64,
}

impl<K: Ord, V> Default for EditSession<K, V> {
    fn default() -> Self {
        Self {
            ledger: PendingLedger::default(),
            in_flight: None,
            next_seq: 1,
        }
    }
}

impl<K, V> EditSession<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    pub fn new(baseline: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            ledger: PendingLedger::new(baseline),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Committing
        } else if self.ledger.has_pending() {
            Phase::Dirty
        } else {
            Phase::Clean
        }
    }

    pub fn ledger(&self) -> &PendingLedger<K, V> {
        &self.ledger
    }

    pub fn in_flight(&self) -> Option<&CommitTicket<K, V>> {
        self.in_flight.as_ref()
    }

    /// Applies one event.
    pub fn handle(&mut self, event: EditEvent<K, V>) -> Result<Effect<K, V>, SessionError> {
        match event {
            EditEvent::ValueChanged { id, value } => {
                self.ledger.set_value(id, value);
                Ok(Effect::None)
            }
            EditEvent::CommitRequested => {
                if self.in_flight.is_some() {
                    return Err(SessionError::CommitInFlight);
                }
                if !self.ledger.has_pending() {
                    return Ok(Effect::None);
                }
                let ticket = CommitTicket {
                    seq: self.next_seq,
                    batch: self.ledger.pending_batch(),
                };
                self.next_seq += 1;
                self.in_flight = Some(ticket.clone());
                Ok(Effect::Submit(ticket))
            }
            EditEvent::CommitSucceeded { seq } => {
                let ticket = self.take_in_flight(seq)?;
                self.ledger.confirm(&ticket.batch);
                Ok(Effect::None)
            }
            EditEvent::CommitFailed { seq, applied } => {
                let ticket = self.take_in_flight(seq)?;
                self.ledger.confirm(
                    ticket
                        .batch
                        .iter()
                        .filter(|change| applied.contains(&change.id)),
                );
                Ok(Effect::None)
            }
            EditEvent::BaselineRefreshed { values } => {
                self.ledger.reseed(values);
                Ok(Effect::None)
            }
            EditEvent::DiscardRequested => {
                self.ledger.discard_all();
                Ok(Effect::None)
            }
        }
    }

    pub fn view(&self) -> LedgerView<K, V> {
        LedgerView {
            phase: self.phase(),
            baseline: self.ledger.baseline().clone(),
            pending: self.ledger.pending().clone(),
            displayed: self.ledger.displayed().clone(),
        }
    }

    fn take_in_flight(&mut self, seq: u64) -> Result<CommitTicket<K, V>, SessionError> {
        match self.in_flight.take() {
            Some(ticket) if ticket.seq == seq => Ok(ticket),
            other => {
                self.in_flight = other;
                Err(SessionError::StaleCompletion(seq))
            }
        }
    }
}
