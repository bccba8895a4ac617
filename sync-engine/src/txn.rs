//! Transaction correlation between issued requests and server echoes.
//!
//! Every resend mints a transaction id; the server acknowledges by echoing
//! the most recent id it saw in a response. An echo therefore implies that
//! every earlier outstanding transaction was superseded without being
//! applied as a distinct request, and each of those must fail with its own
//! id so callers can observe the fate of their specific action.

use std::collections::VecDeque;

use thiserror::Error;
use tokio::sync::oneshot;

/// Why a transaction did not resolve with an acknowledgement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TxnError {
    /// A later transaction was acknowledged first; this one was folded into
    /// another round trip and never individually applied.
    #[error("transaction {txn_id} superseded before acknowledgement")]
    Superseded {
        /// The superseded transaction's own id.
        txn_id: String,
    },

    /// The engine stopped before the transaction was acknowledged.
    #[error("engine stopped before acknowledgement")]
    EngineStopped,
}

type TxnResult = Result<String, TxnError>;

/// Single-fire completion handle for one transaction.
///
/// Resolves with the transaction's id once a response acknowledges it, or
/// with a [`TxnError`] when it is superseded or the engine stops.
#[derive(Debug)]
pub struct TxnHandle {
    rx: oneshot::Receiver<TxnResult>,
}

impl TxnHandle {
    /// Wait for the transaction's outcome.
    pub async fn wait(self) -> TxnResult {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(TxnError::EngineStopped),
        }
    }

    /// Non-blocking probe: `None` while the outcome is still pending.
    pub fn try_wait(&mut self) -> Option<TxnResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(TxnError::EngineStopped)),
        }
    }
}

/// Ordered collection of outstanding transactions, oldest first.
#[derive(Debug, Default)]
pub struct TransactionLedger {
    entries: VecDeque<LedgerEntry>,
}

#[derive(Debug)]
struct LedgerEntry {
    txn_id: String,
    completion: oneshot::Sender<TxnResult>,
}

impl TransactionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outstanding transaction and return its completion handle.
    ///
    /// Ids are minted by the transport and unique; insertion order is issue
    /// order.
    pub fn issue(&mut self, txn_id: String) -> TxnHandle {
        let (tx, rx) = oneshot::channel();
        self.entries.push_back(LedgerEntry {
            txn_id,
            completion: tx,
        });
        TxnHandle { rx }
    }

    /// Process a server echo of `txn_id`.
    ///
    /// Rejects every strictly-earlier entry with its own id, resolves the
    /// matching entry, and removes all entries up to and including the
    /// match. Later entries stay pending. Unknown ids are ignored.
    pub fn acknowledge(&mut self, txn_id: &str) {
        let Some(position) = self.entries.iter().position(|e| e.txn_id == txn_id) else {
            tracing::debug!("acknowledgement for unknown txn {}, ignoring", txn_id);
            return;
        };

        for entry in self.entries.drain(..=position) {
            let outcome = if entry.txn_id == txn_id {
                Ok(entry.txn_id)
            } else {
                Err(TxnError::Superseded {
                    txn_id: entry.txn_id,
                })
            };
            let _ = entry.completion.send(outcome);
        }
    }

    /// Drop every outstanding entry; waiting handles observe
    /// [`TxnError::EngineStopped`].
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of outstanding transactions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transactions are outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
