/// Progress update sent by a background worker during refresh or execute.
///
/// Sent over an MPSC channel so the foreground (CLI spinner, log) can
/// follow the batch without sharing state with the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The batch has started
    Started {
        /// Number of items to process
        total: usize,
    },

    /// An item is being processed
    Item {
        /// Display name of the item
        name: String,
        /// 1-based position of the item
        current: usize,
        total: usize,
    },

    /// Every item was processed
    Finished,

    /// The cancel token was raised; remaining items were skipped
    Interrupted,

    /// An unexpected error halted the batch
    Failed {
        /// Error message
        message: String,
    },
}

impl ProgressEvent {
    pub fn started(total: usize) -> Self {
        Self::Started { total }
    }

    pub fn item(name: impl Into<String>, current: usize, total: usize) -> Self {
        Self::Item {
            name: name.into(),
            current,
            total,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Send a progress event, ignoring a disconnected receiver.
///
/// A foreground that stopped listening must not abort the worker.
pub fn send(tx: Option<&std::sync::mpsc::Sender<ProgressEvent>>, event: ProgressEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event);
    }
}
