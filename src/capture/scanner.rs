/*!
 * Line-oriented scan loop.
 *
 * Keyboard-wedge scanners type each code followed by Enter, so any `BufRead`
 * (stdin, a file, a test cursor) is a valid input source. Each non-blank
 * line becomes one item in the active session.
 */

use log::{debug, info};
use std::io::BufRead;

use crate::errors::{InventoryError, InventoryResult};
use crate::inventory::{InventoryManager, InventorySession};

use super::feedback::ScanFeedback;
use super::normalize_barcode;

/// Result of a finished scan run
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// Session as persisted after the last recorded scan
    pub session: InventorySession,
    /// Number of barcodes recorded
    pub recorded: usize,
    /// Number of blank lines ignored
    pub ignored: usize,
}

/// Feeds decoded lines into a session
pub struct Scanner<'a, F: ScanFeedback> {
    manager: &'a InventoryManager,
    feedback: F,
}

impl<'a, F: ScanFeedback> Scanner<'a, F> {
    /// Create a scanner writing through `manager`
    pub fn new(manager: &'a InventoryManager, feedback: F) -> Self {
        Self { manager, feedback }
    }

    /// Read `input` to the end, recording every non-blank line
    pub fn run<R: BufRead>(
        &self,
        session: &InventorySession,
        input: R,
    ) -> InventoryResult<ScanOutcome> {
        let mut current = session.clone();
        let mut recorded = 0;
        let mut ignored = 0;

        for line in input.lines() {
            let line = line.map_err(|e| {
                InventoryError::Persistence(format!("Failed to read scanner input: {}", e))
            })?;

            let Some(barcode) = normalize_barcode(&line) else {
                ignored += 1;
                continue;
            };

            current = self.manager.add_item(&current, &barcode)?;
            recorded += 1;
            self.feedback.success(&barcode);
            debug!("Scan #{} recorded: {}", recorded, barcode);
        }

        info!(
            "Scan finished for session {}: {} recorded, {} blank lines ignored",
            current.short_id(),
            recorded,
            ignored
        );

        Ok(ScanOutcome {
            session: current,
            recorded,
            ignored,
        })
    }
}
