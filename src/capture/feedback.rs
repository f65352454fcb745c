/*!
 * Feedback signalled to the operator after each recorded scan.
 */

use log::debug;
use std::io::Write;

/// Signals the outcome of a scan to whoever is holding the scanner
pub trait ScanFeedback {
    /// A barcode was recorded
    fn success(&self, barcode: &str);
}

/// Rings the terminal bell on stderr, like a handheld scanner beep
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl ScanFeedback for TerminalBell {
    fn success(&self, _barcode: &str) {
        let mut stderr = std::io::stderr();
        // Best effort
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            debug!("Bell failed: {}", e);
        }
    }
}

/// No feedback at all
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl ScanFeedback for SilentFeedback {
    fn success(&self, _barcode: &str) {}
}

impl<F: ScanFeedback + ?Sized> ScanFeedback for &F {
    fn success(&self, barcode: &str) {
        (**self).success(barcode)
    }
}

impl<F: ScanFeedback + ?Sized> ScanFeedback for Box<F> {
    fn success(&self, barcode: &str) {
        (**self).success(barcode)
    }
}
