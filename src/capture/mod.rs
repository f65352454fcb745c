/*!
 * Barcode capture.
 *
 * This module handles:
 * - Cleaning up raw scanner or keyboard input
 * - Feeding decoded lines into a session (`Scanner`)
 * - Audible feedback on a successful scan
 * - Acquiring a capture device through an ordered list of strategies
 */

use once_cell::sync::Lazy;
use regex::Regex;

pub mod acquisition;
pub mod camera;
pub mod feedback;
pub mod scanner;

pub use acquisition::{acquire_first, AcquisitionStrategy};
pub use camera::{camera_strategies, start_camera, AnyCamera, CameraConstraints, FacingMode, MediaSource, RearCamera};
pub use feedback::{ScanFeedback, SilentFeedback, TerminalBell};
pub use scanner::{ScanOutcome, Scanner};

/// Control characters scanners append or embed (CR, LF, TAB, GS, ...)
static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Cc}").unwrap());

/// Strip control characters and surrounding whitespace from a scanned code.
///
/// Returns `None` when nothing usable is left.
pub fn normalize_barcode(raw: &str) -> Option<String> {
    let cleaned = CONTROL_CHARS.replace_all(raw, "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
