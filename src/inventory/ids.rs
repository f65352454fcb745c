/*!
 * Identifier and clock collaborators used when sessions and items are created.
 *
 * Both are injected into the store so tests can pin ids and time.
 */

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use uuid::Uuid;

/// Source of collision-resistant unique identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier
    fn new_id(&self) -> String;
}

/// Random 128-bit identifiers (UUID v4)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Base-36 milliseconds followed by nine random base-36 characters.
///
/// Shorter than a UUID and still unlikely to collide on a single device.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeRandomGenerator;

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render a non-negative integer in base 36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

impl IdGenerator for TimeRandomGenerator {
    fn new_id(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let suffix: String = (0..9)
            .map(|_| BASE36_DIGITS[rand::random_range(0..36usize)] as char)
            .collect();
        format!("{}{}", to_base36(millis), suffix)
    }
}

/// Deterministic ids `<prefix>-1`, `<prefix>-2`, ... for tests and demos
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose first id is `<prefix>-1`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

/// Source of the current time in milliseconds since epoch
pub trait Clock: Send + Sync {
    /// Current time
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock reading `start`
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Move the clock forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
