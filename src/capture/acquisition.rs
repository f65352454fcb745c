/*!
 * Ordered acquisition of a capture resource.
 *
 * A resource such as a camera stream can often be obtained in more than one
 * way. Each way is an `AcquisitionStrategy`; `acquire_first` tries them in
 * order and only reports failure once every strategy has failed, carrying
 * the reason each one gave.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::{AcquisitionError, AcquisitionFailure};

/// One way of obtaining a handle of type `H`
#[async_trait]
pub trait AcquisitionStrategy<H>: Send + Sync {
    /// Name used in logs and failure reports
    fn name(&self) -> &str;

    /// Try to obtain the handle
    async fn acquire(&self) -> Result<H>;
}

/// Try each strategy in order and return the first handle obtained
pub async fn acquire_first<H: Send + 'static>(
    strategies: &[Box<dyn AcquisitionStrategy<H>>],
) -> Result<H, AcquisitionError> {
    if strategies.is_empty() {
        return Err(AcquisitionError::NoStrategies);
    }

    let mut attempts = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        match strategy.acquire().await {
            Ok(handle) => {
                debug!(
                    "Acquired resource with '{}' after {} failed attempt(s)",
                    strategy.name(),
                    attempts.len()
                );
                return Ok(handle);
            }
            Err(e) => {
                warn!("Strategy '{}' failed, trying next: {:#}", strategy.name(), e);
                attempts.push(AcquisitionFailure::new(strategy.name(), format!("{:#}", e)));
            }
        }
    }

    Err(AcquisitionError::Exhausted { attempts })
}
