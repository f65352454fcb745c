/*!
 * Camera acquisition strategies.
 *
 * The rear ("environment") camera is preferred because it is the one pointed
 * at a book spine; any camera is the fallback. Device access is abstracted
 * behind `MediaSource` so the strategies can run against a real backend or
 * a test double.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::errors::AcquisitionError;

use super::acquisition::{acquire_first, AcquisitionStrategy};

/// Which way the requested camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera
    Environment,
    /// Whatever the device offers
    Any,
}

/// Constraints passed to a media source when opening a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Requested facing mode
    pub facing: FacingMode,
    /// Ask for the flashlight, if the device has one
    pub torch: bool,
}

impl CameraConstraints {
    /// Constraints for the given facing mode
    pub fn facing(facing: FacingMode, torch: bool) -> Self {
        Self { facing, torch }
    }
}

/// A provider of camera streams
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Handle to an open stream
    type Stream: Send + 'static;

    /// Whether device access is allowed in the current context
    fn is_secure_context(&self) -> bool {
        true
    }

    /// Open a camera matching `constraints`
    async fn open(&self, constraints: CameraConstraints) -> Result<Self::Stream>;
}

/// Opens the rear camera
pub struct RearCamera<S: MediaSource> {
    source: Arc<S>,
    torch: bool,
}

impl<S: MediaSource> RearCamera<S> {
    /// Strategy over `source`; `torch` asks for the flashlight when supported
    pub fn new(source: Arc<S>, torch: bool) -> Self {
        Self { source, torch }
    }
}

#[async_trait]
impl<S: MediaSource> AcquisitionStrategy<S::Stream> for RearCamera<S> {
    fn name(&self) -> &str {
        "rear camera"
    }

    async fn acquire(&self) -> Result<S::Stream> {
        self.source
            .open(CameraConstraints::facing(FacingMode::Environment, self.torch))
            .await
    }
}

/// Opens any available camera
pub struct AnyCamera<S: MediaSource> {
    source: Arc<S>,
    torch: bool,
}

impl<S: MediaSource> AnyCamera<S> {
    /// Strategy over `source` with no facing preference
    pub fn new(source: Arc<S>, torch: bool) -> Self {
        Self { source, torch }
    }
}

#[async_trait]
impl<S: MediaSource> AcquisitionStrategy<S::Stream> for AnyCamera<S> {
    fn name(&self) -> &str {
        "any camera"
    }

    async fn acquire(&self) -> Result<S::Stream> {
        self.source
            .open(CameraConstraints::facing(FacingMode::Any, self.torch))
            .await
    }
}

/// Camera strategies in preference order: rear, then any
pub fn camera_strategies<S: MediaSource + 'static>(
    source: Arc<S>,
    torch: bool,
) -> Vec<Box<dyn AcquisitionStrategy<S::Stream>>> {
    vec![
        Box::new(RearCamera::new(source.clone(), torch)),
        Box::new(AnyCamera::new(source, torch)),
    ]
}

/// Check the context, then open the best available camera
pub async fn start_camera<S: MediaSource + 'static>(
    source: Arc<S>,
    torch: bool,
) -> Result<S::Stream, AcquisitionError> {
    if !source.is_secure_context() {
        return Err(AcquisitionError::SecureContextRequired(
            "camera access needs HTTPS or localhost".to_string(),
        ));
    }

    let stream = acquire_first(&camera_strategies(source, torch)).await?;
    info!("Camera stream opened");
    Ok(stream)
}
