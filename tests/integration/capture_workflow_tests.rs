/*!
 * Integration tests for scanning, device acquisition and reports
 */

use anyhow::{bail, Result};
use async_trait::async_trait;
use bibliotrack::capture::{start_camera, CameraConstraints, FacingMode, MediaSource, Scanner, SilentFeedback};
use bibliotrack::errors::AcquisitionError;
use bibliotrack::inventory::{Coleccion, Sede};
use bibliotrack::report::{self, ReportService};
use std::io::Cursor;
use std::sync::Arc;

use crate::common;

/// Device with only a front camera
struct FrontOnlyDevice;

#[async_trait]
impl MediaSource for FrontOnlyDevice {
    type Stream = String;

    async fn open(&self, constraints: CameraConstraints) -> Result<String> {
        match constraints.facing {
            FacingMode::Environment => bail!("requested device not found"),
            FacingMode::Any => Ok("front".to_string()),
        }
    }
}

/// Device that refuses all access
struct DeniedDevice;

#[async_trait]
impl MediaSource for DeniedDevice {
    type Stream = String;

    async fn open(&self, _constraints: CameraConstraints) -> Result<String> {
        bail!("permission denied")
    }
}

#[test]
fn test_scanner_withKeyboardWedgeInput_shouldPersistEveryCode() {
    let (manager, clock, _) = common::create_test_manager();
    let session = manager.create_session("Shelf 1", Sede::Medellin, Coleccion::Libros).unwrap();
    clock.advance(100);

    let outcome = Scanner::new(&manager, SilentFeedback)
        .run(&session, Cursor::new("A1\r\nA2\r\nA1\r\n"))
        .unwrap();

    let stored = manager.store().get_session(&session.id).unwrap();
    assert_eq!(outcome.recorded, 3);
    assert_eq!(stored, outcome.session);
    assert_eq!(stored.items.iter().map(|i| i.barcode.as_str()).collect::<Vec<_>>(), vec!["A1", "A2", "A1"]);
}

#[tokio::test]
async fn test_startCamera_withFrontOnlyDevice_shouldFallBack() {
    let stream = start_camera(Arc::new(FrontOnlyDevice), false).await.unwrap();
    assert_eq!(stream, "front");
}

#[tokio::test]
async fn test_startCamera_withDeniedDevice_shouldReportBothStrategies() {
    let err = start_camera(Arc::new(DeniedDevice), true).await.unwrap_err();

    match &err {
        AcquisitionError::Exhausted { attempts } => {
            assert_eq!(attempts.len(), 2);
            assert!(attempts.iter().all(|a| a.reason.contains("permission denied")));
        }
        other => panic!("Expected Exhausted, got {:?}", other),
    }
    assert!(err.to_string().contains("rear camera"));
}

#[tokio::test]
async fn test_report_withoutApiKey_shouldExplainMissingKey() {
    let (manager, _, _) = common::create_test_manager();
    let session = manager.create_session("Shelf", Sede::Oriente, Coleccion::Cds).unwrap();

    let service = ReportService::from_config(&bibliotrack::app_config::ReportConfig::default());

    assert!(!service.is_configured());
    assert_eq!(service.generate(&session).await, report::MISSING_KEY_MESSAGE);
}

#[test]
fn test_report_withBlankApiKey_shouldCountAsMissing() {
    let (manager, _, _) = common::create_test_manager();
    let session = manager.create_session("Shelf", Sede::Uraba, Coleccion::Normas).unwrap();
    let mut config = bibliotrack::app_config::ReportConfig::default();
    config.api_key = Some("   ".to_string());

    let service = ReportService::from_config(&config);

    assert!(!service.is_configured());
    let text = tokio_test::block_on(service.generate(&session));
    assert_eq!(text, report::MISSING_KEY_MESSAGE);
}
