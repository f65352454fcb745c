/*!
 * Tests for error types and conversions
 */

use bibliotrack::errors::{
    AcquisitionError, AcquisitionFailure, AppError, InventoryError, ReportError,
};

#[test]
fn test_inventoryError_validation_shouldDisplayCorrectly() {
    let error = InventoryError::Validation("Barcode cannot be empty".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Validation error"));
    assert!(display.contains("Barcode cannot be empty"));
}

#[test]
fn test_inventoryError_fromAnyhow_shouldKeepContextChain() {
    let error = anyhow::anyhow!("disk full").context("Failed to write storage file");
    let converted: InventoryError = error.into();

    match converted {
        InventoryError::Persistence(msg) => {
            assert!(msg.contains("Failed to write storage file"));
            assert!(msg.contains("disk full"));
        }
        other => panic!("Expected persistence error, got {:?}", other),
    }
}

#[test]
fn test_acquisitionError_exhausted_shouldListEveryAttempt() {
    let error = AcquisitionError::Exhausted {
        attempts: vec![
            AcquisitionFailure::new("rear camera", "not found"),
            AcquisitionFailure::new("any camera", "permission denied"),
        ],
    };
    let display = format!("{}", error);
    assert!(display.contains("rear camera: not found"));
    assert!(display.contains("any camera: permission denied"));
}

#[test]
fn test_reportError_apiError_shouldDisplayStatusAndMessage() {
    let error = ReportError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_appError_fromInventoryError_shouldWrapCorrectly() {
    let error: AppError = InventoryError::Persistence("locked".to_string()).into();
    assert!(matches!(error, AppError::Inventory(InventoryError::Persistence(_))));
    assert!(error.to_string().contains("locked"));
}

#[test]
fn test_appError_ambiguousSession_shouldMentionPrefix() {
    let error = AppError::AmbiguousSession {
        prefix: "3f".to_string(),
        matches: 2,
    };
    assert_eq!(
        error.to_string(),
        "Session id prefix '3f' is ambiguous (2 sessions match)"
    );
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
}
