/*!
 * AI-written summary of an inventory session.
 *
 * `ReportService::generate` always returns text that can be shown to the
 * user: failures are logged and replaced by a fixed message.
 */

use log::{error, warn};

use crate::errors::ReportError;
use crate::export::format_local_datetime;
use crate::inventory::InventorySession;

pub mod gemini;

pub use gemini::GeminiClient;

/// Shown when no API key is configured
pub const MISSING_KEY_MESSAGE: &str = "Error: API Key no configurada para el servicio de reporte.";

/// Shown when the service could not be reached or answered with an error
pub const SERVICE_ERROR_MESSAGE: &str =
    "Hubo un error conectando con el servicio de IA para generar el reporte.";

/// Shown when the service answered without text
pub const EMPTY_REPORT_MESSAGE: &str = "No se pudo generar el reporte.";

/// Number of barcodes sampled from each end of the session
const SAMPLE_SIZE: usize = 5;

/// Barcodes of the first and last few items
fn sample_barcodes(session: &InventorySession) -> String {
    let items = &session.items;
    let head = &items[..items.len().min(SAMPLE_SIZE)];
    let tail = &items[items.len().saturating_sub(SAMPLE_SIZE)..];

    head.iter()
        .chain(tail.iter())
        .map(|item| item.barcode.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the prompt sent to the model
pub fn build_report_prompt(session: &InventorySession) -> String {
    let last_scan = session
        .last_scan_at()
        .map(format_local_datetime)
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        r#"Actúa como un bibliotecario experto. Genera un resumen ejecutivo breve y profesional para un reporte de inventario.

Datos de la sesión:
- Nombre del Inventario: {}
- Sede: {}
- Colección: {}
- Total ítems escaneados: {}
- Fecha inicio: {}
- Fecha último escaneo: {}
- Muestra de códigos: {}

El reporte debe confirmar que el inventario se realizó exitosamente y está listo para conciliación.
Menciona que los datos están seguros. Sé conciso (máximo 100 palabras)."#,
        session.name,
        session.sede,
        session.coleccion,
        session.item_count(),
        format_local_datetime(session.created_at),
        last_scan,
        sample_barcodes(session),
    )
}

/// Generates session summaries, falling back to fixed messages on failure
pub struct ReportService {
    client: Option<GeminiClient>,
}

impl ReportService {
    /// Service over an optional client; `None` means no API key
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    /// Build the service from report settings
    pub fn from_config(config: &crate::app_config::ReportConfig) -> Self {
        let client = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| GeminiClient::new(key, &config.endpoint, &config.model, config.timeout_secs));
        Self::new(client)
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Summary text for `session`. Never fails.
    pub async fn generate(&self, session: &InventorySession) -> String {
        let Some(client) = &self.client else {
            warn!("Report requested but no API key is configured");
            return MISSING_KEY_MESSAGE.to_string();
        };

        match client.generate(&build_report_prompt(session)).await {
            Ok(text) => text,
            Err(ReportError::EmptyResponse) => {
                warn!("Report service returned no text for session {}", session.short_id());
                EMPTY_REPORT_MESSAGE.to_string()
            }
            Err(e) => {
                error!("Report generation failed: {}", e);
                SERVICE_ERROR_MESSAGE.to_string()
            }
        }
    }
}
