use autonomo_core::{AppError, AppResult};
use chrono::NaiveDate;

use crate::audit::AuditLogEntry;
use crate::labels::{format_action, format_date, format_resource_type};

/// Column header of the audit log export.
pub const AUDIT_CSV_HEADER: &str = "Data,Ação,Tipo de Recurso,Usuário,Descrição,IP,ID do Recurso";

/// Message reported when there is nothing to export.
pub const EMPTY_EXPORT_MESSAGE: &str = "Não há logs para exportar";

/// Rendered CSV document ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name, `audit_logs_<date>.csv`.
    pub filename: String,
    /// Document body.
    pub content: String,
    /// Data rows, header excluded.
    pub row_count: usize,
}

/// Renders the loaded audit rows as CSV.
///
/// Only the description is quoted; embedded quotes are doubled.
pub fn audit_logs_csv(logs: &[AuditLogEntry], exported_on: NaiveDate) -> AppResult<CsvExport> {
    if logs.is_empty() {
        return Err(AppError::Validation(EMPTY_EXPORT_MESSAGE.to_owned()));
    }

    let mut lines = Vec::with_capacity(logs.len() + 1);
    lines.push(AUDIT_CSV_HEADER.to_owned());
    lines.extend(logs.iter().map(csv_row));

    Ok(CsvExport {
        filename: format!("audit_logs_{}.csv", exported_on.format("%Y-%m-%d")),
        content: lines.join("\n"),
        row_count: logs.len(),
    })
}

fn csv_row(log: &AuditLogEntry) -> String {
    [
        format_date(&log.timestamp),
        format_action(&log.action).to_owned(),
        format_resource_type(&log.resource_type).to_owned(),
        log.performed_by.clone(),
        format!("\"{}\"", log.description.replace('"', "\"\"")),
        log.ip_address.clone().unwrap_or_default(),
        log.resource_id.clone().unwrap_or_default(),
    ]
    .join(",")
}
