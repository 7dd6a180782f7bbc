// src/services/report_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::report::{GenerateReportPayload, Report, ReportKind, ReportRow, SalesSummary},
};

fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidInput(format!("Formato inválido para {} (use RFC 3339).", field)))
}

/// Intervalo fechado [start, end]; `end` anterior a `start` é erro de entrada.
pub fn parse_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = parse_instant("startDate", start)?;
    let end = parse_instant("endDate", end)?;
    if end < start {
        return Err(AppError::InvalidInput("endDate não pode ser anterior a startDate.".into()));
    }
    Ok((start, end))
}

pub fn summarize(rows: &[ReportRow]) -> SalesSummary {
    SalesSummary {
        total_items: rows.iter().map(|r| i64::from(r.quantity)).sum(),
        total_value: rows.iter().map(|r| r.total_value).sum::<Decimal>(),
    }
}

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    low_stock_threshold: i32,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository, low_stock_threshold: i32) -> Self {
        Self { report_repo, low_stock_threshold }
    }

    /// Monta as linhas do relatório. A renderização (PDF, planilha) fica com o cliente.
    pub async fn generate(&self, business_id: Uuid, payload: &GenerateReportPayload) -> Result<Report, AppError> {
        let kind: ReportKind = payload.report_type.parse().map_err(AppError::InvalidInput)?;
        let (start, end) = parse_range(&payload.start_date, &payload.end_date)?;

        let rows = match kind {
            ReportKind::Sales => self.report_repo.sales_rows(business_id, start, end).await?,
            ReportKind::AddedStock => self.report_repo.added_stock_rows(business_id, start, end).await?,
            ReportKind::CurrentStock => self.report_repo.stock_rows(business_id, None).await?,
            ReportKind::LowStock => {
                self.report_repo
                    .stock_rows(business_id, Some(self.low_stock_threshold))
                    .await?
            }
        };

        let summary = (kind == ReportKind::Sales).then(|| summarize(&rows));

        tracing::info!("📊 Relatório '{}' gerado com {} linha(s)", kind.title(), rows.len());

        Ok(Report {
            kind,
            title: kind.title().to_string(),
            start_date: start,
            end_date: end,
            rows,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_must_be_rfc3339_and_ordered() {
        assert!(parse_range("2025-03-01T00:00:00Z", "2025-03-31T23:59:59Z").is_ok());
        assert!(parse_range("2025-03-01", "2025-03-31T23:59:59Z").is_err());
        assert!(matches!(
            parse_range("2025-03-31T00:00:00Z", "2025-03-01T00:00:00Z"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let (start, _) = parse_range("2025-03-01T03:00:00+03:00", "2025-03-02T00:00:00Z").unwrap();
        assert_eq!(start.to_rfc3339(), "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn sales_summary_adds_items_and_value() {
        let row = |quantity, total: i64| ReportRow {
            date: "2025-03-01".into(),
            product: "Chips".into(),
            quantity,
            price: Decimal::new(200, 2),
            total_value: Decimal::new(total, 2),
        };
        let summary = summarize(&[row(10, 2000), row(5, 1000)]);
        assert_eq!(summary.total_items, 15);
        assert_eq!(summary.total_value, Decimal::new(3000, 2));
    }
}
