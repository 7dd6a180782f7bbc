// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Sales,
    CurrentStock,
    AddedStock,
    LowStock,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Sales Report",
            ReportKind::CurrentStock => "Current Stock Report",
            ReportKind::AddedStock => "Added Stock Report",
            ReportKind::LowStock => "Low Stock Report",
        }
    }

    /// Relatórios de "foto" (saldo atual) ignoram o intervalo de datas.
    pub fn is_snapshot(&self) -> bool {
        matches!(self, ReportKind::CurrentStock | ReportKind::LowStock)
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(ReportKind::Sales),
            "current-stock" => Ok(ReportKind::CurrentStock),
            "added-stock" => Ok(ReportKind::AddedStock),
            "low-stock" => Ok(ReportKind::LowStock),
            other => Err(format!("Tipo de relatório inválido: {}", other)),
        }
    }
}

// Uma linha do relatório, pronta para ser renderizada por quem consome.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub date: String, // YYYY-MM-DD, vazio nos relatórios de saldo
    pub product: String,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[schema(value_type = f64)]
    pub total_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_items: i64,
    #[schema(value_type = f64)]
    pub total_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SalesSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportPayload {
    #[schema(example = "sales")]
    pub report_type: String,
    #[schema(example = "2025-03-01T00:00:00Z")]
    pub start_date: String,
    #[schema(example = "2025-03-31T23:59:59Z")]
    pub end_date: String,
}
