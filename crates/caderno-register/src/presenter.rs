//! # Report Presenter
//!
//! Formats consolidated reports for the outside world: the caderno plain-text
//! layout, JSON payloads for the web layer, and PDF bytes with download
//! filenames.
//!
//! ## The Caderno Layout
//! ```text
//! Relatório de Vendas - 12/08/2025
//! ----------------------------------------
//! 15 parafuso  total - R$ 2.25
//! 02 porca  total - R$ 0.20
//! ----------------------------------------
//! TOTAL DO DIA: R$ 2.45
//! Número de vendas: 2
//! ```
//!
//! Products render in the order the consolidator first saw them in the day's
//! sale data. Amounts are always two decimal places; all float conversion
//! happens here, at the edge.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use caderno_core::{calendar, DailyReport, MonthlyReport, Money, ProductSummary};

use crate::error::{RegisterError, RegisterResult};
use crate::pdf;

const SEPARATOR_WIDTH: usize = 40;

// =============================================================================
// Plain Text
// =============================================================================

/// Renders a daily report in the caderno layout.
pub fn daily_text(report: &DailyReport) -> String {
    let mut out = String::new();
    let separator = "-".repeat(SEPARATOR_WIDTH);

    out.push_str(&format!(
        "Relatório de Vendas - {}\n",
        report.date.format("%d/%m/%Y")
    ));
    out.push_str(&separator);
    out.push('\n');

    for entry in report.product_summary.iter() {
        out.push_str(&format!(
            "{:02} {}  total - {}\n",
            entry.quantity,
            entry.name,
            Money::from_cents(entry.total_cents)
        ));
    }

    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format!("TOTAL DO DIA: {}\n", report.total()));
    out.push_str(&format!("Número de vendas: {}\n", report.sale_count));

    out
}

// =============================================================================
// JSON Payloads
// =============================================================================

/// `product_summary` serialized as an object keyed by product name, in
/// first-seen order, each value `{quantity, total}` with total in reais.
pub struct SummaryPayload<'a>(pub &'a ProductSummary);

impl Serialize for SummaryPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Totals {
            quantity: i64,
            total: f64,
        }

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0.iter() {
            map.serialize_entry(
                &entry.name,
                &Totals {
                    quantity: entry.quantity,
                    total: Money::from_cents(entry.total_cents).as_reais(),
                },
            )?;
        }
        map.end()
    }
}

/// JSON payload for a daily report query.
#[derive(Serialize)]
pub struct DailyPayload<'a> {
    pub date: String,
    pub total_amount: f64,
    pub sale_count: i64,
    pub total_item_count: i64,
    pub product_summary: SummaryPayload<'a>,
}

/// Builds the daily JSON payload.
pub fn daily_payload(report: &DailyReport) -> DailyPayload<'_> {
    DailyPayload {
        date: report.date.format("%Y-%m-%d").to_string(),
        total_amount: report.total().as_reais(),
        sale_count: report.sale_count,
        total_item_count: report.total_item_count,
        product_summary: SummaryPayload(&report.product_summary),
    }
}

/// One calendar day inside the monthly payload.
#[derive(Serialize)]
pub struct DayEntry<'a> {
    pub day: u32,
    pub date: String,
    pub total: f64,
    pub sale_count: i64,
    pub has_sales: bool,
    pub product_summary: SummaryPayload<'a>,
}

/// JSON payload for a monthly report query.
///
/// `days` always holds exactly the month's calendar length; days without a
/// stored daily report are synthesized as zero-valued entries.
#[derive(Serialize)]
pub struct MonthlyPayload<'a> {
    pub month_name: &'static str,
    pub year: i32,
    pub total_amount: f64,
    pub days_with_sales_count: i64,
    pub days: Vec<DayEntry<'a>>,
}

/// The empty summary that synthesized day entries borrow.
static EMPTY_SUMMARY: std::sync::OnceLock<ProductSummary> = std::sync::OnceLock::new();

/// Builds the monthly JSON payload, synthesizing every calendar day.
pub fn monthly_payload(report: &MonthlyReport) -> RegisterResult<MonthlyPayload<'_>> {
    use chrono::Datelike;

    let month_name = calendar::month_name(report.month)?;
    let dates = calendar::month_dates(report.year, report.month)?;
    let empty = EMPTY_SUMMARY.get_or_init(ProductSummary::new);

    let days = dates
        .into_iter()
        .map(|date| {
            let stored = report.days.iter().find(|d| d.date == date);
            match stored {
                Some(daily) => DayEntry {
                    day: date.day(),
                    date: date.format("%Y-%m-%d").to_string(),
                    total: daily.total().as_reais(),
                    sale_count: daily.sale_count,
                    has_sales: daily.has_sales(),
                    product_summary: SummaryPayload(&daily.product_summary),
                },
                None => DayEntry {
                    day: date.day(),
                    date: date.format("%Y-%m-%d").to_string(),
                    total: 0.0,
                    sale_count: 0,
                    has_sales: false,
                    product_summary: SummaryPayload(empty),
                },
            }
        })
        .collect();

    Ok(MonthlyPayload {
        month_name,
        year: report.year,
        total_amount: report.total().as_reais(),
        days_with_sales_count: report.days_with_sales,
        days,
    })
}

/// Today-and-this-month counters for the register's stats panel.
#[derive(Serialize)]
pub struct QuickStatsPayload {
    pub today_total: f64,
    pub today_sale_count: i64,
    pub month_name: &'static str,
    pub month_total: f64,
    pub month_days_with_sales: i64,
}

/// Builds the quick-stats payload from already-consolidated reports.
pub fn quick_stats(
    today: &DailyReport,
    month: &MonthlyReport,
) -> RegisterResult<QuickStatsPayload> {
    Ok(QuickStatsPayload {
        today_total: today.total().as_reais(),
        today_sale_count: today.sale_count,
        month_name: calendar::month_name(month.month)?,
        month_total: month.total().as_reais(),
        month_days_with_sales: month.days_with_sales,
    })
}

// =============================================================================
// PDF
// =============================================================================

/// Download filename for a daily PDF: `relatorio_diario_DD_MM_YYYY.pdf`.
pub fn daily_pdf_filename(report: &DailyReport) -> String {
    format!("relatorio_diario_{}.pdf", report.date.format("%d_%m_%Y"))
}

/// Download filename for a monthly PDF: `relatorio_mensal_<mês>_YYYY.pdf`.
pub fn monthly_pdf_filename(report: &MonthlyReport) -> RegisterResult<String> {
    let month_name = calendar::month_name(report.month)?.to_lowercase();
    Ok(format!(
        "relatorio_mensal_{}_{}.pdf",
        month_name, report.year
    ))
}

/// Renders a daily report as PDF bytes.
///
/// A day with zero sales yields `NotFound`, never an empty PDF.
pub fn daily_pdf(report: &DailyReport) -> RegisterResult<Vec<u8>> {
    if !report.has_sales() {
        return Err(RegisterError::not_found(
            "Relatório diário",
            report.date.format("%d/%m/%Y").to_string(),
        ));
    }
    pdf::render_daily(report)
}

/// Renders a monthly report as PDF bytes.
///
/// A month with zero consolidated days yields `NotFound`.
pub fn monthly_pdf(report: &MonthlyReport) -> RegisterResult<Vec<u8>> {
    if report.days_with_sales == 0 {
        return Err(RegisterError::not_found(
            "Relatório mensal",
            format!("{:02}/{}", report.month, report.year),
        ));
    }
    pdf::render_monthly(report)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use caderno_core::Money;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_daily() -> DailyReport {
        let mut summary = ProductSummary::new();
        summary.add("parafuso", 15, Money::from_cents(225));
        summary.add("porca", 2, Money::from_cents(20));
        DailyReport {
            date: NaiveDate::from_ymd_opt(2025, 8, 12).unwrap(),
            total_cents: 245,
            total_item_count: 17,
            sale_count: 2,
            product_summary: summary,
            generated_at: Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap(),
        }
    }

    fn sample_monthly(days: Vec<DailyReport>) -> MonthlyReport {
        let total_cents = days.iter().map(|d| d.total_cents).sum();
        MonthlyReport {
            year: 2025,
            month: 8,
            total_cents,
            days_with_sales: days.len() as i64,
            generated_at: Utc.with_ymd_and_hms(2025, 8, 31, 18, 0, 0).unwrap(),
            days,
        }
    }

    #[test]
    fn test_daily_text_layout() {
        let text = daily_text(&sample_daily());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Relatório de Vendas - 12/08/2025");
        assert_eq!(lines[1], "-".repeat(40));
        assert_eq!(lines[2], "15 parafuso  total - R$ 2.25");
        assert_eq!(lines[3], "02 porca  total - R$ 0.20");
        assert_eq!(lines[4], "-".repeat(40));
        assert_eq!(lines[5], "TOTAL DO DIA: R$ 2.45");
        assert_eq!(lines[6], "Número de vendas: 2");
    }

    #[test]
    fn test_daily_payload_json() {
        let json = serde_json::to_value(daily_payload(&sample_daily())).unwrap();

        assert_eq!(json["date"], "2025-08-12");
        assert_eq!(json["total_amount"], 2.45);
        assert_eq!(json["sale_count"], 2);
        assert_eq!(json["total_item_count"], 17);
        assert_eq!(json["product_summary"]["parafuso"]["quantity"], 15);
        assert_eq!(json["product_summary"]["parafuso"]["total"], 2.25);
    }

    #[test]
    fn test_summary_payload_preserves_order() {
        let report = sample_daily();
        let json = serde_json::to_string(&SummaryPayload(&report.product_summary)).unwrap();
        let parafuso = json.find("parafuso").unwrap();
        let porca = json.find("porca").unwrap();
        assert!(parafuso < porca);
    }

    #[test]
    fn test_monthly_payload_synthesizes_all_days() {
        let monthly = sample_monthly(vec![sample_daily()]);
        let payload = monthly_payload(&monthly).unwrap();

        assert_eq!(payload.month_name, "Agosto");
        assert_eq!(payload.days.len(), 31);
        assert_eq!(payload.days_with_sales_count, 1);

        let day12 = &payload.days[11];
        assert_eq!(day12.day, 12);
        assert!(day12.has_sales);
        assert_eq!(day12.total, 2.45);

        let day13 = &payload.days[12];
        assert!(!day13.has_sales);
        assert_eq!(day13.total, 0.0);
        assert_eq!(day13.sale_count, 0);
    }

    #[test]
    fn test_monthly_payload_leap_february() {
        let report = MonthlyReport {
            year: 2024,
            month: 2,
            total_cents: 0,
            days_with_sales: 0,
            generated_at: Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap(),
            days: vec![],
        };
        let payload = monthly_payload(&report).unwrap();
        assert_eq!(payload.days.len(), 29);
        assert_eq!(payload.month_name, "Fevereiro");
    }

    #[test]
    fn test_pdf_filenames() {
        let daily = sample_daily();
        assert_eq!(daily_pdf_filename(&daily), "relatorio_diario_12_08_2025.pdf");

        let monthly = sample_monthly(vec![daily]);
        assert_eq!(
            monthly_pdf_filename(&monthly).unwrap(),
            "relatorio_mensal_agosto_2025.pdf"
        );
    }

    #[test]
    fn test_zero_sales_pdf_is_not_found() {
        let empty = DailyReport::empty(
            NaiveDate::from_ymd_opt(2025, 8, 12).unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap(),
        );
        let err = daily_pdf(&empty).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let monthly = sample_monthly(vec![]);
        let err = monthly_pdf(&monthly).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_daily_pdf_renders_bytes() {
        let bytes = daily_pdf(&sample_daily()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_monthly_pdf_renders_bytes() {
        let monthly = sample_monthly(vec![sample_daily()]);
        let bytes = monthly_pdf(&monthly).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_quick_stats() {
        let daily = sample_daily();
        let monthly = sample_monthly(vec![daily.clone()]);
        let stats = quick_stats(&daily, &monthly).unwrap();

        assert_eq!(stats.today_total, 2.45);
        assert_eq!(stats.today_sale_count, 2);
        assert_eq!(stats.month_name, "Agosto");
        assert_eq!(stats.month_total, 2.45);
        assert_eq!(stats.month_days_with_sales, 1);
    }
}
