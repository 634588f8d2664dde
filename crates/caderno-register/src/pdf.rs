//! # PDF Rendering
//!
//! Turns consolidated reports into PDF bytes, mirroring the paper caderno:
//! a monospaced quantity/product/total table for the daily report and a
//! date/total/sales table for the monthly rollup.
//!
//! Uses printpdf with builtin fonts only, so no font files ship with the
//! binary. A4 pages, 20mm margins, new page when the cursor runs out.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocumentReference, PdfLayerReference};

use caderno_core::{calendar, DailyReport, MonthlyReport, Money};

use crate::error::{RegisterError, RegisterResult};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_STEP_MM: f32 = 7.0;

/// Writes lines top-down, breaking onto a new page when the margin is hit.
struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor {
    fn new(title: &str) -> Self {
        let (doc, page, layer) = printpdf::PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Camada 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        Cursor {
            doc,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn font(&self, font: BuiltinFont) -> RegisterResult<IndirectFontRef> {
        self.doc
            .add_builtin_font(font)
            .map_err(|e| RegisterError::Pdf(e.to_string()))
    }

    /// Writes text at the given x offset and advances the line cursor.
    fn line(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.break_page_if_needed();
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= LINE_STEP_MM;
    }

    /// Writes several cells on one row, then advances once.
    fn row(&mut self, cells: &[(&str, f32)], size: f32, font: &IndirectFontRef) {
        self.break_page_if_needed();
        for (text, x) in cells {
            self.layer.use_text(*text, size, Mm(*x), Mm(self.y), font);
        }
        self.y -= LINE_STEP_MM;
    }

    fn gap(&mut self) {
        self.y -= LINE_STEP_MM;
    }

    fn break_page_if_needed(&mut self) {
        if self.y < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Camada 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn finish(self) -> RegisterResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| RegisterError::Pdf(e.to_string()))
    }
}

/// Renders the daily report: Qtd/Produto/Total rows in Courier, a bold total
/// line, and the day summary block.
pub fn render_daily(report: &DailyReport) -> RegisterResult<Vec<u8>> {
    use chrono::Datelike;

    let month_name = calendar::month_name(report.date.month())?;
    let title = format!(
        "Relatório de Vendas - {} de {} de {}",
        report.date.day(),
        month_name,
        report.date.year()
    );

    let mut cursor = Cursor::new(&title);
    let courier = cursor.font(BuiltinFont::Courier)?;
    let courier_bold = cursor.font(BuiltinFont::CourierBold)?;

    cursor.line(&title, 16.0, MARGIN_MM, &courier_bold);
    cursor.gap();

    cursor.row(
        &[("Qtd", 20.0), ("Produto", 45.0), ("Total", 150.0)],
        12.0,
        &courier_bold,
    );

    for entry in report.product_summary.iter() {
        let qty = format!("{:02}", entry.quantity);
        let total = Money::from_cents(entry.total_cents).to_string();
        cursor.row(
            &[(qty.as_str(), 20.0), (entry.name.as_str(), 45.0), (total.as_str(), 150.0)],
            12.0,
            &courier,
        );
    }

    cursor.gap();
    let total = report.total().to_string();
    cursor.row(&[("TOTAL", 20.0), (total.as_str(), 150.0)], 14.0, &courier_bold);

    cursor.gap();
    cursor.line("Resumo do Dia:", 12.0, MARGIN_MM, &courier_bold);
    cursor.line(
        &format!("Número de vendas: {}", report.sale_count),
        12.0,
        MARGIN_MM,
        &courier,
    );
    cursor.line(
        &format!("Total de itens vendidos: {}", report.total_item_count),
        12.0,
        MARGIN_MM,
        &courier,
    );
    cursor.line(
        &format!("Valor total: {}", report.total()),
        12.0,
        MARGIN_MM,
        &courier,
    );

    cursor.finish()
}

/// Renders the monthly rollup: one row per consolidated day plus the month
/// total line.
pub fn render_monthly(report: &MonthlyReport) -> RegisterResult<Vec<u8>> {
    let month_name = calendar::month_name(report.month)?;
    let title = format!("Relatório Mensal - {} {}", month_name, report.year);

    let mut cursor = Cursor::new(&title);
    let helvetica = cursor.font(BuiltinFont::Helvetica)?;
    let helvetica_bold = cursor.font(BuiltinFont::HelveticaBold)?;

    cursor.line(&title, 18.0, MARGIN_MM, &helvetica_bold);
    cursor.gap();

    cursor.row(
        &[("Data", 20.0), ("Total do Dia", 70.0), ("Nº Vendas", 130.0)],
        10.0,
        &helvetica_bold,
    );

    for daily in &report.days {
        let date = daily.date.format("%d/%m/%Y").to_string();
        let total = daily.total().to_string();
        let count = daily.sale_count.to_string();
        cursor.row(
            &[(date.as_str(), 20.0), (total.as_str(), 70.0), (count.as_str(), 130.0)],
            10.0,
            &helvetica,
        );
    }

    cursor.gap();
    let total = report.total().to_string();
    let days = format!("{} dias", report.days_with_sales);
    cursor.row(
        &[("TOTAL MENSAL", 20.0), (total.as_str(), 70.0), (days.as_str(), 130.0)],
        12.0,
        &helvetica_bold,
    );

    cursor.finish()
}

// =============================================================================
// Unit Tests
// =============================================================================
