//! Writing reports and transaction lists to files.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;

use crate::{MonthlyReport, PageLayout, ResultEngine, Transaction};

/// Turns a laid-out page into file bytes.
pub trait PageRenderer {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, page: &PageLayout) -> ResultEngine<Vec<u8>>;
}

/// Renders the page as plain text, one line per text item in drawing order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextRenderer;

impl PageRenderer for PlainTextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, page: &PageLayout) -> ResultEngine<Vec<u8>> {
        let mut out = Vec::new();
        writeln!(out, "{}", page.title.text)?;
        writeln!(out, "{}", page.generated_on.text)?;
        writeln!(out)?;
        for line in &page.lines {
            writeln!(out, "{}", line.text)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", page.footer.text)?;
        Ok(out)
    }
}

/// `Finance_Report_<YYYYMM>.<ext>`
pub fn report_file_name(report: &MonthlyReport, renderer: &dyn PageRenderer) -> String {
    format!(
        "Finance_Report_{}.{}",
        report.period.stamp(),
        renderer.extension()
    )
}

/// Lays out `report`, renders it and writes it into `dir`.
///
/// An existing file with the same name is replaced.
pub fn export_report(
    report: &MonthlyReport,
    generated_on: NaiveDate,
    renderer: &dyn PageRenderer,
    dir: &Path,
) -> ResultEngine<PathBuf> {
    let layout = report.layout(generated_on)?;
    if !layout.fits_on_page() {
        tracing::warn!("report for {} overflows the page", report.period.label());
    }
    let bytes = renderer.render(&layout)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(report, renderer));
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    if fs::rename(&tmp, &path).is_err() {
        fs::copy(&tmp, &path)?;
        let _ = fs::remove_file(&tmp);
    }
    tracing::info!("report written to {}", path.display());
    Ok(path)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    date: String,
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    category: &'a str,
    amount: String,
    note: Option<&'a str>,
}

/// Writes `transactions` as CSV with a header row.
pub fn write_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> ResultEngine<()> {
    let mut writer = Writer::from_writer(writer);
    for tx in transactions {
        writer.serialize(CsvRow {
            id: tx.id,
            date: tx.occurred_at.to_rfc3339(),
            kind: tx.kind.as_str(),
            title: &tx.title,
            category: &tx.category,
            amount: tx.amount.to_string(),
            note: tx.note.as_deref(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
