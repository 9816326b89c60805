use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::model::ScoredRecord;

pub const COLUMNS: [&str; 10] = [
    "name",
    "team",
    "position",
    "price",
    "score",
    "ppg",
    "form",
    "fdr",
    "ownership",
    "xgi_per90",
];

pub fn export_file_name(gameweek: u32) -> String {
    format!("fpl_scout_gw{gameweek}.csv")
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    team: &'a str,
    position: &'static str,
    price: f64,
    score: f64,
    ppg: f64,
    form: f64,
    fdr: u32,
    ownership: f64,
    xgi_per90: f64,
}

impl<'a> From<&'a ScoredRecord> for ExportRow<'a> {
    fn from(row: &'a ScoredRecord) -> Self {
        let p = &row.player;
        Self {
            name: &p.name,
            team: &p.team,
            position: p.position.code(),
            price: p.price,
            score: row.score,
            ppg: p.ppg,
            form: p.form,
            fdr: p.fdr,
            ownership: p.ownership,
            xgi_per90: p.xgi_per90,
        }
    }
}

/// Fixed-width text table, one player per line, header first.
pub fn render_table<'a>(rows: impl IntoIterator<Item = &'a ScoredRecord>) -> String {
    let rows: Vec<ExportRow<'_>> = rows.into_iter().map(ExportRow::from).collect();
    let name_w = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(COLUMNS[0].len());

    let mut out = format!(
        "{:<name_w$} {:>4} {:>8} {:>5} {:>5} {:>4} {:>4} {:>3} {:>9} {:>9}\n",
        COLUMNS[0],
        COLUMNS[1],
        COLUMNS[2],
        COLUMNS[3],
        COLUMNS[4],
        COLUMNS[5],
        COLUMNS[6],
        COLUMNS[7],
        COLUMNS[8],
        COLUMNS[9],
    );
    for r in &rows {
        out.push_str(&format!(
            "{:<name_w$} {:>4} {:>8} {:>5.1} {:>5.1} {:>4.1} {:>4.1} {:>3} {:>9.1} {:>9.2}\n",
            r.name, r.team, r.position, r.price, r.score, r.ppg, r.form, r.fdr, r.ownership, r.xgi_per90,
        ));
    }
    out
}

pub fn write_csv<'a>(path: &Path, rows: impl IntoIterator<Item = &'a ScoredRecord>) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    let mut written = 0usize;
    for row in rows {
        writer
            .serialize(ExportRow::from(row))
            .with_context(|| format!("failed writing row {written}"))?;
        written += 1;
    }
    if written == 0 {
        // serde-driven headers are only emitted alongside the first record.
        writer.write_record(COLUMNS).context("failed writing header")?;
    }
    writer
        .flush()
        .with_context(|| format!("failed flushing {}", path.display()))?;
    Ok(written)
}

pub fn write_xlsx(path: &Path, gameweek: u32, rows: &[ScoredRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Rankings")?;
        write_rankings(sheet, rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let summary = [
            ("Gameweek", gameweek.to_string()),
            ("Players", rows.len().to_string()),
            ("Generated", generated),
        ];
        for (idx, (label, value)) in summary.iter().enumerate() {
            sheet.write_string(idx as u32, 0, *label)?;
            sheet.write_string(idx as u32, 1, value.as_str())?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_rankings(sheet: &mut Worksheet, rows: &[ScoredRecord]) -> Result<()> {
    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = ExportRow::from(row);
        let line = idx as u32 + 1;
        sheet
            .write_string(line, 0, r.name)
            .and_then(|s| s.write_string(line, 1, r.team))
            .and_then(|s| s.write_string(line, 2, r.position))
            .and_then(|s| s.write_number(line, 3, r.price))
            .and_then(|s| s.write_number(line, 4, r.score))
            .and_then(|s| s.write_number(line, 5, r.ppg))
            .and_then(|s| s.write_number(line, 6, r.form))
            .and_then(|s| s.write_number(line, 7, f64::from(r.fdr)))
            .and_then(|s| s.write_number(line, 8, r.ownership))
            .and_then(|s| s.write_number(line, 9, r.xgi_per90))
            .with_context(|| format!("write ranking row {line}"))?;
    }
    Ok(())
}
