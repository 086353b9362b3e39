//! Plain-text and JSON rendering of dashboard snapshots.

use std::fmt::Write as _;

use serde_json::json;
use trendboard_core::formatting::{format_count, format_date_long};
use trendboard_data::aggregator::Granularity;
use trendboard_data::table::{paginate, table_rows, Page, TableRow};
use trendboard_runtime::orchestrator::DashboardData;
use unicode_width::UnicodeWidthStr;

// ── View ──────────────────────────────────────────────────────────────────────

/// Which part of the dashboard to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Summary,
    Table,
    Period,
    Companies,
    Regions,
}

impl View {
    /// Parse a `--view` value. Unknown names fall back to [`View::All`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "summary" => View::Summary,
            "table" => View::Table,
            "period" => View::Period,
            "companies" => View::Companies,
            "regions" => View::Regions,
            _ => View::All,
        }
    }

    fn includes(self, other: View) -> bool {
        self == View::All || self == other
    }
}

/// Table page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

// ── TextTable ─────────────────────────────────────────────────────────────────

/// Column-aligned text table sized by display width.
struct TextTable {
    headers: Vec<String>,
    right_aligned: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new(columns: &[(&str, bool)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            right_aligned: columns.iter().map(|(_, r)| *r).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.width());
                }
            }
        }

        let mut out = String::new();
        self.write_row(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.write_row(&mut out, &rule, &widths);
        for row in &self.rows {
            self.write_row(&mut out, row, &widths);
        }
        out
    }

    fn write_row(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = " ".repeat(width.saturating_sub(cell.width()));
            if self.right_aligned.get(i).copied().unwrap_or(false) {
                line.push_str(&pad);
                line.push_str(cell);
            } else {
                line.push_str(cell);
                line.push_str(&pad);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Render `data` as plain text.
pub fn render_text(data: &DashboardData, view: View, page: PageRequest) -> String {
    let mut out = String::new();

    if let Some(error) = &data.last_error {
        let _ = writeln!(out, "Could not load layoff data: {error}\n");
    }
    if data.views.is_empty() {
        out.push_str("No layoff data available for this selection.\n");
        return out;
    }

    let mut sections: Vec<String> = Vec::new();
    if view.includes(View::Summary) {
        sections.push(summary_text(data));
    }
    if view.includes(View::Period) {
        sections.push(period_text(data));
    }
    if view.includes(View::Companies) {
        sections.push(companies_text(data));
    }
    if view.includes(View::Regions) {
        sections.push(regions_text(data));
    }
    if view.includes(View::Table) {
        sections.push(table_text(&table_page(data, page)));
    }

    out.push_str(&sections.join("\n"));
    out
}

fn summary_text(data: &DashboardData) -> String {
    let summary = &data.views.summary;
    let filter = &data.views.filter;

    let mut out = String::from("Summary\n");
    let _ = writeln!(out, "  Source          {}", data.source);
    let _ = writeln!(out, "  Total laid off  {}", format_count(summary.total_laid_off));
    let _ = writeln!(out, "  Events          {}", format_count(summary.events as u64));
    let _ = writeln!(out, "  Companies       {}", format_count(summary.companies as u64));
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        let _ = writeln!(
            out,
            "  Period          {} to {}",
            format_date_long(first),
            format_date_long(last)
        );
    }

    let mut applied = Vec::new();
    if let Some(year) = filter.year {
        applied.push(format!("year {year}"));
    }
    if let Some(industry) = &filter.industry {
        applied.push(format!("industry {industry}"));
    }
    if !applied.is_empty() {
        let _ = writeln!(out, "  Filter          {}", applied.join(", "));
    }
    out
}

fn period_text(data: &DashboardData) -> String {
    let periods = &data.views.periods;
    let title = match periods.granularity {
        Granularity::Day => "Layoffs per day",
        Granularity::Month => "Layoffs per month",
    };

    // Mark each peak once, earliest period first on equal totals.
    let mut peaks = data.views.peak_measures.clone();
    let mut table = TextTable::new(&[("Period", false), ("Laid off", true), ("", false)]);
    for group in &periods.groups {
        let marker = match peaks.iter().position(|m| *m == group.measure) {
            Some(pos) => {
                peaks.remove(pos);
                "peak"
            }
            None => "",
        };
        table.push(vec![
            group.key.clone(),
            format_count(group.measure),
            marker.to_string(),
        ]);
    }

    format!("{title}\n{}", table.render())
}

fn companies_text(data: &DashboardData) -> String {
    let mut table = TextTable::new(&[("#", true), ("Company", false), ("Laid off", true)]);
    for (rank, group) in data.views.top_companies.iter().enumerate() {
        table.push(vec![
            (rank + 1).to_string(),
            group.key.clone(),
            format_count(group.measure),
        ]);
    }
    format!("Top companies\n{}", table.render())
}

fn regions_text(data: &DashboardData) -> String {
    let mut table = TextTable::new(&[
        ("#", true),
        ("Region", false),
        ("Laid off", true),
        ("Share", true),
        ("Companies", true),
    ]);
    for (rank, region) in data.views.region_shares().into_iter().enumerate() {
        table.push(vec![
            (rank + 1).to_string(),
            region.region,
            format_count(region.laid_off),
            format!("{:.1}%", region.share),
            region.companies.to_string(),
        ]);
    }
    format!("Top regions\n{}", table.render())
}

fn table_page(data: &DashboardData, request: PageRequest) -> Page<TableRow> {
    paginate(&table_rows(&data.views.records), request.page, request.per_page)
}

fn table_text(page: &Page<TableRow>) -> String {
    let mut table = TextTable::new(&[
        ("Date", false),
        ("Company", false),
        ("Location", false),
        ("Laid off", true),
        ("Industry", false),
        ("Country", false),
    ]);
    for row in &page.items {
        table.push(vec![
            row.date.clone(),
            row.company.clone(),
            row.location.clone(),
            format_count(row.laid_off),
            row.industry.clone(),
            row.country.clone(),
        ]);
    }
    format!(
        "Layoff events\n{}Page {} of {} ({} events)\n",
        table.render(),
        page.page,
        page.total_pages,
        format_count(page.total_items as u64)
    )
}

// ── JSON ──────────────────────────────────────────────────────────────────────

/// Render `data` as pretty-printed JSON.
pub fn render_json(
    data: &DashboardData,
    view: View,
    page: PageRequest,
) -> serde_json::Result<String> {
    let views = &data.views;
    let value = match view {
        View::Summary => serde_json::to_value(&views.summary)?,
        View::Table => serde_json::to_value(table_page(data, page))?,
        View::Period => serde_json::to_value(&views.periods)?,
        View::Companies => serde_json::to_value(&views.top_companies)?,
        View::Regions => serde_json::to_value(views.region_shares())?,
        View::All => json!({
            "source": data.source,
            "lastError": data.last_error,
            "filter": views.filter,
            "availableYears": data.available_years,
            "availableIndustries": data.available_industries,
            "summary": views.summary,
            "periods": views.periods,
            "peakMeasures": views.peak_measures,
            "topCompanies": views.top_companies,
            "topRegions": views.region_shares(),
            "table": table_page(data, page),
        }),
    };
    serde_json::to_string_pretty(&value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
