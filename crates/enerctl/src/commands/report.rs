//! `report`: the fixed consumption datasets.

use enerctl_core::Report;
use enerctl_core::report::DataPoint;
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ConsumptionRow {
    #[tabled(rename = "Device")]
    device: &'static str,
    #[tabled(rename = "Consumption (kWh)")]
    kwh: u64,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Sector")]
    sector: &'static str,
    #[tabled(rename = "Share")]
    share: String,
}

const BAR_WIDTH: u64 = 30;

fn bar(point: &DataPoint, max: u64) -> String {
    let filled = if max == 0 {
        0
    } else {
        point.value * BAR_WIDTH / max
    };
    "█".repeat(usize::try_from(filled).unwrap_or(0))
}

fn render_table(report: &Report) -> String {
    let max = report.consumption.max();
    let consumption: Vec<ConsumptionRow> = report
        .consumption
        .points
        .iter()
        .map(|p| ConsumptionRow {
            device: p.label,
            kwh: p.value,
            bar: bar(p, max),
        })
        .collect();
    let shares: Vec<ShareRow> = report
        .distribution
        .percentages()
        .into_iter()
        .map(|(sector, pct)| ShareRow {
            sector,
            share: format!("{pct:.1}%"),
        })
        .collect();

    format!(
        "{}\n{}\n\n{}\n{}",
        report.consumption.title,
        output::render_table(&consumption),
        report.distribution.title,
        output::render_table(&shares),
    )
}

fn render_plain(report: &Report) -> String {
    report
        .consumption
        .points
        .iter()
        .map(|p| format!("{}\t{}", p.label, p.value))
        .chain(
            report
                .distribution
                .slices
                .iter()
                .map(|s| format!("{}\t{}", s.label, s.value)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let report = Report::sample();
    let out = match global.output {
        OutputFormat::Plain => render_plain(&report),
        _ => output::render_single(&global.output, &report, render_table, |_| String::new())?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_bar_fills_width() {
        let report = Report::sample();
        let max = report.consumption.max();
        let widest = report
            .consumption
            .points
            .iter()
            .map(|p| bar(p, max).chars().count())
            .max();
        assert_eq!(widest, Some(30));
    }

    #[test]
    fn table_lists_every_series_entry() {
        let text = render_table(&Report::sample());
        for label in ["Television", "Computer", "Residential", "Industrial", "40.0%"] {
            assert!(text.contains(label), "missing {label} in:\n{text}");
        }
    }
}
