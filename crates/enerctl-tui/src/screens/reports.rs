//! Reports tab: consumption per device as bars, distribution by sector as
//! proportional share bars.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph};

use enerctl_core::report::{BarSeries, LegendPosition, ShareSeries};
use enerctl_core::Report;

use crate::component::Component;
use crate::theme;

const LABEL_WIDTH: u16 = 14;
const PERCENT_WIDTH: u16 = 8;

fn series_color(idx: usize) -> Color {
    theme::CHART_SERIES[idx % theme::CHART_SERIES.len()]
}

fn legend_entry(label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled("■ ", Style::default().fg(color)),
        Span::styled(label.to_owned(), Style::default().fg(theme::DIM_WHITE)),
    ]
}

pub struct ReportsScreen {
    report: Report,
    focused: bool,
}

impl ReportsScreen {
    pub fn new(report: Report) -> Self {
        Self {
            report,
            focused: false,
        }
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        if self.report.options.show_title {
            block.title(format!(" {title} ")).title_style(theme::title_style())
        } else {
            block
        }
    }

    /// Carve the legend out of `area` on the configured side. Returns
    /// `(legend, body)`.
    fn split_legend(&self, area: Rect, entries: &[Vec<Span<'static>>]) -> (Rect, Rect) {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let widest = entries
            .iter()
            .map(|e| e.iter().map(Span::width).sum::<usize>())
            .max()
            .unwrap_or(0) as u16
            + 2;

        match self.report.options.legend {
            LegendPosition::Top => {
                let [legend, body] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
                (legend, body)
            }
            LegendPosition::Bottom => {
                let [body, legend] =
                    Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
                (legend, body)
            }
            LegendPosition::Left => {
                let [legend, body] =
                    Layout::horizontal([Constraint::Length(widest), Constraint::Min(1)])
                        .areas(area);
                (legend, body)
            }
            LegendPosition::Right => {
                let [body, legend] =
                    Layout::horizontal([Constraint::Min(1), Constraint::Length(widest)])
                        .areas(area);
                (legend, body)
            }
        }
    }

    fn render_legend(&self, frame: &mut Frame, area: Rect, entries: Vec<Vec<Span<'static>>>) {
        let lines = match self.report.options.legend {
            LegendPosition::Top | LegendPosition::Bottom => {
                let mut spans = vec![Span::raw(" ")];
                for entry in entries {
                    spans.extend(entry);
                    spans.push(Span::raw("   "));
                }
                vec![Line::from(spans)]
            }
            LegendPosition::Left | LegendPosition::Right => {
                entries.into_iter().map(Line::from).collect()
            }
        };
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_consumption(&self, frame: &mut Frame, area: Rect, series: &BarSeries) {
        let block = self.panel(series.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let entries = vec![legend_entry(series.label, series_color(0))];
        let (legend_area, chart_area) = self.split_legend(inner, &entries);
        self.render_legend(frame, legend_area, entries);

        let bars: Vec<Bar> = series
            .points
            .iter()
            .map(|p| {
                Bar::default()
                    .value(p.value)
                    .label(Line::from(p.label))
                    .text_value(p.value.to_string())
            })
            .collect();

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let count = series.points.len().max(1) as u16;
        let bar_width = (chart_area.width / count).saturating_sub(2).clamp(3, 16);

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(2)
            .bar_style(Style::default().fg(series_color(0)))
            .value_style(Style::default().fg(theme::BG_DARK).bg(series_color(0)))
            .label_style(Style::default().fg(theme::DIM_WHITE))
            .max(series.max());
        frame.render_widget(chart, chart_area);
    }

    fn render_distribution(&self, frame: &mut Frame, area: Rect, series: &ShareSeries) {
        let block = self.panel(series.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let entries: Vec<_> = series
            .slices
            .iter()
            .enumerate()
            .map(|(i, s)| legend_entry(s.label, series_color(i)))
            .collect();
        let (legend_area, body) = self.split_legend(inner, &entries);
        self.render_legend(frame, legend_area, entries);

        let track = usize::from(body.width.saturating_sub(LABEL_WIDTH + PERCENT_WIDTH + 2));
        let mut lines = vec![Line::from("")];
        for (i, (label, pct)) in series.percentages().into_iter().enumerate() {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss,
                clippy::as_conversions
            )]
            let filled = ((pct / 100.0) * track as f64).round() as usize;
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {label:<width$}", width = usize::from(LABEL_WIDTH) - 1),
                    Style::default().fg(theme::DIM_WHITE),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(series_color(i))),
                Span::styled(
                    "░".repeat(track.saturating_sub(filled)),
                    Style::default().fg(theme::BG_HIGHLIGHT),
                ),
                Span::styled(format!(" {pct:>5.1}%"), Style::default().fg(theme::NEON_CYAN)),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), body);
    }
}

impl Component for ReportsScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
        self.render_consumption(frame, top, &self.report.consumption);
        self.render_distribution(frame, bottom, &self.report.distribution);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::test_support::render_to_string;

    #[test]
    fn both_charts_render_with_titles_and_legends() {
        let screen = ReportsScreen::new(Report::sample());
        let out = render_to_string(&screen, 110, 32);

        assert!(out.contains("Energy consumption by device"), "{out}");
        assert!(out.contains("■ Consumption (kWh)"));
        assert!(out.contains("Energy consumption distribution"));
        assert!(out.contains("■ Residential"));
        assert!(out.contains(" 40.0%"));
        assert!(out.contains(" 35.0%"));
        assert!(out.contains(" 25.0%"));
        assert!(out.contains("150"));
    }

    #[test]
    fn legend_sits_above_the_chart() {
        let screen = ReportsScreen::new(Report::sample());
        let out = render_to_string(&screen, 110, 32);
        let lines: Vec<&str> = out.lines().collect();

        let legend = lines.iter().position(|l| l.contains("■ Residential")).unwrap_or(usize::MAX);
        let first_share = lines.iter().position(|l| l.contains("40.0%")).unwrap_or(0);
        assert!(legend < first_share);
    }

    #[test]
    fn titles_can_be_hidden() {
        let mut report = Report::sample();
        report.options.show_title = false;
        let out = render_to_string(&ReportsScreen::new(report), 110, 32);
        assert!(!out.contains("Energy consumption by device"));
        assert!(out.contains("40.0%"));
    }
}
