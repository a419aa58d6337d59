// ── Consumption report ──
//
// Fixed sample datasets for the reports view. Nothing here talks to the
// backend.

use serde::Serialize;

/// One labelled value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: &'static str,
    pub value: u64,
}

const fn point(label: &'static str, value: u64) -> DataPoint {
    DataPoint { label, value }
}

/// Categorical series rendered as bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub title: &'static str,
    /// Dataset label, shown in the legend.
    pub label: &'static str,
    pub points: Vec<DataPoint>,
}

impl BarSeries {
    pub fn max(&self) -> u64 {
        self.points.iter().map(|p| p.value).max().unwrap_or(0)
    }
}

/// Part-of-whole series rendered as a pie (or share bars in a terminal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSeries {
    pub title: &'static str,
    pub label: &'static str,
    pub slices: Vec<DataPoint>,
}

impl ShareSeries {
    /// Each slice as a percentage of the total. All zeros when the
    /// series sums to zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn percentages(&self) -> Vec<(&'static str, f64)> {
        let total: u64 = self.slices.iter().map(|s| s.value).sum();
        self.slices
            .iter()
            .map(|s| {
                let share = if total == 0 {
                    0.0
                } else {
                    s.value as f64 * 100.0 / total as f64
                };
                (s.label, share)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayOptions {
    pub show_title: bool,
    pub legend: LegendPosition,
}

/// Both report charts and how to display them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub consumption: BarSeries,
    pub distribution: ShareSeries,
    pub options: DisplayOptions,
}

impl Report {
    pub fn sample() -> Self {
        Self {
            consumption: BarSeries {
                title: "Energy consumption by device",
                label: "Consumption (kWh)",
                points: vec![
                    point("Television", 120),
                    point("Refrigerator", 80),
                    point("Air conditioner", 150),
                    point("Lighting", 60),
                    point("Computer", 90),
                ],
            },
            distribution: ShareSeries {
                title: "Energy consumption distribution",
                label: "Consumption (%)",
                slices: vec![
                    point("Residential", 40),
                    point("Commercial", 35),
                    point("Industrial", 25),
                ],
            },
            options: DisplayOptions {
                show_title: true,
                legend: LegendPosition::Top,
            },
        }
    }
}
