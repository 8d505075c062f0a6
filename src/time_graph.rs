use crate::aggregator::aggregate_window;
use crate::geometry::{map_to_viewport, Padding, Viewport};
use crate::models::{DailySnapshot, IssueRecord, SnapshotField, TooltipPayload};
use crate::renderer::{nearest_point, CurveMode, GraphStyle, HoverQuery, Renderer};
use crate::window::DateWindow;
use chrono::NaiveDate;

pub const DEFAULT_WIDTH: f64 = 640.0;
pub const DEFAULT_HEIGHT: f64 = 280.0;
/// Path coordinates are written as `f32`, so sizes stay well inside its range.
pub const MAX_DIMENSION: f64 = 10_000.0;

pub const DEFAULT_PADDING: Padding = Padding {
    top: 16.0,
    right: 16.0,
    bottom: 32.0,
    left: 40.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Created vs. closed issues over time.
    Trend,
    /// Issues still open over time.
    Burndown,
}

impl ChartKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "trend" => Some(ChartKind::Trend),
            "burndown" => Some(ChartKind::Burndown),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Trend => "trend",
            ChartKind::Burndown => "burndown",
        }
    }

    fn series(self) -> Vec<(SnapshotField, GraphStyle)> {
        match self {
            ChartKind::Trend => vec![
                (
                    SnapshotField::Total,
                    GraphStyle {
                        stroke_color: "#4A90E2",
                        fill_color: "#4A90E2",
                    },
                ),
                (
                    SnapshotField::Closed,
                    GraphStyle {
                        stroke_color: "#2ECC71",
                        fill_color: "#2ECC71",
                    },
                ),
            ],
            ChartKind::Burndown => vec![(
                SnapshotField::Open,
                GraphStyle {
                    stroke_color: "#E74C3C",
                    fill_color: "#E74C3C",
                },
            )],
        }
    }

    fn curve_mode(self) -> CurveMode {
        match self {
            ChartKind::Trend => CurveMode::Smooth,
            ChartKind::Burndown => CurveMode::Linear,
        }
    }
}

pub fn viewport(width: Option<f64>, height: Option<f64>) -> Viewport {
    let min_width = DEFAULT_PADDING.left + DEFAULT_PADDING.right;
    let min_height = DEFAULT_PADDING.top + DEFAULT_PADDING.bottom;
    let size = |value: Option<f64>, default: f64, min: f64| {
        value
            .filter(|v| v.is_finite())
            .unwrap_or(default)
            .clamp(min, MAX_DIMENSION)
    };
    Viewport {
        width: size(width, DEFAULT_WIDTH, min_width),
        height: size(height, DEFAULT_HEIGHT, min_height),
        padding: DEFAULT_PADDING,
    }
}

pub struct TimeGraph {
    kind: ChartKind,
    viewport: Viewport,
    renderer: Renderer,
}

impl TimeGraph {
    pub fn new(kind: ChartKind, viewport: Viewport) -> Self {
        Self {
            kind,
            viewport,
            renderer: Renderer::new(viewport),
        }
    }

    fn fields(&self) -> Vec<SnapshotField> {
        self.kind.series().into_iter().map(|(field, _)| field).collect()
    }

    pub fn render(&self, snapshots: &[DailySnapshot]) -> String {
        let (fields, styles): (Vec<_>, Vec<_>) = self.kind.series().into_iter().unzip();
        let geometry = map_to_viewport(snapshots, &fields, &self.viewport);
        self.renderer
            .render_line_graphs(&geometry, snapshots, &styles, self.kind.curve_mode())
    }

    /// Resolves a hover position against the first series of the chart.
    pub fn tooltip(&self, snapshots: &[DailySnapshot], query: HoverQuery) -> Option<TooltipPayload> {
        let geometry = map_to_viewport(snapshots, &self.fields(), &self.viewport);
        let points = geometry.series.first()?;
        let point = nearest_point(points, query)?;
        snapshots.get(point.source_index).map(TooltipPayload::from)
    }
}

pub fn render_issue_chart(
    records: &[IssueRecord],
    kind: ChartKind,
    window: DateWindow,
    viewport: Viewport,
    today: NaiveDate,
) -> String {
    let visible = aggregate_window(records, window, today);
    log::debug!(
        "Rendering {} chart: {} records, {} days visible",
        kind.name(),
        records.len(),
        visible.len()
    );
    TimeGraph::new(kind, viewport).render(&visible)
}

pub fn issue_chart_tooltip(
    records: &[IssueRecord],
    kind: ChartKind,
    window: DateWindow,
    viewport: Viewport,
    today: NaiveDate,
    query: HoverQuery,
) -> Option<TooltipPayload> {
    let visible = aggregate_window(records, window, today);
    TimeGraph::new(kind, viewport).tooltip(&visible, query)
}
