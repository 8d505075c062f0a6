use crate::models::{DailySnapshot, PixelPoint, SnapshotField};

/// Minimum horizontal distance between two x-axis labels.
pub const MIN_LABEL_SPACING_PX: f64 = 50.0;

/// `(upper bound of max value, gridline count)`, checked in order. Values
/// above the last bound get one gridline per ten units.
pub const GRID_LINE_BRACKETS: [(u32, u32); 3] = [(10, 5), (20, 4), (50, 5)];
pub const SMALL_RANGE_LIMIT: u32 = 5;
pub const LARGE_RANGE_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Viewport {
    pub fn content_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    pub fn content_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    pub fn content_bottom(&self) -> f64 {
        self.padding.top + self.content_height()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub x: f64,
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisLayout {
    pub grid_lines: Vec<GridLine>,
    pub x_labels: Vec<AxisLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    /// One point set per selector, in selector order.
    pub series: Vec<Vec<PixelPoint>>,
    pub max_value: u32,
    pub grid_line_count: u32,
    pub label_interval: usize,
    pub axis: AxisLayout,
}

impl ChartGeometry {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Vec::is_empty)
    }
}

pub fn grid_line_count(max_value: u32) -> u32 {
    if max_value <= SMALL_RANGE_LIMIT {
        return max_value;
    }
    GRID_LINE_BRACKETS
        .iter()
        .find(|(limit, _)| max_value <= *limit)
        .map(|(_, count)| *count)
        .unwrap_or_else(|| max_value.div_ceil(LARGE_RANGE_STEP))
}

pub fn label_interval(len: usize, content_width: f64) -> usize {
    if content_width <= 0.0 {
        return len.max(1);
    }
    let interval = (len as f64 * MIN_LABEL_SPACING_PX / content_width).ceil();
    (interval as usize).max(1)
}

/// Whole values print as integers, fractional steps with one decimal.
pub fn grid_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub fn is_labeled(index: usize, len: usize, interval: usize) -> bool {
    index % interval.max(1) == 0 || index + 1 == len
}

/// Projects every selected field of `snapshots` into the plotting rectangle
/// of `viewport`. All series share one vertical scale.
pub fn map_to_viewport(
    snapshots: &[DailySnapshot],
    selectors: &[SnapshotField],
    viewport: &Viewport,
) -> ChartGeometry {
    let max_value = selectors
        .iter()
        .flat_map(|field| snapshots.iter().map(move |s| field.select(s)))
        .max()
        .unwrap_or(0)
        .max(1);

    let content_width = viewport.content_width();
    let content_height = viewport.content_height();
    let x_step = content_width / snapshots.len().saturating_sub(1).max(1) as f64;
    let y_scale = content_height / max_value as f64;

    let series = selectors
        .iter()
        .map(|field| {
            snapshots
                .iter()
                .enumerate()
                .map(|(i, snapshot)| PixelPoint {
                    x: viewport.padding.left + i as f64 * x_step,
                    y: viewport.padding.top + content_height
                        - field.select(snapshot) as f64 * y_scale,
                    source_index: i,
                })
                .collect()
        })
        .collect();

    let grid_line_count = grid_line_count(max_value);
    let label_interval = label_interval(snapshots.len(), content_width);

    let grid_lines = (0..=grid_line_count)
        .map(|step| {
            let value = max_value as f64 * step as f64 / grid_line_count as f64;
            GridLine {
                y: viewport.content_bottom() - value * y_scale,
                value,
                label: grid_label(value),
            }
        })
        .collect();

    let x_labels = snapshots
        .iter()
        .enumerate()
        .filter(|(i, _)| is_labeled(*i, snapshots.len(), label_interval))
        .map(|(i, snapshot)| AxisLabel {
            x: viewport.padding.left + i as f64 * x_step,
            index: i,
            label: snapshot.date.format("%m-%d").to_string(),
        })
        .collect();

    ChartGeometry {
        series,
        max_value,
        grid_line_count,
        label_interval,
        axis: AxisLayout {
            grid_lines,
            x_labels,
        },
    }
}
