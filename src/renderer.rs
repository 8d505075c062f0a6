use crate::geometry::{ChartGeometry, Viewport};
use crate::models::{DailySnapshot, PixelPoint};
use svg::node::element::path::Data;
use svg::node::element::{Line, Path, Rectangle, Text, Title};
use svg::node::Value;

/// Neighbour distance divisor of the Catmull-Rom to Bezier conversion.
pub const CATMULL_ROM_DIVISOR: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveMode {
    Smooth,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverQuery {
    /// A per-point hit region was activated.
    Index(usize),
    /// Only the pointer's horizontal pixel position is known.
    X(f64),
}

pub struct GraphStyle {
    pub stroke_color: &'static str,
    pub fill_color: &'static str,
}

fn curve_data(points: &[PixelPoint], mode: CurveMode) -> Data {
    let mut path_data = Data::new();
    let Some(first) = points.first() else {
        return path_data;
    };
    path_data = path_data.move_to((first.x, first.y));

    match mode {
        CurveMode::Linear => {
            for point in &points[1..] {
                path_data = path_data.line_to((point.x, point.y));
            }
        }
        CurveMode::Smooth => {
            for i in 0..points.len() - 1 {
                let (cp1, cp2) = catmull_rom_controls(points, i);
                let end = &points[i + 1];
                path_data = path_data.cubic_curve_to((cp1.0, cp1.1, cp2.0, cp2.1, end.x, end.y));
            }
        }
    }
    path_data
}

/// Bezier control points of the segment from `points[i]` to `points[i + 1]`.
/// Neighbours outside the sequence are clamped to the segment's own ends.
pub fn catmull_rom_controls(points: &[PixelPoint], i: usize) -> ((f64, f64), (f64, f64)) {
    let current = &points[i];
    let next = &points[i + 1];
    let previous = if i == 0 { current } else { &points[i - 1] };
    let after_next = points.get(i + 2).unwrap_or(next);

    let cp1 = (
        current.x + (next.x - previous.x) / CATMULL_ROM_DIVISOR,
        current.y + (next.y - previous.y) / CATMULL_ROM_DIVISOR,
    );
    let cp2 = (
        next.x - (after_next.x - current.x) / CATMULL_ROM_DIVISOR,
        next.y - (after_next.y - current.y) / CATMULL_ROM_DIVISOR,
    );
    (cp1, cp2)
}

pub fn build_path(points: &[PixelPoint], mode: CurveMode) -> String {
    Value::from(curve_data(points, mode)).to_string()
}

/// The curve of `build_path`, closed along `baseline_y` into a fillable area.
pub fn build_fill_path(points: &[PixelPoint], mode: CurveMode, baseline_y: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    let path_data = curve_data(points, mode)
        .line_to((last.x, baseline_y))
        .line_to((first.x, baseline_y))
        .close();
    Value::from(path_data).to_string()
}

pub fn nearest_point(points: &[PixelPoint], query: HoverQuery) -> Option<&PixelPoint> {
    match query {
        HoverQuery::Index(index) => points.get(index),
        HoverQuery::X(x) => points
            .iter()
            .fold(None, |best: Option<&PixelPoint>, point| match best {
                Some(best) if (best.x - x).abs() <= (point.x - x).abs() => Some(best),
                _ => Some(point),
            }),
    }
}

pub struct Renderer {
    viewport: Viewport,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    fn document(&self) -> svg::Document {
        svg::Document::new()
            .set("viewBox", (0, 0, self.viewport.width, self.viewport.height))
            .set("width", self.viewport.width)
            .set("height", self.viewport.height)
    }

    pub fn render_placeholder(&self) -> String {
        self.document()
            .add(
                Text::new("No data")
                    .set("x", self.viewport.width / 2.0)
                    .set("y", self.viewport.height / 2.0)
                    .set("text-anchor", "middle")
                    .set("fill", "#888888")
                    .set("font-size", 14),
            )
            .to_string()
    }

    pub fn render_line_graphs(
        &self,
        geometry: &ChartGeometry,
        snapshots: &[DailySnapshot],
        styles: &[GraphStyle],
        mode: CurveMode,
    ) -> String {
        if geometry.is_empty() {
            return self.render_placeholder();
        }

        let mut document = self.document();
        let left = self.viewport.padding.left;
        let right = self.viewport.width - self.viewport.padding.right;
        let bottom = self.viewport.content_bottom();

        for grid_line in &geometry.axis.grid_lines {
            document = document
                .add(
                    Line::new()
                        .set("x1", left)
                        .set("x2", right)
                        .set("y1", grid_line.y)
                        .set("y2", grid_line.y)
                        .set("stroke", "#E0E0E0")
                        .set("stroke-width", 1),
                )
                .add(
                    Text::new(grid_line.label.as_str())
                        .set("x", left - 6.0)
                        .set("y", grid_line.y + 3.0)
                        .set("text-anchor", "end")
                        .set("font-size", 10),
                );
        }

        for label in &geometry.axis.x_labels {
            document = document.add(
                Text::new(label.label.as_str())
                    .set("x", label.x)
                    .set("y", bottom + 16.0)
                    .set("text-anchor", "middle")
                    .set("font-size", 10),
            );
        }

        for (points, style) in geometry.series.iter().zip(styles) {
            document = document
                .add(self.get_filled_area(points, mode, style.fill_color))
                .add(self.get_path(points, mode, style.stroke_color));
        }

        if let Some(points) = geometry.series.first() {
            for rect in self.hit_regions(points, snapshots) {
                document = document.add(rect);
            }
        }

        document.to_string()
    }

    fn get_path(&self, points: &[PixelPoint], mode: CurveMode, color: &str) -> Path {
        Path::new()
            .set("d", build_path(points, mode))
            .set("stroke", color)
            .set("stroke-width", "2")
            .set("fill", "none")
    }

    fn get_filled_area(&self, points: &[PixelPoint], mode: CurveMode, color: &str) -> Path {
        Path::new()
            .set("d", build_fill_path(points, mode, self.viewport.content_bottom()))
            .set("fill", color)
            .set("fill-opacity", "0.2")
            .set("stroke", "none")
    }

    /// One transparent column per visible day, titled with that day's counts.
    fn hit_regions(&self, points: &[PixelPoint], snapshots: &[DailySnapshot]) -> Vec<Rectangle> {
        let width = self.viewport.content_width() / points.len().max(1) as f64;
        points
            .iter()
            .filter_map(|point| {
                let snapshot = snapshots.get(point.source_index)?;
                let title = format!(
                    "{}: total {} / closed {} / open {}",
                    snapshot.date, snapshot.total, snapshot.closed, snapshot.open
                );
                Some(
                    Rectangle::new()
                        .set("x", point.x - width / 2.0)
                        .set("y", self.viewport.padding.top)
                        .set("width", width)
                        .set("height", self.viewport.content_height())
                        .set("fill", "transparent")
                        .set("data-index", point.source_index.to_string())
                        .add(Title::new(title)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{map_to_viewport, Padding};
    use crate::models::SnapshotField;
    use chrono::NaiveDate;
    use svg::node::element::path::Command;

    fn point(x: f64, y: f64, source_index: usize) -> PixelPoint {
        PixelPoint { x, y, source_index }
    }

    fn commands(path: &str) -> Vec<Command> {
        Data::parse(path).unwrap().iter().cloned().collect()
    }

    fn coordinates(command: &Command) -> Vec<f32> {
        match command {
            Command::Move(_, parameters)
            | Command::Line(_, parameters)
            | Command::CubicCurve(_, parameters) => parameters.to_vec(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn empty_points_give_empty_path() {
        assert_eq!(build_path(&[], CurveMode::Smooth), "");
        assert_eq!(build_path(&[], CurveMode::Linear), "");
        assert_eq!(build_fill_path(&[], CurveMode::Smooth, 100.0), "");
    }

    #[test]
    fn single_point_is_a_lone_move() {
        let points = [point(12.5, 40.0, 0)];

        assert_eq!(build_path(&points, CurveMode::Linear), "M12.5,40");
        assert_eq!(build_path(&points, CurveMode::Smooth), "M12.5,40");
    }

    #[test]
    fn linear_path_visits_points_in_order() {
        let points = [point(0.0, 10.0, 0), point(5.0, 20.0, 1), point(10.0, 5.0, 2)];

        assert_eq!(build_path(&points, CurveMode::Linear), "M0,10 L5,20 L10,5");
    }

    #[test]
    fn smooth_path_uses_clamped_catmull_rom_controls() {
        let points = [point(0.0, 0.0, 0), point(6.0, 12.0, 1), point(12.0, 0.0, 2)];

        assert_eq!(catmull_rom_controls(&points, 0), ((1.0, 2.0), (4.0, 12.0)));
        assert_eq!(catmull_rom_controls(&points, 1), ((8.0, 12.0), (11.0, 2.0)));
        assert_eq!(
            build_path(&points, CurveMode::Smooth),
            "M0,0 C1,2,4,12,6,12 C8,12,11,2,12,0"
        );
    }

    #[test]
    fn smooth_path_passes_through_every_point() {
        let points = [
            point(0.0, 50.0, 0),
            point(10.0, 20.0, 1),
            point(20.0, 35.0, 2),
            point(30.0, 5.0, 3),
        ];
        let parsed = commands(&build_path(&points, CurveMode::Smooth));

        assert_eq!(parsed.len(), points.len());
        for (command, point) in parsed.iter().zip(&points) {
            let values = coordinates(command);
            let end = &values[values.len() - 2..];
            assert_eq!(end, [point.x as f32, point.y as f32]);
        }
    }

    #[test]
    fn smooth_equals_linear_for_collinear_points() {
        let points: Vec<PixelPoint> = (0..5)
            .map(|i| point(10.0 + i as f64 * 15.0, 100.0 - i as f64 * 7.5, i))
            .collect();
        let on_line = |x: f32, y: f32| (100.0 - (x - 10.0) * 0.5 - y).abs() < 1e-3;

        for command in commands(&build_path(&points, CurveMode::Smooth)) {
            for pair in coordinates(&command).chunks(2) {
                assert!(on_line(pair[0], pair[1]), "{pair:?} is off the line");
            }
        }
    }

    #[test]
    fn paths_are_deterministic() {
        let points = [point(1.0, 3.0, 0), point(2.5, 7.25, 1), point(4.0, 1.0, 2)];

        assert_eq!(
            build_path(&points, CurveMode::Smooth),
            build_path(&points, CurveMode::Smooth)
        );
        assert_eq!(
            build_fill_path(&points, CurveMode::Linear, 9.0),
            build_fill_path(&points, CurveMode::Linear, 9.0)
        );
    }

    #[test]
    fn fill_path_closes_along_the_baseline() {
        let points = [point(0.0, 10.0, 0), point(5.0, 20.0, 1)];
        let fill = build_fill_path(&points, CurveMode::Linear, 50.0);

        assert!(fill.starts_with(&build_path(&points, CurveMode::Linear)));
        assert_eq!(fill, "M0,10 L5,20 L5,50 L0,50 z");
    }

    #[test]
    fn nearest_by_index_and_by_x() {
        let points = [point(0.0, 1.0, 0), point(10.0, 2.0, 1), point(20.0, 3.0, 2)];

        assert_eq!(nearest_point(&points, HoverQuery::Index(1)), Some(&points[1]));
        assert_eq!(nearest_point(&points, HoverQuery::Index(3)), None);
        assert_eq!(nearest_point(&points, HoverQuery::X(13.0)), Some(&points[1]));
        assert_eq!(nearest_point(&points, HoverQuery::X(-40.0)), Some(&points[0]));
        assert_eq!(nearest_point(&points, HoverQuery::X(99.0)), Some(&points[2]));
        assert_eq!(nearest_point(&points, HoverQuery::X(15.0)), Some(&points[1]));
        assert_eq!(nearest_point(&[], HoverQuery::X(0.0)), None);
    }

    #[test]
    fn document_contains_axes_series_and_hit_regions() {
        let viewport = Viewport {
            width: 440.0,
            height: 240.0,
            padding: Padding {
                top: 10.0,
                right: 20.0,
                bottom: 30.0,
                left: 40.0,
            },
        };
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let snapshots = vec![
            DailySnapshot::new(first, 1, 0),
            DailySnapshot::new(first.succ_opt().unwrap(), 3, 1),
        ];
        let geometry = map_to_viewport(&snapshots, &[SnapshotField::Total], &viewport);
        let style = GraphStyle {
            stroke_color: "#4A90E2",
            fill_color: "#4A90E2",
        };

        let document =
            Renderer::new(viewport).render_line_graphs(&geometry, &snapshots, &[style], CurveMode::Linear);

        assert!(document.starts_with("<svg"));
        assert!(document.contains("01-02"));
        assert!(document.contains("2024-01-02: total 3 / closed 1 / open 2"));
        assert_eq!(document.matches("<path").count(), 2);
        assert_eq!(document.matches("<rect").count(), 2);
    }

    #[test]
    fn empty_geometry_renders_placeholder() {
        let viewport = Viewport {
            width: 200.0,
            height: 100.0,
            padding: Padding {
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
                left: 0.0,
            },
        };
        let geometry = map_to_viewport(&[], &[SnapshotField::Open], &viewport);
        let document = Renderer::new(viewport).render_line_graphs(&geometry, &[], &[], CurveMode::Smooth);

        assert!(document.contains("No data"));
        assert!(!document.contains("<path"));
    }
}
