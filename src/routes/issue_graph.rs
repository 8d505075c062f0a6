use crate::renderer::HoverQuery;
use crate::routes::{validate_project, AppError};
use crate::time_graph::{issue_chart_tooltip, render_issue_chart, viewport, ChartKind};
use crate::window::DateWindow;
use crate::AppState;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TooltipQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub x: Option<f64>,
    pub index: Option<usize>,
}

impl TooltipQuery {
    fn chart(&self) -> ChartQuery {
        ChartQuery {
            start: self.start,
            end: self.end,
            width: self.width,
            height: self.height,
        }
    }

    fn hover(&self) -> Option<HoverQuery> {
        self.index
            .map(HoverQuery::Index)
            .or(self.x.map(HoverQuery::X))
    }
}

fn chart_kind(chart: &str) -> Result<ChartKind, AppError> {
    ChartKind::from_name(chart.strip_suffix(".svg").unwrap_or(chart))
        .ok_or_else(|| AppError::UnknownChart(chart.to_string()))
}

pub async fn chart_svg_content(
    state: &AppState,
    project: &str,
    chart: &str,
    query: &ChartQuery,
    today: NaiveDate,
) -> Result<String, AppError> {
    let project = validate_project(project)?;
    let kind = chart_kind(chart)?;
    let window = DateWindow::from_bounds(query.start, query.end, today)?;
    let records = state.source.fetch_records(project).await?;

    Ok(render_issue_chart(
        &records,
        kind,
        window,
        viewport(query.width, query.height),
        today,
    ))
}

pub async fn issue_svg(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::extract::Path((project, chart)): axum::extract::Path<(String, String)>,
    axum::extract::Query(query): axum::extract::Query<ChartQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let svg_content =
        chart_svg_content(&state, &project, &chart, &query, Utc::now().date_naive()).await?;

    Ok((
        [(axum::http::header::CONTENT_TYPE, "image/svg+xml")],
        svg_content,
    ))
}

pub async fn issue_tooltip(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::extract::Path((project, chart)): axum::extract::Path<(String, String)>,
    axum::extract::Query(query): axum::extract::Query<TooltipQuery>,
) -> Result<axum::Json<Option<crate::models::TooltipPayload>>, AppError> {
    let project = validate_project(&project)?;
    let kind = chart_kind(&chart)?;
    let hover = query.hover().ok_or(AppError::MissingHoverPosition)?;
    let chart_query = query.chart();
    let today = Utc::now().date_naive();
    let window = DateWindow::from_bounds(chart_query.start, chart_query.end, today)?;
    let records = state.source.fetch_records(project).await?;

    Ok(axum::Json(issue_chart_tooltip(
        &records,
        kind,
        window,
        viewport(chart_query.width, chart_query.height),
        today,
        hover,
    )))
}
