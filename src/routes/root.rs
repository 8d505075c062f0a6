use crate::routes::{validate_project, AppError};
use crate::routes::issue_graph::ChartQuery;
use crate::time_graph::ChartKind;
use crate::window::DateWindow;
use chrono::Utc;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ProjectForm {
    pub key: String,
}

pub async fn root() -> axum::response::Html<String> {
    axum::response::Html(
        r#"
        <!DOCTYPE html>
        <html>
            <head>
                <link rel="stylesheet" href="/static/charts.css">
            </head>
            <body>
                <h1>Issue trends</h1>
                <form action="/project" method="get">
                    <input name="key" placeholder="Project key">
                    <button type="submit">Open</button>
                </form>
            </body>
        </html>
        "#
        .to_string(),
    )
}

pub async fn open_project(
    axum::extract::Query(form): axum::extract::Query<ProjectForm>,
) -> Result<axum::response::Redirect, AppError> {
    let project = validate_project(form.key.trim())?;
    Ok(axum::response::Redirect::to(&format!("/project/{}", project)))
}

pub fn project_page_html(project: &str, window: DateWindow, query: &ChartQuery) -> String {
    let mut chart_query = format!("start={}&end={}", window.start(), window.end());
    if let Some(width) = query.width {
        chart_query.push_str(&format!("&width={}", width));
    }
    if let Some(height) = query.height {
        chart_query.push_str(&format!("&height={}", height));
    }

    let charts = [ChartKind::Trend, ChartKind::Burndown]
        .iter()
        .map(|kind| {
            format!(
                r#"<section><h2>{name}</h2><object type="image/svg+xml" data="/project/{project}/{name}.svg?{query}"></object></section>"#,
                name = kind.name(),
                project = project,
                query = chart_query
            )
        })
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"
        <!DOCTYPE html>
        <html>
            <head>
                <link rel="stylesheet" href="/static/charts.css">
            </head>
            <body>
                <h1>{project}</h1>
                <form method="get">
                    <input type="date" name="start" value="{start}">
                    <input type="date" name="end" value="{end}">
                    <button type="submit">Apply</button>
                </form>
                {charts}
            </body>
        </html>
        "#,
        project = project,
        start = window.start(),
        end = window.end(),
        charts = charts
    )
}

pub async fn project_page(
    axum::extract::Path(project): axum::extract::Path<String>,
    axum::extract::Query(query): axum::extract::Query<ChartQuery>,
) -> Result<axum::response::Html<String>, AppError> {
    let project = validate_project(&project)?;
    let window = DateWindow::from_bounds(query.start, query.end, Utc::now().date_naive())?;
    Ok(axum::response::Html(project_page_html(project, window, &query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn project_page_embeds_both_charts_for_window() {
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let query = ChartQuery {
            width: Some(800.0),
            ..Default::default()
        };

        let html = project_page_html("qa", window, &query);

        assert!(html.contains(r#"data="/project/qa/trend.svg?start=2024-01-01&end=2024-01-31&width=800""#));
        assert!(html.contains(r#"data="/project/qa/burndown.svg?start=2024-01-01&end=2024-01-31&width=800""#));
        assert!(html.contains(r#"value="2024-01-31""#));
    }
}
