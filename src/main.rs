use issue_trend_charts::config::Config;
use issue_trend_charts::routes::issue_graph::{issue_svg, issue_tooltip};
use issue_trend_charts::routes::root::{open_project, project_page, root};
use issue_trend_charts::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let source = match config.issue_source() {
        Ok(source) => source,
        Err(e) => {
            log::error!("Could not set up issue source: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        source: std::sync::Arc::new(source),
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(root))
        .route("/project", axum::routing::get(open_project))
        .route("/project/{project}", axum::routing::get(project_page))
        .route("/project/{project}/{chart}", axum::routing::get(issue_svg))
        .route("/project/{project}/{chart}/tooltip", axum::routing::get(issue_tooltip))
        .nest_service("/static", tower_http::services::ServeDir::new("static"))
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Could not bind to {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    log::info!("Serving issue charts on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server stopped: {}", e);
    }
}
