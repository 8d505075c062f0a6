pub mod aggregator;
pub mod config;
pub mod geometry;
pub mod issue_client;
pub mod models;
pub mod renderer;
pub mod routes;
pub mod time_graph;
pub mod window;

#[derive(Clone)]
pub struct AppState {
    pub source: std::sync::Arc<issue_client::IssueSource>,
}
