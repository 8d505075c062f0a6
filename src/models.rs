use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum IssueStatus {
    New,
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Reopened,
    Closed,
    #[serde(other)]
    Other,
}

impl IssueStatus {
    pub fn is_closed(self) -> bool {
        self == IssueStatus::Closed
    }
}

/// An issue as handed over by the issue source, with timestamps already validated.
#[derive(Debug, Clone)]
pub struct IssueRecord {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: IssueStatus,
}

/// An issue exactly as the REST collaborator serializes it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawIssue {
    pub created_at: String,
    pub updated_at: String,
    pub status: IssueStatus,
}

#[derive(Deserialize)]
pub struct IssuePageResponse {
    pub total: u64,
    pub items: Vec<RawIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub total: u32,
    pub closed: u32,
    pub open: u32,
}

impl DailySnapshot {
    pub fn new(date: NaiveDate, total: u32, closed: u32) -> Self {
        Self {
            date,
            total,
            closed,
            open: total - closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    Total,
    Closed,
    Open,
}

impl SnapshotField {
    pub fn select(self, snapshot: &DailySnapshot) -> u32 {
        match self {
            SnapshotField::Total => snapshot.total,
            SnapshotField::Closed => snapshot.closed,
            SnapshotField::Open => snapshot.open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
    pub source_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipPayload {
    pub date: NaiveDate,
    pub total: u32,
    pub closed: u32,
    pub open: u32,
}

impl From<&DailySnapshot> for TooltipPayload {
    fn from(snapshot: &DailySnapshot) -> Self {
        Self {
            date: snapshot.date,
            total: snapshot.total,
            closed: snapshot.closed,
            open: snapshot.open,
        }
    }
}
