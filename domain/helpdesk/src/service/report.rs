use async_trait::async_trait;

use crate::exception::HelpdeskResult;
use crate::model::vo::{ActingIdentity, ReportDocument};
use crate::Id;

/// Turns an assembled report into printable bytes.
pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn render(&self, document: &ReportDocument) -> anyhow::Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub filename: String,
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Owner or staff.
    async fn build_report(&self, actor: &ActingIdentity, ticket_id: Id) -> HelpdeskResult<ReportDocument>;
    async fn render_report(&self, actor: &ActingIdentity, ticket_id: Id) -> HelpdeskResult<RenderedReport>;
}
