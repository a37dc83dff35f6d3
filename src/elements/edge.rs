use serde::{Deserialize, Serialize};

use crate::dataset::{EdgeRecord, Sentiment};

use super::Highlight;

/// A citation in the graph. Endpoints are stored as external node ids and
/// resolved through the owning graph; traversal and forces treat the edge
/// as undirected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    record: EdgeRecord,
    highlight: Highlight,
}

impl Edge {
    pub fn new(record: EdgeRecord) -> Self {
        Self {
            record,
            highlight: Highlight::Neutral,
        }
    }

    pub fn id(&self) -> usize {
        self.record.id
    }

    pub fn record(&self) -> &EdgeRecord {
        &self.record
    }

    pub fn source_id(&self) -> usize {
        self.record.source_id
    }

    pub fn target_id(&self) -> usize {
        self.record.target_id
    }

    pub fn quote(&self) -> &str {
        &self.record.quote
    }

    pub fn sentiment(&self) -> Sentiment {
        self.record.sentiment
    }

    pub fn is_same_author(&self) -> bool {
        self.record.is_same_author
    }

    pub(crate) fn set_same_author(&mut self, same: bool) {
        self.record.is_same_author = same;
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub(crate) fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
    }
}
