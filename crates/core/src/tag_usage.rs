//! Per-tag summary of which operation kinds exist.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::descriptor::{OperationDescriptor, OperationKind};

/// Whether a tag owns at least one retrieval and at least one mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUsageRecord {
    /// At least one GET operation
    pub has_retrieval: bool,
    /// At least one operation with another verb
    pub has_mutation: bool,
}

impl TagUsageRecord {
    fn record(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Retrieval => self.has_retrieval = true,
            OperationKind::Mutation => self.has_mutation = true,
        }
    }
}

/// Tag -> usage, in the order tags are first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagUsage {
    records: IndexMap<String, TagUsageRecord>,
}

impl TagUsage {
    /// Scan operations once; every tag of an operation receives its kind.
    pub fn analyze<'a, I>(operations: I) -> Self
    where
        I: IntoIterator<Item = &'a OperationDescriptor>,
    {
        let mut usage = Self::default();
        for op in operations {
            for tag in &op.tags {
                usage.record(tag, op.kind());
            }
        }
        debug!(tags = usage.records.len(), "Analyzed tag usage.");
        usage
    }

    /// Note one operation of `kind` under `tag`.
    pub fn record(&mut self, tag: &str, kind: OperationKind) {
        self.records
            .entry(tag.to_string())
            .or_default()
            .record(kind);
    }

    /// Usage of one sanitized tag.
    pub fn get(&self, tag: &str) -> Option<&TagUsageRecord> {
        self.records.get(tag)
    }

    /// Tags with their usage, first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagUsageRecord)> {
        self.records.iter().map(|(tag, record)| (tag.as_str(), record))
    }

    /// Number of tags seen.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no operation carried a tag.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sets_flags_independently() {
        let mut usage = TagUsage::default();
        usage.record("Orders", OperationKind::Retrieval);
        usage.record("Admin", OperationKind::Mutation);
        usage.record("Orders", OperationKind::Mutation);

        assert_eq!(
            usage.get("Orders"),
            Some(&TagUsageRecord {
                has_retrieval: true,
                has_mutation: true
            })
        );
        assert_eq!(
            usage.get("Admin"),
            Some(&TagUsageRecord {
                has_retrieval: false,
                has_mutation: true
            })
        );
        assert_eq!(usage.get("Missing"), None);
    }

    #[test]
    fn test_result_is_order_independent() {
        let events = [
            ("A", OperationKind::Mutation),
            ("B", OperationKind::Retrieval),
            ("A", OperationKind::Retrieval),
        ];
        let mut forward = TagUsage::default();
        for (tag, kind) in events {
            forward.record(tag, kind);
        }
        let mut backward = TagUsage::default();
        for (tag, kind) in events.iter().rev() {
            backward.record(tag, *kind);
        }

        for (tag, record) in forward.iter() {
            assert_eq!(backward.get(tag), Some(record));
        }
        assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn test_iter_keeps_first_seen_order() {
        let mut usage = TagUsage::default();
        usage.record("Zeta", OperationKind::Retrieval);
        usage.record("Alpha", OperationKind::Retrieval);
        let tags: Vec<_> = usage.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, ["Zeta", "Alpha"]);
    }
}
