use crate::storage::segment::Segment;

/// Policy for deciding when the live segments get rewritten as one
pub trait MergePolicy: Send + Sync {
    fn should_merge(&self, segments: &[Segment]) -> bool;
}

/// Merge once the segment count passes a threshold, or earlier when
/// tombstones make up most of what replay has to read.
pub struct TieredMergePolicy {
    pub max_segments: usize,
    pub max_delete_ratio: f32,
}

impl TieredMergePolicy {
    pub fn new(max_segments: usize) -> Self {
        TieredMergePolicy {
            max_segments,
            max_delete_ratio: 0.5,
        }
    }
}

impl Default for TieredMergePolicy {
    fn default() -> Self {
        TieredMergePolicy::new(10)
    }
}

impl MergePolicy for TieredMergePolicy {
    fn should_merge(&self, segments: &[Segment]) -> bool {
        if segments.len() > self.max_segments {
            return true;
        }
        if segments.len() < 2 {
            return false;
        }

        let deletes: u64 = segments.iter().map(|s| s.delete_count as u64).sum();
        let entries: u64 = segments.iter().map(|s| s.entry_count as u64).sum();
        let total = deletes + entries;
        total > 0 && deletes as f32 / total as f32 > self.max_delete_ratio
    }
}
