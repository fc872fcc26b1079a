//! Label and tag sets.
//!
//! Kanban labels and idea tags are small ordered sets of lowercase strings.
//! Adding is idempotent and case-insensitive; deleting an absent value is a
//! no-op.

/// Trim and lowercase a label. `None` when nothing is left.
pub fn normalize_label(raw: &str) -> Option<String> {
    let label = raw.trim().to_lowercase();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// An ordered set of normalized labels over a borrowed list.
pub struct LabelSet<'a> {
    labels: &'a mut Vec<String>,
}

impl<'a> LabelSet<'a> {
    pub fn new(labels: &'a mut Vec<String>) -> Self {
        Self { labels }
    }

    pub fn contains(&self, raw: &str) -> bool {
        normalize_label(raw).is_some_and(|label| self.labels.contains(&label))
    }

    /// Append `raw` unless already present. Returns true when the set changed.
    pub fn add(&mut self, raw: &str) -> bool {
        match normalize_label(raw) {
            Some(label) if !self.labels.contains(&label) => {
                self.labels.push(label);
                true
            }
            _ => false,
        }
    }

    /// Remove `raw` if present. Returns true when the set changed.
    pub fn remove(&mut self, raw: &str) -> bool {
        let Some(label) = normalize_label(raw) else {
            return false;
        };
        let before = self.labels.len();
        self.labels.retain(|l| *l != label);
        self.labels.len() != before
    }
}
