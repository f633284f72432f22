use std::collections::BTreeMap;

use crate::models::{LegendEntry, Roadmap, Status};

/// Built-in emoji and description for each known status
pub fn default_legend() -> BTreeMap<Status, LegendEntry> {
    BTreeMap::from([
        (Status::Completed, LegendEntry::new("✅", "Completed")),
        (Status::InProgress, LegendEntry::new("🚧", "In Progress")),
        (Status::Planned, LegendEntry::new("📋", "Planned")),
        (Status::Future, LegendEntry::new("💡", "Under Consideration")),
    ])
}

impl Roadmap {
    /// The default legend with this document's entries overlaid per status
    pub fn get_legend(&self) -> BTreeMap<Status, LegendEntry> {
        let mut legend = default_legend();
        legend.extend(
            self.legend
                .iter()
                .map(|(status, entry)| (status.clone(), entry.clone())),
        );
        legend
    }

    /// Emoji for `status`, or an empty string if the legend has no entry
    pub fn get_status_emoji(&self, status: &Status) -> String {
        self.get_legend()
            .remove(status)
            .map(|entry| entry.emoji)
            .unwrap_or_default()
    }
}
