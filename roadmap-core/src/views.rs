//! Groupings and statistics over roadmap items
//!
//! Every grouping places each item in exactly one bucket. Items without a
//! value for the grouped dimension go to a sentinel bucket instead of being
//! dropped, and items keep their document order within a bucket.

use std::collections::BTreeMap;

use crate::models::{Item, Priority, Roadmap, Status};

/// Bucket for items without an area or change type
pub const UNSPECIFIED: &str = "_unspecified";
/// Bucket for items without a phase
pub const UNPHASED: &str = "_unphased";
/// Bucket for items without a target quarter
pub const UNSCHEDULED: &str = "_unscheduled";

fn group_by<'a, K, F>(items: &'a [Item], key: F) -> BTreeMap<K, Vec<&'a Item>>
where
    K: Ord,
    F: Fn(&'a Item) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a Item>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

impl Roadmap {
    /// Items grouped by area, unassigned items under [`UNSPECIFIED`]
    pub fn items_by_area(&self) -> BTreeMap<String, Vec<&Item>> {
        group_by(&self.items, |item| {
            item.area().unwrap_or(UNSPECIFIED).to_string()
        })
    }

    /// Items grouped by change type, untyped items under [`UNSPECIFIED`]
    pub fn items_by_type(&self) -> BTreeMap<String, Vec<&Item>> {
        group_by(&self.items, |item| {
            item.change_type().unwrap_or(UNSPECIFIED).to_string()
        })
    }

    /// Items grouped by phase, unphased items under [`UNPHASED`]
    pub fn items_by_phase(&self) -> BTreeMap<String, Vec<&Item>> {
        group_by(&self.items, |item| {
            item.phase().unwrap_or(UNPHASED).to_string()
        })
    }

    /// Items grouped by status
    pub fn items_by_status(&self) -> BTreeMap<Status, Vec<&Item>> {
        group_by(&self.items, |item| item.status.clone())
    }

    /// Items grouped by target quarter, unscheduled items under [`UNSCHEDULED`]
    pub fn items_by_quarter(&self) -> BTreeMap<String, Vec<&Item>> {
        group_by(&self.items, |item| {
            item.target_quarter().unwrap_or(UNSCHEDULED).to_string()
        })
    }

    /// Items grouped by priority; `None` collects items without one
    ///
    /// Keys sort from critical to low, with unknown values after them and
    /// the unprioritized bucket first.
    pub fn items_by_priority(&self) -> BTreeMap<Option<Priority>, Vec<&Item>> {
        group_by(&self.items, |item| item.priority.clone())
    }

    /// Counts items by status, area, type and priority
    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            total: self.items.len(),
            ..Default::default()
        };
        for item in &self.items {
            *stats.by_status.entry(item.status.clone()).or_default() += 1;
            if let Some(area) = item.area() {
                *stats.by_area.entry(area.to_string()).or_default() += 1;
            }
            if let Some(change_type) = item.change_type() {
                *stats.by_type.entry(change_type.to_string()).or_default() += 1;
            }
            if let Some(priority) = &item.priority {
                *stats.by_priority.entry(priority.clone()).or_default() += 1;
            }
        }
        stats
    }
}

/// Item counts for a roadmap
///
/// Unlike the groupings, the area, type and priority maps only count items
/// that have a value for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub by_area: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
}

impl Stats {
    pub fn completed_count(&self) -> usize {
        self.by_status.get(&Status::Completed).copied().unwrap_or(0)
    }

    /// Percentage of completed items; 0 for an empty roadmap
    pub fn completed_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed_count() as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, status: Status) -> Item {
        Item::new(id, format!("Item {}", id), status)
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    fn sample() -> Roadmap {
        let mut roadmap = Roadmap::new("test");

        let mut a = item("1", Status::Completed);
        a.area = Some("core".into());
        a.phase = Some("phase-1".into());
        a.priority = Some(Priority::High);
        a.target_quarter = Some("Q1 2026".into());
        a.change_type = Some("Added".into());

        let mut b = item("2", Status::Planned);
        b.area = Some("api".into());
        b.phase = Some("phase-1".into());
        b.priority = Some(Priority::Medium);
        b.target_quarter = Some("Q2 2026".into());
        b.change_type = Some("Changed".into());

        let mut c = item("3", Status::Planned);
        c.area = Some("core".into());
        c.phase = Some("phase-2".into());
        c.priority = Some(Priority::Low);
        c.change_type = Some("Added".into());

        let d = item("4", Status::Future);

        roadmap.items = vec![a, b, c, d];
        roadmap
    }

    #[test]
    fn test_items_by_area() {
        let roadmap = sample();
        let by_area = roadmap.items_by_area();
        assert_eq!(ids(&by_area["core"]), vec!["1", "3"]);
        assert_eq!(ids(&by_area["api"]), vec!["2"]);
        assert_eq!(ids(&by_area[UNSPECIFIED]), vec!["4"]);
    }

    #[test]
    fn test_items_by_type() {
        let roadmap = sample();
        let by_type = roadmap.items_by_type();
        assert_eq!(by_type["Added"].len(), 2);
        assert_eq!(by_type["Changed"].len(), 1);
        assert_eq!(by_type[UNSPECIFIED].len(), 1);
    }

    #[test]
    fn test_items_by_phase() {
        let roadmap = sample();
        let by_phase = roadmap.items_by_phase();
        assert_eq!(ids(&by_phase["phase-1"]), vec!["1", "2"]);
        assert_eq!(ids(&by_phase["phase-2"]), vec!["3"]);
        assert_eq!(ids(&by_phase[UNPHASED]), vec!["4"]);
    }

    #[test]
    fn test_items_by_status() {
        let roadmap = sample();
        let by_status = roadmap.items_by_status();
        assert_eq!(by_status[&Status::Completed].len(), 1);
        assert_eq!(ids(&by_status[&Status::Planned]), vec!["2", "3"]);
        assert!(!by_status.contains_key(&Status::InProgress));
    }

    #[test]
    fn test_items_by_quarter() {
        let roadmap = sample();
        let by_quarter = roadmap.items_by_quarter();
        assert_eq!(by_quarter["Q1 2026"].len(), 1);
        assert_eq!(by_quarter["Q2 2026"].len(), 1);
        assert_eq!(ids(&by_quarter[UNSCHEDULED]), vec!["3", "4"]);
    }

    #[test]
    fn test_items_by_priority() {
        let roadmap = sample();
        let by_priority = roadmap.items_by_priority();
        assert_eq!(by_priority[&Some(Priority::High)].len(), 1);
        assert_eq!(ids(&by_priority[&None]), vec!["4"]);

        let keys: Vec<_> = by_priority.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                None,
                Some(Priority::High),
                Some(Priority::Medium),
                Some(Priority::Low)
            ]
        );
    }

    #[test]
    fn test_empty_strings_use_sentinel() {
        let mut roadmap = Roadmap::new("test");
        let mut a = item("1", Status::Planned);
        a.area = Some(String::new());
        a.target_quarter = Some(String::new());
        roadmap.items.push(a);

        assert_eq!(roadmap.items_by_area()[UNSPECIFIED].len(), 1);
        assert_eq!(roadmap.items_by_quarter()[UNSCHEDULED].len(), 1);
    }

    #[test]
    fn test_groupings_cover_every_item_once() {
        let roadmap = sample();
        let n = roadmap.items.len();

        let counts = [
            roadmap.items_by_area().values().map(Vec::len).sum::<usize>(),
            roadmap.items_by_type().values().map(Vec::len).sum(),
            roadmap.items_by_phase().values().map(Vec::len).sum(),
            roadmap.items_by_status().values().map(Vec::len).sum(),
            roadmap.items_by_quarter().values().map(Vec::len).sum(),
            roadmap.items_by_priority().values().map(Vec::len).sum(),
        ];
        assert!(counts.iter().all(|&c| c == n), "{:?}", counts);

        let mut seen: Vec<String> = roadmap
            .items_by_area()
            .values()
            .flat_map(|items| ids(items))
            .collect();
        seen.sort();
        assert_eq!(seen, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_stats() {
        let mut roadmap = sample();
        let mut e = item("5", Status::Completed);
        e.area = Some("core".into());
        e.change_type = Some("Added".into());
        e.priority = Some(Priority::High);
        roadmap.items.push(e);

        let stats = roadmap.stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_status[&Status::Completed], 2);
        assert_eq!(stats.by_status[&Status::Planned], 2);
        assert_eq!(stats.by_area["core"], 3);
        assert_eq!(stats.by_type["Added"], 3);
        assert_eq!(stats.by_priority[&Priority::High], 2);
        assert!(!stats.by_area.contains_key(UNSPECIFIED));
        assert_eq!(stats.completed_count(), 2);
        assert!((stats.completed_percent() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_completed_percent_empty() {
        let stats = Roadmap::new("test").stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed_count(), 0);
        assert_eq!(stats.completed_percent(), 0.0);
    }
}
