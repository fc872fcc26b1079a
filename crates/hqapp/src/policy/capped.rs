//! Capped collections.
//!
//! A capped collection is a live list bounded to `cap` items plus a parallel
//! archive list. When a forward transition pushes the live list over its cap,
//! the surplus oldest items (by a caller-chosen timestamp, stable for ties)
//! move to the head of the archive, oldest first.
//!
//! Restoring from the archive deliberately does not re-check the cap: a
//! restore may leave the live list over cap until the next forward
//! transition.

use chrono::{DateTime, Utc};
use tracing::info;

/// Enforce `cap` on `live`, moving the oldest surplus to the head of `archive`.
///
/// Survivors keep their relative order. `live.len() + archive.len()` is
/// unchanged. Returns how many items were archived.
pub fn archive_overflow<T, K>(
    live: &mut Vec<T>,
    archive: &mut Vec<T>,
    cap: usize,
    key: K,
) -> usize
where
    K: Fn(&T) -> DateTime<Utc>,
{
    archive_overflow_where(live, archive, cap, |_| true, key)
}

/// Like [`archive_overflow`], but only items matching `counts` belong to the
/// capped collection; the rest of `live` is left alone.
pub fn archive_overflow_where<T, P, K>(
    live: &mut Vec<T>,
    archive: &mut Vec<T>,
    cap: usize,
    counts: P,
    key: K,
) -> usize
where
    P: Fn(&T) -> bool,
    K: Fn(&T) -> DateTime<Utc>,
{
    let mut members: Vec<(usize, DateTime<Utc>)> = live
        .iter()
        .enumerate()
        .filter(|(_, item)| counts(item))
        .map(|(idx, item)| (idx, key(item)))
        .collect();

    if members.len() <= cap {
        return 0;
    }

    // Stable: equal timestamps keep list order.
    members.sort_by_key(|(_, at)| *at);
    let surplus = members.len() - cap;
    let evict: Vec<usize> = members[..surplus].iter().map(|(idx, _)| *idx).collect();

    let mut slots: Vec<Option<T>> = live.drain(..).map(Some).collect();
    let oldest_first: Vec<T> = evict
        .iter()
        .filter_map(|idx| slots[*idx].take())
        .collect();
    live.extend(slots.into_iter().flatten());

    archive.splice(0..0, oldest_first);
    info!(archived = surplus, cap, "capped collection overflow archived");
    surplus
}

/// Remove and return the first item matching `id`.
pub fn take_by_id<T, F>(items: &mut Vec<T>, matches: F) -> Option<T>
where
    F: Fn(&T) -> bool,
{
    let idx = items.iter().position(matches)?;
    Some(items.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        at: DateTime<Utc>,
        counted: bool,
    }

    fn t(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n)
    }

    fn item(id: &'static str, n: i64) -> Item {
        Item {
            id,
            at: t(n),
            counted: true,
        }
    }

    fn ids(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn under_cap_is_untouched() {
        let mut live = vec![item("a", 1), item("b", 2)];
        let mut archive = vec![item("z", 0)];
        assert_eq!(archive_overflow(&mut live, &mut archive, 2, |i| i.at), 0);
        assert_eq!(ids(&live), ["a", "b"]);
        assert_eq!(ids(&archive), ["z"]);
    }

    #[test]
    fn oldest_surplus_moves_to_archive_head() {
        // Live order is not timestamp order.
        let mut live = vec![item("c", 3), item("a", 1), item("d", 4), item("b", 2)];
        let mut archive = vec![item("z", 0)];

        let moved = archive_overflow(&mut live, &mut archive, 2, |i| i.at);

        assert_eq!(moved, 2);
        assert_eq!(ids(&live), ["c", "d"]);
        assert_eq!(ids(&archive), ["a", "b", "z"]);
    }

    #[test]
    fn total_count_is_conserved() {
        let mut live: Vec<Item> = (0..9).map(|n| item("x", n)).collect();
        let mut archive = vec![item("old", -5), item("older", -6)];
        let before = live.len() + archive.len();

        archive_overflow(&mut live, &mut archive, 6, |i| i.at);

        assert_eq!(live.len(), 6);
        assert_eq!(live.len() + archive.len(), before);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut live = vec![item("first", 1), item("second", 1), item("third", 1)];
        let mut archive = Vec::new();

        archive_overflow(&mut live, &mut archive, 1, |i| i.at);

        assert_eq!(ids(&archive), ["first", "second"]);
        assert_eq!(ids(&live), ["third"]);
    }

    #[test]
    fn only_counted_items_are_capped() {
        let mut live = vec![
            Item {
                id: "draft",
                at: t(0),
                counted: false,
            },
            item("p1", 1),
            item("p2", 2),
            item("p3", 3),
        ];
        let mut archive = Vec::new();

        let moved = archive_overflow_where(&mut live, &mut archive, 2, |i| i.counted, |i| i.at);

        assert_eq!(moved, 1);
        assert_eq!(ids(&live), ["draft", "p2", "p3"]);
        assert_eq!(ids(&archive), ["p1"]);
    }

    #[test]
    fn take_by_id_removes_first_match() {
        let mut items = vec![item("a", 1), item("b", 2)];
        assert_eq!(take_by_id(&mut items, |i| i.id == "b").unwrap().id, "b");
        assert!(take_by_id(&mut items, |i| i.id == "missing").is_none());
        assert_eq!(ids(&items), ["a"]);
    }
}
