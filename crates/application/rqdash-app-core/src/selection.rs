use rqdash_core::SelectionSnapshot;
use serde::{Deserialize, Serialize};

/// Which sidebar checkbox group a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionGroup {
    Queues,
    JobStatuses,
}

/// Ordered checkbox labels with their checked state. Render order is the
/// order items were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckboxGroup {
    items: Vec<(String, bool)>,
}

impl CheckboxGroup {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut group = Self::default();
        group.replace_items(labels);
        group
    }

    pub fn contains(&self, label: &str) -> bool {
        self.items.iter().any(|(l, _)| l == label)
    }

    /// Flips one box. Returns false when no box has that label.
    pub fn toggle(&mut self, label: &str) -> bool {
        match self.items.iter_mut().find(|(l, _)| l == label) {
            Some((_, checked)) => {
                *checked = !*checked;
                true
            }
            None => false,
        }
    }

    pub fn set_checked(&mut self, label: &str, checked: bool) -> bool {
        match self.items.iter_mut().find(|(l, _)| l == label) {
            Some((_, c)) => {
                *c = checked;
                true
            }
            None => false,
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for (_, c) in &mut self.items {
            *c = checked;
        }
    }

    /// Checks exactly `labels`, appending any the group does not list yet.
    pub fn select_exactly(&mut self, labels: &[String]) {
        for label in labels {
            if !self.contains(label) {
                self.items.push((label.clone(), false));
            }
        }
        for (l, c) in &mut self.items {
            *c = labels.contains(l);
        }
    }

    pub fn checked(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|(_, c)| *c)
            .map(|(l, _)| l.clone())
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(l, _)| l.as_str())
    }

    pub fn is_checked(&self, label: &str) -> bool {
        self.items.iter().any(|(l, c)| l == label && *c)
    }

    /// Re-renders the group from a fresh label list. Labels that survive keep
    /// their checked state; new ones start unchecked; vanished ones are dropped.
    pub fn replace_items<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next: Vec<(String, bool)> = Vec::new();
        for label in labels {
            let label = label.into();
            if next.iter().any(|(l, _)| *l == label) {
                continue;
            }
            let checked = self.is_checked(&label);
            next.push((label, checked));
        }
        self.items = next;
    }
}

/// The sidebar's two checkbox groups. Every read derives from the boxes as
/// they are now; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    queues: CheckboxGroup,
    job_statuses: CheckboxGroup,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self {
            queues: CheckboxGroup::default(),
            job_statuses: CheckboxGroup::new(rqdash_config::JOB_STATUSES.iter().copied()),
        }
    }
}

impl SelectionStore {
    pub fn current_queue_selection(&self) -> Vec<String> {
        self.queues.checked()
    }

    pub fn current_job_status_selection(&self) -> Vec<String> {
        self.job_statuses.checked()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            queues: self.current_queue_selection(),
            job_statuses: self.current_job_status_selection(),
        }
    }

    pub fn group(&self, group: SelectionGroup) -> &CheckboxGroup {
        match group {
            SelectionGroup::Queues => &self.queues,
            SelectionGroup::JobStatuses => &self.job_statuses,
        }
    }

    pub fn group_mut(&mut self, group: SelectionGroup) -> &mut CheckboxGroup {
        match group {
            SelectionGroup::Queues => &mut self.queues,
            SelectionGroup::JobStatuses => &mut self.job_statuses,
        }
    }

    pub fn toggle(&mut self, group: SelectionGroup, label: &str) -> bool {
        self.group_mut(group).toggle(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_render_order_not_click_order() {
        let mut store = SelectionStore::default();
        store
            .group_mut(SelectionGroup::Queues)
            .replace_items(["high", "default", "low"]);
        store.toggle(SelectionGroup::Queues, "low");
        store.toggle(SelectionGroup::Queues, "high");
        assert_eq!(store.current_queue_selection(), ["high", "low"]);
    }

    fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    const QUEUES: [&str; 4] = ["default", "high", "low", "emails"];

    fn rendered() -> SelectionStore {
        let mut store = SelectionStore::default();
        store
            .group_mut(SelectionGroup::Queues)
            .replace_items(QUEUES);
        store
    }

    #[test]
    fn toggling_on_then_off_restores_the_selection() {
        for pre_checked in permutations(&QUEUES) {
            for n in 0..QUEUES.len() {
                let mut store = rendered();
                for label in &pre_checked[..n] {
                    store.toggle(SelectionGroup::Queues, label);
                }
                let before = store.current_queue_selection();

                for label in &pre_checked[n..] {
                    store.toggle(SelectionGroup::Queues, label);
                    store.toggle(SelectionGroup::Queues, label);
                    assert_eq!(store.current_queue_selection(), before, "{label}");
                }
            }
        }
    }

    #[test]
    fn checking_n_distinct_boxes_in_any_order_selects_n() {
        for order in permutations(&QUEUES) {
            for n in 0..=QUEUES.len() {
                let mut store = rendered();
                for label in &order[..n] {
                    store.toggle(SelectionGroup::Queues, label);
                }
                let selection = store.current_queue_selection();
                assert_eq!(selection.len(), n, "{order:?}");

                let expected: Vec<&str> = QUEUES
                    .iter()
                    .copied()
                    .filter(|q| order[..n].contains(q))
                    .collect();
                assert_eq!(selection, expected);
            }
        }
    }

    #[test]
    fn repeated_reads_are_identical() {
        let mut store = SelectionStore::default();
        store.toggle(SelectionGroup::JobStatuses, "failed");
        let a = store.snapshot();
        let b = store.snapshot();
        assert_eq!(a, b);
        assert_eq!(a.job_statuses, ["failed"]);
        assert!(a.queues.is_empty());
    }

    #[test]
    fn nothing_checked_is_an_empty_selection() {
        let store = SelectionStore::default();
        assert!(store.snapshot().is_empty());
        assert_eq!(
            store.group(SelectionGroup::JobStatuses).labels().count(),
            rqdash_config::JOB_STATUSES.len()
        );
    }

    #[test]
    fn toggling_unknown_label_changes_nothing() {
        let mut group = CheckboxGroup::new(["a"]);
        assert!(!group.toggle("b"));
        assert!(group.checked().is_empty());
    }

    #[test]
    fn select_exactly_adds_missing_labels() {
        let mut group = CheckboxGroup::new(["a", "b"]);
        group.set_checked("a", true);
        group.select_exactly(&["b".to_string(), "z".to_string()]);
        assert_eq!(group.labels().collect::<Vec<_>>(), ["a", "b", "z"]);
        assert_eq!(group.checked(), ["b", "z"]);
    }

    #[test]
    fn replace_keeps_surviving_checks() {
        let mut group = CheckboxGroup::new(["a", "b", "c"]);
        group.set_checked("a", true);
        group.set_checked("c", true);
        group.replace_items(["c", "d", "a", "a"]);
        assert_eq!(group.labels().collect::<Vec<_>>(), ["c", "d", "a"]);
        assert_eq!(group.checked(), ["c", "a"]);
    }
}
