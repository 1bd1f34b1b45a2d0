use std::rc::Rc;

use crate::activity::{ActivityId, GroupSet};

/// A node in the search graph: the best-known way to reach a given activity
/// at a given time-slot with a particular group memory. Labels form a DAG
/// rooted at the seed label; `previous` is a shared, non-owning back
/// reference, and a bucket owns every label reachable from it.
#[derive(Clone, Debug)]
pub struct Label {
    pub act_id: ActivityId,
    pub time: i64,
    pub start_time: i64,
    pub duration: i64,
    pub current_soc: f64,
    pub soc_at_activity_start: f64,
    pub charge_duration: i64,
    pub charge_cost: f64,
    /// Charging cost accumulated up to the moment the current activity was
    /// entered; used to recover the cost incurred *during* an activity when
    /// it finishes (spec.md §4.3 point 5).
    pub charge_cost_at_activity_start: f64,
    pub utility: f64,
    /// Groups this label must not revisit: its own activity's group plus
    /// whatever DSSR has forbidden that activity from carrying. Reset on
    /// each transition rather than inherited from the predecessor label, so
    /// elementarity violations on a first DP pass are possible and DSSR has
    /// something to repair (spec.md §4.6).
    pub mem: GroupSet,
    /// The charging mode in force for the current activity's charging
    /// history, carried on the label rather than the (shared) activity
    /// record so that mode-continuity can be checked across consecutive
    /// continuation labels (spec.md §9, charging-continuity note).
    pub charge_mode: crate::activity::ChargeMode,
    /// Running sum of absolute start-time deviation, diagnostic only (not
    /// fed back into utility or dominance). Recovered from original_source/.
    pub deviation_start: f64,
    /// Running sum of absolute duration deviation, diagnostic only.
    pub deviation_dur: f64,
    pub previous: Option<Rc<Label>>,
}

/// Walks a label chain from `tail` back to the seed, returning the labels
/// in tail-to-head order (i.e. reverse chronological). Used by the DSSR
/// outer loop, which needs to scan backward for group-repetition cycles.
pub fn chain_tail_to_head(tail: &Rc<Label>) -> Vec<Rc<Label>> {
    let mut out = Vec::new();
    let mut cur = Some(Rc::clone(tail));
    while let Some(l) = cur {
        cur = l.previous.clone();
        out.push(l);
    }
    out
}

/// `L1` dominates `L2` iff they address the same activity, `L1` has at least
/// the group-memory of `L2` (so `L1`'s remaining choices are no larger),
/// `L1`'s utility is at least as good, and `L1` reaches the state no later.
/// `L2 == None` is trivially dominated. Ties are broken in favour of the
/// earlier-inserted label (the caller is responsible for preserving this by
/// only replacing on strict improvement — see `dp::insert_into_bucket`).
pub fn dominates(l1: &Label, l2: Option<&Label>) -> bool {
    let l2 = match l2 {
        None => return true,
        Some(l2) => l2,
    };

    if l1.act_id != l2.act_id {
        return false;
    }

    l1.utility >= l2.utility && l1.time <= l2.time && l1.mem.is_superset_of(l2.mem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityGroup;
    use crate::activity::ChargeMode;

    fn base_label() -> Label {
        Label {
            act_id: 1,
            time: 10,
            start_time: 0,
            duration: 10,
            current_soc: 1.0,
            soc_at_activity_start: 1.0,
            charge_duration: 0,
            charge_cost: 0.0,
            charge_cost_at_activity_start: 0.0,
            utility: 5.0,
            mem: GroupSet::singleton(ActivityGroup::Home),
            charge_mode: ChargeMode::None,
            deviation_start: 0.0,
            deviation_dur: 0.0,
            previous: None,
        }
    }

    #[test]
    fn dominates_none_trivially() {
        let l1 = base_label();
        assert!(dominates(&l1, None));
    }

    #[test]
    fn different_activity_never_dominates() {
        let l1 = base_label();
        let mut l2 = base_label();
        l2.act_id = 2;
        assert!(!dominates(&l1, Some(&l2)));
    }

    #[test]
    fn strictly_worse_mem_blocks_dominance() {
        let l1 = base_label();
        let mut l2 = base_label();
        l2.mem = l2.mem.with(ActivityGroup::Work);
        // l1 has a smaller memory set than l2, so l1 does not dominate
        assert!(!dominates(&l1, Some(&l2)));
    }

    #[test]
    fn better_utility_same_time_and_superset_mem_dominates() {
        let mut l1 = base_label();
        l1.mem = l1.mem.with(ActivityGroup::Work);
        l1.utility = 6.0;
        let l2 = base_label();
        assert!(dominates(&l1, Some(&l2)));
    }

    #[test]
    fn worse_time_blocks_dominance() {
        let mut l1 = base_label();
        l1.time = 20;
        let l2 = base_label();
        assert!(!dominates(&l1, Some(&l2)));
    }
}
