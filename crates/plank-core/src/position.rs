//! The positional ordering engine.
//!
//! Sibling items under one parent (a board's lists, a list's cards) carry a
//! dense, zero-based `position`. Appends go to `max + 1`; a reposition is
//! planned as a batch of sibling shifts that closes the gap the move would
//! otherwise open. The planner is pure: it sees one consistent snapshot of
//! the scope and emits a collision-free set of writes. Callers must apply
//! the batch atomically (plank-db runs it inside one transaction) before
//! another reposition in the same scope reads.

use uuid::Uuid;

/// One sibling in a scope snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub id: Uuid,
    pub position: i64,
}

/// A single write in a reposition plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub id: Uuid,
    pub position: i64,
}

/// Position for a newly appended sibling: `max + 1`, or 0 for an empty
/// scope. Tolerates gaps left by deletions.
pub fn next_position(siblings: &[Slot]) -> i64 {
    siblings
        .iter()
        .map(|s| s.position)
        .max()
        .map_or(0, |max| max + 1)
}

/// Plan the writes that move `moved_id` from `current` to `target`.
///
/// Shift rules:
/// - `target == current`: nothing to do.
/// - `target < current`: siblings in `[target, current)` move up by one.
/// - `target > current`: siblings in `(current, target]` move down by one.
///
/// The moved item is never part of the shifted set; it receives `target`
/// directly. When no sibling occupies `target` the plan degenerates to that
/// single write with no shifting: out-of-range targets pass through
/// unchanged rather than erroring, which callers may rely on.
pub fn plan_reposition(
    siblings: &[Slot],
    moved_id: Uuid,
    current: i64,
    target: i64,
) -> Vec<PositionUpdate> {
    if target == current {
        return Vec::new();
    }

    debug_assert!(
        siblings
            .iter()
            .any(|s| s.id == moved_id && s.position == current),
        "reposition planned from a stale sibling snapshot"
    );

    let occupied = siblings
        .iter()
        .any(|s| s.id != moved_id && s.position == target);
    if !occupied {
        return vec![PositionUpdate {
            id: moved_id,
            position: target,
        }];
    }

    let mut updates: Vec<PositionUpdate> = siblings
        .iter()
        .filter(|s| s.id != moved_id)
        .filter_map(|s| {
            let shifted = if target < current {
                // Moving toward the front: everything between the target and
                // the vacated slot steps back by one.
                (target..current).contains(&s.position).then(|| s.position + 1)
            } else {
                ((current + 1)..=target)
                    .contains(&s.position)
                    .then(|| s.position - 1)
            };
            shifted.map(|position| PositionUpdate { id: s.id, position })
        })
        .collect();

    updates.push(PositionUpdate {
        id: moved_id,
        position: target,
    });

    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scope(n: usize) -> Vec<Slot> {
        (0..n)
            .map(|i| Slot {
                id: Uuid::new_v4(),
                position: i as i64,
            })
            .collect()
    }

    fn apply(siblings: &[Slot], updates: &[PositionUpdate]) -> Vec<Slot> {
        let mut out = siblings.to_vec();
        for u in updates {
            let slot = out.iter_mut().find(|s| s.id == u.id).unwrap();
            slot.position = u.position;
        }
        out.sort_by_key(|s| s.position);
        out
    }

    fn positions(siblings: &[Slot]) -> Vec<i64> {
        let mut p: Vec<i64> = siblings.iter().map(|s| s.position).collect();
        p.sort();
        p
    }

    #[test]
    fn append_on_empty_scope_starts_at_zero() {
        assert_eq!(next_position(&[]), 0);
        let one = scope(1);
        assert_eq!(next_position(&one), 1);
    }

    #[test]
    fn append_after_gap_uses_max_plus_one() {
        let siblings = [
            Slot { id: Uuid::new_v4(), position: 0 },
            Slot { id: Uuid::new_v4(), position: 3 },
        ];
        assert_eq!(next_position(&siblings), 4);
    }

    #[test]
    fn same_target_is_a_no_op() {
        let siblings = scope(4);
        let plan = plan_reposition(&siblings, siblings[2].id, 2, 2);
        assert!(plan.is_empty());
    }

    #[test]
    fn move_front_to_back_shifts_intermediates_down() {
        // [0,1,2], move the head to 2. Former 1 lands on 0,
        // former 2 lands on 1, the moved list lands on 2.
        let siblings = scope(3);
        let moved = siblings[0].id;
        let plan = plan_reposition(&siblings, moved, 0, 2);
        let after = apply(&siblings, &plan);

        assert_eq!(after[0].id, siblings[1].id);
        assert_eq!(after[1].id, siblings[2].id);
        assert_eq!(after[2].id, moved);
        assert_eq!(positions(&after), vec![0, 1, 2]);
    }

    #[test]
    fn move_back_to_front_shifts_intermediates_up() {
        let siblings = scope(4);
        let moved = siblings[3].id;
        let plan = plan_reposition(&siblings, moved, 3, 0);
        let after = apply(&siblings, &plan);

        assert_eq!(after[0].id, moved);
        assert_eq!(after[1].id, siblings[0].id);
        assert_eq!(after[2].id, siblings[1].id);
        assert_eq!(after[3].id, siblings[2].id);
    }

    #[test]
    fn moved_item_is_excluded_from_the_shifted_range() {
        let siblings = scope(5);
        let moved = siblings[1].id;
        let plan = plan_reposition(&siblings, moved, 1, 3);

        // Exactly one write per displaced sibling plus the moved item.
        assert_eq!(plan.len(), 3);
        let moved_writes: Vec<_> = plan.iter().filter(|u| u.id == moved).collect();
        assert_eq!(moved_writes.len(), 1);
        assert_eq!(moved_writes[0].position, 3);
    }

    #[test]
    fn plan_is_order_independent() {
        // Applying the batch in reverse yields the same final state: no two
        // writes target the same row and no two target the same position.
        let siblings = scope(6);
        let moved = siblings[4].id;
        let plan = plan_reposition(&siblings, moved, 4, 1);

        let forward = apply(&siblings, &plan);
        let mut reversed = plan.clone();
        reversed.reverse();
        let backward = apply(&siblings, &reversed);
        assert_eq!(forward, backward);

        let mut targets: Vec<i64> = plan.iter().map(|u| u.position).collect();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), plan.len());
    }

    #[test]
    fn reposition_round_trip_restores_order() {
        // a -> b then b -> a is the identity on the whole scope.
        let siblings = scope(5);
        let moved = siblings[1].id;

        let there = apply(&siblings, &plan_reposition(&siblings, moved, 1, 4));
        let back = apply(&there, &plan_reposition(&there, moved, 4, 1));

        let original_order: Vec<Uuid> = siblings.iter().map(|s| s.id).collect();
        let restored_order: Vec<Uuid> = back.iter().map(|s| s.id).collect();
        assert_eq!(original_order, restored_order);
    }

    #[test]
    fn density_holds_across_random_moves() {
        // In-range repositions keep positions exactly {0..n-1}.
        let mut siblings = scope(7);
        let moves = [(0, 6), (3, 1), (6, 2), (2, 5), (1, 0), (4, 4)];

        for (from, to) in moves {
            let moved = siblings
                .iter()
                .find(|s| s.position == from)
                .map(|s| s.id)
                .unwrap();
            let plan = plan_reposition(&siblings, moved, from, to);
            siblings = apply(&siblings, &plan);
            assert_eq!(positions(&siblings), (0..7).collect::<Vec<i64>>());
        }
    }

    #[test]
    fn unoccupied_target_passes_through_without_shifting() {
        // Requesting a slot beyond the current tail writes the moved item
        // there and leaves every other sibling alone.
        let siblings = scope(3);
        let moved = siblings[1].id;
        let plan = plan_reposition(&siblings, moved, 1, 9);

        assert_eq!(
            plan,
            vec![PositionUpdate { id: moved, position: 9 }]
        );

        let after = apply(&siblings, &plan);
        assert_eq!(positions(&after), vec![0, 2, 9]);
    }

    #[test]
    fn pass_through_keeps_later_appends_consistent() {
        // After a pass-through the scope is gappy but append still lands
        // above everything.
        let siblings = scope(2);
        let plan = plan_reposition(&siblings, siblings[0].id, 0, 5);
        let after = apply(&siblings, &plan);
        assert_eq!(next_position(&after), 6);
    }

    #[test]
    fn ids_stay_unique_per_position_after_any_plan() {
        let siblings = scope(5);
        for target in 0..5 {
            let plan = plan_reposition(&siblings, siblings[2].id, 2, target);
            let after = apply(&siblings, &plan);
            let unique: BTreeMap<i64, Uuid> =
                after.iter().map(|s| (s.position, s.id)).collect();
            assert_eq!(unique.len(), after.len());
        }
    }
}
