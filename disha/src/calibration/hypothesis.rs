//! Heading hypotheses.

use rayon::prelude::*;

use crate::core::GridCoord;
use crate::trajectory::TrajectoryBuilder;

/// Number of hypotheses evaluated in parallel.
pub const HYPOTHESIS_COUNT: usize = 9;

/// Index of the hypothesis sitting on the base offset.
pub const CENTER_INDEX: usize = HYPOTHESIS_COUNT / 2;

/// One candidate heading offset with the trajectory it produces.
#[derive(Clone, Debug, PartialEq)]
pub struct Hypothesis {
    /// Slot index, 0..9
    pub index: usize,
    /// Heading offset applied to the gyro (degrees)
    pub offset: f64,
    /// Dead-reckoned points in grid coordinates
    pub trajectory: Vec<GridCoord>,
    /// Current dead-reckoned position
    pub position: GridCoord,
    /// Inactive hypotheses are skipped until the next epoch
    pub active: bool,
}

impl Hypothesis {
    /// Hypothesis with an empty trajectory at `position`.
    pub fn new(index: usize, offset: f64, position: GridCoord) -> Self {
        Self {
            index,
            offset,
            trajectory: Vec::new(),
            position,
            active: true,
        }
    }
}

/// Number of slots between `index` and the centre.
#[inline]
pub fn center_distance(index: usize) -> usize {
    index.abs_diff(CENTER_INDEX)
}

/// Offset of slot `index` around `base`.
#[inline]
pub fn slot_offset(base: f64, index: usize, spacing: f64) -> f64 {
    base + (index as f64 - CENTER_INDEX as f64) * spacing
}

/// The nine hypotheses.
#[derive(Clone, Debug, PartialEq)]
pub struct HypothesisSet {
    slots: Vec<Hypothesis>,
}

impl HypothesisSet {
    /// Nine active hypotheses at `origin` with empty trajectories.
    pub fn around(base: f64, spacing: f64, origin: GridCoord) -> Self {
        Self {
            slots: (0..HYPOTHESIS_COUNT)
                .map(|i| Hypothesis::new(i, slot_offset(base, i, spacing), origin))
                .collect(),
        }
    }

    /// Rebuild the nine hypotheses by replaying buffered steps.
    ///
    /// `anchor` is prepended to each trajectory when the epoch started with
    /// a seeded point.
    pub fn replayed(
        builder: &TrajectoryBuilder,
        base: f64,
        spacing: f64,
        origin: GridCoord,
        anchor: Option<GridCoord>,
        steps: &[(f64, f64)],
    ) -> Self {
        let slots = (0..HYPOTHESIS_COUNT)
            .into_par_iter()
            .map(|i| {
                let offset = slot_offset(base, i, spacing);
                let (replayed, position) = builder.replay(origin, steps, offset);
                let trajectory = anchor.into_iter().chain(replayed).collect();
                Hypothesis {
                    index: i,
                    offset,
                    trajectory,
                    position,
                    active: true,
                }
            })
            .collect();
        Self { slots }
    }

    /// All slots in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Hypothesis> {
        self.slots.iter()
    }

    /// Slot by index.
    pub fn get(&self, index: usize) -> Option<&Hypothesis> {
        self.slots.get(index)
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Hypothesis] {
        &mut self.slots
    }

    /// Number of active hypotheses.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|h| h.active).count()
    }

    /// Extend every active hypothesis by one step.
    pub fn extend(&mut self, builder: &TrajectoryBuilder, heading: f64, step_length: f64) {
        self.slots.par_iter_mut().filter(|h| h.active).for_each(|h| {
            let mut position = h.position;
            builder.step(
                &mut position,
                &mut h.trajectory,
                heading + h.offset,
                step_length,
            );
            h.position = position;
        });
    }

    /// Start a new epoch: clear trajectories, move every hypothesis to
    /// `position`, seeding it as the first point when `seed` is set.
    pub fn restart(&mut self, position: GridCoord, seed: bool) {
        for h in &mut self.slots {
            h.trajectory.clear();
            if seed {
                h.trajectory.push(position);
            }
            h.position = position;
            h.active = true;
        }
    }

    /// Re-space offsets around `base`.
    pub fn recenter(&mut self, base: f64, spacing: f64) {
        for h in &mut self.slots {
            h.offset = slot_offset(base, h.index, spacing);
        }
    }

    /// Copy the trajectory and position of `best` into every slot and
    /// reactivate all of them.
    pub fn collapse_onto(&mut self, best: usize) {
        let Some(source) = self.slots.get(best).cloned() else {
            return;
        };
        for h in &mut self.slots {
            if h.index != best {
                h.trajectory.clone_from(&source.trajectory);
                h.position = source.position;
            }
            h.active = true;
        }
    }

    /// Reactivate every slot.
    pub fn reactivate_all(&mut self) {
        for h in &mut self.slots {
            h.active = true;
        }
    }
}

impl Default for HypothesisSet {
    fn default() -> Self {
        Self::around(0.0, 5.0, GridCoord::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::TrajectoryConfig;

    #[test]
    fn test_offsets_symmetric() {
        let set = HypothesisSet::around(90.0, 5.0, GridCoord::ZERO);
        let offsets: Vec<f64> = set.iter().map(|h| h.offset).collect();
        assert_eq!(
            offsets,
            vec![70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0, 105.0, 110.0]
        );
        assert_eq!(center_distance(set.get(CENTER_INDEX).unwrap().index), 0);
        assert_eq!(center_distance(set.get(0).unwrap().index), 4);
    }

    #[test]
    fn test_replayed_matches_extend() {
        let builder = TrajectoryBuilder::new(TrajectoryConfig::default());
        let steps = [(0.0, 0.7), (0.0, 0.7), (10.0, 0.7)];

        let replayed = HypothesisSet::replayed(&builder, 0.0, 5.0, GridCoord::ZERO, None, &steps);

        let mut extended = HypothesisSet::around(0.0, 5.0, GridCoord::ZERO);
        for &(heading, length) in &steps {
            extended.extend(&builder, heading, length);
        }
        assert_eq!(replayed, extended);
    }

    #[test]
    fn test_anchor_prepended() {
        let builder = TrajectoryBuilder::new(TrajectoryConfig::default());
        let anchor = GridCoord::new(5, 5);
        let set = HypothesisSet::replayed(&builder, 0.0, 5.0, anchor, Some(anchor), &[(0.0, 0.7)]);
        for h in set.iter() {
            assert_eq!(h.trajectory.len(), 2);
            assert_eq!(h.trajectory[0], anchor);
        }
    }

    #[test]
    fn test_inactive_not_extended() {
        let builder = TrajectoryBuilder::new(TrajectoryConfig::default());
        let mut set = HypothesisSet::default();
        set.slots_mut()[2].active = false;
        set.extend(&builder, 0.0, 0.7);
        assert!(set.get(2).unwrap().trajectory.is_empty());
        assert_eq!(set.get(3).unwrap().trajectory.len(), 1);
        assert_eq!(set.active_count(), 8);
    }

    #[test]
    fn test_collapse_onto() {
        let builder = TrajectoryBuilder::new(TrajectoryConfig::default());
        let mut set = HypothesisSet::around(0.0, 45.0, GridCoord::ZERO);
        set.extend(&builder, 0.0, 1.0);
        set.slots_mut()[0].active = false;
        set.collapse_onto(6);

        let best = set.get(6).unwrap().clone();
        for h in set.iter() {
            assert!(h.active);
            assert_eq!(h.trajectory, best.trajectory);
            assert_eq!(h.position, best.position);
        }
        // offsets are untouched
        assert_eq!(set.get(0).unwrap().offset, -180.0);
    }

    #[test]
    fn test_restart_seeded() {
        let builder = TrajectoryBuilder::new(TrajectoryConfig::default());
        let mut set = HypothesisSet::default();
        set.extend(&builder, 0.0, 1.0);
        set.slots_mut()[1].active = false;

        let arrival = GridCoord::new(40, 12);
        set.restart(arrival, true);
        for h in set.iter() {
            assert_eq!(h.trajectory, vec![arrival]);
            assert_eq!(h.position, arrival);
            assert!(h.active);
        }

        set.restart(arrival, false);
        assert!(set.iter().all(|h| h.trajectory.is_empty()));
    }
}
