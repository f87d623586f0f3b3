use tracing::trace;

use crate::extraction::registry::ExtractorRegistry;
use crate::physics::constraints::contact::is_contact_constraint_type;
use crate::physics::solver::Solver;
use crate::utilities::collections::quicklist::QuickList;
use crate::utilities::memory::buffer_pool::BufferPool;

/// A contiguous range of one type batch, extracted by a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionJob {
    pub set_index: usize,
    pub batch_index: usize,
    pub type_batch_index: usize,
    pub constraint_start: usize,
    pub constraint_count: usize,
    /// Offset of the job's first item in the conservative output layout.
    pub output_start: usize,
    pub items_per_constraint: usize,
}

impl ExtractionJob {
    /// Upper bound on the number of items the job produces.
    #[inline(always)]
    pub fn item_capacity(&self) -> usize {
        self.constraint_count * self.items_per_constraint
    }
}

/// Decides which type batches take part in a pass.
///
/// Called once per type batch with the set and batch holding it, so a filter can select by
/// island (set 0 is the awake set) as well as by constraint type.
pub trait BatchFilter: Sync {
    fn allows(&self, set_index: usize, batch_index: usize, type_id: usize) -> bool;
}

impl<F: Fn(usize, usize, usize) -> bool + Sync> BatchFilter for F {
    #[inline(always)]
    fn allows(&self, set_index: usize, batch_index: usize, type_id: usize) -> bool {
        self(set_index, batch_index, type_id)
    }
}

/// Filters type batches by whether they hold contact constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintCategories {
    /// Include non-contact constraints.
    pub constraints: bool,
    /// Include contact constraints.
    pub contacts: bool,
}

impl ConstraintCategories {
    pub const ALL: Self = Self {
        constraints: true,
        contacts: true,
    };
}

impl BatchFilter for ConstraintCategories {
    #[inline(always)]
    fn allows(&self, _: usize, _: usize, type_id: usize) -> bool {
        if is_contact_constraint_type(type_id) {
            self.contacts
        } else {
            self.constraints
        }
    }
}

/// Creates one job per registered, allowed type batch in every allocated set.
///
/// Jobs are appended to `jobs`. Returns the output capacity needed to hold every item, starting
/// from `initial_output_count`. The estimate counts holes, so it is conservative.
pub fn plan_jobs<T: 'static>(
    solver: &Solver,
    registry: &ExtractorRegistry<T>,
    filter: &dyn BatchFilter,
    initial_output_count: usize,
    jobs: &mut QuickList<ExtractionJob>,
    pool: &mut BufferPool,
) -> usize {
    let mut needed_capacity = initial_output_count;
    for (set_index, set) in solver.sets.iter().enumerate() {
        if !set.allocated() {
            continue;
        }
        for (batch_index, batch) in set.batches.iter().enumerate() {
            for (type_batch_index, type_batch) in batch.type_batches.iter().enumerate() {
                let Some(extractor) = registry.get(type_batch.type_id) else {
                    continue;
                };
                if !filter.allows(set_index, batch_index, type_batch.type_id) {
                    continue;
                }
                let items_per_constraint = extractor.items_per_constraint();
                jobs.add(
                    ExtractionJob {
                        set_index,
                        batch_index,
                        type_batch_index,
                        constraint_start: 0,
                        constraint_count: type_batch.constraint_count,
                        output_start: needed_capacity,
                        items_per_constraint,
                    },
                    pool,
                );
                needed_capacity += items_per_constraint * type_batch.constraint_count;
            }
        }
    }
    needed_capacity
}

/// Target number of constraints per job: enough jobs for every worker to get `jobs_per_worker`,
/// clamped to `1..=limit`.
#[inline]
pub fn maximum_job_size(
    needed_capacity: usize,
    jobs_per_worker: usize,
    worker_count: usize,
    limit: usize,
) -> usize {
    let divisor = jobs_per_worker.max(1) * worker_count.max(1);
    (needed_capacity / divisor).clamp(1, limit.max(1))
}

/// Splits every job larger than `maximum_job_size` into near-equal sub-jobs.
///
/// The first sub-job replaces the original in place and the rest are appended. Sub-job sizes differ
/// by at most one and together tile the original constraint and output ranges exactly.
pub fn split_jobs(jobs: &mut QuickList<ExtractionJob>, maximum_job_size: usize, pool: &mut BufferPool) {
    debug_assert!(maximum_job_size > 0);
    let original_job_count = jobs.count();
    for i in 0..original_job_count {
        let job = jobs[i];
        if job.constraint_count <= maximum_job_size {
            continue;
        }
        let subjob_count = job.constraint_count.div_ceil(maximum_job_size);
        let constraints_per_subjob = job.constraint_count / subjob_count;
        let remainder = job.constraint_count - constraints_per_subjob * subjob_count;
        let mut previous = ExtractionJob {
            constraint_count: constraints_per_subjob + usize::from(remainder > 0),
            ..job
        };
        jobs[i] = previous;
        trace!(?previous, subjob_count, "split job");
        for j in 1..subjob_count {
            let next = ExtractionJob {
                constraint_start: previous.constraint_start + previous.constraint_count,
                output_start: previous.output_start + previous.item_capacity(),
                constraint_count: constraints_per_subjob + usize::from(remainder > j),
                ..previous
            };
            jobs.add(next, pool);
            previous = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::bodies::Bodies;
    use crate::physics::body_properties::RigidPose;
    use crate::physics::constraints::contact::{ConstraintContactData, Contact1};
    use crate::physics::constraints::type_batch::TypeBatch;
    use crate::physics::constraints::{BallSocket, ConstraintDescription, SpringSettings};
    use crate::extraction::type_extractor::TypeExtractor;
    use glam::Vec3;

    struct Fixed(usize);

    impl TypeExtractor<u32> for Fixed {
        fn items_per_constraint(&self) -> usize {
            self.0
        }

        fn extract_range(
            &self,
            _: &Bodies,
            _: usize,
            _: &TypeBatch,
            _: usize,
            _: usize,
            _: Vec3,
            _: &mut QuickList<u32>,
        ) {
        }
    }

    fn job(constraint_count: usize, items_per_constraint: usize) -> ExtractionJob {
        ExtractionJob {
            set_index: 0,
            batch_index: 0,
            type_batch_index: 0,
            constraint_start: 0,
            constraint_count,
            output_start: 7,
            items_per_constraint,
        }
    }

    fn split(parent: ExtractionJob, maximum: usize) -> Vec<ExtractionJob> {
        let mut pool = BufferPool::new();
        let mut jobs = QuickList::with_capacity(1, &mut pool);
        jobs.add(parent, &mut pool);
        split_jobs(&mut jobs, maximum, &mut pool);
        let result = jobs.iter().copied().collect();
        jobs.dispose(&mut pool);
        result
    }

    fn assert_tiles(parent: ExtractionJob, subjobs: &[ExtractionJob]) {
        let mut constraint_cursor = parent.constraint_start;
        let mut output_cursor = parent.output_start;
        for subjob in subjobs {
            assert_eq!(subjob.constraint_start, constraint_cursor);
            assert_eq!(subjob.output_start, output_cursor);
            constraint_cursor += subjob.constraint_count;
            output_cursor += subjob.item_capacity();
        }
        assert_eq!(constraint_cursor, parent.constraint_start + parent.constraint_count);
        assert_eq!(output_cursor, parent.output_start + parent.item_capacity());
    }

    #[test]
    fn even_split() {
        let parent = job(100, 1);
        let subjobs = split(parent, 32);
        assert_eq!(subjobs.len(), 4);
        assert!(subjobs.iter().all(|subjob| subjob.constraint_count == 25));
        assert_tiles(parent, &subjobs);
    }

    #[test]
    fn remainder_goes_to_the_first_subjobs() {
        let parent = job(10, 3);
        let subjobs = split(parent, 3);
        let counts: Vec<_> = subjobs.iter().map(|subjob| subjob.constraint_count).collect();
        assert_eq!(counts, [3, 3, 2, 2]);
        assert_tiles(parent, &subjobs);
    }

    #[test]
    fn exact_multiples_split_evenly() {
        let parent = job(96, 2);
        let subjobs = split(parent, 32);
        assert_eq!(subjobs.len(), 3);
        assert_tiles(parent, &subjobs);
    }

    #[test]
    fn splitting_tiles_for_many_shapes() {
        for count in 1..200 {
            for maximum in [1, 2, 5, 7, 32] {
                let parent = job(count, 3);
                let subjobs = split(parent, maximum);
                assert!(subjobs.iter().all(|subjob| subjob.constraint_count <= maximum));
                let smallest = subjobs.iter().map(|s| s.constraint_count).min().unwrap();
                let largest = subjobs.iter().map(|s| s.constraint_count).max().unwrap();
                assert!(largest - smallest <= 1);
                assert_tiles(parent, &subjobs);
            }
        }
    }

    #[test]
    fn small_jobs_are_untouched() {
        let parent = job(32, 1);
        assert_eq!(split(parent, 32), [parent]);
    }

    #[test]
    fn job_size_is_clamped() {
        assert_eq!(maximum_job_size(0, 4, 8, 32), 1);
        assert_eq!(maximum_job_size(10, 4, 8, 32), 1);
        assert_eq!(maximum_job_size(320, 4, 8, 32), 10);
        assert_eq!(maximum_job_size(1_000_000, 4, 8, 32), 32);
        assert_eq!(maximum_job_size(100, 4, 0, 32), 25);
    }

    fn contact(depth: f32) -> Contact1 {
        Contact1 {
            contact0: ConstraintContactData {
                offset_a: Vec3::ZERO,
                penetration_depth: depth,
            },
            offset_b: Vec3::X,
            normal: Vec3::Y,
            friction_coefficient: 1.0,
            spring_settings: SpringSettings::new(30.0, 1.0),
            maximum_recovery_velocity: 2.0,
        }
    }

    fn scene() -> Solver {
        let mut bodies = Bodies::new();
        let a = bodies.add(RigidPose::IDENTITY);
        let b = bodies.add(RigidPose::IDENTITY);
        let c = bodies.add_to_set(2, RigidPose::IDENTITY);
        let d = bodies.add_to_set(2, RigidPose::IDENTITY);
        let joint = BallSocket {
            local_offset_a: Vec3::X,
            local_offset_b: -Vec3::X,
            spring_settings: SpringSettings::new(30.0, 1.0),
        };
        let mut solver = Solver::new(8);
        for _ in 0..3 {
            solver.add_constraint(0, 0, &bodies, &[a, b], &joint);
        }
        for _ in 0..2 {
            solver.add_constraint(0, 1, &bodies, &[a, b], &contact(0.1));
        }
        for _ in 0..4 {
            solver.add_constraint(2, 0, &bodies, &[c, d], &joint);
        }
        solver
    }

    fn plan(
        solver: &Solver,
        registry: &ExtractorRegistry<u32>,
        filter: &dyn BatchFilter,
    ) -> (Vec<ExtractionJob>, usize) {
        let mut pool = BufferPool::new();
        let mut jobs = QuickList::default();
        let needed = plan_jobs(solver, registry, filter, 5, &mut jobs, &mut pool);
        let result = jobs.iter().copied().collect();
        jobs.dispose(&mut pool);
        (result, needed)
    }

    #[test]
    fn plans_registered_type_batches() {
        let solver = scene();
        let mut registry = ExtractorRegistry::new();
        registry.register(BallSocket::TYPE_ID, Box::new(Fixed(3)));
        registry.register(Contact1::TYPE_ID, Box::new(Fixed(1)));

        let (jobs, needed) = plan(&solver, &registry, &ConstraintCategories::ALL);
        assert_eq!(jobs.len(), 3);
        assert_eq!(needed, 5 + 3 * 3 + 2 + 4 * 3);
        assert_eq!((jobs[0].set_index, jobs[0].batch_index, jobs[0].output_start), (0, 0, 5));
        assert_eq!((jobs[1].set_index, jobs[1].batch_index, jobs[1].output_start), (0, 1, 14));
        assert_eq!((jobs[2].set_index, jobs[2].constraint_count, jobs[2].output_start), (2, 4, 16));
    }

    #[test]
    fn unregistered_types_are_skipped() {
        let solver = scene();
        let mut registry = ExtractorRegistry::new();
        registry.register(Contact1::TYPE_ID, Box::new(Fixed(1)));
        let (jobs, needed) = plan(&solver, &registry, &ConstraintCategories::ALL);
        assert_eq!(jobs.len(), 1);
        assert_eq!(needed, 7);
    }

    #[test]
    fn filters_select_categories() {
        let solver = scene();
        let mut registry = ExtractorRegistry::new();
        registry.register(BallSocket::TYPE_ID, Box::new(Fixed(3)));
        registry.register(Contact1::TYPE_ID, Box::new(Fixed(1)));

        let contacts_only = ConstraintCategories {
            constraints: false,
            contacts: true,
        };
        let (jobs, _) = plan(&solver, &registry, &contacts_only);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].batch_index, 1);

        let (jobs, needed) = plan(&solver, &registry, &|_: usize, _: usize, _: usize| false);
        assert!(jobs.is_empty());
        assert_eq!(needed, 5);
    }

    #[test]
    fn filters_see_set_and_batch() {
        let solver = scene();
        let mut registry = ExtractorRegistry::new();
        registry.register(BallSocket::TYPE_ID, Box::new(Fixed(3)));
        registry.register(Contact1::TYPE_ID, Box::new(Fixed(1)));

        let awake_only = |set_index: usize, _: usize, _: usize| set_index == 0;
        let (jobs, needed) = plan(&solver, &registry, &awake_only);
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|job| job.set_index == 0));
        assert_eq!(needed, 5 + 3 * 3 + 2);

        let second_batch = |_: usize, batch_index: usize, _: usize| batch_index == 1;
        let (jobs, _) = plan(&solver, &registry, &second_batch);
        assert_eq!(jobs.len(), 1);
        assert_eq!((jobs[0].set_index, jobs[0].batch_index), (0, 1));
    }

    #[test]
    fn unallocated_sets_are_skipped() {
        let mut solver = scene();
        solver.sets[2].clear();
        let mut registry = ExtractorRegistry::new();
        registry.register(BallSocket::TYPE_ID, Box::new(Fixed(3)));
        let (jobs, _) = plan(&solver, &registry, &ConstraintCategories::ALL);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].set_index, 0);
    }
}
