use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, instrument};

use crate::extraction::accumulator::OutputAccumulator;
use crate::extraction::config::ExtractorConfig;
use crate::extraction::error::Result;
use crate::extraction::job_planner::{self, BatchFilter, ExtractionJob};
use crate::extraction::registry::ExtractorRegistry;
use crate::extraction::type_extractor::LaneExtractor;
use crate::physics::bodies::Bodies;
use crate::physics::solver::Solver;
use crate::utilities::collections::quicklist::QuickList;
use crate::utilities::memory::buffer_pool::BufferPool;
use crate::utilities::thread_dispatcher::{ParallelLooper, ThreadDispatcher};

/// Summary of one extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionStats {
    /// Jobs executed after splitting.
    pub job_count: usize,
    /// Output capacity reserved before the pass, counting items already in the output.
    pub estimated_capacity: usize,
    /// Output count after the pass.
    pub output_count: usize,
}

/// A job together with the private list it extracts into.
struct PendingJob<T> {
    job: ExtractionJob,
    items: QuickList<T>,
}

/// Everything a worker reads during a pass. Nothing in here is written while jobs run.
struct ExtractionContext<'a, T> {
    bodies: &'a Bodies,
    solver: &'a Solver,
    registry: &'a ExtractorRegistry<T>,
    config: &'a ExtractorConfig,
}

impl<T: 'static> ExtractionContext<'_, T> {
    fn execute(&self, job: &ExtractionJob, items: &mut QuickList<T>) {
        let type_batch = &self.solver.sets[job.set_index].batches[job.batch_index].type_batches
            [job.type_batch_index];
        let Some(extractor) = self.registry.get(type_batch.type_id) else {
            debug_assert!(false, "Jobs are only created for registered types.");
            return;
        };
        extractor.extract_range(
            self.bodies,
            job.set_index,
            type_batch,
            job.constraint_start,
            job.constraint_count,
            self.config.tint_for_set(job.set_index),
            items,
        );
    }
}

/// Walks every registered type batch of a solver in parallel and appends per-constraint items to
/// an output list.
pub struct ConstraintExtractor<T> {
    registry: ExtractorRegistry<T>,
    jobs: QuickList<ExtractionJob>,
    config: ExtractorConfig,
    enabled: bool,
}

impl<T: Copy + Send + Sync + 'static> ConstraintExtractor<T> {
    pub fn new(config: ExtractorConfig, pool: &mut BufferPool) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: ExtractorRegistry::new(),
            jobs: QuickList::with_capacity(config.initial_job_capacity, pool),
            config,
            enabled: true,
        })
    }

    #[inline]
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &ExtractorRegistry<T> {
        &self.registry
    }

    /// Registration is setup work; passes borrow the registry immutably.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut ExtractorRegistry<T> {
        &mut self.registry
    }

    pub fn register<E: LaneExtractor<T>>(&mut self, type_id: usize, extractor: E) {
        self.registry.register_lane_extractor(type_id, extractor);
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled extractor leaves the output untouched.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Extracts items for every registered type batch that passes `filter`, appending them after
    /// the items already in `output`.
    ///
    /// Items of one job stay in constraint order; the order of jobs in the output is unspecified.
    #[instrument(skip_all)]
    pub fn add_instances(
        &mut self,
        bodies: &Bodies,
        solver: &Solver,
        filter: &dyn BatchFilter,
        output: &mut QuickList<T>,
        pool: &mut BufferPool,
        dispatcher: &dyn ThreadDispatcher,
    ) -> ExtractionStats {
        if !self.enabled {
            return ExtractionStats {
                job_count: 0,
                estimated_capacity: output.count(),
                output_count: output.count(),
            };
        }
        self.jobs.clear();
        let needed_capacity = job_planner::plan_jobs(
            solver,
            &self.registry,
            filter,
            output.count(),
            &mut self.jobs,
            pool,
        );
        let planned_job_count = self.jobs.count();
        let maximum_job_size = job_planner::maximum_job_size(
            needed_capacity,
            self.config.jobs_per_worker,
            dispatcher.thread_count(),
            self.config.maximum_job_size,
        );
        job_planner::split_jobs(&mut self.jobs, maximum_job_size, pool);
        debug!(
            planned_job_count,
            job_count = self.jobs.count(),
            maximum_job_size,
            needed_capacity,
            "planned extraction jobs"
        );

        output.ensure_capacity(needed_capacity, pool);
        let mut pending = pool.take::<PendingJob<T>>(self.jobs.count());
        for job in self.jobs.iter() {
            pending.push(PendingJob {
                job: *job,
                items: QuickList::with_capacity(job.item_capacity(), pool),
            });
        }

        let context = ExtractionContext {
            bodies,
            solver,
            registry: &self.registry,
            config: &self.config,
        };
        let accumulator = OutputAccumulator::new(output);
        let pass = panic::catch_unwind(AssertUnwindSafe(|| {
            ParallelLooper::for_each_mut(dispatcher, &mut pending, |_, pending_job| {
                context.execute(&pending_job.job, &mut pending_job.items);
                accumulator.append(pending_job.items.as_slice());
            });
        }));

        for pending_job in pending.drain(..) {
            pending_job.items.dispose(pool);
        }
        pool.return_buffer(pending);
        // An aborted pass leaves the output count where it was.
        let output_count = match pass {
            Ok(()) => accumulator.finish(),
            Err(payload) => panic::resume_unwind(payload),
        };
        debug!(output_count, "extraction pass complete");
        ExtractionStats {
            job_count: self.jobs.count(),
            estimated_capacity: needed_capacity,
            output_count,
        }
    }

    /// Returns the job list to the pool.
    pub fn dispose(self, pool: &mut BufferPool) {
        self.jobs.dispose(pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::error::ExtractionError;
    use crate::extraction::job_planner::ConstraintCategories;
    use crate::physics::body_properties::RigidPose;
    use crate::physics::constraints::center_distance_constraint::{
        CenterDistanceConstraint, CenterDistancePrestepData,
    };
    use crate::physics::constraints::{ConstraintDescription, SpringSettings, TwoBodyReferences};
    use crate::utilities::gather_scatter::OffsetView;
    use crate::utilities::thread_dispatcher::SimpleThreadDispatcher;
    use glam::Vec3;
    use std::num::NonZeroUsize;

    /// Emits the target distance twice, tagged with the set index.
    struct Distances;

    impl LaneExtractor<(usize, f32)> for Distances {
        type Prestep = CenterDistancePrestepData;
        type BodyReferences = TwoBodyReferences;

        fn items_per_constraint(&self) -> usize {
            2
        }

        fn extract(
            &self,
            prestep: OffsetView<'_, CenterDistancePrestepData>,
            set_index: usize,
            _: &[usize],
            _: &Bodies,
            _: Vec3,
            output: &mut QuickList<(usize, f32)>,
        ) {
            let distance = prestep.get(|p| &p.target_distance);
            output.add_unsafely((set_index, distance));
            output.add_unsafely((set_index, -distance));
        }
    }

    /// Panics on the constraint targeting a distance of 7.
    struct FailsOnSeven;

    impl LaneExtractor<(usize, f32)> for FailsOnSeven {
        type Prestep = CenterDistancePrestepData;
        type BodyReferences = TwoBodyReferences;

        fn items_per_constraint(&self) -> usize {
            1
        }

        fn extract(
            &self,
            prestep: OffsetView<'_, CenterDistancePrestepData>,
            set_index: usize,
            _: &[usize],
            _: &Bodies,
            _: Vec3,
            output: &mut QuickList<(usize, f32)>,
        ) {
            let distance = prestep.get(|p| &p.target_distance);
            assert!(distance != 7.0, "unsupported distance");
            output.add_unsafely((set_index, distance));
        }
    }

    fn scene(count: usize) -> (Bodies, Solver) {
        let mut bodies = Bodies::new();
        let a = bodies.add(RigidPose::IDENTITY);
        let b = bodies.add(RigidPose::IDENTITY);
        let mut solver = Solver::new(16);
        for i in 0..count {
            let description = CenterDistanceConstraint::new(i as f32, SpringSettings::new(5.0, 1.0));
            solver.add_constraint(0, 0, &bodies, &[a, b], &description);
        }
        (bodies, solver)
    }

    fn extractor(pool: &mut BufferPool) -> ConstraintExtractor<(usize, f32)> {
        let mut extractor = ConstraintExtractor::new(ExtractorConfig::default(), pool).unwrap();
        extractor.register(CenterDistanceConstraint::TYPE_ID, Distances);
        extractor
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut pool = BufferPool::new();
        let result = ConstraintExtractor::<u32>::new(
            ExtractorConfig::default().with_maximum_job_size(0),
            &mut pool,
        );
        assert!(matches!(result, Err(ExtractionError::InvalidMaximumJobSize(0))));
    }

    #[test]
    fn pass_appends_after_existing_items() {
        let (bodies, solver) = scene(100);
        let mut pool = BufferPool::new();
        let mut extractor = extractor(&mut pool);
        let dispatcher = SimpleThreadDispatcher::new(NonZeroUsize::new(4).unwrap());
        let mut output = QuickList::with_capacity(4, &mut pool);
        output.add((usize::MAX, 0.0), &mut pool);
        let outstanding = pool.outstanding_count();

        let stats = extractor.add_instances(
            &bodies,
            &solver,
            &ConstraintCategories::ALL,
            &mut output,
            &mut pool,
            &dispatcher,
        );
        assert_eq!(stats.estimated_capacity, 201);
        assert_eq!(stats.output_count, 201);
        // 200 items over 4 workers with 4 jobs each caps jobs at 12 constraints.
        assert_eq!(stats.job_count, 9);
        assert_eq!(output.count(), 201);
        assert_eq!(output[0].0, usize::MAX);

        let mut distances: Vec<f32> = output.iter().skip(1).map(|item| item.1).filter(|d| *d > 0.0).collect();
        distances.sort_by(f32::total_cmp);
        assert_eq!(distances, (1..100).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(pool.outstanding_count(), outstanding);

        output.dispose(&mut pool);
        extractor.dispose(&mut pool);
        assert_eq!(pool.outstanding_count(), 0);
    }

    #[test]
    fn aborted_pass_returns_job_buffers() {
        let (bodies, solver) = scene(40);
        let mut pool = BufferPool::new();
        let mut extractor = ConstraintExtractor::new(ExtractorConfig::default(), &mut pool).unwrap();
        extractor.register(CenterDistanceConstraint::TYPE_ID, FailsOnSeven);
        let dispatcher = SimpleThreadDispatcher::new(NonZeroUsize::new(4).unwrap());
        let mut output = QuickList::with_capacity(4, &mut pool);
        output.add((usize::MAX, 0.0), &mut pool);
        let outstanding = pool.outstanding_count();

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            extractor.add_instances(
                &bodies,
                &solver,
                &ConstraintCategories::ALL,
                &mut output,
                &mut pool,
                &dispatcher,
            )
        }));
        assert!(result.is_err());
        assert_eq!(pool.outstanding_count(), outstanding);
        assert_eq!(output.count(), 1);

        output.dispose(&mut pool);
        extractor.dispose(&mut pool);
        assert_eq!(pool.outstanding_count(), 0);
    }

    #[test]
    fn disabled_extractor_leaves_output_alone() {
        let (bodies, solver) = scene(10);
        let mut pool = BufferPool::new();
        let mut extractor = extractor(&mut pool);
        extractor.set_enabled(false);
        let mut output = QuickList::default();
        let stats = extractor.add_instances(
            &bodies,
            &solver,
            &ConstraintCategories::ALL,
            &mut output,
            &mut pool,
            &SimpleThreadDispatcher::new(NonZeroUsize::MIN),
        );
        assert_eq!(stats, ExtractionStats::default());
        assert!(output.is_empty());
        assert!(!extractor.enabled());
    }

    #[test]
    fn empty_solver_produces_nothing() {
        let (bodies, solver) = scene(0);
        let mut pool = BufferPool::new();
        let mut extractor = extractor(&mut pool);
        let mut output = QuickList::default();
        let stats = extractor.add_instances(
            &bodies,
            &solver,
            &ConstraintCategories::ALL,
            &mut output,
            &mut pool,
            &SimpleThreadDispatcher::new(NonZeroUsize::MIN),
        );
        assert_eq!(stats.output_count, 0);
        assert!(output.is_empty());
    }
}
