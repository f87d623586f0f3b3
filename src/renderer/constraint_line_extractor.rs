use tracing::debug;

use crate::extraction::config::ExtractorConfig;
use crate::extraction::error::Result;
use crate::extraction::executor::{ConstraintExtractor, ExtractionStats};
use crate::extraction::job_planner::ConstraintCategories;
use crate::physics::bodies::Bodies;
use crate::physics::constraints::contact::{Contact1, Contact1OneBody};
use crate::physics::constraints::{
    BallSocket, CenterDistanceConstraint, ConstraintDescription, DistanceLimit, OneBodyLinearServo,
};
use crate::physics::solver::Solver;
use crate::renderer::line_extractors::{
    BallSocketLineExtractor, CenterDistanceLineExtractor, Contact1LineExtractor,
    Contact1OneBodyLineExtractor, DistanceLimitLineExtractor, OneBodyLinearServoLineExtractor,
};
use crate::renderer::line_instance::LineInstance;
use crate::utilities::collections::quicklist::QuickList;
use crate::utilities::memory::buffer_pool::BufferPool;
use crate::utilities::thread_dispatcher::ThreadDispatcher;

/// Builds debug lines for every constraint type with a line extractor.
///
/// Ships extractors for the ball socket, center distance, distance limit, one body linear servo and
/// single contact types. Other types can be registered through [`Self::extractor_mut`].
pub struct ConstraintLineExtractor {
    extractor: ConstraintExtractor<LineInstance>,
}

impl ConstraintLineExtractor {
    pub fn new(config: ExtractorConfig, pool: &mut BufferPool) -> Result<Self> {
        let mut extractor = ConstraintExtractor::new(config, pool)?;
        extractor.register(BallSocket::TYPE_ID, BallSocketLineExtractor);
        extractor.register(CenterDistanceConstraint::TYPE_ID, CenterDistanceLineExtractor);
        extractor.register(DistanceLimit::TYPE_ID, DistanceLimitLineExtractor);
        extractor.register(OneBodyLinearServo::TYPE_ID, OneBodyLinearServoLineExtractor);
        extractor.register(Contact1OneBody::TYPE_ID, Contact1OneBodyLineExtractor);
        extractor.register(Contact1::TYPE_ID, Contact1LineExtractor);
        debug!(
            registered = extractor.registry().registered_count(),
            "constraint line extractor ready"
        );
        Ok(Self { extractor })
    }

    #[inline]
    pub fn extractor(&self) -> &ConstraintExtractor<LineInstance> {
        &self.extractor
    }

    /// Gives access to the registry and the enabled flag, e.g. to add lines for custom types.
    #[inline]
    pub fn extractor_mut(&mut self) -> &mut ConstraintExtractor<LineInstance> {
        &mut self.extractor
    }

    /// Appends lines for joints and/or contacts to `lines`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_instances(
        &mut self,
        bodies: &Bodies,
        solver: &Solver,
        show_constraints: bool,
        show_contacts: bool,
        lines: &mut QuickList<LineInstance>,
        pool: &mut BufferPool,
        dispatcher: &dyn ThreadDispatcher,
    ) -> ExtractionStats {
        let categories = ConstraintCategories {
            constraints: show_constraints,
            contacts: show_contacts,
        };
        self.extractor
            .add_instances(bodies, solver, &categories, lines, pool, dispatcher)
    }

    pub fn dispose(self, pool: &mut BufferPool) {
        self.extractor.dispose(pool);
    }
}
