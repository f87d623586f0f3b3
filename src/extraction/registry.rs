use tracing::trace;

use crate::extraction::type_extractor::{LaneExtractor, TypeExtractor, TypedExtractor};

/// Maps constraint type ids to the extractor handling them.
///
/// Populated during setup; extraction passes only read it.
pub struct ExtractorRegistry<T> {
    extractors: Vec<Option<Box<dyn TypeExtractor<T>>>>,
}

impl<T: 'static> Default for ExtractorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ExtractorRegistry<T> {
    pub const INITIAL_CAPACITY: usize = 32;

    pub fn new() -> Self {
        let mut extractors = Vec::new();
        extractors.resize_with(Self::INITIAL_CAPACITY, || None);
        Self { extractors }
    }

    fn allocate_slot(&mut self, type_id: usize) -> &mut Option<Box<dyn TypeExtractor<T>>> {
        if type_id >= self.extractors.len() {
            self.extractors.resize_with(type_id + 1, || None);
        }
        &mut self.extractors[type_id]
    }

    /// Registers an extractor for a type id, replacing any previous registration.
    pub fn register(&mut self, type_id: usize, extractor: Box<dyn TypeExtractor<T>>) {
        trace!(
            type_id,
            items_per_constraint = extractor.items_per_constraint(),
            "registered extractor"
        );
        *self.allocate_slot(type_id) = Some(extractor);
    }

    /// Registers a lane extractor, wrapping it in a [`TypedExtractor`].
    pub fn register_lane_extractor<E: LaneExtractor<T>>(&mut self, type_id: usize, extractor: E) {
        self.register(type_id, Box::new(TypedExtractor::new::<T>(extractor)));
    }

    /// Gets the extractor for a type id, if one was registered.
    #[inline]
    pub fn get(&self, type_id: usize) -> Option<&dyn TypeExtractor<T>> {
        self.extractors.get(type_id)?.as_deref()
    }

    #[inline]
    pub fn is_registered(&self, type_id: usize) -> bool {
        self.get(type_id).is_some()
    }

    /// Number of type id slots, registered or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.extractors.len()
    }

    pub fn registered_count(&self) -> usize {
        self.extractors.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::bodies::Bodies;
    use crate::physics::constraints::type_batch::TypeBatch;
    use crate::utilities::collections::quicklist::QuickList;
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

    #[test]
    fn starts_with_initial_capacity() {
        let registry = ExtractorRegistry::<u32>::new();
        assert_eq!(registry.capacity(), 32);
        assert_eq!(registry.registered_count(), 0);
        assert!(registry.get(0).is_none());
        assert!(registry.get(10_000).is_none());
    }

    #[test]
    fn grows_to_fit_large_type_ids() {
        let mut registry = ExtractorRegistry::<u32>::new();
        registry.register(40, Box::new(Fixed(2)));
        assert_eq!(registry.capacity(), 41);
        assert!(registry.is_registered(40));
        assert!(!registry.is_registered(39));
        assert_eq!(registry.get(40).map(|e| e.items_per_constraint()), Some(2));
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = ExtractorRegistry::<u32>::new();
        registry.register(3, Box::new(Fixed(1)));
        registry.register(3, Box::new(Fixed(5)));
        assert_eq!(registry.registered_count(), 1);
        assert_eq!(registry.get(3).map(|e| e.items_per_constraint()), Some(5));
    }
}
