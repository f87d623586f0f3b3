use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::type_batch::TypeBatch;

/// Contains a set of type batches whose constraints share no body references.
#[derive(Clone, Default)]
pub struct ConstraintBatch {
    /// Maps a type id to the index of its type batch. Types without a batch map to `None`.
    pub type_index_to_type_batch_index: Vec<Option<usize>>,
    pub type_batches: Vec<TypeBatch>,
}

impl ConstraintBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the index of the type batch holding constraints of the given type, if one exists.
    #[inline(always)]
    pub fn type_batch_index(&self, type_id: usize) -> Option<usize> {
        self.type_index_to_type_batch_index
            .get(type_id)
            .copied()
            .flatten()
    }

    /// Gets a reference to the type batch matching the given type id.
    #[inline(always)]
    pub fn get_type_batch(&self, type_id: usize) -> Option<&TypeBatch> {
        self.type_batch_index(type_id)
            .map(|index| &self.type_batches[index])
    }

    #[inline(always)]
    pub fn get_type_batch_mut(&mut self, type_id: usize) -> Option<&mut TypeBatch> {
        self.type_batch_index(type_id)
            .map(|index| &mut self.type_batches[index])
    }

    /// Gets the type batch for `D`, creating it if it does not exist yet.
    pub fn get_or_create_type_batch<D: ConstraintDescription>(
        &mut self,
        initial_capacity: usize,
    ) -> &mut TypeBatch {
        let index = match self.type_batch_index(D::TYPE_ID) {
            Some(index) => index,
            None => {
                if D::TYPE_ID >= self.type_index_to_type_batch_index.len() {
                    self.type_index_to_type_batch_index.resize(D::TYPE_ID + 1, None);
                }
                let index = self.type_batches.len();
                self.type_batches.push(TypeBatch::new::<D>(initial_capacity));
                self.type_index_to_type_batch_index[D::TYPE_ID] = Some(index);
                index
            }
        };
        &mut self.type_batches[index]
    }

    /// Number of constraint slots across every type batch, holes included.
    pub fn constraint_count(&self) -> usize {
        self.type_batches
            .iter()
            .map(|type_batch| type_batch.constraint_count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::constraints::ball_socket::BallSocket;
    use crate::physics::constraints::contact::Contact1;

    #[test]
    fn type_batches_are_created_once_per_type() {
        let mut batch = ConstraintBatch::new();
        assert!(batch.get_type_batch(BallSocket::TYPE_ID).is_none());
        batch.get_or_create_type_batch::<BallSocket>(8);
        batch.get_or_create_type_batch::<Contact1>(8);
        batch.get_or_create_type_batch::<BallSocket>(8);
        assert_eq!(batch.type_batches.len(), 2);
        assert_eq!(batch.type_batch_index(BallSocket::TYPE_ID), Some(0));
        assert_eq!(batch.get_type_batch(Contact1::TYPE_ID).map(|tb| tb.type_id), Some(Contact1::TYPE_ID));
        assert_eq!(batch.type_batch_index(1000), None);
    }
}
