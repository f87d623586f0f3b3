use crate::utilities::gather_scatter::BundleLayout;

/// Describes a constraint of one type and knows how it is packed into that type's batch.
///
/// The packed records are bundles; a description reads and writes a single lane of them.
pub trait ConstraintDescription: Copy {
    /// Type id of the batches holding this constraint type.
    const TYPE_ID: usize;

    /// Packed per-constraint data read by the solver's prestep.
    type Prestep: BundleLayout;

    /// Packed body references, one `Vector<i32>` per body.
    type BodyReferences: BundleLayout;

    /// Changes the batch-held memory at a given lane to match the description.
    fn apply_description(&self, prestep: &mut Self::Prestep, inner_index: usize);

    /// Creates a description from the batch-held memory at a given lane.
    fn build_description(prestep: &Self::Prestep, inner_index: usize) -> Self;
}
