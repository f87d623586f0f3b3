use glam::Vec3;

use crate::extraction::type_extractor::LaneExtractor;
use crate::physics::bodies::Bodies;
use crate::physics::constraints::body_references::{OneBodyReferences, TwoBodyReferences};
use crate::physics::constraints::contact::{Contact1OneBodyPrestepData, Contact1PrestepData};
use crate::physics::constraints::{
    BallSocketPrestepData, CenterDistancePrestepData, DistanceLimitPrestepData,
    OneBodyLinearServoPrestepData,
};
use crate::renderer::line_instance::LineInstance;
use crate::utilities::collections::quicklist::QuickList;
use crate::utilities::gather_scatter::OffsetView;

const BACKGROUND_COLOR: Vec3 = Vec3::ZERO;
const OFFSET_COLOR: Vec3 = Vec3::new(0.2, 0.2, 1.0);
const ERROR_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const SATISFIED_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const TARGET_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);
const PENETRATING_CONTACT_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.0);
const SPECULATIVE_CONTACT_COLOR: Vec3 = Vec3::new(0.3, 0.3, 0.3);

/// Length of the line drawn along a contact normal.
pub const CONTACT_NORMAL_LENGTH: f32 = 0.2;

#[inline(always)]
fn push_line(output: &mut QuickList<LineInstance>, start: Vec3, end: Vec3, color: Vec3, tint: Vec3) {
    output.add_unsafely(LineInstance::new(start, end, color * tint, BACKGROUND_COLOR));
}

/// Body A to its anchor, body B to its anchor, and the gap between the anchors.
pub struct BallSocketLineExtractor;

impl LaneExtractor<LineInstance> for BallSocketLineExtractor {
    type Prestep = BallSocketPrestepData;
    type BodyReferences = TwoBodyReferences;

    fn items_per_constraint(&self) -> usize {
        3
    }

    fn extract(
        &self,
        prestep: OffsetView<'_, BallSocketPrestepData>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<LineInstance>,
    ) {
        let pose_a = bodies.get_pose(set_index, body_indices[0]);
        let pose_b = bodies.get_pose(set_index, body_indices[1]);
        let anchor_a = pose_a.transform(prestep.vector3(|p| &p.local_offset_a));
        let anchor_b = pose_b.transform(prestep.vector3(|p| &p.local_offset_b));
        push_line(output, pose_a.position, anchor_a, OFFSET_COLOR, tint);
        push_line(output, pose_b.position, anchor_b, OFFSET_COLOR, tint);
        push_line(output, anchor_a, anchor_b, ERROR_COLOR, tint);
    }
}

/// A line between the two body centers, colored by how far the distance is from the target.
pub struct CenterDistanceLineExtractor;

impl LaneExtractor<LineInstance> for CenterDistanceLineExtractor {
    type Prestep = CenterDistancePrestepData;
    type BodyReferences = TwoBodyReferences;

    fn items_per_constraint(&self) -> usize {
        1
    }

    fn extract(
        &self,
        prestep: OffsetView<'_, CenterDistancePrestepData>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<LineInstance>,
    ) {
        let position_a = bodies.get_pose(set_index, body_indices[0]).position;
        let position_b = bodies.get_pose(set_index, body_indices[1]).position;
        let target_distance = prestep.get(|p| &p.target_distance);
        let error = (position_a.distance(position_b) - target_distance).abs();
        let blend = (error / target_distance.max(1e-3)).min(1.0);
        let color = SATISFIED_COLOR.lerp(ERROR_COLOR, blend);
        push_line(output, position_a, position_b, color, tint);
    }
}

/// Offsets to both anchors plus the anchor separation, red while outside the distance range.
pub struct DistanceLimitLineExtractor;

impl LaneExtractor<LineInstance> for DistanceLimitLineExtractor {
    type Prestep = DistanceLimitPrestepData;
    type BodyReferences = TwoBodyReferences;

    fn items_per_constraint(&self) -> usize {
        3
    }

    fn extract(
        &self,
        prestep: OffsetView<'_, DistanceLimitPrestepData>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<LineInstance>,
    ) {
        let pose_a = bodies.get_pose(set_index, body_indices[0]);
        let pose_b = bodies.get_pose(set_index, body_indices[1]);
        let anchor_a = pose_a.transform(prestep.vector3(|p| &p.local_offset_a));
        let anchor_b = pose_b.transform(prestep.vector3(|p| &p.local_offset_b));
        let distance = anchor_a.distance(anchor_b);
        let within_limits = distance >= prestep.get(|p| &p.minimum_distance)
            && distance <= prestep.get(|p| &p.maximum_distance);
        let separation_color = if within_limits {
            SATISFIED_COLOR
        } else {
            ERROR_COLOR
        };
        push_line(output, pose_a.position, anchor_a, OFFSET_COLOR, tint);
        push_line(output, pose_b.position, anchor_b, OFFSET_COLOR, tint);
        push_line(output, anchor_a, anchor_b, separation_color, tint);
    }
}

/// Body center to its anchor, and the anchor to the servo target.
pub struct OneBodyLinearServoLineExtractor;

impl LaneExtractor<LineInstance> for OneBodyLinearServoLineExtractor {
    type Prestep = OneBodyLinearServoPrestepData;
    type BodyReferences = OneBodyReferences;

    fn items_per_constraint(&self) -> usize {
        2
    }

    fn extract(
        &self,
        prestep: OffsetView<'_, OneBodyLinearServoPrestepData>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<LineInstance>,
    ) {
        let pose = bodies.get_pose(set_index, body_indices[0]);
        let anchor = pose.transform(prestep.vector3(|p| &p.local_offset));
        let target = prestep.vector3(|p| &p.target);
        push_line(output, pose.position, anchor, OFFSET_COLOR, tint);
        push_line(output, anchor, target, TARGET_COLOR, tint);
    }
}

#[inline(always)]
fn push_contact(output: &mut QuickList<LineInstance>, contact: Vec3, normal: Vec3, depth: f32, tint: Vec3) {
    let color = if depth >= 0.0 {
        PENETRATING_CONTACT_COLOR
    } else {
        SPECULATIVE_CONTACT_COLOR
    };
    push_line(output, contact, contact + normal * CONTACT_NORMAL_LENGTH, color, tint);
}

/// The contact normal drawn from the contact point.
pub struct Contact1OneBodyLineExtractor;

impl LaneExtractor<LineInstance> for Contact1OneBodyLineExtractor {
    type Prestep = Contact1OneBodyPrestepData;
    type BodyReferences = OneBodyReferences;

    fn items_per_constraint(&self) -> usize {
        1
    }

    fn extract(
        &self,
        prestep: OffsetView<'_, Contact1OneBodyPrestepData>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<LineInstance>,
    ) {
        let position_a = bodies.get_pose(set_index, body_indices[0]).position;
        let contact = position_a + prestep.vector3(|p| &p.contact0.offset_a);
        let depth = prestep.get(|p| &p.contact0.depth);
        push_contact(output, contact, prestep.vector3(|p| &p.normal), depth, tint);
    }
}

pub struct Contact1LineExtractor;

impl LaneExtractor<LineInstance> for Contact1LineExtractor {
    type Prestep = Contact1PrestepData;
    type BodyReferences = TwoBodyReferences;

    fn items_per_constraint(&self) -> usize {
        1
    }

    fn extract(
        &self,
        prestep: OffsetView<'_, Contact1PrestepData>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<LineInstance>,
    ) {
        let position_a = bodies.get_pose(set_index, body_indices[0]).position;
        let contact = position_a + prestep.vector3(|p| &p.contact0.offset_a);
        let depth = prestep.get(|p| &p.contact0.depth);
        push_contact(output, contact, prestep.vector3(|p| &p.normal), depth, tint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body_properties::RigidPose;
    use crate::physics::constraints::{
        ConstraintDescription, DistanceLimit, OneBodyLinearServo, ServoSettings, SpringSettings,
    };
    use crate::renderer::line_instance::pack_color;
    use crate::utilities::gather_scatter::GatherScatter;
    use crate::utilities::memory::buffer_pool::BufferPool;
    use crate::utilities::vector::VECTOR_WIDTH;
    use glam::Quat;

    fn run<E: LaneExtractor<LineInstance>>(
        extractor: &E,
        prestep: &E::Prestep,
        lane: usize,
        body_indices: &[usize],
        bodies: &Bodies,
    ) -> Vec<LineInstance> {
        let mut pool = BufferPool::new();
        let mut output = QuickList::with_capacity(extractor.items_per_constraint(), &mut pool);
        extractor.extract(
            GatherScatter::offset_view(prestep, lane),
            0,
            body_indices,
            bodies,
            Vec3::ONE,
            &mut output,
        );
        assert_eq!(output.count(), extractor.items_per_constraint());
        let lines = output.iter().copied().collect();
        output.dispose(&mut pool);
        lines
    }

    #[test]
    fn distance_limit_flags_violations() {
        let mut bodies = Bodies::new();
        bodies.add(RigidPose::from_position(Vec3::ZERO));
        bodies.add(RigidPose::new(Vec3::new(5.0, 0.0, 0.0), Quat::from_rotation_z(std::f32::consts::PI)));
        let lane = VECTOR_WIDTH - 1;
        let mut prestep = GatherScatter::zeroed::<DistanceLimitPrestepData>();
        DistanceLimit::new(Vec3::X, Vec3::X, 1.0, 2.0, SpringSettings::new(5.0, 1.0))
            .apply_description(&mut prestep, lane);
        let lines = run(&DistanceLimitLineExtractor, &prestep, lane, &[0, 1], &bodies);
        assert_eq!(lines[0].start, Vec3::ZERO);
        assert!(lines[0].end.abs_diff_eq(Vec3::X, 1e-5));
        // Body B is flipped, so its anchor sits at x = 4 and the anchors are 3 apart.
        assert!(lines[1].end.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
        assert_eq!(lines[2].packed_color, pack_color(ERROR_COLOR));

        DistanceLimit::new(Vec3::X, Vec3::X, 1.0, 4.0, SpringSettings::new(5.0, 1.0))
            .apply_description(&mut prestep, lane);
        let lines = run(&DistanceLimitLineExtractor, &prestep, lane, &[0, 1], &bodies);
        assert_eq!(lines[2].packed_color, pack_color(SATISFIED_COLOR));
    }

    #[test]
    fn servo_points_at_target() {
        let mut bodies = Bodies::new();
        bodies.add(RigidPose::from_position(Vec3::new(0.0, 1.0, 0.0)));
        let mut prestep = GatherScatter::zeroed::<OneBodyLinearServoPrestepData>();
        OneBodyLinearServo {
            local_offset: Vec3::Z,
            target: Vec3::new(3.0, 3.0, 3.0),
            servo_settings: ServoSettings::DEFAULT,
            spring_settings: SpringSettings::new(5.0, 1.0),
        }
        .apply_description(&mut prestep, 0);
        let lines = run(&OneBodyLinearServoLineExtractor, &prestep, 0, &[0], &bodies);
        assert_eq!(lines[0].end, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(lines[1].start, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(lines[1].end, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn contacts_are_colored_by_depth() {
        let mut bodies = Bodies::new();
        bodies.add(RigidPose::from_position(Vec3::new(1.0, 0.0, 0.0)));
        let mut prestep = GatherScatter::zeroed::<Contact1OneBodyPrestepData>();
        prestep.contact0.offset_a.write_slot(Vec3::new(0.0, -0.5, 0.0), 0);
        prestep.contact0.depth[0] = -0.1;
        prestep.normal.write_slot(Vec3::Y, 0);
        let lines = run(&Contact1OneBodyLineExtractor, &prestep, 0, &[0], &bodies);
        assert_eq!(lines[0].start, Vec3::new(1.0, -0.5, 0.0));
        assert_eq!(lines[0].end, Vec3::new(1.0, -0.5 + CONTACT_NORMAL_LENGTH, 0.0));
        assert_eq!(lines[0].packed_color, pack_color(SPECULATIVE_CONTACT_COLOR));
    }
}
