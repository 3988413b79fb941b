//! Posed skeleton access through the ECS.
//!
//! Foot bones are found by [`Name`] among the descendants of the rig's
//! skeleton root and read from their [`GlobalTransform`]s. Component space is
//! the skeleton root's space.

use bevy::math::Affine3A;
use bevy::prelude::*;

use crate::backend::PoseSource;
use crate::config::FootPlacementParams;

/// A foot's source bone and the entity it resolved to.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct BoneSlot {
    pub bone: String,
    pub entity: Option<Entity>,
}

/// Resolved source bone entities of a rig, one per foot.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct FootBones {
    pub slots: Vec<BoneSlot>,
}

impl FootBones {
    /// Unresolved slots for the given feet.
    pub fn from_params(params: &[FootPlacementParams]) -> Self {
        Self {
            slots: params
                .iter()
                .map(|p| BoneSlot {
                    bone: p.source_bone.clone(),
                    entity: None,
                })
                .collect(),
        }
    }

    /// Entity of a bone, if resolved.
    pub fn entity(&self, bone: &str) -> Option<Entity> {
        self.slots
            .iter()
            .find(|slot| slot.bone == bone)
            .and_then(|slot| slot.entity)
    }

    pub fn is_resolved(&self) -> bool {
        self.slots.iter().all(|slot| slot.entity.is_some())
    }

    /// Resolve every slot that is unresolved or whose entity is gone.
    ///
    /// Skeleton scenes can finish spawning after the rig, so this is retried
    /// each frame until every bone is found. Returns whether all are resolved.
    pub fn resolve(
        &mut self,
        root: Entity,
        names: &Query<(Entity, &Name)>,
        parents: &Query<&ChildOf>,
    ) -> bool {
        for slot in &mut self.slots {
            if slot.entity.is_some_and(|entity| names.contains(entity)) {
                continue;
            }
            slot.entity = names
                .iter()
                .find(|(entity, name)| {
                    name.as_str() == slot.bone && is_descendant_of(*entity, root, parents)
                })
                .map(|(entity, _)| entity);
        }
        self.is_resolved()
    }
}

/// Whether `entity` is `root` or sits anywhere below it.
pub fn is_descendant_of(entity: Entity, root: Entity, parents: &Query<&ChildOf>) -> bool {
    let mut current = entity;
    loop {
        if current == root {
            return true;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => return false,
        }
    }
}

/// [`PoseSource`] reading resolved bone entities.
pub struct EntityPose<'a, 'w, 's> {
    root_inverse: Affine3A,
    bones: &'a FootBones,
    transforms: &'a Query<'w, 's, &'static GlobalTransform>,
}

impl<'a, 'w, 's> EntityPose<'a, 'w, 's> {
    pub fn new(
        root: &GlobalTransform,
        bones: &'a FootBones,
        transforms: &'a Query<'w, 's, &'static GlobalTransform>,
    ) -> Self {
        Self {
            root_inverse: root.affine().inverse(),
            bones,
            transforms,
        }
    }

    fn global(&self, bone: &str) -> Option<&GlobalTransform> {
        let entity = self.bones.entity(bone)?;
        self.transforms.get(entity).ok()
    }
}

impl PoseSource for EntityPose<'_, '_, '_> {
    fn bone_world_transform(&self, bone: &str) -> Option<Transform> {
        self.global(bone).map(GlobalTransform::compute_transform)
    }

    fn bone_component_location(&self, bone: &str) -> Option<Vec3> {
        let world = self.global(bone)?.translation();
        Some(self.root_inverse.transform_point3(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn spawn_skeleton(world: &mut World) -> (Entity, Entity, Entity) {
        let root = world
            .spawn((Name::new("root"), Transform::from_xyz(0.0, 1.0, 0.0)))
            .id();
        let shin = world
            .spawn((Name::new("shin_l"), Transform::from_xyz(0.1, -0.5, 0.0), ChildOf(root)))
            .id();
        let foot = world
            .spawn((Name::new("foot_l"), Transform::from_xyz(0.0, -0.4, 0.0), ChildOf(shin)))
            .id();
        (root, shin, foot)
    }

    #[test]
    fn from_params_starts_unresolved() {
        let bones = FootBones::from_params(&[
            FootPlacementParams::new("foot_l"),
            FootPlacementParams::new("foot_r"),
        ]);
        assert_eq!(bones.slots.len(), 2);
        assert!(!bones.is_resolved());
        assert_eq!(bones.entity("foot_l"), None);
    }

    #[test]
    fn resolves_bones_below_root_only() {
        let mut world = World::new();
        let (root, _, foot) = spawn_skeleton(&mut world);
        // Same name on another character.
        world.spawn(Name::new("foot_l"));

        let resolved = world
            .run_system_once(move |names: Query<(Entity, &Name)>, parents: Query<&ChildOf>| {
                let mut bones = FootBones::from_params(&[FootPlacementParams::new("foot_l")]);
                let all = bones.resolve(root, &names, &parents);
                (all, bones.entity("foot_l"))
            })
            .unwrap();

        assert_eq!(resolved, (true, Some(foot)));
    }

    #[test]
    fn missing_bone_stays_unresolved() {
        let mut world = World::new();
        let (root, _, _) = spawn_skeleton(&mut world);

        let all = world
            .run_system_once(move |names: Query<(Entity, &Name)>, parents: Query<&ChildOf>| {
                let mut bones = FootBones::from_params(&[
                    FootPlacementParams::new("foot_l"),
                    FootPlacementParams::new("foot_r"),
                ]);
                bones.resolve(root, &names, &parents)
            })
            .unwrap();

        assert!(!all);
    }

    #[test]
    fn entity_pose_reads_world_and_component_space() {
        let mut world = World::new();
        let root = world.spawn(GlobalTransform::from_xyz(5.0, 1.0, 0.0)).id();
        let foot = world.spawn(GlobalTransform::from_xyz(5.2, 0.1, -0.3)).id();

        let bones = FootBones {
            slots: vec![BoneSlot {
                bone: "foot_l".into(),
                entity: Some(foot),
            }],
        };

        let (world_location, component_location, unknown) = world
            .run_system_once(move |transforms: Query<&'static GlobalTransform>| {
                let root_transform = *transforms.get(root).unwrap();
                let pose = EntityPose::new(&root_transform, &bones, &transforms);
                (
                    pose.bone_world_transform("foot_l").map(|t| t.translation),
                    pose.bone_component_location("foot_l"),
                    pose.bone_world_transform("foot_r"),
                )
            })
            .unwrap();

        assert!((world_location.unwrap() - Vec3::new(5.2, 0.1, -0.3)).length() < 1e-5);
        assert!((component_location.unwrap() - Vec3::new(0.2, -0.9, -0.3)).length() < 1e-5);
        assert!(unknown.is_none());
    }
}
