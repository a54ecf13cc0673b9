use std::ops::{Add, Mul, Sub};

use super::entity::{Component, Entity, EntityId, EntityIdAllocator};
use super::input::InputSnapshot;
use super::rendering::Renderer;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalized(self) -> Vec2 {
        let length = self.length();
        if length > 0.0 {
            Vec2 {
                x: self.x / length,
                y: self.y / length,
            }
        } else {
            Vec2::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn Renderer);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
struct TrackedEntity {
    tag: String,
    id: EntityId,
    position: Vec2,
}

/// Read-only facts about the live set captured right before an update pass.
#[derive(Debug, Clone, Default)]
pub struct WorldView {
    tracked: Vec<TrackedEntity>,
}

impl WorldView {
    pub fn tracked_position(&self, tag: &str) -> Option<Vec2> {
        self.tracked
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.position)
    }

    pub fn tracked_id(&self, tag: &str) -> Option<EntityId> {
        self.tracked
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.id)
    }

    pub fn with_tracked(mut self, tag: impl Into<String>, id: EntityId, position: Vec2) -> Self {
        self.tracked.push(TrackedEntity {
            tag: tag.into(),
            id,
            position,
        });
        self
    }
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    watched_tags: Vec<String>,
    initialized: bool,
    paused: bool,
}

impl SceneWorld {
    pub fn initialize(&mut self) {
        self.initialized = true;
        for entity in &mut self.entities {
            entity.initialize();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Queues an entity for admission on the next flush. The live list is never touched here.
    pub fn add_game_object(&mut self, mut entity: Entity) -> EntityId {
        let id = self.allocator.allocate();
        entity.assign_id(id);
        self.pending_spawns.push(entity);
        id
    }

    pub fn remove_game_object(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id() == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id() == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    /// Flushes queued additions and removals without running entity updates.
    pub fn apply_pending(&mut self) {
        if !self.pending_spawns.is_empty() {
            let initialized = self.initialized;
            for mut entity in self.pending_spawns.drain(..) {
                if initialized {
                    entity.initialize();
                }
                self.entities.push(entity);
            }
        }

        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort();
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities
                .retain(|entity| pending.binary_search(&entity.id()).is_err());
            self.pending_despawns.clear();
        }
    }

    /// One frame: flush adds, flush removes, then (unless paused) update every active entity and
    /// drop inactive ones met along the way.
    pub fn update(&mut self, dt_seconds: f32) {
        self.apply_pending();
        if self.paused {
            return;
        }

        let view = self.capture_view();
        self.entities.retain_mut(|entity| {
            if !entity.is_active() {
                return false;
            }
            entity.update_components(dt_seconds, &view);
            true
        });
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for entity in self.entities.iter().filter(|entity| entity.is_active()) {
            entity.render_components(renderer);
        }
    }

    /// Tags whose first active holder's position is published to components each pass.
    pub fn watch_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.watched_tags.contains(&tag) {
            self.watched_tags.push(tag);
        }
    }

    pub fn capture_view(&self) -> WorldView {
        let mut view = WorldView::default();
        for tag in &self.watched_tags {
            let Some(entity) = self.find_by_tag(tag) else {
                continue;
            };
            if let Some(position) = entity.position() {
                view = view.with_tracked(tag.clone(), entity.id(), position);
            }
        }
        view
    }

    /// Drops inactive entities immediately and destroys the ones `is_dead` selects.
    pub fn reap(&mut self, mut is_dead: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain_mut(|entity| {
            if entity.is_active() && is_dead(&*entity) {
                entity.destroy();
            }
            entity.is_active()
        });
        before - self.entities.len()
    }

    pub fn clear(&mut self) {
        for entity in &mut self.entities {
            entity.destroy();
        }
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn pending_spawn_count(&self) -> usize {
        self.pending_spawns.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.is_active() && entity.tag() == tag)
    }

    pub fn find_by_tag_mut(&mut self, tag: &str) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|entity| entity.is_active() && entity.tag() == tag)
    }

    pub fn find_all_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .iter()
            .filter(move |entity| entity.is_active() && entity.tag() == tag)
    }

    pub fn find_with_component<C: Component>(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.is_active() && entity.has_component::<C>())
    }

    pub fn get_components<C: Component>(&self) -> impl Iterator<Item = &C> + '_ {
        self.entities
            .iter()
            .filter(|entity| entity.is_active())
            .filter_map(|entity| entity.get_component::<C>())
    }

    /// Ids of active entities carrying `tag`, in live-list order.
    pub fn ids_by_tag(&self, tag: &str) -> Vec<EntityId> {
        self.find_all_by_tag(tag).map(Entity::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::components::{Lifetime, Transform};
    use crate::app::entity::ComponentContext;

    struct FollowsPlayer {
        seen: Option<Vec2>,
    }

    impl Component for FollowsPlayer {
        fn update(&mut self, _dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
            self.seen = ctx.world.tracked_position("Player");
        }
    }

    fn sample(tag: &str, x: f32) -> Entity {
        Entity::new(tag, tag).with_component(Transform::at(x, 0.0))
    }

    #[test]
    fn add_game_object_defers_until_flush() {
        let mut world = SceneWorld::default();
        let id = world.add_game_object(sample("Minion", 1.0));

        assert_eq!(world.entity_count(), 0);
        assert!(world.find_entity(id).is_none());

        world.update(0.016);
        assert_eq!(world.entity_count(), 1);
        assert!(world.find_entity(id).is_some());
    }

    #[test]
    fn paused_world_still_flushes_queues() {
        let mut world = SceneWorld::default();
        world.set_paused(true);
        let keep = world.add_game_object(sample("Minion", 1.0));
        let drop = world.add_game_object(sample("Minion", 2.0));
        world.update(0.016);
        world.remove_game_object(drop);
        world.add_game_object(Entity::new("ttl", "Effect").with_component(Lifetime::new(0.01)));
        world.update(1.0);

        assert!(world.find_entity(keep).is_some());
        assert!(world.find_entity(drop).is_none());
        let effect = world.find_by_tag("Effect").expect("effect");
        let lifetime = effect.get_component::<Lifetime>().expect("lifetime");
        assert!((lifetime.remaining() - 0.01).abs() < 0.0001);
    }

    #[test]
    fn entities_initialize_on_admission_once_world_is_initialized() {
        let mut world = SceneWorld::default();
        let early = world.add_game_object(sample("Minion", 1.0));
        world.apply_pending();
        assert!(!world.find_entity(early).expect("early").is_initialized());

        world.initialize();
        let late = world.add_game_object(sample("Minion", 2.0));
        world.apply_pending();

        assert!(world.find_entity(early).expect("early").is_initialized());
        assert!(world.find_entity(late).expect("late").is_initialized());
    }

    #[test]
    fn inactive_entities_are_dropped_on_next_pass_and_hidden_from_queries() {
        let mut world = SceneWorld::default();
        let id = world.add_game_object(sample("Minion", 1.0));
        world.add_game_object(sample("Minion", 2.0));
        world.update(0.016);

        world.find_entity_mut(id).expect("entity").destroy();
        assert_eq!(world.find_all_by_tag("Minion").count(), 1);
        assert_eq!(world.entity_count(), 2);

        world.update(0.016);
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn watched_tag_position_reaches_components() {
        let mut world = SceneWorld::default();
        world.watch_tag("Player");
        world.add_game_object(sample("Player", 42.0));
        let follower = world.add_game_object(
            Entity::new("follower", "Minion").with_component(FollowsPlayer { seen: None }),
        );
        world.apply_pending();
        world.update(0.016);

        let seen = world
            .find_entity(follower)
            .and_then(|entity| entity.get_component::<FollowsPlayer>())
            .and_then(|component| component.seen);
        assert_eq!(seen, Some(Vec2::new(42.0, 0.0)));
    }

    #[test]
    fn reap_destroys_selected_entities() {
        let mut world = SceneWorld::default();
        world.add_game_object(sample("Minion", 1.0));
        world.add_game_object(sample("Player", 2.0));
        world.apply_pending();

        let removed = world.reap(|entity| entity.tag() == "Minion");
        assert_eq!(removed, 1);
        assert!(world.find_by_tag("Minion").is_none());
        assert!(world.find_by_tag("Player").is_some());
    }

    #[test]
    fn clear_discards_live_and_queued_entities() {
        let mut world = SceneWorld::default();
        world.add_game_object(sample("Minion", 1.0));
        world.apply_pending();
        world.add_game_object(sample("Minion", 2.0));
        world.clear();
        world.apply_pending();

        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn vec2_normalized_handles_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let unit = Vec2::new(3.0, 4.0).normalized();
        assert!((unit.length() - 1.0).abs() < 0.0001);
        assert!((Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)) - 5.0).abs() < 0.0001);
    }
}
