use std::any::Any;
use std::fmt;

use super::rendering::Renderer;
use super::scene::{Vec2, WorldView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Placeholder carried by an entity until a `SceneWorld` admits it.
    pub const UNASSIGNED: EntityId = EntityId(u64::MAX);
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behavior or data unit owned by exactly one [`Entity`].
///
/// Every hook has a no-op default so plain data components only need an empty impl.
pub trait Component: AsAny {
    fn initialize(&mut self) {}

    fn update(&mut self, _dt_seconds: f32, _ctx: &mut ComponentContext<'_>) {}

    fn render(&self, _owner: &Entity, _renderer: &mut dyn Renderer) {}

    fn enabled(&self) -> bool {
        true
    }

    fn destroy(&mut self) {}
}

/// Passed to [`Component::update`]. The component being updated is detached from `owner` for the
/// duration of the call, so sibling lookups never alias it.
pub struct ComponentContext<'a> {
    pub owner: &'a mut Entity,
    pub world: &'a WorldView,
}

impl ComponentContext<'_> {
    pub fn owner_position(&self) -> Option<Vec2> {
        self.owner.position()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ComponentKey(u32);

struct ComponentSlot {
    key: ComponentKey,
    component: Option<Box<dyn Component>>,
}

pub struct Entity {
    id: EntityId,
    name: String,
    tag: String,
    active: bool,
    initialized: bool,
    components: Vec<ComponentSlot>,
    next_component_key: u32,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("active", &self.active)
            .field("component_count", &self.components.len())
            .finish()
    }
}

impl Entity {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            tag: tag.into(),
            active: true,
            initialized: false,
            components: Vec::new(),
            next_component_key: 0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable classification. It is fixed at construction.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Called once when the entity joins an initialized world.
    pub fn initialize(&mut self) {
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Initializes `component` and appends it. Reach it afterwards through
    /// [`Entity::get_component_mut`].
    pub fn add_component<C: Component>(&mut self, mut component: C) {
        let key = ComponentKey(self.next_component_key);
        self.next_component_key = self.next_component_key.wrapping_add(1);
        component.initialize();
        self.components.push(ComponentSlot {
            key,
            component: Some(Box::new(component)),
        });
    }

    /// Builder form of [`Entity::add_component`] used by factories.
    pub fn with_component<C: Component>(mut self, component: C) -> Self {
        self.add_component(component);
        self
    }

    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components
            .iter()
            .filter_map(|slot| slot.component.as_deref())
            .find_map(|component| component.as_any().downcast_ref::<C>())
    }

    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .filter_map(|slot| slot.component.as_deref_mut())
            .find_map(|component| component.as_any_mut().downcast_mut::<C>())
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.get_component::<C>().is_some()
    }

    /// Tears down and drops the first component of type `C`.
    pub fn remove_component<C: Component>(&mut self) -> bool {
        let Some(index) = self.components.iter().position(|slot| {
            slot.component
                .as_deref()
                .is_some_and(|component| component.as_any().is::<C>())
        }) else {
            return false;
        };
        let mut slot = self.components.remove(index);
        if let Some(component) = slot.component.as_deref_mut() {
            component.destroy();
        }
        true
    }

    /// Updates every component present when the pass starts. Components may add or remove
    /// siblings, or destroy the owner, from inside their own update; disabled components are
    /// purged once the pass is over.
    pub fn update_components(&mut self, dt_seconds: f32, world: &WorldView) {
        let snapshot: Vec<ComponentKey> = self.components.iter().map(|slot| slot.key).collect();
        for key in snapshot {
            let Some(index) = self.slot_index(key) else {
                continue;
            };
            let Some(mut component) = self.components[index].component.take() else {
                continue;
            };

            if component.enabled() {
                let mut ctx = ComponentContext { owner: self, world };
                component.update(dt_seconds, &mut ctx);
            }

            match self.slot_index(key) {
                Some(index) => self.components[index].component = Some(component),
                // The owner was destroyed or the slot removed while detached.
                None => component.destroy(),
            }
        }

        self.components.retain(|slot| {
            slot.component
                .as_deref()
                .is_some_and(|component| component.enabled())
        });
    }

    pub fn render_components(&self, renderer: &mut dyn Renderer) {
        for component in self
            .components
            .iter()
            .filter_map(|slot| slot.component.as_deref())
        {
            component.render(self, renderer);
        }
    }

    /// Marks the entity dead and tears down every attached component.
    pub fn destroy(&mut self) {
        self.active = false;
        for slot in &mut self.components {
            if let Some(component) = slot.component.as_deref_mut() {
                component.destroy();
            }
        }
        self.components.clear();
    }

    pub fn position(&self) -> Option<Vec2> {
        self.get_component::<super::components::Transform>()
            .map(|transform| transform.position)
    }

    fn slot_index(&self, key: ComponentKey) -> Option<usize> {
        self.components.iter().position(|slot| slot.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::components::{Lifetime, Transform};

    #[derive(Default)]
    struct Counter {
        updates: u32,
        enabled: bool,
        destroyed: bool,
    }

    impl Component for Counter {
        fn update(&mut self, _dt_seconds: f32, _ctx: &mut ComponentContext<'_>) {
            self.updates += 1;
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        fn destroy(&mut self) {
            self.destroyed = true;
        }
    }

    struct DisableAfterFirstUpdate {
        enabled: bool,
    }

    impl Component for DisableAfterFirstUpdate {
        fn update(&mut self, _dt_seconds: f32, _ctx: &mut ComponentContext<'_>) {
            self.enabled = false;
        }

        fn enabled(&self) -> bool {
            self.enabled
        }
    }

    #[derive(Default)]
    struct CountsInit {
        initialized: u32,
    }

    impl Component for CountsInit {
        fn initialize(&mut self) {
            self.initialized += 1;
        }
    }

    struct SpawnsSibling;

    impl Component for SpawnsSibling {
        fn update(&mut self, _dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
            if !ctx.owner.has_component::<Counter>() {
                ctx.owner.add_component(Counter {
                    enabled: true,
                    ..Counter::default()
                });
            }
        }
    }

    struct MovesSibling;

    impl Component for MovesSibling {
        fn update(&mut self, _dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
            if let Some(transform) = ctx.owner.get_component_mut::<Transform>() {
                transform.position.x += 1.0;
            }
        }
    }

    fn update_once(entity: &mut Entity) {
        entity.update_components(0.1, &WorldView::default());
    }

    #[test]
    fn get_component_returns_first_match_or_none() {
        let entity = Entity::new("sample", "Sample").with_component(Transform::at(3.0, 4.0));

        let transform = entity.get_component::<Transform>().expect("transform");
        assert_eq!(transform.position, Vec2 { x: 3.0, y: 4.0 });
        assert!(entity.get_component::<Lifetime>().is_none());
        assert!(!entity.has_component::<Lifetime>());
    }

    #[test]
    fn added_component_is_initialized_and_reachable() {
        let mut entity = Entity::new("sample", "Sample");
        entity.add_component(CountsInit::default());
        entity.add_component(Transform::default());
        entity
            .get_component_mut::<Transform>()
            .expect("transform")
            .position
            .y = 9.0;

        assert_eq!(entity.get_component::<CountsInit>().expect("init").initialized, 1);
        assert_eq!(entity.position(), Some(Vec2 { x: 0.0, y: 9.0 }));
    }

    #[test]
    fn components_can_mutate_siblings_during_update() {
        let mut entity = Entity::new("sample", "Sample")
            .with_component(Transform::default())
            .with_component(MovesSibling);

        update_once(&mut entity);
        update_once(&mut entity);

        assert_eq!(entity.position(), Some(Vec2 { x: 2.0, y: 0.0 }));
    }

    #[test]
    fn sibling_added_mid_pass_waits_for_next_pass() {
        let mut entity = Entity::new("sample", "Sample").with_component(SpawnsSibling);

        update_once(&mut entity);
        assert_eq!(
            entity.get_component::<Counter>().expect("counter").updates,
            0
        );

        update_once(&mut entity);
        assert_eq!(
            entity.get_component::<Counter>().expect("counter").updates,
            1
        );
    }

    #[test]
    fn disabled_components_are_skipped_then_purged() {
        let mut entity = Entity::new("sample", "Sample")
            .with_component(Counter::default())
            .with_component(DisableAfterFirstUpdate { enabled: true })
            .with_component(Transform::default());

        update_once(&mut entity);

        assert!(!entity.has_component::<Counter>());
        assert!(!entity.has_component::<DisableAfterFirstUpdate>());
        assert!(entity.has_component::<Transform>());
        assert_eq!(entity.component_count(), 1);
    }

    #[test]
    fn self_destroying_owner_mid_update_leaves_entity_empty_and_inactive() {
        let mut entity = Entity::new("sample", "Sample")
            .with_component(Transform::default())
            .with_component(Lifetime::new(0.05))
            .with_component(Counter {
                enabled: true,
                ..Counter::default()
            });

        update_once(&mut entity);

        assert!(!entity.is_active());
        assert_eq!(entity.component_count(), 0);
        assert!(entity.get_component::<Counter>().is_none());

        update_once(&mut entity);
        assert_eq!(entity.component_count(), 0);
    }

    #[test]
    fn destroy_tears_down_every_component() {
        let mut entity = Entity::new("sample", "Sample").with_component(Counter::default());
        entity.destroy();

        assert!(!entity.is_active());
        assert_eq!(entity.component_count(), 0);
    }

    #[test]
    fn remove_component_drops_only_first_match() {
        let mut entity = Entity::new("sample", "Sample")
            .with_component(Transform::at(1.0, 1.0))
            .with_component(Transform::at(2.0, 2.0));

        assert!(entity.remove_component::<Transform>());
        assert_eq!(entity.position(), Some(Vec2 { x: 2.0, y: 2.0 }));
        assert!(entity.remove_component::<Transform>());
        assert!(!entity.remove_component::<Transform>());
    }
}
