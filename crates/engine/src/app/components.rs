use std::f32::consts::TAU;

use rand::Rng;

use super::entity::{Component, ComponentContext, Entity};
use super::rendering::{Color, Particle, Renderer};
use super::scene::Vec2;

pub const DEFAULT_FRICTION: f32 = 0.98;
pub const MIN_MASS: f32 = 0.1;
pub const DAMAGE_PARTICLE_COUNT: usize = 8;
const DAMAGE_PARTICLE_COLOR: Color = Color::rgb(1.0, 0.0, 0.0);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2 { x, y },
        }
    }
}

impl Component for Transform {}

/// Force-integrated body. `extent` is the footprint used by arena clamping.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub extent: Vec2,
    mass: f32,
    friction: f32,
    force: Vec2,
}

impl PhysicsBody {
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            extent: Vec2::ZERO,
            mass: if mass > 0.0 { mass } else { 1.0 },
            friction: DEFAULT_FRICTION,
            force: Vec2::ZERO,
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.set_friction(friction);
        self
    }

    pub fn with_extent(mut self, width: f32, height: f32) -> Self {
        self.extent = Vec2 {
            x: width,
            y: height,
        };
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(MIN_MASS);
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction.clamp(0.0, 1.0);
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force = self.force + force;
    }

    pub fn accumulated_force(&self) -> Vec2 {
        self.force
    }

    /// Semi-implicit Euler step; returns the displacement and clears the force accumulator.
    pub fn integrate(&mut self, dt_seconds: f32) -> Vec2 {
        self.acceleration = self.force * (1.0 / self.mass.max(MIN_MASS));
        self.velocity = (self.velocity + self.acceleration * dt_seconds) * self.friction;
        self.force = Vec2::ZERO;
        self.velocity * dt_seconds
    }
}

impl Component for PhysicsBody {
    fn update(&mut self, dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
        let displacement = self.integrate(dt_seconds);
        if let Some(transform) = ctx.owner.get_component_mut::<Transform>() {
            transform.position = transform.position + displacement;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    pub fn set_health(&mut self, health: i32) {
        self.current = health.clamp(0, self.max);
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

impl Component for Health {}

/// Counts down and destroys its owner when it runs out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    total: f32,
    remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self {
            total: seconds,
            remaining: seconds,
        }
    }

    pub fn with_remaining(mut self, remaining: f32) -> Self {
        self.remaining = remaining;
        self
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl Component for Lifetime {
    fn update(&mut self, dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
        self.remaining -= dt_seconds;
        if self.is_expired() {
            ctx.owner.destroy();
        }
    }
}

/// Fading circle that shrinks with its remaining time, then removes its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRange {
    duration: f32,
    remaining: f32,
    max_radius: f32,
    color: Color,
}

impl AttackRange {
    pub fn new(duration: f32, max_radius: f32, color: Color) -> Self {
        Self {
            duration,
            remaining: duration,
            max_radius,
            color,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn radius(&self) -> f32 {
        self.max_radius * self.progress()
    }

    pub fn alpha(&self) -> f32 {
        self.progress()
    }

    pub fn is_showing(&self) -> bool {
        self.remaining > 0.0
    }
}

impl Component for AttackRange {
    fn update(&mut self, dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
        self.remaining -= dt_seconds;
        if !self.is_showing() {
            ctx.owner.destroy();
        }
    }

    fn render(&self, owner: &Entity, renderer: &mut dyn Renderer) {
        if !self.is_showing() {
            return;
        }
        if let Some(center) = owner.position() {
            renderer.draw_gradient_circle(center, self.radius(), self.alpha(), self.color);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub image_key: String,
    pub width: f32,
    pub height: f32,
    pub hide_when_dead: bool,
}

impl Sprite {
    pub fn new(image_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            image_key: image_key.into(),
            width,
            height,
            hide_when_dead: true,
        }
    }
}

impl Component for Sprite {
    fn render(&self, owner: &Entity, renderer: &mut dyn Renderer) {
        if self.hide_when_dead
            && owner
                .get_component::<Health>()
                .is_some_and(|health| !health.is_alive())
        {
            return;
        }
        let Some(center) = owner.position() else {
            return;
        };
        renderer.draw_image(
            &self.image_key,
            center.x - self.width / 2.0,
            center.y - self.height / 2.0,
            self.width,
            self.height,
        );
    }
}

/// Short-lived particle spray used as hit feedback.
#[derive(Debug, Clone, Default)]
pub struct ParticleBurst {
    particles: Vec<Particle>,
}

impl ParticleBurst {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_emitting(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn emit_damage(&mut self, origin: Vec2, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let angle = rng.gen::<f32>() * TAU;
            let speed = 50.0 + rng.gen::<f32>() * 100.0;
            let lifetime = 0.3 + rng.gen::<f32>() * 0.4;
            self.particles.push(Particle {
                position: origin,
                velocity: Vec2 {
                    x: angle.cos() * speed,
                    y: angle.sin() * speed,
                },
                lifetime,
                max_lifetime: lifetime,
                base_size: 2.0 + rng.gen::<f32>() * 3.0,
                color: DAMAGE_PARTICLE_COLOR,
            });
        }
    }

    pub fn step(&mut self, dt_seconds: f32) {
        self.particles.retain_mut(|particle| {
            particle.lifetime -= dt_seconds;
            particle.position = particle.position + particle.velocity * dt_seconds;
            particle.lifetime > 0.0
        });
    }
}

impl Component for ParticleBurst {
    fn update(&mut self, dt_seconds: f32, _ctx: &mut ComponentContext<'_>) {
        self.step(dt_seconds);
    }

    fn render(&self, _owner: &Entity, renderer: &mut dyn Renderer) {
        if self.is_emitting() {
            renderer.draw_particles(&self.particles);
        }
    }
}

/// Applies damage to `entity`'s health and sprays hit particles at its position.
/// Returns false when the entity has no health.
pub fn apply_damage(entity: &mut Entity, amount: i32, rng: &mut impl Rng) -> bool {
    let Some(health) = entity.get_component_mut::<Health>() else {
        return false;
    };
    health.take_damage(amount);

    if let Some(origin) = entity.position() {
        if !entity.has_component::<ParticleBurst>() {
            entity.add_component(ParticleBurst::default());
        }
        if let Some(burst) = entity.get_component_mut::<ParticleBurst>() {
            burst.emit_damage(origin, DAMAGE_PARTICLE_COUNT, rng);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::app::rendering::{DrawCommand, RecordingRenderer};
    use crate::app::scene::WorldView;

    fn body_entity(body: PhysicsBody) -> Entity {
        Entity::new("body", "Body")
            .with_component(Transform::at(100.0, 100.0))
            .with_component(body)
    }

    #[test]
    fn physics_mass_is_guarded() {
        assert!((PhysicsBody::new(0.0).mass() - 1.0).abs() < 0.0001);
        assert!((PhysicsBody::new(-3.0).mass() - 1.0).abs() < 0.0001);

        let mut body = PhysicsBody::new(2.0);
        body.set_mass(0.0);
        assert!((body.mass() - MIN_MASS).abs() < 0.0001);
    }

    #[test]
    fn friction_is_clamped_to_unit_range() {
        assert!((PhysicsBody::new(1.0).friction() - DEFAULT_FRICTION).abs() < 0.0001);
        assert!((PhysicsBody::new(1.0).with_friction(1.5).friction() - 1.0).abs() < 0.0001);
        assert!(PhysicsBody::new(1.0).with_friction(-0.5).friction().abs() < 0.0001);
    }

    #[test]
    fn physics_update_integrates_force_and_resets_it() {
        let mut body = PhysicsBody::new(2.0).with_friction(0.5);
        body.add_force(Vec2::new(10.0, 0.0));
        let mut entity = body_entity(body);

        entity.update_components(1.0, &WorldView::default());

        let body = entity.get_component::<PhysicsBody>().expect("body");
        assert!((body.acceleration.x - 5.0).abs() < 0.0001);
        assert!((body.velocity.x - 2.5).abs() < 0.0001);
        assert_eq!(body.accumulated_force(), Vec2::ZERO);
        let position = entity.position().expect("position");
        assert!((position.x - 102.5).abs() < 0.0001);
        assert!((position.y - 100.0).abs() < 0.0001);
    }

    #[test]
    fn health_clamps_both_ways() {
        let mut health = Health::new(30);
        health.take_damage(45);
        assert_eq!(health.current(), 0);
        assert!(!health.is_alive());

        health.set_health(500);
        assert_eq!(health.current(), 30);
    }

    #[test]
    fn lifetime_destroys_owner_when_expired() {
        let mut entity = Entity::new("ttl", "Effect")
            .with_component(Transform::default())
            .with_component(Lifetime::new(0.3));

        entity.update_components(0.2, &WorldView::default());
        assert!(entity.is_active());
        entity.update_components(0.2, &WorldView::default());
        assert!(!entity.is_active());
    }

    #[test]
    fn attack_range_shrinks_and_fades_then_self_destructs() {
        let mut entity = Entity::new("ring", "AttackRange")
            .with_component(Transform::at(10.0, 20.0))
            .with_component(AttackRange::new(0.4, 60.0, Color::rgb(1.0, 0.0, 0.0)));

        entity.update_components(0.1, &WorldView::default());
        let ring = entity.get_component::<AttackRange>().expect("ring");
        assert!((ring.progress() - 0.75).abs() < 0.0001);
        assert!((ring.radius() - 45.0).abs() < 0.0001);
        assert!((ring.alpha() - 0.75).abs() < 0.0001);

        let mut renderer = RecordingRenderer::default();
        entity.render_components(&mut renderer);
        assert!(matches!(
            renderer.commands.as_slice(),
            [DrawCommand::GradientCircle { radius, .. }] if (*radius - 45.0).abs() < 0.0001
        ));

        entity.update_components(0.3, &WorldView::default());
        assert!(!entity.is_active());
    }

    #[test]
    fn sprite_is_centered_and_hidden_when_dead() {
        let mut entity = Entity::new("hero", "Player")
            .with_component(Transform::at(100.0, 50.0))
            .with_component(Sprite::new("player", 40.0, 20.0))
            .with_component(Health::new(10));

        let mut renderer = RecordingRenderer::default();
        entity.render_components(&mut renderer);
        assert!(matches!(
            renderer.commands.as_slice(),
            [DrawCommand::Image { x, y, .. }] if (*x - 80.0).abs() < 0.0001 && (*y - 40.0).abs() < 0.0001
        ));

        entity
            .get_component_mut::<Health>()
            .expect("health")
            .take_damage(10);
        let mut renderer = RecordingRenderer::default();
        entity.render_components(&mut renderer);
        assert!(renderer.commands.is_empty());
    }

    #[test]
    fn apply_damage_adds_particle_burst_lazily() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut entity = Entity::new("grunt", "Minion")
            .with_component(Transform::at(5.0, 5.0))
            .with_component(Health::new(30));

        assert!(apply_damage(&mut entity, 10, &mut rng));
        assert_eq!(entity.get_component::<Health>().expect("health").current(), 20);
        let burst = entity.get_component::<ParticleBurst>().expect("burst");
        assert_eq!(burst.particles().len(), DAMAGE_PARTICLE_COUNT);

        assert!(apply_damage(&mut entity, 10, &mut rng));
        let burst = entity.get_component::<ParticleBurst>().expect("burst");
        assert_eq!(burst.particles().len(), DAMAGE_PARTICLE_COUNT * 2);
        assert_eq!(entity.component_count(), 3);

        let mut bare = Entity::new("rock", "Prop");
        assert!(!apply_damage(&mut bare, 10, &mut rng));
    }

    #[test]
    fn particles_expire() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut burst = ParticleBurst::default();
        burst.emit_damage(Vec2::ZERO, 4, &mut rng);
        burst.step(0.2);
        assert_eq!(burst.particles().len(), 4);
        burst.step(0.6);
        assert!(!burst.is_emitting());
    }
}
