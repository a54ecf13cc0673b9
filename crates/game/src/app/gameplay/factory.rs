const PLAYER_ATTACK_COLOR: Color = Color::rgb(1.0, 0.0, 0.0);
const ENEMY_ATTACK_COLOR: Color = Color::rgb(0.8, 0.0, 0.0);
const CANNONBALL_EXPLOSION_COLOR: Color = Color::rgb(1.0, 0.5, 0.0);
const BOMB_EXPLOSION_COLOR: Color = Color::rgb(1.0, 0.0, 0.0);

fn player_entity(position: Vec2) -> Entity {
    Entity::new("Player", EntityKind::Player.tag())
        .with_component(Transform::at(position.x, position.y))
        .with_component(
            PhysicsBody::new(PLAYER_MASS)
                .with_friction(PLAYER_FRICTION)
                .with_extent(PLAYER_SPRITE_SIZE, PLAYER_SPRITE_SIZE),
        )
        .with_component(Health::new(PLAYER_MAX_HEALTH))
        .with_component(Sprite::new(
            "player",
            PLAYER_SPRITE_SIZE,
            PLAYER_SPRITE_SIZE,
        ))
        .with_component(AttackCooldowns::default())
}

fn enemy_entity(archetype_id: EnemyArchetypeId, position: Vec2, brain_seed: u64) -> Entity {
    let archetype = archetype_id.archetype();
    Entity::new(archetype.kind.tag(), archetype.kind.tag())
        .with_component(Transform::at(position.x, position.y))
        .with_component(Sprite::new(
            archetype.sprite_key,
            archetype.sprite_size,
            archetype.sprite_size,
        ))
        .with_component(
            PhysicsBody::new(archetype.mass)
                .with_friction(ENEMY_FRICTION)
                .with_extent(archetype.sprite_size, archetype.sprite_size),
        )
        .with_component(Health::new(archetype.max_health))
        .with_component(EnemyBrain::new(archetype_id, brain_seed))
}

/// Projectile moving at `velocity` with `remaining_seconds` of its lifetime left. `None` when
/// `kind` is not a projectile kind.
fn projectile_entity(
    kind: EntityKind,
    position: Vec2,
    velocity: Vec2,
    remaining_seconds: f32,
) -> Option<Entity> {
    let projectile_kind = kind.projectile_kind()?;
    let spec = projectile_kind.spec();
    let entity = Entity::new("Projectile", kind.tag())
        .with_component(Transform::at(position.x, position.y))
        .with_component(Sprite::new(spec.sprite_key, spec.sprite_size, spec.sprite_size))
        .with_component(
            PhysicsBody::new(spec.mass)
                .with_friction(1.0)
                .with_extent(spec.sprite_size, spec.sprite_size)
                .with_velocity(velocity),
        )
        .with_component(Lifetime::new(spec.lifetime_seconds).with_remaining(remaining_seconds))
        .with_component(Projectile {
            kind: projectile_kind,
        });
    Some(entity)
}

/// Fresh projectile flying from `start` toward `target` at its kind's speed.
fn aimed_projectile(kind: EntityKind, start: Vec2, target: Vec2) -> Option<Entity> {
    let spec = kind.projectile_kind()?.spec();
    let velocity = (target - start).normalized() * spec.speed;
    projectile_entity(kind, start, velocity, spec.lifetime_seconds)
}

fn attack_effect_entity(kind: EntityKind, position: Vec2) -> Entity {
    let (duration, radius, color) = match kind {
        EntityKind::EnemyAttackEffect => {
            (MELEE_VISUAL_SECONDS, ENEMY_MELEE_RANGE, ENEMY_ATTACK_COLOR)
        }
        EntityKind::CannonballExplosion => (
            CANNONBALL_EXPLOSION_SECONDS,
            AOE_ATTACK_RADIUS,
            CANNONBALL_EXPLOSION_COLOR,
        ),
        EntityKind::BombExplosion => {
            (BOMB_EXPLOSION_SECONDS, AOE_ATTACK_RADIUS, BOMB_EXPLOSION_COLOR)
        }
        _ => (MELEE_VISUAL_SECONDS, PLAYER_MELEE_RANGE, PLAYER_ATTACK_COLOR),
    };
    Entity::new(kind.tag(), kind.tag())
        .with_component(Transform::at(position.x, position.y))
        .with_component(AttackRange::new(duration, radius, color))
}

fn melee_hitbox_entity(kind: EntityKind, position: Vec2) -> Entity {
    Entity::new("Melee", kind.tag())
        .with_component(Transform::at(position.x, position.y))
        .with_component(Lifetime::new(MELEE_HITBOX_SECONDS))
}

fn main_menu_entity(has_save: bool) -> Entity {
    Entity::new("MainMenu", EntityKind::MainMenu.tag()).with_component(MainMenu::new(has_save))
}
