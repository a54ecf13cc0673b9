/// Attack dispatch and hit resolution. New attack entities go through the world's deferred
/// queue; spent ones are destroyed in place and dropped on the next flush.
#[derive(Debug, Clone)]
struct CombatSystem {
    rng: StdRng,
}

impl CombatSystem {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn update(&mut self, input: &InputSnapshot, world: &mut SceneWorld, audio: &mut Audio) {
        self.dispatch_player_attack(input, world, audio);
        self.consume_enemy_actions(world, audio);
        self.resolve_enemy_melee(world, audio);
        self.resolve_enemy_bullets(world, audio);
        self.resolve_player_bullets(world, audio);
        self.resolve_cannonballs(world, audio);
        self.resolve_bombs(world, audio);
        self.resolve_player_melee(world, audio);
    }

    /// At most one attack per tick. The first held key whose cooldown is ready wins, in the order
    /// melee, ranged, cannon.
    fn dispatch_player_attack(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
        audio: &mut Audio,
    ) -> Option<PlayerAttack> {
        let player = world.find_by_tag(PLAYER_TAG)?;
        let origin = player.position()?;
        let cooldowns = player.get_component::<AttackCooldowns>().copied()?;
        let wants = |action: InputAction, attack: PlayerAttack| {
            input.is_down(action) && cooldowns.is_ready(attack)
        };

        let attack = if wants(InputAction::Melee, PlayerAttack::Melee) {
            PlayerAttack::Melee
        } else if wants(InputAction::Ranged, PlayerAttack::Ranged) {
            PlayerAttack::Ranged
        } else if wants(InputAction::Cannon, PlayerAttack::Cannon) {
            PlayerAttack::Cannon
        } else {
            return None;
        };

        match attack {
            PlayerAttack::Melee => {
                world.add_game_object(attack_effect_entity(EntityKind::PlayerAttackEffect, origin));
                world.add_game_object(melee_hitbox_entity(EntityKind::PlayerMeleeHitbox, origin));
                audio.play(SoundCue::MeleeAttack);
            }
            PlayerAttack::Ranged | PlayerAttack::Cannon => {
                let (kind, cue) = if attack == PlayerAttack::Ranged {
                    (EntityKind::PlayerBullet, SoundCue::BulletFire)
                } else {
                    (EntityKind::PlayerCannonball, SoundCue::CannonFire)
                };
                let target = nearest_living_enemy(world, origin)?;
                world.add_game_object(aimed_projectile(kind, origin, target)?);
                audio.play(cue);
            }
        }

        if let Some(cooldowns) = world
            .find_by_tag_mut(PLAYER_TAG)
            .and_then(|player| player.get_component_mut::<AttackCooldowns>())
        {
            cooldowns.start(attack);
        }
        debug!(attack = ?attack, x = origin.x, y = origin.y, "player_attack");
        Some(attack)
    }

    /// Empties every enemy's pending-action slot and spawns what was asked for. Returns how many
    /// requests were consumed.
    fn consume_enemy_actions(&mut self, world: &mut SceneWorld, audio: &mut Audio) -> usize {
        let player_position = living_player(world).map(|(_, position)| position);
        let mut requests = Vec::new();
        for entity in world.entities_mut() {
            if !entity.is_active() {
                continue;
            }
            let Some(brain) = entity.get_component_mut::<EnemyBrain>() else {
                continue;
            };
            let action = brain.take_pending();
            if action.is_none() {
                continue;
            }
            if let Some(position) = entity.position() {
                requests.push((position, action));
            }
        }

        for (origin, action) in &requests {
            match action {
                PendingAction::MeleeRequest => {
                    let effect = attack_effect_entity(EntityKind::EnemyAttackEffect, *origin);
                    world.add_game_object(effect);
                    let hitbox = melee_hitbox_entity(EntityKind::EnemyMeleeHitbox, *origin);
                    world.add_game_object(hitbox);
                    audio.play(SoundCue::MeleeAttack);
                }
                PendingAction::RangedRequest | PendingAction::BombRequest => {
                    let Some(target) = player_position else {
                        continue;
                    };
                    let (kind, cue) = if *action == PendingAction::RangedRequest {
                        (EntityKind::EnemyBullet, SoundCue::BulletFire)
                    } else {
                        (EntityKind::BossBomb, SoundCue::BombThrow)
                    };
                    if let Some(projectile) = aimed_projectile(kind, *origin, target) {
                        world.add_game_object(projectile);
                        audio.play(cue);
                    }
                }
                PendingAction::None => {}
            }
        }
        requests.len()
    }

    fn resolve_enemy_melee(&mut self, world: &mut SceneWorld, audio: &mut Audio) {
        for (hitbox_id, hitbox_position) in live_positions(world, EntityKind::EnemyMeleeHitbox) {
            let Some((player_id, player_position)) = living_player(world) else {
                return;
            };
            if hitbox_position.distance(player_position) < ENEMY_MELEE_RANGE {
                self.hit(world, player_id, ENEMY_MELEE_DAMAGE, audio);
                destroy_entity(world, hitbox_id);
            }
        }
    }

    fn resolve_enemy_bullets(&mut self, world: &mut SceneWorld, audio: &mut Audio) {
        let damage = ProjectileKind::Bullet.spec().damage;
        for (bullet_id, bullet_position) in live_positions(world, EntityKind::EnemyBullet) {
            let Some((player_id, player_position)) = living_player(world) else {
                return;
            };
            if bullet_position.distance(player_position) < BULLET_COLLISION_RADIUS {
                self.hit(world, player_id, damage, audio);
                destroy_entity(world, bullet_id);
            }
        }
    }

    /// Single target: the first living enemy in range takes the bullet.
    fn resolve_player_bullets(&mut self, world: &mut SceneWorld, audio: &mut Audio) {
        let damage = ProjectileKind::Bullet.spec().damage;
        for (bullet_id, bullet_position) in live_positions(world, EntityKind::PlayerBullet) {
            let target = living_enemies(world).into_iter().find(|(_, position)| {
                bullet_position.distance(*position) < BULLET_COLLISION_RADIUS
            });
            if let Some((enemy_id, _)) = target {
                self.hit(world, enemy_id, damage, audio);
                destroy_entity(world, bullet_id);
            }
        }
    }

    /// Area damage: anything inside the scan radius detonates the cannonball, then every living
    /// enemy inside the attack radius is hit.
    fn resolve_cannonballs(&mut self, world: &mut SceneWorld, audio: &mut Audio) {
        let damage = ProjectileKind::Cannonball.spec().damage;
        for (ball_id, impact) in live_positions(world, EntityKind::PlayerCannonball) {
            let enemies = living_enemies(world);
            let detonated = enemies
                .iter()
                .any(|(_, position)| impact.distance(*position) < AOE_SCAN_RADIUS);
            if !detonated {
                continue;
            }

            let mut victims = 0usize;
            for (enemy_id, position) in enemies {
                if impact.distance(position) < AOE_ATTACK_RADIUS
                    && self.hit(world, enemy_id, damage, audio)
                {
                    victims += 1;
                }
            }
            self.explode(world, ball_id, EntityKind::CannonballExplosion, impact, audio);
            debug!(victims, x = impact.x, y = impact.y, "cannonball_detonated");
        }
    }

    /// Same scan/attack split as the cannonball, against the player only.
    fn resolve_bombs(&mut self, world: &mut SceneWorld, audio: &mut Audio) {
        let damage = ProjectileKind::Bomb.spec().damage;
        for (bomb_id, impact) in live_positions(world, EntityKind::BossBomb) {
            let Some((player_id, player_position)) = living_player(world) else {
                return;
            };
            let distance = impact.distance(player_position);
            if distance >= AOE_SCAN_RADIUS {
                continue;
            }
            if distance < AOE_ATTACK_RADIUS {
                self.hit(world, player_id, damage, audio);
            }
            self.explode(world, bomb_id, EntityKind::BombExplosion, impact, audio);
        }
    }

    /// Player melee hitboxes stay live for their short lifetime and hit every enemy in reach.
    fn resolve_player_melee(&mut self, world: &mut SceneWorld, audio: &mut Audio) {
        for (_, hitbox_position) in live_positions(world, EntityKind::PlayerMeleeHitbox) {
            for (enemy_id, position) in living_enemies(world) {
                if hitbox_position.distance(position) < PLAYER_MELEE_RANGE {
                    self.hit(world, enemy_id, PLAYER_MELEE_DAMAGE, audio);
                }
            }
        }
    }

    fn explode(
        &mut self,
        world: &mut SceneWorld,
        projectile_id: EntityId,
        explosion: EntityKind,
        impact: Vec2,
        audio: &mut Audio,
    ) {
        destroy_entity(world, projectile_id);
        audio.play(SoundCue::BombExplode);
        world.add_game_object(attack_effect_entity(explosion, impact));
    }

    fn hit(
        &mut self,
        world: &mut SceneWorld,
        target: EntityId,
        damage: i32,
        audio: &mut Audio,
    ) -> bool {
        let Some(entity) = world.find_entity_mut(target) else {
            return false;
        };
        if !apply_damage(entity, damage, &mut self.rng) {
            return false;
        }
        audio.play(SoundCue::Damage);
        true
    }
}

/// Ids and positions of active entities of `kind`, in live-list order.
fn live_positions(world: &SceneWorld, kind: EntityKind) -> Vec<(EntityId, Vec2)> {
    world
        .find_all_by_tag(kind.tag())
        .filter_map(|entity| entity.position().map(|position| (entity.id(), position)))
        .collect()
}

fn is_alive(entity: &Entity) -> bool {
    entity
        .get_component::<Health>()
        .is_some_and(|health| health.is_alive())
}

fn living_player(world: &SceneWorld) -> Option<(EntityId, Vec2)> {
    let player = world.find_by_tag(PLAYER_TAG).filter(|player| is_alive(player))?;
    Some((player.id(), player.position()?))
}

fn living_enemies(world: &SceneWorld) -> Vec<(EntityId, Vec2)> {
    world
        .entities()
        .iter()
        .filter(|entity| {
            entity.is_active()
                && EntityKind::of(entity).is_some_and(EntityKind::is_enemy)
                && is_alive(entity)
        })
        .filter_map(|entity| entity.position().map(|position| (entity.id(), position)))
        .collect()
}

fn nearest_living_enemy(world: &SceneWorld, origin: Vec2) -> Option<Vec2> {
    living_enemies(world)
        .into_iter()
        .map(|(_, position)| position)
        .min_by(|a, b| origin.distance(*a).total_cmp(&origin.distance(*b)))
}

fn destroy_entity(world: &mut SceneWorld, id: EntityId) {
    if let Some(entity) = world.find_entity_mut(id) {
        entity.destroy();
    }
}
