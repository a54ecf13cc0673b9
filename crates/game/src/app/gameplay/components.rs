/// Player attack cooldowns. A slot is ready once it has counted down to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AttackCooldowns {
    melee: f32,
    ranged: f32,
    cannon: f32,
}

impl AttackCooldowns {
    fn slot_mut(&mut self, attack: PlayerAttack) -> &mut f32 {
        match attack {
            PlayerAttack::Melee => &mut self.melee,
            PlayerAttack::Ranged => &mut self.ranged,
            PlayerAttack::Cannon => &mut self.cannon,
        }
    }

    fn remaining(&self, attack: PlayerAttack) -> f32 {
        match attack {
            PlayerAttack::Melee => self.melee,
            PlayerAttack::Ranged => self.ranged,
            PlayerAttack::Cannon => self.cannon,
        }
    }

    fn set_remaining(&mut self, attack: PlayerAttack, seconds: f32) {
        *self.slot_mut(attack) = seconds.max(0.0);
    }

    fn is_ready(&self, attack: PlayerAttack) -> bool {
        self.remaining(attack) <= 0.0
    }

    fn start(&mut self, attack: PlayerAttack) {
        *self.slot_mut(attack) = attack.cooldown_seconds();
    }

    /// 0 right after firing, 1 when ready.
    fn progress(&self, attack: PlayerAttack) -> f32 {
        let remaining = self.remaining(attack);
        if remaining > 0.0 {
            1.0 - remaining / attack.cooldown_seconds()
        } else {
            1.0
        }
    }

    fn tick(&mut self, dt_seconds: f32) {
        for slot in [&mut self.melee, &mut self.ranged, &mut self.cannon] {
            if *slot > 0.0 {
                *slot -= dt_seconds;
            }
        }
    }
}

impl Component for AttackCooldowns {
    fn update(&mut self, dt_seconds: f32, _ctx: &mut ComponentContext<'_>) {
        self.tick(dt_seconds);
    }
}

/// Enemy AI: chases the player, runs the archetype's cooldowns and raises at most one pending
/// attack at a time. The combat pass empties the slot.
#[derive(Debug, Clone)]
struct EnemyBrain {
    archetype: EnemyArchetypeId,
    melee_cooldown: f32,
    ranged_cooldown: f32,
    bomb_cooldown: f32,
    pending: PendingAction,
    rng: StdRng,
}

impl EnemyBrain {
    fn new(archetype: EnemyArchetypeId, seed: u64) -> Self {
        Self {
            archetype,
            melee_cooldown: ENEMY_MELEE_COOLDOWN_SECONDS,
            ranged_cooldown: ENEMY_RANGED_COOLDOWN_SECONDS,
            bomb_cooldown: BOSS_BOMB_COOLDOWN_SECONDS,
            pending: PendingAction::None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn archetype(&self) -> EnemyArchetypeId {
        self.archetype
    }

    #[cfg(test)]
    fn pending(&self) -> PendingAction {
        self.pending
    }

    #[cfg(test)]
    fn raise(&mut self, action: PendingAction) {
        self.pending = action;
    }

    fn take_pending(&mut self) -> PendingAction {
        std::mem::take(&mut self.pending)
    }

    fn tick_cooldowns(&mut self, dt_seconds: f32) {
        self.melee_cooldown -= dt_seconds;
        self.ranged_cooldown -= dt_seconds;
        if self.bomb_cooldown > 0.0 {
            self.bomb_cooldown -= dt_seconds;
        }
    }

    /// Picks the next attack by archetype priority and re-arms the chosen cooldown.
    fn decide(&mut self, distance_to_player: f32) -> PendingAction {
        let behavior = self.archetype.archetype().behavior;
        if behavior == EnemyBehavior::Bombardier && self.bomb_cooldown <= 0.0 {
            self.bomb_cooldown = BOSS_BOMB_COOLDOWN_SECONDS;
            return PendingAction::BombRequest;
        }
        if distance_to_player <= ENEMY_MELEE_RANGE && self.melee_cooldown <= 0.0 {
            self.melee_cooldown = ENEMY_MELEE_COOLDOWN_SECONDS;
            return PendingAction::MeleeRequest;
        }
        if self.ranged_cooldown <= 0.0 {
            self.ranged_cooldown = ENEMY_RANGED_COOLDOWN_SECONDS
                + self.rng.gen::<f32>() * ENEMY_RANGED_REARM_JITTER_SECONDS;
            return PendingAction::RangedRequest;
        }
        PendingAction::None
    }
}

impl Component for EnemyBrain {
    fn update(&mut self, dt_seconds: f32, ctx: &mut ComponentContext<'_>) {
        if ctx
            .owner
            .get_component::<Health>()
            .is_some_and(|health| !health.is_alive())
        {
            return;
        }
        let Some(player_position) = ctx.world.tracked_position(PLAYER_TAG) else {
            return;
        };
        let Some(position) = ctx.owner_position() else {
            return;
        };

        let offset = player_position - position;
        let distance = offset.length();
        if distance > 0.0 {
            let force = offset.normalized() * self.archetype.archetype().move_force;
            if let Some(body) = ctx.owner.get_component_mut::<PhysicsBody>() {
                body.add_force(force);
            }
        }

        self.tick_cooldowns(dt_seconds);
        if self.pending.is_none() {
            self.pending = self.decide(distance);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Projectile {
    kind: ProjectileKind,
}

impl Component for Projectile {}
