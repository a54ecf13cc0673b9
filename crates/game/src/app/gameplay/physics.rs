/// Player movement force and arena walls. Integration itself happens in each body's own update.
#[derive(Debug, Clone, Copy)]
struct PhysicsManager {
    arena: Vec2,
    move_force: f32,
}

impl PhysicsManager {
    fn new(arena: Vec2) -> Self {
        Self {
            arena,
            move_force: PLAYER_MOVE_FORCE,
        }
    }

    fn update(&self, input: &InputSnapshot, world: &mut SceneWorld) {
        self.apply_player_input(input, world);
        self.clamp_to_arena(world);
    }

    fn apply_player_input(&self, input: &InputSnapshot, world: &mut SceneWorld) {
        let intent = movement_intent(input);
        if intent == Vec2::ZERO {
            return;
        }
        let Some(body) = world
            .find_by_tag_mut(PLAYER_TAG)
            .and_then(|player| player.get_component_mut::<PhysicsBody>())
        else {
            return;
        };
        body.add_force(intent.normalized() * self.move_force);
    }

    /// Keeps every body inside `[0, arena - extent]` on both axes. Hitting a wall zeroes the
    /// velocity on that axis only.
    fn clamp_to_arena(&self, world: &mut SceneWorld) {
        for entity in world.entities_mut() {
            if !entity.is_active() {
                continue;
            }
            let Some(mut body) = entity.get_component::<PhysicsBody>().copied() else {
                continue;
            };
            let Some(transform) = entity.get_component_mut::<Transform>() else {
                continue;
            };

            let max_x = (self.arena.x - body.extent.x).max(0.0);
            let max_y = (self.arena.y - body.extent.y).max(0.0);
            let position = &mut transform.position;
            if position.x < 0.0 || position.x > max_x {
                position.x = position.x.clamp(0.0, max_x);
                body.velocity.x = 0.0;
            }
            if position.y < 0.0 || position.y > max_y {
                position.y = position.y.clamp(0.0, max_y);
                body.velocity.y = 0.0;
            }

            if let Some(live_body) = entity.get_component_mut::<PhysicsBody>() {
                live_body.velocity = body.velocity;
            }
        }
    }
}

/// Raw four-way movement from held keys, not yet normalized.
fn movement_intent(input: &InputSnapshot) -> Vec2 {
    let axis = |negative: InputAction, positive: InputAction| {
        let mut value = 0.0_f32;
        if input.is_down(negative) {
            value -= 1.0;
        }
        if input.is_down(positive) {
            value += 1.0;
        }
        value
    };
    Vec2::new(
        axis(InputAction::MoveLeft, InputAction::MoveRight),
        axis(InputAction::MoveUp, InputAction::MoveDown),
    )
}
