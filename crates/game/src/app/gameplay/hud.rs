const HUD_LEFT: f32 = 810.0;
const HUD_BAR_WIDTH: f32 = 260.0;
const HUD_LINE_HEIGHT: f32 = 45.0;
const HUD_ON: Color = Color::rgb(0.0, 1.0, 0.0);
const HUD_OFF: Color = Color::rgb(1.0, 0.0, 0.0);
const HUD_HINT: Color = Color::rgb(0.8, 0.8, 0.8);
const ARENA_BACKGROUND: Color = Color::rgb(0.1, 0.1, 0.2);
const HEALTH_BAR_BACKGROUND: Color = Color::rgb(0.5, 0.0, 0.0);
const HEALTH_BAR_FILL: Color = Color::rgb(0.0, 1.0, 0.0);
const HEALTH_BAR_WIDTH: f32 = 30.0;
const HEALTH_BAR_HEIGHT: f32 = 5.0;

/// Everything the side panel shows, gathered once per frame.
#[derive(Debug, Clone, Copy)]
struct HudView {
    timer: f32,
    duration: f32,
    cooldowns: AttackCooldowns,
    audio: AudioSettings,
    paused: bool,
    outcome: Option<Outcome>,
}

const COOLDOWN_ROWS: [(PlayerAttack, &str, Color); 3] = [
    (PlayerAttack::Melee, "Melee (J)", Color::rgb(1.0, 0.5, 0.0)),
    (PlayerAttack::Ranged, "Ranged (U)", Color::rgb(0.0, 0.5, 1.0)),
    (PlayerAttack::Cannon, "Cannon (I)", Color::rgb(1.0, 0.0, 0.0)),
];

fn render_arena_background(arena: Vec2, renderer: &mut dyn Renderer) {
    renderer.draw_rect(0.0, 0.0, arena.x, arena.y, ARENA_BACKGROUND);
}

fn render_health_bars(world: &SceneWorld, renderer: &mut dyn Renderer) {
    for entity in world.entities().iter().filter(|entity| entity.is_active()) {
        let (Some(position), Some(health)) = (entity.position(), entity.get_component::<Health>())
        else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }
        let x = position.x - HEALTH_BAR_WIDTH / 2.0;
        let y = position.y - 30.0;
        renderer.draw_rect(x, y, HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT, HEALTH_BAR_BACKGROUND);
        renderer.draw_rect(
            x,
            y,
            HEALTH_BAR_WIDTH * health.fraction(),
            HEALTH_BAR_HEIGHT,
            HEALTH_BAR_FILL,
        );
    }
}

fn render_hud(view: &HudView, renderer: &mut dyn Renderer) {
    renderer.draw_rect(805.0, 10.0, 290.0, 550.0, Color::rgba(0.0, 0.0, 0.0, 0.3));

    let mut y = 30.0;
    let time_text = format!("Time: {:.1}s / {:.0}s", view.timer, view.duration);
    renderer.draw_text(&time_text, HUD_LEFT, y, Color::WHITE);
    let time_progress = if view.duration > 0.0 {
        (view.timer / view.duration).min(1.0)
    } else {
        1.0
    };
    renderer.draw_progress_bar(HUD_LEFT, y + 18.0, HUD_BAR_WIDTH, 15.0, time_progress, HUD_ON);
    y += 50.0;

    for (attack, label, color) in COOLDOWN_ROWS {
        let status = if view.cooldowns.is_ready(attack) {
            "ready".to_string()
        } else {
            format!("{:.1}s", view.cooldowns.remaining(attack))
        };
        renderer.draw_text(&format!("{label}: {status}"), HUD_LEFT, y, Color::WHITE);
        renderer.draw_progress_bar(
            HUD_LEFT,
            y + 18.0,
            HUD_BAR_WIDTH,
            12.0,
            view.cooldowns.progress(attack),
            color,
        );
        y += HUD_LINE_HEIGHT;
    }

    renderer.draw_line(
        Vec2::new(HUD_LEFT, y),
        Vec2::new(HUD_LEFT + HUD_BAR_WIDTH, y),
        Color::rgb(0.5, 0.5, 0.5),
    );
    y += 15.0;

    let toggles = [
        ("Sound (M)", view.audio.sound_enabled),
        ("Music (N)", view.audio.music_enabled),
    ];
    for (label, enabled) in toggles {
        let (state, color) = if enabled { ("on", HUD_ON) } else { ("off", HUD_OFF) };
        renderer.draw_text(&format!("{label}: {state}"), HUD_LEFT, y, color);
        y += 25.0;
    }

    let (pause_text, pause_color) = if view.paused {
        ("Paused (P)", HUD_OFF)
    } else {
        ("Running (P to pause)", HUD_ON)
    };
    renderer.draw_text(pause_text, HUD_LEFT, y, pause_color);
    y += 25.0;
    if view.paused {
        renderer.draw_text("Save game (F12)", HUD_LEFT, y, Color::rgb(1.0, 1.0, 0.0));
        y += 25.0;
    }
    renderer.draw_text("Move: WASD", HUD_LEFT, y, HUD_HINT);

    match view.outcome {
        Some(Outcome::Won) => renderer.draw_text("Victory!", 370.0, 300.0, HUD_ON),
        Some(Outcome::Lost) => renderer.draw_text("Defeat!", 370.0, 300.0, HUD_OFF),
        None => {}
    }
}
