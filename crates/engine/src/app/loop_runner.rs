use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::{AppPaths, StartupError};

use super::input::InputCollector;
use super::metrics::MetricsWindow;
use super::rendering::FrameRenderer;
use super::{Scene, SceneCommand, SceneWorld};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Siege".to_string(),
            window_width: 1100,
            window_height: 600,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs `scene` in a window until it returns [`SceneCommand::Quit`], Escape is pressed, or the
/// window is closed.
pub fn run_app(
    config: LoopConfig,
    paths: &AppPaths,
    mut scene: Box<dyn Scene>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = FrameRenderer::new(Arc::clone(&window), paths.sprites_dir.clone())
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let render_frame_target = target_frame_duration(config.max_render_fps.filter(|fps| *fps > 0));

    let mut world = SceneWorld::default();
    scene.load(&mut world);
    world.initialize();
    world.apply_pending();
    info!(entity_count = world.entity_count(), "scene_loaded");
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics = MetricsWindow::starting_at(Instant::now(), metrics_log_interval);
    let mut last_applied_title: Option<String> = None;
    let mut unloaded = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_key(event.physical_key, event.state);
                    if input_collector.quit_requested() {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    accumulator =
                        accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        let input = input_collector.snapshot_for_tick();
                        let command = scene.update(fixed_dt_seconds, &input, &mut world);
                        world.apply_pending();
                        metrics.record_tick();
                        if let SceneCommand::Quit = command {
                            info!(reason = "scene_quit", "shutdown_requested");
                            window_target.exit();
                            break;
                        }
                    }
                    accumulator = step_plan.remaining_accumulator;
                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    let cap_sleep = compute_cap_sleep(
                        Instant::now().saturating_duration_since(last_present_instant),
                        render_frame_target,
                    );
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    if let Err(error) =
                        renderer.draw_frame(|canvas| scene.render(&world, canvas))
                    {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();
                    metrics.record_frame(raw_frame_dt);

                    let next_title = scene.debug_title(&world);
                    if next_title != last_applied_title {
                        window.set_title(next_title.as_deref().unwrap_or(&config.window_title));
                        last_applied_title = next_title;
                    }

                    if let Some(snapshot) = metrics.roll_over(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            worst_frame_ms = snapshot.worst_frame_ms,
                            entity_count = world.entity_count(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                if !unloaded {
                    scene.unload(&mut world);
                    unloaded = true;
                }
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    // Whatever the tick cap left behind is dropped rather than carried into the next frame.
    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(16), max_frame_delta),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn plan_sim_steps_keeps_partial_tick_remainder() {
        let result = plan_sim_steps(Duration::from_millis(40), Duration::from_millis(16), 5);

        assert_eq!(result.ticks_to_run, 2);
        assert_eq!(result.remaining_accumulator, Duration::from_millis(8));
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let result = plan_sim_steps(Duration::from_millis(120), Duration::from_millis(16), 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn zero_durations_fall_back() {
        let fallback = Duration::from_secs(1);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn cap_sleep_only_when_under_budget() {
        let target = target_frame_duration(Some(60));
        assert_eq!(compute_cap_sleep(Duration::from_millis(20), target), Duration::ZERO);
        assert!(compute_cap_sleep(Duration::from_millis(5), target) > Duration::ZERO);
        assert_eq!(compute_cap_sleep(Duration::from_millis(5), None), Duration::ZERO);
    }

    #[test]
    fn default_config_matches_game_window() {
        let config = LoopConfig::default();
        assert_eq!((config.window_width, config.window_height), (1100, 600));
        assert_eq!(config.target_tps, 60);
        assert_eq!(config.max_ticks_per_frame, 5);
    }
}
