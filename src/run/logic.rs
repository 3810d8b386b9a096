//! Requisite Run logic: jump input, per-tick physics, collision, and outcome.

use super::config::{ConfigError, LevelConfig};
use super::types::*;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, trace};

/// Something that happened during a tick, for the presentation layer to show
/// and the surrounding application to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A requisite was gathered.
    Pickup {
        item_id: String,
        item_label: String,
        total_collected: usize,
    },
    /// Reached the gate carrying everything.
    Victory { total_collected: usize },
    Defeat {
        defeat_reason: DefeatReason,
        total_collected: usize,
    },
}

impl RunEvent {
    /// True for victory and defeat.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pickup { .. })
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Events produced during this tick, in the order they happened.
    pub events: Vec<RunEvent>,
}

impl TickResult {
    /// The terminal event of this tick, if the run ended.
    pub fn outcome(&self) -> Option<&RunEvent> {
        self.events.iter().find(|e| e.is_terminal())
    }

    pub fn pickups(&self) -> impl Iterator<Item = &RunEvent> {
        self.events.iter().filter(|e| !e.is_terminal())
    }
}

/// Validate the level and create a fresh run.
pub fn create_run<R: Rng>(config: LevelConfig, rng: &mut R) -> Result<RunState, ConfigError> {
    RunState::new(config, rng)
}

/// Return every field to its initial value and re-seed the layout.
pub fn reset_run<R: Rng>(run: &mut RunState, rng: &mut R) {
    let ground_line = run.config.ground_line();
    run.player = Player::standing(run.config.player_start_x, ground_line);
    run.scroll_offset = 0.0;
    run.finish_gate = run.config.gate_bounds();
    run.outcome = RunOutcome::InProgress;
    run.total_collected = 0;
    run.notice = None;
    run.tick_count = 0;
    run.seed_layout(rng);
    debug!("run reset");
}

/// Handle a jump press at `now_ms` on the run clock.
///
/// From the ground this starts a jump. While airborne, a second press within
/// `DOUBLE_JUMP_WINDOW_MS` of the first adds one extra impulse and a forward
/// boost. Anything else, including presses after the run ended, is ignored.
pub fn request_jump(run: &mut RunState, now_ms: u64) -> Option<JumpKind> {
    if run.is_over() {
        return None;
    }

    let player = &mut run.player;
    if player.motion == MotionState::Grounded {
        player.motion = MotionState::Rising;
        player.velocity_y = JUMP_IMPULSE;
        player.double_jump_available = true;
        player.last_jump_at_ms = Some(now_ms);
        trace!(now_ms, "jump");
        return Some(JumpKind::Single);
    }

    let within_window = player
        .last_jump_at_ms
        .is_some_and(|first| now_ms.saturating_sub(first) < DOUBLE_JUMP_WINDOW_MS);
    if player.double_jump_available && within_window {
        player.motion = MotionState::Rising;
        player.velocity_y = DOUBLE_JUMP_IMPULSE;
        player.x += DOUBLE_JUMP_BOOST;
        player.double_jump_available = false;
        trace!(now_ms, "double jump");
        return Some(JumpKind::Double);
    }

    None
}

/// Advance the run by exactly one frame. Does nothing once the run is over.
pub fn tick(run: &mut RunState) -> TickResult {
    let mut result = TickResult::default();
    if run.is_over() {
        return result;
    }

    run.tick_count += 1;

    // 1. Background parallax
    scroll_background(run);

    // 2. Pickup notice countdown
    decay_notice(run);

    // 3. Gravity
    integrate_player(run);

    // 4. Finish gate ends the tick on contact
    if let Some(event) = advance_finish_gate(run) {
        result.events.push(event);
        return result;
    }

    // 5. Collectibles
    collect_items(run, &mut result.events);

    // 6. Obstacles: landing beats blocking
    resolve_obstacles(run);

    // 7. Walking off a ledge
    update_support(run);

    // 8. Pursuer
    if run.player.x <= run.config.pursuer_threshold {
        result
            .events
            .push(finish(run, RunOutcome::Defeat(DefeatReason::CaughtByPursuer)));
    }

    result
}

fn scroll_background(run: &mut RunState) {
    run.scroll_offset -= run.config.speed * BACKGROUND_PARALLAX;
    if run.scroll_offset <= -run.config.viewport_width {
        run.scroll_offset = 0.0;
    }
}

fn decay_notice(run: &mut RunState) {
    let expired = match run.notice.as_mut() {
        Some(notice) => {
            notice.ticks_remaining = notice.ticks_remaining.saturating_sub(1);
            notice.ticks_remaining == 0
        }
        None => false,
    };
    if expired {
        run.notice = None;
    }
}

fn integrate_player(run: &mut RunState) {
    let ground_line = run.config.ground_line();
    let player = &mut run.player;
    if !player.motion.is_airborne() {
        return;
    }

    player.y += player.velocity_y;
    player.velocity_y += GRAVITY;

    if player.feet() >= ground_line {
        player.land_on(ground_line);
    }
}

fn advance_finish_gate(run: &mut RunState) -> Option<RunEvent> {
    run.finish_gate.x -= run.config.speed;
    if !run.player.bounds().overlaps(&run.finish_gate) {
        return None;
    }

    let outcome = if run.has_all_requisites() {
        RunOutcome::Victory
    } else {
        RunOutcome::Defeat(DefeatReason::IncompleteAtGate)
    };
    Some(finish(run, outcome))
}

fn collect_items(run: &mut RunState, events: &mut Vec<RunEvent>) {
    let player_bounds = run.player.bounds();
    let speed = run.config.speed;

    for item in run.collectibles.iter_mut() {
        if !item.collected && player_bounds.overlaps(&item.bounds) {
            item.collected = true;
            run.total_collected += 1;
            debug!(item = %item.id, total = run.total_collected, "requisite collected");

            run.notice = Some(Notice {
                text: format!("\u{2714} {}", item.label),
                ticks_remaining: NOTICE_TICKS,
            });
            events.push(RunEvent::Pickup {
                item_id: item.id.clone(),
                item_label: item.label.clone(),
                total_collected: run.total_collected,
            });
        }
        // Collected items keep scrolling, they are just no longer tested.
        item.bounds.x -= speed;
    }
}

/// Feet within `LANDING_SLACK` above `top` and this tick's velocity carries
/// them to or past it.
fn is_landing(player: &Player, top: f64) -> bool {
    let feet = player.feet();
    feet <= top + LANDING_SLACK && feet + player.velocity_y >= top
}

fn resolve_obstacles(run: &mut RunState) {
    let speed = run.config.speed;
    let player = &mut run.player;

    for obstacle in run.obstacles.iter_mut() {
        obstacle.bounds.x -= speed;
        let bounds = obstacle.bounds;

        let landing = is_landing(player, bounds.y);
        if landing && player.bounds().overlaps_x(&bounds) {
            player.land_on(bounds.y);
        }

        if !landing && player.bounds().overlaps(&bounds) {
            player.x = bounds.x - PLAYER_WIDTH;
        }
    }
}

/// Feet resting on `top` within `SUPPORT_SLACK` either way.
fn is_supported_by(player: &Player, bounds: &Bounds) -> bool {
    let feet = player.feet();
    player.bounds().overlaps_x(bounds)
        && feet <= bounds.y + SUPPORT_SLACK
        && feet + SUPPORT_SLACK >= bounds.y
}

fn update_support(run: &mut RunState) {
    let ground_line = run.config.ground_line();
    let supported = run
        .obstacles
        .iter()
        .any(|o| is_supported_by(&run.player, &o.bounds));

    let player = &mut run.player;
    if !supported && player.feet() < ground_line && player.motion == MotionState::Grounded {
        player.motion = MotionState::Falling;
    }
}

fn finish(run: &mut RunState, outcome: RunOutcome) -> RunEvent {
    run.outcome = outcome;
    info!(
        ?outcome,
        collected = run.total_collected,
        required = run.required(),
        ticks = run.tick_count,
        "run finished"
    );

    match outcome {
        RunOutcome::Defeat(defeat_reason) => RunEvent::Defeat {
            defeat_reason,
            total_collected: run.total_collected,
        },
        _ => RunEvent::Victory {
            total_collected: run.total_collected,
        },
    }
}
