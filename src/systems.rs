use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    Board, GamePhase, GameState, GravityTimer, Input, Position, Tetromino, TetrominoType,
};
use crate::config::CONFIG;
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, STARTING_LEVEL};
use crate::stats::{SessionSummary, StatsSink};

/// Starts a new session: empty board, fresh score/level/lines, a current
/// piece on the board and a queued next piece. Valid from any phase,
/// including `GameOver`.
pub fn start_game(world: &mut World) {
    info!("Starting new session");

    // Stale flags from the previous session must not leak into this one
    clear_move_flags(world);

    // Remove any leftover active piece before reseeding
    let stale: Vec<Entity> = world
        .query_filtered::<Entity, With<Tetromino>>()
        .iter(world)
        .collect();
    for entity in stale {
        world.despawn(entity);
    }

    let start_level = CONFIG
        .read()
        .map_or(STARTING_LEVEL, |config| config.game.starting_level)
        .max(1);

    world.insert_resource(GameState::for_new_session(start_level));
    world.insert_resource(Board::empty(BOARD_WIDTH, BOARD_HEIGHT));
    world.insert_resource(GravityTimer::for_level(start_level));

    spawn_tetromino(world);
}

/// Promotes the queued next piece to active (drawing a fresh lookahead) and
/// places it at the spawn anchor. A spawn that already collides ends the
/// session.
pub fn spawn_tetromino(world: &mut World) {
    let kind = {
        let mut game_state = world.resource_mut::<GameState>();
        let kind = game_state
            .next_tetromino
            .take()
            .unwrap_or_else(TetrominoType::random);
        game_state.next_tetromino = Some(TetrominoType::random());
        kind
    };

    let tetromino = Tetromino::new(kind);
    let position = spawn_anchor(&tetromino);

    let blocked = world.resource::<Board>().collides(position, &tetromino);
    if blocked {
        debug!("Spawn position blocked for {kind:?}");
        end_session(world);
        return;
    }

    world.spawn((tetromino, position));
}

/// Spawn anchor: horizontally centered bounding box, top row at row 0.
#[must_use]
pub fn spawn_anchor(piece: &Tetromino) -> Position {
    Position {
        x: (BOARD_WIDTH as i32 - piece.size() as i32) / 2,
        y: 0,
    }
}

/// Applies the pending input flags to the active piece. Every move is
/// validated against the board before it is committed; an invalid move is a
/// silent no-op, not an error. While paused only the resume toggle is
/// honored; after game over everything but `start_game` is ignored.
pub fn input_system(world: &mut World) {
    let input = world.resource::<Input>().clone();
    clear_move_flags(world);

    if input.toggle_pause {
        toggle_pause(world);
        return;
    }

    if !world.resource::<GameState>().is_running() {
        return;
    }

    let Some((entity, mut tetromino, mut position)) = active_piece(world) else {
        return;
    };

    if input.hard_drop {
        hard_drop(world, entity, &tetromino, position);
        return;
    }

    if input.left || input.right {
        let dx = if input.left { -1 } else { 1 };
        let target = position.translated(dx, 0);
        if !world.resource::<Board>().collides(target, &tetromino) {
            world.entity_mut(entity).insert(target);
            position = target;
        }
    }

    if input.rotate {
        if let Some((rotated, kicked)) = try_rotate(world.resource::<Board>(), &tetromino, position)
        {
            world.entity_mut(entity).insert((rotated.clone(), kicked));
            tetromino = rotated;
            position = kicked;
        }
    }

    if input.down {
        // Soft drop is one gravity tick on demand; restart the clock so the
        // next automatic tick doesn't land immediately after it
        world.resource_mut::<GravityTimer>().reset();
        step_down(world, entity, &tetromino, position);
    }
}

/// Rotation with the two-step kick retry: unshifted anchor first, then one
/// column left, then one column right. No SRS kick table; if all three
/// placements collide the rotation is rejected and the piece keeps its
/// prior shape and anchor.
#[must_use]
pub fn try_rotate(
    board: &Board,
    piece: &Tetromino,
    anchor: Position,
) -> Option<(Tetromino, Position)> {
    let rotated = piece.rotated();
    for dx in [0, -1, 1] {
        let candidate = anchor.translated(dx, 0);
        if !board.collides(candidate, &rotated) {
            return Some((rotated, candidate));
        }
    }
    trace!("Rotation rejected at {anchor:?}");
    None
}

/// Advances the gravity clock and applies one automatic descent when it
/// fires. Does nothing unless the session is running.
pub fn game_tick_system(world: &mut World, delta_seconds: f32) {
    trace!("Game tick with delta: {delta_seconds}");

    if !world.resource::<GameState>().is_running() {
        return;
    }

    if !world.resource_mut::<GravityTimer>().advance(delta_seconds) {
        return;
    }

    match active_piece(world) {
        Some((entity, tetromino, position)) => step_down(world, entity, &tetromino, position),
        None => spawn_tetromino(world),
    }
}

/// One-row descent: commit the move if legal, otherwise the piece has
/// landed and locks in place.
fn step_down(world: &mut World, entity: Entity, tetromino: &Tetromino, position: Position) {
    let below = position.translated(0, 1);
    if world.resource::<Board>().collides(below, tetromino) {
        lock_piece(world, entity, tetromino, position);
    } else {
        world.entity_mut(entity).insert(below);
    }
}

/// Drops to the deepest legal position and locks immediately.
fn hard_drop(world: &mut World, entity: Entity, tetromino: &Tetromino, position: Position) {
    let distance = {
        let board = world.resource::<Board>();
        let mut distance = 0;
        while !board.collides(position.translated(0, distance + 1), tetromino) {
            distance += 1;
        }
        distance
    };

    let landing = position.translated(0, distance);
    debug!("Hard drop {distance} rows to {landing:?}");
    world.entity_mut(entity).insert(landing);
    lock_piece(world, entity, tetromino, landing);
}

/// Writes the piece into the board, clears completed rows, applies scoring
/// and level progression, and promotes the next piece. A piece that settles
/// with any cell above row 0 ends the session instead.
fn lock_piece(world: &mut World, entity: Entity, tetromino: &Tetromino, position: Position) {
    info!("Locking tetromino at {position:?}");

    let locked_above_board = tetromino.cells(position).iter().any(|&(_, y)| y < 0);

    let locked = world.resource::<Board>().with_piece(position, tetromino);
    world.insert_resource(locked);
    world.despawn(entity);

    if locked_above_board {
        debug!("Piece locked above the visible board");
        end_session(world);
        return;
    }

    let full_rows = world.resource::<Board>().full_rows();
    if !full_rows.is_empty() {
        let cleared = world.resource::<Board>().without_rows(&full_rows);
        world.insert_resource(cleared);

        let (prior_level, level) = {
            let mut game_state = world.resource_mut::<GameState>();
            let prior_level = game_state.level;
            game_state.apply_clear(full_rows.len());
            info!(
                "Cleared {} lines, score {} level {}",
                full_rows.len(),
                game_state.score,
                game_state.level
            );
            (prior_level, game_state.level)
        };

        if level != prior_level {
            world.insert_resource(GravityTimer::for_level(level));
        }
    }

    spawn_tetromino(world);
}

/// Suspends or resumes the session. Resuming rebuilds the gravity timer so
/// no partial tick carries across the pause.
fn toggle_pause(world: &mut World) {
    let resumed_level = {
        let mut game_state = world.resource_mut::<GameState>();
        match game_state.phase {
            GamePhase::Running => {
                game_state.phase = GamePhase::Paused;
                info!("Paused");
                None
            }
            GamePhase::Paused => {
                game_state.phase = GamePhase::Running;
                info!("Resumed");
                Some(game_state.level)
            }
            GamePhase::NotStarted | GamePhase::GameOver => None,
        }
    };

    if let Some(level) = resumed_level {
        world.insert_resource(GravityTimer::for_level(level));
    }
}

/// Terminal transition into `GameOver`; emits the session summary to the
/// persistence collaborator without waiting on it.
fn end_session(world: &mut World) {
    let summary = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.phase = GamePhase::GameOver;
        SessionSummary {
            score: game_state.score,
            level: game_state.level,
            lines: game_state.lines_cleared,
            duration_seconds: game_state.elapsed_seconds(),
        }
    };

    info!(
        "Game over: score {} level {} lines {} after {}s",
        summary.score, summary.level, summary.lines, summary.duration_seconds
    );

    if let Some(sink) = world.get_resource::<StatsSink>() {
        sink.record(summary);
    }
}

/// The single active piece, if one exists.
fn active_piece(world: &mut World) -> Option<(Entity, Tetromino, Position)> {
    let mut query = world.query::<(Entity, &Tetromino, &Position)>();
    query
        .iter(world)
        .next()
        .map(|(entity, tetromino, position)| (entity, tetromino.clone(), *position))
}

/// Consumes the one-shot move flags while preserving the hard-drop key
/// release tracking.
fn clear_move_flags(world: &mut World) {
    let mut input = world.resource_mut::<Input>();
    let was_hard_drop_released = input.hard_drop_released;
    *input = Input::default();
    input.hard_drop_released = was_hard_drop_released;
}
