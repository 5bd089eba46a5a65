use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_ai::core::{Board, Grid};
use tetris_ai::engine::{evaluate, MoveSearch};
use tetris_ai::session::{Session, SessionConfig};
use tetris_ai::types::{PieceKind, PlayerType};

/// Ragged stack with a few holes, typical of mid-game boards
fn midgame_grid() -> Grid {
    let mut grid = Grid::new(10, 20);
    let heights = [6, 4, 5, 7, 3, 2, 4, 6, 5, 0];
    for (x, h) in heights.iter().enumerate() {
        for y in (20 - h)..20 {
            grid.set(x as i32, y, 3);
        }
    }
    grid.set(2, 17, 0);
    grid.set(7, 18, 0);
    grid
}

fn bench_ai_tick(c: &mut Criterion) {
    let mut session = Session::new(SessionConfig::default().with_player(PlayerType::Ai)).unwrap();
    session.start();

    c.bench_function("ai_session_tick", |b| {
        b.iter(|| {
            session.tick();
            if session.ui_state() == tetris_ai::types::UiState::GameOver {
                session.restart();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut grid = Grid::new(10, 20);
            for y in 16..20 {
                for x in 0..10 {
                    grid.set(x, y, 1);
                }
            }
            grid.clear_full_rows()
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let grid = midgame_grid();
    c.bench_function("evaluate_midgame", |b| {
        b.iter(|| evaluate(black_box(&grid), black_box(0)))
    });
}

fn bench_search(c: &mut Criterion) {
    let grid = midgame_grid();
    let search = MoveSearch::default();
    for kind in [PieceKind::O, PieceKind::T, PieceKind::I] {
        c.bench_function(&format!("best_move_{}", kind.as_str()), |b| {
            b.iter(|| search.find_best_move(black_box(&grid), kind))
        });
    }
}

fn bench_spawn(c: &mut Criterion) {
    let mut board = Board::new(10, 20, 12345);

    c.bench_function("spawn_piece", |b| {
        b.iter(|| board.spawn())
    });
}

criterion_group!(
    benches,
    bench_ai_tick,
    bench_line_clear,
    bench_evaluate,
    bench_search,
    bench_spawn
);
criterion_main!(benches);
