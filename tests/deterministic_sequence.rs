use rand::SeedableRng;
use rand::rngs::StdRng;
use snake_arena::config::{GridSize, SessionConfig};
use snake_arena::{Arena, Cell, DeathCause, Direction, Position, SnakeStatus};

fn arena(rows: u16, cols: u16, bodies: Vec<Vec<(i32, i32)>>, food: Vec<(i32, i32)>) -> Arena {
    Arena::from_parts(
        SessionConfig {
            grid_size: GridSize::new(rows, cols),
            ..SessionConfig::default()
        },
        bodies
            .into_iter()
            .map(|body| body.into_iter().map(Position::from).collect())
            .collect(),
        food.into_iter().map(Position::from).collect(),
        StdRng::seed_from_u64(42),
    )
    .expect("layout should be valid")
}

#[test]
fn food_growth_then_wall_collision() {
    let mut arena = arena(6, 6, vec![vec![(2, 2)]], vec![(2, 3)]);

    let report = arena
        .step(&arena.empty_moves().with(1, Direction::Right))
        .expect("step should succeed");
    assert_eq!(report.food_eaten, 1);
    assert_eq!(report.food_spawned, 1);
    let body: Vec<_> = arena.snakes()[0].segments().copied().collect();
    assert_eq!(body, vec![Position::new(2, 3), Position::new(2, 2)]);
    assert_eq!(report.grid.count_food(), 1);
    assert_ne!(report.grid.cell_at(Position::new(2, 3)), Some(Cell::Food));

    let report = arena
        .step(&arena.empty_moves().with(1, Direction::Up))
        .expect("step should succeed");
    assert_eq!(report.status(1), Some(SnakeStatus::Alive));
    assert_eq!(arena.snakes()[0].head().ok(), Some(Position::new(1, 3)));

    arena
        .step(&arena.empty_moves().with(1, Direction::Up))
        .expect("step should succeed");
    let report = arena
        .step(&arena.empty_moves().with(1, Direction::Up))
        .expect("step should succeed");
    assert_eq!(report.status(1), Some(SnakeStatus::Dead));
    assert_eq!(report.deaths[0].cause, DeathCause::Wall);
    assert_eq!(report.status_flags(), vec![0, 0]);
}

#[test]
fn adjacent_single_cell_agents_moving_into_each_other_both_die() {
    let mut arena = arena(10, 10, vec![vec![(5, 5)], vec![(5, 6)]], Vec::new());
    let moves = arena
        .empty_moves()
        .with(1, Direction::Right)
        .with(2, Direction::Left);

    let report = arena.step(&moves).expect("step should succeed");

    assert_eq!(report.status(1), Some(SnakeStatus::Dead));
    assert_eq!(report.status(2), Some(SnakeStatus::Dead));
    assert_eq!(report.status_flags(), vec![0, 0, 0]);
}

#[test]
fn tail_chase_keeps_agent_alive() {
    let mut arena = arena(
        10,
        10,
        vec![vec![(5, 5), (5, 6), (6, 6), (6, 5)]],
        Vec::new(),
    );

    for direction in [Direction::Down, Direction::Right, Direction::Up, Direction::Left] {
        let report = arena
            .step(&arena.empty_moves().with(1, direction))
            .expect("step should succeed");
        assert_eq!(report.status(1), Some(SnakeStatus::Alive));
        assert_eq!(arena.snakes()[0].len(), 4);
        assert!(arena.check_invariants().is_ok());
    }

    let body: Vec<_> = arena.snakes()[0].segments().copied().collect();
    assert_eq!(
        body,
        vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5)
        ]
    );
}

#[test]
fn dead_agents_stay_frozen() {
    let mut arena = arena(
        8,
        8,
        vec![vec![(0, 0), (1, 0)], vec![(4, 4)]],
        vec![(7, 7)],
    );

    arena
        .step(
            &arena
                .empty_moves()
                .with(1, Direction::Up)
                .with(2, Direction::Right),
        )
        .expect("step should succeed");
    let frozen: Vec<_> = arena.snakes()[0].segments().copied().collect();

    for _ in 0..3 {
        let report = arena
            .step(
                &arena
                    .empty_moves()
                    .with(1, Direction::Down)
                    .with(2, Direction::Down),
            )
            .expect("step should succeed");
        assert_eq!(report.status(1), Some(SnakeStatus::Dead));
        assert!(report.deaths.iter().all(|death| death.uid != 1));
    }

    let after: Vec<_> = arena.snakes()[0].segments().copied().collect();
    assert_eq!(frozen, after);
    assert_eq!(arena.grid().cell_at(Position::new(0, 0)).ok(), Some(Cell::body(1)));
    assert_eq!(arena.grid().cell_at(Position::new(1, 0)).ok(), Some(Cell::body(1)));
}

#[test]
fn lower_id_wins_the_race_for_a_tail_cell() {
    // Agent 3 steps into agent 2's tail after agent 2 has already moved on,
    // so the cell is either empty or agent 2's fresh segment.
    let mut arena = arena(
        10,
        10,
        vec![vec![(0, 9)], vec![(4, 4), (4, 5)], vec![(5, 5)]],
        Vec::new(),
    );
    let moves = arena
        .empty_moves()
        .with(1, Direction::Left)
        .with(2, Direction::Up)
        .with(3, Direction::Up);

    let report = arena.step(&moves).expect("step should succeed");

    assert!(report.deaths.is_empty());
    assert_eq!(arena.snakes()[2].head().ok(), Some(Position::new(4, 5)));
    assert!(arena.check_invariants().is_ok());
}

#[test]
fn dead_agent_tail_is_free_to_enter() {
    let mut arena = arena(10, 10, vec![vec![(1, 6)], vec![(0, 4), (0, 5)]], Vec::new());

    let report = arena
        .step(
            &arena
                .empty_moves()
                .with(1, Direction::Left)
                .with(2, Direction::Up),
        )
        .expect("step should succeed");
    assert_eq!(report.status(2), Some(SnakeStatus::Dead));

    let report = arena
        .step(&arena.empty_moves().with(1, Direction::Up))
        .expect("step should succeed");

    assert_eq!(report.status(1), Some(SnakeStatus::Alive));
    assert!(report.deaths.is_empty());
    assert_eq!(report.grid.cell_at(Position::new(0, 5)), Some(Cell::head(1)));
    assert!(arena.check_invariants().is_ok());
}

#[test]
fn longer_agent_passing_through_survives_the_reverse_move() {
    let mut arena = arena(10, 10, vec![vec![(5, 5), (5, 4)], vec![(5, 6)]], Vec::new());
    let moves = arena
        .empty_moves()
        .with(1, Direction::Right)
        .with(2, Direction::Left);

    let report = arena.step(&moves).expect("step should succeed");

    assert_eq!(report.status(1), Some(SnakeStatus::Alive));
    assert_eq!(report.status(2), Some(SnakeStatus::Dead));
    assert_eq!(report.deaths[0].cause, DeathCause::Body { owner: 1 });
    assert_eq!(report.status_flags(), vec![0, 1, 0]);
    assert!(arena.check_invariants().is_ok());
}
