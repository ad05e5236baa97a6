#[cfg(test)]
mod tests {
    use std::num::NonZero;
    use std::ops::ControlFlow;

    use crate::{from_fn, solve_configuration, solve_orientations, trace, BeamStep, BuilderInvalidReason, CandidateSet, Cell, Direction, Exhaustive, Grid, GridError, Level, LevelBuilder, Location, ParseGridError, SearchEvent, Solver, SolverFailure, TraceBudget};

    fn grid(ascii: &str) -> Grid {
        ascii.parse().unwrap()
    }

    fn step(x: usize, y: usize, direction: Direction) -> BeamStep {
        BeamStep { location: Location(x, y), direction }
    }

    fn candidates(sets: &[&[(usize, usize)]]) -> Vec<CandidateSet> {
        sets.iter()
            .map(|set| CandidateSet::new(set.iter().map(|(x, y)| Location(*x, *y)).collect()).unwrap())
            .collect()
    }

    // solves orientations, returning the result and how many traces it took
    fn counting_traces(grid: &mut Grid, exhaustive: bool) -> (Result<crate::Trace, SolverFailure>, usize) {
        let mut traces = 0;
        let monitor = from_fn(|event: &SearchEvent<'_>| {
            if let SearchEvent::Traced { traces: so_far, .. } = event {
                traces = *so_far;
            }
            ControlFlow::Continue(())
        });
        let result = if exhaustive {
            Solver::new().with_search(Exhaustive).with_monitor(monitor).solve_orientations(grid)
        } else {
            Solver::new().with_monitor(monitor).solve_orientations(grid)
        };
        (result, traces)
    }

    #[test]
    fn render_round_trip() {
        let ascii = "0.O.\n.a..\n...h\n4...\n";
        assert_eq!(grid(ascii).to_string(), ascii);
        assert_eq!(grid(ascii).count_targets(), 1);
        assert_eq!(grid(ascii).cell_at(Location(3, 2)), Some(Cell::RedirectNode { direction: Direction::NorthEast }));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(ParseGridError::Empty));
        assert_eq!("...\n..\n".parse::<Grid>(), Err(ParseGridError::RaggedRow { row: 1 }));
        assert_eq!("..\n.x\n".parse::<Grid>(), Err(ParseGridError::UnknownGlyph { glyph: 'x', location: Location(1, 1) }));
        assert_eq!("8\n".parse::<Grid>(), Err(ParseGridError::UnknownGlyph { glyph: '8', location: Location(0, 0) }));
    }

    #[test]
    fn out_of_bounds_access() {
        let mut board = grid("0..\n...\n");

        assert_eq!(board.cell_at(Location(3, 0)), None);
        assert_eq!(board.cell_at(Location(0, 2)), None);
        assert_eq!(board.cell_at(Location(0, 0).step(Direction::West)), None);
        assert_eq!(board.cell_at(Location(0, 0).step(Direction::North)), None);

        assert_eq!(board.set_cell(Location(3, 1), Cell::Target), Err(GridError::OutOfBounds(Location(3, 1))));
        assert_eq!(board.rotate_at(Location(0, 5)), Err(GridError::OutOfBounds(Location(0, 5))));
        assert_eq!(board.to_string(), "0..\n...\n");

        assert_eq!(board.set_cell(Location(2, 1), Cell::Target), Ok(()));
        assert_eq!(board.to_string(), "0..\n..O\n");
    }

    #[test]
    fn rotate_like_a_click() {
        let mut board = grid("6h\nO.\n");

        assert_eq!(board.rotate_at(Location(0, 0)), Ok(Cell::Emitter { direction: Direction::East }));
        assert_eq!(board.rotate_at(Location(1, 0)), Ok(Cell::RedirectNode { direction: Direction::East }));
        assert_eq!(board.rotate_at(Location(0, 1)), Ok(Cell::Target));
        assert_eq!(board.rotate_at(Location(1, 1)), Ok(Cell::Empty));
        assert_eq!(board.to_string(), "0a\nO.\n");
    }

    #[test]
    fn straight_beam_hits_target() {
        let result = trace(&grid("0.O\n...\n...\n"));

        assert_eq!(result.unresolved(), 0);
        assert_eq!(result.steps(), &[
            step(0, 0, Direction::East),
            step(1, 0, Direction::East),
            step(2, 0, Direction::East),
        ]);
        assert_eq!(result.to_string(), "0 > 0,0,0 > 1,0,0 > 2,0,0");
    }

    #[test]
    fn no_emitters() {
        let result = trace(&grid("O.a\n.O.\n"));

        assert!(result.steps().is_empty());
        assert_eq!(result.unresolved(), 2);
    }

    #[test]
    fn redirect_node_turns_beam() {
        let board = grid("0c.\n...\n.O.\n");
        let result = trace(&board);

        assert!(result.is_solved());
        assert_eq!(result.steps(), &[
            step(0, 0, Direction::East),
            step(1, 0, Direction::South),
            step(1, 1, Direction::South),
            step(1, 2, Direction::South),
        ]);
        assert_eq!(result.redirects_on_path(&board), vec![step(1, 0, Direction::South)]);
    }

    #[test]
    fn beam_returning_to_a_node_ends() {
        // the node sends the beam back west; it crosses (1, 0) again and ends at the emitter
        let result = trace(&grid("0.e\n...\n...\n"));

        assert_eq!(result.steps(), &[
            step(0, 0, Direction::East),
            step(1, 0, Direction::East),
            step(2, 0, Direction::West),
            step(1, 0, Direction::West),
        ]);
    }

    #[test]
    fn crossing_beams_continue() {
        let result = trace(&grid(".2.\n0.O\n...\n"));

        assert!(result.is_solved());
        assert_eq!(result.steps(), &[
            step(1, 0, Direction::South),
            step(1, 1, Direction::South),
            step(1, 2, Direction::South),
            step(0, 1, Direction::East),
            step(1, 1, Direction::East),
            step(2, 1, Direction::East),
        ]);
    }

    #[test]
    fn targets_count_once() {
        let result = trace(&grid(".2..\n0O.O\n....\n...O\n"));

        // (1, 1) is struck by both beams, (3, 3) by neither
        assert_eq!(result.unresolved(), 1);
    }

    #[test]
    fn emitter_mid_path_turns_beam() {
        let result = trace(&grid("0.4\n"));

        assert_eq!(result.steps(), &[
            step(0, 0, Direction::East),
            step(1, 0, Direction::East),
            step(2, 0, Direction::West),
            step(1, 0, Direction::West),
            // the second emitter still starts its own beam, which ends back at the first emitter
            step(2, 0, Direction::West),
            step(1, 0, Direction::West),
        ]);
    }

    #[test]
    fn emitter_on_traced_path_still_fires() {
        let result = trace(&grid("0.c\n...\n..2\n...\n"));

        assert_eq!(result.steps(), &[
            step(0, 0, Direction::East),
            step(1, 0, Direction::East),
            step(2, 0, Direction::South),
            step(2, 1, Direction::South),
            step(2, 2, Direction::South),
            step(2, 3, Direction::South),
            step(2, 2, Direction::South),
            step(2, 3, Direction::South),
        ]);
    }

    #[test]
    fn already_solved() {
        let mut board = grid("0c.\n...\n.O.\n");
        let (result, traces) = counting_traces(&mut board, false);

        assert!(result.unwrap().is_solved());
        assert_eq!(traces, 1);
        assert_eq!(board.to_string(), "0c.\n...\n.O.\n");
    }

    #[test]
    fn single_node_within_eight_traces() {
        let mut board = grid("0.a\n...\n..O\n");
        let (result, traces) = counting_traces(&mut board, false);

        assert!(result.is_ok());
        assert_eq!(traces, 3);
        assert_eq!(board.to_string(), "0.c\n...\n..O\n");
    }

    #[test]
    fn single_node_unsolvable() {
        let mut board = grid("0a.\n...\n..O\n");
        let (result, traces) = counting_traces(&mut board, false);

        assert_eq!(result, Err(SolverFailure::NoSolutionFromStart { unresolved: 1 }));
        assert_eq!(traces, 8);
        // every orientation was tried and the node has come back round
        assert_eq!(board.to_string(), "0a.\n...\n..O\n");
    }

    #[test]
    fn no_node_on_path() {
        let mut board = grid("0..\n...\na.O\n");

        assert_eq!(solve_orientations(&mut board), Err(SolverFailure::NoSolutionFromStart { unresolved: 1 }));
        assert_eq!(board.to_string(), "0..\n...\na.O\n");
    }

    #[test]
    fn carries_to_earlier_node() {
        // the second node cannot reach the target from any orientation, so the first one has to turn past it
        let mut board = grid("0.a\n..a\nO..\n");
        let (result, traces) = counting_traces(&mut board, false);

        assert!(result.is_ok());
        assert_eq!(traces, 11);
        assert_eq!(board.to_string(), "0.d\n..a\nO..\n");
    }

    #[test]
    fn exhaustive_counts_in_row_major_order() {
        let mut board = grid("0.a\n..a\nO..\n");
        let (result, traces) = counting_traces(&mut board, true);

        assert!(result.is_ok());
        assert_eq!(traces, 4);
        assert_eq!(board.to_string(), "0.d\n..a\nO..\n");
    }

    #[test]
    fn exhaustive_restores_orientations() {
        let mut board = grid("0b.\n...\n..O\n");
        let (result, traces) = counting_traces(&mut board, true);

        assert_eq!(result, Err(SolverFailure::NoSolutionFromStart { unresolved: 1 }));
        assert_eq!(traces, 8);
        assert_eq!(board.to_string(), "0b.\n...\n..O\n");
    }

    #[test]
    fn budget_cancels() {
        let mut board = grid("0.a\n..a\nO..\n");
        let result = Solver::new().with_monitor(TraceBudget(5)).solve_orientations(&mut board);

        assert_eq!(result, Err(SolverFailure::Cancelled { traces: 5 }));
    }

    #[test]
    fn budget_keeps_solution() {
        let mut board = grid("0c.\n...\n.O.\n");
        let result = Solver::new().with_monitor(TraceBudget(1)).solve_orientations(&mut board);

        assert!(result.is_ok());
    }

    #[test]
    fn configuration_picks_solvable_candidate() {
        let mut board = grid("0..\n...\n..O\n");
        let result = solve_configuration(&mut board, &candidates(&[&[(1, 0), (2, 0)]]));

        assert!(result.unwrap().is_solved());
        assert_eq!(board.to_string(), "0.c\n...\n..O\n");
    }

    #[test]
    fn configuration_exhausted() {
        let mut board = grid("0..\n...\n..O\n");
        let result = solve_configuration(&mut board, &candidates(&[&[(1, 0), (0, 1)]]));

        assert_eq!(result, Err(SolverFailure::ConfigurationExhausted { attempts: 2 }));
        assert_eq!(board.to_string(), "0..\na..\n..O\n");
    }

    #[test]
    fn configuration_odometer_order() {
        let mut board = grid("0...\n...O\n....\n....\n");
        let mut attempts = Vec::new();

        let result = Solver::new()
            .with_monitor(from_fn(|event: &SearchEvent<'_>| {
                if let SearchEvent::ConfigurationAttempt { active, .. } = event {
                    attempts.push(active.to_vec());
                }
                ControlFlow::Continue(())
            }))
            .solve_configuration(&mut board, &candidates(&[&[(0, 2), (1, 2)], &[(0, 3), (1, 3)]]));

        assert_eq!(result, Err(SolverFailure::ConfigurationExhausted { attempts: 4 }));
        assert_eq!(attempts, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn configuration_without_nodes_traces_once() {
        let mut board = grid("0.O\n");

        assert!(solve_configuration(&mut board, &[]).is_ok());
        assert_eq!(solve_configuration(&mut grid("0..\n..O\n"), &[]), Err(SolverFailure::ConfigurationExhausted { attempts: 1 }));
    }

    #[test]
    fn configuration_rejects_outside_candidates() {
        let mut board = grid("0..\n...\n..O\n");
        let result = solve_configuration(&mut board, &candidates(&[&[(1, 0)], &[(2, 1), (3, 1)]]));

        assert_eq!(result, Err(SolverFailure::Grid(GridError::OutOfBounds(Location(3, 1)))));
        assert_eq!(board.to_string(), "0..\n...\n..O\n");
    }

    #[test]
    fn empty_candidate_set() {
        assert!(CandidateSet::new(vec![]).is_err());
        assert!(CandidateSet::try_from(vec![Location(0, 0)]).is_ok());
    }

    #[test]
    fn builder_places_first_candidates() {
        let level = LevelBuilder::with_dims((NonZero::new(4).unwrap(), NonZero::new(3).unwrap()))
            .add_emitter(Location(0, 0), Direction::South)
            .add_target(Location(3, 2))
            .add_target(Location(1, 1))
            .add_redirect_node(vec![Location(1, 1), Location(2, 1)])
            .build()
            .unwrap();

        assert_eq!(format!("{}", level), "2...
.a..
...O
");
        assert_eq!(level.candidates().len(), 1);
    }

    #[test]
    fn builder_invalid() {
        let mut builder = LevelBuilder::with_dims((NonZero::new(4).unwrap(), NonZero::new(3).unwrap()));
        builder.add_target(Location(4, 0));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
        // further features are ignored once invalid
        builder.add_redirect_node(vec![]);
        assert!(builder.build().is_err());

        let mut builder = LevelBuilder::default();
        builder.add_redirect_node(vec![]);
        assert_eq!(builder.build().err(), Some(&vec![BuilderInvalidReason::EmptyCandidateSet]));

        let mut builder = LevelBuilder::default();
        builder.add_redirect_node(vec![Location(0, 0), Location(16, 0)]);
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
    }

    #[test]
    fn level_with_moving_node() {
        let mut level = LevelBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(3).unwrap()))
            .add_emitter(Location(0, 0), Direction::East)
            .add_target(Location(2, 2))
            .add_redirect_node(vec![Location(1, 0), Location(2, 0)])
            .build()
            .unwrap();

        assert_eq!(level.to_string(), "0a.\n...\n..O\n");
        assert!(level.solve().is_ok());
        assert_eq!(level.to_string(), "0.c\n...\n..O\n");
    }

    #[test]
    fn solve_default_level() {
        let mut level = Level::default_level();
        assert_eq!(level.trace().unresolved(), 1);

        let solved = level.solve().unwrap();
        assert!(solved.is_solved());
        assert_eq!(level.grid().cell_at(Location(15, 1)), Some(Cell::RedirectNode { direction: Direction::South }));
        assert_eq!(level.grid().cell_at(Location(15, 11)), Some(Cell::RedirectNode { direction: Direction::West }));
        assert_eq!(level.grid().cell_at(Location(0, 11)), Some(Cell::RedirectNode { direction: Direction::North }));
        assert_eq!(solved.redirects_on_path(level.grid()), vec![
            step(15, 1, Direction::South),
            step(15, 11, Direction::West),
            step(0, 11, Direction::North),
        ]);
    }
}

#[cfg(test)]
mod properties {
    use std::num::NonZero;

    use proptest::prelude::*;

    use crate::{trace, Cell, Direction, Exhaustive, Grid, Location, Solver, TraceBudget};

    fn arb_direction() -> impl Strategy<Value = Direction> {
        (0u8..8).prop_map(|index| Direction::from_index(index).unwrap())
    }

    fn arb_cell(node_weight: u32) -> impl Strategy<Value = Cell> {
        prop_oneof![
            8 => Just(Cell::Empty),
            2 => Just(Cell::Target),
            1 => arb_direction().prop_map(|direction| Cell::Emitter { direction }),
            node_weight => arb_direction().prop_map(|direction| Cell::RedirectNode { direction }),
        ]
    }

    fn arb_grid(max_side: usize, node_weight: u32) -> impl Strategy<Value = Grid> {
        (1..=max_side, 1..=max_side).prop_flat_map(move |(width, height)| {
            proptest::collection::vec(arb_cell(node_weight), width * height).prop_map(move |cells| {
                let mut grid = Grid::with_dims((NonZero::new(width).unwrap(), NonZero::new(height).unwrap()));
                for (index, cell) in cells.into_iter().enumerate() {
                    grid.set_cell(Location(index % width, index / width), cell).unwrap();
                }
                grid
            })
        })
    }

    fn replace(grid: &Grid, replaced: fn(&Cell) -> bool) -> Grid {
        let mut out = grid.clone();
        for (location, cell) in grid.cells() {
            if replaced(&cell) {
                out.set_cell(location, Cell::Empty).unwrap();
            }
        }
        out
    }

    proptest! {
        #[test]
        fn no_emitters_no_path(grid in arb_grid(8, 3)) {
            let grid = replace(&grid, |cell| matches!(cell, Cell::Emitter { .. }));
            let result = trace(&grid);

            prop_assert!(result.steps().is_empty());
            prop_assert_eq!(result.unresolved(), grid.count_targets());
        }

        #[test]
        fn no_targets_always_solved(grid in arb_grid(8, 3)) {
            let grid = replace(&grid, |cell| *cell == Cell::Target);

            prop_assert!(trace(&grid).is_solved());
        }

        #[test]
        fn trace_is_well_formed(grid in arb_grid(8, 3)) {
            let result = trace(&grid);

            prop_assert!(result.unresolved() <= grid.count_targets());
            prop_assert_eq!(&result, &trace(&grid));

            for step in result.steps() {
                prop_assert!(grid.contains(step.location));
                if let Some(Cell::RedirectNode { direction }) = grid.cell_at(step.location) {
                    prop_assert_eq!(step.direction, direction);
                }
            }

            let nodes = result.redirects_on_path(&grid);
            for (index, node) in nodes.iter().enumerate() {
                prop_assert!(nodes[index + 1..].iter().all(|later| later.location != node.location));
            }

            let first_emitter = grid.cells().find(|(_, cell)| matches!(cell, Cell::Emitter { .. }));
            prop_assert_eq!(result.steps().first().map(|step| step.location), first_emitter.map(|(location, _)| location));
        }

        #[test]
        fn exhaustive_finds_what_path_driven_finds(grid in arb_grid(5, 1)) {
            prop_assume!(grid.redirect_nodes().len() <= 3);

            let mut path_driven = grid.clone();
            let mut exhaustive = grid.clone();
            if Solver::new().with_monitor(TraceBudget(500)).solve_orientations(&mut path_driven).is_ok() {
                prop_assert!(trace(&path_driven).is_solved());
                prop_assert!(Solver::new().with_search(Exhaustive).solve_orientations(&mut exhaustive).is_ok());
                prop_assert!(trace(&exhaustive).is_solved());
            }
        }
    }
}
