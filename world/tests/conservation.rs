use std::collections::HashMap;

use space_shooter_core::{CellCoord, Command, ContributionGrid, Event, NUM_DAYS, NUM_WEEKS};
use space_shooter_world::{self as world, query, World};

#[test]
fn targets_and_health_never_increase() {
    let grid = patterned_grid();
    let mut world = World::new(&grid);
    let mut previous = health_by_cell(&world);

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events).expect("scripted command accepted");

        let current = health_by_cell(&world);
        assert!(current.len() <= previous.len(), "target count increased");
        for (cell, health) in &current {
            let before = previous
                .get(cell)
                .copied()
                .expect("target appeared after initialisation");
            assert!(*health <= before, "health increased at {cell:?}");
        }
        previous = current;
    }
}

#[test]
fn every_destruction_is_reported_once() {
    let grid = patterned_grid();
    let mut world = World::new(&grid);
    let initial = query::target_view(&world).len();
    let mut destroyed = Vec::new();

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events).expect("scripted command accepted");
        destroyed.extend(events.into_iter().filter_map(|event| match event {
            Event::TargetDestroyed { cell } => Some(cell),
            _ => None,
        }));
    }

    let remaining = query::target_view(&world).len();
    assert_eq!(destroyed.len() + remaining, initial);

    let mut unique = destroyed.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), destroyed.len(), "a cell was destroyed twice");
}

fn health_by_cell(world: &World) -> HashMap<CellCoord, u8> {
    query::target_view(world)
        .iter()
        .map(|target| (target.cell, target.health.get()))
        .collect()
}

fn patterned_grid() -> ContributionGrid {
    let mut grid = ContributionGrid::empty();
    for column in 0..NUM_WEEKS {
        for row in 0..NUM_DAYS {
            let level = ((column * 3 + row * 5) % 5) as u8;
            grid = grid
                .with_level(CellCoord::new(column, row), level)
                .expect("pattern stays within bounds");
        }
    }
    grid
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for column in [25_u32, 20, 31, 0, 51, 26] {
        commands.push(Command::RequestMove { column });
        for _ in 0..40 {
            commands.push(Command::AdvanceFrame);
        }
        for _ in 0..6 {
            commands.push(Command::Fire);
            for _ in 0..9 {
                commands.push(Command::AdvanceFrame);
            }
        }
    }
    for _ in 0..120 {
        commands.push(Command::AdvanceFrame);
    }
    commands
}
