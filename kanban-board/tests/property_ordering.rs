//! Property-based tests for the ordering primitive, the destination
//! resolver and the board invariants

use kanban_board::card::{MoveCard, RemoveCard, ReorderCard};
use kanban_board::column::{AddColumn, ReorderColumn};
use kanban_board::ordering::{reorder, resolve_destination_index, Axis, DropSignal, Edge};
use kanban_board::test_support::{abc_board, deterministic_sample};
use kanban_board::{BoardCommand, BoardOperation};
use proptest::prelude::*;

// Generators for test data

/// A list with a valid (start, finish) pair
fn list_and_move() -> impl Strategy<Value = (Vec<u32>, usize, usize)> {
    prop::collection::vec(any::<u32>(), 1..30).prop_flat_map(|list| {
        let len = list.len();
        (Just(list), 0..len, 0..len)
    })
}

fn edge() -> impl Strategy<Value = Option<Edge>> {
    prop::option::of(prop_oneof![
        Just(Edge::Top),
        Just(Edge::Bottom),
        Just(Edge::Left),
        Just(Edge::Right),
    ])
}

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Vertical), Just(Axis::Horizontal)]
}

/// Commands over the abc board, valid or not
fn command() -> impl Strategy<Value = BoardCommand> {
    let column = prop_oneof![Just("A"), Just("B"), Just("C"), Just("Q")];
    let card = prop_oneof![Just("a"), Just("b"), Just("c"), Just("d"), Just("e"), Just("z")];
    prop_oneof![
        Just(BoardCommand::from(AddColumn::new("b1"))),
        (column.clone(), card).prop_map(|(c, id)| BoardCommand::from(RemoveCard::new("b1", c, id))),
        (0..4usize, 0..4usize).prop_map(|(s, f)| BoardCommand::from(ReorderColumn::new("b1", s, f))),
        (column.clone(), 0..4usize, 0..4usize)
            .prop_map(|(c, s, f)| BoardCommand::from(ReorderCard::new("b1", c, s, f))),
        (column.clone(), column, 0..4usize, prop::option::of(0..5usize)).prop_map(
            |(from, to, index, at)| {
                let op = MoveCard::new("b1", from, to, index);
                BoardCommand::from(match at {
                    Some(at) => op.at_index(at),
                    None => op,
                })
            }
        ),
    ]
}

proptest! {
    /// Property: reorder keeps every element exactly once
    #[test]
    fn prop_reorder_preserves_elements((list, start, finish) in list_and_move()) {
        let moved = reorder(&list, start, finish);

        prop_assert_eq!(moved.len(), list.len());
        prop_assert_eq!(moved[finish], list[start]);
        let mut a = list.clone();
        let mut b = moved;
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }

    /// Property: the inverse move restores the original sequence
    #[test]
    fn prop_reorder_inverse_restores((list, start, finish) in list_and_move()) {
        let moved = reorder(&list, start, finish);
        prop_assert_eq!(reorder(&moved, finish, start), list);
    }

    /// Property: dropping an element on itself is a no-op
    #[test]
    fn prop_self_drop_returns_start(start in 0..100usize, closest_edge in edge(), axis in axis()) {
        let finish = resolve_destination_index(DropSignal {
            start_index: start,
            index_of_target: start,
            closest_edge,
            axis,
        });
        prop_assert_eq!(finish, start);
    }

    /// Property: the resolved index is always valid for reorder
    #[test]
    fn prop_resolved_index_in_bounds(
        (len, start, target) in (1..30usize).prop_flat_map(|len| (Just(len), 0..len, 0..len)),
        closest_edge in edge(),
        axis in axis(),
    ) {
        let finish = resolve_destination_index(DropSignal {
            start_index: start,
            index_of_target: target,
            closest_edge,
            axis,
        });
        prop_assert!(finish < len);
    }

    /// Property: board invariants hold after any sequence of operations,
    /// and rejected operations leave the board untouched
    #[test]
    fn prop_board_invariants_hold(commands in prop::collection::vec(command(), 0..40)) {
        let mut board = abc_board();
        let mut sample = deterministic_sample();

        for command in &commands {
            let before = board.clone();
            match command.apply(&mut board, &mut sample) {
                Ok(applied) if applied.is_changed() => {
                    let expected = match command {
                        BoardCommand::AddColumn(_) => before.card_count() + sample.added_column_cards,
                        BoardCommand::RemoveCard(_) => before.card_count() - 1,
                        _ => before.card_count(),
                    };
                    prop_assert_eq!(board.card_count(), expected);
                }
                _ => prop_assert_eq!(&board, &before),
            }
            prop_assert!(board.check_invariants().is_ok());
        }
    }
}
