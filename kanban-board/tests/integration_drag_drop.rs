//! Integration tests for pointer drops and keyboard moves through the
//! coordinator

use kanban_board::ordering::Edge;
use kanban_board::store::{MemoryStore, StateStore};
use kanban_board::test_support::{abc_board, deterministic_sample, item_ids, RecordingAnnouncer};
use kanban_board::{
    BoardCoordinator, BoardGateway, BoardId, CardId, CardKeyboardMove, ColumnId, DropIntent, DropTarget,
    Outcome, Trigger,
};
use std::sync::Arc;

async fn open_abc() -> (BoardCoordinator, Arc<RecordingAnnouncer>, BoardId) {
    let store = Arc::new(MemoryStore::new());
    store
        .set("BOARD_DATA", serde_json::to_value(abc_board()).unwrap())
        .await
        .unwrap();
    let announcer = Arc::new(RecordingAnnouncer::new());
    let coordinator = BoardCoordinator::new(
        BoardGateway::new(store, "BOARD_DATA", Vec::new()),
        deterministic_sample(),
        announcer.clone(),
    );
    let id = BoardId::from("b1");
    coordinator.open(id.clone()).await.unwrap();
    (coordinator, announcer, id)
}

#[test_log::test(tokio::test)]
async fn test_drag_card_below_card_in_other_column() {
    let (coordinator, announcer, id) = open_abc().await;

    let intent = DropIntent::card("b", "A", 1)
        .over(DropTarget::new("d").with_edge(Edge::Bottom))
        .over(DropTarget::new("C"));
    let dispatched = coordinator.handle_drop(&id, &intent).await.unwrap().unwrap();
    dispatched.pending_save.unwrap().wait().await;

    let board = coordinator.snapshot(&id).await.unwrap();
    assert_eq!(item_ids(&board, "A"), vec!["a", "c"]);
    assert_eq!(item_ids(&board, "C"), vec!["d", "b", "e"]);

    let last = board.last_operation.unwrap();
    assert_eq!(last.trigger, Some(Trigger::Pointer));
    assert_eq!(
        last.outcome,
        Outcome::CardMove {
            finish_column_id: ColumnId::from("C"),
            item_index_in_start_column: 1,
            item_index_in_finish_column: 1,
        }
    );
    // pointer card moves are not announced
    assert!(announcer.messages().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_drag_card_onto_empty_column() {
    let (coordinator, _, id) = open_abc().await;

    let intent = DropIntent::card("c", "A", 2).over(DropTarget::new("B"));
    coordinator.handle_drop(&id, &intent).await.unwrap().unwrap();

    let board = coordinator.snapshot(&id).await.unwrap();
    assert_eq!(item_ids(&board, "B"), vec!["c"]);
    board.check_invariants().unwrap();
}

#[test_log::test(tokio::test)]
async fn test_drag_card_above_card_in_same_column() {
    let (coordinator, _, id) = open_abc().await;

    let intent = DropIntent::card("c", "A", 2)
        .over(DropTarget::new("a").with_edge(Edge::Top))
        .over(DropTarget::new("A"));
    coordinator.handle_drop(&id, &intent).await.unwrap().unwrap();

    let board = coordinator.snapshot(&id).await.unwrap();
    assert_eq!(item_ids(&board, "A"), vec!["c", "a", "b"]);
}

#[test_log::test(tokio::test)]
async fn test_drag_column_is_announced() {
    let (coordinator, announcer, id) = open_abc().await;

    let intent = DropIntent::column("A", 0).over(DropTarget::new("C").with_edge(Edge::Right));
    coordinator.handle_drop(&id, &intent).await.unwrap().unwrap();

    let board = coordinator.snapshot(&id).await.unwrap();
    let order: Vec<_> = board.ordered_column_ids.iter().map(ColumnId::as_str).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert_eq!(
        announcer.messages(),
        vec!["You've moved To do from position 1 to position 3 of 3.".to_string()]
    );
}

#[test_log::test(tokio::test)]
async fn test_drop_on_nothing_changes_nothing() {
    let (coordinator, _, id) = open_abc().await;

    let planned = coordinator
        .handle_drop(&id, &DropIntent::card("a", "A", 0))
        .await
        .unwrap();

    assert!(planned.is_none());
    assert_eq!(coordinator.snapshot(&id).await.unwrap(), abc_board());
}

#[test_log::test(tokio::test)]
async fn test_keyboard_card_to_column_is_announced() {
    let (coordinator, announcer, id) = open_abc().await;

    coordinator
        .move_card_with_keyboard(&id, &CardId::from("e"), &CardKeyboardMove::ToColumn(ColumnId::from("A")))
        .await
        .unwrap()
        .unwrap();

    let board = coordinator.snapshot(&id).await.unwrap();
    assert_eq!(item_ids(&board, "A"), vec!["e", "a", "b", "c"]);
    assert_eq!(
        announcer.messages(),
        vec!["You've moved Eve from position 2 to position 1 in the To do column.".to_string()]
    );
}
