// ==========================================
// 本地快照持久化集成测试
// ==========================================
// 测试目标: 修改后自动保存、重启后恢复、损坏快照回退为空看板
// ==========================================


use class_schedule_board::api::AutoDecision;
use class_schedule_board::db::open_sqlite_connection;
use class_schedule_board::domain::types::{Day, TimePeriod};
use class_schedule_board::repository::{SnapshotRepository, STORAGE_KEY};
use std::sync::Arc;
use test_helpers::{create_test_db, open_board, slot, RecordingUi};

#[test]
fn test_board_survives_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let (box_id, rule_id, color) = {
        let mut board = open_board(&db_path, Arc::new(AutoDecision::Accept));
        let b = board.create_box("Matte 1A", "Anna", 3).unwrap();
        board
            .place_box(b.id, slot(Day::Thursday, TimePeriod::Fourth, 1))
            .unwrap();
        let rule = board.add_restriction("Matte *", "Svenska *").unwrap();
        (b.id, rule.id, b.color)
    };

    let board = open_board(&db_path, Arc::new(AutoDecision::Accept));
    let restored = board.find_box(box_id).expect("box should be restored");
    assert_eq!(restored.quantity, 2);
    assert_eq!(restored.initial_quantity, Some(3));
    assert_eq!(
        board.schedule().get(&slot(Day::Thursday, TimePeriod::Fourth, 1)),
        Some(box_id)
    );
    assert_eq!(board.restrictions()[0].id, rule_id);

    // 颜色注册表按盒子重建
    assert_eq!(board.colors().color_of("Matte 1A"), Some(color.as_str()));
}

#[test]
fn test_autosave_disabled_until_manual_save() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    {
        let mut board = open_board(&db_path, Arc::new(AutoDecision::Accept));
        board.set_autosave(false);
        board.create_box("Bild", "Karin", 1).unwrap();
    }
    let board = open_board(&db_path, Arc::new(AutoDecision::Accept));
    assert!(board.boxes().is_empty());

    {
        let mut board = open_board(&db_path, Arc::new(AutoDecision::Accept));
        board.set_autosave(false);
        board.create_box("Bild", "Karin", 1).unwrap();
        board.save_now().expect("manual save");
    }
    let board = open_board(&db_path, Arc::new(AutoDecision::Accept));
    assert_eq!(board.boxes().len(), 1);
}

#[test]
fn test_reset_clears_stored_snapshot() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    {
        let mut board = open_board(&db_path, Arc::new(AutoDecision::Accept));
        board.create_box("Musik", "Per", 2).unwrap();
        assert!(board.reset_board());
    }

    let repo = SnapshotRepository::new(&db_path).expect("Failed to open repository");
    assert!(repo.load().unwrap().is_none());
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let conn = open_sqlite_connection(&db_path).expect("Failed to open db");
    conn.execute(
        "INSERT OR REPLACE INTO board_state (storage_key, payload, saved_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![STORAGE_KEY, "{not json", "2024-01-01T00:00:00Z"],
    )
    .unwrap();
    drop(conn);

    let ui = RecordingUi::answering(&[]);
    let mut board = open_board(&db_path, ui.clone());
    assert!(board.boxes().is_empty());
    assert!(board.schedule().is_empty());

    // 之后的修改会覆盖损坏的快照
    board.create_box("Idrott", "Lena", 1).unwrap();
    let repo = SnapshotRepository::new(&db_path).expect("Failed to open repository");
    assert_eq!(repo.load().unwrap().unwrap().boxes.len(), 1);
}

#[test]
fn test_failed_save_keeps_memory_state() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let ui = RecordingUi::answering(&[]);
    let mut board = open_board(&db_path, ui.clone());

    // 快照表不可写
    let conn = open_sqlite_connection(&db_path).expect("Failed to open db");
    conn.execute_batch("DROP TABLE board_state").unwrap();
    drop(conn);

    let created = board.create_box("Slöjd", "Nils", 2);
    assert!(created.is_ok());
    assert_eq!(board.boxes().len(), 1);
    assert_eq!(ui.notification_count(), 1);

    let box_id = created.unwrap().id;
    board
        .place_box(box_id, slot(Day::Monday, TimePeriod::Second, 3))
        .expect("placement should not fail on storage error");
    assert_eq!(board.find_box(box_id).unwrap().quantity, 1);
    assert_eq!(ui.notification_count(), 2);
}
