// ==========================================
// 命令层集成测试
// ==========================================
// 测试目标: AppState 初始化、命令 JSON 输出、错误响应格式、配置即时生效
// ==========================================


use class_schedule_board::app::commands::{self, ErrorResponse};
use class_schedule_board::app::AppState;
use class_schedule_board::api::AutoDecision;
use serde_json::Value;
use std::sync::Arc;
use test_helpers::{create_test_db, RecordingUi};

fn parse(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be JSON")
}

#[tokio::test]
async fn test_place_and_report_flow() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path, Arc::new(AutoDecision::Accept))
        .expect("Failed to create AppState");

    let created = parse(
        &commands::create_box(&state, "Tema 3".into(), "Tobias".into(), 2)
            .await
            .unwrap(),
    );
    let tema_id = created["id"].as_i64().unwrap();
    let eng_id = parse(
        &commands::create_box(&state, "Engelska 5 A".into(), "Anna".into(), 1)
            .await
            .unwrap(),
    )["id"]
        .as_i64()
        .unwrap();
    commands::add_restriction(&state, "Tema *".into(), "Engelska * A".into())
        .await
        .unwrap();

    let placed = parse(
        &commands::place_box(&state, tema_id, "Måndag-8:30-9:30-0".into())
            .await
            .unwrap(),
    );
    assert_eq!(placed["status"], "placed");

    // 冲突经自动确认后放置
    let overridden = parse(
        &commands::place_box(&state, eng_id, "Måndag-8:30-9:30-1".into())
            .await
            .unwrap(),
    );
    assert_eq!(overridden["overridden"][0], tema_id);

    let report = parse(&commands::check_conflicts(&state).await.unwrap());
    assert_eq!(report["valid"], false);
    assert_eq!(report["violations"].as_array().unwrap().len(), 2);

    let listed = parse(&commands::list_boxes(&state).await.unwrap());
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let hits = parse(&commands::search(&state, "Tema".into()).await.unwrap());
    assert_eq!(hits["boxes"].as_array().unwrap().len(), 1);

    let removed = parse(
        &commands::remove_from_slot(&state, "Måndag-8:30-9:30-1".into())
            .await
            .unwrap(),
    );
    assert_eq!(removed["removedBoxId"], eng_id);
}

#[tokio::test]
async fn test_error_response_format() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path, Arc::new(AutoDecision::Accept))
        .expect("Failed to create AppState");

    let id = parse(
        &commands::create_box(&state, "Bild".into(), "Karin".into(), 2)
            .await
            .unwrap(),
    )["id"]
        .as_i64()
        .unwrap();
    commands::place_box(&state, id, "Fredag-13:55-14:55-4".into())
        .await
        .unwrap();

    let err = commands::place_box(&state, id, "Fredag-13:55-14:55-4".into())
        .await
        .unwrap_err();
    let response: ErrorResponse = serde_json::from_str(&err).unwrap();
    assert_eq!(response.code, "SLOT_OCCUPIED");
    assert_eq!(response.details.unwrap()["occupant"], id);

    let err = commands::place_box(&state, id, "Lördag-8:30-9:30-0".into())
        .await
        .unwrap_err();
    let response: ErrorResponse = serde_json::from_str(&err).unwrap();
    assert_eq!(response.code, "INVALID_INPUT");

    let err = commands::create_box(&state, "Bild".into(), "Karin".into(), 0)
        .await
        .unwrap_err();
    let response: ErrorResponse = serde_json::from_str(&err).unwrap();
    assert_eq!(response.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_delete_box_respects_confirmation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let ui = RecordingUi::answering(&[false, true]);
    let state = AppState::new(db_path, ui.clone()).expect("Failed to create AppState");

    let id = parse(
        &commands::create_box(&state, "Musik".into(), "Per".into(), 1)
            .await
            .unwrap(),
    )["id"]
        .as_i64()
        .unwrap();

    let cancelled = parse(&commands::delete_box(&state, id).await.unwrap());
    assert_eq!(cancelled["cancelled"], true);
    assert_eq!(state.board.lock().await.boxes().len(), 1);

    let deleted = parse(&commands::delete_box(&state, id).await.unwrap());
    assert_eq!(deleted["cancelled"], false);
    assert!(state.board.lock().await.boxes().is_empty());
    assert_eq!(ui.confirms(), 2);
}

#[tokio::test]
async fn test_config_applies_to_open_board() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let ui = RecordingUi::answering(&[]);
    let state = AppState::new(db_path, ui.clone()).expect("Failed to create AppState");

    let config = parse(
        &commands::set_config(&state, "conflict.override_policy".into(), "NEVER".into())
            .await
            .unwrap(),
    );
    assert_eq!(config["conflict.override_policy"], "NEVER");

    let a = parse(
        &commands::create_box(&state, "Tema 1".into(), "T".into(), 1)
            .await
            .unwrap(),
    )["id"]
        .as_i64()
        .unwrap();
    let b = parse(
        &commands::create_box(&state, "Engelska 1 A".into(), "T".into(), 1)
            .await
            .unwrap(),
    )["id"]
        .as_i64()
        .unwrap();
    commands::add_restriction(&state, "Tema *".into(), "Engelska * A".into())
        .await
        .unwrap();
    commands::place_box(&state, a, "Onsdag-10:55-11:55-0".into())
        .await
        .unwrap();

    let declined = parse(
        &commands::place_box(&state, b, "Onsdag-10:55-11:55-1".into())
            .await
            .unwrap(),
    );
    assert_eq!(declined["status"], "declined");
    assert_eq!(ui.confirms(), 0);

    let err = commands::set_config(&state, "conflict.override_policy".into(), "maybe".into())
        .await
        .unwrap_err();
    let response: ErrorResponse = serde_json::from_str(&err).unwrap();
    assert_eq!(response.code, "INVALID_INPUT");
}

#[tokio::test]
async fn test_export_and_import_commands() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("export.json").display().to_string();

    let state = AppState::new(db_path, Arc::new(AutoDecision::Accept))
        .expect("Failed to create AppState");
    let id = parse(
        &commands::create_box(&state, "Fysik".into(), "Eva".into(), 1)
            .await
            .unwrap(),
    )["id"]
        .as_i64()
        .unwrap();
    commands::place_box(&state, id, "Torsdag-12:45-13:45-2".into())
        .await
        .unwrap();

    let exported = parse(
        &commands::export_schedule(&state, Some(path.clone()))
            .await
            .unwrap(),
    );
    assert_eq!(exported["placements"], 1);

    let cleared = parse(&commands::reset_board(&state).await.unwrap());
    assert_eq!(cleared["cancelled"], false);
    assert!(state.board.lock().await.boxes().is_empty());

    let summary = parse(&commands::import_schedule(&state, path).await.unwrap());
    assert_eq!(summary["boxes"], 1);
    assert_eq!(summary["placements"], 1);
}
