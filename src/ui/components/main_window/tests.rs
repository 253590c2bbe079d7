//! Tests for MainWindow component

use super::*;
use crate::core::{AppConfig, Operation};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Poll until the channel for `kind` is idle again, or give up
fn wait_idle(window: &mut MainWindow, kind: OperationKind) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while window.is_busy(kind) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    // Let the Finished event land as well
    std::thread::sleep(Duration::from_millis(50));
    window.poll_job_events();
}

#[test]
fn test_main_window_new() {
    let window = MainWindow::new_for_test();
    assert_eq!(window.active_tab, OperationKind::Convert);
    assert_eq!(window.focused_field, Some(FieldId::ConvertInput));
    assert!(window.log.is_empty());
    assert_eq!(window.forms.field(FieldId::ConvertExtension).text(), "mp4");
}

#[test]
fn test_default_form_values() {
    let forms = Forms::new();
    assert_eq!(forms.field(FieldId::PreciseSize).text(), "10");
    assert_eq!(forms.field(FieldId::FastAudio).text(), "128");
    assert_eq!(forms.field(FieldId::EqExtension).text(), "mp3");
    assert_eq!(forms.field(FieldId::EqSpeed).text(), "1.0");
    assert_eq!(forms.field(FieldId::EqGain).text(), "0");
    assert_eq!(forms.field(FieldId::EqBitrate).text(), "192");
}

#[test]
fn test_select_tab_moves_focus() {
    let mut window = MainWindow::new_for_test();
    window.select_tab(OperationKind::AudioEdit);
    assert_eq!(window.active_tab, OperationKind::AudioEdit);
    assert_eq!(window.focused_field, Some(FieldId::EqInput));
}

#[test]
fn test_typing_goes_to_focused_field() {
    let mut window = MainWindow::new_for_test();
    window.focus_field(FieldId::ConvertExtension);

    assert!(window.handle_key("backspace", None, false));
    assert!(window.handle_key("backspace", None, false));
    assert!(window.handle_key("backspace", None, false));
    assert!(window.handle_key("w", Some("w"), false));
    window.handle_key("e", Some("ebp"), false);

    assert_eq!(window.forms.field(FieldId::ConvertExtension).text(), "webp");
    assert_eq!(window.forms.field(FieldId::ConvertInput).text(), "");
}

#[test]
fn test_numeric_field_filters_keys() {
    let mut window = MainWindow::new_for_test();
    window.select_tab(OperationKind::CompressFast);
    window.focus_field(FieldId::FastSize);

    assert!(!window.handle_key("a", Some("a"), false));
    window.handle_key(".", Some("."), false);
    window.handle_key("5", Some("5"), false);
    assert_eq!(window.forms.field(FieldId::FastSize).text(), "10.5");
}

#[test]
fn test_tab_key_cycles_fields() {
    let mut window = MainWindow::new_for_test();
    window.select_tab(OperationKind::CompressPrecise);

    window.handle_key("tab", None, false);
    assert_eq!(window.focused_field, Some(FieldId::PreciseSize));
    window.handle_key("tab", None, false);
    window.handle_key("tab", None, false);
    assert_eq!(window.focused_field, Some(FieldId::PreciseInput));
    window.handle_key("tab", None, true);
    assert_eq!(window.focused_field, Some(FieldId::PreciseAudio));
}

#[test]
fn test_escape_drops_focus() {
    let mut window = MainWindow::new_for_test();
    assert!(window.handle_key("escape", None, false));
    assert!(!window.handle_key("x", Some("x"), false));
}

#[test]
fn test_steppers() {
    let mut window = MainWindow::new_for_test();
    window.forms.step(FieldId::EqBass, true);
    window.forms.step(FieldId::EqBass, true);
    window.forms.step(FieldId::EqGain, false);
    window.forms.step(FieldId::EqSpeed, true);
    // No stepper on the bitrate field
    window.forms.step(FieldId::EqBitrate, true);

    assert_eq!(window.forms.field(FieldId::EqBass).text(), "2");
    assert_eq!(window.forms.field(FieldId::EqGain).text(), "-1");
    assert_eq!(window.forms.field(FieldId::EqSpeed).text(), "1.05");
    assert_eq!(window.forms.field(FieldId::EqBitrate).text(), "192");
}

#[test]
fn test_drop_fills_active_tab() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("clip.mov");
    std::fs::write(&file, "x").unwrap();

    let mut window = MainWindow::new_for_test();
    window.select_tab(OperationKind::CompressFast);
    assert!(window.handle_drop(&[file.clone(), PathBuf::from("/other.mov")]));

    assert_eq!(
        window.forms.field(FieldId::FastInput).text(),
        file.to_string_lossy()
    );
    assert_eq!(window.forms.field(FieldId::ConvertInput).text(), "");
}

#[test]
fn test_drop_rejects_folder() {
    let temp_dir = TempDir::new().unwrap();
    let mut window = MainWindow::new_for_test();

    assert!(!window.handle_drop(&[temp_dir.path().to_path_buf()]));
    assert!(window.pending_error_message.is_some());
    assert!(!window.handle_drop(&[]));
}

#[test]
fn test_build_request_from_forms() {
    let mut forms = Forms::new();
    forms.set_input(OperationKind::AudioEdit, std::path::Path::new("/music/song.wav"));
    forms.field_mut(FieldId::EqExtension).set_text("OGG");

    let request = forms.build_request(OperationKind::AudioEdit).unwrap();
    match request.operation {
        Operation::AudioEdit(params) => {
            assert_eq!(params.extension, "ogg");
            assert_eq!(params.bitrate_kbps, 192);
        }
        other => panic!("unexpected operation {:?}", other),
    }
}

#[test]
fn test_submit_with_empty_path_shows_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::rooted_at(temp_dir.path());
    let mut window = MainWindow::new_for_test();

    assert!(!window.submit(OperationKind::Convert, &config));
    let (title, message) = window.pending_error_message.clone().unwrap();
    assert_eq!(title, "Error");
    assert!(message.contains("Select a file"));
    assert!(!window.is_busy(OperationKind::Convert));
}

#[test]
fn test_submit_missing_file_logs_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::rooted_at(temp_dir.path());
    let mut window = MainWindow::new_for_test();
    window
        .forms
        .set_input(OperationKind::Convert, &temp_dir.path().join("missing.mov"));

    assert!(window.submit(OperationKind::Convert, &config));
    wait_idle(&mut window, OperationKind::Convert);

    let lines: Vec<&str> = window.log.lines().collect();
    assert!(lines.iter().any(|l| l.starts_with("=== Convert")));
    assert!(lines.iter().any(|l| l.contains("Error: File not found")));
    assert!(window.pending_error_message.is_none());
}

#[test]
fn test_clear_log() {
    let mut window = MainWindow::new_for_test();
    window.push_log("hello");
    assert!(window.log_dirty);
    window.clear_log();
    assert!(window.log.is_empty());
}
