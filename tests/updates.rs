//! Message handling, listeners and update atomicity

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{leaves, test_editor, text, token, token_texts, type_text};
use spintax::host::NodeHost;
use spintax::messages::{Direction, EditMsg, Msg, TokenMsg};
use spintax::rewrite::{RewriteEngine, RewriteOutcome};
use spintax::update::update;
use spintax::{Cmd, Editor, EngineError, NodeKey, TokenPlugin};

fn first_token(editor: &Editor) -> NodeKey {
    editor.state().token_views()[0].key
}

// ========================================================================
// Edit messages
// ========================================================================

#[test]
fn test_edit_returns_redraw() {
    let (mut editor, _plugin) = test_editor();
    let cmd = update(&mut editor, Msg::Edit(EditMsg::InsertText("abc".into()))).unwrap();
    assert_eq!(cmd, Some(Cmd::Redraw));
    assert!(cmd.unwrap().needs_redraw());
}

#[test]
fn test_paste_extracts_token() {
    let (mut editor, _plugin) = test_editor();
    update(
        &mut editor,
        Msg::Edit(EditMsg::InsertText("x {{A|B}} y".into())),
    )
    .unwrap();
    assert_eq!(
        leaves(editor.state()),
        vec![text("x "), token("{{A|B}}"), text(" "), text("y")]
    );
}

#[test]
fn test_backspace_removes_token_whole() {
    let (mut editor, _plugin) = test_editor();
    type_text(&mut editor, "{{A|B}}");
    assert_eq!(leaves(editor.state()), vec![token("{{A|B}}"), text(" ")]);

    update(&mut editor, EditMsg::DeleteBackward.into()).unwrap();
    assert_eq!(leaves(editor.state()), vec![token("{{A|B}}")]);

    update(&mut editor, EditMsg::DeleteBackward.into()).unwrap();
    assert!(leaves(editor.state()).is_empty());
    assert_eq!(editor.state().text_content(), "");
}

#[test]
fn test_cursor_moves_over_token_in_one_step() {
    let (mut editor, _plugin) = test_editor();
    type_text(&mut editor, "{{A|B}}");
    update(&mut editor, EditMsg::MoveCursor(Direction::Left).into()).unwrap();
    assert_eq!(editor.state().cursor.column, 7);
    update(&mut editor, EditMsg::MoveCursor(Direction::Left).into()).unwrap();
    assert_eq!(editor.state().cursor.column, 0);
}

#[test]
fn test_set_cursor_inside_token_snaps_to_end() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("ab {{A|B}} cd").unwrap();
    update(
        &mut editor,
        EditMsg::SetCursor { line: 0, column: 5 }.into(),
    )
    .unwrap();
    assert_eq!(editor.state().cursor.column, 10);
}

#[test]
fn test_newline_splits_and_settles_both_halves() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("{{a|b}}x{{c|d}}").unwrap();
    // one word, and not a token
    assert_eq!(editor.state().token_count(), 0);

    update(&mut editor, EditMsg::SetCursor { line: 0, column: 7 }.into()).unwrap();
    update(&mut editor, EditMsg::InsertNewline.into()).unwrap();
    assert_eq!(editor.state().token_count(), 1);
    assert_eq!(editor.state().tree.line_count(), 2);
}

#[test]
fn test_joining_lines_completes_split_token() {
    let (mut editor, _plugin) = test_editor();
    type_text(&mut editor, "{{A|\nB}}");
    assert_eq!(editor.state().token_count(), 0);

    update(&mut editor, EditMsg::SetCursor { line: 1, column: 0 }.into()).unwrap();
    update(&mut editor, EditMsg::DeleteBackward.into()).unwrap();
    assert_eq!(editor.state().tree.line_count(), 1);
    assert_eq!(leaves(editor.state()), vec![token("{{A|B}}"), text(" ")]);
}

#[test]
fn test_delete_forward_at_line_end_completes_split_token() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("x {{A|\nB}} y").unwrap();
    assert_eq!(editor.state().token_count(), 0);

    update(&mut editor, EditMsg::SetCursor { line: 0, column: 6 }.into()).unwrap();
    update(&mut editor, EditMsg::DeleteForward.into()).unwrap();
    assert_eq!(
        leaves(editor.state()),
        vec![text("x "), token("{{A|B}}"), text(" "), text("y")]
    );
}

#[test]
fn test_deleting_token_between_halves_completes_token() {
    let (mut editor, _plugin) = test_editor();
    let saved = r#"{"root":{"children":[{"children":[
        {"text":"{{A|","type":"text"},
        {"text":"{{x|y}}","type":"token"},
        {"text":"B}}","type":"text"}
    ]}]}}"#;
    editor.load_json(saved).unwrap();
    assert_eq!(token_texts(editor.state()), vec!["{{x|y}}"]);

    update(&mut editor, EditMsg::SetCursor { line: 0, column: 11 }.into()).unwrap();
    update(&mut editor, EditMsg::DeleteBackward.into()).unwrap();
    assert_eq!(leaves(editor.state()), vec![token("{{A|B}}"), text(" ")]);
}

// ========================================================================
// Token activation
// ========================================================================

#[test]
fn test_activate_and_dismiss() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("pick {{red|blue}}").unwrap();
    let key = first_token(&editor);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let _listener = editor.register_token_listener(move |view| log.borrow_mut().push(view.label()));

    let cmd = update(&mut editor, TokenMsg::Activate(key).into()).unwrap();
    match cmd {
        Some(Cmd::ShowTokenDetails(view)) => {
            assert_eq!(view.key, key);
            assert_eq!(view.line, 0);
            assert_eq!(view.columns, 5..17);
            assert_eq!(view.label(), "red / blue");
        }
        other => panic!("expected ShowTokenDetails, got {:?}", other),
    }
    assert_eq!(*seen.borrow(), vec!["red / blue".to_string()]);
    assert_eq!(editor.active_token(), Some(key));

    assert_eq!(
        update(&mut editor, TokenMsg::Dismiss.into()).unwrap(),
        Some(Cmd::HideTokenDetails)
    );
    assert_eq!(update(&mut editor, TokenMsg::Dismiss.into()).unwrap(), None);
}

#[test]
fn test_activate_plain_text_is_ignored() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("plain").unwrap();
    let key = editor.state().tree.text_keys()[0];
    assert_eq!(update(&mut editor, TokenMsg::Activate(key).into()).unwrap(), None);
    assert_eq!(editor.active_token(), None);
}

#[test]
fn test_deleting_active_token_hides_details() {
    let (mut editor, _plugin) = test_editor();
    type_text(&mut editor, "{{A|B}}");
    let key = first_token(&editor);
    update(&mut editor, TokenMsg::Activate(key).into()).unwrap();

    update(&mut editor, EditMsg::DeleteBackward.into()).unwrap();
    let cmd = update(&mut editor, EditMsg::DeleteBackward.into()).unwrap();
    assert_eq!(
        cmd,
        Some(Cmd::Batch(vec![Cmd::Redraw, Cmd::HideTokenDetails]))
    );
    assert_eq!(editor.active_token(), None);
}

// ========================================================================
// Listeners and subscriptions
// ========================================================================

#[test]
fn test_change_listener_fires_once_per_update() {
    let mut editor = Editor::default();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let _plugin = TokenPlugin::register(&mut editor, move |_| counter.set(counter.get() + 1)).unwrap();
    assert_eq!(calls.get(), 1);

    // three tokens need several settle passes but notify once
    let report = editor.set_text("{{a|b}} {{c|d}} {{e|f}}").unwrap();
    assert!(report.passes > 1);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_dropped_plugin_stops_notifying() {
    let mut editor = Editor::default();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let plugin = TokenPlugin::register(&mut editor, move |_| counter.set(counter.get() + 1)).unwrap();
    drop(plugin);

    editor.set_text("{{a|b}}").unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(editor.state().token_count(), 0);
}

// ========================================================================
// Stale units and host failures
// ========================================================================

#[test]
fn test_stale_unit_is_skipped_then_extracted() {
    let mut editor = Editor::default();

    let mutated = Rc::new(Cell::new(false));
    let flag = Rc::clone(&mutated);
    let _mutator = editor
        .register_text_transform(move |txn, unit| {
            if !flag.get() && unit.text.contains('|') {
                flag.set(true);
                txn.set_text(unit.key, &format!("{} !", unit.text))?;
            }
            Ok(())
        })
        .unwrap();

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&outcomes);
    let engine = RewriteEngine::default();
    let _engine = editor
        .register_text_transform(move |txn, unit| {
            log.borrow_mut().push(engine.run(txn, unit)?);
            Ok(())
        })
        .unwrap();

    editor.set_text("hello {{A|B}}").unwrap();

    let outcomes = outcomes.borrow();
    assert_eq!(outcomes[0], RewriteOutcome::Stale);
    assert!(outcomes[1].is_extracted());
    assert_eq!(
        leaves(editor.state()),
        vec![text("hello "), token("{{A|B}}"), text(" "), text("!")]
    );
}

#[test]
fn test_host_violation_rolls_back_update() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("before {{A|B}}").unwrap();
    let snapshot = editor.state().clone();
    let token_key = first_token(&editor);

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let _listener = editor.register_update_listener(move |_| counter.set(counter.get() + 1));

    let result = editor.update(|txn| {
        txn.insert_text(" more")?;
        txn.split_text(token_key, &[2]).map(|_| ())
    });

    assert!(matches!(result, Err(EngineError::HostContractViolation(_))));
    assert_eq!(editor.state(), &snapshot);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_failing_transform_is_not_installed() {
    let (mut editor, _plugin) = test_editor();
    editor.set_text("some text").unwrap();
    let result = editor.register_text_transform(|_, unit| {
        Err(EngineError::host(format!("refusing node {}", unit.key.0)))
    });
    assert!(result.is_err());

    // the failed transform is gone, so later edits still commit
    editor.set_text("again {{x|y}}").unwrap();
    assert_eq!(editor.state().token_count(), 1);
}
