//! Integration tests for end-to-end weft execution.
//!
//! These tests verify the full pipeline:
//! parse → compile → run → host effects

use weft_tests::TestHarness;
use weft_vm::Value;

/// A created widget reflects a later `conf` through the property table.
#[test]
fn test_conf_updates_widget_properties() {
    let harness = TestHarness::run_source(
        "\
l my_label \"Initial\"
conf my_label -text \"Updated\" -bg \"blue\"
",
    );
    assert_eq!(
        harness.widget_prop("my_label", "text"),
        Some(&Value::Str("Updated".to_string()))
    );
    assert_eq!(
        harness.widget_prop("my_label", "backgroundColor"),
        Some(&Value::Str("blue".to_string()))
    );
}

/// A click dispatched through the host runs the bound handler chunk.
#[test]
fn test_click_event_sets_state() {
    let mut harness = TestHarness::run_source(
        "\
b my_button \"Click Me\"
bind my_button
  .click
    set was_clicked 1
",
    );
    assert_eq!(harness.state("was_clicked"), None);

    harness.click("my_button");

    assert_eq!(harness.state_str("was_clicked"), Some("1"));
}

/// A host-side state write fires the watcher, which reconfigures the
/// widget with the substituted value.
#[test]
fn test_watcher_updates_widget_from_state() {
    let mut harness = TestHarness::run_source(
        "\
l my_label \"start\"
watch my_var
  conf my_label -text {$my_var}
",
    );
    harness.set_state("my_var", Value::Str("X".to_string()));

    assert_eq!(
        harness.widget_prop("my_label", "text"),
        Some(&Value::Str("X".to_string()))
    );
}

/// Procedure parameters bind positionally and shadow state entries only
/// for the duration of the call.
#[test]
fn test_proc_parameters_shadow_state() {
    let harness = TestHarness::run_source(
        "\
set name \"global\"
proc greet name
  set greeting {$name}
greet \"world\"
",
    );
    assert_eq!(harness.state_str("greeting"), Some("world"));
    assert_eq!(harness.state_str("name"), Some("global"));
}

/// The todo-list flow: a click appends through the `lappend` builtin and
/// clears the input state.
#[test]
fn test_click_appends_to_todo_list() {
    let mut harness = TestHarness::run_source(
        "\
i todo_entry
b add_button \"Add\"
bind add_button
  .click
    lappend todos {$new_todo_text}
    set new_todo_text \"\"
",
    );
    harness.set_state("new_todo_text", Value::Str("buy milk".to_string()));
    harness.click("add_button");
    harness.set_state("new_todo_text", Value::Str("walk dog".to_string()));
    harness.click("add_button");

    assert_eq!(
        harness.state("todos"),
        Some(&Value::List(vec![
            Value::Str("buy milk".to_string()),
            Value::Str("walk dog".to_string()),
        ]))
    );
    assert_eq!(harness.state_str("new_todo_text"), Some(""));
}

/// Watchers for one variable fire in registration order, all before the
/// surrounding write returns.
#[test]
fn test_watchers_fire_in_registration_order() {
    let mut harness = TestHarness::run_source(
        "\
watch v
  lappend order \"w1\"
watch v
  lappend order \"w2\"
watch v
  lappend order \"w3\"
",
    );
    harness.set_state("v", Value::Str("go".to_string()));

    assert_eq!(
        harness.state("order"),
        Some(&Value::List(vec![
            Value::Str("w1".to_string()),
            Value::Str("w2".to_string()),
            Value::Str("w3".to_string()),
        ]))
    );
}

/// A watcher writing a watched variable cascades synchronously,
/// depth-first.
#[test]
fn test_watcher_cascade_runs_depth_first() {
    let mut harness = TestHarness::run_source(
        "\
watch a
  set b \"cascade\"
watch b
  lappend trail \"b\"
watch a
  lappend trail \"a2\"
",
    );
    harness.set_state("a", Value::Str("go".to_string()));

    assert_eq!(
        harness.state("trail"),
        Some(&Value::List(vec![
            Value::Str("b".to_string()),
            Value::Str("a2".to_string()),
        ]))
    );
}

/// Fetch completion writes `http_response`, fires its watchers, then runs
/// the `.callback` chunk.
#[test]
fn test_fetch_success_flow() {
    let mut harness = TestHarness::run_source(
        "\
l status \"waiting\"
watch http_response
  conf status -text \"got data\"
http.get \"https://example.test/todos\"
  .callback
    set done 1
  .error
    set failed 1
",
    );
    assert_eq!(harness.pending_fetch_count(), 1);

    harness.complete_fetch(Ok(Value::Str("[1, 2, 3]".to_string())));

    assert_eq!(harness.pending_fetch_count(), 0);
    assert_eq!(harness.state_str("http_response"), Some("[1, 2, 3]"));
    assert_eq!(harness.state_str("done"), Some("1"));
    assert_eq!(harness.state("failed"), None);
    assert_eq!(
        harness.widget_prop("status", "text"),
        Some(&Value::Str("got data".to_string()))
    );
}

/// Fetch failure writes `error` and runs the `.error` chunk instead.
#[test]
fn test_fetch_failure_flow() {
    let mut harness = TestHarness::run_source(
        "\
http.get \"https://example.test/todos\"
  .callback
    set done 1
  .error
    set message {$error}
",
    );
    harness.complete_fetch(Err("503 service unavailable".to_string()));

    assert_eq!(harness.state_str("message"), Some("503 service unavailable"));
    assert_eq!(harness.state("done"), None);
}

/// Handlers bound to separate events dispatch independently.
#[test]
fn test_multiple_event_bindings() {
    let mut harness = TestHarness::run_source(
        "\
i search_box
bind search_box
  .focus
    set focused 1
  .change
    set changed 1
",
    );
    harness
        .session_mut()
        .dispatch_event("search_box", "change")
        .unwrap();
    assert_eq!(harness.state("focused"), None);
    assert_eq!(harness.state_str("changed"), Some("1"));
}

/// A full program exercising every command family in one pass.
#[test]
fn test_kitchen_sink_program_runs_clean() {
    let mut harness = TestHarness::run_source(
        "\
# todo demo
c root
l title \"Todos\"
i todo_entry
b add_button \"Add\"
listbox todo_list
canvas sketch 300 200
pack title -side top -fill x
pack todo_list -side left -expand yes -padx 4
set new_todo_text \"\"
proc remember item
  lappend todos {$item}
watch todos
  conf todo_list -items {$todos}
bind add_button
  .click
    remember {$new_todo_text}
http.get \"https://example.test/seed\"
  .callback
    remember {$http_response}
",
    );
    harness.set_state("new_todo_text", Value::Str("first".to_string()));
    harness.click("add_button");
    harness.complete_fetch(Ok(Value::Str("seeded".to_string())));

    assert_eq!(
        harness.state("todos"),
        Some(&Value::List(vec![
            Value::Str("first".to_string()),
            Value::Str("seeded".to_string()),
        ]))
    );
    // The todos watcher mirrored the list into the widget.
    assert_eq!(
        harness.widget_prop("todo_list", "items"),
        Some(&Value::List(vec![
            Value::Str("first".to_string()),
            Value::Str("seeded".to_string()),
        ]))
    );
    assert_eq!(
        harness.session().widget("sketch").unwrap().prop("width"),
        Some(&Value::Num(300.0))
    );
}
