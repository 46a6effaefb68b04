use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;

use couplet::commands::*;
use couplet::storage::load_tasks;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut db_path = env::temp_dir();
    db_path.push(format!("couplet_test_{}.json", test_name));

    env::set_var("COUPLET_DB", db_path.to_str().unwrap());

    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }

    f(db_path.clone());

    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }
    env::remove_var("COUPLET_DB");
}

fn add_simple(title: &str, due: Option<&str>, recur: Option<&str>) {
    cmd_add(
        title.into(),
        None,
        None,
        due.map(Into::into),
        recur.map(Into::into),
        None,
        None,
        None,
        true,
    );
}

#[test]
fn test_add_and_list() {
    with_test_db("add_list", |_path| {
        cmd_add(
            "Water the plants".into(),
            Some("sam".into()),
            Some("the ones on the balcony too".into()),
            Some("2025-12-01".into()),
            None,
            None,
            None,
            None,
            true,
        );

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Water the plants");
        assert_eq!(tasks[0].owner, Some("sam".into()));
        assert!(tasks[0].due_date.is_some());
        assert_eq!(tasks[0].next_due_date, None);
        assert!(!tasks[0].completed);
    });
}

#[test]
fn test_unparseable_due_date_still_creates_the_task() {
    with_test_db("bad_due", |_path| {
        add_simple("Fix the shelf", Some("someday soon"), None);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].due_date, None);
    });
}

#[test]
fn test_empty_title_is_rejected() {
    with_test_db("empty_title", |_path| {
        add_simple("   ", None, None);
        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_unknown_recurrence_pattern_is_rejected() {
    with_test_db("bad_pattern", |_path| {
        add_simple("Mow the lawn", None, Some("fortnightly"));
        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_complete_one_time_task() {
    with_test_db("complete_once", |_path| {
        add_simple("Book dentist", Some("2025-12-01"), None);
        let id = load_tasks()[0].id;

        cmd_complete(id, true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].completed);
        assert!(tasks[0].due_date.is_some());
    });
}

#[test]
fn test_complete_recurring_task_reopens_it() {
    with_test_db("complete_recurring", |_path| {
        add_simple("Take out bins", Some("2025-12-01"), Some("weekly"));
        let id = load_tasks()[0].id;

        cmd_complete(id, true);

        let tasks = load_tasks();
        // Same task, rolled forward; no duplicate is created.
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert!(!task.completed);
        let now = Utc::now();
        let due = task.due_date.expect("rolled-forward task keeps a deadline");
        assert!(due > now);
        let next = task.next_due_date.expect("the following occurrence is precomputed");
        assert!(next > due);
    });
}

#[test]
fn test_recurrence_with_expired_end_date_completes_for_good() {
    with_test_db("recurrence_expired", |_path| {
        cmd_add(
            "Put up holiday lights".into(),
            None,
            None,
            Some("2025-12-01".into()),
            Some("daily".into()),
            None,
            Some("2025-12-24".into()),
            None,
            true,
        );
        let id = load_tasks()[0].id;

        cmd_complete(id, true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].due_date, None);
        assert_eq!(tasks[0].next_due_date, None);
    });
}

#[test]
fn test_remove_task() {
    with_test_db("remove", |_path| {
        add_simple("Old chore", None, None);
        let id = load_tasks()[0].id;

        cmd_remove(id, true);
        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_edit_title_and_clear_recurrence() {
    with_test_db("edit", |_path| {
        add_simple("Hoover", Some("2025-12-01"), Some("weekly"));
        let id = load_tasks()[0].id;

        cmd_edit(
            id,
            Some("Vacuum the flat".into()),
            Some("alex".into()),
            None,
            None,
            None,
            true, // --no-recur
            None,
            None,
            None,
            true,
        );

        let tasks = load_tasks();
        assert_eq!(tasks[0].title, "Vacuum the flat");
        assert_eq!(tasks[0].owner, Some("alex".into()));
        assert_eq!(tasks[0].recurrence, None);
        assert_eq!(tasks[0].next_due_date, None);
    });
}

#[test]
fn test_edit_sets_a_new_recurrence() {
    with_test_db("edit_recur", |_path| {
        add_simple("Meal plan", Some("2025-12-01"), None);
        let id = load_tasks()[0].id;

        cmd_edit(
            id,
            None,
            None,
            None,
            None,
            Some("weekly".into()),
            false,
            Some(2),
            None,
            Some("Europe/Berlin".into()),
            true,
        );

        let tasks = load_tasks();
        let rule = tasks[0].recurrence.as_ref().expect("rule was set");
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.timezone.as_deref(), Some("Europe/Berlin"));
    });
}

#[test]
fn test_reset_deletes_the_database() {
    with_test_db("reset", |path| {
        add_simple("Anything", None, None);
        assert!(path.exists());

        cmd_reset(true);
        assert!(!path.exists());
        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_ids_keep_increasing() {
    with_test_db("ids", |_path| {
        add_simple("First", None, None);
        add_simple("Second", None, None);
        let tasks = load_tasks();
        assert_eq!(tasks.len(), 2);
        assert_ne!(tasks[0].id, tasks[1].id);

        let max_id = tasks.iter().map(|t| t.id).max().unwrap();
        cmd_remove(tasks[0].id, true);
        add_simple("Third", None, None);
        let tasks = load_tasks();
        assert!(tasks.iter().any(|t| t.id == max_id + 1));
    });
}
