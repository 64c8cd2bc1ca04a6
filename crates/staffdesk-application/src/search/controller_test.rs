use super::*;
use crate::test_support::{MockDirectory, MockIdentityProvider, branch, department, employee, identity};
use staffdesk_core::config::{SearchSettings, SessionSettings};
use staffdesk_core::search::ResultKind;
use staffdesk_infrastructure::SharedStorage;
use std::time::Duration;

async fn session_with_roles(roles: &[&str]) -> Arc<SessionManager> {
    let storage = SharedStorage::in_memory();
    let provider = Arc::new(MockIdentityProvider::new().accept("t", identity("u1", roles)));
    let session = Arc::new(SessionManager::new(
        Arc::new(storage.open_tab()),
        provider,
        &SessionSettings::default(),
    ));
    session.login("t").await;
    session
}

fn controller(directory: &Arc<MockDirectory>, session: Arc<SessionManager>) -> SearchController {
    SearchController::new(
        SearchAggregator::new(directory.clone(), SearchSettings::default()),
        session,
    )
}

fn titles(view: &SearchView) -> Vec<&str> {
    view.results.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_short_query_never_hits_network() {
    let directory = Arc::new(MockDirectory::new());
    let search = controller(&directory, session_with_roles(&["admin"]).await);

    for text in ["", "j", " j ", "  "] {
        search.on_input(text);
        let view = search.snapshot();
        assert!(view.results.is_empty());
        assert!(!view.loading);
    }
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(directory.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_within_quiet_period_collapse_into_one_search() {
    let directory = Arc::new(MockDirectory::new().employees("john", vec![employee("1", "John", "Doe")]));
    let search = controller(&directory, session_with_roles(&[]).await);

    for text in ["jo", "joh", "john"] {
        search.on_input(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    search.flush().await;

    assert_eq!(directory.calls(), vec!["employees:john:5"]);
    assert_eq!(titles(&search.snapshot()), vec!["John Doe"]);
}

#[tokio::test(start_paused = true)]
async fn test_loading_spans_the_search() {
    let directory = Arc::new(
        MockDirectory::new()
            .employees("jo", vec![employee("1", "Jo", "Park")])
            .employee_delay("jo", Duration::from_millis(500)),
    );
    let search = controller(&directory, session_with_roles(&[]).await);

    search.on_input("jo");
    let view = search.snapshot();
    assert!(view.loading);
    assert!(view.open);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(search.snapshot().loading);

    search.flush().await;
    let view = search.snapshot();
    assert!(!view.loading);
    assert_eq!(titles(&view), vec!["Jo Park"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_query_never_overwrites_newer_one() {
    let directory = Arc::new(
        MockDirectory::new()
            .employees("jo", vec![employee("1", "Jo", "Park")])
            .employee_delay("jo", Duration::from_secs(2))
            .employees("joe", vec![employee("2", "Joe", "Bloggs")]),
    );
    let search = controller(&directory, session_with_roles(&[]).await);

    search.on_input("jo");
    tokio::time::sleep(Duration::from_millis(400)).await;
    search.on_input("joe");
    search.flush().await;

    assert_eq!(titles(&search.snapshot()), vec!["Joe Bloggs"]);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let view = search.snapshot();
    assert_eq!(titles(&view), vec!["Joe Bloggs"]);
    assert!(!view.loading);
    assert_eq!(directory.calls(), vec!["employees:jo:5", "employees:joe:5"]);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_search_leaves_loading_to_the_latest() {
    let directory = Arc::new(
        MockDirectory::new()
            .employees("jo", vec![employee("1", "Jo", "Park")])
            .employee_delay("jo", Duration::from_millis(100))
            .employees("joe", vec![employee("2", "Joe", "Bloggs")]),
    );
    let search = controller(&directory, session_with_roles(&[]).await);

    search.on_input("jo");
    tokio::time::sleep(Duration::from_millis(350)).await;
    search.on_input("joe");

    // "jo" resolves at 400ms, while "joe" is still waiting out its quiet period.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let view = search.snapshot();
    assert!(view.loading);
    assert!(view.results.is_empty());

    search.flush().await;
    let view = search.snapshot();
    assert!(!view.loading);
    assert_eq!(titles(&view), vec!["Joe Bloggs"]);
}

#[tokio::test(start_paused = true)]
async fn test_non_elevated_caller_sees_only_employees() {
    let directory = Arc::new(
        MockDirectory::new()
            .employees("jo", vec![employee("1", "Jo", "Park"), employee("2", "Joan", "Ortiz")])
            .departments(vec![department("10", "Jobs Board")])
            .branches(vec![branch("20", "Johannesburg")]),
    );
    let search = controller(&directory, session_with_roles(&["employee"]).await);

    search.on_input("jo");
    search.flush().await;

    let view = search.snapshot();
    assert_eq!(titles(&view), vec!["Jo Park", "Joan Ortiz"]);
    assert!(view.results.iter().all(|r| r.kind == ResultKind::Employee));
    assert!(!directory.calls().iter().any(|c| c == "departments"));
}

#[tokio::test(start_paused = true)]
async fn test_department_failure_keeps_employees_and_branches() {
    let directory = Arc::new(
        MockDirectory::new()
            .employees("ber", vec![employee("1", "Bernd", "Ott")])
            .departments(vec![department("10", "Cyber")])
            .branches(vec![branch("20", "Berlin"), branch("21", "Bern")])
            .failing_departments(),
    );
    let search = controller(&directory, session_with_roles(&["hr"]).await);

    search.on_input("ber");
    search.flush().await;

    assert_eq!(titles(&search.snapshot()), vec!["Bernd Ott", "Berlin", "Bern"]);
}

#[tokio::test(start_paused = true)]
async fn test_signed_out_search_is_empty_and_silent() {
    let directory = Arc::new(MockDirectory::new().employees("jo", vec![employee("1", "Jo", "Park")]));
    let session = session_with_roles(&["admin"]).await;
    session.logout();
    let search = controller(&directory, session);

    search.on_input("jo");
    search.flush().await;

    let view = search.snapshot();
    assert!(view.results.is_empty());
    assert!(!view.loading);
    assert!(directory.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_select_resets_widget_and_returns_target() {
    let directory = Arc::new(
        MockDirectory::new()
            .employees("jo", vec![employee("7", "Jo", "Park")])
            .employees("jon", vec![employee("8", "Jon", "Snow")]),
    );
    let search = controller(&directory, session_with_roles(&[]).await);
    search.on_input("jo");
    search.flush().await;
    let chosen = search.snapshot().results[0].clone();

    search.on_input("jon");
    let target = search.select(&chosen);
    search.flush().await;

    assert_eq!(target, "/employees/7");
    let view = search.snapshot();
    assert!(view.text.is_empty());
    assert!(view.results.is_empty());
    assert!(!view.open);
    assert!(!view.loading);
}

#[tokio::test(start_paused = true)]
async fn test_panel_open_and_close() {
    let directory = Arc::new(MockDirectory::new());
    let search = controller(&directory, session_with_roles(&[]).await);
    let mut changes = search.subscribe();

    search.handle_key(Key::Shortcut);
    assert!(search.snapshot().open);
    assert!(changes.has_changed().unwrap());
    changes.mark_unchanged();

    search.handle_key(Key::Shortcut);
    assert!(!changes.has_changed().unwrap());

    search.handle_key(Key::Escape);
    assert!(!search.snapshot().open);

    search.handle_key(Key::Shortcut);
    search.click_outside();
    assert!(!search.snapshot().open);
}
