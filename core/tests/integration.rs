//! Full lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every core client
//! operation over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server.

use runlog_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, NewGoal, RunlogApi, Session, SessionSource,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.url).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.url).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.url).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn failure_message(err: ApiError) -> String {
    match err {
        ApiError::RequestFailed { message } => message,
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[test]
fn session_lifecycle() {
    let client = RunlogApi::new(&start_server());

    // Step 1: list — should be empty and carry no query string.
    let req = client.build_list_sessions(None, None);
    assert!(!req.url.contains('?'));
    let sessions = client.parse_list_sessions(execute(req)).unwrap();
    assert!(sessions.is_empty(), "expected empty list");

    // Step 2: create.
    let input = Session::new("2024-01-01".parse().unwrap(), 5.0, 1800);
    let req = client.build_create_session(&input).unwrap();
    let created = client.parse_create_session(execute(req)).unwrap();
    assert_eq!(created.distance, 5.0);
    assert_eq!(created.duration, 1800);
    assert_eq!(created.source, Some(SessionSource::Manual));
    assert!(created.created_at.is_some());
    let id = created.id.clone().expect("server assigns an id");

    // Step 3: get.
    let req = client.build_get_session(&id);
    let fetched = client.parse_get_session(execute(req)).unwrap();
    assert_eq!(fetched, created);

    // Step 4: full replace.
    let mut replacement = fetched.clone();
    replacement.distance = 6.2;
    replacement.notes = Some("negative split".to_string());
    let req = client.build_update_session(&id, &replacement).unwrap();
    let updated = client.parse_update_session(execute(req)).unwrap();
    assert_eq!(updated.id.as_deref(), Some(id.as_str()));
    assert_eq!(updated.distance, 6.2);
    assert_eq!(updated.notes.as_deref(), Some("negative split"));

    // Step 5: date-filtered list.
    let req = client.build_list_sessions(
        Some("2024-01-01".parse().unwrap()),
        Some("2024-01-31".parse().unwrap()),
    );
    assert_eq!(client.parse_list_sessions(execute(req)).unwrap().len(), 1);
    let req = client.build_list_sessions(Some("2024-02-01".parse().unwrap()), None);
    assert!(client.parse_list_sessions(execute(req)).unwrap().is_empty());

    // Step 6: unknown id — backend message passes through.
    let req = client.build_get_session("missing");
    let err = client.parse_get_session(execute(req)).unwrap_err();
    assert_eq!(failure_message(err), "session not found");

    // Step 7: rejected body — backend message passes through.
    let req = client
        .build_create_session(&Session::new("2024-01-02".parse().unwrap(), 0.0, 60))
        .unwrap();
    let err = client.parse_create_session(execute(req)).unwrap_err();
    assert_eq!(failure_message(err), "distance must be positive");
}

#[test]
fn goal_lifecycle() {
    let client = RunlogApi::new(&start_server());

    // Step 1: create a January goal.
    let input = NewGoal {
        target_distance: Some(20.0),
        start_date: Some("2024-01-01".parse().unwrap()),
        end_date: Some("2024-01-31".parse().unwrap()),
    };
    let req = client.build_create_goal(&input).unwrap();
    let goal = client.parse_create_goal(execute(req)).unwrap();
    let id = goal.id.expect("server assigns an id");
    assert_eq!(goal.target_distance, 20.0);

    // Step 2: log a run inside the range.
    let req = client
        .build_create_session(&Session::new("2024-01-10".parse().unwrap(), 8.0, 2400))
        .unwrap();
    client.parse_create_session(execute(req)).unwrap();

    // Step 3: list — progress without sessions.
    let req = client.build_list_goals();
    let goals = client.parse_list_goals(execute(req)).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].goal.id, Some(id));
    assert_eq!(goals[0].current_distance, 8.0);
    assert!(goals[0].sessions.is_none());

    // Step 4: get — progress with sessions.
    let req = client.build_get_goal(id);
    let progress = client.parse_get_goal(execute(req)).unwrap();
    assert_eq!(progress.progress_percentage, 40.0);
    assert_eq!(progress.sessions.map(|s| s.len()), Some(1));

    // Step 5: delete, then delete again.
    let req = client.build_delete_goal(id);
    client.parse_delete_goal(execute(req)).unwrap();
    let req = client.build_delete_goal(id);
    let err = client.parse_delete_goal(execute(req)).unwrap_err();
    assert_eq!(failure_message(err), "goal not found");

    // Step 6: missing target distance — backend message passes through.
    let req = client.build_create_goal(&NewGoal::default()).unwrap();
    let err = client.parse_create_goal(execute(req)).unwrap_err();
    assert_eq!(failure_message(err), "target_distance is required");
}

#[test]
fn strava_lifecycle() {
    let client = RunlogApi::new(&start_server());

    let req = client.build_strava_status();
    assert!(!client.parse_strava_status(execute(req)).unwrap().connected);

    let req = client.build_strava_connect("oauth-code").unwrap();
    assert!(client.parse_strava_connect(execute(req)).unwrap().success);

    let req = client.build_strava_status();
    let status = client.parse_strava_status(execute(req)).unwrap();
    assert!(status.connected);
    assert_eq!(status.athlete_id, Some(mock_server::MOCK_ATHLETE_ID));

    let req = client.build_strava_disconnect();
    assert!(client.parse_strava_disconnect(execute(req)).unwrap().success);

    let req = client.build_strava_status();
    assert!(!client.parse_strava_status(execute(req)).unwrap().connected);
}
