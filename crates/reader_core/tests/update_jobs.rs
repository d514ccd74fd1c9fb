use reader_core::{
    update, AppState, Effect, ExtractionRow, JobState, JobStatus, Msg, Progress, QueuedFile,
    POLL_INTERVAL, RETRY_DELAY,
};

fn init_logging() {
    reader_logging::initialize_for_tests();
}

fn with_jobs(ids: &[&str]) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesQueued(vec![QueuedFile::from_path("scan.pdf")]),
    );
    let (state, _) = update(state, Msg::UploadClicked);
    let (state, _) = update(
        state,
        Msg::UploadSucceeded {
            job_ids: ids.iter().map(|id| id.to_string()).collect(),
        },
    );
    state
}

fn report(status: &str, done: u64, total: u64, note: &str) -> JobState {
    JobState {
        status: JobStatus::parse(status),
        progress: Progress {
            done,
            total,
            note: note.to_string(),
        },
        result: None,
        error: None,
    }
}

fn row(page: &str, text: &str) -> ExtractionRow {
    ExtractionRow {
        file: "scan.pdf".to_string(),
        page: page.to_string(),
        format: "Aztec".to_string(),
        text: text.to_string(),
    }
}

fn poll(state: AppState, job_id: &str, job: JobState) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PollSucceeded {
            job_id: job_id.to_string(),
            state: job,
        },
    )
}

fn due(state: AppState, job_id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PollDue {
            job_id: job_id.to_string(),
        },
    )
}

fn finished(rows: Vec<ExtractionRow>) -> JobState {
    JobState {
        result: Some(rows),
        ..report("finished", 2, 2, "done")
    }
}

#[test]
fn running_status_is_stored_and_rescheduled() {
    init_logging();
    let state = with_jobs(&["j1"]);
    let (mut state, effects) = poll(state, "j1", report("started", 1, 4, "page 1/4"));

    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            job_id: "j1".to_string(),
            delay: POLL_INTERVAL,
        }]
    );
    assert_eq!(
        state.registry().get("j1"),
        Some(&report("started", 1, 4, "page 1/4"))
    );
    assert!(state.consume_dirty());

    let (_, effects) = due(state, "j1");
    assert_eq!(
        effects,
        vec![Effect::FetchStatus {
            job_id: "j1".to_string()
        }]
    );
}

#[test]
fn queued_running_finished_drains_rows_in_order() {
    init_logging();
    let state = with_jobs(&["j1"]);
    let (state, _) = poll(state, "j1", report("queued", 0, 0, ""));
    let (state, _) = due(state, "j1");
    let (state, _) = poll(state, "j1", report("started", 1, 2, "page 1/2"));
    let (state, _) = due(state, "j1");
    let (state, effects) = poll(
        state,
        "j1",
        finished(vec![row("1", "first"), row("2", "second")]),
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.results().rows(),
        &[row("1", "first"), row("2", "second")]
    );
    assert!(!state.registry().contains("j1"));
    assert!(state.poller("j1").is_none());
    assert!(state.is_idle());

    // The terminated job never polls again.
    let (_, effects) = due(state, "j1");
    assert!(effects.is_empty());
}

#[test]
fn finished_without_result_just_removes() {
    init_logging();
    let state = with_jobs(&["j1"]);
    let (state, _) = poll(state, "j1", report("finished", 3, 3, ""));

    assert!(state.registry().is_empty());
    assert!(state.results().is_empty());
}

#[test]
fn failed_job_is_removed_and_results_untouched() {
    init_logging();
    let state = with_jobs(&["ok", "bad"]);
    let (state, _) = poll(state, "ok", finished(vec![row("1", "kept")]));
    let results_before = state.results().clone();

    let failed = JobState {
        error: Some("Job failed".to_string()),
        ..report("failed", 0, 3, "")
    };
    let (state, effects) = poll(state, "bad", failed);

    assert!(effects.is_empty());
    assert!(!state.registry().contains("bad"));
    assert_eq!(state.results(), &results_before);
}

#[test]
fn transient_error_retries_transparently() {
    init_logging();
    let rows = vec![row("1", "alpha"), row("4", "beta")];

    let clean = with_jobs(&["j1"]);
    let (clean, _) = poll(clean, "j1", finished(rows.clone()));

    let flaky = with_jobs(&["j1"]);
    let (flaky, effects) = update(
        flaky,
        Msg::PollFailed {
            job_id: "j1".to_string(),
            reason: "connection refused".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            job_id: "j1".to_string(),
            delay: RETRY_DELAY,
        }]
    );
    // Still tracked while retrying.
    assert!(flaky.registry().contains("j1"));

    let (flaky, effects) = due(flaky, "j1");
    assert_eq!(
        effects,
        vec![Effect::FetchStatus {
            job_id: "j1".to_string()
        }]
    );
    let (flaky, _) = poll(flaky, "j1", finished(rows));

    assert_eq!(flaky.results(), clean.results());
    assert_eq!(flaky.registry(), clean.registry());
}

#[test]
fn pollers_progress_independently() {
    init_logging();
    let state = with_jobs(&["a", "b"]);
    let (state, _) = poll(state, "b", finished(vec![row("1", "from b")]));
    let (state, _) = poll(state, "a", report("started", 1, 2, ""));
    let (state, _) = due(state, "a");
    let (state, _) = poll(state, "a", finished(vec![row("1", "from a")]));

    let texts: Vec<_> = state
        .results()
        .rows()
        .iter()
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(texts, vec!["from b", "from a"]);
}

#[test]
fn stale_due_while_request_outstanding_is_ignored() {
    init_logging();
    let state = with_jobs(&["j1"]);
    // The initial request is still in flight.
    let (_, effects) = due(state, "j1");
    assert!(effects.is_empty());
}

#[test]
fn responses_for_unknown_jobs_are_ignored() {
    init_logging();
    let state = with_jobs(&["j1"]);
    let (state, effects) = poll(state, "ghost", report("started", 1, 1, ""));

    assert!(effects.is_empty());
    assert!(!state.registry().contains("ghost"));
}

#[test]
fn copy_request_yields_row_text() {
    init_logging();
    let state = with_jobs(&["j1"]);
    let (state, _) = poll(state, "j1", finished(vec![row("1", "payload")]));

    let (state, effects) = update(state, Msg::CopyRequested { row: 0 });
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            text: "payload".to_string()
        }]
    );
    let (_, effects) = update(state, Msg::CopyRequested { row: 9 });
    assert!(effects.is_empty());
}

#[test]
fn export_request_carries_all_rows() {
    init_logging();
    let state = with_jobs(&["j1"]);
    let (state, _) = poll(state, "j1", finished(vec![row("1", "x"), row("2", "y")]));

    let (_, effects) = update(
        state,
        Msg::ExportRequested {
            path: "out.csv".into(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ExportResults {
            path: "out.csv".into(),
            rows: vec![row("1", "x"), row("2", "y")],
        }]
    );
}
