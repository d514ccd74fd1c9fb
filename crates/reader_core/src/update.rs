use crate::{
    AppState, Effect, JobState, JobStatus, Msg, PollDecision, EMPTY_QUEUE_MESSAGE,
    UPLOAD_FAILED_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if msg.is_user_action() {
        state.dismiss_notices();
    }
    let effects = match msg {
        Msg::Started => {
            state.mark_dirty();
            vec![Effect::FetchLimits]
        }
        Msg::LimitsLoaded(limits) => {
            state.set_limits(limits);
            Vec::new()
        }
        Msg::FilesQueued(files) => {
            state.replace_queue(files);
            Vec::new()
        }
        Msg::FilesAdded(files) => {
            state.extend_queue(files);
            Vec::new()
        }
        Msg::QueueCleared => {
            state.replace_queue(Vec::new());
            Vec::new()
        }
        Msg::OnlyAztecToggled(only_aztec) => {
            state.set_only_aztec(only_aztec);
            Vec::new()
        }
        Msg::UploadClicked => {
            if state.upload_in_flight() {
                return (state, Vec::new());
            }
            if state.queue().is_empty() {
                state.raise_alert(EMPTY_QUEUE_MESSAGE);
                return (
                    state,
                    vec![Effect::Alert {
                        message: EMPTY_QUEUE_MESSAGE.to_string(),
                    }],
                );
            }
            state.set_upload_in_flight(true);
            vec![Effect::SubmitUpload {
                files: state.queue().to_vec(),
                only_aztec: state.only_aztec(),
            }]
        }
        Msg::UploadSucceeded { job_ids } => {
            state.set_upload_in_flight(false);
            state.replace_queue(Vec::new());
            let mut effects = Vec::with_capacity(job_ids.len());
            for job_id in job_ids {
                // A repeated id already has its poller; starting another would double-poll.
                if !state.register_job(&job_id) {
                    continue;
                }
                let started = state
                    .poller_mut(&job_id)
                    .is_some_and(|poller| poller.begin_request());
                if started {
                    effects.push(Effect::FetchStatus { job_id });
                }
            }
            effects
        }
        Msg::UploadFailed { message } => {
            state.set_upload_in_flight(false);
            let message = if message.trim().is_empty() {
                UPLOAD_FAILED_MESSAGE.to_string()
            } else {
                message
            };
            state.raise_alert(message.clone());
            vec![Effect::Alert { message }]
        }
        Msg::PollDue { job_id } => {
            let started = state
                .poller_mut(&job_id)
                .is_some_and(|poller| poller.begin_request());
            if started {
                vec![Effect::FetchStatus { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::PollSucceeded { job_id, state: job } => apply_status(&mut state, job_id, job),
        Msg::PollFailed { job_id, .. } => {
            let decision = state
                .poller_mut(&job_id)
                .and_then(|poller| poller.on_transient_failure());
            match decision {
                Some(PollDecision::PollAfter(delay)) => {
                    vec![Effect::SchedulePoll { job_id, delay }]
                }
                Some(PollDecision::Terminate) | None => Vec::new(),
            }
        }
        Msg::CopyRequested { row } => match state.results().copy_text(row) {
            Some(text) => vec![Effect::CopyToClipboard {
                text: text.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::ExportRequested { path } => vec![Effect::ExportResults {
            path,
            rows: state.results().rows().to_vec(),
        }],
        Msg::ExportFinished { message } => {
            state.raise_alert(message);
            Vec::new()
        }
        Msg::HelpRequested => {
            state.show_help();
            Vec::new()
        }
        Msg::CommandRejected { input } => {
            state.raise_alert(format!("Unknown command: {input} (try `help`)"));
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn apply_status(state: &mut AppState, job_id: String, job: JobState) -> Vec<Effect> {
    let decision = state
        .poller_mut(&job_id)
        .and_then(|poller| poller.on_status(&job.status));
    match decision {
        Some(PollDecision::PollAfter(delay)) => {
            state.update_job(&job_id, job);
            vec![Effect::SchedulePoll { job_id, delay }]
        }
        Some(PollDecision::Terminate) => {
            if job.status == JobStatus::Finished {
                if let Some(rows) = job.result {
                    state.append_results(rows);
                }
            }
            state.retire_job(&job_id);
            Vec::new()
        }
        None => Vec::new(),
    }
}
