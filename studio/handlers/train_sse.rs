use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tiny_http::Request;
use tracing::debug;

use playrithm::MetricSample;

use crate::state::{SharedState, TrainingStatus};
use crate::util::sse::{format_sse_event, write_sse, SSE_KEEPALIVE, SSE_RESPONSE_HEAD};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Payload of an `epoch` event: the sample plus how far the run has got.
#[derive(Serialize)]
struct EpochEvent<'a> {
    #[serde(flatten)]
    sample:   &'a MetricSample,
    progress: f64,
}

/// `GET /train/events`: Server-Sent Events stream of the current run.
///
/// Takes ownership of `request` so it can write to the raw socket, then:
/// 1. replays every sample already recorded as `epoch` events,
/// 2. streams new samples as they land in the history,
/// 3. sends `reset` if a newer run replaces the one being watched,
/// 4. ends with `done` (natural completion) or `stopped` (user cancel).
///
/// Idle stretches longer than the configured keep-alive get a `: ping`.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();
    if !write_sse(&mut writer, SSE_RESPONSE_HEAD) {
        return;
    }

    let keepalive = Duration::from_millis(state.config.studio.keepalive_ms);
    let mut generation = state.state().generation;
    let mut sent = 0usize;
    let mut last_write = Instant::now();

    loop {
        let (fresh, status, current_gen) = {
            let st = state.state();
            let fresh: Vec<MetricSample> = if st.generation == generation {
                st.history.samples().get(sent..).map(<[_]>::to_vec).unwrap_or_default()
            } else {
                Vec::new()
            };
            (fresh, st.training, st.generation)
        };

        if current_gen != generation {
            generation = current_gen;
            sent = 0;
            if !write_sse(&mut writer, &format_sse_event("reset", "{}")) {
                return;
            }
            last_write = Instant::now();
            continue;
        }

        for sample in &fresh {
            let event = EpochEvent { sample, progress: sample.progress() };
            if let Ok(json) = serde_json::to_string(&event) {
                if !write_sse(&mut writer, &format_sse_event("epoch", &json)) {
                    debug!("SSE client disconnected");
                    return;
                }
            }
            sent += 1;
            last_write = Instant::now();
        }

        match status {
            TrainingStatus::Running { .. } => {}
            TrainingStatus::Done { was_stopped, epochs_completed } => {
                // Everything up to the final epoch has been flushed above.
                let (name, data) = if was_stopped {
                    ("stopped", format!("{{\"epoch_reached\":{}}}", epochs_completed))
                } else {
                    ("done", format!("{{\"epochs_completed\":{}}}", epochs_completed))
                };
                let _ = write_sse(&mut writer, &format_sse_event(name, &data));
                return;
            }
            TrainingStatus::Idle if sent == 0 && fresh.is_empty() => {
                // Nothing is running and nothing was recorded.
                let _ = write_sse(&mut writer, &format_sse_event("done", "{}"));
                return;
            }
            TrainingStatus::Idle => {}
        }

        if last_write.elapsed() >= keepalive {
            if !write_sse(&mut writer, SSE_KEEPALIVE) {
                return;
            }
            last_write = Instant::now();
        }
        thread::sleep(POLL_INTERVAL);
    }
}
