use serde::Serialize;
use tracing::info;

use playrithm::{Hyperparams, ModelArchitecture, RunOutcome, SimResult, TrainingRunConfig};

use crate::routes::{error_response, json_response, HttpResponse};
use crate::state::{SharedState, TrainingStatus};
use crate::util::form::FormFields;

#[derive(Serialize)]
struct StartedResponse<'a> {
    run_id: u64,
    dataset: &'a str,
    total_epochs: usize,
    learning_rate: f64,
    parameter_count: usize,
    architecture: String,
}

// ---------------------------------------------------------------------------
// POST /train
// ---------------------------------------------------------------------------

/// Starts a simulated run from the submitted parameters, replacing any run
/// already in progress. Fields left out fall back to the current settings.
pub fn handle_start(form: &FormFields, state: &SharedState) -> HttpResponse {
    let (hp, dataset_id, seed) = {
        let st = state.state();
        match read_params(form, &st.hyperparams, &st.dataset_id) {
            Ok(parsed) => parsed,
            Err(e) => return error_response(&e),
        }
    };

    let mut run_config = hp
        .run_config(dataset_id.clone())
        .with_tick_interval(state.config.simulator.tick_interval());
    if let Some(seed) = seed.or(state.config.simulator.seed) {
        run_config = run_config.with_seed(seed);
    }

    let architecture = ModelArchitecture::for_dataset_id(&hp, &dataset_id);

    // Holding the session lock serializes concurrent starts and stops.
    let mut session = state.session();
    session.cancel();

    let generation = {
        let mut st = state.state();
        st.generation += 1;
        st.history.reset(hp.epochs);
        st.hyperparams = hp.clone();
        st.dataset_id = dataset_id.clone();
        st.architecture = architecture.clone();
        // run_id is filled in once the loop is spawned.
        st.training = TrainingStatus::Running { run_id: 0, total_epochs: hp.epochs };
        st.generation
    };

    match spawn_run(state, &mut session, run_config, generation) {
        Ok(run_id) => {
            let mut st = state.state();
            if let TrainingStatus::Running { run_id: id, .. } = &mut st.training {
                *id = run_id;
            }
            drop(st);
            info!(run_id, dataset = %dataset_id, epochs = hp.epochs, "studio run started");
            json_response(200, &StartedResponse {
                run_id,
                dataset: &dataset_id,
                total_epochs: hp.epochs,
                learning_rate: hp.learning_rate,
                parameter_count: architecture.parameter_count(),
                architecture: architecture.summary(),
            })
        }
        Err(e) => {
            state.state().training = TrainingStatus::Idle;
            error_response(&e)
        }
    }
}

fn read_params(
    form: &FormFields,
    current: &Hyperparams,
    current_dataset: &str,
) -> SimResult<(Hyperparams, String, Option<u64>)> {
    let hp = Hyperparams {
        learning_rate:     form.parse_opt("learning_rate")?.unwrap_or(current.learning_rate),
        epochs:            form.parse_opt("epochs")?.unwrap_or(current.epochs),
        batch_size:        form.parse_opt("batch_size")?.unwrap_or(current.batch_size),
        optimizer:         form.parse_opt("optimizer")?.unwrap_or(current.optimizer),
        hidden_layers:     form.parse_opt("hidden_layers")?.unwrap_or(current.hidden_layers),
        neurons_per_layer: form.parse_opt("neurons_per_layer")?.unwrap_or(current.neurons_per_layer),
        regularization:    form.parse_opt("regularization")?.unwrap_or(current.regularization),
        activation:        form.parse_opt("activation")?.unwrap_or(current.activation),
    };
    hp.validate()?;
    let dataset = form.get("dataset").unwrap_or(current_dataset).to_owned();
    Ok((hp, dataset, form.parse_opt("seed")?))
}

/// Wires the run callbacks into the studio state. Both callbacks check the
/// generation so a superseded run can never touch the new run's history.
fn spawn_run(
    state: &SharedState,
    session: &mut playrithm::TrainingSession,
    config: TrainingRunConfig,
    generation: u64,
) -> SimResult<u64> {
    let sample_state = state.clone();
    let complete_state = state.clone();

    session.start(
        config,
        move |sample| {
            let mut st = sample_state.state();
            if st.generation == generation {
                // The loop only ever emits the next epoch.
                let _ = st.history.push(sample);
            }
        },
        move || {
            let mut st = complete_state.state();
            if st.generation == generation {
                let epochs_completed = st.history.len();
                st.training = TrainingStatus::Done { was_stopped: false, epochs_completed };
            }
        },
    )
}

// ---------------------------------------------------------------------------
// POST /train/stop
// ---------------------------------------------------------------------------

pub fn handle_stop(state: &SharedState) -> HttpResponse {
    let outcome = state.session().cancel();

    let mut st = state.state();
    let stopped = matches!(outcome, Some(RunOutcome::Cancelled { .. }));
    if stopped {
        let epochs_completed = st.history.len();
        st.training = TrainingStatus::Done { was_stopped: true, epochs_completed };
        info!(epochs = epochs_completed, "studio run stopped");
    }
    json_response(200, &serde_json::json!({
        "stopped": stopped,
        "status": st.training,
    }))
}

// ---------------------------------------------------------------------------
// GET /train/history
// ---------------------------------------------------------------------------

pub fn handle_history(state: &SharedState) -> HttpResponse {
    let st = state.state();
    json_response(200, &serde_json::json!({
        "status": st.training,
        "dataset": st.dataset_id,
        "hyperparams": st.hyperparams,
        "parameter_count": st.architecture.parameter_count(),
        "total_epochs": st.history.total_epochs(),
        "progress_percent": st.history.progress_percent(),
        "points": st.history.chart_points(),
        "reference": st.history.reference_points(&st.dataset_id),
    }))
}
