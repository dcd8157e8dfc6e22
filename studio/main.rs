/// playrithm Studio
///
/// Streams simulated training runs to a browser. Served by a synchronous
/// tiny_http server; the charting front-end talks to it over JSON and SSE.
///
/// Run with:
///   cargo run --bin studio [config.toml]
/// Then point the front-end at http://127.0.0.1:7878
///
/// Endpoints:
///   GET  /datasets             catalog with default split
///   GET  /datasets/split       ?id=&ratio=
///   GET  /algorithms           comparison table
///   GET  /algorithms/catalog   per-algorithm datasets and controls
///   GET  /algorithms/params    ?id=&dataset=&<param>=
///   GET  /explain              ?model=&base=&seed= mock SHAP values
///   GET  /hyperparams/defaults defaults and slider bounds
///   POST /train                start (replaces any active run)
///   POST /train/stop           cancel
///   GET  /train/history        chart points so far
///   GET  /train/events         live SSE stream

mod state;
mod routes;
mod handlers;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use playrithm::PlayrithmConfig;
use state::Studio;

fn main() {
    init_logging();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match PlayrithmConfig::discover(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let addr = config.studio.bind_addr.clone();
    let server = match Server::http(&addr) {
        Ok(s) => s,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind HTTP server");
            std::process::exit(1);
        }
    };

    println!("╔══════════════════════════════════════════════╗");
    println!("║          playrithm Studio                    ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Listening on http://{:<24}║", addr);
    println!("║  Live runs: GET /train/events (SSE)          ║");
    println!("╚══════════════════════════════════════════════╝");
    info!(
        %addr,
        tick_interval_ms = config.simulator.tick_interval_ms,
        "studio ready"
    );

    let shared_state = Arc::new(Studio::new(config));

    // One thread per request: the SSE handler blocks for a whole run and
    // must not stall ordinary requests.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,playrithm=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}
