//! souk-context: one request in, one JSON object out.

use std::process::ExitCode;

use clap::Parser;
use souk_adaptor_cli::{handle, load_traditional_context, BridgeArgs, BridgeResponse};
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays pure JSON for the caller.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = BridgeArgs::parse();
    let env_loaded = match &args.env_file {
        Some(path) => souk_core::config::load_env_from_path(path),
        None => souk_core::config::load_env(),
    };
    if let Err(e) = env_loaded {
        tracing::warn!(error = %e, "Environment file not loaded");
    }

    let conversations_path = args.conversations_path.clone();
    let session_id = args.session_id.clone();

    let span = tracing::info_span!(
        "bridge_request",
        request_id = %uuid::Uuid::new_v4(),
        session_id = %args.session_id,
        language = %args.language
    );

    // The enhanced path degrades instead of erroring, but the boundary
    // contract is schema-on-every-path: run it on its own task so even a
    // panic below ends as JSON plus a nonzero exit, never a stack trace
    // on stdout.
    let task = tokio::spawn(async move { handle(&args).await }.instrument(span));

    // The JSON on stdout is authoritative on every completed path,
    // including requested or environmental degradation; only an internal
    // failure is signaled through a nonzero exit.
    let (response, code) = match task.await {
        Ok(response) => (response, ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "Bridge request failed");
            let traditional = load_traditional_context(&conversations_path, &session_id, 6);
            (
                BridgeResponse::fallback(traditional, e.to_string()),
                ExitCode::from(1),
            )
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => {
            println!("{}", json);
            code
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            ExitCode::from(1)
        }
    }
}
