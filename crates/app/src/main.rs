//! Courier - Main Entry Point
//!
//! Sends one HTTP request and prints the outcome. Transport I/O runs on a
//! tokio runtime while outcomes are delivered on the main thread through
//! an event loop.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use courier_application::{
    ApiClient, EventLoop, EventLoopHandle, HttpResponseCallback, RequestExecutor, ResponseCallback,
};
use courier_domain::{ErrorItem, Failure, ResponseItem, Success};
use courier_infrastructure::{CourierConfig, ReqwestTransport};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CourierConfig::load()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.transport.timeout_ms = timeout_ms;
        config.validate()?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let transport = ReqwestTransport::from_config(config.transport)?;

    let (event_loop, handle) = EventLoop::new();
    let executor = RequestExecutor::with_runtime(
        Arc::new(transport),
        Arc::new(handle.clone()),
        runtime.handle().clone(),
    );
    let client = Arc::new(ApiClient::new(executor));

    let cancel_on_interrupt = Arc::clone(&client);
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling request");
            cancel_on_interrupt.cancel();
        }
    });

    let request = cli.to_request();
    tracing::debug!(id = %request.id, method = %request.method, "executing request");

    let reporter = Arc::new(Reporter::new(handle));
    if cli.raw {
        client.executor().execute(request, reporter.clone());
    } else {
        client.execute(request, None, Value::Null, Arc::clone(&reporter));
    }

    event_loop.run();
    runtime.shutdown_background();

    Ok(reporter.exit_code())
}

/// Prints outcomes and stops the event loop after the first one.
struct Reporter {
    event_loop: EventLoopHandle,
    failed: AtomicBool,
}

impl Reporter {
    const fn new(event_loop: EventLoopHandle) -> Self {
        Self {
            event_loop,
            failed: AtomicBool::new(false),
        }
    }

    fn fail(&self, message: &str) {
        eprintln!("{message}");
        self.failed.store(true, Ordering::SeqCst);
        self.event_loop.quit();
    }

    fn exit_code(&self) -> ExitCode {
        if self.failed.load(Ordering::SeqCst) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

impl ResponseCallback<Value> for Reporter {
    fn on_success(&self, response: Success<Value>) {
        tracing::info!(status = %response.status(), "request succeeded");
        if !response.is_empty() {
            match serde_json::to_string_pretty(response.payload()) {
                Ok(pretty) => println!("{pretty}"),
                Err(e) => tracing::warn!("failed to format response: {e}"),
            }
        }
        self.event_loop.quit();
    }

    fn on_failure(&self, failure: Failure) {
        self.fail(&failure.error().to_string());
    }

    fn on_cancelled(&self) {
        self.fail("request cancelled");
    }
}

impl HttpResponseCallback for Reporter {
    fn on_success(&self, response: ResponseItem) {
        tracing::info!(status = %response.status(), "request succeeded");
        if let ResponseItem::StringBody { body, .. } = response {
            println!("{body}");
        }
        self.event_loop.quit();
    }

    fn on_failure(&self, error: ErrorItem) {
        self.fail(&error.to_string());
    }

    fn on_cancelled(&self) {
        self.fail("request cancelled");
    }
}
