mod app;
mod backend;
mod config;
mod controller;
mod event;
mod session;
mod workflow;

use app::FlowchatApp;
use backend::HttpBackend;
use config::Config;
use controller::ConversationController;
use eframe::egui;
use session::SessionContext;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = Config::from_env()?;
    tracing::info!("starting flowchat");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("flowchat-runtime")
        .build()?;

    let backend = Arc::new(HttpBackend::new(&config.backend_url));
    tracing::debug!(base_url = backend.base_url(), "backend client ready");
    let controller = ConversationController::new(
        SessionContext::new(),
        backend,
        runtime.handle().clone(),
        config.export_dir,
    );
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flowchat",
        native_options,
        Box::new(move |creation_context| {
            Ok(Box::new(FlowchatApp::new(
                &creation_context.egui_ctx,
                controller,
            )))
        }),
    )?;

    Ok(())
}
