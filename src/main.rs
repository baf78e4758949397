#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use std::process::ExitCode;

mod app;
mod charts;
mod cli;
mod config;
mod constants;
mod controller;
mod data;
mod error;
mod perf;
mod pipeline;
mod registry;
mod scene;
mod state;
mod ui;
mod widgets;

#[cfg(test)]
mod fixtures;

use app::DashApp;
use cli::Cli;

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            tracing::info!(%addr, "puffin server listening");
            Some(server)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not start puffin server");
            None
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_target(false)
        .init();

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = start_puffin_server();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("{}: {}", e.title(), e.user_message());
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        charts = config.charts.len(),
        sources = config.sources.len(),
        data_dir = %cli.data_dir.display(),
        "starting dashboard"
    );

    let title = config.title.clone();
    let geo = cli.geo_source();
    let data_dir = cli.data_dir;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title(&title),
        ..Default::default()
    };

    match eframe::run_native(
        &title,
        options,
        Box::new(move |_| Ok(Box::new(DashApp::new(config, data_dir, geo)))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "window closed with error");
            ExitCode::FAILURE
        }
    }
}
