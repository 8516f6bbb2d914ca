//! Headless entry point: loads the store the way the UI would and logs the
//! resulting screen. Useful for checking a persistence endpoint by hand.

use std::sync::Arc;

use stockroom_client::view::Screen;
use stockroom_client::{App, ClientConfig, Notice, NoticeLevel, RecordStore, Renderer};

/// Renderer that writes every repaint and notice to the log.
struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, screen: &Screen) {
        match serde_json::to_string(screen) {
            Ok(json) => tracing::info!(
                items = screen.inventory.len(),
                suppliers = screen.suppliers.len(),
                low_stock = screen.dashboard.low_stock_count,
                screen = %json,
                "render"
            ),
            Err(err) => tracing::error!("failed to serialize screen: {err}"),
        }
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::error!("{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{}", notice.message),
        }
    }
}

#[tokio::main]
async fn main() {
    stockroom_observability::init_from_env();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    let store = match RecordStore::from_config(&config) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!("failed to create record store: {err}");
            std::process::exit(1);
        }
    };

    let mut app = App::new(store, LogRenderer);
    let report = app.start().await;
    tracing::info!(source = ?report.source, degraded = report.is_degraded(), "startup complete");
}
