use std::{
    io::{BufRead, Write},
    sync::Arc,
};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::{
    api::{OccupancyClient, SummarySource},
    config::AppConfig,
    routes::{Navigator, Route},
    screens,
};

/// Line-oriented user input shared by all screens. A closed channel means
/// the user is gone and the app should exit.
pub type Input = mpsc::Receiver<String>;

/// Read stdin on a dedicated thread and forward each line
pub fn stdin_lines() -> Input {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("failed to read stdin: {}", e);
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Everything screens need while mounted
pub struct App {
    config: AppConfig,
    client: OccupancyClient,
    source: Arc<dyn SummarySource>,
    color: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let client = OccupancyClient::new(config.api_base_url.clone());
        let source: Arc<dyn SummarySource> = Arc::new(client.clone());
        Self {
            config,
            client,
            source,
            color: false,
        }
    }

    /// Replace where occupancy snapshots come from
    pub fn with_source(mut self, source: Arc<dyn SummarySource>) -> Self {
        self.source = source;
        self
    }

    /// Emit ANSI colours for status text
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &OccupancyClient {
        &self.client
    }

    pub fn source(&self) -> Arc<dyn SummarySource> {
        self.source.clone()
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Show `start` and keep navigating until history is empty or the user quits
    pub async fn run<W: Write>(&self, start: Route, input: &mut Input, out: &mut W) -> Result<()> {
        let mut navigator = Navigator::new(start);
        while let Some(route) = navigator.current() {
            tracing::info!("showing {}", route);
            let transition = match route {
                Route::Home => screens::home::show(input, out).await?,
                Route::Map => screens::map::show(self, input, out).await?,
                Route::ParkingMap => screens::parking_map::show(self, input, out).await?,
                Route::Occupancy(building) => {
                    screens::occupancy::show(self, building, input, out).await?
                }
            };
            out.flush()?;
            navigator.apply(transition);
        }
        Ok(())
    }
}
