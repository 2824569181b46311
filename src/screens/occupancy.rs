use std::io::Write;

use anyhow::Result;
use crossterm::style::Stylize;

use super::gauge;
use crate::{
    app::{App, Input},
    buildings::{Building, ParkingLot},
    occupancy::{self, fill_percentage, LoadState, OccupancyStatus},
    routes::Transition,
};

const GAUGE_WIDTH: usize = 30;

fn render<W: Write>(lot: &ParkingLot, state: &LoadState, color: bool, out: &mut W) -> Result<()> {
    writeln!(out, "── {} ──", lot.title)?;
    match state {
        LoadState::Loading => {
            writeln!(out, "Loading parking data...")?;
        }
        LoadState::Error(message) => {
            writeln!(out, "{}", message)?;
            writeln!(out, "[r] Retry    [b] Back")?;
        }
        LoadState::Success {
            summary,
            fetched_at,
        } => {
            let status = OccupancyStatus::from_summary(Some(summary));
            let label = if color {
                status.label().with(status.color().terminal()).to_string()
            } else {
                status.label().to_string()
            };
            writeln!(out, "Status: {} ({})", label, status.color().hex())?;
            writeln!(
                out,
                "{}",
                gauge(fill_percentage(Some(summary)), GAUGE_WIDTH)
            )?;
            writeln!(out, "Total Spots: {}", summary.total_spots)?;
            writeln!(out, "Occupied:    {}", summary.occupied_spots)?;
            writeln!(out, "Vacant:      {}", summary.vacant_spots)?;
            writeln!(
                out,
                "Occupancy Rate: {} {}%",
                gauge(summary.occupancy_rate, GAUGE_WIDTH),
                summary.occupancy_rate
            )?;
            writeln!(out, "Last updated: {}", fetched_at.format("%-I:%M:%S %p"))?;
            writeln!(out, "[image: {}]", lot.image)?;
            writeln!(out, "[r] Refresh    [b] Back")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Live occupancy for the lot serving `building`. Polling stops when the
/// screen is left.
pub async fn show<W: Write>(
    app: &App,
    building: Building,
    input: &mut Input,
    out: &mut W,
) -> Result<Transition> {
    let lot = building.lot();
    let mut poll = occupancy::start(app.source(), lot.endpoint, app.config().poll_interval());
    render(lot, &poll.current(), app.color(), out)?;

    let transition = loop {
        tokio::select! {
            Some(state) = poll.changed() => render(lot, &state, app.color(), out)?,
            line = input.recv() => {
                let Some(line) = line else {
                    break Transition::Exit;
                };
                match line.trim() {
                    "" => {}
                    "r" | "retry" | "refresh" => {
                        poll.retry();
                        render(lot, &LoadState::Loading, app.color(), out)?;
                    }
                    "b" | "back" => break Transition::Back,
                    "q" | "quit" => break Transition::Exit,
                    other => {
                        writeln!(out, "Unknown command: {} (r, b or q)", other)?;
                        out.flush()?;
                    }
                }
            }
        }
    };

    // Unmount: no further fetches, late responses are dropped
    drop(poll);
    Ok(transition)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        api::{ApiResponse, ParkingSpotSummary, SummarySource},
        config::AppConfig,
    };

    struct FixedSource {
        calls: AtomicUsize,
        rate: Option<f64>,
    }

    #[async_trait]
    impl SummarySource for FixedSource {
        async fn fetch_data(&self, endpoint: &str) -> Option<ApiResponse> {
            assert_eq!(endpoint, "/?process=AA+Lot+North+2");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate.map(|rate| ApiResponse {
                result: ParkingSpotSummary {
                    total_spots: 200,
                    occupied_spots: 130,
                    vacant_spots: 70,
                    occupancy_rate: rate,
                    occupied_spot_index: vec![3, 5, 8],
                },
            })
        }
    }

    fn app(rate: Option<f64>) -> (App, Arc<FixedSource>) {
        let source = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            rate,
        });
        let app = App::new(AppConfig::default()).with_source(source.clone());
        (app, source)
    }

    #[tokio::test]
    async fn test_renders_summary_then_back() {
        let (app, source) = app(Some(65.0));
        let (tx, mut rx) = mpsc::channel(4);
        let mut out = Vec::new();

        let feeder = async {
            while source.calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tx.send("b".to_string()).await.unwrap();
        };
        let (transition, ()) = tokio::join!(
            show(&app, Building::Witherspoon, &mut rx, &mut out),
            feeder
        );

        assert_eq!(transition.unwrap(), Transition::Back);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("── AA Lot North ──\nLoading parking data...\n"));
        assert!(out.contains("Status: Filling up (#eab308)"));
        assert!(out.contains("Vacant:      70"));
        assert!(out.contains("65%"));
    }

    #[test]
    fn test_error_render_offers_retry() {
        let mut out = Vec::new();
        let lot = Building::Witherspoon.lot();
        render(lot, &LoadState::Error("Failed to fetch data".into()), false, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "── AA Lot North ──\nFailed to fetch data\n[r] Retry    [b] Back\n"
        );
    }

    #[test]
    fn test_color_wraps_status_label() {
        let state = LoadState::Success {
            summary: ParkingSpotSummary {
                total_spots: 10,
                occupied_spots: 9,
                vacant_spots: 1,
                occupancy_rate: 90.0,
                occupied_spot_index: vec![],
            },
            fetched_at: chrono::Local::now(),
        };
        let styled = "Almost full".with(crossterm::style::Color::Red).to_string();

        let mut out = Vec::new();
        render(Building::Brown.lot(), &state, true, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&format!("Status: {} (#ef4444)", styled)), "{}", out);

        let mut plain = Vec::new();
        render(Building::Brown.lot(), &state, false, &mut plain).unwrap();
        let plain = String::from_utf8(plain).unwrap();
        assert!(plain.contains("Status: Almost full (#ef4444)"));
        assert!(!plain.contains('\x1b'));
    }
}
