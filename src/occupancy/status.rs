use crossterm::style::Color;

use crate::api::ParkingSpotSummary;

/// Three-tier classification of a lot's occupancy rate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OccupancyStatus {
    Plenty,
    FillingUp,
    AlmostFull,
    /// No snapshot has arrived yet
    Unknown,
}

impl OccupancyStatus {
    pub fn from_rate(occupancy_rate: f64) -> Self {
        if occupancy_rate < 50.0 {
            OccupancyStatus::Plenty
        } else if occupancy_rate < 80.0 {
            OccupancyStatus::FillingUp
        } else {
            OccupancyStatus::AlmostFull
        }
    }

    pub fn from_summary(summary: Option<&ParkingSpotSummary>) -> Self {
        summary.map_or(OccupancyStatus::Unknown, |s| {
            Self::from_rate(s.occupancy_rate)
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            OccupancyStatus::Plenty => "Plenty of spots available",
            OccupancyStatus::FillingUp => "Filling up",
            OccupancyStatus::AlmostFull => "Almost full",
            OccupancyStatus::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> StatusColor {
        match self {
            OccupancyStatus::Plenty => StatusColor::Green,
            OccupancyStatus::FillingUp => StatusColor::Yellow,
            OccupancyStatus::AlmostFull => StatusColor::Red,
            OccupancyStatus::Unknown => StatusColor::Neutral,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
    Neutral,
}

impl StatusColor {
    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Green => "#22c55e",
            StatusColor::Yellow => "#eab308",
            StatusColor::Red => "#ef4444",
            StatusColor::Neutral => "#64748b",
        }
    }

    /// Closest terminal colour
    pub fn terminal(self) -> Color {
        match self {
            StatusColor::Green => Color::Green,
            StatusColor::Yellow => Color::Yellow,
            StatusColor::Red => Color::Red,
            StatusColor::Neutral => Color::DarkGrey,
        }
    }
}

/// Percentage of the gauge to fill: occupied over total, 0 for an empty lot
pub fn fill_percentage(summary: Option<&ParkingSpotSummary>) -> f64 {
    match summary {
        Some(s) if s.total_spots > 0 => {
            f64::from(s.occupied_spots) / f64::from(s.total_spots) * 100.0
        }
        _ => 0.0,
    }
}
