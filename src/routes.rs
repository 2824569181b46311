use std::{fmt, str::FromStr};

use crate::buildings::Building;

/// Logical screens of the app, addressed by path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Map,
    ParkingMap,
    Occupancy(Building),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Map => "/map",
            Route::ParkingMap => "/parkingmap",
            Route::Occupancy(building) => building.info().route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        match path {
            "" | "/" => Ok(Route::Home),
            "/map" => Ok(Route::Map),
            "/parkingmap" => Ok(Route::ParkingMap),
            other => other
                .strip_prefix('/')
                .and_then(Building::from_id)
                .map(Route::Occupancy)
                .ok_or_else(|| anyhow::anyhow!("Unknown route: {}", other)),
        }
    }
}

/// What a screen asks the navigator to do when it finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Push(Route),
    Back,
    Exit,
}

/// Navigation history; the last entry is the screen on display
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.history.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Apply a transition and return the route to show next, if any
    pub fn apply(&mut self, transition: Transition) -> Option<Route> {
        match transition {
            Transition::Push(route) => {
                let from = self.history.last().map_or("-", |r| r.path());
                tracing::debug!("navigate {} -> {}", from, route);
                self.history.push(route);
            }
            Transition::Back => {
                self.history.pop();
            }
            Transition::Exit => self.history.clear(),
        }
        self.current()
    }
}
