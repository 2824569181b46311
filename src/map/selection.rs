use crate::buildings::Building;

/// Marker detail flow on the map screen.
///
/// Only one building can be selected at a time; showing another marker while
/// the modal is open replaces the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkerSelection {
    #[default]
    Idle,
    /// Detail modal is open for this building
    Selected(Building),
    /// "View Parking" was confirmed; the modal is closed
    NavigatedAway(Building),
}

impl MarkerSelection {
    pub fn show_building_info(&mut self, building: Building) {
        tracing::debug!("showing building info for {}", building.id());
        *self = MarkerSelection::Selected(building);
    }

    /// Close the modal without navigating. Returns false if nothing was open.
    pub fn dismiss(&mut self) -> bool {
        match self {
            MarkerSelection::Selected(_) => {
                *self = MarkerSelection::Idle;
                true
            }
            _ => false,
        }
    }

    /// Confirm "View Parking", returning the route to navigate to
    pub fn confirm(&mut self) -> Option<&'static str> {
        match *self {
            MarkerSelection::Selected(building) => {
                *self = MarkerSelection::NavigatedAway(building);
                Some(building.info().route)
            }
            _ => None,
        }
    }

    /// Building whose detail modal is currently visible
    pub fn current(&self) -> Option<Building> {
        match self {
            MarkerSelection::Selected(building) => Some(*building),
            _ => None,
        }
    }
}
