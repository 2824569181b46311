mod selection;
mod transform;

use kurbo::{Point, Size};

pub use selection::MarkerSelection;
pub use transform::{
    clamp_scale, clamp_translate, max_translate, reduce, GestureEvent, Reduced, Settle,
    SettleKind, TransformState, MIN_SCALE, PAN_SETTLE_DURATION,
};

use crate::buildings::Building;

/// Markers are 30pt circles drawn on the map image
pub const MARKER_RADIUS: f64 = 15.0;

/// State owned by one mounted map screen
#[derive(Debug, Clone)]
pub struct MapView {
    viewport: Size,
    transform: TransformState,
    selection: MarkerSelection,
}

impl MapView {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            transform: TransformState::default(),
            selection: MarkerSelection::default(),
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn selection(&self) -> &MarkerSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut MarkerSelection {
        &mut self.selection
    }

    /// Feed one gesture frame through the reducer
    pub fn apply(&mut self, event: GestureEvent) -> Option<Settle> {
        let reduced = reduce(&self.transform, event, self.viewport);
        self.transform = reduced.state;
        reduced.settle
    }

    /// Marker under a view-space point, if any
    pub fn marker_at(&self, view_point: Point) -> Option<Building> {
        let image_point = self.transform.view_to_image(view_point, self.viewport);
        Building::ALL
            .into_iter()
            .map(|b| (b, (b.marker_position() - image_point).hypot()))
            .filter(|(_, dist)| *dist <= MARKER_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(b, _)| b)
    }

    /// Handle a tap; selecting a marker opens its detail modal
    pub fn tap(&mut self, view_point: Point) -> Option<Building> {
        let hit = self.marker_at(view_point)?;
        self.selection.show_building_info(hit);
        Some(hit)
    }

    /// Where a marker currently appears in view coordinates
    pub fn marker_view_position(&self, building: Building) -> Point {
        self.transform.view_transform(self.viewport) * building.marker_position()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;

    fn view() -> MapView {
        MapView::new(Size::new(390.0, 844.0))
    }

    #[test]
    fn test_tap_on_marker_at_rest() {
        let mut map = view();
        assert_eq!(map.tap(Point::new(272.0, 360.0)), Some(Building::Brown));
        assert_eq!(map.selection().current(), Some(Building::Brown));
    }

    #[test]
    fn test_tap_misses_empty_map() {
        let mut map = view();
        assert_eq!(map.tap(Point::new(10.0, 10.0)), None);
        assert_eq!(*map.selection(), MarkerSelection::Idle);
    }

    #[test]
    fn test_tap_follows_zoom_and_pan() {
        let mut map = view();
        map.apply(GestureEvent::PinchUpdate { factor: 2.0 });
        map.apply(GestureEvent::PinchEnd);
        map.apply(GestureEvent::PanUpdate {
            translation: Vec2::new(100.0, 0.0),
        });
        map.apply(GestureEvent::PanEnd);

        let on_screen = map.marker_view_position(Building::Witherspoon);
        // centre.x + 100 + 2 * (42 - 195)
        assert_eq!(on_screen.x, -11.0);
        // The untransformed position no longer hits Witherspoon
        assert_eq!(map.marker_at(Building::Witherspoon.marker_position()), None);

        let brown = map.marker_view_position(Building::Brown);
        assert_eq!(map.tap(brown + Vec2::new(20.0, 0.0)), Some(Building::Brown));
    }

    #[test]
    fn test_tap_replaces_open_selection() {
        let mut map = view();
        map.tap(Building::Brown.marker_position());
        map.tap(Building::Witherspoon.marker_position());
        assert_eq!(map.selection().current(), Some(Building::Witherspoon));
    }
}
