use std::fmt;

use kurbo::Point;

/// Static description of a campus building shown in the marker modal
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingInfo {
    pub name: &'static str,
    pub location: &'static str,
    pub hours: &'static str,
    pub department: &'static str,
    pub description: &'static str,
    /// Asset path of the building photo
    pub image: &'static str,
    /// Route of the building's occupancy screen
    pub route: &'static str,
}

/// Parking lot polled by a building's occupancy screen
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingLot {
    pub title: &'static str,
    /// Opaque query appended to `/process` on the backend
    pub endpoint: &'static str,
    pub image: &'static str,
}

/// Known campus buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Building {
    Brown,
    Witherspoon,
}

const BROWN: BuildingInfo = BuildingInfo {
    name: "Brown Hall",
    location: "Russellville Campus",
    hours: "Monday - Friday: 8:00 AM - 5:00 PM",
    department: "Admissions and Student Support Services",
    description: "Brown Hall, named in honor of the 11th president of ATU and his wife, is a \
        four-story, 66,900-square-foot facility located at the entrance of the university. It \
        houses the Admissions Office, Student Support Services, classrooms, and various \
        administrative departments, serving as a central hub for student services and academic \
        support.",
    image: "assets/images/brownhall.jpg",
    route: "/brown",
};

const WITHERSPOON: BuildingInfo = BuildingInfo {
    name: "Witherspoon Hall",
    location: "Russellville Campus",
    hours: "Monday - Friday: 8:00 AM - 5:00 PM",
    department: "Department of Music",
    description: "Witherspoon Hall, named after Gene Witherspoon, director of bands from 1950 to \
        1979, serves as the home of ATU's Department of Music. It features Witherspoon \
        Auditorium, a venue for concerts, recitals, and various musical events, and houses \
        faculty offices, classrooms, and practice rooms dedicated to music education and \
        performance.",
    image: "assets/images/witherspoonhall.jpg",
    route: "/witherspoon",
};

const BROWN_LOT: ParkingLot = ParkingLot {
    title: "Brown Hall Lot",
    endpoint: "/?process=Brown+Hall+Lot",
    image: "assets/images/brownparking.jpg",
};

const AA_LOT_NORTH: ParkingLot = ParkingLot {
    title: "AA Lot North",
    endpoint: "/?process=AA+Lot+North+2",
    image: "assets/images/witherspoonparking.jpg",
};

impl Building {
    pub const ALL: [Building; 2] = [Building::Brown, Building::Witherspoon];

    /// Short identifier used in routes and marker commands
    pub fn id(self) -> &'static str {
        match self {
            Building::Brown => "brown",
            Building::Witherspoon => "witherspoon",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() == id)
    }

    pub fn info(self) -> &'static BuildingInfo {
        match self {
            Building::Brown => &BROWN,
            Building::Witherspoon => &WITHERSPOON,
        }
    }

    pub fn lot(self) -> &'static ParkingLot {
        match self {
            Building::Brown => &BROWN_LOT,
            Building::Witherspoon => &AA_LOT_NORTH,
        }
    }

    /// Marker centre in map-image coordinates
    pub fn marker_position(self) -> Point {
        match self {
            Building::Brown => Point::new(270.0, 357.0),
            Building::Witherspoon => Point::new(42.0, 250.0),
        }
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}
