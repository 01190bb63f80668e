//! Curated airport and port tables.
//!
//! Scanned linearly; at a few dozen entries a spatial index buys nothing.

use crate::models::Coordinates;
use crate::spatial::haversine_distance;

/// A known transport hub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hub {
    pub name: &'static str,
    pub city: &'static str,
    pub coordinates: Coordinates,
}

impl Hub {
    pub const fn new(latitude: f64, longitude: f64, name: &'static str, city: &'static str) -> Self {
        Self {
            name,
            city,
            coordinates: Coordinates::new(latitude, longitude),
        }
    }
}

const fn hub(latitude: f64, longitude: f64, name: &'static str, city: &'static str) -> Hub {
    Hub::new(latitude, longitude, name, city)
}

/// A hub resolved for a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct HubCandidate {
    pub name: String,
    pub full_name: String,
    pub coordinates: Coordinates,
    /// Great-circle distance from the query point.
    pub distance_km: f64,
}

impl HubCandidate {
    pub fn from_hub(hub: &Hub, distance_km: f64) -> Self {
        Self {
            name: hub.name.to_string(),
            full_name: format!("{}, {}", hub.name, hub.city),
            coordinates: hub.coordinates,
            distance_km,
        }
    }
}

/// Nearest hub within `max_radius_km` (inclusive). The first entry wins ties.
pub fn find_nearest(hubs: &[Hub], point: Coordinates, max_radius_km: f64) -> Option<HubCandidate> {
    let mut best: Option<(&Hub, f64)> = None;
    for hub in hubs {
        let distance = haversine_distance(point, hub.coordinates);
        if distance > max_radius_km {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((hub, distance)),
        }
    }
    best.map(|(hub, distance)| HubCandidate::from_hub(hub, distance))
}

pub static KNOWN_AIRPORTS: &[Hub] = &[
    // India
    hub(28.5562, 77.1000, "Indira Gandhi International Airport", "New Delhi"),
    hub(19.0896, 72.8656, "Chhatrapati Shivaji Maharaj International Airport", "Mumbai"),
    hub(12.9941, 77.7064, "Kempegowda International Airport", "Bengaluru"),
    hub(13.0827, 80.2707, "Chennai International Airport", "Chennai"),
    hub(22.6520, 88.4463, "Netaji Subhas Chandra Bose International Airport", "Kolkata"),
    hub(17.2403, 78.4294, "Rajiv Gandhi International Airport", "Hyderabad"),
    hub(26.8242, 75.8122, "Jaipur International Airport", "Jaipur"),
    hub(23.0728, 72.6347, "Sardar Vallabhbhai Patel International Airport", "Ahmedabad"),
    hub(15.3808, 73.8314, "Goa International Airport", "Goa"),
    // UAE
    hub(25.2528, 55.3644, "Dubai International Airport", "Dubai"),
    hub(24.4539, 54.6511, "Abu Dhabi International Airport", "Abu Dhabi"),
    hub(25.3287, 55.5172, "Sharjah International Airport", "Sharjah"),
    // UK
    hub(51.4700, -0.4543, "Heathrow Airport", "London"),
    hub(51.1537, -0.1821, "Gatwick Airport", "London"),
    hub(51.8747, -0.3683, "Luton Airport", "London"),
    hub(51.5048, 0.0495, "London City Airport", "London"),
    hub(53.3537, -2.2750, "Manchester Airport", "Manchester"),
    hub(55.9500, -3.3725, "Edinburgh Airport", "Edinburgh"),
    // USA
    hub(40.6413, -73.7781, "JFK International Airport", "New York"),
    hub(40.7769, -73.8740, "LaGuardia Airport", "New York"),
    hub(33.9425, -118.4081, "Los Angeles International Airport", "Los Angeles"),
    hub(41.9742, -87.9073, "O'Hare International Airport", "Chicago"),
    hub(37.6213, -122.3790, "San Francisco International Airport", "San Francisco"),
    // Europe
    hub(48.1103, 16.5697, "Vienna International Airport", "Vienna"),
    hub(52.5597, 13.2877, "Berlin Brandenburg Airport", "Berlin"),
    hub(50.0379, 8.5622, "Frankfurt Airport", "Frankfurt"),
    hub(48.3538, 11.7861, "Munich Airport", "Munich"),
    hub(49.0097, 2.5479, "Charles de Gaulle Airport", "Paris"),
    hub(52.3105, 4.7683, "Amsterdam Schiphol Airport", "Amsterdam"),
    hub(41.2971, 2.0785, "Barcelona–El Prat Airport", "Barcelona"),
    hub(40.4983, -3.5676, "Madrid–Barajas Airport", "Madrid"),
    hub(41.8003, 12.2389, "Rome Fiumicino Airport", "Rome"),
    // Asia
    hub(35.5494, 139.7798, "Tokyo Haneda Airport", "Tokyo"),
    hub(35.7720, 140.3929, "Narita International Airport", "Tokyo"),
    hub(22.3080, 113.9185, "Hong Kong International Airport", "Hong Kong"),
    hub(1.3644, 103.9915, "Singapore Changi Airport", "Singapore"),
    hub(13.6900, 100.7501, "Suvarnabhumi Airport", "Bangkok"),
    hub(37.4602, 126.4407, "Incheon International Airport", "Seoul"),
    hub(31.1443, 121.8083, "Shanghai Pudong International Airport", "Shanghai"),
    hub(40.0799, 116.6031, "Beijing Capital International Airport", "Beijing"),
    // Australia
    hub(-33.9399, 151.1753, "Sydney Kingsford Smith Airport", "Sydney"),
    hub(-37.6733, 144.8433, "Melbourne Airport", "Melbourne"),
    // Middle East
    hub(29.0344, 40.0994, "King Fahd International Airport", "Dammam"),
    hub(24.9578, 46.6989, "King Khalid International Airport", "Riyadh"),
    hub(21.6805, 39.1566, "King Abdulaziz International Airport", "Jeddah"),
    hub(25.2731, 51.6081, "Hamad International Airport", "Doha"),
];

pub static KNOWN_PORTS: &[Hub] = &[
    // India
    hub(18.9542, 72.8479, "Jawaharlal Nehru Port", "Mumbai"),
    hub(13.0878, 80.2915, "Chennai Port", "Chennai"),
    hub(22.2350, 68.9671, "Kandla Port", "Kandla"),
    hub(15.4208, 73.8000, "Mormugao Port", "Goa"),
    hub(8.4855, 76.9492, "Thiruvananthapuram Port", "Thiruvananthapuram"),
    // UAE
    hub(25.0657, 55.1306, "Jebel Ali Port", "Dubai"),
    hub(25.2697, 55.2963, "Port Rashid", "Dubai"),
    hub(24.5198, 54.4050, "Khalifa Port", "Abu Dhabi"),
    // Europe
    hub(51.9500, 4.1500, "Port of Rotterdam", "Rotterdam"),
    hub(53.5503, 9.9936, "Port of Hamburg", "Hamburg"),
    hub(51.2277, 4.4003, "Port of Antwerp", "Antwerp"),
    hub(43.1000, 5.9333, "Port of Marseille", "Marseille"),
    hub(41.3500, 2.1833, "Port of Barcelona", "Barcelona"),
    hub(51.5074, 0.1278, "Port of London", "London"),
    // Asia
    hub(22.2783, 114.1747, "Hong Kong Port", "Hong Kong"),
    hub(1.2655, 103.8200, "Port of Singapore", "Singapore"),
    hub(31.2304, 121.4737, "Port of Shanghai", "Shanghai"),
    hub(35.4437, 139.6380, "Port of Yokohama", "Yokohama"),
    hub(37.4563, 126.7052, "Incheon Port", "Seoul"),
    // USA
    hub(33.7490, -118.2689, "Port of Los Angeles", "Los Angeles"),
    hub(32.7157, -117.1611, "Port of San Diego", "San Diego"),
    hub(40.6892, -74.0445, "Port of New York", "New York"),
    hub(25.7617, -80.1918, "Port of Miami", "Miami"),
    hub(29.7604, -95.3698, "Port of Houston", "Houston"),
];

/// Country names (lowercase) to ISO 3166-1 alpha-2 codes for geocoder biasing.
static COUNTRY_CODES: &[(&str, &str)] = &[
    ("india", "in"),
    ("united arab emirates", "ae"),
    ("uae", "ae"),
    ("united kingdom", "gb"),
    ("uk", "gb"),
    ("united states", "us"),
    ("usa", "us"),
    ("germany", "de"),
    ("france", "fr"),
    ("spain", "es"),
    ("italy", "it"),
    ("netherlands", "nl"),
    ("belgium", "be"),
    ("japan", "jp"),
    ("china", "cn"),
    ("singapore", "sg"),
    ("australia", "au"),
    ("saudi arabia", "sa"),
    ("qatar", "qa"),
    ("hong kong", "hk"),
    ("thailand", "th"),
    ("south korea", "kr"),
];

pub fn country_code(country: &str) -> Option<&'static str> {
    let needle = country.trim().to_lowercase();
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, code)| *code)
}

/// A human-readable place split into the parts the resolver cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceName<'a> {
    pub city: &'a str,
    pub country_code: Option<&'static str>,
}

impl<'a> PlaceName<'a> {
    /// `"City, Region, Country"` → city `"City"`, country from the last part.
    pub fn parse(name: &'a str) -> Self {
        let parts: Vec<&str> = name.split(',').map(str::trim).collect();
        let city = parts.first().copied().filter(|c| !c.is_empty()).unwrap_or("Unknown");
        let country_code = if parts.len() > 1 {
            parts.last().and_then(|country| country_code(country))
        } else {
            None
        };
        Self { city, country_code }
    }
}
