//! Name classifier for geocoded hub candidates.
//!
//! Free-text geocoding returns plenty of places that merely contain the
//! keyword ("Airport Road", "Port View"). A candidate is accepted only if no
//! exclusion pattern matches and at least one acceptance pattern does.

use regex::Regex;
use std::sync::OnceLock;

const AIRPORT_EXCLUDE: &[&str] = &[
    r"airport\s+road",
    r"airport\s+rd",
    r"airport\s+roundabout",
    r"airport\s+street",
    r"airport\s+st",
    r"airport\s+drive",
    r"airport\s+avenue",
    r"airport\s+ave",
    r"airport\s+lane",
    r"airport\s+boulevard",
    r"airport\s+blvd",
    r"airport\s+highway",
    r"airport\s+way",
    r"airport\s+area",
];

const AIRPORT_ACCEPT: &[&str] = &[
    r"\bairport\b$",
    r"\bairport\s+arrivals?\b",
    r"\bairport\s+departures?\b",
    r"\bairport\s+terminal\b",
    r"\binternational\s+airport\b",
    r"\bdomestic\s+airport\b",
    r"\baerodrome\b",
    r"\bairfield\b",
];

const PORT_EXCLUDE: &[&str] = &[
    r"port\s+road",
    r"port\s+street",
    r"port\s+avenue",
    r"port\s+drive",
    r"port\s+lane",
    r"port\s+way",
    r"port\s+view",
    r"port\s+side",
];

const PORT_ACCEPT: &[&str] = &[
    r"\bport\b$",
    r"\bport\s+of\b",
    r"\bseaport\b",
    r"\bharbou?r\b$",
    r"\bharbou?r\s+terminal\b",
    r"\bcontainer\s+terminal\b",
    r"\bmaritime\s+terminal\b",
    r"\bwharf\b",
    r"\bdock\b",
    r"\bpier\b",
    r"\bjebel\s+ali\b",
];

/// Two-sided regex filter over a candidate's short and full names.
#[derive(Debug, Clone)]
pub struct HubNamePatterns {
    exclude: Vec<Regex>,
    accept: Vec<Regex>,
}

impl HubNamePatterns {
    pub fn from_patterns(exclude: &[&str], accept: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            exclude: compile_all(exclude)?,
            accept: compile_all(accept)?,
        })
    }

    /// Exclusions are tested against `"{name} {full_name}"`; acceptances
    /// against either name alone, so `$` anchors apply per name.
    pub fn matches(&self, name: &str, full_name: &str) -> bool {
        let name = name.to_lowercase();
        let full = full_name.to_lowercase();
        let combined = format!("{name} {full}");

        if self.exclude.iter().any(|re| re.is_match(&combined)) {
            return false;
        }
        self.accept
            .iter()
            .any(|re| re.is_match(&name) || re.is_match(&full))
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

pub fn airport_patterns() -> &'static HubNamePatterns {
    static PATTERNS: OnceLock<HubNamePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        HubNamePatterns::from_patterns(AIRPORT_EXCLUDE, AIRPORT_ACCEPT)
            .expect("built-in airport patterns are valid")
    })
}

pub fn port_patterns() -> &'static HubNamePatterns {
    static PATTERNS: OnceLock<HubNamePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        HubNamePatterns::from_patterns(PORT_EXCLUDE, PORT_ACCEPT)
            .expect("built-in port patterns are valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airport_road_is_rejected() {
        let patterns = airport_patterns();
        assert!(!patterns.matches("Airport Road", "Airport Road, Bengaluru, Karnataka, India"));
        assert!(!patterns.matches("Airport Roundabout", "Airport Roundabout, Dubai"));
    }

    #[test]
    fn real_airports_are_accepted() {
        let patterns = airport_patterns();
        assert!(patterns.matches("Heathrow Airport", "Heathrow Airport, London, United Kingdom"));
        assert!(patterns.matches(
            "Kempegowda International Airport",
            "Kempegowda International Airport, Bengaluru, India"
        ));
        assert!(patterns.matches("Biggin Hill Aerodrome", "Biggin Hill, London"));
    }

    #[test]
    fn keyword_in_the_middle_is_not_enough() {
        // "airport" neither ends the name nor is followed by a hub suffix.
        assert!(!airport_patterns().matches("Airport Hotel", "Airport Hotel, Mumbai, India"));
    }

    #[test]
    fn ports() {
        let patterns = port_patterns();
        assert!(patterns.matches("Port of Hamburg", "Port of Hamburg, Hamburg, Germany"));
        assert!(patterns.matches("Jebel Ali", "Jebel Ali, Dubai, United Arab Emirates"));
        assert!(patterns.matches("Kandla Port", "Kandla Port, Gujarat, India"));
        assert!(!patterns.matches("Port Road", "Port Road, Adelaide, Australia"));
        assert!(!patterns.matches("Port View Apartments", "Port View, Chennai, India"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(port_patterns().matches("SEAPORT", "SEAPORT"));
    }

    #[test]
    fn custom_pattern_lists() {
        let patterns = HubNamePatterns::from_patterns(&[r"bahnhofstra"], &[r"\bbahnhof\b"]).unwrap();
        assert!(patterns.matches("Hauptbahnhof", "Bahnhof Mitte, Berlin"));
        assert!(!patterns.matches("Bahnhofstraße", "Bahnhofstraße, Berlin"));
        assert!(HubNamePatterns::from_patterns(&["("], &[]).is_err());
    }
}
