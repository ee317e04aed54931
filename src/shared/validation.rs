use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for the location field written by a map click: "<lat>, <lng>"
    /// - Valid: "19.07600, 72.87770", "-6.2,106.8", " 10 , 20 "
    /// - Invalid: "", "19.07", "abc, def", "10; 20"
    pub static ref LOCATION_REGEX: Regex =
        Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*,\s*([+-]?\d+(?:\.\d+)?)\s*$").unwrap();
}

/// Parse a "lat, lng" location string into coordinates
pub fn parse_location(input: &str) -> Option<(f64, f64)> {
    let captures = LOCATION_REGEX.captures(input)?;
    let lat = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let lng = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some((lat, lng))
}

/// Format coordinates the way a map click fills the location field
pub fn format_location(lat: f64, lng: f64, precision: usize) -> String {
    format!("{:.*}, {:.*}", precision, lat, precision, lng)
}
