//! Builds Google Static Maps API URLs for previewing geometry.

use crate::sdk::routing::route::Coord;

const BASE_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Accumulates shape parameters for one static-map request. Coordinates go
/// in as (longitude, latitude) pairs and come out in the lat,lon order the
/// API wants.
#[derive(Debug, Default)]
pub struct StaticMap {
    parameters: Vec<String>,
}

impl StaticMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiny markers, one per coordinate.
    pub fn add_markers(&mut self, coords: &[Coord], color: &str) {
        self.add_shape(format!("markers=color:{}|size:tiny", color), coords);
    }

    /// A stroked line through the coordinates.
    pub fn add_path(&mut self, coords: &[Coord], color: &str) {
        self.add_shape(format!("path=color:{}|weight:5", color), coords);
    }

    /// A filled polygon with an invisible stroke.
    pub fn add_polygon(&mut self, coords: &[Coord], color: &str) {
        self.add_shape(
            format!("path=color:0x00000000|fillcolor:{}|weight:5", color),
            coords,
        );
    }

    fn add_shape(&mut self, mut parameter: String, coords: &[Coord]) {
        for (lon, lat) in coords {
            parameter.push_str(&format!("|{},{}", lat, lon));
        }
        self.parameters.push(parameter);
    }

    /// The assembled request URL for a 400x400 image.
    pub fn url(&self) -> String {
        self.url_sized("400x400")
    }

    pub fn url_sized(&self, size: &str) -> String {
        let mut url = format!("{}?size={}", BASE_URL, size);
        for parameter in &self.parameters {
            url.push('&');
            url.push_str(parameter);
        }
        url
    }

    /// Clears all stored shapes.
    pub fn reset(&mut self) {
        self.parameters.clear();
    }
}
