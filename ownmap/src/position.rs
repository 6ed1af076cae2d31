//! Types and functions for working with positions.

/// Geographical position with longitude (x) and latitude (y), in degrees.
pub type Position = geo_types::Point;

/// Construct `Position` from latitude and longitude.
pub fn lat_lon(lat: f64, lon: f64) -> Position {
    Position::new(lon, lat)
}

/// Construct `Position` from longitude and latitude. Note that country tables usually list the
/// latitude first (e.g. France is `46.2276, 2.2137`), so double check the order.
pub fn lon_lat(lon: f64, lat: f64) -> Position {
    Position::new(lon, lat)
}

/// Location on the projected plane or on the screen, in pixels.
pub type Pixels = geo_types::Point;

pub trait PixelsExt {
    fn to_pos2(&self) -> egui::Pos2;
    fn from_pos2(_: egui::Pos2) -> Self;
}

impl PixelsExt for Pixels {
    fn to_pos2(&self) -> egui::Pos2 {
        egui::Pos2::new(self.x() as f32, self.y() as f32)
    }

    fn from_pos2(pos2: egui::Pos2) -> Self {
        Pixels::new(pos2.x as f64, pos2.y as f64)
    }
}

/// Both coordinates are present and finite, i.e. the position can be projected.
pub(crate) fn is_valid(position: Position) -> bool {
    position.x().is_finite() && position.y().is_finite()
}
