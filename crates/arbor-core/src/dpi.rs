#![forbid(unsafe_code)]

//! Conversion between device pixels and logical units.

/// Dots per inch reported by the platform for each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dpi {
    pub x: f32,
    pub y: f32,
}

impl Dpi {
    /// Density at which one logical unit equals one pixel.
    pub const STANDARD: Self = Self::uniform(96.0);

    pub const fn uniform(dpi: f32) -> Self {
        Self { x: dpi, y: dpi }
    }

    /// Logical width to whole pixels, truncating toward zero.
    #[inline]
    pub fn dip_to_pixel_x(&self, dip: f32) -> i32 {
        (dip * self.x / 96.0) as i32
    }

    /// Logical height to whole pixels, truncating toward zero.
    #[inline]
    pub fn dip_to_pixel_y(&self, dip: f32) -> i32 {
        (dip * self.y / 96.0) as i32
    }

    #[inline]
    pub fn pixel_to_dip_x(&self, pixel: i32) -> f32 {
        pixel as f32 * 96.0 / self.x
    }

    #[inline]
    pub fn pixel_to_dip_y(&self, pixel: i32) -> f32 {
        pixel as f32 * 96.0 / self.y
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::Dpi;

    #[test]
    fn standard_density_is_identity() {
        let dpi = Dpi::STANDARD;
        assert_eq!(dpi.pixel_to_dip_x(120), 120.0);
        assert_eq!(dpi.dip_to_pixel_y(33.0), 33);
    }

    #[test]
    fn high_density_scales() {
        let dpi = Dpi::uniform(192.0);
        assert_eq!(dpi.pixel_to_dip_x(200), 100.0);
        assert_eq!(dpi.pixel_to_dip_y(51), 25.5);
        assert_eq!(dpi.dip_to_pixel_x(10.0), 20);
    }

    #[test]
    fn dip_to_pixel_truncates() {
        let dpi = Dpi::uniform(144.0);
        assert_eq!(dpi.dip_to_pixel_x(3.0), 4);
    }
}
