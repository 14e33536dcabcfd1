/// Free-space speed of light in km/s.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Virtual reflection height for a round-trip delay. NaN propagates.
pub fn virtual_height_km(delay_s: f64) -> f64 {
    delay_s * (SPEED_OF_LIGHT_KM_S / 2.0)
}
