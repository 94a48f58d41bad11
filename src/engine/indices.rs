use crate::models::{IndexReadings, ReflectanceBands};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// EVI constants (MODIS standard coefficients)
const G: f64 = 2.5;
const C1: f64 = 6.0;
const C2: f64 = 7.5;
const L: f64 = 1.0;

/// Normalized Difference Vegetation Index from red/near-infrared
/// reflectance. Defined as 0 when both bands are zero.
pub fn ndvi(red: f64, nir: f64) -> f64 {
    let denominator = nir + red;
    if denominator == 0.0 {
        return 0.0;
    }
    (nir - red) / denominator
}

/// Enhanced Vegetation Index, correcting for soil and atmospheric noise
/// using the blue band. Defined as 0 when the denominator is zero.
pub fn evi(red: f64, nir: f64, blue: f64) -> f64 {
    let denominator = nir + C1 * red - C2 * blue + L;
    if denominator == 0.0 {
        return 0.0;
    }
    G * ((nir - red) / denominator)
}

pub(crate) fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Compute the full index quad from reflectance bands. Soil quality and
/// water stress have no direct band formula; both are derived from
/// greenness using the same shape as the synthetic estimator.
pub fn compute_from_bands(bands: ReflectanceBands) -> IndexReadings {
    let ndvi_value = ndvi(bands.red, bands.nir);
    let evi_value = evi(bands.red, bands.nir, bands.blue);

    let soil_quality = clamp_pct(40.0 + ndvi_value * 20.0);
    let water_stress = clamp_pct((60.0 - ndvi_value * 50.0).max(0.0));

    IndexReadings {
        ndvi: round4(ndvi_value),
        evi: round4(evi_value),
        soil_quality: round2(soil_quality),
        water_stress: round2(water_stress),
    }
}

/// Source of index estimates for a location when no imagery is supplied.
///
/// A real remote-sensing implementation (fetch imagery, process bands)
/// satisfies this same interface without touching callers.
pub trait IndexSource {
    fn estimate(&mut self, latitude: f64, longitude: f64) -> IndexReadings;
}

/// Synthetic estimator: deterministic latitude shape plus injected
/// randomness. Seed it for reproducible runs.
pub struct SyntheticIndexSource {
    rng: StdRng,
}

impl SyntheticIndexSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticIndexSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSource for SyntheticIndexSource {
    fn estimate(&mut self, latitude: f64, longitude: f64) -> IndexReadings {
        let lat_factor = latitude.abs() / 90.0;
        let _lon_factor = (longitude + 180.0) / 360.0;

        // NDVI typically lands in 0.2-0.8 for vegetated land
        let ndvi = 0.3 + self.rng.gen_range(0.0..0.4) + lat_factor * 0.2;
        let evi = ndvi * 0.8 + self.rng.gen_range(0.0..0.1);
        let soil_quality = clamp_pct(40.0 + self.rng.gen_range(0.0..40.0) + ndvi * 20.0);
        let water_stress =
            clamp_pct((60.0 - ndvi * 50.0 + self.rng.gen_range(0.0..20.0)).max(0.0));

        IndexReadings {
            ndvi: round4(ndvi),
            evi: round4(evi),
            soil_quality: round2(soil_quality),
            water_stress: round2(water_stress),
        }
    }
}
