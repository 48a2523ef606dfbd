//! # Noise Field Module
//!
//! Seeded, deterministic noise underlying terrain generation. All sampling
//! is done in **world** coordinates, never chunk-local ones, so the field
//! is a pure function of position and adjacent chunks tile seamlessly.
//!
//! Four independently seeded value-noise sources are combined:
//!
//! * a fractal (multi-octave) 2D source for the terrain surface height,
//! * two low-frequency 2D sources for temperature and moisture (biomes),
//! * a 3D source for cave carving.

use noise::{NoiseFn, Value};

use crate::config::GeneratorConfig;

// Fixed offsets deriving each source's seed from the world seed.
const TEMPERATURE_SEED_OFFSET: u32 = 101;
const MOISTURE_SEED_OFFSET: u32 = 202;
const CAVE_SEED_OFFSET: u32 = 303;

/// Deterministic terrain noise, seeded once per world.
pub struct NoiseField {
    terrain: Value,
    temperature: Value,
    moisture: Value,
    caves: Value,
    base_height: f64,
    height_amplitude: f64,
    octaves: u32,
    frequency: f64,
    climate_frequency: f64,
    cave_frequency: f64,
    cave_vertical_squeeze: f64,
}

impl NoiseField {
    /// Creates a noise field from the world seed and the generator tunables.
    pub fn new(seed: u32, config: &GeneratorConfig) -> Self {
        NoiseField {
            terrain: Value::new(seed),
            temperature: Value::new(seed.wrapping_add(TEMPERATURE_SEED_OFFSET)),
            moisture: Value::new(seed.wrapping_add(MOISTURE_SEED_OFFSET)),
            caves: Value::new(seed.wrapping_add(CAVE_SEED_OFFSET)),
            base_height: config.base_height,
            height_amplitude: config.height_amplitude,
            octaves: config.octaves.max(1),
            frequency: config.frequency,
            climate_frequency: config.climate_frequency,
            cave_frequency: config.cave_frequency,
            cave_vertical_squeeze: config.cave_vertical_squeeze,
        }
    }

    /// Terrain surface height at a world-space column.
    ///
    /// Fractal value noise: each octave doubles the frequency and halves the
    /// amplitude of the previous one, and the sum is normalized by the total
    /// amplitude, so the result is always the base height plus at most one
    /// amplitude in either direction. Pure and total; no error conditions.
    pub fn height_at(&self, world_x: f64, world_z: f64) -> f64 {
        let mut total = 0.0;
        let mut normalization = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        for _ in 0..self.octaves {
            total += amplitude * self.terrain.get([world_x * frequency, world_z * frequency]);
            normalization += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        self.base_height + self.height_amplitude * (total / normalization)
    }

    /// Biome temperature at a world-space column, in `[-1, 1]`.
    pub fn temperature_at(&self, world_x: f64, world_z: f64) -> f64 {
        self.temperature
            .get([world_x * self.climate_frequency, world_z * self.climate_frequency])
    }

    /// Biome moisture at a world-space column, in `[-1, 1]`.
    pub fn moisture_at(&self, world_x: f64, world_z: f64) -> f64 {
        self.moisture
            .get([world_x * self.climate_frequency, world_z * self.climate_frequency])
    }

    /// Cave carving density at a world-space cell, mapped into `[0, 1]`.
    ///
    /// The vertical axis is squeezed so caves stretch into horizontal
    /// galleries rather than vertical shafts.
    pub fn cave_density_at(&self, world_x: f64, world_y: f64, world_z: f64) -> f64 {
        let sample = self.caves.get([
            world_x * self.cave_frequency,
            world_y * self.cave_frequency * self.cave_vertical_squeeze,
            world_z * self.cave_frequency,
        ]);
        (sample + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u32) -> NoiseField {
        NoiseField::new(seed, &GeneratorConfig::default())
    }

    #[test]
    fn same_seed_produces_identical_heights() {
        let a = field(7);
        let b = field(7);
        for step in -50..50 {
            let x = step as f64 * 3.7;
            let z = step as f64 * -1.3;
            assert_eq!(a.height_at(x, z), b.height_at(x, z));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = field(7);
        let b = field(8);
        let diverges = (0..100).any(|step| {
            let x = step as f64 * 5.1;
            a.height_at(x, 0.0) != b.height_at(x, 0.0)
        });
        assert!(diverges);
    }

    #[test]
    fn heights_are_finite_and_bounded() {
        let config = GeneratorConfig::default();
        let noise = NoiseField::new(99, &config);
        for step in -200..200 {
            let x = step as f64 * 2.3;
            let z = step as f64 * -4.1;
            let h = noise.height_at(x, z);
            assert!(h.is_finite());
            assert!(h >= config.base_height - config.height_amplitude);
            assert!(h <= config.base_height + config.height_amplitude);
        }
    }

    #[test]
    fn boundary_columns_agree_regardless_of_which_chunk_asks() {
        // The column at world x = 16 sits on the seam between chunks 0 and 1.
        // Both neighbors sample the same world coordinate, so the height is
        // identical no matter which side computes it.
        let noise = field(3);
        let from_west_chunk = noise.height_at(16.0, 5.0);
        let from_east_chunk = noise.height_at(0.0 + 16.0, 5.0);
        assert_eq!(from_west_chunk, from_east_chunk);
    }

    #[test]
    fn cave_density_stays_in_unit_range() {
        let noise = field(11);
        for step in 0..200 {
            let p = step as f64 * 1.7;
            let d = noise.cave_density_at(p, p * 0.3, -p);
            assert!((0.0..=1.0).contains(&d));
        }
    }
}
