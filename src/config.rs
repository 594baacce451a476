use anyhow::{Context, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{ColorProfile, HsvRange};

/// One HSV band as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSpec {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

/// A color profile as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,
    pub ranges: Vec<RangeSpec>,
    /// Display color, RGB
    pub color: [u8; 3],
}

impl ProfileSpec {
    pub fn to_profile(&self, trail_capacity: usize) -> ColorProfile {
        ColorProfile::new(
            self.name.clone(),
            self.ranges
                .iter()
                .map(|r| HsvRange::new(r.lower, r.upper))
                .collect(),
            Rgb(self.color),
            trail_capacity,
        )
    }

    fn from_profile(profile: &ColorProfile) -> Self {
        Self {
            name: profile.name.clone(),
            ranges: profile
                .ranges
                .iter()
                .map(|r| RangeSpec { lower: r.lower, upper: r.upper })
                .collect(),
            color: profile.display_color.0,
        }
    }
}

/// Tunable detector parameters, loadable from JSON. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub red: ProfileSpec,
    pub yellow: ProfileSpec,

    /// Contours smaller than this (px²) are ignored
    pub min_area: f64,
    pub proximity_threshold: f64,
    pub collision_threshold: f64,
    pub trail_capacity: usize,

    /// Bilateral filter window diameter
    pub smoothing_diameter: u32,
    pub smoothing_sigma_color: f32,
    pub smoothing_sigma_space: f32,

    /// Radius of the disk used for mask closing/opening (11x11 ellipse ~ 5)
    pub morphology_radius: u8,
    pub close_iterations: usize,
    pub open_iterations: usize,

    pub face_scale_factor: f64,
    pub face_min_neighbors: i32,
    pub face_min_size: i32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            red: ProfileSpec::from_profile(&ColorProfile::red(0)),
            yellow: ProfileSpec::from_profile(&ColorProfile::yellow(0)),

            min_area: 500.0,
            proximity_threshold: 80.0,
            collision_threshold: 5.0,
            trail_capacity: 20,

            smoothing_diameter: 5,
            smoothing_sigma_color: 50.0,
            smoothing_sigma_space: 50.0,

            morphology_radius: 5,
            close_iterations: 2,
            open_iterations: 1,

            face_scale_factor: 1.2,
            face_min_neighbors: 5,
            face_min_size: 40,
        }
    }
}

impl DetectorConfig {
    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        tracing::info!("Loaded detector config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for spec in [&self.red, &self.yellow] {
            if spec.ranges.is_empty() {
                anyhow::bail!("Profile '{}' has no HSV ranges", spec.name);
            }
            for r in &spec.ranges {
                if r.lower[0] > 180 || r.upper[0] > 180 {
                    anyhow::bail!("Profile '{}' has a hue outside 0..=180", spec.name);
                }
            }
        }
        if self.collision_threshold > self.proximity_threshold {
            anyhow::bail!(
                "collision_threshold ({}) must not exceed proximity_threshold ({})",
                self.collision_threshold,
                self.proximity_threshold
            );
        }
        Ok(())
    }
}
