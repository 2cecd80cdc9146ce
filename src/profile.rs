//! # Category Profiles
//!
//! Static reference data for the ten storm categories: per-dimension
//! `(mean, stddev)` pairs used by the base-rate likelihood, plus the advice
//! string shown next to each category.
//!
//! The table is built once on first access and never mutated, so it can be
//! shared freely between concurrent classification calls.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the ten fixed storm categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Mild Hurricane")]
    MildHurricane,
    #[serde(rename = "Moderate Hurricane")]
    ModerateHurricane,
    #[serde(rename = "Severe Hurricane")]
    SevereHurricane,
    #[serde(rename = "Mild Thunderstorm")]
    MildThunderstorm,
    #[serde(rename = "Moderate Thunderstorm")]
    ModerateThunderstorm,
    #[serde(rename = "Severe Thunderstorm")]
    SevereThunderstorm,
    #[serde(rename = "Mild Winter Storm")]
    MildWinterStorm,
    #[serde(rename = "Moderate Winter Storm")]
    ModerateWinterStorm,
    #[serde(rename = "Severe Winter Storm")]
    SevereWinterStorm,
    Calm,
}

impl Category {
    /// All categories in table order.
    pub const ALL: [Category; 10] = [
        Category::MildHurricane,
        Category::ModerateHurricane,
        Category::SevereHurricane,
        Category::MildThunderstorm,
        Category::ModerateThunderstorm,
        Category::SevereThunderstorm,
        Category::MildWinterStorm,
        Category::ModerateWinterStorm,
        Category::SevereWinterStorm,
        Category::Calm,
    ];

    /// Human-readable name, e.g. "Severe Hurricane".
    pub fn name(self) -> &'static str {
        match self {
            Category::MildHurricane => "Mild Hurricane",
            Category::ModerateHurricane => "Moderate Hurricane",
            Category::SevereHurricane => "Severe Hurricane",
            Category::MildThunderstorm => "Mild Thunderstorm",
            Category::ModerateThunderstorm => "Moderate Thunderstorm",
            Category::SevereThunderstorm => "Severe Thunderstorm",
            Category::MildWinterStorm => "Mild Winter Storm",
            Category::ModerateWinterStorm => "Moderate Winter Storm",
            Category::SevereWinterStorm => "Severe Winter Storm",
            Category::Calm => "Calm",
        }
    }

    /// Safety advice attached to this category.
    pub fn advice(self) -> &'static str {
        match self {
            Category::MildHurricane => "Prepare for strong winds and possible flooding.",
            Category::ModerateHurricane => "Expect severe damage to infrastructure.",
            Category::SevereHurricane => "Evacuate immediately if in the storm's path.",
            Category::MildThunderstorm => "Stay indoors and avoid open areas.",
            Category::ModerateThunderstorm => "Be cautious of lightning and heavy rain.",
            Category::SevereThunderstorm => "Seek shelter immediately and avoid travel.",
            Category::MildWinterStorm => "Dress warmly and avoid icy roads.",
            Category::ModerateWinterStorm => {
                "Expect significant snowfall and dangerous conditions."
            }
            Category::SevereWinterStorm => "Avoid travel; power outages likely.",
            Category::Calm => "No action needed.",
        }
    }

    /// Reference profile for this category.
    pub fn profile(self) -> &'static CategoryProfile {
        // PROFILES is built from Category::ALL, so every variant is present.
        &PROFILES[self as usize].1
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean and standard deviation for one observed dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub mean: f64,
    pub stddev: f64,
}

impl DimensionStats {
    pub const fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }
}

/// Per-dimension reference statistics for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// mph
    pub wind_speed: DimensionStats,
    /// hPa
    pub pressure: DimensionStats,
    /// °C
    pub temperature: DimensionStats,
    /// %
    pub humidity: DimensionStats,
}

const fn p(
    wind: (f64, f64),
    pressure: (f64, f64),
    temperature: (f64, f64),
    humidity: (f64, f64),
) -> CategoryProfile {
    CategoryProfile {
        wind_speed: DimensionStats::new(wind.0, wind.1),
        pressure: DimensionStats::new(pressure.0, pressure.1),
        temperature: DimensionStats::new(temperature.0, temperature.1),
        humidity: DimensionStats::new(humidity.0, humidity.1),
    }
}

/// The profile table, indexed in `Category::ALL` order.
pub static PROFILES: Lazy<Vec<(Category, CategoryProfile)>> = Lazy::new(|| {
    Category::ALL
        .iter()
        .map(|&c| {
            let prof = match c {
                Category::MildHurricane => p((85.0, 5.0), (970.0, 10.0), (25.0, 5.0), (80.0, 10.0)),
                Category::ModerateHurricane => {
                    p((103.0, 5.0), (960.0, 10.0), (25.0, 5.0), (85.0, 10.0))
                }
                Category::SevereHurricane => {
                    p((120.0, 10.0), (940.0, 10.0), (25.0, 5.0), (90.0, 10.0))
                }
                Category::MildThunderstorm => {
                    p((60.0, 10.0), (1000.0, 10.0), (25.0, 5.0), (70.0, 10.0))
                }
                Category::ModerateThunderstorm => {
                    p((50.0, 10.0), (990.0, 10.0), (25.0, 5.0), (75.0, 10.0))
                }
                Category::SevereThunderstorm => {
                    p((70.0, 10.0), (980.0, 10.0), (25.0, 5.0), (80.0, 10.0))
                }
                Category::MildWinterStorm => {
                    p((50.0, 10.0), (990.0, 10.0), (-5.0, 5.0), (60.0, 10.0))
                }
                Category::ModerateWinterStorm => {
                    p((70.0, 10.0), (970.0, 10.0), (-10.0, 5.0), (65.0, 10.0))
                }
                Category::SevereWinterStorm => {
                    p((90.0, 10.0), (950.0, 10.0), (-15.0, 5.0), (70.0, 10.0))
                }
                Category::Calm => p((20.0, 10.0), (1010.0, 10.0), (20.0, 5.0), (50.0, 10.0)),
            };
            (c, prof)
        })
        .collect()
});

/// Pure lookup into the profile table.
pub fn profile(category: Category) -> &'static CategoryProfile {
    category.profile()
}
