//! Configuration models and loaders for the Lunar Transfer Calculator.

use std::fs::File;
use std::path::{Path, PathBuf};

use lunar_core::constants::{Body, EarthMoonSystem};
use serde::Deserialize;
use thiserror::Error;

/// Body configuration parsed from catalog manifests.
#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
    /// Optional override; derived from the Hill approximation when absent.
    #[serde(default)]
    pub soi_radius_km: Option<f64>,
    pub default_parking_altitude_km: f64,
}

/// Vehicle configuration parsed from catalog manifests.
#[derive(Debug, Deserialize, Clone)]
pub struct VehicleConfig {
    pub name: String,
    pub dry_mass_kg: f64,
    pub propellant_mass_kg: f64,
    pub propulsion: VehiclePropulsionConfig,
}

/// Propulsion configuration in catalog manifests.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum VehiclePropulsionConfig {
    #[serde(rename = "impulsive")]
    Impulsive {
        max_delta_v_km_s: f64,
        isp_seconds: f64,
        #[serde(default = "default_thrust_to_weight")]
        thrust_to_weight: f64,
    },
    #[serde(other)]
    Unsupported,
}

fn default_thrust_to_weight() -> f64 {
    0.8
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load body configurations from a YAML file or a directory of TOML records.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    load_records(path)
}

/// Load vehicle configurations from a YAML file or a directory of TOML records.
pub fn load_vehicle_configs<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

/// Lift an Earth and a Moon record out of a catalog into the injected
/// constants struct, keeping the default separation. Returns `None` when
/// either body is missing.
pub fn system_from_catalog(bodies: &[BodyConfig]) -> Option<EarthMoonSystem> {
    let find = |name: &str| {
        bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    };
    let earth = find("EARTH")?;
    let moon = find("MOON")?;
    let defaults = EarthMoonSystem::default();
    Some(EarthMoonSystem {
        earth: Body {
            mu_km3_s2: earth.mu_km3_s2,
            radius_km: earth.radius_km,
        },
        moon: Body {
            mu_km3_s2: moon.mu_km3_s2,
            radius_km: moon.radius_km,
        },
        separation_km: defaults.separation_km,
        leo_altitude_km: earth.default_parking_altitude_km,
        lunar_parking_altitude_km: moon.default_parking_altitude_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_body_record_parses() {
        let record: BodyConfig = toml::from_str(
            r#"
            name = "MOON"
            mu_km3_s2 = 4902.7779
            radius_km = 1737.0
            default_parking_altitude_km = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(record.name, "MOON");
        assert!(record.soi_radius_km.is_none());
    }

    #[test]
    fn unknown_propulsion_type_degrades_to_unsupported() {
        let vehicles: Vec<VehicleConfig> = serde_yaml::from_str(
            r#"
            - name: Tug
              dry_mass_kg: 4000.0
              propellant_mass_kg: 12000.0
              propulsion:
                type: warp
            "#,
        )
        .unwrap();
        assert!(matches!(
            vehicles[0].propulsion,
            VehiclePropulsionConfig::Unsupported
        ));
    }

    #[test]
    fn catalog_lifts_into_a_system() {
        let bodies = vec![
            BodyConfig {
                name: "EARTH".into(),
                mu_km3_s2: 398_600.4418,
                radius_km: 6_371.0,
                soi_radius_km: None,
                default_parking_altitude_km: 200.0,
            },
            BodyConfig {
                name: "MOON".into(),
                mu_km3_s2: 4_902.7779,
                radius_km: 1_737.0,
                soi_radius_km: None,
                default_parking_altitude_km: 100.0,
            },
        ];
        let system = system_from_catalog(&bodies).unwrap();
        assert_eq!(system, EarthMoonSystem::default());
    }

    #[test]
    fn missing_moon_yields_no_system() {
        let bodies = vec![BodyConfig {
            name: "EARTH".into(),
            mu_km3_s2: 398_600.4418,
            radius_km: 6_371.0,
            soi_radius_km: None,
            default_parking_altitude_km: 200.0,
        }];
        assert!(system_from_catalog(&bodies).is_none());
    }
}
