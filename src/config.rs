/// Configuration: where the two datasets live on disk
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QaConfig {
    /// Crop production CSV
    pub crop_path: PathBuf,

    /// Rainfall CSV
    pub rain_path: PathBuf,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            crop_path: PathBuf::from("data/crop_production.csv"),
            rain_path: PathBuf::from("data/imd_rainfall.csv"),
        }
    }
}

impl QaConfig {
    /// The first two CLI arguments override the default paths
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        if let Some(path) = args.next() {
            config.crop_path = PathBuf::from(path);
        }
        if let Some(path) = args.next() {
            config.rain_path = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_data_directory() {
        let config = QaConfig::default();
        assert_eq!(config.crop_path, PathBuf::from("data/crop_production.csv"));
        assert_eq!(config.rain_path, PathBuf::from("data/imd_rainfall.csv"));
    }

    #[test]
    fn args_override_defaults_in_order() {
        let config = QaConfig::from_args(vec!["crop.csv".to_string()]);
        assert_eq!(config.crop_path, PathBuf::from("crop.csv"));
        assert_eq!(config.rain_path, PathBuf::from("data/imd_rainfall.csv"));
    }
}
