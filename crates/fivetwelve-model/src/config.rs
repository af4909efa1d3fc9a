//! Construction parameters for a [`Grid`](crate::engine::Grid).
//!
//! ```toml
//! rows = 4
//! cols = 4
//! seed = 42   # optional; omit for an entropy-seeded generator
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "defaults::rows")]
    pub rows: usize,
    #[serde(default = "defaults::cols")]
    pub cols: usize,
    /// Seed for the spawn generator. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            cols: defaults::cols(),
            seed: None,
        }
    }
}

impl GridConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

mod defaults {
    use crate::engine::DEFAULT_SIZE;

    pub fn rows() -> usize { DEFAULT_SIZE }
    pub fn cols() -> usize { DEFAULT_SIZE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Grid;
    use crate::error::ModelError;

    #[test]
    fn it_defaults_to_square_grid() {
        let cfg = GridConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GridConfig::default());
        assert_eq!((cfg.rows, cfg.cols, cfg.seed), (4, 4, None));
    }

    #[test]
    fn it_parses_all_fields() {
        let cfg = GridConfig::from_toml_str("rows = 3\ncols = 5\nseed = 42\n").unwrap();
        assert_eq!(
            cfg,
            GridConfig {
                rows: 3,
                cols: 5,
                seed: Some(42)
            }
        );
        let grid = Grid::from_config(&cfg).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 5));
    }

    #[test]
    fn it_rejects_bad_toml() {
        assert!(matches!(
            GridConfig::from_toml_str("rows = \"four\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn it_reports_missing_file() {
        let err = GridConfig::from_toml("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn it_refuses_degenerate_dimensions() {
        let cfg = GridConfig {
            rows: 0,
            cols: 4,
            seed: None,
        };
        assert_eq!(
            Grid::from_config(&cfg).unwrap_err(),
            ModelError::EmptyGrid { rows: 0, cols: 4 }
        );
    }

    #[test]
    fn it_seeds_reproducibly() {
        let cfg = GridConfig {
            seed: Some(1234),
            ..GridConfig::default()
        };
        let mut a = Grid::from_config(&cfg).unwrap();
        let mut b = Grid::from_config(&cfg).unwrap();
        for _ in 0..5 {
            assert_eq!(a.spawn(None).unwrap(), b.spawn(None).unwrap());
        }
    }
}
