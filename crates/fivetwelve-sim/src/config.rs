use anyhow::{bail, Context, Result};
use fivetwelve_model::{GridConfig, Move};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,

    /// Tiles spawned before the first move.
    #[serde(default = "defaults::initial_tiles")]
    pub initial_tiles: usize,

    /// Stop after this many moves even if the game could continue.
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,

    /// Moves are played by cycling through this list.
    #[serde(default = "defaults::moves")]
    pub moves: Vec<Move>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            initial_tiles: defaults::initial_tiles(),
            max_moves: defaults::max_moves(),
            moves: defaults::moves(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.moves.is_empty() {
            bail!("`moves` must list at least one direction");
        }
        let Some(cells) = self.grid.rows.checked_mul(self.grid.cols) else {
            bail!(
                "a {}x{} grid has more cells than this platform can address",
                self.grid.rows,
                self.grid.cols
            );
        };
        if self.initial_tiles > cells {
            bail!(
                "initial_tiles = {} does not fit a {}x{} grid",
                self.initial_tiles,
                self.grid.rows,
                self.grid.cols
            );
        }
        Ok(())
    }
}

mod defaults {
    use fivetwelve_model::Move;

    pub fn initial_tiles() -> usize { 2 }
    pub fn max_moves() -> u64 { 1000 }
    pub fn moves() -> Vec<Move> { vec![Move::Left, Move::Up, Move::Right, Move::Down] }
}
