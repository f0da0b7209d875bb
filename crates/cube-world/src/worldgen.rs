use cube_blocks::BlockKind;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub mode: WorldGenMode,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub caves: Caves,
    #[serde(default)]
    pub entrances: Entrances,
    #[serde(default)]
    pub sinkholes: Sinkholes,
    #[serde(default)]
    pub tunnels: Tunnels,
    #[serde(default)]
    pub surface: Surface,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            mode: WorldGenMode::Normal,
            height: Height::default(),
            caves: Caves::default(),
            entrances: Entrances::default(),
            sinkholes: Sinkholes::default(),
            tunnels: Tunnels::default(),
            surface: Surface::default(),
        }
    }
}

fn default_seed() -> i32 {
    42
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorldGenMode {
    #[default]
    Normal,
    /// Layered test landscape: stone, dirt, one grass layer at y=5.
    Flat,
}

/// Octave controls shared by every noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct Fractal {
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
}
impl Default for Fractal {
    fn default() -> Self {
        Self {
            scale: default_cave_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_octaves() -> u32 {
    2
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_scale")]
    pub scale: f32,
    #[serde(default = "default_height_octaves")]
    pub octaves: u32,
    #[serde(default = "default_height_persistence")]
    pub persistence: f32,
    #[serde(default = "default_height_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
}
fn default_height_scale() -> f32 {
    0.008
}
fn default_height_octaves() -> u32 {
    5
}
fn default_height_persistence() -> f32 {
    0.45
}
fn default_height_lacunarity() -> f32 {
    2.2
}
fn default_min_height() -> i32 {
    5
}
fn default_max_height() -> i32 {
    100
}
impl Default for Height {
    fn default() -> Self {
        Self {
            scale: default_height_scale(),
            octaves: default_height_octaves(),
            persistence: default_height_persistence(),
            lacunarity: default_height_lacunarity(),
            min_height: default_min_height(),
            max_height: default_max_height(),
        }
    }
}

impl Height {
    pub fn fractal(&self) -> Fractal {
        Fractal {
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

/// Deep interior caves from the averaged 3D noise approximation.
#[derive(Clone, Debug, Deserialize)]
pub struct Caves {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_cave_scale")]
    pub scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_cave_threshold")]
    pub threshold: f32,
    /// No carving at or below this world Y.
    #[serde(default = "default_cave_min_y")]
    pub min_y: i32,
    #[serde(default = "default_cave_min_depth")]
    pub min_depth: i32,
}
fn default_cave_scale() -> f32 {
    0.035
}
fn default_cave_threshold() -> f32 {
    0.58
}
fn default_cave_min_y() -> i32 {
    3
}
fn default_cave_min_depth() -> i32 {
    2
}
impl Default for Caves {
    fn default() -> Self {
        Self {
            enable: true,
            scale: default_cave_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            threshold: default_cave_threshold(),
            min_y: default_cave_min_y(),
            min_depth: default_cave_min_depth(),
        }
    }
}

/// Cave mouths cut into steep hillsides near the surface.
#[derive(Clone, Debug, Deserialize)]
pub struct Entrances {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_entrance_scale")]
    pub scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_entrance_threshold")]
    pub threshold: f32,
    #[serde(default = "default_entrance_min_slope")]
    pub min_slope: i32,
    #[serde(default = "default_entrance_max_depth")]
    pub max_depth: i32,
}
fn default_entrance_scale() -> f32 {
    0.06
}
fn default_entrance_threshold() -> f32 {
    0.56
}
fn default_entrance_min_slope() -> i32 {
    3
}
fn default_entrance_max_depth() -> i32 {
    6
}
impl Default for Entrances {
    fn default() -> Self {
        Self {
            enable: true,
            scale: default_entrance_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            threshold: default_entrance_threshold(),
            min_slope: default_entrance_min_slope(),
            max_depth: default_entrance_max_depth(),
        }
    }
}

/// Vertical shafts opened by a 2D column noise within a shallow band.
#[derive(Clone, Debug, Deserialize)]
pub struct Sinkholes {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_sinkhole_scale")]
    pub scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_sinkhole_threshold")]
    pub threshold: f32,
    #[serde(default = "default_sinkhole_max_depth")]
    pub max_depth: i32,
}
fn default_sinkhole_scale() -> f32 {
    0.02
}
fn default_sinkhole_threshold() -> f32 {
    0.74
}
fn default_sinkhole_max_depth() -> i32 {
    8
}
impl Default for Sinkholes {
    fn default() -> Self {
        Self {
            enable: true,
            scale: default_sinkhole_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            threshold: default_sinkhole_threshold(),
            max_depth: default_sinkhole_max_depth(),
        }
    }
}

/// Horizontal tunnels confined to periodic world-Y bands.
#[derive(Clone, Debug, Deserialize)]
pub struct Tunnels {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_tunnel_scale")]
    pub scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_tunnel_threshold")]
    pub threshold: f32,
    #[serde(default = "default_band_period")]
    pub band_period: i32,
    #[serde(default = "default_band_thickness")]
    pub band_thickness: i32,
}
fn default_tunnel_scale() -> f32 {
    0.045
}
fn default_tunnel_threshold() -> f32 {
    0.6
}
fn default_band_period() -> i32 {
    24
}
fn default_band_thickness() -> i32 {
    3
}
impl Default for Tunnels {
    fn default() -> Self {
        Self {
            enable: true,
            scale: default_tunnel_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            threshold: default_tunnel_threshold(),
            band_period: default_band_period(),
            band_thickness: default_band_thickness(),
        }
    }
}

impl Caves {
    pub fn fractal(&self) -> Fractal {
        Fractal {
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

impl Entrances {
    pub fn fractal(&self) -> Fractal {
        Fractal {
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

impl Sinkholes {
    pub fn fractal(&self) -> Fractal {
        Fractal {
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

impl Tunnels {
    pub fn fractal(&self) -> Fractal {
        Fractal {
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_top")]
    pub top: BlockKind,
    #[serde(default = "default_subsoil")]
    pub subsoil: BlockKind,
    #[serde(default = "default_deep")]
    pub deep: BlockKind,
    #[serde(default = "default_bedrock")]
    pub bedrock: BlockKind,
    #[serde(default = "default_topsoil_depth")]
    pub topsoil_depth: i32,
    #[serde(default = "default_bedrock_y")]
    pub bedrock_y: i32,
}
fn default_top() -> BlockKind {
    BlockKind::Grass
}
fn default_subsoil() -> BlockKind {
    BlockKind::Dirt
}
fn default_deep() -> BlockKind {
    BlockKind::Stone
}
fn default_bedrock() -> BlockKind {
    BlockKind::Stone
}
fn default_topsoil_depth() -> i32 {
    4
}
fn default_bedrock_y() -> i32 {
    1
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            top: default_top(),
            subsoil: default_subsoil(),
            deep: default_deep(),
            bedrock: default_bedrock(),
            topsoil_depth: default_topsoil_depth(),
            bedrock_y: default_bedrock_y(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.height.min_height > self.height.max_height {
            return Err(format!(
                "height.min_height ({}) exceeds height.max_height ({})",
                self.height.min_height, self.height.max_height
            )
            .into());
        }
        let fields = [
            ("height", self.height.fractal()),
            ("caves", self.caves.fractal()),
            ("entrances", self.entrances.fractal()),
            ("sinkholes", self.sinkholes.fractal()),
            ("tunnels", self.tunnels.fractal()),
        ];
        for (name, f) in fields {
            if f.octaves == 0 {
                return Err(format!("{name}.octaves must be at least 1").into());
            }
            if !(f.scale.is_finite() && f.scale > 0.0) {
                return Err(format!("{name}.scale must be positive, got {}", f.scale).into());
            }
        }
        if self.tunnels.band_period <= 0 {
            return Err(format!(
                "tunnels.band_period must be positive, got {}",
                self.tunnels.band_period
            )
            .into());
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldGenConfig::from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = WorldGenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.mode, WorldGenMode::Normal);
        assert_eq!(cfg.height.octaves, 5);
        assert_eq!(cfg.caves.threshold, 0.58);
        assert_eq!(cfg.surface.top, BlockKind::Grass);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            seed = 7
            mode = "flat"
            [caves]
            threshold = 0.7
            octaves = 3
            [surface]
            top = "snow"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.mode, WorldGenMode::Flat);
        assert_eq!(cfg.caves.threshold, 0.7);
        assert_eq!(cfg.caves.octaves, 3);
        assert_eq!(cfg.caves.scale, 0.035);
        assert_eq!(cfg.caves.min_y, 3);
        assert_eq!(cfg.surface.top, BlockKind::Snow);
        assert_eq!(cfg.surface.subsoil, BlockKind::Dirt);
    }

    #[test]
    fn present_sections_fall_back_to_their_own_defaults() {
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            [entrances]
            threshold = 0.5
            [sinkholes]
            max_depth = 4
            [tunnels]
            band_thickness = 2
        "#,
        )
        .unwrap();
        let d = WorldGenConfig::default();
        assert_eq!(cfg.entrances.threshold, 0.5);
        assert_eq!(cfg.entrances.fractal(), d.entrances.fractal());
        assert_eq!(cfg.entrances.min_slope, d.entrances.min_slope);
        assert_eq!(cfg.entrances.max_depth, d.entrances.max_depth);
        assert!(cfg.entrances.enable);
        assert_eq!(cfg.sinkholes.max_depth, 4);
        assert_eq!(cfg.sinkholes.fractal(), d.sinkholes.fractal());
        assert_eq!(cfg.sinkholes.threshold, d.sinkholes.threshold);
        assert_eq!(cfg.tunnels.band_thickness, 2);
        assert_eq!(cfg.tunnels.fractal(), d.tunnels.fractal());
        assert_eq!(cfg.tunnels.threshold, d.tunnels.threshold);
        assert_eq!(cfg.tunnels.band_period, d.tunnels.band_period);
        assert_eq!(cfg.entrances.scale, 0.06);
        assert_eq!(cfg.sinkholes.scale, 0.02);
        assert_eq!(cfg.tunnels.scale, 0.045);
    }

    #[test]
    fn inverted_height_range_is_rejected() {
        let err = WorldGenConfig::from_toml_str("[height]\nmin_height = 50\nmax_height = 10")
            .unwrap_err();
        assert!(err.to_string().contains("min_height"));
    }

    #[test]
    fn zero_octaves_is_rejected() {
        assert!(WorldGenConfig::from_toml_str("[tunnels]\noctaves = 0").is_err());
    }
}
