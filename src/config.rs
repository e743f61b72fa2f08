use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use kuratowski_core::{
    AngleState, CircleLayout, DEFAULT_SWEEP_STEPS, MAX_SWEEP_STEPS, Marker, ResetPolicy, Settings,
    YAxis,
};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// A `#rrggbb` color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn to_rgba(self) -> Srgba<f64> {
        self.0.into_format::<f64>().with_alpha(1.0)
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

pub fn default_color(marker: Marker) -> HexColor {
    match marker {
        Marker::Black => HexColor::new(0x00, 0x00, 0x00),
        Marker::Green => HexColor::new(0x00, 0xff, 0x00),
        Marker::Blue => HexColor::new(0x00, 0x00, 0xff),
        Marker::Purple => HexColor::new(0xa0, 0x20, 0xf0),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkerConfig {
    pub marker: Marker,
    pub angle: Option<f64>,
    pub color: Option<HexColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub sweep_steps: usize,
    pub reset: ResetPolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            sweep_steps: DEFAULT_SWEEP_STEPS,
            reset: ResetPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub circle_radius: f64,
    pub point_radius: f64,
    pub arc_width: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub y_axis: YAxis,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            circle_radius: 100.0,
            point_radius: 9.0,
            arc_width: 5.0,
            yaw: -60f64.to_radians(),
            pitch: 30f64.to_radians(),
            y_axis: YAxis::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub markers: Vec<MarkerConfig>,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

impl Config {
    /// Later entries for the same marker override earlier ones.
    pub fn marker_angle(&self, marker: Marker) -> Option<f64> {
        self.markers
            .iter()
            .rev()
            .filter(|m| m.marker == marker)
            .find_map(|m| m.angle)
    }

    pub fn marker_color(&self, marker: Marker) -> HexColor {
        self.markers
            .iter()
            .rev()
            .filter(|m| m.marker == marker)
            .find_map(|m| m.color)
            .unwrap_or_else(|| default_color(marker))
    }

    pub fn initial_state(&self) -> Result<AngleState, ConfigError> {
        let angles = Marker::ALL.map(|marker| {
            self.marker_angle(marker)
                .unwrap_or_else(|| marker.default_angle())
        });
        Ok(AngleState::new(angles)?)
    }

    /// Configured angles that differ from `state`, unreduced.
    pub fn angle_updates(&self, state: &AngleState) -> Vec<(Marker, f64)> {
        Marker::ALL
            .into_iter()
            .filter_map(|marker| Some((marker, self.marker_angle(marker)?)))
            .filter(|&(marker, angle)| {
                if !angle.is_finite() {
                    log::error!("Ignoring non-finite angle for {}", marker);
                    return false;
                }
                angle != state.angle(marker)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.sweep_steps > MAX_SWEEP_STEPS {
            return Err(ConfigError::SweepSteps(self.history.sweep_steps));
        }
        Ok(())
    }

    pub fn settings(&self, layout: CircleLayout) -> Settings {
        Settings {
            sweep_steps: self.history.sweep_steps,
            reset_policy: self.history.reset,
            layout,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid marker setting: {0}")]
    Marker(#[from] kuratowski_core::Error),
    #[error("history.sweep_steps = {0} is above the limit of {max}", max = MAX_SWEEP_STEPS)]
    SweepSteps(usize),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config path {} has no parent directory", .0.display())]
    NoParent(PathBuf),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "kuratowski", "kuratowski")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    // watcher events carry absolute paths
    explicit
        .map(|p| std::path::absolute(&p).unwrap_or(p))
        .map_or_else(get_config_path, Ok)
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("KURATOWSKI")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_default(path: &Path) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config from {}: {}", path.display(), e);
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Sends `ConfigReload` whenever the config file is written, created or removed.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    if let Err(e) = watch_config(&config_path, &tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch_config(config_path: &Path, tx: &Sender<AppEvent>) -> Result<(), ConfigError> {
    let dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::NoParent(config_path.to_path_buf()))?;
    fs_err::create_dir_all(dir)?;

    // notify calls back on its own thread
    let (raw_tx, raw_rx) = async_channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = raw_tx.send_blocking(res);
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {} for config changes", dir.display());

    while let Ok(res) = raw_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Watch error: {}", e);
                continue;
            }
        };
        if touches_config(&event, config_path) && tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn touches_config(event: &Event, config_path: &Path) -> bool {
    let changed = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    changed && event.paths.iter().any(|p| p == config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind};
    use std::f64::consts::FRAC_PI_2;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert!(config.markers.is_empty());
        assert_eq!(config.history, HistoryConfig::default());
        assert_eq!(config.view, ViewConfig::default());
        assert_eq!(config.initial_state().unwrap(), AngleState::default());
        assert_eq!(config.marker_color(Marker::Purple), HexColor::new(0xa0, 0x20, 0xf0));
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config = parse(DEFAULT_CONFIG);
        assert_eq!(config.markers.len(), Marker::ALL.len());
        assert_eq!(config.history.sweep_steps, DEFAULT_SWEEP_STEPS);
        assert_eq!(config.history.reset, ResetPolicy::Empty);
        assert_eq!(config.view.y_axis, YAxis::Down);
        assert!(config.validate().is_ok());
        for marker in Marker::ALL {
            assert_eq!(config.marker_color(marker), default_color(marker));
        }
        let state = config.initial_state().unwrap();
        assert!((state.angle(Marker::Green) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_marker_overrides() {
        let config = parse(
            r##"
            [[markers]]
            marker = "G"
            angle = 2.5

            [[markers]]
            marker = "3"
            color = "#123456"

            [[markers]]
            marker = "green"
            angle = 0.75

            [history]
            reset = "keep-current"
            "##,
        );

        assert_eq!(config.marker_angle(Marker::Green), Some(0.75));
        assert_eq!(config.marker_angle(Marker::Purple), None);
        assert_eq!(config.marker_color(Marker::Purple), HexColor::new(0x12, 0x34, 0x56));
        assert_eq!(config.history.reset, ResetPolicy::KeepCurrent);
        assert_eq!(config.history.sweep_steps, DEFAULT_SWEEP_STEPS);

        let settings = config.settings(CircleLayout::default());
        assert_eq!(settings.reset_policy, ResetPolicy::KeepCurrent);
    }

    #[test]
    fn test_non_finite_angle_is_rejected() {
        let config = parse(
            r#"
            [[markers]]
            marker = "blue"
            angle = nan
            "#,
        );
        assert!(matches!(
            config.initial_state(),
            Err(ConfigError::Marker(kuratowski_core::Error::InvalidAngle(_)))
        ));
    }

    #[test]
    fn test_hex_color_roundtrip_text() {
        let color: HexColor = serde_json::from_str("\"#A020F0\"").unwrap();
        assert_eq!(color, default_color(Marker::Purple));
        assert_eq!(color.to_string(), "#a020f0");
        assert!("not-a-color".parse::<HexColor>().is_err());

        let rgba = HexColor::new(255, 0, 0).to_rgba();
        assert_eq!(rgba.red, 1.0);
        assert_eq!(rgba.alpha, 1.0);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let path = PathBuf::from("/tmp/kuratowski-test.toml");
        assert_eq!(resolve_config_path(Some(path.clone())).unwrap(), path);
    }

    #[test]
    fn test_sweep_steps_above_limit_rejected() {
        let config = parse(
            r#"
            [history]
            sweep_steps = 9223372036854775807
            "#,
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SweepSteps(n)) if n == i64::MAX as usize
        ));

        let config = parse(&format!("[history]\nsweep_steps = {}", MAX_SWEEP_STEPS));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_rejects_huge_sweep() {
        let path = std::env::temp_dir()
            .join(format!("kuratowski-sweep-{}.toml", std::process::id()));
        fs_err::write(&path, "[history]\nsweep_steps = 100000000000\n").unwrap();
        let result = load_config(&path);
        fs_err::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::SweepSteps(100_000_000_000))));
    }

    #[test]
    fn test_angle_updates_keep_raw_angles() {
        let config = parse(
            r#"
            [[markers]]
            marker = "green"
            angle = 8.0

            [[markers]]
            marker = "blue"
            angle = -2.0

            [[markers]]
            marker = "purple"
            angle = 4.71238898038469
            "#,
        );
        let state = AngleState::new([0.0, 7.0, 1.0, 4.71238898038469]).unwrap();
        assert_eq!(
            config.angle_updates(&state),
            vec![(Marker::Green, 8.0), (Marker::Blue, -2.0)]
        );

        let nan = parse("[[markers]]\nmarker = \"black\"\nangle = nan");
        assert!(nan.angle_updates(&state).is_empty());
    }

    #[test]
    fn test_y_axis_from_view_section() {
        let config = parse("[view]\ny_axis = \"up\"");
        assert_eq!(config.view.y_axis, YAxis::Up);
        assert_eq!(config.view.circle_radius, ViewConfig::default().circle_radius);
    }

    #[test]
    fn test_watcher_reacts_to_config_file_only() {
        let path = PathBuf::from("/tmp/kuratowski/config.toml");
        let write = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());
        assert!(touches_config(&write, &path));

        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/kuratowski/other.toml"));
        assert!(!touches_config(&other, &path));

        let read = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());
        assert!(!touches_config(&read, &path));
    }
}
