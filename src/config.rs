use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use serde::Deserialize;
use tracing::{error, info};

use diffsim_motor::{DEFAULT_MAX_VOLTAGE, DEFAULT_MAX_WHEEL_VELOCITY, DEFAULT_MOTOR_CONSTANT};
use diffsim_navigation::ControllerGains;

use crate::scenario::ScenarioConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
/// Environment overrides look like `DIFFSIM_RUNNER__REALTIME=true`.
pub const ENV_PREFIX: &str = "DIFFSIM";

/// Physical parameters of the simulated robot.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RobotParams {
    /// Wheel radius (m).
    pub wheel_radius: f64,
    /// Distance between the drive wheels (m).
    pub wheel_distance: f64,
    /// Wheel speed saturation (rad/s).
    pub max_wheel_velocity: f64,
    /// Wheel speed per volt (rad/s/V).
    pub motor_constant: f64,
    /// Voltage limit per motor (V).
    pub max_voltage: f64,
    /// Number of trail samples kept.
    pub max_trail_length: usize,
}

impl Default for RobotParams {
    fn default() -> Self {
        RobotParams {
            wheel_radius: 0.1,
            wheel_distance: 0.4,
            max_wheel_velocity: DEFAULT_MAX_WHEEL_VELOCITY,
            motor_constant: DEFAULT_MOTOR_CONSTANT,
            max_voltage: DEFAULT_MAX_VOLTAGE,
            max_trail_length: 1000,
        }
    }
}

/// Settings of the headless runner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Ticks per second; the fixed step is `1 / tick_hz`.
    pub tick_hz: f64,
    /// Simulated time after which the run stops regardless of progress.
    pub max_duration_secs: f64,
    /// Pace ticks against the wall clock and feed the measured elapsed time as dt.
    pub realtime: bool,
    /// Ticks between published snapshots.
    pub telemetry_every: u64,
    /// Longest path a scenario may request.
    pub max_waypoints: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            tick_hz: 60.0,
            max_duration_secs: 120.0,
            realtime: false,
            telemetry_every: 30,
            max_waypoints: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub robot: RobotParams,
    pub controller: ControllerGains,
    pub runner: RunnerConfig,
    pub scenario: ScenarioConfig,
}

/// Load the configuration file at `path`, then apply `DIFFSIM_*` environment overrides.
pub fn load_config(path: &str) -> Result<SimConfig, ConfigError> {
    load_config_with_env(path, None)
}

/// As [`load_config`], reading overrides from `env` instead of the process
/// environment when it is given.
pub fn load_config_with_env(
    path: &str,
    env: Option<Map<String, String>>,
) -> Result<SimConfig, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .and_then(|config| config.try_deserialize::<SimConfig>());

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Parse configuration from TOML text, without environment overrides.
pub fn parse_config(toml: &str) -> Result<SimConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
