use crate::logic::eval_constants::{
    VAL_FIVE, VAL_HALF_FOUR, VAL_HALF_ONE, VAL_HALF_THREE, VAL_HALF_TWO, VAL_OPEN_FOUR,
    VAL_OPEN_ONE, VAL_OPEN_THREE, VAL_OPEN_TWO, WIN_SCORE,
};
use crate::logic::board::MAX_BOARD_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest transposition table a request may ask for.
pub const MAX_TT_SIZE_MB: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    Negamax,
    #[default]
    NegaScout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_five: i32,
    pub val_open_four: i32,
    pub val_half_four: i32,
    pub val_open_three: i32,
    pub val_half_three: i32,
    pub val_open_two: i32,
    pub val_half_two: i32,
    pub val_open_one: i32,
    pub val_half_one: i32,

    // Search Parameters
    pub algorithm: SearchAlgorithm,
    pub max_candidates: Option<usize>, // None: search every candidate
    pub history_weight: i32,
    pub prune_remote: bool,
    pub remote_radius: usize,
    pub restriction_margin: usize,
    pub aspiration_window: i32, // 0 disables aspiration
    pub forced_win_threshold: i32,
    pub max_depth: u8,

    // Resources
    pub time_check_interval: u32,
    pub soft_time_ratio: f64,
    pub tt_size_mb: usize,
    pub eval_cache_limit: usize,
    pub zobrist_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_five: VAL_FIVE,
            val_open_four: VAL_OPEN_FOUR,
            val_half_four: VAL_HALF_FOUR,
            val_open_three: VAL_OPEN_THREE,
            val_half_three: VAL_HALF_THREE,
            val_open_two: VAL_OPEN_TWO,
            val_half_two: VAL_HALF_TWO,
            val_open_one: VAL_OPEN_ONE,
            val_half_one: VAL_HALF_ONE,

            algorithm: SearchAlgorithm::NegaScout,
            max_candidates: Some(15),
            history_weight: 10,
            prune_remote: true,
            remote_radius: 2,
            restriction_margin: 2,
            aspiration_window: 2_000,
            forced_win_threshold: WIN_SCORE - 1_000,
            max_depth: 32,

            time_check_interval: 1,
            soft_time_ratio: 0.6,
            tt_size_mb: 16,
            eval_cache_limit: 1 << 18,
            zobrist_seed: None,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_five: Option<f32>,
    val_open_four: Option<f32>,
    val_half_four: Option<f32>,
    val_open_three: Option<f32>,
    val_half_three: Option<f32>,
    val_open_two: Option<f32>,
    val_half_two: Option<f32>,
    val_open_one: Option<f32>,
    val_half_one: Option<f32>,

    algorithm: Option<SearchAlgorithm>,
    #[serde(default, deserialize_with = "deserialize_some")]
    max_candidates: Option<Option<usize>>,
    history_weight: Option<i32>,
    prune_remote: Option<bool>,
    remote_radius: Option<usize>,
    restriction_margin: Option<usize>,
    aspiration_window: Option<i32>,
    forced_win_threshold: Option<i32>,
    max_depth: Option<u8>,

    time_check_interval: Option<u32>,
    soft_time_ratio: Option<f64>,
    tt_size_mb: Option<usize>,
    eval_cache_limit: Option<usize>,
    zobrist_seed: Option<u64>,
}

// Distinguishes an explicit `null` (no truncation) from a missing key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("restriction_margin {0} exceeds {max}", max = MAX_BOARD_SIZE)]
    RestrictionMargin(usize),
    #[error("remote_radius {0} exceeds {max}", max = MAX_BOARD_SIZE)]
    RemoteRadius(usize),
    #[error("tt_size_mb {0} exceeds {max}", max = MAX_TT_SIZE_MB)]
    TableSize(usize),
    #[error("soft_time_ratio {0} must be in (0, 1]")]
    SoftTimeRatio(f64),
    #[error("forced_win_threshold {0} must be positive")]
    ForcedWinThreshold(i32),
    #[error("eval_cache_limit must be at least 1")]
    EvalCacheLimit,
}

impl EngineConfig {
    /// Rejects values the search cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restriction_margin > MAX_BOARD_SIZE {
            return Err(ConfigError::RestrictionMargin(self.restriction_margin));
        }
        if self.remote_radius > MAX_BOARD_SIZE {
            return Err(ConfigError::RemoteRadius(self.remote_radius));
        }
        if self.tt_size_mb > MAX_TT_SIZE_MB {
            return Err(ConfigError::TableSize(self.tt_size_mb));
        }
        // NaN fails both comparisons.
        if !(self.soft_time_ratio > 0.0 && self.soft_time_ratio <= 1.0) {
            return Err(ConfigError::SoftTimeRatio(self.soft_time_ratio));
        }
        if self.forced_win_threshold <= 0 {
            return Err(ConfigError::ForcedWinThreshold(self.forced_win_threshold));
        }
        if self.eval_cache_limit == 0 {
            return Err(ConfigError::EvalCacheLimit);
        }
        Ok(())
    }

    /// Loads a tuning file. Pattern values are multipliers of the defaults,
    /// every other key is taken as-is.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_five: apply_scale(default.val_five, json_config.val_five),
            val_open_four: apply_scale(default.val_open_four, json_config.val_open_four),
            val_half_four: apply_scale(default.val_half_four, json_config.val_half_four),
            val_open_three: apply_scale(default.val_open_three, json_config.val_open_three),
            val_half_three: apply_scale(default.val_half_three, json_config.val_half_three),
            val_open_two: apply_scale(default.val_open_two, json_config.val_open_two),
            val_half_two: apply_scale(default.val_half_two, json_config.val_half_two),
            val_open_one: apply_scale(default.val_open_one, json_config.val_open_one),
            val_half_one: apply_scale(default.val_half_one, json_config.val_half_one),

            algorithm: json_config.algorithm.unwrap_or(default.algorithm),
            max_candidates: json_config
                .max_candidates
                .unwrap_or(default.max_candidates),
            history_weight: json_config.history_weight.unwrap_or(default.history_weight),
            prune_remote: json_config.prune_remote.unwrap_or(default.prune_remote),
            remote_radius: json_config.remote_radius.unwrap_or(default.remote_radius),
            restriction_margin: json_config
                .restriction_margin
                .unwrap_or(default.restriction_margin),
            aspiration_window: json_config
                .aspiration_window
                .unwrap_or(default.aspiration_window),
            forced_win_threshold: json_config
                .forced_win_threshold
                .unwrap_or(default.forced_win_threshold),
            max_depth: json_config.max_depth.unwrap_or(default.max_depth),

            time_check_interval: json_config
                .time_check_interval
                .unwrap_or(default.time_check_interval),
            soft_time_ratio: json_config
                .soft_time_ratio
                .unwrap_or(default.soft_time_ratio),
            tt_size_mb: json_config.tt_size_mb.unwrap_or(default.tt_size_mb),
            eval_cache_limit: json_config
                .eval_cache_limit
                .unwrap_or(default.eval_cache_limit),
            zobrist_seed: json_config.zobrist_seed.or(default.zobrist_seed),
        })
    }

    /// Run values indexed by `[blocked_ends][length - 1]` for lengths 1..=4.
    /// Runs blocked at both ends score zero.
    pub const fn run_values(&self) -> [[i32; 4]; 3] {
        [
            [
                self.val_open_one,
                self.val_open_two,
                self.val_open_three,
                self.val_open_four,
            ],
            [
                self.val_half_one,
                self.val_half_two,
                self.val_half_three,
                self.val_half_four,
            ],
            [0; 4],
        ]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let json = "{}";
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_candidates, Some(15));
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "val_open_three": 1.5,
            "val_half_four": 0.5
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.val_open_three, (VAL_OPEN_THREE as f32 * 1.5) as i32);
        assert_eq!(config.val_half_four, 5_000);
        assert_eq!(config.val_open_four, VAL_OPEN_FOUR);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let json = "{ invalid json }";
        let result = EngineConfig::load_from_json(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_search_parameters() {
        let json = r#"{
            "algorithm": "negamax",
            "max_candidates": null,
            "history_weight": 4,
            "prune_remote": false,
            "aspiration_window": 0,
            "max_depth": 6,
            "soft_time_ratio": 0.8,
            "zobrist_seed": 42
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();

        assert_eq!(config.algorithm, SearchAlgorithm::Negamax);
        assert_eq!(config.max_candidates, None);
        assert_eq!(config.history_weight, 4);
        assert!(!config.prune_remote);
        assert_eq!(config.aspiration_window, 0);
        assert_eq!(config.max_depth, 6);
        assert!((config.soft_time_ratio - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.zobrist_seed, Some(42));
        // Untouched keys keep their defaults.
        assert_eq!(config.remote_radius, 2);
    }

    #[test]
    fn test_load_config_edge_cases() {
        let json = r#"{
            "val_open_two": 0.0,
            "val_half_three": -1.0
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();

        assert_eq!(config.val_open_two, 0);
        assert_eq!(config.val_half_three, -VAL_HALF_THREE);
    }

    #[test]
    fn test_deserialize_absolute_config() {
        let json = r#"{
            "val_open_three": 123,
            "max_candidates": 8,
            "algorithm": "negascout"
        }"#;

        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.val_open_three, 123);
        assert_eq!(config.max_candidates, Some(8));
        assert_eq!(config.algorithm, SearchAlgorithm::NegaScout);
        // Check default values
        assert_eq!(config.val_five, VAL_FIVE);
    }

    #[test]
    fn test_run_values_layout() {
        let values = EngineConfig::default().run_values();
        assert_eq!(values[0][2], VAL_OPEN_THREE);
        assert_eq!(values[1][3], VAL_HALF_FOUR);
        assert_eq!(values[2], [0; 4]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));

        let cases = [
            (
                EngineConfig {
                    restriction_margin: usize::MAX,
                    ..EngineConfig::default()
                },
                ConfigError::RestrictionMargin(usize::MAX),
            ),
            (
                EngineConfig {
                    remote_radius: MAX_BOARD_SIZE + 1,
                    ..EngineConfig::default()
                },
                ConfigError::RemoteRadius(MAX_BOARD_SIZE + 1),
            ),
            (
                EngineConfig {
                    tt_size_mb: usize::MAX,
                    ..EngineConfig::default()
                },
                ConfigError::TableSize(usize::MAX),
            ),
            (
                EngineConfig {
                    soft_time_ratio: 0.0,
                    ..EngineConfig::default()
                },
                ConfigError::SoftTimeRatio(0.0),
            ),
            (
                EngineConfig {
                    soft_time_ratio: 1.5,
                    ..EngineConfig::default()
                },
                ConfigError::SoftTimeRatio(1.5),
            ),
            (
                EngineConfig {
                    forced_win_threshold: 0,
                    ..EngineConfig::default()
                },
                ConfigError::ForcedWinThreshold(0),
            ),
            (
                EngineConfig {
                    eval_cache_limit: 0,
                    ..EngineConfig::default()
                },
                ConfigError::EvalCacheLimit,
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }

        let nan = EngineConfig {
            soft_time_ratio: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::SoftTimeRatio(_))));

        // Bounds themselves are accepted.
        let edge = EngineConfig {
            restriction_margin: MAX_BOARD_SIZE,
            remote_radius: MAX_BOARD_SIZE,
            tt_size_mb: MAX_TT_SIZE_MB,
            soft_time_ratio: 1.0,
            forced_win_threshold: 1,
            eval_cache_limit: 1,
            ..EngineConfig::default()
        };
        assert_eq!(edge.validate(), Ok(()));
    }
}
