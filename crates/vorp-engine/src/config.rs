// Configuration loading and parsing (league.toml, strategy.toml).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::strategy::{RoundStrategy, RoundStrategyTable};
use crate::error::VorpError;
use crate::player::{Position, SUPPORTED_POSITIONS};
use crate::valuation::tiers::TierTable;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config at {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("{origin} is not a valid config document: {source}")]
    ParseError {
        origin: ConfigSource,
        source: toml::de::Error,
    },

    #[error("invalid `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

impl From<VorpError> for ConfigError {
    fn from(err: VorpError) -> Self {
        match err {
            VorpError::InvalidConfiguration { field, message } => {
                ConfigError::ValidationError { field, message }
            }
            other => ConfigError::ValidationError {
                field: "config".into(),
                message: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
}

impl Config {
    /// Build a config from an in-memory league with default strategy settings.
    pub fn with_league(league: LeagueConfig) -> Self {
        Config {
            league,
            strategy: StrategyConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

/// League size and per-team starting requirements.
///
/// Counts are signed so that a negative value in a config file reaches
/// validation (and a named error) instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    #[serde(default)]
    pub name: String,
    pub num_teams: i64,
    /// Position code -> starters per team. Keys outside QB/RB/WR/TE (FLEX,
    /// K, BE, ...) are accepted and ignored.
    pub starting_lineup: HashMap<String, i64>,
}

impl LeagueConfig {
    /// A standard one-QB lineup: QB 1, RB 2, WR 2, TE 1.
    pub fn standard(num_teams: i64) -> Self {
        let mut starting_lineup = HashMap::new();
        starting_lineup.insert("QB".into(), 1);
        starting_lineup.insert("RB".into(), 2);
        starting_lineup.insert("WR".into(), 2);
        starting_lineup.insert("TE".into(), 1);
        LeagueConfig {
            name: format!("{num_teams}-team standard"),
            num_teams,
            starting_lineup,
        }
    }

    /// Check the invariants every computation relies on: positive team
    /// count, every supported position present exactly once, no negative
    /// counts anywhere in the lineup.
    pub fn validate(&self) -> Result<(), VorpError> {
        if self.num_teams <= 0 {
            return Err(VorpError::invalid(
                "league.num_teams",
                format!("must be greater than 0, got {}", self.num_teams),
            ));
        }

        let mut keys: Vec<&String> = self.starting_lineup.keys().collect();
        keys.sort();
        for key in keys {
            let count = self.starting_lineup[key];
            if count < 0 {
                return Err(VorpError::invalid(
                    format!("league.starting_lineup.{key}"),
                    format!("must be >= 0, got {count}"),
                ));
            }
        }

        for &pos in SUPPORTED_POSITIONS {
            let matching = self
                .starting_lineup
                .keys()
                .filter(|k| Position::from_str_pos(k) == Some(pos))
                .count();
            match matching {
                0 => {
                    return Err(VorpError::invalid(
                        format!("league.starting_lineup.{pos}"),
                        "every supported position needs a starter count",
                    ))
                }
                1 => {}
                _ => {
                    return Err(VorpError::invalid(
                        format!("league.starting_lineup.{pos}"),
                        "position listed more than once",
                    ))
                }
            }

            let per_team = self
                .starting_lineup
                .iter()
                .find(|(k, _)| Position::from_str_pos(k) == Some(pos))
                .map_or(0, |(_, &count)| count);
            let fits = per_team
                .checked_mul(self.num_teams)
                .and_then(|total| usize::try_from(total).ok())
                .is_some();
            if !fits {
                return Err(VorpError::invalid(
                    "league.num_teams",
                    format!(
                        "{per_team} {pos} starters across {} teams overflows the starter count",
                        self.num_teams
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Number of teams as a count. Only meaningful after `validate()`.
    pub fn team_count(&self) -> usize {
        usize::try_from(self.num_teams).unwrap_or(0)
    }

    /// Starters per team at `pos`; 0 when absent or negative.
    pub fn starters_per_team(&self, pos: Position) -> usize {
        self.starting_lineup
            .iter()
            .find(|(k, _)| Position::from_str_pos(k) == Some(pos))
            .and_then(|(_, &count)| usize::try_from(count).ok())
            .unwrap_or(0)
    }

    /// League-wide starters at `pos` (the replacement rank cutoff).
    /// Saturates; `validate()` rejects leagues where it would.
    pub fn league_starters(&self, pos: Position) -> usize {
        self.starters_per_team(pos).saturating_mul(self.team_count())
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    recommendations: RecommendationConfig,
    scoring: ScoringConfig,
    vorp_tiers: TierTable,
    adp_tiers: TierTable,
    round_strategy: Vec<RoundStrategy>,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub recommendations: RecommendationConfig,
    pub scoring: ScoringConfig,
    /// Per-player VORP tier labels.
    pub vorp_tiers: TierTable,
    /// `vorp_adp_value` tier labels.
    pub adp_tiers: TierTable,
    pub round_strategy: RoundStrategyTable,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            recommendations: RecommendationConfig::default(),
            scoring: ScoringConfig::default(),
            vorp_tiers: TierTable::vorp_default(),
            adp_tiers: TierTable::adp_default(),
            round_strategy: RoundStrategyTable::standard(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Length of the best-available shortlist.
    pub top_n_targets: usize,
    /// Length of each per-position shortlist.
    pub positional_targets: usize,
    /// Sleepers must clear this VORP (strictly).
    pub sleeper_min_vorp: f64,
    /// Sleepers must clear this `vorp_adp_value` (strictly).
    pub sleeper_min_value: i64,
    pub sleeper_limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        RecommendationConfig {
            top_n_targets: 5,
            positional_targets: 5,
            sleeper_min_vorp: 10.0,
            sleeper_min_value: 15,
            sleeper_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Games used for `vorp_per_game` when a row has no games estimate.
    pub season_games: f64,
    /// Fail scoring on positions outside QB/RB/WR/TE instead of passing
    /// them through with a zero baseline.
    #[serde(default)]
    pub reject_unknown_positions: bool,
    /// Position code -> multiplier for `vorp_scarcity_adjusted`.
    #[serde(default)]
    pub scarcity_multipliers: HashMap<String, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut scarcity_multipliers = HashMap::new();
        scarcity_multipliers.insert("QB".into(), 0.8);
        scarcity_multipliers.insert("RB".into(), 1.3);
        scarcity_multipliers.insert("WR".into(), 1.1);
        scarcity_multipliers.insert("TE".into(), 1.2);
        ScoringConfig {
            season_games: 17.0,
            reject_unknown_positions: false,
            scarcity_multipliers,
        }
    }
}

impl ScoringConfig {
    /// Multiplier for a supported position; 1.0 when not configured.
    ///
    /// Validation allows one key per position. Should several spellings
    /// slip through anyway, the lexically smallest key wins.
    pub fn scarcity_multiplier(&self, pos: Position) -> f64 {
        self.scarcity_multipliers
            .iter()
            .filter(|(k, _)| Position::from_str_pos(k) == Some(pos))
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, &m)| m)
            .unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// league.toml as shipped with the crate.
pub const DEFAULT_LEAGUE_TOML: &str = include_str!("../defaults/league.toml");

/// strategy.toml as shipped with the crate.
pub const DEFAULT_STRATEGY_TOML: &str = include_str!("../defaults/strategy.toml");

const LEAGUE_FILE: &str = "league.toml";
const STRATEGY_FILE: &str = "strategy.toml";

/// Where a config document came from. Carried by parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// One of the documents compiled into the library.
    Builtin(&'static str),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Builtin(name) => write!(f, "built-in {name}"),
        }
    }
}

impl Config {
    /// The shipped defaults: a 12-team one-QB league and the default
    /// strategy document.
    pub fn builtin() -> Result<Config, ConfigError> {
        parse_config(
            (DEFAULT_LEAGUE_TOML, ConfigSource::Builtin(LEAGUE_FILE)),
            (DEFAULT_STRATEGY_TOML, ConfigSource::Builtin(STRATEGY_FILE)),
        )
    }
}

/// Load and validate `league.toml` and `strategy.toml` from `config_dir`.
///
/// Either file may be absent, in which case the built-in document is used
/// for that half. The directory itself must exist.
pub fn load_config_from(config_dir: &Path) -> Result<Config, ConfigError> {
    if !config_dir.is_dir() {
        return Err(ConfigError::FileNotFound {
            path: config_dir.to_path_buf(),
        });
    }

    let league = read_or_builtin(config_dir, LEAGUE_FILE, DEFAULT_LEAGUE_TOML)?;
    let strategy = read_or_builtin(config_dir, STRATEGY_FILE, DEFAULT_STRATEGY_TOML)?;
    let config = parse_config(
        (league.0.as_str(), league.1),
        (strategy.0.as_str(), strategy.1),
    )?;

    tracing::info!(
        "config loaded from {}: league={:?}, {} teams",
        config_dir.display(),
        config.league.name,
        config.league.num_teams
    );

    Ok(config)
}

/// Load and validate exactly the two given files. No built-in fallback.
pub fn load_config_files(league_path: &Path, strategy_path: &Path) -> Result<Config, ConfigError> {
    let league_text = read_file(league_path)?;
    let strategy_text = read_file(strategy_path)?;
    parse_config(
        (&league_text, ConfigSource::File(league_path.to_path_buf())),
        (&strategy_text, ConfigSource::File(strategy_path.to_path_buf())),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_config(
    (league_text, league_origin): (&str, ConfigSource),
    (strategy_text, strategy_origin): (&str, ConfigSource),
) -> Result<Config, ConfigError> {
    let league_file: LeagueFile =
        toml::from_str(league_text).map_err(|e| ConfigError::ParseError {
            origin: league_origin,
            source: e,
        })?;

    let strategy_file: StrategyFile =
        toml::from_str(strategy_text).map_err(|e| ConfigError::ParseError {
            origin: strategy_origin,
            source: e,
        })?;

    let strategy = StrategyConfig {
        recommendations: strategy_file.recommendations,
        scoring: strategy_file.scoring,
        vorp_tiers: strategy_file.vorp_tiers,
        adp_tiers: strategy_file.adp_tiers,
        round_strategy: RoundStrategyTable::new(strategy_file.round_strategy)?,
    };

    let config = Config {
        league: league_file.league,
        strategy,
    };

    validate(&config)?;
    Ok(config)
}

fn read_or_builtin(
    dir: &Path,
    file_name: &'static str,
    builtin: &'static str,
) -> Result<(String, ConfigSource), ConfigError> {
    let path = dir.join(file_name);
    if path.is_file() {
        let text = read_file(&path)?;
        Ok((text, ConfigSource::File(path)))
    } else {
        tracing::debug!("{} has no {file_name}; using built-in defaults", dir.display());
        Ok((builtin.to_string(), ConfigSource::Builtin(file_name)))
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an assembled config. Also used by the engine entry points so
/// in-memory configs get the same checks as file-based ones.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    config.league.validate()?;
    validate_strategy(&config.strategy)?;
    Ok(())
}

pub(crate) fn validate_strategy(strategy: &StrategyConfig) -> Result<(), VorpError> {
    let rec = &strategy.recommendations;
    let count_fields: &[(&str, usize)] = &[
        ("recommendations.top_n_targets", rec.top_n_targets),
        ("recommendations.positional_targets", rec.positional_targets),
        ("recommendations.sleeper_limit", rec.sleeper_limit),
    ];
    for (name, val) in count_fields {
        if *val == 0 {
            return Err(VorpError::invalid(*name, "must be > 0"));
        }
    }

    if !rec.sleeper_min_vorp.is_finite() {
        return Err(VorpError::invalid(
            "recommendations.sleeper_min_vorp",
            "must be a finite number",
        ));
    }

    let scoring = &strategy.scoring;
    if !(scoring.season_games.is_finite() && scoring.season_games > 0.0) {
        return Err(VorpError::invalid(
            "scoring.season_games",
            format!("must be > 0, got {}", scoring.season_games),
        ));
    }

    let mut keys: Vec<&String> = scoring.scarcity_multipliers.keys().collect();
    keys.sort();
    let mut seen: Vec<Position> = Vec::new();
    for key in keys {
        let field = format!("scoring.scarcity_multipliers.{key}");
        let Some(pos) = Position::from_str_pos(key) else {
            return Err(VorpError::invalid(field, "not a supported position"));
        };
        if seen.contains(&pos) {
            return Err(VorpError::invalid(
                format!("scoring.scarcity_multipliers.{pos}"),
                "position listed more than once",
            ));
        }
        seen.push(pos);
        let m = scoring.scarcity_multipliers[key];
        if !(m.is_finite() && m > 0.0) {
            return Err(VorpError::invalid(field, format!("must be > 0, got {m}")));
        }
    }

    strategy.vorp_tiers.validate("vorp_tiers")?;
    strategy.adp_tiers.validate("adp_tiers")?;

    if strategy.round_strategy.is_empty() {
        return Err(VorpError::invalid(
            "round_strategy",
            "at least one round range must be configured",
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
