// Library root: a VORP (value over replacement player) analytics engine for
// snake-draft fantasy football.
//
// Pipeline: projections -> valuation::vorp::score (replacement levels from
// valuation::replacement) -> valuation::scarcity / valuation::market ->
// draft::recommend. valuation::dynamic re-scores against the undrafted pool.

pub mod config;
pub mod draft;
pub mod error;
pub mod player;
pub mod valuation;

pub use config::{Config, LeagueConfig, StrategyConfig};
pub use draft::recommend::{recommend, recommend_position, DraftTarget, Recommendation, VorpRanked};
pub use draft::state::DraftState;
pub use error::VorpError;
pub use player::{PlayerProjection, Position};
pub use valuation::dynamic::{score_dynamic, DynamicScoring, DynamicVorpPlayer};
pub use valuation::market::{attach_adp_value, best_values, AdpField, AdpValuedPlayer};
pub use valuation::replacement::{resolve, resolve_available, ReplacementBaseline, ReplacementLevels};
pub use valuation::scarcity::{summarize, Insights};
pub use valuation::scenario::{compare_league_sizes, LeagueScenario};
pub use valuation::vorp::{score, ScoredPlayer};
