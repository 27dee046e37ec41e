//! Priority-ordered response selection.
//!
//! The engine never fails: every path ends in a nonempty reply drawn from a
//! static table. Randomness only decides which candidate is picked and the
//! two probability rolls (time-of-day reply, name personalization); which
//! category answers is fully determined by the message text.

use std::sync::{Mutex, MutexGuard};

use chrono::Timelike;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use xssbook_types::config::ResponderConfig;
use xssbook_types::error::SynthesisError;

use super::rules::{self, RuleCategory, TimeOfDay};
use super::{DEFAULT_SPEAKER_NAME, FALLBACK_REPLY, FALLBACK_STARTER, ReplyGenerator};

/// A synthesized reply and the category that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub category: RuleCategory,
    pub text: String,
}

/// Rule-based chat simulator for persona accounts.
///
/// The random source is injected (seedable) and guarded by a mutex that is
/// held only while a single reply is composed.
pub struct ResponseEngine {
    rng: Mutex<StdRng>,
    time_reply_probability: f64,
    name_append_probability: f64,
}

impl ResponseEngine {
    /// Engine with default probabilities and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::from_config(&ResponderConfig::default())
    }

    /// Engine with default probabilities and a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), &ResponderConfig::default())
    }

    /// Engine configured from `config.toml`. Uses `config.seed` when present.
    pub fn from_config(config: &ResponderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng, config)
    }

    /// Engine driven by the given RNG.
    pub fn with_rng(rng: StdRng, config: &ResponderConfig) -> Self {
        Self {
            rng: Mutex::new(rng),
            time_reply_probability: config.time_reply_probability,
            name_append_probability: config.name_append_probability,
        }
    }

    /// Reply to `message` using the current local hour.
    pub fn get_response(&self, message: &str, speaker_name: &str) -> String {
        self.respond(message, speaker_name, current_hour()).text
    }

    /// Reply to `message` as if it were `hour` o'clock.
    pub fn get_response_at(&self, message: &str, speaker_name: &str, hour: u32) -> String {
        self.respond(message, speaker_name, hour).text
    }

    /// Random conversation opener, independent of any context.
    pub fn get_conversation_starter(&self) -> String {
        pick(&mut self.lock_recovering(), rules::CONVERSATION_STARTERS, FALLBACK_STARTER).to_string()
    }

    /// Reply to `message` and report which category answered.
    pub fn respond(&self, message: &str, speaker_name: &str, hour: u32) -> Reply {
        self.compose(&mut self.lock_recovering(), message, speaker_name, hour)
    }

    fn compose(&self, rng: &mut StdRng, message: &str, speaker_name: &str, hour: u32) -> Reply {
        let normalized = message.trim().to_lowercase();

        if let Some(rule) = rules::first_match(&normalized) {
            debug!(category = %rule.category, rule = rule.label, "Pattern rule matched");
            return Reply {
                category: rule.category,
                text: pick(rng, rule.replies, FALLBACK_REPLY).to_string(),
            };
        }

        if message.trim().ends_with('?') {
            return Reply {
                category: RuleCategory::Question,
                text: pick(rng, rules::QUESTION_REPLIES, FALLBACK_REPLY).to_string(),
            };
        }

        let bucket = TimeOfDay::from_hour(hour);
        if rng.gen_range(0.0..1.0) < self.time_reply_probability {
            return Reply {
                category: RuleCategory::TimeOfDay,
                text: pick(rng, bucket.replies(), FALLBACK_REPLY).to_string(),
            };
        }

        let mut text = pick(rng, rules::FALLBACK_REPLIES, FALLBACK_REPLY).to_string();
        let personalize = rng.gen_range(0.0..1.0) < self.name_append_probability;
        if personalize && is_real_name(speaker_name) {
            text = format!("{text} {speaker_name}!");
        }

        Reply {
            category: RuleCategory::Fallback,
            text,
        }
    }

    /// Lock the RNG, recovering it if a previous holder panicked.
    /// The RNG has no invariants a panic could break.
    fn lock_recovering(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyGenerator for ResponseEngine {
    fn reply(&self, message: &str, speaker_name: &str) -> Result<String, SynthesisError> {
        let mut rng = self.rng.lock().map_err(|_| {
            warn!("Responder RNG lock poisoned");
            SynthesisError::RngUnavailable
        })?;
        Ok(self.compose(&mut rng, message, speaker_name, current_hour()).text)
    }

    fn starter(&self) -> Result<String, SynthesisError> {
        let mut rng = self.rng.lock().map_err(|_| SynthesisError::RngUnavailable)?;
        rules::CONVERSATION_STARTERS
            .choose(&mut *rng)
            .map(|s| s.to_string())
            .ok_or_else(|| SynthesisError::EmptyCandidates("starter".to_string()))
    }
}

/// Uniform choice from `candidates`, or `default` if the table is empty.
fn pick(rng: &mut StdRng, candidates: &'static [&'static str], default: &'static str) -> &'static str {
    candidates.choose(rng).copied().unwrap_or(default)
}

/// Placeholder and blank names are never appended to a reply.
fn is_real_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != DEFAULT_SPEAKER_NAME
}

fn current_hour() -> u32 {
    chrono::Local::now().hour()
}
