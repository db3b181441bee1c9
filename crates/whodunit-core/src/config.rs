//! Game flow configuration.

use std::time::Duration;

/// Timing and pacing parameters for one game session.
///
/// Defaults match the reference deployment; every value can be overridden
/// through a `GAME_*` environment variable at startup.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Upper bound for the player speak phase.
    pub speak_timeout: Duration,
    /// Upper bound for the player answer phase.
    pub answer_timeout: Duration,
    /// Number of speak/answer cycles per chapter.
    pub cycles_per_chapter: u32,
    /// Total chapters in the session.
    pub total_chapters: u32,
    /// Pause after DM narration before the speak phase opens.
    pub dm_speak_delay: Duration,
    /// Per-participant stagger between simulated speeches and answers.
    pub simulated_stagger: Duration,
    /// Short grace delay for an answer phase in which nobody was queried.
    pub answer_grace: Duration,
    /// Pause after a DM summary before the next chapter or the end.
    pub summary_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speak_timeout: Duration::from_secs(180),
            answer_timeout: Duration::from_secs(60),
            cycles_per_chapter: 3,
            total_chapters: 3,
            dm_speak_delay: Duration::from_secs(2),
            simulated_stagger: Duration::from_secs(3),
            answer_grace: Duration::from_secs(2),
            summary_delay: Duration::from_secs(5),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl GameConfig {
    /// Reads the configuration from `GAME_*` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            speak_timeout: Duration::from_secs(env_u64(
                "GAME_PLAYER_SPEAK_TIME",
                d.speak_timeout.as_secs(),
            )),
            answer_timeout: Duration::from_secs(env_u64(
                "GAME_PLAYER_ANSWER_TIME",
                d.answer_timeout.as_secs(),
            )),
            cycles_per_chapter: env_u32("GAME_CHAPTER_CYCLES", d.cycles_per_chapter),
            total_chapters: env_u32("GAME_TOTAL_CHAPTERS", d.total_chapters),
            dm_speak_delay: Duration::from_secs(env_u64(
                "GAME_DM_SPEAK_DELAY",
                d.dm_speak_delay.as_secs(),
            )),
            simulated_stagger: Duration::from_secs(env_u64(
                "GAME_AI_RESPONSE_DELAY",
                d.simulated_stagger.as_secs(),
            )),
            answer_grace: Duration::from_secs(env_u64(
                "GAME_ANSWER_GRACE",
                d.answer_grace.as_secs(),
            )),
            summary_delay: Duration::from_secs(env_u64(
                "GAME_SUMMARY_DELAY",
                d.summary_delay.as_secs(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = GameConfig::default();
        assert_eq!(config.speak_timeout, Duration::from_secs(180));
        assert_eq!(config.answer_timeout, Duration::from_secs(60));
        assert_eq!(config.cycles_per_chapter, 3);
        assert_eq!(config.total_chapters, 3);
        assert_eq!(config.simulated_stagger, Duration::from_secs(3));
    }

    #[test]
    fn test_grace_delay_is_shorter_than_answer_timeout() {
        let config = GameConfig::default();
        assert!(config.answer_grace < config.answer_timeout);
    }
}
