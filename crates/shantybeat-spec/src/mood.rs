//! Keyword-based mood analysis for lyrics.
//!
//! Counts whole-word occurrences of per-mood keywords and picks the mood with
//! the highest count. Exclamation-heavy lyrics get a small energy boost.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::theme::Mood;

/// Moods in scoring order; ties resolve to the earliest entry.
const SCORED_MOODS: [Mood; 5] = [
    Mood::Calm,
    Mood::Playful,
    Mood::Energetic,
    Mood::Mysterious,
    Mood::Adventurous,
];

fn keywords(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Energetic => &[
            "fast", "quick", "run", "race", "hurry", "speed", "rush", "jump", "dance", "play",
            "exciting", "adventure", "bold",
        ],
        Mood::Playful => &[
            "fun", "silly", "giggle", "laugh", "smile", "happy", "bounce", "hop", "skip", "play",
            "joy", "cheerful", "yo-ho", "arr", "ahoy",
        ],
        Mood::Calm => &[
            "slow", "gentle", "soft", "quiet", "peaceful", "rest", "sleep", "calm", "easy",
            "relax", "drift", "float",
        ],
        Mood::Mysterious => &[
            "secret", "hidden", "mystery", "dark", "shadow", "whisper", "quiet", "sneak", "peek",
            "find", "search", "wonder",
        ],
        Mood::Adventurous => &[
            "sail", "explore", "discover", "journey", "quest", "brave", "bold", "hero",
            "adventure", "voyage", "travel", "roam",
        ],
    }
}

/// Outcome of analysing a lyric sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    /// Dominant mood.
    pub mood: Mood,
    /// Energy after the exclamation boost.
    pub energy: f64,
    /// Share of keyword hits that went to the dominant mood.
    pub confidence: f64,
    /// Raw keyword hit counts in scoring order.
    pub scores: Vec<(Mood, usize)>,
}

/// Scores lyrics against per-mood keyword lists.
#[derive(Debug, Clone)]
pub struct MoodAnalyzer {
    patterns: Vec<(Mood, Regex)>,
}

impl Default for MoodAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MoodAnalyzer {
    /// Compiles the keyword patterns.
    pub fn new() -> Self {
        let patterns = SCORED_MOODS
            .iter()
            .map(|&mood| {
                let alternation = keywords(mood)
                    .iter()
                    .map(|word| regex::escape(word))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = format!(r"\b(?:{})\b", alternation);
                let regex = Regex::new(&pattern).expect("keyword patterns are escaped literals");
                (mood, regex)
            })
            .collect();
        Self { patterns }
    }

    /// Analyses lyrics and returns the dominant mood.
    ///
    /// Lyrics with no keyword hits default to [`Mood::Playful`] with 0.5
    /// confidence.
    pub fn analyze(&self, lyrics: &str) -> MoodAnalysis {
        let lowered = lyrics.to_lowercase();
        let scores: Vec<(Mood, usize)> = self
            .patterns
            .iter()
            .map(|(mood, regex)| (*mood, regex.find_iter(&lowered).count()))
            .collect();

        let total: usize = scores.iter().map(|(_, count)| count).sum();
        let (mood, confidence) = match scores.iter().max_by(|a, b| {
            // Reverse index order on ties so the earliest mood wins.
            a.1.cmp(&b.1).then(std::cmp::Ordering::Greater)
        }) {
            Some(&(mood, count)) if count > 0 => (mood, count as f64 / total as f64),
            _ => (Mood::Playful, 0.5),
        };

        let mut energy = mood.energy();
        if lyrics.matches('!').count() > 2 {
            energy = (energy + 0.1).min(1.0);
        }

        MoodAnalysis {
            mood,
            energy,
            confidence,
            scores,
        }
    }
}

/// Nudges energy by the vocal tempo: below 90 BPM loses 0.1, above 100 gains 0.1.
pub fn adjust_energy_for_bpm(base_energy: f64, bpm: f64) -> f64 {
    let adjustment = if bpm < 90.0 {
        -0.1
    } else if bpm > 100.0 {
        0.1
    } else {
        0.0
    };
    (base_energy + adjustment).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playful_lyrics() {
        let analyzer = MoodAnalyzer::new();
        let result = analyzer.analyze("Yo-ho! We laugh and smile, a happy crew");
        assert_eq!(result.mood, Mood::Playful);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.energy, 0.6);
    }

    #[test]
    fn test_no_keywords_defaults_to_playful() {
        let analyzer = MoodAnalyzer::new();
        let result = analyzer.analyze("the cat sat on the mat");
        assert_eq!(result.mood, Mood::Playful);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.energy, 0.6);
    }

    #[test]
    fn test_whole_words_only() {
        let analyzer = MoodAnalyzer::new();
        // "restless" and "runner" must not count as "rest" or "run".
        let result = analyzer.analyze("restless runner");
        assert!(result.scores.iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_exclamations_boost_energy() {
        let analyzer = MoodAnalyzer::new();
        let result = analyzer.analyze("slow and gentle! rest! sleep!");
        assert_eq!(result.mood, Mood::Calm);
        assert!((result.energy - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_earlier_mood() {
        let analyzer = MoodAnalyzer::new();
        // One calm hit and one mysterious hit: calm is scored first.
        let result = analyzer.analyze("a gentle whisper");
        assert_eq!(result.mood, Mood::Calm);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_adjust_energy_for_bpm() {
        assert!((adjust_energy_for_bpm(0.6, 85.0) - 0.5).abs() < 1e-9);
        assert_eq!(adjust_energy_for_bpm(0.6, 95.0), 0.6);
        assert!((adjust_energy_for_bpm(0.6, 105.0) - 0.7).abs() < 1e-9);
        assert_eq!(adjust_energy_for_bpm(0.95, 120.0), 1.0);
        assert_eq!(adjust_energy_for_bpm(0.05, 60.0), 0.0);
    }
}
