//! Parsing of clan applications posted in the applications channel.
//!
//! An application is a message that repeats every template question, each
//! followed by the applicant's answer. Answers run from the end of their
//! question to the start of the next question found after it.

use crate::config::BotConfig;

pub const RSN_QUESTION: &str = "What is your RSN?";
pub const LOCATION_QUESTION: &str = "Where do you live and what timezone are you in?";
pub const RULES_LEAD: &str = "Have you read our";
pub const RULES_QUESTION: &str = "and do you agree to abide by these rules?";
pub const CLAN_QUESTION: &str = "Are you currently in another clan?";

/// Every question of the application template, in order.
pub const QUESTIONS: [&str; 9] = [
    RSN_QUESTION,
    "How did you find out about the clan?",
    "What are your favorite activities to do on Runescape?",
    LOCATION_QUESTION,
    "How often do you play?",
    RULES_LEAD,
    RULES_QUESTION,
    CLAN_QUESTION,
    "How do you drink your Coffee?",
];

/// True when `content` contains the full template, including a rules link
/// between the two halves of the rules question.
#[must_use]
pub fn is_application(content: &str) -> bool {
    if !QUESTIONS.iter().all(|q| content.contains(q)) {
        return false;
    }
    match (content.find(RULES_LEAD), content.find(RULES_QUESTION)) {
        (Some(lead), Some(question)) if lead + RULES_LEAD.len() <= question => content
            [lead + RULES_LEAD.len()..question]
            .to_lowercase()
            .contains("rules"),
        _ => false,
    }
}

/// The trimmed answer to `question`, or `None` if the question is absent.
#[must_use]
pub fn extract_answer<'a>(content: &'a str, question: &str) -> Option<&'a str> {
    let start = content.find(question)? + question.len();
    let end = QUESTIONS
        .iter()
        .filter(|q| **q != question)
        .filter_map(|q| content[start..].find(q).map(|i| start + i))
        .min()
        .unwrap_or(content.len());
    Some(content[start..end].trim())
}

/// True when any word of `answer` is one of `synonyms`.
#[must_use]
pub fn contains_synonym(answer: &str, synonyms: &[String]) -> bool {
    answer
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .any(|word| synonyms.iter().any(|s| *s == word))
}

/// Why an application was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Did not agree to the rules
    Rules,
    /// Already in another clan
    OtherClan,
}

impl DenialReason {
    /// Explanation shown to the applicant.
    #[must_use]
    pub const fn explanation(self) -> &'static str {
        match self {
            Self::Rules => {
                "You must agree to abide by our clan rules to join. Please review our rules and apply again if you agree."
            }
            Self::OtherClan => {
                "You cannot be a member of multiple clans. Please leave your current clan before applying again."
            }
        }
    }
}

/// Result of reading an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    Denied(DenialReason),
    MissingRsn,
    Accepted {
        rsn: String,
        location_timezone: Option<String>,
    },
}

/// Decides what to do with an application message.
#[must_use]
pub fn assess(content: &str, config: &BotConfig) -> Assessment {
    let agrees = extract_answer(content, RULES_QUESTION)
        .is_some_and(|a| contains_synonym(a, &config.true_values));
    if !agrees {
        return Assessment::Denied(DenialReason::Rules);
    }

    let clanless = extract_answer(content, CLAN_QUESTION)
        .is_some_and(|a| contains_synonym(a, &config.false_values));
    if !clanless {
        return Assessment::Denied(DenialReason::OtherClan);
    }

    let Some(rsn) = extract_answer(content, RSN_QUESTION).filter(|r| !r.is_empty()) else {
        return Assessment::MissingRsn;
    };
    let location_timezone = extract_answer(content, LOCATION_QUESTION)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string);

    Assessment::Accepted {
        rsn: rsn.to_string(),
        location_timezone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(rsn: &str, rules: &str, clan: &str) -> String {
        format!(
            "{RSN_QUESTION} {rsn}\n\
             How did you find out about the clan? Reddit\n\
             What are your favorite activities to do on Runescape? Bossing\n\
             {LOCATION_QUESTION} UK, GMT\n\
             How often do you play? Daily\n\
             {RULES_LEAD} #rules {RULES_QUESTION} {rules}\n\
             {CLAN_QUESTION} {clan}\n\
             How do you drink your Coffee? Black"
        )
    }

    #[test]
    fn test_is_application() {
        assert!(is_application(&application("Zezima", "yes", "no")));
        assert!(!is_application("What is your RSN? Zezima"));

        let no_rules_link = application("Zezima", "yes", "no").replace("#rules", "#info");
        assert!(!is_application(&no_rules_link));
    }

    #[test]
    fn test_extract_answer() {
        let content = application("Lynx Titan", "yes", "no");
        assert_eq!(extract_answer(&content, RSN_QUESTION), Some("Lynx Titan"));
        assert_eq!(extract_answer(&content, LOCATION_QUESTION), Some("UK, GMT"));
        assert_eq!(extract_answer(&content, CLAN_QUESTION), Some("no"));
        assert_eq!(
            extract_answer(&content, "How do you drink your Coffee?"),
            Some("Black")
        );
        assert_eq!(extract_answer("nothing here", RSN_QUESTION), None);
    }

    #[test]
    fn test_synonyms_match_whole_words() {
        let config = BotConfig::default();
        assert!(contains_synonym("Yes, I have!", &config.true_values));
        assert!(contains_synonym("nope", &config.false_values));
        assert!(!contains_synonym("Definitely in one", &config.false_values));
    }

    #[test]
    fn test_assess() {
        let config = BotConfig::default();

        assert_eq!(
            assess(&application("Zezima", "Yes I do", "Nope"), &config),
            Assessment::Accepted {
                rsn: "Zezima".to_string(),
                location_timezone: Some("UK, GMT".to_string()),
            }
        );
        assert_eq!(
            assess(&application("Zezima", "maybe", "no"), &config),
            Assessment::Denied(DenialReason::Rules)
        );
        assert_eq!(
            assess(&application("Zezima", "yes", "Yes, Coffee Shop"), &config),
            Assessment::Denied(DenialReason::OtherClan)
        );
        assert_eq!(
            assess(&application("", "yes", "no"), &config),
            Assessment::MissingRsn
        );
    }
}
