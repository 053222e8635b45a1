// 📖 Interpretation Lookup - canned text keyed by (field, number)
//
// Each field kind has its own table: 7 under life path reads differently
// from 7 under soul urge. Missing entries fall back to a generic line for
// the field instead of failing.

use crate::compatibility::CompatibilityBucket;
use crate::error::{NumerologyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// FIELD KINDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    LifePath,
    Destiny,
    SoulUrge,
    Personality,
    Birthday,
    Maturity,
    Challenge,
    Pinnacle,
    KarmicDebt,
    MasterNumber,
    PersonalCycle,
}

impl FieldKind {
    pub const ALL: [FieldKind; 11] = [
        FieldKind::LifePath,
        FieldKind::Destiny,
        FieldKind::SoulUrge,
        FieldKind::Personality,
        FieldKind::Birthday,
        FieldKind::Maturity,
        FieldKind::Challenge,
        FieldKind::Pinnacle,
        FieldKind::KarmicDebt,
        FieldKind::MasterNumber,
        FieldKind::PersonalCycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::LifePath => "lifePath",
            FieldKind::Destiny => "destiny",
            FieldKind::SoulUrge => "soulUrge",
            FieldKind::Personality => "personality",
            FieldKind::Birthday => "birthday",
            FieldKind::Maturity => "maturity",
            FieldKind::Challenge => "challenge",
            FieldKind::Pinnacle => "pinnacle",
            FieldKind::KarmicDebt => "karmicDebt",
            FieldKind::MasterNumber => "masterNumber",
            FieldKind::PersonalCycle => "personalCycle",
        }
    }

    /// Generic line used when a number has no entry
    fn fallback(&self) -> &'static str {
        match self {
            FieldKind::LifePath => "Your life path number reveals your unique journey and purpose.",
            FieldKind::Destiny => "Your destiny number reveals your life purpose and mission.",
            FieldKind::SoulUrge => {
                "Your soul urge number reveals your deepest desires and motivations."
            }
            FieldKind::Personality => "Your personality number reveals how others perceive you.",
            FieldKind::Birthday => {
                "Your birthday number reveals your natural talents and abilities."
            }
            FieldKind::Maturity => "Your maturity number reveals your potential in later life.",
            FieldKind::Challenge => "Your challenge number reveals the lessons you need to learn.",
            FieldKind::Pinnacle => "This pinnacle period brings unique opportunities for growth.",
            FieldKind::KarmicDebt => {
                "This karmic debt number reveals lessons you must learn in this lifetime."
            }
            FieldKind::MasterNumber => "This master number reveals your special spiritual gifts.",
            FieldKind::PersonalCycle => "A period of steady personal growth.",
        }
    }

    fn defaults(&self) -> &'static [(u32, &'static str)] {
        match self {
            FieldKind::LifePath => LIFE_PATH,
            FieldKind::Destiny => DESTINY,
            FieldKind::SoulUrge => SOUL_URGE,
            FieldKind::Personality => PERSONALITY,
            FieldKind::Birthday => BIRTHDAY,
            FieldKind::Maturity => MATURITY,
            FieldKind::Challenge => CHALLENGE,
            FieldKind::Pinnacle => PINNACLE,
            FieldKind::KarmicDebt => KARMIC_DEBT,
            FieldKind::MasterNumber => MASTER_NUMBER,
            FieldKind::PersonalCycle => PERSONAL_CYCLE,
        }
    }
}

/// A computed number with its text attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreted {
    pub number: u32,
    pub interpretation: String,
}

// ============================================================================
// INTERPRETATION TABLES
// ============================================================================

/// JSON shape of an interpretations override file.
///
/// ```json
/// { "fields": { "lifePath": { "7": "..." } }, "compatibility": { "excellent": "..." } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpretationOverrides {
    #[serde(default)]
    pub fields: HashMap<FieldKind, HashMap<String, String>>,
    #[serde(default)]
    pub compatibility: HashMap<CompatibilityBucket, String>,
}

#[derive(Debug, Clone)]
pub struct Interpretations {
    tables: HashMap<FieldKind, HashMap<u32, String>>,
    compatibility: HashMap<CompatibilityBucket, String>,
}

impl Interpretations {
    /// Built-in English tables
    pub fn new() -> Self {
        let tables = FieldKind::ALL
            .iter()
            .map(|kind| {
                let table = kind
                    .defaults()
                    .iter()
                    .map(|(n, text)| (*n, text.to_string()))
                    .collect();
                (*kind, table)
            })
            .collect();

        let compatibility = CompatibilityBucket::ALL
            .iter()
            .map(|bucket| (*bucket, bucket.default_text().to_string()))
            .collect();

        Interpretations {
            tables,
            compatibility,
        }
    }

    /// Built-in tables with entries from a JSON override file layered on top
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| NumerologyError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        let overrides: InterpretationOverrides = serde_json::from_str(&content)?;

        let mut interpretations = Self::new();
        interpretations.apply(overrides)?;
        Ok(interpretations)
    }

    pub fn apply(&mut self, overrides: InterpretationOverrides) -> Result<()> {
        for (kind, entries) in overrides.fields {
            let table = self.tables.entry(kind).or_default();
            for (key, text) in entries {
                let number: u32 = key.trim().parse().map_err(|_| {
                    NumerologyError::Config(format!(
                        "interpretation key '{}' under {} is not a number",
                        key,
                        kind.as_str()
                    ))
                })?;
                table.insert(number, text);
            }
        }
        self.compatibility.extend(overrides.compatibility);
        Ok(())
    }

    pub fn describe(&self, kind: FieldKind, number: u32) -> String {
        match self.tables.get(&kind).and_then(|t| t.get(&number)) {
            Some(text) => text.clone(),
            None => {
                debug!(field = kind.as_str(), number, "no interpretation entry, using fallback");
                kind.fallback().to_string()
            }
        }
    }

    pub fn interpret(&self, kind: FieldKind, number: u32) -> Interpreted {
        Interpreted {
            number,
            interpretation: self.describe(kind, number),
        }
    }

    pub fn describe_compatibility(&self, bucket: CompatibilityBucket) -> String {
        self.compatibility
            .get(&bucket)
            .cloned()
            .unwrap_or_else(|| bucket.default_text().to_string())
    }
}

impl Default for Interpretations {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// DEFAULT TEXT
// ============================================================================

const LIFE_PATH: &[(u32, &str)] = &[
    (1, "You are a natural leader with strong independence and determination."),
    (2, "You are diplomatic, cooperative, and have a natural ability to work with others."),
    (3, "You are creative, expressive, and have a gift for communication."),
    (4, "You are practical, organized, and have a strong work ethic."),
    (5, "You are adventurous, freedom-loving, and embrace change."),
    (6, "You are nurturing, responsible, and have a strong sense of family."),
    (7, "You are spiritual, analytical, and seek deeper meaning in life."),
    (8, "You are ambitious and driven, with strong business acumen."),
    (9, "You are humanitarian, compassionate, and seek to help others."),
    (11, "You are intuitive, inspirational, and have spiritual gifts."),
    (22, "You are a master builder with the ability to manifest dreams into reality."),
    (33, "You are a master teacher with the ability to inspire and heal others."),
];

const DESTINY: &[(u32, &str)] = &[
    (1, "Your destiny is to lead and inspire others through your independence."),
    (2, "Your destiny is to bring harmony and cooperation to the world."),
    (3, "Your destiny is to express creativity and bring joy to others."),
    (4, "Your destiny is to build and organize systems that benefit society."),
    (5, "Your destiny is to experience life fully and share your adventures."),
    (6, "Your destiny is to nurture and care for others."),
    (7, "Your destiny is to seek truth and share spiritual wisdom."),
    (8, "Your destiny is to achieve material success and help others prosper."),
    (9, "Your destiny is to serve humanity and make a positive impact."),
    (11, "Your destiny is to inspire others through your spiritual insights."),
    (22, "Your destiny is to build something lasting that benefits many."),
    (33, "Your destiny is to teach and heal others through your wisdom."),
];

const SOUL_URGE: &[(u32, &str)] = &[
    (1, "Your soul craves independence and the ability to lead."),
    (2, "Your soul craves partnership and harmonious relationships."),
    (3, "Your soul craves creative expression and joy."),
    (4, "Your soul craves stability and security."),
    (5, "Your soul craves freedom and new experiences."),
    (6, "Your soul craves love and nurturing relationships."),
    (7, "Your soul craves spiritual understanding and truth."),
    (8, "Your soul craves material success and recognition."),
    (9, "Your soul craves to serve and help others."),
    (11, "Your soul craves spiritual enlightenment and inspiration."),
    (22, "Your soul craves to build something meaningful and lasting."),
    (33, "Your soul craves to teach and heal others."),
];

const PERSONALITY: &[(u32, &str)] = &[
    (1, "You appear confident, independent, and a natural leader."),
    (2, "You appear diplomatic, cooperative, and peace-loving."),
    (3, "You appear creative, expressive, and optimistic."),
    (4, "You appear practical, reliable, and hardworking."),
    (5, "You appear adventurous, dynamic, and freedom-loving."),
    (6, "You appear nurturing, responsible, and family-oriented."),
    (7, "You appear mysterious, analytical, and spiritual."),
    (8, "You appear ambitious, confident, and business-oriented."),
    (9, "You appear wise, compassionate, and humanitarian."),
    (11, "You appear intuitive, inspirational, and spiritually gifted."),
    (22, "You appear masterful, practical, and capable of great achievements."),
    (33, "You appear wise, compassionate, and spiritually evolved."),
];

const BIRTHDAY: &[(u32, &str)] = &[
    (1, "You have natural leadership abilities and independence."),
    (2, "You have diplomatic skills and work well with others."),
    (3, "You have creative talents and communication skills."),
    (4, "You have practical abilities and organizational skills."),
    (5, "You have an adventurous spirit and adaptability."),
    (6, "You have nurturing abilities and a sense of responsibility."),
    (7, "You have an analytical mind and spiritual awareness."),
    (8, "You have business acumen and material success potential."),
    (9, "You have humanitarian instincts and wisdom."),
    (11, "You have intuitive gifts and spiritual insights."),
    (22, "You have master builder abilities and practical wisdom."),
    (33, "You have master teacher abilities and healing gifts."),
];

const MATURITY: &[(u32, &str)] = &[
    (1, "In maturity, you will become a confident leader and pioneer."),
    (2, "In maturity, you will become a diplomatic peacemaker and collaborator."),
    (3, "In maturity, you will become a creative artist and communicator."),
    (4, "In maturity, you will become a practical builder and organizer."),
    (5, "In maturity, you will become an adventurous explorer and teacher."),
    (6, "In maturity, you will become a nurturing caregiver and healer."),
    (7, "In maturity, you will become a spiritual teacher and philosopher."),
    (8, "In maturity, you will become a successful business leader and achiever."),
    (9, "In maturity, you will become a humanitarian leader and healer."),
    (11, "In maturity, you will become an inspirational spiritual leader."),
    (22, "In maturity, you will become a master builder and visionary."),
    (33, "In maturity, you will become a master teacher and healer."),
];

const CHALLENGE: &[(u32, &str)] = &[
    (0, "Your challenge is to develop self-confidence and independence."),
    (1, "Your challenge is to balance independence with cooperation."),
    (2, "Your challenge is to develop patience and diplomacy."),
    (3, "Your challenge is to express creativity while staying grounded."),
    (4, "Your challenge is to build stability while remaining flexible."),
    (5, "Your challenge is to embrace change while maintaining focus."),
    (6, "Your challenge is to balance responsibility with personal needs."),
    (7, "Your challenge is to seek truth while staying practical."),
    (8, "Your challenge is to achieve success while remaining ethical."),
];

const PINNACLE: &[(u32, &str)] = &[
    (1, "This pinnacle period brings opportunities for leadership and independence."),
    (2, "This pinnacle period brings opportunities for cooperation and partnership."),
    (3, "This pinnacle period brings opportunities for creativity and expression."),
    (4, "This pinnacle period brings opportunities for building and organizing."),
    (5, "This pinnacle period brings opportunities for adventure and change."),
    (6, "This pinnacle period brings opportunities for nurturing and responsibility."),
    (7, "This pinnacle period brings opportunities for spiritual growth and wisdom."),
    (8, "This pinnacle period brings opportunities for material success and achievement."),
    (9, "This pinnacle period brings opportunities for humanitarian service."),
    (11, "This pinnacle period brings opportunities for spiritual inspiration."),
    (22, "This pinnacle period brings opportunities for master building."),
    (33, "This pinnacle period brings opportunities for master teaching."),
];

const KARMIC_DEBT: &[(u32, &str)] = &[
    (13, "Karmic debt of laziness: you must learn to work hard and be disciplined."),
    (14, "Karmic debt of excess: you must learn moderation and balance."),
    (16, "Karmic debt of ego: you must learn humility and service to others."),
    (19, "Karmic debt of power: you must learn to use power wisely and for good."),
];

const MASTER_NUMBER: &[(u32, &str)] = &[
    (11, "Master number of intuition and inspiration: you have spiritual gifts."),
    (22, "Master number of the master builder: you can manifest dreams into reality."),
    (33, "Master number of the master teacher: you can inspire and heal others."),
];

const PERSONAL_CYCLE: &[(u32, &str)] = &[
    (1, "New beginnings, leadership, independence, fresh starts."),
    (2, "Cooperation, partnerships, patience and harmony."),
    (3, "Creativity, communication, self-expression and joy."),
    (4, "Building foundations, hard work, stability and organization."),
    (5, "Change, freedom, adventure and versatility."),
    (6, "Responsibility, service, family and nurturing."),
    (7, "Spiritual growth, introspection, wisdom and analysis."),
    (8, "Material success, power, authority and achievement."),
    (9, "Completion, service, humanitarianism and wisdom."),
    (11, "Heightened intuition and spiritual illumination."),
    (22, "Large-scale building and practical vision."),
    (33, "Compassionate service and teaching."),
];

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_independent_per_field() {
        let interp = Interpretations::new();
        let life_path = interp.describe(FieldKind::LifePath, 7);
        let soul_urge = interp.describe(FieldKind::SoulUrge, 7);
        assert_ne!(life_path, soul_urge);
        assert!(soul_urge.starts_with("Your soul craves"));
    }

    #[test]
    fn test_master_numbers_have_entries() {
        let interp = Interpretations::new();
        for kind in [FieldKind::LifePath, FieldKind::Destiny, FieldKind::Pinnacle] {
            for n in [11, 22, 33] {
                assert_ne!(interp.describe(kind, n), kind.fallback());
            }
        }
    }

    #[test]
    fn test_challenge_table_covers_zero_to_eight() {
        let interp = Interpretations::new();
        for n in 0..=8 {
            assert_ne!(
                interp.describe(FieldKind::Challenge, n),
                FieldKind::Challenge.fallback(),
                "challenge {} has no entry",
                n
            );
        }
    }

    #[test]
    fn test_missing_entry_falls_back() {
        let interp = Interpretations::new();
        assert_eq!(
            interp.describe(FieldKind::Challenge, 9),
            "Your challenge number reveals the lessons you need to learn."
        );
        assert_eq!(
            interp.describe(FieldKind::LifePath, 0),
            FieldKind::LifePath.fallback()
        );
    }

    #[test]
    fn test_overrides_layer_on_defaults() {
        let overrides: InterpretationOverrides = serde_json::from_str(
            r#"{
                "fields": { "lifePath": { "7": "Seeker." } },
                "compatibility": { "excellent": "Perfect match." }
            }"#,
        )
        .unwrap();

        let mut interp = Interpretations::new();
        interp.apply(overrides).unwrap();

        assert_eq!(interp.describe(FieldKind::LifePath, 7), "Seeker.");
        assert!(interp.describe(FieldKind::LifePath, 1).contains("natural leader"));
        assert_eq!(
            interp.describe_compatibility(CompatibilityBucket::Excellent),
            "Perfect match."
        );
    }

    #[test]
    fn test_override_with_bad_key_is_config_error() {
        let overrides: InterpretationOverrides =
            serde_json::from_str(r#"{ "fields": { "destiny": { "seven": "x" } } }"#).unwrap();
        let err = Interpretations::new().apply(overrides).unwrap_err();
        assert!(matches!(err, NumerologyError::Config(_)));
    }
}
