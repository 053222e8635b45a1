// 💞 Compatibility Scorer - four dimensions, one overall score
//
// Per dimension: |a - b| → 100, 90, 80 … 20, then 10 for anything wider.
// Overall is the rounded unweighted mean. Symmetric by construction.

use crate::interpretation::Interpretations;
use crate::profile::NumerologyProfile;
use serde::{Deserialize, Serialize};

// ============================================================================
// BUCKETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatibilityBucket {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "very good")]
    VeryGood,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "challenging")]
    Challenging,
}

impl CompatibilityBucket {
    pub const ALL: [CompatibilityBucket; 6] = [
        CompatibilityBucket::Excellent,
        CompatibilityBucket::VeryGood,
        CompatibilityBucket::Good,
        CompatibilityBucket::Fair,
        CompatibilityBucket::Moderate,
        CompatibilityBucket::Challenging,
    ];

    pub fn from_score(overall: u32) -> Self {
        match overall {
            90.. => CompatibilityBucket::Excellent,
            80..=89 => CompatibilityBucket::VeryGood,
            70..=79 => CompatibilityBucket::Good,
            60..=69 => CompatibilityBucket::Fair,
            50..=59 => CompatibilityBucket::Moderate,
            _ => CompatibilityBucket::Challenging,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompatibilityBucket::Excellent => "excellent",
            CompatibilityBucket::VeryGood => "very good",
            CompatibilityBucket::Good => "good",
            CompatibilityBucket::Fair => "fair",
            CompatibilityBucket::Moderate => "moderate",
            CompatibilityBucket::Challenging => "challenging",
        }
    }

    pub(crate) fn default_text(&self) -> &'static str {
        match self {
            CompatibilityBucket::Excellent => {
                "Excellent compatibility with strong potential for a harmonious relationship."
            }
            CompatibilityBucket::VeryGood => {
                "Very good compatibility with good potential for a successful relationship."
            }
            CompatibilityBucket::Good => {
                "Good compatibility with moderate potential for a fulfilling relationship."
            }
            CompatibilityBucket::Fair => {
                "Fair compatibility with some challenges but potential for growth."
            }
            CompatibilityBucket::Moderate => {
                "Moderate compatibility with significant differences to work through."
            }
            CompatibilityBucket::Challenging => {
                "Challenging compatibility requiring significant effort and understanding."
            }
        }
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// The four numbers compatibility looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub life_path: u32,
    pub destiny: u32,
    pub soul_urge: u32,
    pub personality: u32,
}

impl From<&NumerologyProfile> for Dimensions {
    fn from(profile: &NumerologyProfile) -> Self {
        Dimensions {
            life_path: profile.life_path.number,
            destiny: profile.destiny.number,
            soul_urge: profile.soul_urge.number,
            personality: profile.personality.number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub life_path: u32,
    pub destiny: u32,
    pub soul_urge: u32,
    pub personality: u32,
    pub overall: u32,
    pub bucket: CompatibilityBucket,
    pub interpretation: String,
}

/// Score for one dimension: 10 points lost per unit of difference, floor 10
pub fn dimension_score(a: u32, b: u32) -> u32 {
    let diff = a.abs_diff(b);
    if diff <= 8 {
        100 - diff * 10
    } else {
        10
    }
}

pub fn score_dimensions(
    a: Dimensions,
    b: Dimensions,
    interpretations: &Interpretations,
) -> CompatibilityResult {
    let life_path = dimension_score(a.life_path, b.life_path);
    let destiny = dimension_score(a.destiny, b.destiny);
    let soul_urge = dimension_score(a.soul_urge, b.soul_urge);
    let personality = dimension_score(a.personality, b.personality);

    let sum = life_path + destiny + soul_urge + personality;
    let overall = (f64::from(sum) / 4.0).round() as u32;
    let bucket = CompatibilityBucket::from_score(overall);

    CompatibilityResult {
        life_path,
        destiny,
        soul_urge,
        personality,
        overall,
        bucket,
        interpretation: interpretations.describe_compatibility(bucket),
    }
}

/// Single digits sorted by how well they score against one number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberAffinities {
    /// Scores above 70
    pub compatible: Vec<u32>,
    /// Scores from 50 to 70
    pub neutral: Vec<u32>,
    /// Scores below 50
    pub challenging: Vec<u32>,
}

/// Rate 1..=9 against `number` with the same per-dimension scorer
pub fn number_affinities(number: u32) -> NumberAffinities {
    let mut affinities = NumberAffinities {
        compatible: Vec::new(),
        neutral: Vec::new(),
        challenging: Vec::new(),
    };
    for other in 1..=9 {
        match dimension_score(number, other) {
            71.. => affinities.compatible.push(other),
            50..=70 => affinities.neutral.push(other),
            _ => affinities.challenging.push(other),
        }
    }
    affinities
}

/// Compare two complete profiles
pub fn score(
    a: &NumerologyProfile,
    b: &NumerologyProfile,
    interpretations: &Interpretations,
) -> CompatibilityResult {
    score_dimensions(Dimensions::from(a), Dimensions::from(b), interpretations)
}

// ============================================================================
// TESTS
// ============================================================================
