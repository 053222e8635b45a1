// 🧮 Profile Calculator - name + birth date → complete numeric profile
//
// Pure and deterministic: the same (identity, system) always yields the
// same profile. Interpretation text is attached to every number.

use crate::compatibility::{number_affinities, NumberAffinities};
use crate::error::{NumerologyError, Result};
use crate::interpretation::{FieldKind, Interpretations, Interpreted};
use crate::reduction::{is_master, karmic_debt, reduce, reduce_to_digit};
use crate::systems::NumerologySystem;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

// ============================================================================
// IDENTITY
// ============================================================================

/// Who a reading is for. Validated on construction, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawIdentity")]
pub struct Identity {
    full_name: String,
    birth_date: NaiveDate,
    /// Name in everyday use, when it differs from the birth name
    #[serde(skip_serializing_if = "Option::is_none")]
    current_name: Option<String>,
}

/// Unvalidated identity as it arrives from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIdentity {
    pub full_name: String,
    pub birth_date: String,
    #[serde(default)]
    pub current_name: Option<String>,
}

impl TryFrom<RawIdentity> for Identity {
    type Error = NumerologyError;

    fn try_from(raw: RawIdentity) -> Result<Self> {
        let identity = Identity::parse(&raw.full_name, &raw.birth_date)?;
        match raw.current_name {
            Some(name) => identity.with_current_name(&name),
            None => Ok(identity),
        }
    }
}

impl Identity {
    pub fn new(full_name: &str, birth_date: NaiveDate) -> Result<Self> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(NumerologyError::validation("fullName", "must not be empty"));
        }
        if !full_name.chars().any(char::is_alphabetic) {
            return Err(NumerologyError::validation(
                "fullName",
                "must contain at least one letter",
            ));
        }
        if birth_date.year() < 1 {
            return Err(NumerologyError::validation(
                "birthDate",
                format!("year must be positive, got {}", birth_date.year()),
            ));
        }

        Ok(Identity {
            full_name: full_name.to_string(),
            birth_date,
            current_name: None,
        })
    }

    /// Attach the name currently in use. Blank clears it.
    pub fn with_current_name(mut self, current_name: &str) -> Result<Self> {
        let current_name = current_name.trim();
        if current_name.is_empty() {
            self.current_name = None;
            return Ok(self);
        }
        if !current_name.chars().any(char::is_alphabetic) {
            return Err(NumerologyError::validation(
                "currentName",
                "must contain at least one letter",
            ));
        }
        self.current_name = Some(current_name.to_string());
        Ok(self)
    }

    /// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
    pub fn parse(full_name: &str, birth_date: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").map_err(|e| {
            NumerologyError::validation(
                "birthDate",
                format!("'{}' is not a YYYY-MM-DD date ({})", birth_date, e),
            )
        })?;
        Identity::new(full_name, date)
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    fn day(&self) -> u32 {
        self.birth_date.day()
    }

    fn month(&self) -> u32 {
        self.birth_date.month()
    }

    fn year(&self) -> u32 {
        // positive by construction
        self.birth_date.year().unsigned_abs()
    }
}

// ============================================================================
// PROFILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumerologyProfile {
    pub system: String,
    pub life_path: Interpreted,
    pub destiny: Interpreted,
    pub soul_urge: Interpreted,
    pub personality: Interpreted,
    pub birthday: Interpreted,
    pub maturity: Interpreted,
    /// |day - month| with both operands reduced to one digit, never re-reduced
    pub challenge: Interpreted,
    pub pinnacles: [Interpreted; 4],
    /// Destiny of the current name; equals destiny when none is given
    pub current_name: Interpreted,
    pub karmic_debts: Vec<Interpreted>,
    pub master_numbers: Vec<Interpreted>,
    /// Digits that pair well or poorly with the life path
    pub compatible_numbers: NumberAffinities,
}

/// Compute the full profile for one identity under one system.
///
/// Names with no letters the system can value are rejected rather than
/// producing a zeroed destiny.
pub fn compute_profile(
    identity: &Identity,
    system: &NumerologySystem,
    interpretations: &Interpretations,
) -> Result<NumerologyProfile> {
    let normalized = system.normalize_name(identity.full_name());
    if normalized.is_empty() {
        return Err(NumerologyError::validation(
            "fullName",
            format!(
                "'{}' has no letters defined in the {} system",
                identity.full_name(),
                system.name()
            ),
        ));
    }

    let (day, month, year) = (identity.day(), identity.month(), identity.year());
    let sums = system.letter_sums(identity.full_name());

    let current_name = match identity.current_name() {
        Some(name) => {
            if system.normalize_name(name).is_empty() {
                return Err(NumerologyError::validation(
                    "currentName",
                    format!("'{}' has no letters defined in the {} system", name, system.name()),
                ));
            }
            Some(reduce(system.letter_sums(name).total))
        }
        None => None,
    };

    // Each date component is reduced before the sum is reduced again
    let life_path_total = reduce(day) + reduce(month) + reduce(year);
    let life_path = reduce(life_path_total);
    let destiny = reduce(sums.total);
    let soul_urge = reduce(sums.vowels);
    let personality = reduce(sums.consonants);
    let birthday = reduce(day);
    let maturity = reduce(life_path + destiny);
    // Masters are not kept here, so the difference stays within 0..=8
    let challenge = reduce_to_digit(day).abs_diff(reduce_to_digit(month));
    let current_name = current_name.unwrap_or(destiny);

    let first = reduce(day + month);
    let second = reduce(day + year);
    let third = reduce(first + second);
    let fourth = reduce(month + year);

    let karmic: BTreeSet<u32> = [
        day,
        life_path_total,
        sums.total,
        sums.vowels,
        sums.consonants,
    ]
    .into_iter()
    .filter_map(karmic_debt)
    .collect();

    let masters: BTreeSet<u32> = [
        life_path,
        destiny,
        soul_urge,
        personality,
        birthday,
        maturity,
        current_name,
    ]
    .into_iter()
        .filter(|n| is_master(*n))
        .collect();

    debug!(
        system = system.name(),
        life_path, destiny, soul_urge, personality, "computed numerology profile"
    );

    let interpret = |kind, n| interpretations.interpret(kind, n);

    Ok(NumerologyProfile {
        system: system.name().to_string(),
        life_path: interpret(FieldKind::LifePath, life_path),
        destiny: interpret(FieldKind::Destiny, destiny),
        soul_urge: interpret(FieldKind::SoulUrge, soul_urge),
        personality: interpret(FieldKind::Personality, personality),
        birthday: interpret(FieldKind::Birthday, birthday),
        maturity: interpret(FieldKind::Maturity, maturity),
        challenge: interpret(FieldKind::Challenge, challenge),
        pinnacles: [first, second, third, fourth].map(|p| interpret(FieldKind::Pinnacle, p)),
        current_name: interpret(FieldKind::Destiny, current_name),
        karmic_debts: karmic
            .into_iter()
            .map(|n| interpret(FieldKind::KarmicDebt, n))
            .collect(),
        master_numbers: masters
            .into_iter()
            .map(|n| interpret(FieldKind::MasterNumber, n))
            .collect(),
        compatible_numbers: number_affinities(life_path),
    })
}

// ============================================================================
// PERSONAL CYCLES
// ============================================================================

/// Year / month / day vibration for an identity on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalCycles {
    pub on: NaiveDate,
    pub personal_year: Interpreted,
    pub personal_month: Interpreted,
    pub personal_day: Interpreted,
    /// Same for everyone on `on`
    pub universal_day: Interpreted,
}

/// Day + month + year of a calendar date, reduced to one digit
pub fn universal_day(on: NaiveDate) -> u32 {
    reduce_to_digit(on.day() + on.month() + on.year().unsigned_abs())
}

pub fn personal_cycles(
    identity: &Identity,
    on: NaiveDate,
    interpretations: &Interpretations,
) -> PersonalCycles {
    let target_year = on.year().unsigned_abs();
    let year = reduce(reduce(identity.month()) + reduce(identity.day()) + reduce(target_year));
    let month = reduce(year + on.month());
    let day = reduce(month + on.day());

    PersonalCycles {
        on,
        personal_year: interpretations.interpret(FieldKind::PersonalCycle, year),
        personal_month: interpretations.interpret(FieldKind::PersonalCycle, month),
        personal_day: interpretations.interpret(FieldKind::PersonalCycle, day),
        universal_day: interpretations.interpret(FieldKind::PersonalCycle, universal_day(on)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
