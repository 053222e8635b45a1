// 🔤 Letter-Value Tables - numerology systems as data
//
// One engine, many tables: a system is a record (letter → 1..9, Y policy),
// never a subclass. Pythagorean and Chaldean ship built in, more can be
// loaded from JSON at startup.

use crate::error::{NumerologyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PYTHAGOREAN: &str = "pythagorean";
pub const CHALDEAN: &str = "chaldean";

const BASE_VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

// ============================================================================
// LETTER CLASSIFICATION
// ============================================================================

/// How a system treats the letter Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum YClassification {
    /// Y counts toward personality
    #[default]
    Consonant,
    /// Y counts toward soul urge
    Vowel,
    /// Y counts toward destiny only
    Neither,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterClass {
    Vowel,
    Consonant,
    Neither,
}

/// Letter totals for one name under one system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LetterSums {
    pub total: u32,
    pub vowels: u32,
    pub consonants: u32,
    /// Letters dropped because the system has no value for them
    pub unmapped: usize,
}

// ============================================================================
// NUMEROLOGY SYSTEM
// ============================================================================

/// A named letter → value table.
///
/// Values are always in `1..=9` and every Latin letter A–Z is covered;
/// both are checked when the system is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SystemDefinition", into = "SystemDefinition")]
pub struct NumerologySystem {
    name: String,
    description: String,
    letters: BTreeMap<char, u32>,
    y_classification: YClassification,
}

/// Wire shape of a system (the JSON users write in a systems file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub letters: BTreeMap<String, u32>,
    #[serde(default)]
    pub y_classification: YClassification,
}

impl TryFrom<SystemDefinition> for NumerologySystem {
    type Error = NumerologyError;

    fn try_from(def: SystemDefinition) -> Result<Self> {
        let invalid = |message: String| NumerologyError::InvalidSystem {
            name: def.name.clone(),
            message,
        };

        let name = def.name.trim().to_lowercase();
        if name.is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }

        let mut letters = BTreeMap::new();
        for (key, value) in &def.letters {
            let mut chars = key.chars().flat_map(char::to_uppercase);
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_alphabetic() => c,
                _ => return Err(invalid(format!("'{}' is not a single letter", key))),
            };
            if !(1..=9).contains(value) {
                return Err(invalid(format!(
                    "value for '{}' must be between 1 and 9, got {}",
                    letter, value
                )));
            }
            letters.insert(letter, *value);
        }

        let missing: String = ('A'..='Z').filter(|c| !letters.contains_key(c)).collect();
        if !missing.is_empty() {
            return Err(invalid(format!("missing letters: {}", missing)));
        }

        Ok(NumerologySystem {
            name,
            description: def.description,
            letters,
            y_classification: def.y_classification,
        })
    }
}

impl From<NumerologySystem> for SystemDefinition {
    fn from(system: NumerologySystem) -> Self {
        SystemDefinition {
            name: system.name,
            description: system.description,
            letters: system
                .letters
                .into_iter()
                .map(|(c, v)| (c.to_string(), v))
                .collect(),
            y_classification: system.y_classification,
        }
    }
}

impl NumerologySystem {
    /// Build a system from a 26-entry A–Z value row
    fn from_row(name: &str, description: &str, row: [u32; 26]) -> Self {
        NumerologySystem {
            name: name.to_string(),
            description: description.to_string(),
            letters: ('A'..='Z').zip(row).collect(),
            y_classification: YClassification::Consonant,
        }
    }

    /// A=1 … I=9, J=1 … R=9, S=1 … Z=8
    pub fn pythagorean() -> Self {
        let mut row = [0u32; 26];
        for (i, slot) in row.iter_mut().enumerate() {
            *slot = (i as u32 % 9) + 1;
        }
        Self::from_row(
            PYTHAGOREAN,
            "Western cyclic table, letters valued by alphabet position",
            row,
        )
    }

    /// Babylonian table, no letter carries 9
    pub fn chaldean() -> Self {
        Self::from_row(
            CHALDEAN,
            "Chaldean table, letters valued by sound",
            [
                1, 2, 3, 4, 5, 8, 3, 5, 1, // A-I
                1, 2, 3, 4, 5, 7, 8, 1, 2, // J-R
                3, 4, 6, 6, 6, 5, 1, 7, // S-Z
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn y_classification(&self) -> YClassification {
        self.y_classification
    }

    pub fn with_y_classification(mut self, y: YClassification) -> Self {
        self.y_classification = y;
        self
    }

    /// Value of an (already uppercased) letter, 0 when unmapped
    pub fn value_of(&self, letter: char) -> u32 {
        self.letters.get(&letter).copied().unwrap_or(0)
    }

    pub fn is_mapped(&self, letter: char) -> bool {
        self.letters.contains_key(&letter)
    }

    pub fn classify(&self, letter: char) -> LetterClass {
        if BASE_VOWELS.contains(&letter) {
            return LetterClass::Vowel;
        }
        if letter == 'Y' {
            return match self.y_classification {
                YClassification::Vowel => LetterClass::Vowel,
                YClassification::Consonant => LetterClass::Consonant,
                YClassification::Neither => LetterClass::Neither,
            };
        }
        LetterClass::Consonant
    }

    pub fn is_vowel(&self, letter: char) -> bool {
        self.classify(letter) == LetterClass::Vowel
    }

    /// Uppercase and keep only letters this system can value.
    ///
    /// Diacritics and non-Latin scripts fall out here unless the system
    /// defines them, so "José" normalizes to "JOS".
    pub fn normalize_name(&self, full_name: &str) -> String {
        full_name
            .chars()
            .flat_map(char::to_uppercase)
            .filter(|c| self.is_mapped(*c))
            .collect()
    }

    pub fn letter_sums(&self, full_name: &str) -> LetterSums {
        let mut sums = LetterSums::default();

        for letter in full_name.chars().flat_map(char::to_uppercase) {
            if !letter.is_alphabetic() {
                continue;
            }
            if !self.is_mapped(letter) {
                sums.unmapped += 1;
                continue;
            }
            let value = self.value_of(letter);
            sums.total += value;
            match self.classify(letter) {
                LetterClass::Vowel => sums.vowels += value,
                LetterClass::Consonant => sums.consonants += value,
                LetterClass::Neither => {}
            }
        }

        if sums.unmapped > 0 {
            debug!(
                system = %self.name,
                unmapped = sums.unmapped,
                "name letters outside the system alphabet contribute zero"
            );
        }

        sums
    }
}

// ============================================================================
// SYSTEM REGISTRY
// ============================================================================

/// Read-only after startup; systems are looked up by name per request.
#[derive(Debug, Clone)]
pub struct SystemRegistry {
    systems: HashMap<String, Arc<NumerologySystem>>,
}

impl SystemRegistry {
    /// Empty registry (no built-ins)
    pub fn empty() -> Self {
        SystemRegistry {
            systems: HashMap::new(),
        }
    }

    /// Registry with the built-in Pythagorean and Chaldean tables
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(NumerologySystem::pythagorean());
        registry.register(NumerologySystem::chaldean());
        info!(systems = registry.systems.len(), "numerology systems registered");
        registry
    }

    /// Built-ins plus every system defined in a JSON array file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut registry = Self::new();
        for system in load_systems(path)? {
            registry.register(system);
        }
        Ok(registry)
    }

    /// Add a system; a later registration under the same name wins
    pub fn register(&mut self, system: NumerologySystem) {
        if self.systems.contains_key(system.name()) {
            warn!(system = %system.name(), "replacing registered numerology system");
        }
        self.systems
            .insert(system.name().to_string(), Arc::new(system));
    }

    /// Look up by name (case-insensitive); unknown names are an error,
    /// never a silent fallback to another table
    pub fn get(&self, name: &str) -> Result<Arc<NumerologySystem>> {
        self.systems
            .get(&name.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| NumerologyError::UnknownSystem(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.systems.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn all(&self) -> Vec<Arc<NumerologySystem>> {
        self.names()
            .iter()
            .filter_map(|name| self.systems.get(name).cloned())
            .collect()
    }

    /// Force one Y policy onto every registered system
    pub fn apply_y_classification(&mut self, y: YClassification) {
        for system in self.systems.values_mut() {
            *system = Arc::new((**system).clone().with_y_classification(y));
        }
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a JSON array of system definitions
pub fn load_systems<P: AsRef<Path>>(path: P) -> Result<Vec<NumerologySystem>> {
    let content = fs::read_to_string(path.as_ref()).map_err(|source| NumerologyError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    let systems: Vec<NumerologySystem> = serde_json::from_str(&content)?;
    Ok(systems)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pythagorean_cycle() {
        let p = NumerologySystem::pythagorean();
        assert_eq!(p.value_of('A'), 1);
        assert_eq!(p.value_of('I'), 9);
        assert_eq!(p.value_of('J'), 1);
        assert_eq!(p.value_of('R'), 9);
        assert_eq!(p.value_of('S'), 1);
        assert_eq!(p.value_of('Z'), 8);
    }

    #[test]
    fn test_chaldean_values() {
        let c = NumerologySystem::chaldean();
        assert_eq!(c.value_of('F'), 8);
        assert_eq!(c.value_of('O'), 7);
        assert_eq!(c.value_of('Z'), 7);
        assert!(('A'..='Z').all(|l| c.value_of(l) < 9));
    }

    #[test]
    fn test_normalize_strips_non_letters() {
        let p = NumerologySystem::pythagorean();
        assert_eq!(p.normalize_name("Mary-Jane O'Neil"), "MARYJANEONEIL");
        assert_eq!(p.normalize_name("José"), "JOS");
        assert_eq!(p.normalize_name("  "), "");
    }

    #[test]
    fn test_letter_sums_john_doe() {
        let p = NumerologySystem::pythagorean();
        let sums = p.letter_sums("John Doe");
        // J1 O6 H8 N5 D4 O6 E5
        assert_eq!(sums.total, 35);
        assert_eq!(sums.vowels, 17);
        assert_eq!(sums.consonants, 18);
        assert_eq!(sums.unmapped, 0);
    }

    #[test]
    fn test_unmapped_letters_counted() {
        let p = NumerologySystem::pythagorean();
        let sums = p.letter_sums("Zoë Иван");
        assert_eq!(sums.total, 8 + 6);
        assert_eq!(sums.unmapped, 5);
    }

    #[test]
    fn test_y_classification_flag() {
        let consonant = NumerologySystem::pythagorean();
        assert_eq!(consonant.classify('Y'), LetterClass::Consonant);
        assert_eq!(consonant.letter_sums("Yy").consonants, 14);

        let vowel = NumerologySystem::pythagorean().with_y_classification(YClassification::Vowel);
        assert!(vowel.is_vowel('Y'));
        assert_eq!(vowel.letter_sums("Yy").vowels, 14);

        let neither =
            NumerologySystem::pythagorean().with_y_classification(YClassification::Neither);
        let sums = neither.letter_sums("Yy");
        assert_eq!(sums.total, 14);
        assert_eq!(sums.vowels + sums.consonants, 0);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SystemRegistry::new();
        assert_eq!(registry.names(), vec!["chaldean", "pythagorean"]);
        assert_eq!(registry.get("Pythagorean").unwrap().name(), "pythagorean");

        let err = registry.get("vedic").unwrap_err();
        assert!(matches!(err, NumerologyError::UnknownSystem(ref n) if n == "vedic"));
    }

    #[test]
    fn test_definition_round_trip_through_json() {
        let json = serde_json::to_string(&NumerologySystem::chaldean()).unwrap();
        let back: NumerologySystem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NumerologySystem::chaldean());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut letters: BTreeMap<String, u32> =
            ('A'..='Z').map(|c| (c.to_string(), 1)).collect();
        letters.insert("K".to_string(), 20);

        let err = NumerologySystem::try_from(SystemDefinition {
            name: "kabbalistic".to_string(),
            description: String::new(),
            letters,
            y_classification: YClassification::Consonant,
        })
        .unwrap_err();

        assert!(matches!(err, NumerologyError::InvalidSystem { .. }));
    }

    #[test]
    fn test_rejects_incomplete_alphabet() {
        let letters: BTreeMap<String, u32> = ('A'..='Y').map(|c| (c.to_string(), 1)).collect();
        let err = NumerologySystem::try_from(SystemDefinition {
            name: "short".to_string(),
            description: String::new(),
            letters,
            y_classification: YClassification::Consonant,
        })
        .unwrap_err();

        assert!(err.to_string().contains("missing letters: Z"));
    }

    #[test]
    fn test_apply_y_classification_to_all() {
        let mut registry = SystemRegistry::new();
        registry.apply_y_classification(YClassification::Vowel);
        for system in registry.all() {
            assert_eq!(system.y_classification(), YClassification::Vowel);
        }
    }
}
