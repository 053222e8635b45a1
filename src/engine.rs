// 🔮 Numerology Engine - the facade consumers call
//
// caller → cache → profile calculator → letter tables + reduction
//        → interpretation lookup → cached result → caller
//
// Compatibility resolves both profiles through the same cached path,
// then scores them.

use crate::cache::{
    compatibility_key, profile_key, Clock, ResultCache, SystemClock, DEFAULT_TTL_HOURS,
};
use crate::compatibility::{self, CompatibilityResult};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::interpretation::Interpretations;
use crate::profile::{self, Identity, NumerologyProfile, PersonalCycles};
use crate::systems::{NumerologySystem, SystemRegistry, PYTHAGOREAN};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::info;

pub struct NumerologyEngine {
    systems: SystemRegistry,
    interpretations: Interpretations,
    default_system: String,
    profiles: ResultCache<NumerologyProfile>,
    compatibilities: ResultCache<CompatibilityResult>,
    clock: Arc<dyn Clock>,
}

impl NumerologyEngine {
    /// Built-in systems and text, 24h cache, system clock
    pub fn new() -> Self {
        Self::with_parts(
            SystemRegistry::new(),
            Interpretations::new(),
            PYTHAGOREAN,
            Duration::hours(DEFAULT_TTL_HOURS),
            Arc::new(SystemClock),
        )
    }

    /// Build from configuration, loading any referenced data files
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let ttl = config.cache_ttl()?;

        let mut systems = match &config.systems_file {
            Some(path) => SystemRegistry::from_file(path)?,
            None => SystemRegistry::new(),
        };
        if let Some(y) = config.y_classification {
            systems.apply_y_classification(y);
        }
        // Fail at startup, not on the first request
        systems.get(&config.default_system)?;

        let interpretations = match &config.interpretations_file {
            Some(path) => Interpretations::from_file(path)?,
            None => Interpretations::new(),
        };

        Ok(Self::with_parts(
            systems,
            interpretations,
            &config.default_system,
            ttl,
            clock,
        ))
    }

    /// Assemble from already-loaded parts; `ttl` comes from
    /// [`EngineConfig::cache_ttl`] or a constant
    pub fn with_parts(
        systems: SystemRegistry,
        interpretations: Interpretations,
        default_system: &str,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            systems = ?systems.names(),
            default_system = %default_system,
            ttl_hours = ttl.num_hours(),
            "numerology engine ready"
        );

        NumerologyEngine {
            systems,
            interpretations,
            default_system: default_system.trim().to_lowercase(),
            profiles: ResultCache::new(ttl, clock.clone()),
            compatibilities: ResultCache::new(ttl, clock.clone()),
            clock,
        }
    }

    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    pub fn interpretations(&self) -> &Interpretations {
        &self.interpretations
    }

    pub fn default_system(&self) -> &str {
        &self.default_system
    }

    /// Resolve a system name; `None` means the configured default
    pub fn system(&self, name: Option<&str>) -> Result<Arc<NumerologySystem>> {
        self.systems.get(name.unwrap_or(self.default_system.as_str()))
    }

    /// Validate raw inputs into an [`Identity`]
    pub fn parse_identity(&self, full_name: &str, birth_date: &str) -> Result<Identity> {
        Identity::parse(full_name, birth_date)
    }

    pub fn compute_profile(
        &self,
        identity: &Identity,
        system: Option<&str>,
    ) -> Result<NumerologyProfile> {
        let system = self.system(system)?;
        self.cached_profile(identity, &system)
    }

    fn cached_profile(
        &self,
        identity: &Identity,
        system: &NumerologySystem,
    ) -> Result<NumerologyProfile> {
        let key = profile_key(identity, system);
        self.profiles.get_or_compute(&key, || {
            profile::compute_profile(identity, system, &self.interpretations)
        })
    }

    pub fn compute_compatibility(
        &self,
        a: &Identity,
        b: &Identity,
        system: Option<&str>,
    ) -> Result<CompatibilityResult> {
        let system = self.system(system)?;
        let key = compatibility_key(a, b, &system);

        self.compatibilities.get_or_compute(&key, || {
            let profile_a = self.cached_profile(a, &system)?;
            let profile_b = self.cached_profile(b, &system)?;
            Ok(compatibility::score(
                &profile_a,
                &profile_b,
                &self.interpretations,
            ))
        })
    }

    /// Personal year / month / day; defaults to today's date on the engine clock
    pub fn personal_cycles(&self, identity: &Identity, on: Option<NaiveDate>) -> PersonalCycles {
        let on = on.unwrap_or_else(|| self.clock.now().date_naive());
        profile::personal_cycles(identity, on, &self.interpretations)
    }

    /// Drop stale entries from both caches
    pub fn purge_stale(&self) -> usize {
        self.profiles.purge_stale() + self.compatibilities.purge_stale()
    }

    pub fn cached_profiles(&self) -> usize {
        self.profiles.len()
    }

    pub fn cached_compatibilities(&self) -> usize {
        self.compatibilities.len()
    }
}

impl Default for NumerologyEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::compatibility::CompatibilityBucket;
    use crate::error::NumerologyError;
    use chrono::{TimeZone, Utc};

    fn john() -> Identity {
        Identity::parse("John Doe", "1990-01-15").unwrap()
    }

    fn jane() -> Identity {
        Identity::parse("Jane Roe", "1992-03-08").unwrap()
    }

    fn engine_with_clock() -> (NumerologyEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
        ));
        let engine =
            NumerologyEngine::from_config_with_clock(&EngineConfig::default(), clock.clone())
                .unwrap();
        (engine, clock)
    }

    #[test]
    fn test_compute_profile_default_system() {
        let engine = NumerologyEngine::new();
        let profile = engine.compute_profile(&john(), None).unwrap();
        assert_eq!(profile.system, "pythagorean");
        assert_eq!(profile.life_path.number, 8);
        assert_eq!(profile.challenge.number, 5);
    }

    #[test]
    fn test_profile_is_cached() {
        let (engine, clock) = engine_with_clock();
        let first = engine.compute_profile(&john(), Some("pythagorean")).unwrap();
        let second = engine.compute_profile(&john(), Some("Pythagorean")).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.cached_profiles(), 1);

        clock.advance(Duration::hours(25));
        assert_eq!(engine.purge_stale(), 1);
        assert_eq!(engine.cached_profiles(), 0);
    }

    #[test]
    fn test_unknown_system_is_error() {
        let engine = NumerologyEngine::new();
        let err = engine.compute_profile(&john(), Some("vedic")).unwrap_err();
        assert!(matches!(err, NumerologyError::UnknownSystem(_)));
    }

    #[test]
    fn test_compatibility_uses_profile_cache() {
        let (engine, _clock) = engine_with_clock();
        let result = engine.compute_compatibility(&john(), &jane(), None).unwrap();
        assert!(result.overall <= 100 && result.overall >= 10);
        assert_eq!(engine.cached_profiles(), 2);
        assert_eq!(engine.cached_compatibilities(), 1);

        let reversed = engine.compute_compatibility(&jane(), &john(), None).unwrap();
        assert_eq!(result, reversed);
        assert_eq!(engine.cached_compatibilities(), 1);
    }

    #[test]
    fn test_self_compatibility_is_excellent() {
        let engine = NumerologyEngine::new();
        let result = engine.compute_compatibility(&john(), &john(), None).unwrap();
        assert_eq!(result.overall, 100);
        assert_eq!(result.bucket, CompatibilityBucket::Excellent);
    }

    #[test]
    fn test_personal_cycles_default_to_clock_date() {
        let (engine, _clock) = engine_with_clock();
        let cycles = engine.personal_cycles(&john(), None);
        assert_eq!(cycles.on, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(cycles.personal_year.number, 8);
    }

    #[test]
    fn test_config_with_unknown_default_system_fails() {
        let config = EngineConfig {
            default_system: "vedic".to_string(),
            ..EngineConfig::default()
        };
        assert!(NumerologyEngine::from_config(&config).is_err());
    }

    #[test]
    fn test_huge_ttl_is_config_error() {
        let config = EngineConfig {
            cache_ttl_hours: 9_000_000_000_000,
            ..EngineConfig::default()
        };
        assert!(matches!(
            NumerologyEngine::from_config(&config),
            Err(NumerologyError::Config(_))
        ));
    }

    #[test]
    fn test_y_classification_override() {
        let config = EngineConfig {
            y_classification: Some(crate::systems::YClassification::Vowel),
            ..EngineConfig::default()
        };
        let engine = NumerologyEngine::from_config(&config).unwrap();
        let identity = Identity::parse("Yvy", "1990-01-15").unwrap();
        let profile = engine.compute_profile(&identity, None).unwrap();
        // Y7 V4 Y7: vowels 14 → 5, consonants 4
        assert_eq!(profile.soul_urge.number, 5);
        assert_eq!(profile.personality.number, 4);
    }
}
