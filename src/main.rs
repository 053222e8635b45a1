use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use numerology_engine::{
    CompatibilityResult, EngineConfig, Identity, Interpreted, NumerologyEngine, NumerologyProfile,
    PersonalCycles,
};

const USAGE: &str = "\
Usage:
  numerology profile <full name> <YYYY-MM-DD> [--current NAME] [--system S] [--config P] [--json]
  numerology compat <name A> <date A> <name B> <date B> [--system S] [--config P] [--json]
  numerology cycles <full name> <YYYY-MM-DD> [--on YYYY-MM-DD] [--config P] [--json]
  numerology systems [--config P]";

/// Positional arguments plus the flags every command understands
struct Args {
    positional: Vec<String>,
    system: Option<String>,
    config: Option<String>,
    on: Option<String>,
    current: Option<String>,
    json: bool,
}

impl Args {
    fn parse(raw: &[String]) -> Result<Self> {
        let mut args = Args {
            positional: Vec::new(),
            system: None,
            config: None,
            on: None,
            current: None,
            json: false,
        };

        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => args.json = true,
                "--system" | "--config" | "--on" | "--current" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("{} needs a value", arg))?
                        .clone();
                    match arg.as_str() {
                        "--system" => args.system = Some(value),
                        "--config" => args.config = Some(value),
                        "--current" => args.current = Some(value),
                        _ => args.on = Some(value),
                    }
                }
                flag if flag.starts_with("--") => bail!("unknown flag {}\n\n{}", flag, USAGE),
                _ => args.positional.push(arg.clone()),
            }
        }

        Ok(args)
    }

    fn identity(&self, offset: usize) -> Result<Identity> {
        let (name, date) = match (self.positional.get(offset), self.positional.get(offset + 1)) {
            (Some(name), Some(date)) => (name, date),
            _ => bail!("expected a full name and a birth date\n\n{}", USAGE),
        };
        Ok(Identity::parse(name, date)?)
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let raw: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = raw.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let args = Args::parse(rest)?;

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };
    let engine = NumerologyEngine::from_config(&config)?;

    match command.as_str() {
        "profile" => {
            let mut identity = args.identity(0)?;
            if let Some(current) = &args.current {
                identity = identity.with_current_name(current)?;
            }
            let profile = engine.compute_profile(&identity, args.system.as_deref())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print_profile(&identity, &profile);
            }
        }
        "compat" => {
            let a = args.identity(0)?;
            let b = args.identity(2)?;
            let result = engine.compute_compatibility(&a, &b, args.system.as_deref())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_compatibility(&a, &b, &result);
            }
        }
        "cycles" => {
            let identity = args.identity(0)?;
            let on = args
                .on
                .as_deref()
                .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
                .transpose()
                .context("--on must be a YYYY-MM-DD date")?;
            let cycles = engine.personal_cycles(&identity, on);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&cycles)?);
            } else {
                print_cycles(&identity, &cycles);
            }
        }
        "systems" => {
            for system in engine.systems().all() {
                let marker = if system.name() == engine.default_system() { "*" } else { " " };
                println!("{} {:<12} {}", marker, system.name(), system.description());
            }
        }
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

fn line(label: &str, value: &Interpreted) {
    println!("  {:<12} {:>2}  {}", label, value.number, value.interpretation);
}

fn print_profile(identity: &Identity, profile: &NumerologyProfile) {
    println!("🔢 {} ({}) - {}", identity.full_name(), identity.birth_date(), profile.system);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    line("Life path", &profile.life_path);
    line("Destiny", &profile.destiny);
    line("Soul urge", &profile.soul_urge);
    line("Personality", &profile.personality);
    line("Birthday", &profile.birthday);
    line("Maturity", &profile.maturity);
    line("Challenge", &profile.challenge);
    for (i, pinnacle) in profile.pinnacles.iter().enumerate() {
        line(&format!("Pinnacle {}", i + 1), pinnacle);
    }
    if let Some(current) = identity.current_name() {
        line(&format!("Name {}", current), &profile.current_name);
    }
    for debt in &profile.karmic_debts {
        line("Karmic debt", debt);
    }
    for master in &profile.master_numbers {
        line("Master", master);
    }
    let affinities = &profile.compatible_numbers;
    println!("\n  Compatible   {:?}", affinities.compatible);
    println!("  Neutral      {:?}", affinities.neutral);
    println!("  Challenging  {:?}", affinities.challenging);
}

fn print_compatibility(a: &Identity, b: &Identity, result: &CompatibilityResult) {
    println!("💞 {} + {}", a.full_name(), b.full_name());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Life path    {:>3}", result.life_path);
    println!("  Destiny      {:>3}", result.destiny);
    println!("  Soul urge    {:>3}", result.soul_urge);
    println!("  Personality  {:>3}", result.personality);
    println!("  Overall      {:>3}  ({})", result.overall, result.bucket.label());
    println!("\n  {}", result.interpretation);
}

fn print_cycles(identity: &Identity, cycles: &PersonalCycles) {
    println!("📅 {} on {}", identity.full_name(), cycles.on);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    line("Year", &cycles.personal_year);
    line("Month", &cycles.personal_month);
    line("Day", &cycles.personal_day);
    line("Universal", &cycles.universal_day);
}
