//! CLI command implementations.

use std::fs::File;
use std::io::{BufWriter, Write};

use danmaku_common::{check as check_program, EnemyOp, OpKind, ShotOp, Vocabulary};

use crate::catalog::{Catalog, PatternSpec};
use crate::stage::{Stage, StageConfig};

fn load() -> Result<Catalog, i32> {
    Catalog::load().map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}

fn list_section<K: OpKind>(specs: &[PatternSpec<K>]) {
    println!("{}:", K::VOCABULARY);
    for spec in specs {
        println!("  {:<16} {:>3}  {}", spec.id, spec.program.len(), spec.intent);
    }
}

/// Print every built-in pattern, grouped by vocabulary.
pub fn list(_args: &[String]) -> Result<(), i32> {
    let catalog = load()?;
    list_section(&catalog.bullets);
    list_section(&catalog.shots);
    list_section(&catalog.enemies);
    Ok(())
}

fn findings<K: OpKind>(specs: &[PatternSpec<K>], out: &mut Vec<String>) {
    for spec in specs {
        for finding in check_program(&spec.program) {
            out.push(format!("{} '{}': {finding}", K::VOCABULARY, spec.id));
        }
    }
}

/// Names referenced by `Fire` (enemy) and `AttachMotion` (shot) that no
/// pattern provides.
fn dangling(catalog: &Catalog) -> Vec<String> {
    let library = catalog.install();
    let mut out = Vec::new();

    for spec in &catalog.enemies {
        for (at, instr) in spec.program.instructions().iter().enumerate() {
            if instr.kind == EnemyOp::Fire && !library.shots.contains(&instr.label) {
                out.push(format!(
                    "{} '{}': FIRE of unknown shot '{}' at instruction {at}",
                    Vocabulary::EnemyBehavior,
                    spec.id,
                    instr.label
                ));
            }
        }
    }
    for spec in &catalog.shots {
        for (at, instr) in spec.program.instructions().iter().enumerate() {
            if instr.kind == ShotOp::AttachMotion && !library.bullets.contains(&instr.label) {
                out.push(format!(
                    "{} '{}': ATTACH_MOTION of unknown program '{}' at instruction {at}",
                    Vocabulary::ShotEmission,
                    spec.id,
                    instr.label
                ));
            }
        }
    }
    out
}

/// Statically check the whole catalog.
pub fn check(_args: &[String]) -> Result<(), i32> {
    let catalog = load()?;

    let mut problems = Vec::new();
    findings(&catalog.bullets, &mut problems);
    findings(&catalog.shots, &mut problems);
    findings(&catalog.enemies, &mut problems);
    problems.extend(dangling(&catalog));

    if problems.is_empty() {
        println!("OK: {} programs", catalog.len());
        Ok(())
    } else {
        for p in &problems {
            eprintln!("error: {p}");
        }
        Err(2)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, i32> {
    let Some(value) = value else {
        eprintln!("error: {flag} requires a value");
        return Err(1);
    };
    value.parse().map_err(|_| {
        eprintln!("error: invalid value '{value}' for {flag}");
        1
    })
}

/// Parse `run` flags after the enemy name.
fn parse_run_flags(args: &[String]) -> Result<StageConfig, i32> {
    let mut config = StageConfig::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--ticks" => config.ticks = parse_value(flag, iter.next())?,
            "--seed" => config.seed = parse_value(flag, iter.next())?,
            "--trace" => config.trace = Some(parse_value(flag, iter.next())?),
            "--no-player" => config.player = false,
            other => {
                eprintln!("error: unknown flag '{other}'");
                return Err(1);
            }
        }
    }
    Ok(config)
}

/// Run one enemy pattern on the headless stage and print a summary.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an enemy pattern");
        eprintln!("Usage: danmaku run <enemy> [--ticks N] [--seed S] [--trace FILE] [--no-player]");
        return Err(1);
    }

    let name = &args[0];
    let config = parse_run_flags(&args[1..])?;
    let library = load()?.install();

    if !library.enemies.contains(name) {
        eprintln!("error: unknown enemy pattern '{name}'");
        let known = library.enemies.names().join(", ");
        eprintln!("known: {known}");
        return Err(3);
    }

    let trace: Option<Box<dyn Write>> = match &config.trace {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                eprintln!("error: cannot write '{}': {e}", path.display());
                1
            })?;
            Some(Box::new(BufWriter::new(file)))
        }
        None => None,
    };

    let Some(stage) = Stage::new(library, name, &config, trace) else {
        eprintln!("error: unknown enemy pattern '{name}'");
        return Err(3);
    };

    let summary = stage.run(config.ticks).map_err(|e| {
        eprintln!("error: trace: {e}");
        1
    })?;

    println!("pattern:      {name}");
    println!("ticks:        {}", summary.ticks);
    println!("bullets:      {} fired, {} split", summary.fired, summary.refired);
    println!("peak bullets: {}", summary.peak);
    println!("culled:       {}", summary.culled);
    println!("sounds:       {}", summary.sounds);
    println!("drops:        {}", summary.drops);
    println!("enemy:        {}", summary.fate);
    Ok(())
}
