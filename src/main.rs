use std::path::PathBuf;

use pathfuzz::prelude::*;

fn main() {
    let mut cfg = FuzzConfig::default();
    let mut save_failures: Option<PathBuf> = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--trials" => {
                cfg.trials = parse_arg(&args, i);
                i += 2;
            }
            "--jobs" | "--workers" => {
                cfg.jobs = parse_arg(&args, i);
                i += 2;
            }
            "--seed" => {
                cfg.seed = Some(parse_arg(&args, i));
                i += 2;
            }
            "--min-nodes" => {
                cfg.generator.min_nodes = parse_arg(&args, i);
                i += 2;
            }
            "--max-nodes" => {
                cfg.generator.max_nodes = parse_arg(&args, i);
                i += 2;
            }
            "--min-weight" => {
                cfg.generator.min_edge_weight = parse_arg(&args, i);
                i += 2;
            }
            "--max-weight" => {
                cfg.generator.max_edge_weight = parse_arg(&args, i);
                i += 2;
            }
            "--max-extra-edges" => {
                cfg.generator.max_additional_edges = parse_arg(&args, i);
                i += 2;
            }
            "--save-failures" => {
                let dir = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                save_failures = Some(PathBuf::from(dir));
                i += 2;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    println!("--------------------------------------------------");
    println!(
        "pathfuzz: {} trials, nodes {}..={}, weights {}..={}",
        cfg.trials,
        cfg.generator.min_nodes,
        cfg.generator.max_nodes,
        cfg.generator.min_edge_weight,
        cfg.generator.max_edge_weight
    );
    match cfg.seed {
        Some(seed) => println!("Seed: {seed} (reproducible)"),
        None => println!("Seed: fresh entropy"),
    }
    println!("--------------------------------------------------");

    let outcome = match run_fuzz(&cfg) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    println!("{} succeeded and {} failed", outcome.passed, outcome.failed);

    if let Some(dir) = &save_failures {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("error: cannot create {}: {e}", dir.display());
            std::process::exit(2);
        }
        for (idx, mismatch) in outcome.mismatches.iter().enumerate() {
            let file = dir.join(format!("failure_{idx:04}.txt"));
            match mismatch.save_to_file(&file) {
                Ok(()) => println!("saved counterexample to {}", file.display()),
                Err(e) => eprintln!("error: cannot write {}: {e}", file.display()),
            }
        }
    } else {
        for mismatch in &outcome.mismatches {
            eprintln!("\n=== MISMATCH ===\n{mismatch}");
        }
    }

    if !outcome.is_clean() {
        std::process::exit(1);
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], i: usize) -> T {
    args.get(i + 1)
        .unwrap_or_else(|| usage_and_exit(2))
        .parse()
        .unwrap_or_else(|_| usage_and_exit(2))
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  pathfuzz [--trials N] [--jobs N] [--seed SEED]\n           [--min-nodes N] [--max-nodes N] [--min-weight W] [--max-weight W]\n           [--max-extra-edges N] [--save-failures DIR]\n\nOptions:\n  --trials N            Number of independent trials (default: 10000)\n  --jobs/--workers N    Worker threads (default: auto-detect)\n  --seed SEED           Deterministic base seed (optional)\n  --min-nodes N         Minimum node count (default: 2)\n  --max-nodes N         Maximum node count (default: 100)\n  --min-weight W        Minimum edge weight (default: 1)\n  --max-weight W        Maximum edge weight (default: 10)\n  --max-extra-edges N   Densification attempt cap per graph (default: 100)\n  --save-failures DIR   Write each counterexample graph to DIR\n"
    );
    std::process::exit(code)
}
