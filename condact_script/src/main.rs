//! CLI entry point for condact_script.
//! Usage: cargo run -p condact_script -- compile routes.af

use std::path::Path;
use std::{env, fs, process};

use anyhow::{Context, Result};
use condact_data::Meta;
use condact_script::{DirViewLoader, read_meta_str, read_metaf_str, write_meta_string, write_metaf_string};
use log::info;

const USAGE: &str = "Usage:\n  condact_script compile <file.af> [--out <out.met>]\n  condact_script decompile <file.met> [--out <out.af>]\n  condact_script check <file.af|file.met>";

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    // Accept either:
    // 1) cargo run: <bin> -- <cmd> <args>
    // 2) direct:    <bin> <cmd> <args>
    let rest: Vec<String> = match args.as_slice() {
        [_, flag, cmd, tail @ ..] if flag == "--" && is_command(cmd) => {
            let mut v = vec![cmd.clone()];
            v.extend_from_slice(tail);
            v
        },
        [_, cmd, tail @ ..] if is_command(cmd) => {
            let mut v = vec![cmd.clone()];
            v.extend_from_slice(tail);
            v
        },
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        },
    };
    let outcome = match rest[0].as_str() {
        "compile" => run_convert(&rest[1..], true),
        "decompile" => run_convert(&rest[1..], false),
        "check" => run_check(&rest[1..]),
        other => {
            eprintln!("unknown command: {other}");
            process::exit(2);
        },
    };
    if let Err(e) = outcome {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn is_command(cmd: &str) -> bool {
    matches!(cmd, "compile" | "decompile" | "check")
}

fn split_args(args: &[String]) -> (Option<String>, Option<String>) {
    let mut path = None;
    let mut out_path = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--out" {
            if i + 1 >= args.len() {
                eprintln!("--out requires a filepath");
                process::exit(2);
            }
            out_path = Some(args[i + 1].clone());
            i += 2;
            continue;
        }
        if path.is_none() {
            path = Some(args[i].clone());
        }
        i += 1;
    }
    (path, out_path)
}

/// `compile` (Metaf in, canonical out) and `decompile` (the reverse).
fn run_convert(args: &[String], to_canonical: bool) -> Result<()> {
    let (path, out_path) = split_args(args);
    let Some(path) = path else {
        eprintln!("{USAGE}");
        process::exit(2);
    };
    let src = fs::read_to_string(&path).with_context(|| format!("unable to read '{path}'"))?;
    let meta = if to_canonical {
        read_source_metaf(&path, &src)?
    } else {
        read_meta_str(&src).with_context(|| format!("parsing '{path}'"))?
    };
    info!("'{path}' parsed: {} rules across {} states", meta.rules.len(), meta.state_names().len());
    let rendered = if to_canonical {
        write_meta_string(&meta)
    } else {
        write_metaf_string(&meta)
    };
    match out_path {
        Some(out) => fs::write(&out, rendered).with_context(|| format!("writing '{out}'"))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Parse either format and report what was found.
fn run_check(args: &[String]) -> Result<()> {
    let (path, _) = split_args(args);
    let Some(path) = path else {
        eprintln!("{USAGE}");
        process::exit(2);
    };
    let src = fs::read_to_string(&path).with_context(|| format!("unable to read '{path}'"))?;
    // Canonical documents always open with the literal header line "1".
    let meta = if src.lines().next().map(str::trim) == Some("1") {
        read_meta_str(&src).with_context(|| format!("parsing '{path}'"))?
    } else {
        read_source_metaf(&path, &src)?
    };
    println!(
        "{path}: ok ({} rules, {} states)",
        meta.rules.len(),
        meta.state_names().len()
    );
    Ok(())
}

fn read_source_metaf(path: &str, src: &str) -> Result<Meta> {
    let base = Path::new(path).parent().unwrap_or(Path::new("."));
    let views = DirViewLoader::new(base);
    read_metaf_str(src, &views).with_context(|| format!("parsing '{path}'"))
}
