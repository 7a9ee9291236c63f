use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use wavematch::{parse_vcd, Pattern, VCD};

#[derive(Parser)]
#[command(about = "Parse a VCD trace and locate scopes by their structure")]
struct Cli {
    /// The path to the vcd file to read
    path: PathBuf,

    /// JSON file mapping a name to a pattern; every pattern is matched
    /// against the children of `--scope`
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Dotted path of the scope whose children are matched, i.e. `testbench.dp`
    #[arg(long, default_value = "")]
    scope: String,

    /// Dotted path of a signal to look up, i.e. `testbench.dp.clk`
    #[arg(long, requires = "time")]
    signal: Option<String>,

    /// Time at which `--signal` is looked up
    #[arg(long)]
    time: Option<u64>,

    /// Print the scope tree
    #[arg(long)]
    tree: bool,
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|name| !name.is_empty()).collect()
}

fn print_matches(vcd: &VCD, scope_path: &str, patterns_path: &Path) -> Result<(), Box<dyn Error>> {
    let scope_idx = vcd
        .scope_by_path(&split_path(scope_path))
        .ok_or_else(|| format!("no scope named `{scope_path}` in trace"))?;

    let file = File::open(patterns_path)?;
    let patterns: BTreeMap<String, Pattern> = serde_json::from_reader(BufReader::new(file))?;
    info!("loaded {} patterns from {}", patterns.len(), patterns_path.display());

    for (name, pattern) in &patterns {
        match vcd.match_children(scope_idx, pattern) {
            Some(child_idx) => println!("{name}: {}", vcd.scope_name_by_idx(child_idx)),
            None => println!("{name}: no match"),
        }
    }
    Ok(())
}

fn print_value(vcd: &VCD, signal_path: &str, time: u64) -> Result<(), Box<dyn Error>> {
    let mut path = split_path(signal_path);
    let signal_name = path
        .pop()
        .ok_or_else(|| format!("`{signal_path}` does not name a signal"))?;
    let signal = vcd
        .scope_by_path(&path)
        .and_then(|scope_idx| vcd.signal_by_name(scope_idx, signal_name))
        .ok_or_else(|| format!("no signal named `{signal_path}` in trace"))?;

    let value = signal.value_at(time)?;
    println!("{signal_path} @ {time} = {value}");
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Cli::parse();

    use std::time::Instant;

    let now = Instant::now();
    let file = File::open(&args.path)?;
    let vcd = parse_vcd(file)?;
    let elapsed = now.elapsed();
    info!("parsed {} in {:.2?}", args.path.display(), elapsed);

    let metadata = vcd.metadata();
    if let Some(date) = &metadata.date {
        println!("date      : {date}");
    }
    if let Some(version) = &metadata.version {
        println!("version   : {}", version.0);
    }
    if let (Some(magnitude), unit) = metadata.timescale {
        println!("timescale : {magnitude}{}", unit.as_str());
    }

    if args.tree {
        vcd.print_scopes();
    }

    if let Some(patterns_path) = &args.patterns {
        print_matches(&vcd, &args.scope, patterns_path)?;
    }

    if let (Some(signal_path), Some(time)) = (&args.signal, args.time) {
        print_value(&vcd, signal_path, time)?;
    }

    Ok(())
}
