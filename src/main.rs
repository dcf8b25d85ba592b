#![forbid(unsafe_code)]

mod cli;
mod config;
mod constants;
mod obj;
mod snd;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command, EntriesArgs, EventsArgs, GenerateArgs, UpdateArgs};
use config::Config;
use constants::snd::BEGIN_MARKER;
use obj::ObjGeometry;
use snd::entry::{parse_entries, render_document, EntryIdAllocator, Placement};
use snd::events::extract_event_paths;
use snd::generate::{rewrite_root, CannedSound, GenerateOptions, Generator};
use snd::update::{apply_changes, identify_changes, UpdateReport};

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(&Config::load()?, args),
        Command::Update(args) => run_update(args),
        Command::Entries(args) => run_entries(args),
        Command::Events(args) => run_events(args),
    }
}

fn read_input(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} from {path:?}"))
}

fn run_generate(config: &Config, args: GenerateArgs) -> Result<()> {
    let settings = &config.generation;

    let obj_content = read_input(&args.obj, "OBJ geometry")?;
    let template = args
        .template
        .as_deref()
        .map(|p| read_input(p, ".snd template"))
        .transpose()?;

    let mut geometry = ObjGeometry::parse(&obj_content)?;

    let excluded = if args.exclude_kinds.is_empty() {
        settings.exclude_manip_kinds.clone()
    } else {
        args.exclude_kinds
    };
    geometry.filter_kinds(&excluded);

    let event_name = args
        .event_name
        .unwrap_or_else(|| settings.event_name.clone());
    let root = args.root.unwrap_or_else(|| settings.root_category.clone());
    let canned = if args.all_canned {
        CannedSound::ALL.to_vec()
    } else if args.canned.is_empty() {
        settings.canned.clone()
    } else {
        args.canned
    };

    let options = GenerateOptions {
        event_name: rewrite_root(&event_name, &root),
        use_hold_cue: args.hold_cue || settings.use_hold_cue,
        duplicate_for_release: args.duplicate_release || settings.duplicate_for_release,
        canned,
    };

    let generator = Generator::new(template);
    let (document, stats) = generator.generate(&geometry.manipulators, &options);

    let out_path = args
        .out
        .unwrap_or_else(|| PathBuf::from(&settings.output_name));
    fs::write(&out_path, &document)
        .with_context(|| format!("failed to write generated document to {out_path:?}"))?;

    info!(path = %out_path.display(), "wrote generated sound bank");
    println!(
        "Generated {} ({} canned blocks, {} manipulator entries from {} unique commands)",
        out_path.display(),
        stats.canned_blocks,
        stats.manipulator_entries,
        stats.unique_commands
    );
    Ok(())
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let obj_content = read_input(&args.obj, "OBJ geometry")?;
    let snd_content = read_input(&args.snd, ".snd document")?;

    let geometry = ObjGeometry::parse(&obj_content)?;
    let report = identify_changes(&snd_content, &geometry.command_map())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_update_report(&report);
    }

    if args.dry_run {
        info!("dry run, no file written");
        return Ok(());
    }

    let updated = apply_changes(&snd_content, &report.changes);
    fs::write(&args.out, &updated)
        .with_context(|| format!("failed to write updated document to {:?}", args.out))?;

    println!(
        "Wrote {} ({} coordinates updated)",
        args.out.display(),
        report.changes.len()
    );
    Ok(())
}

fn print_update_report(report: &UpdateReport) {
    println!(
        "{} entries scanned, {} matched, {} changes proposed",
        report.total_entries,
        report.matched,
        report.changes.len()
    );

    for change in &report.changes {
        let [ox, oy, oz] = change.old_xyz;
        let [nx, ny, nz] = change.new_xyz;
        println!(
            "  line {:>5}  {}  [{ox:.3} {oy:.3} {oz:.3}] -> [{nx:.3} {ny:.3} {nz:.3}]  ({})",
            change.line_index + 1,
            change.command,
            change.event_name
        );
    }

    if !report.unmatched_commands.is_empty() {
        warn!(
            count = report.unmatched_commands.len(),
            "commands in the document were not found in the OBJ"
        );
        for command in report.unmatched_commands.iter().take(5) {
            println!("  unmatched: {command}");
        }
        if report.unmatched_commands.len() > 5 {
            println!("  ... and {} more", report.unmatched_commands.len() - 5);
        }
    }
}

fn run_entries(args: EntriesArgs) -> Result<()> {
    let snd_content = read_input(&args.snd, ".snd document")?;

    let mut ids = EntryIdAllocator::new();
    let entries = parse_entries(&snd_content, &mut ids);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            let placement = match &entry.placement {
                Placement::Part(part) => format!("part {part}"),
                Placement::Xyz([x, y, z]) => format!("[{x:.3} {y:.3} {z:.3}]"),
            };
            println!(
                "{:<10} {:<45} {:<16} {placement}",
                entry.id,
                entry.event_name,
                format!("{:?}", entry.trigger)
            );
        }
        info!(entries = entries.len(), "parsed attachment entries");
    }

    if let Some(out_path) = args.canonicalize {
        // Header is everything before the first block, as-is
        let header_end = snd_content.find(BEGIN_MARKER).unwrap_or(snd_content.len());
        let canonical = render_document(&snd_content[..header_end], &entries);
        fs::write(&out_path, &canonical)
            .with_context(|| format!("failed to write canonical document to {out_path:?}"))?;
        println!("Wrote {} ({} entries)", out_path.display(), entries.len());
    }

    Ok(())
}

fn run_events(args: EventsArgs) -> Result<()> {
    let snd_content = read_input(&args.snd, ".snd document")?;
    let events = extract_event_paths(&snd_content);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for event in &events {
            println!("{event}");
        }
        info!(events = events.len(), "extracted event paths");
    }
    Ok(())
}
