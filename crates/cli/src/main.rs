use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use prefix_renamer_core::{
    app_paths, apply_plan_with_control, default_log_name, load_config, log_rows, plan_files,
    plan_folder, write_csv_log, ApplyOptions, CancelFlag, CollisionPolicy, PlanEntry, PlanOptions,
    RenamePlan,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "prefix-renamer-cli")]
#[command(about = "Prepends a prefix to file names that match a regular expression")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Run(RunArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long)]
    folder: Option<String>,
    #[arg(long, num_args = 1..)]
    files: Vec<String>,
    #[arg(long, default_value = "RAG")]
    pattern: String,
    #[arg(long, default_value = "AI_")]
    prefix: String,
    #[arg(long, default_value_t = false)]
    recursive: bool,
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, default_value_t = false)]
    ignore_case: bool,
    #[arg(long, default_value_t = false)]
    word_only: bool,
    #[arg(long, value_enum, default_value_t = CollisionArg::Skip)]
    collision: CollisionArg,
    #[arg(long, default_value_t = false)]
    include_prefixed: bool,
    #[arg(long, default_value_t = false)]
    yes: bool,
    #[arg(long, default_value_t = false)]
    log_csv: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CollisionArg {
    Skip,
    Overwrite,
    Number,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(value: CollisionArg) -> Self {
        match value {
            CollisionArg::Skip => CollisionPolicy::Skip,
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Number => CollisionPolicy::Number,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let options = PlanOptions {
        pattern: args.pattern,
        prefix: args.prefix,
        recursive: args.recursive,
        ignore_case: args.ignore_case,
        whole_word: args.word_only,
        skip_already_prefixed: !args.include_prefixed,
        collision: args.collision.into(),
    };

    let (plan, log_dir) = match (&args.folder, &args.files[..]) {
        (Some(folder), []) => {
            let folder = PathBuf::from(folder);
            let plan = plan_folder(&folder, &options)?;
            (plan, folder)
        }
        (None, files @ [first, ..]) => {
            let paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
            let log_dir = Path::new(first)
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            (plan_files(&paths, &options)?, log_dir)
        }
        _ => anyhow::bail!("pass exactly one of --folder or --files"),
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Table => print_table(&plan),
    }

    if !args.dry_run && plan.stats.to_rename > 0 && !args.yes {
        let prompt = format!("rename {} file(s) now? (y/n): ", plan.stats.to_rename);
        if !ask_yes_no(&prompt)? {
            eprintln!("cancelled.");
            return Ok(());
        }
    }

    let report = apply_plan_with_control(
        &plan,
        &ApplyOptions {
            dry_run: args.dry_run,
        },
        &CancelFlag::new(),
        |record| {
            println!(
                "[{}] {} -> {}",
                record.status.as_str(),
                record.original_path.display(),
                record.final_path.display()
            );
        },
    );

    if args.log_csv {
        let log_path = log_dir.join(default_log_name(Local::now()));
        let rows = log_rows(&plan, &report.records);
        match write_csv_log(&log_path, &rows) {
            Ok(()) => eprintln!("CSV log written: {}", log_path.display()),
            Err(err) => eprintln!("could not write the CSV log: {err:#}"),
        }
    }

    eprintln!(
        "\nscanned={} matched={} renamed={} simulated={} collision_skipped={} failed={}",
        plan.stats.scanned,
        plan.stats.matched,
        report.summary.renamed,
        report.summary.simulated,
        plan.stats.collision_skipped,
        report.summary.failed
    );

    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    println!("current -> new (reason)");

    let mut entries: Vec<&PlanEntry> = plan.entries.iter().collect();
    entries.sort_by_key(|entry| {
        (
            !entry.will_rename(),
            entry.decision.label(),
            entry
                .original_path
                .file_name()
                .map(|name| name.to_string_lossy().to_lowercase()),
        )
    });

    for entry in entries {
        println!(
            "{} -> {} ({})",
            entry.original_path.display(),
            entry.target_path.display(),
            entry.decision.label()
        );
    }

    println!(
        "\ntotals: scanned={} matched={} to_rename={} already_prefixed={} no_match={} collision_skipped={}",
        plan.stats.scanned,
        plan.stats.matched,
        plan.stats.to_rename,
        plan.stats.already_prefixed,
        plan.stats.no_match,
        plan.stats.collision_skipped
    );
}

fn ask_yes_no(prompt: &str) -> Result<bool> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => eprintln!("answer y or n."),
        }
    }
}
