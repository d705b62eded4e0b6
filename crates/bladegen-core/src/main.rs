use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use bladegen_core::{
    load_instructions, ExperimentGenerator, GenerationReport, GeneratorConfig, ScopeCatalog,
    TargetCatalog, DEMO_INSTRUCTIONS,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Command::new("bladegen")
        .version(bladegen_core::VERSION)
        .about("Turn natural-language fault descriptions into ChaosBlade experiment YAML")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("gen")
                .about("Generate a document from one instruction")
                .arg(
                    Arg::new("instruction")
                        .required(true)
                        .help("Fault description, Chinese or English"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the YAML under this directory"),
                )
                .arg(
                    Arg::new("all-scopes")
                        .long("all-scopes")
                        .action(ArgAction::SetTrue)
                        .help("Render once per scope the target supports"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the full report as JSON"),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Generate documents for every line of an instruction file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File with one instruction per line"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the YAML files under this directory"),
                ),
        )
        .subcommand(Command::new("demo").about("Run the four built-in demo instructions"))
        .subcommand(Command::new("catalog").about("Print the scope and target tables"));

    let matches = cli.get_matches();

    let exit_code = match matches.subcommand() {
        Some(("gen", args)) => run_gen(args).await,
        Some(("batch", args)) => match run_batch(args).await {
            Ok(all_ok) => i32::from(!all_ok),
            Err(err) => {
                eprintln!("error: {err:#}");
                1
            }
        },
        Some(("demo", _)) => run_demo().await,
        Some(("catalog", _)) => {
            print_catalog();
            0
        }
        _ => 0,
    };

    std::process::exit(exit_code);
}

async fn run_gen(args: &ArgMatches) -> i32 {
    let instruction = args.get_one::<String>("instruction").unwrap();

    let mut config = GeneratorConfig::new();
    if let Some(out) = args.get_one::<PathBuf>("out") {
        config = config.with_output_dir(out);
    }
    let generator = ExperimentGenerator::new(config);

    let reports = if args.get_flag("all-scopes") {
        generator.generate_all_scopes(instruction).await
    } else {
        vec![generator.generate(instruction).await]
    };

    let as_json = args.get_flag("json");
    let mut all_ok = true;
    for report in &reports {
        all_ok &= report.succeeded();
        if as_json {
            match serde_json::to_string_pretty(report) {
                Ok(encoded) => println!("{encoded}"),
                Err(err) => {
                    eprintln!("failed to encode report: {err}");
                    all_ok = false;
                }
            }
        } else {
            print_report(report);
        }
    }

    i32::from(!all_ok)
}

async fn run_batch(args: &ArgMatches) -> anyhow::Result<bool> {
    let file = args.get_one::<PathBuf>("file").unwrap();

    let instructions = load_instructions(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    if instructions.is_empty() {
        println!("no instructions in {}", file.display());
        return Ok(true);
    }

    let mut config = GeneratorConfig::new();
    if let Some(out) = args.get_one::<PathBuf>("out") {
        config = config.with_output_dir(out);
    }
    let generator = ExperimentGenerator::new(config);

    let reports = generator.generate_many(&instructions).await;
    let succeeded = reports.iter().filter(|r| r.succeeded()).count();

    for report in &reports {
        print_report(report);
        println!();
    }
    println!("{succeeded}/{} instructions succeeded", reports.len());

    Ok(succeeded == reports.len())
}

async fn run_demo() -> i32 {
    let generator = ExperimentGenerator::new(GeneratorConfig::new());

    let mut all_ok = true;
    for instruction in DEMO_INSTRUCTIONS {
        let report = generator.generate(instruction).await;
        all_ok &= report.succeeded();
        print_report(&report);
        println!();
    }

    i32::from(!all_ok)
}

fn print_report(report: &GenerationReport) {
    println!("instruction: {}", report.instruction);
    println!("intent: {}", report.intent.summary());
    for warning in &report.document.warnings {
        println!("warning: {warning}");
    }
    if report.document.success {
        println!();
        print!("{}", report.document.content);
        for path in &report.document.written_paths {
            println!("wrote {}", path.display());
        }
    } else if let Some(error) = &report.document.error {
        println!("error: {error}");
    }
}

fn print_catalog() {
    println!("scopes (priority order):");
    for schema in ScopeCatalog::global().all() {
        println!(
            "  {:<10} required: {:<18} optional: {:<34} defaults: {}",
            schema.id.to_string(),
            schema.required_params.join(", "),
            schema.optional_params.join(", "),
            schema
                .default_params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    println!();
    println!("targets (declaration order):");
    for schema in TargetCatalog::global().all() {
        let scopes = schema
            .supported_scopes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {:<10} scopes: {scopes}", schema.id.to_string());
    }
}
