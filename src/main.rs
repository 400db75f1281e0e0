//! Rattle CLI Entry Point
//!
//! Inspects a run configuration the way the orchestration engine will see it.
//!
//! # Usage
//!
//! ```bash
//! # List the (sample, read group) units of a config
//! rattle config.yml
//!
//! # Dry run: print the command each unit would run
//! rattle config.yml --output-dir results --input-key r1 \
//!     --output "output-{sample}-{read_group}.txt" \
//!     --command "some_exe -i {input} -o {output}"
//!
//! # Same plan as JSON
//! rattle config.yml --input-key r1 --output "{sample}.txt" --json
//!
//! # Print one config entry
//! rattle config.yml --get settings.workdir
//! ```

use std::env;
use std::process::ExitCode;

use colored::Colorize;
use log::{error, info, warn};

use rattle::paths::{has_placeholders, placeholder_names, READ_GROUP_WILDCARD, SAMPLE_WILDCARD};
use rattle::plan::plan_units;
use rattle::{Run, APP_NAME, VERSION};

/// Command used when `--command` is not given.
const DEFAULT_COMMAND: &str = "{input} -> {output}";

/// Level used when `--level` is not given.
const DEFAULT_LEVEL: &str = "read_group";

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Config {
    config_path: Option<String>,
    output_dir: Option<String>,
    input_key: Option<String>,
    level: String,
    output: Option<String>,
    command: String,
    get: Option<String>,
    json: bool,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            output_dir: None,
            input_key: None,
            level: DEFAULT_LEVEL.to_string(),
            output: None,
            command: DEFAULT_COMMAND.to_string(),
            get: None,
            json: false,
            verbose: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner to stderr, keeping stdout for results.
fn print_banner() {
    eprintln!("{} v{}", APP_NAME.bold(), VERSION);
    eprintln!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: rattle [OPTIONS] <CONFIG_FILE>");
    println!();
    println!("Arguments:");
    println!("  <CONFIG_FILE>         Path to the run config (YAML or JSON)");
    println!();
    println!("Options:");
    println!("  --output-dir PATH     Output directory (overrides 'output_dir' in the config)");
    println!("  --input-key KEY       Config key resolved as each unit's input");
    println!("  --level LEVEL         Level of --input-key: sample or read_group (default: {})", DEFAULT_LEVEL);
    println!("  --output TEMPLATE     Output file name template, e.g. '{{sample}}-{{read_group}}.txt'");
    println!("  --command TEMPLATE    Command template (default: '{}')", DEFAULT_COMMAND);
    println!("  --get PATH            Print the config entry at a dotted path, e.g. 'settings.workdir'");
    println!("  --json                Print the plan as JSON");
    println!("  --verbose             Enable debug logging");
    println!("  --help                Show this help message");
    println!("  --version             Show version information");
    println!();
    println!("Without --input-key and --output, the unit names are listed.");
}

/// Takes the value following an option.
fn option_value(args: &[String], i: &mut usize, option: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", option))
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => config.verbose = true,
            "--json" => config.json = true,
            "--output-dir" => config.output_dir = Some(option_value(args, &mut i, arg)?),
            "--input-key" => config.input_key = Some(option_value(args, &mut i, arg)?),
            "--level" => config.level = option_value(args, &mut i, arg)?,
            "--output" => config.output = Some(option_value(args, &mut i, arg)?),
            "--command" => config.command = option_value(args, &mut i, arg)?,
            "--get" => config.get = Some(option_value(args, &mut i, arg)?),
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if config.config_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.config_path = Some(arg.clone());
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Checks an output template against the number of units it must name.
///
/// Every unit writes its own file, so a template without placeholders is
/// rejected as soon as there is more than one unit. Placeholders other than
/// `{sample}` and `{read_group}` are kept literal and only warned about.
fn check_output_template(template: &str, unit_count: usize) -> Result<(), String> {
    if unit_count > 1 && !has_placeholders(template) {
        return Err(format!(
            "--output '{}' has no placeholders; {} units would write the same file",
            template, unit_count
        ));
    }

    for name in placeholder_names(template) {
        if name != SAMPLE_WILDCARD && name != READ_GROUP_WILDCARD {
            warn!("--output placeholder '{{{}}}' is not filled per unit", name);
        }
    }
    Ok(())
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);
    print_banner();

    let config_path = config
        .config_path
        .as_deref()
        .ok_or("No config file given")?;

    let mut run = Run::from_file(config_path).map_err(|e| {
        error!("Failed to load config: {}", e);
        e
    })?;

    if let Some(dir) = &config.output_dir {
        run = run.with_output_dir(dir);
    }

    info!(
        "Config loaded: {} samples, {} units",
        run.samples().len(),
        run.unit_names().len()
    );

    if let Some(dotted) = &config.get {
        let value = run
            .get(dotted)
            .ok_or_else(|| format!("No config entry at '{}'", dotted))?;
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }

    let (Some(input_key), Some(output)) = (&config.input_key, &config.output) else {
        for unit in run.unit_names() {
            println!("{}\t{}", unit.sample, unit.read_group);
        }
        return Ok(());
    };

    check_output_template(output, run.unit_names().len())?;

    let input = run.config_input_func_named(&config.level, input_key.as_str())?;
    let plan = plan_units(&run, &input, output, &config.command)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for unit_command in &plan {
            println!("{}", unit_command.command);
        }
    }

    eprintln!();
    eprintln!("{} {} units planned", "Done:".green(), plan.len());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
