//! Rule Templates CLI
//!
//! Usage:
//!   rule-templates [OPTIONS] <COMMAND>
//!
//! Commands:
//!   validate      Validate a template group definition
//!   derive        Derive artifacts for a business rule
//!   eval          Run a rule template script and print its variables
//!   placeholders  List the placeholders in a text
//!
//! Options:
//!   -c, --config <FILE>      Engine configuration (TOML format)
//!   -l, --log-level <LEVEL>  Log level used when RUST_LOG is not set

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rule_templates::{
    EngineConfig, JsonCodec, Placeholders, ScriptEngine, TemplateGroupValidator,
    TemplateResolver,
};

#[derive(Parser)]
#[command(name = "rule-templates")]
#[command(about = "Validate and resolve business rule templates")]
struct Cli {
    /// Engine configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a template group definition
    Validate {
        /// Template group file (JSON)
        file: PathBuf,
    },
    /// Derive artifacts for a business rule created from a rule template
    Derive {
        /// Template group file (JSON)
        group: PathBuf,
        /// Business rule file (JSON)
        business_rule: PathBuf,
    },
    /// Run a script and print the variables it defines as JSON
    Eval {
        /// Script file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
    /// List the placeholder names found in a text
    Placeholders {
        /// Input file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    match &cli.command {
        Command::Validate { file } => validate(file, &config),
        Command::Derive {
            group,
            business_rule,
        } => derive(group, business_rule, &config),
        Command::Eval { file } => eval(file.as_deref(), &config),
        Command::Placeholders { file } => placeholders(file.as_deref()),
    }
}

fn validate(path: &Path, config: &EngineConfig) {
    let group = load_group(path);
    match TemplateGroupValidator::new(config).validate(&group) {
        Ok(()) => println!("Template group '{}' is valid", group.display_name()),
        Err(e) => {
            eprintln!("Error: {}", e.render(&path.display().to_string()));
            std::process::exit(1);
        }
    }
}

fn derive(group_path: &Path, rule_path: &Path, config: &EngineConfig) {
    let group = load_group(group_path);
    let rule = match JsonCodec::new().business_rule_from_template(&read_input(Some(rule_path))) {
        Ok(rule) => rule,
        Err(e) => {
            eprintln!("Error reading business rule '{}': {}", rule_path.display(), e);
            std::process::exit(1);
        }
    };
    let Some(rule_template) = group.rule_template(&rule.rule_template_uuid) else {
        eprintln!(
            "Error: rule template '{}' not found in template group '{}'",
            rule.rule_template_uuid,
            group.display_name()
        );
        std::process::exit(1);
    };

    match TemplateResolver::new(config).derive_artifacts(rule_template, &rule) {
        Ok(artifacts) => {
            for artifact in artifacts {
                match &artifact.app_name {
                    Some(name) => println!("--- {} ({})", artifact.template_type, name),
                    None => println!("--- {}", artifact.template_type),
                }
                println!("{}", artifact.content);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn eval(path: Option<&Path>, config: &EngineConfig) {
    let source = read_input(path);
    let filename = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    match ScriptEngine::new(config.script.clone()).resolve_variables(&source) {
        Ok(vars) => match serde_json::to_string_pretty(&vars) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

fn placeholders(path: Option<&Path>) {
    let text = read_input(path);
    for name in Placeholders::new().names(&text) {
        println!("{}", name);
    }
}

fn load_group(path: &Path) -> rule_templates::TemplateGroup {
    match JsonCodec::new().template_group_from_file(path) {
        Ok(group) => group,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn read_input(path: Option<&Path>) -> String {
    match path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
