use crate::common::GenerationParams;
use crate::config::Config;
use crate::engines::{BackendFamily, SUPPORTED_ENGINES, resolve};
use crate::generator::generate;
use crate::llm::Dispatcher;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::ui::{self, ConsoleNotifier};
use crate::log_debug;
use anyhow::{Result, anyhow};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const LOG_FILE: &str = "tftest-gen-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Terraform LLM Test Generator",
    long_about = "Generate Terraform .tftest.hcl test cases and coverage reports using GPT, Claude, Gemini, Mistral, or the Hugging Face proxy.",
    after_help = get_dynamic_help(),
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, waiting messages, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Use a specific configuration file
    #[arg(long = "config", global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate tests for a Terraform module
    #[command(
        about = "Generate .tftest.hcl tests using AI",
        long_about = "Send the Terraform module to the selected LLM engine and write the generated .tftest.hcl file.",
        after_help = get_dynamic_help()
    )]
    Generate {
        #[command(flatten)]
        params: GenerationParams,

        /// Directory the test file is written to
        #[arg(
            short,
            long,
            default_value = ".",
            help = "Directory to write the generated test file to"
        )]
        output_dir: PathBuf,

        /// Print the generated test file to stdout instead of writing it
        #[arg(short, long, help = "Print the generated test file to stdout and exit")]
        print: bool,

        /// Also print the raw model response
        #[arg(long, help = "Also print the raw model response")]
        raw: bool,
    },

    /// Show the prompt that would be sent
    #[command(about = "Print the prompt without calling an LLM")]
    Prompt {
        #[command(flatten)]
        params: GenerationParams,
    },

    /// List supported engines
    #[command(about = "List supported LLM engines and their backends")]
    Engines,

    /// Configure backend endpoints and the Hugging Face proxy model
    #[command(about = "Configure tftest-gen settings")]
    Config {
        /// Override a backend base URL
        #[arg(
            long = "base-url",
            help = "Set a backend base URL (family=url, e.g. openai=http://localhost:8080/v1)"
        )]
        base_urls: Vec<String>,

        /// Model used for the Hugging Face proxy
        #[arg(long, help = "Model that serves the huggingface engine")]
        proxy_model: Option<String>,

        /// Print the current configuration
        #[arg(short, long, help = "Print the current configuration")]
        print: bool,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Help footer listing the available engines
fn get_dynamic_help() -> String {
    let engines = SUPPORTED_ENGINES
        .iter()
        .map(|e| format!("{}", e.bold()))
        .collect::<Vec<_>>()
        .join(" • ");

    format!("\nAvailable LLM Engines: {engines}")
}

/// Main function to parse arguments and handle the command
pub async fn main() -> Result<()> {
    let cli = parse_args();

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command, cli.config.as_deref()).await
    } else {
        let _ = Cli::parse_from(["tftest-gen", "--help"]);
        Ok(())
    }
}

/// Dispatch a parsed subcommand
pub async fn handle_command(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Generate {
            params,
            output_dir,
            print,
            raw,
        } => handle_generate(params, config_path, &output_dir, print, raw).await,
        Commands::Prompt { params } => handle_prompt(params),
        Commands::Engines => handle_engines(config_path),
        Commands::Config {
            base_urls,
            proxy_model,
            print,
        } => handle_config(config_path, &base_urls, proxy_model, print),
    }
}

async fn handle_generate(
    params: GenerationParams,
    config_path: Option<&Path>,
    output_dir: &Path,
    print: bool,
    raw: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let request = params.into_request()?;

    let notifier = Arc::new(ConsoleNotifier::new());
    let dispatcher = Dispatcher::new(config, Arc::clone(&notifier) as Arc<dyn ui::Notifier>);

    let spinner = ui::create_spinner(&format!(
        "Generating {} for {} {} using {}...",
        request.mode.label().to_lowercase(),
        request.provider,
        request.service,
        request.engine
    ));
    notifier.attach_spinner(&spinner);
    let generation = generate(&dispatcher, request).await;
    notifier.detach_spinner();
    spinner.finish_and_clear();

    if print {
        println!("{}", generation.artifact_content());
        return Ok(());
    }

    if generation.response.is_error() {
        ui::print_warning("Test generation finished with errors");
    } else {
        ui::print_success("Test generation completed successfully!");
    }

    if raw {
        ui::print_bordered(&generation.response.raw_text);
    }
    ui::print_message(&ui::format_result(&generation.parsed, generation.request.mode));

    let path = generation.write_artifact(output_dir)?;
    ui::print_info(&format!("Saved {}", path.display()));
    Ok(())
}

fn handle_prompt(params: GenerationParams) -> Result<()> {
    let request = params.into_request()?;
    log_debug!("Printing prompt for {} mode", request.mode);
    println!("{}", "System:".bold());
    println!("{SYSTEM_PROMPT}");
    println!();
    println!("{}", "User:".bold());
    println!("{}", build_prompt(&request));
    Ok(())
}

fn handle_engines(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    for engine in SUPPORTED_ENGINES {
        let route = resolve(engine, &config.huggingface_proxy_model);
        let family = route.family().map_or("none", |f| f.name());
        let model = route.model().unwrap_or("-");
        println!("{:<20} {:<10} {}", engine.bold(), family.cyan(), model.dimmed());
    }
    Ok(())
}

fn handle_config(
    config_path: Option<&Path>,
    base_urls: &[String],
    proxy_model: Option<String>,
    print: bool,
) -> Result<()> {
    // Read the file alone so environment credentials are never written back
    let file_path = config_path
        .map(Path::to_path_buf)
        .or_else(Config::default_config_path)
        .ok_or_else(|| anyhow!("Unable to determine config directory"))?;
    let mut config = if file_path.exists() {
        Config::from_file(&file_path)?
    } else {
        Config::default()
    };

    let mut changes_made = false;
    for entry in base_urls {
        let (name, url) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid base URL '{}'. Expected family=url", entry))?;
        let family = BackendFamily::ALL
            .iter()
            .find(|f| f.name() == name.trim())
            .copied()
            .ok_or_else(|| anyhow!("Unknown backend family: {}", name))?;
        config.set_base_url(family, url.trim());
        changes_made = true;
    }

    if let Some(model) = proxy_model {
        config.huggingface_proxy_model = model;
        changes_made = true;
    }

    if changes_made {
        let saved = config.save(Some(file_path.as_path()))?;
        ui::print_success(&format!("Configuration saved to {}", saved.display()));
    }

    if print || !changes_made {
        print_configuration(&config);
    }
    Ok(())
}

fn print_configuration(config: &Config) {
    let mut config = config.clone();
    config.apply_env(|key| std::env::var(key).ok());

    println!("{}", "Backends".bold());
    for family in BackendFamily::ALL {
        let key_state = if config.api_key(*family).is_some() {
            "set".green()
        } else {
            format!("unset ({})", family.api_key_env()).yellow()
        };
        println!(
            "  {:<10} {} key: {}",
            family.name().cyan(),
            config.base_url(*family),
            key_state
        );
    }
    println!(
        "{} {}",
        "Hugging Face proxy model:".bold(),
        config.huggingface_proxy_model
    );
}
