mod form_cmd;

use clap::{Parser, Subcommand};

use wirekit::config;
use wirekit::logging;
use wirekit::output::print_json;
use wirekit_common::{tokenize, unquote};

#[derive(Parser)]
#[command(
    name = "wirekit",
    version,
    about = "Split quoted command lines and stream multipart/form-data bodies"
)]
struct Cli {
    /// Log config resolution and encoder details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a command line into tokens, honouring single and double quotes
    Split {
        /// The command line to split
        input: String,
        /// Print tokens as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Strip one pair of matching quotes from a value
    Unquote {
        /// The value to unquote
        input: String,
    },
    /// Encode fields as a multipart/form-data body
    Form(form_cmd::FormArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file locations searched, highest priority first
    Path,
    /// Print the effective configuration as JSON
    Show,
}

fn or_exit(r: anyhow::Result<i32>) -> i32 {
    r.unwrap_or_else(|e| {
        eprintln!("[wirekit] error: {e:#}");
        1
    })
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let loaded = config::load();
    if let Some(source) = &loaded.source {
        tracing::debug!("using config {}", source.display());
    }

    let exit_code = match &cli.command {
        Commands::Split { input, json } => cmd_split(input, *json || loaded.config.split.json),
        Commands::Unquote { input } => cmd_unquote(input),
        Commands::Form(args) => or_exit(form_cmd::cmd_form(args, &loaded.config.form)),
        Commands::Config { action } => match action {
            ConfigAction::Path => cmd_config_path(loaded.source.as_deref()),
            ConfigAction::Show => {
                print_json(&loaded.config);
                0
            }
        },
    };
    std::process::exit(exit_code);
}

fn cmd_split(input: &str, json: bool) -> i32 {
    let tokens = match tokenize(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[wirekit] error: {e}");
            return 1;
        }
    };
    if json {
        print_json(&tokens);
    } else {
        for token in &tokens {
            println!("{token}");
        }
    }
    0
}

fn cmd_unquote(input: &str) -> i32 {
    match unquote(input) {
        Ok(value) => {
            println!("{value}");
            0
        }
        Err(e) => {
            eprintln!("[wirekit] error: {e}");
            1
        }
    }
}

fn cmd_config_path(active: Option<&std::path::Path>) -> i32 {
    for path in config::search_paths() {
        let marker = if Some(path.as_path()) == active {
            "  (active)"
        } else {
            ""
        };
        println!("{}{marker}", path.display());
    }
    0
}
