use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;
use tscodec::LocationStyle;

use tscodec_cli::{
    config::Config,
    convert::{ConvertCommand, run_convert_command},
    diff::{DiffOptions, run_diff_command},
    edit::{EditCommand, run_edit_command},
    extract::{ExtractCommand, run_extract_command},
    import::{ImportCommand, run_import_command},
    lookup::{LookupCommand, run_lookup_command},
    normalize::{NormalizeCommand, run_normalize_command},
    stats::run_stats_command,
    update::{UpdateCommand, run_update_command},
    validate::run_validate_command,
    validation::{parse_location_style, read_document},
    view::print_view,
};

const LOG_ENV: &str = "TSCODEC_LOG";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ./tscodec.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// View the messages of a translation file.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: String,

        /// Only show this context
        #[arg(long)]
        context: Option<String>,

        /// Only show messages in this state (finished, unfinished, vanished, obsolete)
        #[arg(long)]
        state: Option<String>,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },

    /// Show translation progress per file.
    Stats {
        /// Input files or glob patterns
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check files for inconsistent or broken entries.
    Validate {
        /// Input files or glob patterns
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<String>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the translations of two files.
    Diff {
        /// The earlier file
        #[arg(long)]
        source: String,

        /// The later file
        #[arg(long)]
        target: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Convert between .ts, CSV and JSON.
    Convert {
        /// The input file to process
        #[arg(short, long)]
        input: String,

        /// The output file to write the results to
        #[arg(short, long)]
        output: String,

        /// Input format, inferred from the extension by default
        #[arg(long)]
        input_format: Option<String>,

        /// Output format, inferred from the extension by default
        #[arg(long)]
        output_format: Option<String>,

        /// Target language for inputs that carry none (CSV)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Set the translation of one message.
    Edit {
        /// The file to edit
        #[arg(short, long)]
        input: String,

        /// Context name
        #[arg(long, default_value = "QObject")]
        context: String,

        /// Source text of the message
        #[arg(long)]
        source: String,

        /// Disambiguation comment of the message
        #[arg(long)]
        comment: Option<String>,

        /// Translation text; repeat for numerus forms or length variants
        #[arg(long = "value", num_args = 1, required = true)]
        values: Vec<String>,

        /// Keep the translation marked unfinished
        #[arg(long)]
        unfinished: bool,

        /// Write to this file instead of editing in place
        #[arg(short, long)]
        output: Option<String>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Translate one string the way the runtime would.
    Lookup {
        /// The translation file
        #[arg(short, long)]
        input: String,

        /// Source text to translate
        #[arg(long)]
        source: String,

        /// Context name
        #[arg(long, default_value = "QObject")]
        context: String,

        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,

        /// Count for numerus messages
        #[arg(short = 'n', long = "count", allow_negative_numbers = true)]
        count: Option<i64>,

        /// Arguments substituted for %1, %2, ...
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Also serve unfinished translations
        #[arg(long)]
        include_unfinished: bool,
    },

    /// Extract tr() strings from C++ sources into a new .ts file.
    Extract {
        /// Source files or glob patterns
        #[arg(long, num_args = 1.., required = true)]
        sources: Vec<String>,

        /// The .ts file to write
        #[arg(short, long)]
        output: String,

        /// Target language, e.g. ja_JP
        #[arg(short, long)]
        language: Option<String>,

        /// Context for tr() calls without a class qualifier
        #[arg(long)]
        default_context: Option<String>,

        /// Location style: relative, absolute or none
        #[arg(long, value_parser = parse_location_style)]
        locations: Option<LocationStyle>,
    },

    /// Merge freshly extracted strings into an existing .ts file.
    Update {
        /// Source files or glob patterns
        #[arg(long, num_args = 1.., required = true)]
        sources: Vec<String>,

        /// The .ts file to update, created when missing
        #[arg(long)]
        ts: String,

        /// Target language for a new file
        #[arg(short, long)]
        language: Option<String>,

        /// Drop messages that are gone from the code
        #[arg(long)]
        no_obsolete: bool,

        /// Location style: relative, absolute or none
        #[arg(long, value_parser = parse_location_style)]
        locations: Option<LocationStyle>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a file in canonical lupdate layout.
    Normalize {
        /// The file to normalize
        #[arg(short, long)]
        input: String,

        /// Write to this file instead of rewriting in place
        #[arg(short, long)]
        output: Option<String>,

        /// Location style: relative, absolute or none
        #[arg(long, value_parser = parse_location_style, default_value = "relative")]
        locations: LocationStyle,

        /// Sort contexts by name and messages by location
        #[arg(long)]
        sort: bool,
    },

    /// Apply a translated CSV onto a .ts file.
    Import {
        /// The .ts file to update
        #[arg(short, long)]
        input: String,

        /// CSV produced by `convert` and filled in by a translator
        #[arg(long)]
        csv: String,

        /// Store filled unfinished rows as finished
        #[arg(long)]
        mark_finished: bool,

        /// Write to this file instead of updating in place
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(commands: Commands, config: &Config) -> Result<(), String> {
    match commands {
        Commands::View {
            input,
            context,
            state,
            full,
        } => {
            let doc = read_document(&input)?;
            print_view(&doc, context.as_deref(), state.as_deref(), full)
        }
        Commands::Stats { input, json } => run_stats_command(&input, json),
        Commands::Validate {
            input,
            strict,
            json,
        } => run_validate_command(&input, strict, json, &config.validate),
        Commands::Diff {
            source,
            target,
            json,
            output,
        } => run_diff_command(DiffOptions {
            source,
            target,
            json,
            output,
        }),
        Commands::Convert {
            input,
            output,
            input_format,
            output_format,
            lang,
        } => run_convert_command(ConvertCommand {
            input,
            output,
            input_format,
            output_format,
            lang,
        }),
        Commands::Edit {
            input,
            context,
            source,
            comment,
            values,
            unfinished,
            output,
            dry_run,
        } => run_edit_command(EditCommand {
            input,
            context,
            source,
            comment,
            values,
            unfinished,
            output,
            dry_run,
        }),
        Commands::Lookup {
            input,
            source,
            context,
            comment,
            count,
            args,
            include_unfinished,
        } => {
            let mut options = config.translator.clone();
            options.include_unfinished |= include_unfinished;
            run_lookup_command(
                LookupCommand {
                    input,
                    context,
                    source,
                    comment,
                    count,
                    args,
                },
                &options,
            )
        }
        Commands::Extract {
            sources,
            output,
            language,
            default_context,
            locations,
        } => run_extract_command(
            ExtractCommand {
                sources,
                output,
                language,
                default_context,
                locations,
            },
            &config.extract,
            &config.update,
        ),
        Commands::Update {
            sources,
            ts,
            language,
            no_obsolete,
            locations,
            json,
        } => run_update_command(
            UpdateCommand {
                sources,
                ts,
                language,
                no_obsolete,
                locations,
                json,
            },
            &config.extract,
            &config.update,
        ),
        Commands::Normalize {
            input,
            output,
            locations,
            sort,
        } => run_normalize_command(NormalizeCommand {
            input,
            output,
            locations,
            sort,
        }),
        Commands::Import {
            input,
            csv,
            mark_finished,
            output,
        } => run_import_command(ImportCommand {
            input,
            csv,
            mark_finished,
            output,
        }),
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            clap_complete::generate(shell, &mut cmd, "tscodec", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(args.verbose, &config);

    if let Err(e) = run(args.commands, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
