//! Command-line interface for rdf-autocomplete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Replaying documents through the completion engine
//! - Listing syntaxes and vocabularies

use clap::{Parser, Subcommand};
use futures::future::join_all;
use nu_ansi_term::Color;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{builder::Builder, settings::Style};

use crate::completion::{CompletionRegistry, CompletionState, CompletionStateMachine};
use crate::config::{Config, LogLevel};
use crate::error::{ConfigError, Result};
use crate::host::{BufferHost, HostEvent, keystrokes};
use crate::vocab::{BUILTIN_VOCABULARIES, NamespaceTerm, TermIndex, builtin};

pub mod completion;

/// Suggestions shown per event in coloured replay output
const PREVIEW_ITEMS: usize = 5;

/// Autocompletion engine for RDF editors
#[derive(Parser, Debug)]
#[command(
    name = "rdf-autocomplete",
    version,
    about = "Autocompletion engine for Turtle, N-Triples, Notation3 and SPARQL",
    long_about = "Drives the incremental completion engine from the command line: replay a
document keystroke by keystroke, inspect syntaxes and load vocabulary terms."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not dereference namespaces over HTTP
    #[arg(long, global = true)]
    pub offline: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for rdf-autocomplete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Type a file into an in-memory editor and print every completion event
    Replay {
        /// Document to replay
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Syntax name or extension (derived from FILE when omitted)
        #[arg(short = 's', long, value_name = "SYNTAX")]
        syntax: Option<String>,
    },

    /// List supported syntaxes
    Syntaxes,

    /// List built-in vocabularies, or load the terms of some
    Vocab {
        /// Prefixes of built-in vocabularies or namespace URIs
        #[arg(long, value_name = "PREFIX_OR_URI", num_args = 1..)]
        load: Vec<String>,
    },

    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// One replay event in JSON output
#[derive(Serialize)]
struct ReplayRecord<'a> {
    caret: usize,
    state: CompletionState,
    #[serde(flatten)]
    event: &'a HostEvent,
}

/// End-of-replay summary in JSON output
#[derive(Serialize)]
struct ReplaySummary<'a> {
    syntax: &'static str,
    state: CompletionState,
    last_completion: CompletionState,
    prefixes: Vec<(&'a str, &'a str)>,
    blank_nodes: Vec<&'a str>,
    variables: Vec<&'a str>,
}

impl<'a> ReplaySummary<'a> {
    fn new(machine: &'a CompletionStateMachine) -> Self {
        Self {
            syntax: machine.profile().name,
            state: machine.state(),
            last_completion: machine.last_completion(),
            prefixes: machine
                .namespaces()
                .all_bindings()
                .into_iter()
                .map(|b| (b.prefix.as_str(), b.namespace_uri.as_str()))
                .collect(),
            blank_nodes: machine.blank_nodes().iter().map(String::as_str).collect(),
            variables: machine.variables().iter().map(String::as_str).collect(),
        }
    }
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Override configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        if args.offline {
            config.vocabulary.online = false;
        }
    }

    /// Run the selected subcommand
    pub async fn handle_subcommand(&self) -> Result<()> {
        match &self.args.command {
            Commands::Replay { file, syntax } => self.replay(file, syntax.as_deref()),
            Commands::Syntaxes => self.list_syntaxes(),
            Commands::Vocab { load } if load.is_empty() => self.list_vocabularies(),
            Commands::Vocab { load } => self.load_vocabularies(load).await,
            Commands::Version => {
                self.show_version();
                Ok(())
            }
            Commands::Completion { shell } => completion::generate_completion(shell),
            Commands::Config { show, validate } => self.handle_config_command(*show, *validate),
        }
    }

    fn registry(&self) -> Result<CompletionRegistry> {
        let terms = Arc::new(TermIndex::from_config(&self.config.vocabulary)?);
        let mut registry = CompletionRegistry::new(terms);
        registry.set_auto_load_terms(self.config.completion.auto_load_terms);
        Ok(registry)
    }

    /// Syntax named on the command line, else derived from the file, else the default
    fn resolve_syntax(
        &self,
        registry: &CompletionRegistry,
        file: &Path,
        syntax: Option<&str>,
    ) -> String {
        syntax
            .map(str::to_string)
            .or_else(|| registry.for_path(file).map(|p| p.name.to_string()))
            .unwrap_or_else(|| self.config.completion.default_syntax.clone())
    }

    /// Replay `file` keystroke by keystroke
    ///
    /// The document is rescanned after every line break, the way an editor
    /// would on structural changes.
    fn replay(&self, file: &Path, syntax: Option<&str>) -> Result<()> {
        let text = std::fs::read_to_string(file)?;
        let registry = self.registry()?;
        let name = self.resolve_syntax(&registry, file, syntax);
        let mut machine = registry.create(&name).ok_or_else(|| ConfigError::InvalidValue {
            field: "syntax".to_string(),
            value: name.clone(),
        })?;
        machine.set_enabled(self.config.completion.enabled);

        let mut host = BufferHost::new("");
        machine.detect_state(&host);

        for keystroke in keystrokes(&text) {
            host.type_text(&mut machine, keystroke);
            if keystroke.ends_with(['\n', '\r']) {
                machine.detect_state(&host);
            }
            for event in host.take_events() {
                self.print_event(host.caret(), machine.state(), &event)?;
            }
        }

        self.print_summary(&machine)
    }

    fn print_event(&self, caret: usize, state: CompletionState, event: &HostEvent) -> Result<()> {
        if self.args.json {
            let record = ReplayRecord {
                caret,
                state,
                event,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else if !self.args.quiet {
            println!("{}", self.format_event(caret, state, event));
        }
        Ok(())
    }

    fn format_event(&self, caret: usize, state: CompletionState, event: &HostEvent) -> String {
        match event {
            HostEvent::Shown {
                start_offset,
                items,
            } => {
                let preview: Vec<&str> = items
                    .iter()
                    .take(PREVIEW_ITEMS)
                    .map(|item| item.display_text.as_str())
                    .collect();
                let more = items.len().saturating_sub(PREVIEW_ITEMS);
                format!(
                    "{:>6}  {:<16} {} {} at {}: {}{}",
                    caret,
                    format!("{state:?}"),
                    self.paint(Color::Green, "shown"),
                    items.len(),
                    start_offset,
                    preview.join(", "),
                    if more > 0 {
                        format!(" (+{more})")
                    } else {
                        String::new()
                    }
                )
            }
            HostEvent::Ended => format!(
                "{:>6}  {:<16} {}",
                caret,
                format!("{state:?}"),
                self.paint(Color::Yellow, "ended")
            ),
        }
    }

    fn print_summary(&self, machine: &CompletionStateMachine) -> Result<()> {
        let summary = ReplaySummary::new(machine);
        if self.args.json {
            println!("{}", serde_json::json!({ "summary": summary }));
            return Ok(());
        }

        println!();
        println!("{} {}", self.paint(Color::Cyan, "Syntax:"), summary.syntax);
        println!(
            "{} {:?} (last completed: {:?})",
            self.paint(Color::Cyan, "State:"),
            summary.state,
            summary.last_completion
        );
        for (prefix, uri) in &summary.prefixes {
            println!("{} {}: <{}>", self.paint(Color::Cyan, "Prefix:"), prefix, uri);
        }
        if !summary.blank_nodes.is_empty() {
            println!(
                "{} {}",
                self.paint(Color::Cyan, "Blank nodes:"),
                summary.blank_nodes.join(" ")
            );
        }
        if !summary.variables.is_empty() {
            println!(
                "{} {}",
                self.paint(Color::Cyan, "Variables:"),
                summary.variables.join(" ")
            );
        }
        Ok(())
    }

    fn list_syntaxes(&self) -> Result<()> {
        let registry = CompletionRegistry::new(Arc::new(TermIndex::offline()));
        if self.args.json {
            let names: Vec<_> = registry
                .syntaxes()
                .into_iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name,
                        "extensions": registry.extensions_of(name),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&names)?);
        } else {
            println!("{}", syntaxes_table(&registry));
        }
        Ok(())
    }

    fn list_vocabularies(&self) -> Result<()> {
        if self.args.json {
            println!("{}", serde_json::to_string(BUILTIN_VOCABULARIES)?);
        } else {
            println!("{}", vocabularies_table());
        }
        Ok(())
    }

    /// Load several namespaces concurrently
    async fn load_vocabularies(&self, targets: &[String]) -> Result<()> {
        let namespaces: Vec<String> = targets.iter().map(|t| namespace_for(t)).collect();
        let index = TermIndex::from_config(&self.config.vocabulary)?;
        let loaded = join_all(namespaces.iter().map(|uri| index.load_terms(uri))).await;

        for (namespace_uri, terms) in namespaces.iter().zip(loaded) {
            if self.args.json {
                let record = serde_json::json!({ "namespace": namespace_uri, "terms": terms });
                println!("{}", record);
                continue;
            }

            println!(
                "{} <{}>: {} terms",
                self.paint(Color::Cyan, "Namespace"),
                namespace_uri,
                terms.len()
            );
            if !terms.is_empty() {
                println!("{}", terms_table(&terms));
            }
        }
        Ok(())
    }

    /// Show version information
    fn show_version(&self) {
        println!("rdf-autocomplete version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file()?;
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return Ok(());
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }

        Ok(())
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", toml::to_string_pretty(&self.config)?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.args.no_color {
            text.to_string()
        } else {
            color.bold().paint(text).to_string()
        }
    }
}

/// Namespace URI of a built-in prefix, or `target` itself
fn namespace_for(target: &str) -> String {
    builtin::by_prefix(target)
        .map(|v| v.namespace_uri.to_string())
        .unwrap_or_else(|| target.to_string())
}

fn syntaxes_table(registry: &CompletionRegistry) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Syntax", "Extensions", "Directives", "Variables", "Keywords"]);

    for name in registry.syntaxes() {
        let Some(profile) = registry.profile(name) else {
            continue;
        };
        let directives: Vec<String> = profile.directives.iter().map(|d| format!("@{d}")).collect();
        let sigils: String = profile.variable_sigils.iter().collect();
        builder.push_record([
            name.to_string(),
            registry.extensions_of(name).join(" "),
            directives.join(" "),
            sigils,
            profile.keywords().count().to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

fn vocabularies_table() -> String {
    let mut builder = Builder::default();
    builder.push_record(["Prefix", "Namespace", "Description"]);
    for vocabulary in BUILTIN_VOCABULARIES {
        builder.push_record([
            vocabulary.prefix,
            vocabulary.namespace_uri,
            vocabulary.description,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

fn terms_table(terms: &[NamespaceTerm]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Term", "Label"]);
    for term in terms {
        builder.push_record([
            term.local_name.as_str(),
            term.label.as_deref().unwrap_or(""),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}
