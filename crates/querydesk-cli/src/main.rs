// crates/querydesk-cli/src/main.rs
// ============================================================================
// Module: QueryDesk CLI Entry Point
// Description: Command dispatcher for ad-hoc query sessions.
// Purpose: Provide a safe, localized CLI over uploaded SQLite sources.
// Dependencies: clap, querydesk-config, querydesk-session, querydesk-sqlite.
// ============================================================================

//! ## Overview
//! The QueryDesk CLI opens a query session over a database file or SQL
//! script and runs one query, an interactive shell, or a schema listing. All
//! user-facing strings are routed through the i18n catalog. Source files are
//! untrusted and read under the configured size limit.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::IsTerminal;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use querydesk_cli::render::render_grid;
use querydesk_cli::render::render_history;
use querydesk_cli::render::render_json;
use querydesk_cli::render::render_schema;
use querydesk_cli::render::render_summary;
use querydesk_cli::t;
use querydesk_config::AuditConfig;
use querydesk_config::AuditSinkKind;
use querydesk_config::QueryDeskConfig;
use querydesk_config::config_toml_example;
use querydesk_core::InMemoryHistoryStore;
use querydesk_core::LedgerKey;
use querydesk_core::SchemaOptions;
use querydesk_session::FileAuditSink;
use querydesk_session::NoopAuditSink;
use querydesk_session::QueryOutcome;
use querydesk_session::SessionAuditSink;
use querydesk_session::SessionDeps;
use querydesk_session::SqliteSession;
use querydesk_session::StderrAuditSink;
use querydesk_session::Upload;
use querydesk_session::sample_asset;
use querydesk_sqlite::SqliteEngine;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "querydesk", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to querydesk.toml or `QUERYDESK_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one query against a source file.
    Query(QueryCommand),
    /// Start an interactive session over a source file.
    Shell(ShellCommand),
    /// List the user tables of a source file.
    Schema(SchemaCommand),
    /// Write the bundled sample database.
    Sample(SampleCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Host-provided user identity used to select a history ledger.
#[derive(Args, Debug)]
struct IdentityArgs {
    /// Display name of the user.
    #[arg(long, value_name = "NAME")]
    user: Option<String>,
    /// Email of the user (used when no name is given).
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
}

impl IdentityArgs {
    /// Resolves the history ledger key.
    fn ledger(&self) -> LedgerKey {
        LedgerKey::resolve(self.user.as_deref(), self.email.as_deref())
    }
}

/// Arguments for the `query` command.
#[derive(Args, Debug)]
struct QueryCommand {
    /// Database file (.db, .sqlite, .sqlite3, .db3) or SQL script (.sql).
    #[arg(long, value_name = "FILE")]
    source: PathBuf,
    /// User identity.
    #[command(flatten)]
    identity: IdentityArgs,
    /// Also write the result as CSV (a directory receives the suggested name).
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Query text (defaults to `session.default_query`).
    #[arg(value_name = "SQL")]
    sql: Option<String>,
}

/// Arguments for the `shell` command.
#[derive(Args, Debug)]
struct ShellCommand {
    /// Database file or SQL script.
    #[arg(long, value_name = "FILE")]
    source: PathBuf,
    /// User identity.
    #[command(flatten)]
    identity: IdentityArgs,
}

/// Arguments for the `schema` command.
#[derive(Args, Debug)]
struct SchemaCommand {
    /// Database file or SQL script.
    #[arg(long, value_name = "FILE")]
    source: PathBuf,
    /// Hide declared column types.
    #[arg(long, action = ArgAction::SetTrue)]
    no_types: bool,
    /// Hide primary/foreign key tags.
    #[arg(long, action = ArgAction::SetTrue)]
    no_key_roles: bool,
    /// Emit JSON instead of text.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

/// Arguments for the `sample` command.
#[derive(Args, Debug)]
struct SampleCommand {
    /// Destination file path.
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
    /// Overwrite an existing file.
    #[arg(long, action = ArgAction::SetTrue)]
    force: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the resolved configuration file.
    Validate,
    /// Print an example configuration file.
    Example,
}

/// Output formats for query results.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Aligned text grid with a summary line.
    Table,
    /// JSON document with columns, rows, and timing.
    Json,
    /// CSV with a deduplicated header row.
    Csv,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        stdout_line(&t!("main.version", version = version))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Query(command) => command_query(cli.config.as_deref(), command),
        Commands::Shell(command) => command_shell(cli.config.as_deref(), &command),
        Commands::Schema(command) => command_schema(cli.config.as_deref(), &command),
        Commands::Sample(command) => command_sample(&command),
        Commands::Config {
            command,
        } => command_config(cli.config.as_deref(), &command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    stdout_line("")
}

// ============================================================================
// SECTION: Session Setup
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<QueryDeskConfig> {
    QueryDeskConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds session dependencies from configuration.
fn build_deps(config: &QueryDeskConfig) -> CliResult<SessionDeps<SqliteEngine>> {
    let history = InMemoryHistoryStore::new(config.history.capacity)
        .map_err(|err| CliError::new(t!("history.init_failed", error = err)))?;
    let engine = SqliteEngine::new(config.loader.to_options());
    Ok(SessionDeps::new(Arc::new(engine), Arc::new(history))
        .with_audit(build_audit_sink(&config.audit)?)
        .with_query_text_logging(config.audit.log_query_text))
}

/// Selects the audit sink configured under `[audit]`.
fn build_audit_sink(config: &AuditConfig) -> CliResult<Arc<dyn SessionAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Arc::new(sink))
        }
        (AuditSinkKind::File, None) => Err(CliError::new(t!(
            "audit.open_failed",
            path = "",
            error = "audit.path is required"
        ))),
    }
}

/// Reads `path` and opens a session over it.
fn open_session(
    config: &QueryDeskConfig,
    path: &Path,
    ledger: LedgerKey,
) -> CliResult<SqliteSession> {
    let bytes = read_bytes_with_limit(path, config.loader.max_source_bytes).map_err(|err| {
        let error = match err {
            ReadLimitError::Io(error) => error.to_string(),
            ReadLimitError::TooLarge {
                size,
                limit,
            } => format!("file is {size} bytes (limit {limit})"),
        };
        CliError::new(t!("input.read_failed", path = path.display(), error = error))
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy().into_owned(), |name| name.to_string_lossy().into_owned());
    let deps = build_deps(config)?;
    SqliteSession::open(Upload::new(file_name, bytes), ledger, deps)
        .map_err(|err| CliError::new(t!("source.load_failed", path = path.display(), error = err)))
}

// ============================================================================
// SECTION: Query Command
// ============================================================================

/// Executes the `query` command.
fn command_query(config_path: Option<&Path>, command: QueryCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let mut session = open_session(&config, &command.source, command.identity.ledger())?;
    let sql = command.sql.unwrap_or_else(|| config.session.default_query.clone());
    let Some(outcome) = submit(&mut session, &sql)? else {
        stdout_line(&t!("query.empty"))?;
        return Ok(ExitCode::SUCCESS);
    };

    match command.format {
        OutputFormat::Table => print_outcome(&outcome)?,
        OutputFormat::Json => {
            let json = render_json(&outcome.result, outcome.elapsed_ms)
                .map_err(|err| CliError::new(t!("query.serialize_failed", error = err)))?;
            stdout_line(&json)?;
        }
        OutputFormat::Csv => {
            if let Some(export) = export_bytes(&session)? {
                write_stdout_bytes(&export.1)
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }

    if let Some(target) = &command.export {
        export_to(&session, target)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Submits one query, mapping failures to localized errors.
fn submit(session: &mut SqliteSession, sql: &str) -> CliResult<Option<QueryOutcome>> {
    session.submit(sql).map_err(|err| CliError::new(t!("query.failed", error = err)))
}

/// Prints a result grid followed by its summary line.
fn print_outcome(outcome: &QueryOutcome) -> CliResult<()> {
    let grid = render_grid(&outcome.result);
    if !grid.is_empty() {
        stdout_line(&grid)?;
    }
    stdout_line(&render_summary(outcome.shape, outcome.elapsed_ms))
}

/// Returns the suggested file name and CSV bytes of the last result.
fn export_bytes(session: &SqliteSession) -> CliResult<Option<(String, Vec<u8>)>> {
    let export =
        session.export_csv().map_err(|err| CliError::new(t!("export.failed", error = err)))?;
    Ok(export.map(|export| (export.file_name, export.bytes)))
}

/// Writes the last result as CSV to `target`, or into it when it is a directory.
fn export_to(session: &SqliteSession, target: &Path) -> CliResult<()> {
    let Some((file_name, bytes)) = export_bytes(session)? else {
        return stderr_line(&t!("export.none"));
    };
    let path = if target.is_dir() { target.join(file_name) } else { target.to_path_buf() };
    fs::write(&path, bytes).map_err(|err| {
        CliError::new(t!("export.write_failed", path = path.display(), error = err))
    })?;
    let rows = session.last_result().map_or(0, querydesk_core::QueryResult::row_count);
    stderr_line(&t!("export.ok", rows = rows, path = path.display()))
}

// ============================================================================
// SECTION: Shell Command
// ============================================================================

/// One classified line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellInput<'a> {
    /// Blank line.
    Empty,
    /// `.quit` or `.exit`.
    Quit,
    /// `.schema`.
    Schema,
    /// `.history`.
    History,
    /// `.export [PATH]`.
    Export(Option<&'a str>),
    /// Unrecognized meta-command.
    Unknown(&'a str),
    /// SQL submission.
    Query(&'a str),
}

/// Classifies a line of shell input.
fn classify_line(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellInput::Empty;
    }
    let Some(meta) = trimmed.strip_prefix('.') else {
        return ShellInput::Query(trimmed);
    };
    let (command, argument) = match meta.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, Some(rest.trim()).filter(|rest| !rest.is_empty())),
        None => (meta, None),
    };
    match command {
        "quit" | "exit" => ShellInput::Quit,
        "schema" => ShellInput::Schema,
        "history" => ShellInput::History,
        "export" => ShellInput::Export(argument),
        _ => ShellInput::Unknown(trimmed),
    }
}

/// Executes the `shell` command.
fn command_shell(config_path: Option<&Path>, command: &ShellCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let mut session = open_session(&config, &command.source, command.identity.ledger())?;
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        stdout_line(&t!("shell.banner", source = session.source_name()))?;
        stdout_line(&t!("shell.hint", query = config.session.default_query))?;
    }

    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        if interactive {
            write_stdout_bytes(t!("shell.prompt").as_bytes())
                .and_then(|()| std::io::stdout().flush())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|err| CliError::new(t!("shell.read_failed", error = err)))?;
        if read == 0 {
            break;
        }
        match classify_line(&line) {
            ShellInput::Empty => {}
            ShellInput::Quit => break,
            ShellInput::Schema => shell_step(print_schema(&session, config.schema.options(), false))?,
            ShellInput::History => shell_step(print_history(&session))?,
            ShellInput::Export(Some(target)) => shell_step(export_to(&session, Path::new(target)))?,
            ShellInput::Export(None) => stderr_line(&t!("export.usage"))?,
            ShellInput::Unknown(command) => {
                stderr_line(&t!("shell.unknown_command", command = command))?;
            }
            ShellInput::Query(sql) => {
                let step = submit(&mut session, sql)
                    .and_then(|outcome| outcome.map_or(Ok(()), |outcome| print_outcome(&outcome)));
                shell_step(step)?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Reports a failed shell step on stderr and keeps the loop running.
fn shell_step(step: CliResult<()>) -> CliResult<()> {
    match step {
        Ok(()) => Ok(()),
        Err(err) => stderr_line(&err.to_string()),
    }
}

/// Prints the session's history with the shared-ledger warning when needed.
fn print_history(session: &SqliteSession) -> CliResult<()> {
    let records =
        session.history().map_err(|err| CliError::new(t!("history.failed", error = err)))?;
    stdout_line(&render_history(session.ledger().as_str(), &records, session.is_shared_history()))
}

// ============================================================================
// SECTION: Schema Command
// ============================================================================

/// Executes the `schema` command.
fn command_schema(config_path: Option<&Path>, command: &SchemaCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let session = open_session(&config, &command.source, LedgerKey::Shared)?;
    let mut options = config.schema.options();
    if command.no_types {
        options.include_types = false;
    }
    if command.no_key_roles {
        options.include_key_roles = false;
    }
    print_schema(&session, options, command.json)?;
    Ok(ExitCode::SUCCESS)
}

/// Describes the session's source and prints it.
fn print_schema(session: &SqliteSession, options: SchemaOptions, json: bool) -> CliResult<()> {
    let tables =
        session.schema(options).map_err(|err| CliError::new(t!("schema.failed", error = err)))?;
    if json {
        let payload = serde_json::to_string_pretty(&tables)
            .map_err(|err| CliError::new(t!("query.serialize_failed", error = err)))?;
        return stdout_line(&payload);
    }
    stdout_line(&render_schema(&tables))
}

// ============================================================================
// SECTION: Sample Command
// ============================================================================

/// Executes the `sample` command.
fn command_sample(command: &SampleCommand) -> CliResult<ExitCode> {
    let sample = sample_asset();
    let path = if command.output.is_dir() {
        command.output.join(sample.file_name)
    } else {
        command.output.clone()
    };
    if path.exists() && !command.force {
        return Err(CliError::new(t!("sample.exists", path = path.display())));
    }
    fs::write(&path, sample.bytes).map_err(|err| {
        CliError::new(t!("sample.write_failed", path = path.display(), error = err))
    })?;
    stdout_line(&t!("sample.ok", path = path.display()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(config_path: Option<&Path>, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            load_config(config_path)?;
            stdout_line(&t!("config.validate.ok"))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes a line to stdout, mapping failures to a localized error.
fn stdout_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr, mapping failures to a localized error.
fn stderr_line(message: &str) -> CliResult<()> {
    write_stderr_line(message).map_err(|err| CliError::new(output_error("stderr", &err)))
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
