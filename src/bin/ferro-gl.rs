// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-gl CLI
//!
//! Command-line interface for parsing GL Strings and lifting them between
//! IMGT/HLA database releases.

use clap::{Parser, Subcommand};
use ferro_gl::cli::{
    output_error as cli_output_error, output_error_with_context as cli_output_error_with_context,
    output_parsed, output_result, process_input_line, LiftoverArgs, LiftoverInput, OutputFormat,
};
use ferro_gl::config::{CliPolicies, GlConfig};
use ferro_gl::history::{self, AlleleHistoryIndex, DbVersion};
use ferro_gl::liftover::{liftover_with_config, LiftoverConfig, LiftoverResult};
use ferro_gl::service::{convert_and_register, GlService, GlSource, GlUri, LiftoverRequest};
use ferro_gl::{parse_gl, GlError};
use serde_json::json;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "ferro-gl")]
#[command(author, version, about = "GL String parser and IMGT/HLA liftover")]
#[command(
    long_about = "Parse GL Strings and lift them between IMGT/HLA database releases.

Examples:
  ferro-gl liftover -g 'HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01' -s 3.20.0 -t 3.25.0
  ferro-gl liftover -i donors.txt -s 3.18.0 -t 3.25.0 --format json
  ferro-gl liftover -u https://gl.nmdp.org/imgt-hla/3.20.0/genotype/1x -t 3.25.0 --register
  ferro-gl parse 'HLA-A*01:01+HLA-A*02:01^HLA-B*07:02+HLA-B*08:01'
  ferro-gl history --allele 'A*24:03:01'"
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace) or an EnvFilter directive
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Config file (default: .ferro-gl.toml or ~/.config/ferro-gl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lift GL Strings from one IMGT/HLA release to another
    Liftover {
        /// GL String to convert
        #[arg(short, long)]
        glstring: Option<String>,

        /// GL Service URI of the GL String to convert
        #[arg(short, long)]
        uri: Option<String>,

        /// JSON file with sourceUri and targetNamespace
        #[arg(short = 'f', long)]
        jsonfile: Option<String>,

        /// File with one GL String per line (use - for stdin)
        #[arg(short, long)]
        input: Option<String>,

        /// Source IMGT/HLA version (e.g. 3.20.0)
        #[arg(short, long)]
        source: Option<String>,

        /// Target IMGT/HLA version (e.g. 3.25.0)
        #[arg(short, long)]
        target: Option<String>,

        /// Allele history file (Allelelist_history.txt, optionally gzipped)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Keep only the first of identical alleles in an allele list
        #[arg(long)]
        collapse_duplicates: bool,

        /// Keep the surviving member of a genotype that lost the other
        #[arg(long)]
        degenerate_genotypes: bool,

        /// Fail when an allele does not exist at the source version
        #[arg(long)]
        strict: bool,

        /// Register source and target with the GL Service
        #[arg(long)]
        register: bool,
    },

    /// Validate GL Strings and print their canonical form
    Parse {
        /// GL String to parse
        glstring: Option<String>,

        /// File with one GL String per line (use - for stdin)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Inspect an allele history file
    History {
        /// Allele history file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Show every name this allele has carried
        #[arg(long)]
        allele: Option<String>,

        /// Version the --allele name belongs to (default: newest version that has it)
        #[arg(long)]
        version: Option<String>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    // Also installs the log -> tracing bridge for library records
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    debug!("Tracing initialized with level: {}", level);
    Ok(())
}

/// Marks a failure whose error has already been written to stderr
#[derive(Debug)]
struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error already reported")
    }
}

impl std::error::Error for Reported {}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is::<Reported>() {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => GlConfig::load_from_path(path)?,
        None => GlConfig::load().unwrap_or_default(),
    };

    match cli.command {
        Commands::Liftover {
            glstring,
            uri,
            jsonfile,
            input,
            source,
            target,
            history,
            format,
            collapse_duplicates,
            degenerate_genotypes,
            strict,
            register,
        } => {
            let args = LiftoverArgs {
                glstring,
                uri,
                jsonfile,
                input,
                source,
                target: config.target_version(target.as_deref()),
            };
            let policies = CliPolicies {
                collapse_duplicates,
                degenerate_genotypes,
                strict,
            };
            run_liftover(
                &config,
                args,
                history.as_deref(),
                policies,
                register,
                format.parse().unwrap_or_default(),
            )
        }
        Commands::Parse {
            glstring,
            input,
            format,
        } => run_parse(
            glstring.as_deref(),
            input.as_deref(),
            format.parse().unwrap_or_default(),
        ),
        Commands::History {
            history,
            allele,
            version,
            format,
        } => run_history(
            &config,
            history.as_deref(),
            allele.as_deref(),
            version.as_deref(),
            format.parse().unwrap_or_default(),
        ),
    }
}

fn load_history(
    config: &GlConfig,
    cli_path: Option<&Path>,
) -> Result<AlleleHistoryIndex, Box<dyn std::error::Error>> {
    let path = config.history_path(cli_path).ok_or(
        "No allele history file: use --history, set [history] path in the config, or set $IMGTHLA",
    )?;
    Ok(history::from_file(path)?)
}

fn run_liftover(
    config: &GlConfig,
    args: LiftoverArgs,
    history_path: Option<&Path>,
    policies: CliPolicies,
    register: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (input, warnings) = args.validate()?;
    for warning in warnings {
        warn!("{}", warning);
    }

    let index = load_history(config, history_path)?;
    let liftover_config = config.liftover_config(policies);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match input {
        LiftoverInput::GlString {
            text,
            source,
            target,
        } => {
            if register {
                let service = make_service(config)?;
                let gl_source = GlSource::Text {
                    text,
                    version: source,
                };
                return register_and_print(
                    service.as_ref(),
                    gl_source,
                    &target,
                    &index,
                    liftover_config,
                    format,
                    &mut handle,
                );
            }
            let result = report_error(
                &text,
                format,
                liftover_with_config(&text, &source, &target, &index, liftover_config),
            )?;
            output_result(&mut handle, &result, format)?;
        }
        LiftoverInput::Uri { uri: input, target } => {
            let uri = report_error(&input, format, GlUri::parse(&input))?;
            let service = make_service(config)?;
            if register {
                return register_and_print(
                    service.as_ref(),
                    GlSource::Uri(uri),
                    &target,
                    &index,
                    liftover_config,
                    format,
                    &mut handle,
                );
            }
            let result = report_error(
                &input,
                format,
                lift_uri(service.as_ref(), &uri, &target, &index, liftover_config),
            )?;
            output_result(&mut handle, &result, format)?;
        }
        LiftoverInput::JsonFile { path } => {
            let (uri, target) = report_error(&path, format, read_request(Path::new(&path)))?;
            let service = make_service(config)?;
            if register {
                return register_and_print(
                    service.as_ref(),
                    GlSource::Uri(uri),
                    &target,
                    &index,
                    liftover_config,
                    format,
                    &mut handle,
                );
            }
            let result = report_error(
                &path,
                format,
                lift_uri(service.as_ref(), &uri, &target, &index, liftover_config),
            )?;
            output_result(&mut handle, &result, format)?;
        }
        LiftoverInput::Lines {
            path,
            source,
            target,
        } => {
            let (total, errors) = for_each_line(&path, format, |text| {
                let result: LiftoverResult =
                    liftover_with_config(text, &source, &target, &index, liftover_config)?;
                output_result(&mut handle, &result, format)?;
                Ok(())
            })?;
            info!("Lifted {} GL Strings, {} errors", total - errors, errors);
        }
    }

    Ok(())
}

fn read_request(path: &Path) -> Result<(GlUri, String), GlError> {
    let request = LiftoverRequest::from_file(path)?;
    let uri = GlUri::parse(&request.source_uri)?;
    let target = request.target_version()?.to_string();
    Ok((uri, target))
}

fn lift_uri(
    service: &dyn GlService,
    uri: &GlUri,
    target: &str,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
) -> Result<LiftoverResult, GlError> {
    let text = service.fetch(uri)?;
    liftover_with_config(&text, uri.version(), target, index, config)
}

/// Write a failed conversion to stderr in the requested format
fn report_error<T>(
    input: &str,
    format: OutputFormat,
    result: Result<T, GlError>,
) -> Result<T, Box<dyn std::error::Error>> {
    result.or_else(|e| {
        output_error(input, &e, format)?;
        Err(Reported.into())
    })
}

fn register_and_print<W: Write>(
    service: &dyn GlService,
    source: GlSource,
    target: &str,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
    format: OutputFormat,
    handle: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match &source {
        GlSource::Uri(uri) => uri.to_string(),
        GlSource::Text { text, .. } => text.clone(),
    };
    let conversion = report_error(
        &input,
        format,
        convert_and_register(service, source, target, index, config),
    )?;
    match conversion.record {
        Some(record) => writeln!(handle, "{}", record.to_json_pretty()?)?,
        None => {
            output_result(handle, &conversion.result, format)?;
            eprintln!("empty target GL String, all alleles dropped");
        }
    }
    Ok(())
}

#[cfg(feature = "gl-service")]
fn make_service(config: &GlConfig) -> Result<Box<dyn GlService>, Box<dyn std::error::Error>> {
    use ferro_gl::service::HttpGlService;
    use std::time::Duration;

    let service = HttpGlService::new(
        config.service_url(),
        config.service_namespace(),
        Duration::from_secs(config.service_timeout_secs()),
    )?;
    Ok(Box::new(service))
}

#[cfg(not(feature = "gl-service"))]
fn make_service(_config: &GlConfig) -> Result<Box<dyn GlService>, Box<dyn std::error::Error>> {
    Err("GL Service access requires the gl-service feature".into())
}

fn run_parse(
    glstring: Option<&str>,
    input: Option<&str>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if let Some(text) = glstring {
        return match parse_gl(text) {
            Ok(node) => Ok(output_parsed(&mut handle, text, &node, format)?),
            Err(e) => {
                print_parse_error(text, &e, format)?;
                Err(Reported.into())
            }
        };
    }

    let path = input.unwrap_or("-");
    let (total, errors) = for_each_line(path, format, |text| {
        let node = parse_gl(text)?;
        output_parsed(&mut handle, text, &node, format)?;
        Ok(())
    })?;
    info!("Parsed {} GL Strings, {} errors", total - errors, errors);
    Ok(())
}

fn run_history(
    config: &GlConfig,
    history_path: Option<&Path>,
    allele: Option<&str>,
    version: Option<&str>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = load_history(config, history_path)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let Some(allele) = allele else {
        let versions: Vec<DbVersion> = index.versions().collect();
        match format {
            OutputFormat::Json => writeln!(handle, "{}", json!({ "versions": versions }))?,
            OutputFormat::Text => {
                for version in versions {
                    writeln!(handle, "{}\t{}", version, version.column_code())?;
                }
            }
        }
        return Ok(());
    };

    // History files store names without the namespace
    let name = allele.strip_prefix("HLA-").unwrap_or(allele);
    let id = match version {
        Some(label) => {
            let version: DbVersion = label.parse()?;
            index.lookup_id(version, name)
        }
        None => index.find_id(name).map(|(_, id)| id),
    }
    .ok_or_else(|| GlError::UnknownAllele {
        allele: allele.to_string(),
        version: version.unwrap_or("any version").to_string(),
    })?;

    let names = index.history_of(id);
    match format {
        OutputFormat::Json => {
            let names: Vec<_> = names
                .iter()
                .map(|(version, name)| json!({ "version": version, "name": name }))
                .collect();
            writeln!(handle, "{}", json!({ "id": id, "names": names }))?;
        }
        OutputFormat::Text => {
            for (version, name) in names {
                writeln!(handle, "{}\t{}\t{}", id, version, name)?;
            }
        }
    }
    Ok(())
}

/// Run `process` on every GL String in a file (or stdin for `-`), reporting
/// per-line errors to stderr. Returns the number of lines processed and failed.
fn for_each_line<F>(
    path: &str,
    format: OutputFormat,
    mut process: F,
) -> Result<(usize, usize), Box<dyn std::error::Error>>
where
    F: FnMut(&str) -> Result<(), GlError>,
{
    let reader: Box<dyn BufRead> = if path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(std::fs::File::open(path)?))
    };

    let mut total = 0;
    let mut errors = 0;
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(text) = process_input_line(&line, line_num == 0) else {
            continue;
        };
        total += 1;
        if let Err(e) = process(text) {
            output_error_with_line(text, &e, format, Some(line_num + 1))?;
            errors += 1;
        }
    }
    Ok((total, errors))
}

fn print_parse_error(input: &str, error: &GlError, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text if error.is_parse() => {
            eprintln!("ERROR: {}", error.detailed_message());
            Ok(())
        }
        _ => output_error(input, error, format),
    }
}

fn output_error(input: &str, error: &GlError, format: OutputFormat) -> io::Result<()> {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    cli_output_error(&mut handle, input, error, format)
}

fn output_error_with_line(
    input: &str,
    error: &GlError,
    format: OutputFormat,
    line_number: Option<usize>,
) -> io::Result<()> {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    cli_output_error_with_context(&mut handle, input, error, format, line_number)
}
