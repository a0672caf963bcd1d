//! Kindergarten API contract: command-line checker
//!
//! Validates captured API responses against the envelope contract,
//! normalizes legacy list payloads and shows how pagination parameters
//! are interpreted.
//!
//! ```sh
//! # Check saved responses (auto-detects paginated bodies)
//! api-contract check responses/teachers.json responses/classes.json
//!
//! # Check a login response read from stdin
//! curl -s -X POST .../api/auth/login -d @login.json | api-contract check --kind auth -
//!
//! # Expect a specific error code
//! api-contract check --kind error --expect-code USER_NOT_FOUND missing-user.json
//!
//! # Convert a legacy `{list, count, currentPage, limit}` payload
//! api-contract normalize legacy-page.json
//!
//! # See how raw query values are bounded
//! api-contract params --page 0 --page-size 200 --sort-order asc
//! ```

use std::collections::HashMap;
use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{debug, error, info};

use kg_api_contract::shared::types::{PAGE_PARAM, PAGE_SIZE_PARAM, SORT_BY_PARAM, SORT_ORDER_PARAM};
use kg_api_contract::{
    default_config_path, init_tracing, normalize_pagination_response, parse_pagination_params_with,
    validate_auth_response, validate_error_response, validate_pagination_response,
    validate_response, validate_standard_api_format, AppConfig, NormalizationError,
    PaginatedResponse, PaginationConfig, PaginationParams, ValidationReport,
};

/// Checks kindergarten API responses against the standard envelope contract.
#[derive(Parser, Debug)]
#[command(name = "api-contract", version)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "KG_CONTRACT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate JSON response bodies (`-` reads stdin). Exits 1 if any is invalid.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Which contract to check against.
        #[arg(long, value_enum, default_value_t = Kind::Auto)]
        kind: Kind,

        /// With `--kind error`, the expected `error.code`.
        #[arg(long)]
        expect_code: Option<String>,
    },

    /// Print the canonical paginated envelope for a legacy list payload.
    Normalize { file: PathBuf },

    /// Print the pagination parameters the API would use for raw query values.
    Params {
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        page_size: Option<String>,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long)]
        sort_order: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Envelope check, plus pagination checks when `data.items` is present
    Auto,
    Standard,
    Paginated,
    Auth,
    Error,
}

fn read_input(path: &Path) -> Result<String, std::io::Error> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

fn check_body(body: &Value, kind: Kind, expect_code: Option<&str>) -> ValidationReport {
    match kind {
        Kind::Auto => validate_response(body),
        Kind::Standard => validate_standard_api_format(body),
        Kind::Paginated => validate_pagination_response(body),
        Kind::Auth => validate_auth_response(body),
        Kind::Error => validate_error_response(body, expect_code),
    }
}

fn check_source(raw: &str, kind: Kind, expect_code: Option<&str>) -> ValidationReport {
    match serde_json::from_str::<Value>(raw) {
        Ok(body) => check_body(&body, kind, expect_code),
        Err(e) => ValidationReport::single(format!("not valid JSON: {e}")),
    }
}

/// Prints one line per file and returns how many were invalid.
fn run_check(
    files: &[PathBuf],
    kind: Kind,
    expect_code: Option<&str>,
) -> Result<usize, Box<dyn Error>> {
    let mut failed = 0usize;

    for path in files {
        let report = check_source(&read_input(path)?, kind, expect_code);

        if report.is_valid() {
            println!("✅ {}: valid", path.display());
        } else {
            failed += 1;
            println!("❌ {}: {} error(s)", path.display(), report.errors().len());
            for err in report.errors() {
                println!("   - {err}");
            }
        }
    }

    debug!(files = files.len(), failed, "Check finished");
    Ok(failed)
}

/// Unwraps a full envelope to its payload before normalizing.
fn normalize_body(body: &Value) -> Result<PaginatedResponse<Value>, NormalizationError> {
    let data = match body.get("data") {
        Some(data) if body.get("success").is_some() => data,
        _ => body,
    };
    normalize_pagination_response(data)
}

fn run_normalize(path: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let body: Value = serde_json::from_str(&read_input(path)?)?;

    match normalize_body(&body) {
        Ok(page) => {
            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{}: {}", path.display(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn resolve_params(
    config: &PaginationConfig,
    values: [(&str, Option<String>); 4],
) -> PaginationParams {
    let raw: HashMap<String, String> = values
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();
    parse_pagination_params_with(&raw, config)
}

fn run_params(
    config: &PaginationConfig,
    values: [(&str, Option<String>); 4],
) -> Result<ExitCode, Box<dyn Error>> {
    let params = resolve_params(config, values);
    println!("{}", serde_json::to_string_pretty(&params)?);
    println!("offset = {}, limit = {}", params.offset(), params.limit());
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let loaded = AppConfig::load_or_default(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    match loaded {
        Ok(_) if !config_path.exists() => {
            info!("No config file at {}, using defaults", config_path.display())
        }
        Ok(_) => debug!("Configuration loaded from {}", config_path.display()),
        Err(e) => error!(
            "Failed to load config from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    let result = match cli.command {
        Command::Check {
            files,
            kind,
            expect_code,
        } => run_check(&files, kind, expect_code.as_deref()).map(|failed| {
            if failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
        Command::Normalize { file } => run_normalize(&file),
        Command::Params {
            page,
            page_size,
            sort_by,
            sort_order,
        } => run_params(
            &config.pagination,
            [
                (PAGE_PARAM, page),
                (PAGE_SIZE_PARAM, page_size),
                (SORT_BY_PARAM, sort_by),
                (SORT_ORDER_PARAM, sort_order),
            ],
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}
