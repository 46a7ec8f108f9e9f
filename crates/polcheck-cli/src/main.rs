//! CLI entry point for polcheck.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and exit
//! codes. All business logic lives in the `polcheck-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use polcheck_app::{
    CheckInput, RulesInput, format_rules, run_check, run_rules, serialize_report,
    verdict_exit_code,
};
use polcheck_settings::{Overrides, ResolvedConfig};
use polcheck_types::{CheckReport, ids};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "polcheck",
    version,
    about = "Check files against their access or preservation policy rules"
)]
struct Cli {
    /// Path to polcheck config TOML (missing file means defaults).
    #[arg(long, default_value = "polcheck.toml")]
    config: Utf8PathBuf,

    /// Override the rule/file catalog path.
    #[arg(long)]
    catalog: Option<String>,

    /// Override the JSON Lines event log path.
    #[arg(long)]
    events_out: Option<String>,

    /// Override log level (trace|debug|info|warn|error). RUST_LOG takes precedence.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the policy check for one file.
    ///
    /// Exit codes: 0 = success, 1 = fail, 2 = not applicable, 3 = tool error.
    Check {
        /// Path of the file on disk; passed to direct (non-templated) commands.
        file_path: String,
        /// File UUID.
        file_uuid: String,
        /// UUID of the SIP the file belongs to.
        sip_uuid: String,

        /// Also write a JSON report here.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,
    },

    /// List the rules a check would run for a file, without running them.
    Rules {
        /// File UUID.
        file_uuid: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("polcheck error: {err:#}");
            std::process::exit(ids::EXIT_TOOL_ERROR);
        }
    };
    init_tracing(&settings.log_level, cli.json_logs);

    match cli.cmd {
        Commands::Check {
            ref file_path,
            ref file_uuid,
            ref sip_uuid,
            ref report_out,
        } => cmd_check(
            &settings,
            file_path,
            file_uuid,
            sip_uuid,
            report_out.as_deref(),
        ),
        Commands::Rules { ref file_uuid } => cmd_rules(&settings, file_uuid),
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    // Missing file is allowed (defaults apply).
    let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();
    let overrides = Overrides {
        catalog: cli.catalog.clone(),
        events: cli.events_out.clone(),
        log_level: cli.log_level.clone(),
    };
    polcheck_settings::load(&cfg_text, overrides)
        .with_context(|| format!("load config: {}", cli.config))
}

/// Logs go to stderr; stdout carries only the verdict or the rule listing.
fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn cmd_check(
    settings: &ResolvedConfig,
    file_path: &str,
    file_uuid: &str,
    sip_uuid: &str,
    report_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let output = run_check(CheckInput {
            settings,
            file_path,
            file_id: file_uuid,
            sip_id: sip_uuid,
        })?;

        if let Some(path) = report_out {
            write_report_file(path, &output.report).context("write report json")?;
        }

        for rule in &output.report.rules {
            if let Some(diagnostic) = &rule.diagnostic {
                eprintln!("{}: {}", rule.rule_id, diagnostic.trim_end());
            }
        }
        println!("{}", output.verdict().as_str());

        Ok(verdict_exit_code(output.verdict()))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "policy check aborted");
            eprintln!("polcheck error: {err:#}");
            std::process::exit(ids::EXIT_TOOL_ERROR);
        }
    }
}

fn cmd_rules(settings: &ResolvedConfig, file_uuid: &str) -> anyhow::Result<()> {
    match run_rules(RulesInput {
        settings,
        file_id: file_uuid,
    }) {
        Ok(output) => {
            print!("{}", format_rules(&output));
            Ok(())
        }
        Err(err) => {
            eprintln!("polcheck error: {err:#}");
            std::process::exit(ids::EXIT_TOOL_ERROR);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &CheckReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}
