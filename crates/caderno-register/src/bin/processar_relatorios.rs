//! # Report Batch Processor
//!
//! Command-line entry point for scheduled report consolidation.
//!
//! ## Usage
//! ```bash
//! # Default: consolidate yesterday + current month
//! cargo run -p caderno-register --bin processar_relatorios
//!
//! # Explicit date / month
//! cargo run -p caderno-register --bin processar_relatorios -- --data 2025-08-12
//! cargo run -p caderno-register --bin processar_relatorios -- --mes 2025-08
//!
//! # Relative targets (combinable)
//! cargo run -p caderno-register --bin processar_relatorios -- --ontem --mes-atual
//! cargo run -p caderno-register --bin processar_relatorios -- --hoje
//!
//! # Database path
//! cargo run -p caderno-register --bin processar_relatorios -- --db ./caderno.db
//! ```
//!
//! Exit code is non-zero only when every unit failed; a single failing unit
//! is reported but does not abort the rest.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use caderno_core::SystemClock;
use caderno_db::{Database, DbConfig};
use caderno_register::{run_batch, BatchTarget, ReportConsolidator};

fn parse_month(arg: &str) -> Option<BatchTarget> {
    let (year, month) = arg.split_once('-')?;
    Some(BatchTarget::Month {
        year: year.parse().ok()?,
        month: month.parse().ok()?,
    })
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Invocation {
    Help,
    Run { targets: Vec<BatchTarget>, db_path: String },
}

/// Parses the arguments after the program name. A flag that takes a value
/// and is given none is an error, same as a malformed value.
fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut targets: Vec<BatchTarget> = Vec::new();
    let mut db_path = String::from("./caderno.db");

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                let raw = args
                    .get(i + 1)
                    .ok_or_else(|| "--data requer um valor (YYYY-MM-DD)".to_string())?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("Data inválida: {raw} (esperado YYYY-MM-DD)"))?;
                targets.push(BatchTarget::Day(date));
                i += 1;
            }
            "--mes" => {
                let raw = args
                    .get(i + 1)
                    .ok_or_else(|| "--mes requer um valor (YYYY-MM)".to_string())?;
                let target = parse_month(raw)
                    .ok_or_else(|| format!("Mês inválido: {raw} (esperado YYYY-MM)"))?;
                targets.push(target);
                i += 1;
            }
            "--ontem" => targets.push(BatchTarget::Yesterday),
            "--hoje" => targets.push(BatchTarget::Today),
            "--mes-atual" => targets.push(BatchTarget::CurrentMonth),
            "--db" | "-d" => {
                let raw = args
                    .get(i + 1)
                    .ok_or_else(|| "--db requer um caminho".to_string())?;
                db_path = raw.clone();
                i += 1;
            }
            "--help" | "-h" => return Ok(Invocation::Help),
            other => return Err(format!("Opção desconhecida: {other}")),
        }
        i += 1;
    }

    if targets.is_empty() {
        targets = BatchTarget::default_set();
    }

    Ok(Invocation::Run { targets, db_path })
}

fn print_help() {
    println!("Processador de Relatórios do Caderno");
    println!();
    println!("Usage: processar_relatorios [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --data <YYYY-MM-DD>   Consolida o relatório diário da data");
    println!("  --mes <YYYY-MM>       Consolida o relatório mensal do mês");
    println!("  --ontem               Consolida o dia de ontem");
    println!("  --hoje                Consolida o dia de hoje");
    println!("  --mes-atual           Consolida o mês corrente");
    println!("  --db <PATH>           Arquivo do banco (default: ./caderno.db)");
    println!("  -h, --help            Mostra esta ajuda");
    println!();
    println!("Sem opções de alvo: ontem + mês corrente.");
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let (targets, db_path) = match parse_args(&args) {
        Ok(Invocation::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run { targets, db_path }) => (targets, db_path),
        Err(msg) => {
            eprintln!("{msg}");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let db = match Database::new(DbConfig::new(&db_path)).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Falha ao abrir o banco {db_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let consolidator = ReportConsolidator::new(db, Arc::new(SystemClock));
    let outcomes = run_batch(&consolidator, &targets).await;

    println!();
    println!("Processamento de relatórios");
    println!("===========================");
    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => println!("✓ {}: {}", outcome.label, summary),
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", outcome.label, e);
            }
        }
    }
    println!();
    println!("{} de {} unidades concluídas", outcomes.len() - failures, outcomes.len());

    if failures == outcomes.len() && !outcomes.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
