//! kyc-admin: headless admin tool for the compliance desk.
//!
//! Usage:
//!   kyc-admin init --db desk.db
//!   kyc-admin seed-demo --db desk.db --seed 42 --clients 25
//!   kyc-admin import-watchlist --db desk.db --file watchlist.json
//!   kyc-admin sweep-expiry --db desk.db --company <id>
//!   kyc-admin report --db desk.db --company <id>
//!   kyc-admin audit --db desk.db --company <id> --limit 50

use anyhow::{bail, Result};
use kyc_core::{ComplianceDesk, DeskConfig};
use std::env;

mod demo;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(|s| s.as_str()) else {
        print_usage();
        return Ok(());
    };

    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let config = match str_arg(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };
    let mut desk = ComplianceDesk::open(db, config)?;

    match command {
        "init" => {
            // open() already migrated; just report.
            println!("database ready at {db}");
            println!("  companies: {}", desk.store.company_count()?);
            println!("  watchlist: {}", desk.watchlist_len()?);
        }
        "seed-demo" => {
            let seed = parse_arg(&args, "--seed", 42u64);
            let clients = parse_arg(&args, "--clients", 25usize);
            let company_id = demo::seed(&mut desk, seed, clients)?;
            println!("seeded demo tenant: {company_id}");
            print_report(&desk, &company_id)?;
        }
        "import-watchlist" => {
            let Some(file) = str_arg(&args, "--file") else {
                bail!("import-watchlist requires --file <path>");
            };
            let count = desk.import_watchlist(file)?;
            println!("imported {count} entries ({} total)", desk.watchlist_len()?);
        }
        "sweep-expiry" => {
            let company_id = require_company(&args)?;
            let expired = desk.expire_documents(&company_id, chrono::Utc::now(), "kyc-admin")?;
            println!("expired {} documents", expired.len());
            for id in expired {
                println!("  {id}");
            }
        }
        "report" => {
            let company_id = require_company(&args)?;
            if args.iter().any(|a| a == "--json") {
                let m = desk.compliance_metrics(&company_id)?;
                println!("{}", serde_json::to_string_pretty(&m)?);
            } else {
                print_report(&desk, &company_id)?;
            }
        }
        "audit" => {
            let company_id = require_company(&args)?;
            let limit = parse_arg(&args, "--limit", 50i64);
            for e in desk.recent_audit(&company_id, limit)? {
                println!(
                    "{} [{}] {} {} {} {}",
                    e.created_at.format("%Y-%m-%d %H:%M:%S"),
                    e.actor,
                    e.action,
                    e.entity_kind,
                    e.entity_id,
                    e.new_value.as_deref().unwrap_or("-"),
                );
            }
        }
        other => {
            eprintln!("unknown command: {other}");
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_report(desk: &ComplianceDesk, company_id: &str) -> Result<()> {
    let company = desk.get_company(company_id)?;
    let m = desk.compliance_metrics(company_id)?;

    println!("=== COMPLIANCE REPORT: {} ===", company.name);
    println!("  clients:            {}", m.clients_total);
    println!("  kyc pending:        {}", m.kyc_pending);
    println!("  kyc in review:      {}", m.kyc_in_review);
    println!("  kyc approved:       {}", m.kyc_approved);
    println!("  kyc rejected:       {}", m.kyc_rejected);
    println!("  kyc expired:        {}", m.kyc_expired);
    println!("  aml flagged:        {}", m.aml_flagged);
    println!("  aml blocked:        {}", m.aml_blocked);
    println!("  high risk clients:  {}", m.high_risk_clients);
    println!("  documents pending:  {}", m.documents_pending);
    println!("  screenings run:     {}", m.screenings_total);
    println!("  screenings matched: {}", m.screenings_matched);
    Ok(())
}

fn require_company(args: &[String]) -> Result<String> {
    match str_arg(args, "--company") {
        Some(id) => Ok(id.to_string()),
        None => bail!("this command requires --company <id>"),
    }
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn print_usage() {
    eprintln!("kyc-admin <command> [--db <path>] [--config <path>]");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  init              create/migrate the database");
    eprintln!("  seed-demo         seed a deterministic demo tenant (--seed, --clients)");
    eprintln!("  import-watchlist  upsert watchlist entries from JSON (--file)");
    eprintln!("  sweep-expiry      expire overdue documents (--company)");
    eprintln!("  report            per-tenant compliance metrics (--company, --json)");
    eprintln!("  audit             recent audit entries (--company, --limit)");
}
