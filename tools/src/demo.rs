//! Deterministic demo data seeder using curated name lists.
//!
//! Same seed, same desk content: tenant, clients, documents, watchlist,
//! and a screening run per client. Useful for trying the reports and for
//! demoing the workflow without real data.

use anyhow::Result;
use chrono::{Duration, Utc};
use kyc_core::desk::WatchlistEntryDef;
use kyc_core::{
    ClientIntake, ClientKind, ComplianceDesk, DocumentKind, DocumentUpload, WatchlistKind,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const SEED_ACTOR: &str = "demo-seeder";

const FIRST_NAMES: &[&str] = &[
    "James", "Maria", "Wei", "Amina", "Carlos", "Yuki", "Fatima", "Igor", "Priya", "Omar",
    "Elena", "Kwame", "Sofia", "Tariq", "Ingrid", "Rafael", "Leila", "Dmitri", "Chioma", "Hans",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Garcia", "Chen", "Diallo", "Santos", "Tanaka", "Haddad", "Orlov", "Patel",
    "Farouk", "Novak", "Mensah", "Rossi", "Aziz", "Larsen", "Silva", "Karimi", "Volkov",
    "Okafor", "Weber",
];

const BUSINESS_PREFIXES: &[&str] = &[
    "Meridian", "Atlas", "Crescent", "Horizon", "Summit", "Pioneer", "Sterling", "Apex",
];

const BUSINESS_SUFFIXES: &[&str] = &["Trading LLC", "Holdings Ltd", "Logistics FZE", "Capital Inc"];

const NATIONALITIES: &[&str] = &["GB", "DE", "BR", "JP", "AE", "IN", "NG", "IR", "US", "FR"];

fn full_name(rng: &mut Pcg64) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

fn business_name(rng: &mut Pcg64) -> String {
    let prefix = BUSINESS_PREFIXES[rng.gen_range(0..BUSINESS_PREFIXES.len())];
    let suffix = BUSINESS_SUFFIXES[rng.gen_range(0..BUSINESS_SUFFIXES.len())];
    format!("{prefix} {suffix}")
}

/// Seed a demo tenant and return its company id.
pub fn seed(desk: &mut ComplianceDesk, seed: u64, clients: usize) -> Result<String> {
    let mut rng = Pcg64::seed_from_u64(seed);

    let company = desk.create_company("Demo Compliance Desk", SEED_ACTOR)?;

    // A small watchlist, including one name that will collide with a
    // generated client sooner or later.
    desk.import_watchlist_entries(vec![
        WatchlistEntryDef {
            entry_id: "demo-sdn-1".to_string(),
            list_name: "OFAC_SDN".to_string(),
            kind: WatchlistKind::Sanctions,
            full_name: "Igor Orlov".to_string(),
            aliases: vec!["I. Orlov".to_string()],
            country: Some("IR".to_string()),
            notes: Some("demo entry".to_string()),
        },
        WatchlistEntryDef {
            entry_id: "demo-sdn-2".to_string(),
            list_name: "OFAC_SDN".to_string(),
            kind: WatchlistKind::Sanctions,
            full_name: "Dmitri Volkov".to_string(),
            aliases: vec![],
            country: None,
            notes: None,
        },
        WatchlistEntryDef {
            entry_id: "demo-pep-1".to_string(),
            list_name: "PEP_GLOBAL".to_string(),
            kind: WatchlistKind::Pep,
            full_name: "Fatima Aziz".to_string(),
            aliases: vec![],
            country: Some("AE".to_string()),
            notes: None,
        },
    ])?;

    for i in 0..clients {
        let is_company = rng.gen_bool(0.25);
        let nationality = NATIONALITIES[rng.gen_range(0..NATIONALITIES.len())];
        let intake = if is_company {
            ClientIntake {
                kind: ClientKind::Company,
                full_name: business_name(&mut rng),
                nationality: Some(nationality.to_string()),
                address: Some(format!("{} Market Street", rng.gen_range(1..400))),
                identification_number: Some(format!("REG-{:05}", rng.gen_range(0..100_000u32))),
                trade_license: if rng.gen_bool(0.7) {
                    Some(format!("TL-{:05}", rng.gen_range(0..100_000u32)))
                } else {
                    None
                },
                is_pep: false,
            }
        } else {
            ClientIntake {
                kind: ClientKind::Individual,
                full_name: full_name(&mut rng),
                nationality: Some(nationality.to_string()),
                address: if rng.gen_bool(0.85) {
                    Some(format!("{} High Street", rng.gen_range(1..400)))
                } else {
                    None
                },
                identification_number: if rng.gen_bool(0.6) {
                    Some(format!("ID-{:06}", rng.gen_range(0..1_000_000u32)))
                } else {
                    None
                },
                trade_license: None,
                is_pep: rng.gen_bool(0.05),
            }
        };

        let client = desk.onboard_client(&company.company_id, intake, SEED_ACTOR)?;

        // Most clients upload an identity document; most of those verify.
        if rng.gen_bool(0.75) {
            let kind = if is_company {
                DocumentKind::TradeLicense
            } else if rng.gen_bool(0.5) {
                DocumentKind::Passport
            } else {
                DocumentKind::NationalId
            };
            let doc = desk.add_document(
                &company.company_id,
                &client.client_id,
                DocumentUpload {
                    kind,
                    file_name: format!("{}-{i}.pdf", kind.as_str()),
                    content_type: "application/pdf".to_string(),
                    size_bytes: rng.gen_range(5_000i64..500_000),
                    storage_key: format!("demo/{}/{i}.pdf", client.client_id),
                    expires_at: Some(Utc::now() + Duration::days(rng.gen_range(30..1095))),
                },
                SEED_ACTOR,
            )?;
            if rng.gen_bool(0.8) {
                desk.verify_document(&company.company_id, &doc.document_id, SEED_ACTOR)?;
            }
        }

        desk.run_screening(&company.company_id, &client.client_id, SEED_ACTOR)?;
    }

    log::info!(
        "seeded demo tenant {} with {clients} clients",
        company.company_id
    );
    Ok(company.company_id)
}
