//! Integration tests: tenant isolation. Every lookup is scoped by company;
//! another tenant's entities are indistinguishable from missing ones.

use kyc_core::desk::WatchlistEntryDef;
use kyc_core::{
    ClientIntake, ClientKind, ComplianceDesk, DeskConfig, DeskError, DocumentKind, DocumentUpload,
    WatchlistKind,
};

fn desk() -> ComplianceDesk {
    ComplianceDesk::in_memory(DeskConfig::default()).unwrap()
}

fn intake(name: &str) -> ClientIntake {
    ClientIntake {
        kind: ClientKind::Individual,
        full_name: name.to_string(),
        nationality: Some("NL".to_string()),
        address: Some("Keizersgracht 1".to_string()),
        identification_number: Some("NL-7".to_string()),
        trade_license: None,
        is_pep: false,
    }
}

#[test]
fn clients_are_invisible_across_tenants() {
    let mut desk = desk();
    let acme = desk.create_company("Acme", "ops").unwrap();
    let bravo = desk.create_company("Bravo", "ops").unwrap();

    let client = desk
        .onboard_client(&acme.company_id, intake("Amina Diallo"), "analyst")
        .unwrap();

    // Bravo sees nothing: not in listings, not by id.
    assert!(desk.list_clients(&bravo.company_id).unwrap().is_empty());
    let err = desk
        .get_client(&bravo.company_id, &client.client_id)
        .unwrap_err();
    assert!(matches!(err, DeskError::NotFound { kind: "client", .. }));

    let err = desk
        .begin_review(&bravo.company_id, &client.client_id, "intruder")
        .unwrap_err();
    assert!(matches!(err, DeskError::NotFound { kind: "client", .. }));

    // The Acme row is untouched.
    let stored = desk
        .store
        .get_client(&acme.company_id, &client.client_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.kyc_status, kyc_core::KycStatus::Pending);
}

#[test]
fn documents_and_screenings_are_tenant_scoped() {
    let mut desk = desk();
    let acme = desk.create_company("Acme", "ops").unwrap();
    let bravo = desk.create_company("Bravo", "ops").unwrap();
    let client = desk
        .onboard_client(&acme.company_id, intake("Amina Diallo"), "analyst")
        .unwrap();

    let doc = desk
        .add_document(
            &acme.company_id,
            &client.client_id,
            DocumentUpload {
                kind: DocumentKind::Passport,
                file_name: "passport.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                size_bytes: 9_000,
                storage_key: "docs/p.pdf".to_string(),
                expires_at: None,
            },
            "analyst",
        )
        .unwrap();
    let err = desk
        .verify_document(&bravo.company_id, &doc.document_id, "intruder")
        .unwrap_err();
    assert!(matches!(err, DeskError::NotFound { kind: "document", .. }));

    let screening = desk
        .run_screening(&acme.company_id, &client.client_id, "analyst")
        .unwrap();
    let err = desk
        .review_screening(
            &bravo.company_id,
            &screening.screening_id,
            kyc_core::ScreeningDecision::Flagged,
            "intruder",
        )
        .unwrap_err();
    assert!(matches!(err, DeskError::NotFound { kind: "screening", .. }));
}

#[test]
fn audit_and_metrics_are_per_tenant() {
    let mut desk = desk();
    let acme = desk.create_company("Acme", "ops").unwrap();
    let bravo = desk.create_company("Bravo", "ops").unwrap();

    desk.onboard_client(&acme.company_id, intake("Amina Diallo"), "analyst")
        .unwrap();
    desk.onboard_client(&acme.company_id, intake("Joao Silva"), "analyst")
        .unwrap();
    desk.onboard_client(&bravo.company_id, intake("Mei Lin"), "analyst")
        .unwrap();

    assert_eq!(desk.compliance_metrics(&acme.company_id).unwrap().clients_total, 2);
    assert_eq!(desk.compliance_metrics(&bravo.company_id).unwrap().clients_total, 1);

    // company creation + its own onboardings only
    assert_eq!(desk.store.audit_count(&acme.company_id).unwrap(), 3);
    assert_eq!(desk.store.audit_count(&bravo.company_id).unwrap(), 2);
}

#[test]
fn watchlist_is_shared_reference_data() {
    let mut desk = desk();
    let acme = desk.create_company("Acme", "ops").unwrap();
    let bravo = desk.create_company("Bravo", "ops").unwrap();
    desk.import_watchlist_entries(vec![WatchlistEntryDef {
        entry_id: "sdn-1".to_string(),
        list_name: "OFAC_SDN".to_string(),
        kind: WatchlistKind::Sanctions,
        full_name: "Viktor Orlov".to_string(),
        aliases: vec![],
        country: None,
        notes: None,
    }])
    .unwrap();

    // Both tenants screen against the same list.
    let a = desk
        .onboard_client(&acme.company_id, intake("Viktor Orlov"), "analyst")
        .unwrap();
    let b = desk
        .onboard_client(&bravo.company_id, intake("Viktor Orlov"), "analyst")
        .unwrap();
    let sa = desk.run_screening(&acme.company_id, &a.client_id, "analyst").unwrap();
    let sb = desk.run_screening(&bravo.company_id, &b.client_id, "analyst").unwrap();
    assert_eq!(sa.confidence, 100);
    assert_eq!(sb.confidence, 100);
}
