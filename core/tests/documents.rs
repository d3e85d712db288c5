//! Integration tests: document verification workflow and the risk feedback
//! loop (verified documents clear missing-* flags; expiry brings them back).

use chrono::{Duration, Utc};
use kyc_core::{
    ClientIntake, ClientKind, ComplianceDesk, DeskConfig, DeskError, DocumentKind, DocumentStatus,
    DocumentUpload,
};

fn desk() -> ComplianceDesk {
    ComplianceDesk::in_memory(DeskConfig::default()).unwrap()
}

fn upload(kind: DocumentKind, expires_at: Option<chrono::DateTime<Utc>>) -> DocumentUpload {
    DocumentUpload {
        kind,
        file_name: "scan.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        size_bytes: 10_000,
        storage_key: "docs/scan.pdf".to_string(),
        expires_at,
    }
}

/// Individual with no identification number: risk starts at 15.
fn onboard_without_id(desk: &mut ComplianceDesk, company_id: &str) -> String {
    desk.onboard_client(
        company_id,
        ClientIntake {
            kind: ClientKind::Individual,
            full_name: "Joao Silva".to_string(),
            nationality: Some("BR".to_string()),
            address: Some("Rua Augusta 900".to_string()),
            identification_number: None,
            trade_license: None,
            is_pep: false,
        },
        "analyst",
    )
    .unwrap()
    .client_id
}

#[test]
fn upload_starts_pending() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);

    let doc = desk
        .add_document(&company.company_id, &client_id, upload(DocumentKind::Passport, None), "analyst")
        .unwrap();
    assert_eq!(doc.status, DocumentStatus::Pending);
    assert!(doc.reject_reason.is_none());

    let docs = desk.list_documents(&company.company_id, &client_id).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].document_id, doc.document_id);
}

#[test]
fn verified_identification_clears_risk_flag() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);

    let before = desk
        .store
        .get_client(&company.company_id, &client_id)
        .unwrap()
        .unwrap();
    assert_eq!(before.risk_score, 15); // missing identification

    let doc = desk
        .add_document(&company.company_id, &client_id, upload(DocumentKind::Passport, None), "analyst")
        .unwrap();
    desk.verify_document(&company.company_id, &doc.document_id, "analyst")
        .unwrap();

    let after = desk
        .store
        .get_client(&company.company_id, &client_id)
        .unwrap()
        .unwrap();
    assert_eq!(after.risk_score, 0);
}

#[test]
fn rejecting_requires_reason_and_keeps_risk() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);
    let doc = desk
        .add_document(&company.company_id, &client_id, upload(DocumentKind::Passport, None), "analyst")
        .unwrap();

    let err = desk
        .reject_document(&company.company_id, &doc.document_id, "  ", "analyst")
        .unwrap_err();
    assert!(matches!(err, DeskError::Validation(_)));

    let rejected = desk
        .reject_document(&company.company_id, &doc.document_id, "photo illegible", "analyst")
        .unwrap();
    assert_eq!(rejected.status, DocumentStatus::Rejected);
    assert_eq!(rejected.reject_reason.as_deref(), Some("photo illegible"));

    let client = desk
        .store
        .get_client(&company.company_id, &client_id)
        .unwrap()
        .unwrap();
    assert_eq!(client.risk_score, 15);
}

#[test]
fn decided_documents_cannot_be_redecided() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);
    let doc = desk
        .add_document(&company.company_id, &client_id, upload(DocumentKind::Passport, None), "analyst")
        .unwrap();
    desk.verify_document(&company.company_id, &doc.document_id, "analyst")
        .unwrap();

    let err = desk
        .reject_document(&company.company_id, &doc.document_id, "changed my mind", "analyst")
        .unwrap_err();
    assert!(matches!(err, DeskError::Validation(_)));
    let err = desk
        .verify_document(&company.company_id, &doc.document_id, "analyst")
        .unwrap_err();
    assert!(matches!(err, DeskError::Validation(_)));
}

#[test]
fn expiry_sweep_restores_missing_identification_flag() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);

    let soon = Utc::now() + Duration::days(10);
    let doc = desk
        .add_document(
            &company.company_id,
            &client_id,
            upload(DocumentKind::Passport, Some(soon)),
            "analyst",
        )
        .unwrap();
    desk.verify_document(&company.company_id, &doc.document_id, "analyst")
        .unwrap();
    assert_eq!(
        desk.store
            .get_client(&company.company_id, &client_id)
            .unwrap()
            .unwrap()
            .risk_score,
        0
    );

    // Sweep before the deadline is a no-op.
    let expired = desk
        .expire_documents(&company.company_id, Utc::now(), "scheduler")
        .unwrap();
    assert!(expired.is_empty());

    // Past the deadline the document expires and the flag comes back.
    let expired = desk
        .expire_documents(&company.company_id, soon + Duration::days(1), "scheduler")
        .unwrap();
    assert_eq!(expired, vec![doc.document_id.clone()]);

    let swept = desk.get_document(&company.company_id, &doc.document_id).unwrap();
    assert_eq!(swept.status, DocumentStatus::Expired);
    assert_eq!(
        desk.store
            .get_client(&company.company_id, &client_id)
            .unwrap()
            .unwrap()
            .risk_score,
        15
    );
}

#[test]
fn invalid_uploads_are_rejected() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);

    let mut bad = upload(DocumentKind::Passport, None);
    bad.size_bytes = 0;
    let err = desk
        .add_document(&company.company_id, &client_id, bad, "analyst")
        .unwrap_err();
    assert!(matches!(err, DeskError::Validation(_)));

    let mut bad = upload(DocumentKind::Passport, None);
    bad.file_name = "".to_string();
    let err = desk
        .add_document(&company.company_id, &client_id, bad, "analyst")
        .unwrap_err();
    assert!(matches!(err, DeskError::Validation(_)));

    let err = desk
        .add_document(&company.company_id, "no-such-client", upload(DocumentKind::Passport, None), "analyst")
        .unwrap_err();
    assert!(matches!(err, DeskError::NotFound { kind: "client", .. }));
}

#[test]
fn proof_of_address_does_not_satisfy_identification() {
    let mut desk = desk();
    let company = desk.create_company("Acme", "ops").unwrap();
    let client_id = onboard_without_id(&mut desk, &company.company_id);

    let doc = desk
        .add_document(&company.company_id, &client_id, upload(DocumentKind::ProofOfAddress, None), "analyst")
        .unwrap();
    desk.verify_document(&company.company_id, &doc.document_id, "analyst")
        .unwrap();

    // Identification flag stays: a proof of address is not an identity document.
    let client = desk
        .store
        .get_client(&company.company_id, &client_id)
        .unwrap()
        .unwrap();
    assert_eq!(client.risk_score, 15);
}
