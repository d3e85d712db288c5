//! Identity document workflow: upload metadata, verification decisions,
//! and the expiry sweep.
//!
//! Verifying or rejecting an identification / trade-license document feeds
//! the risk flags, so those paths re-derive the client's risk profile.

use crate::desk::ComplianceDesk;
use crate::error::{DeskError, DeskResult};
use crate::store::DocumentRow;
use crate::types::{DocumentKind, DocumentStatus};
use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

/// Upload metadata; the file bytes are already in blob storage under
/// `storage_key`.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ComplianceDesk {
    pub fn add_document(
        &mut self,
        company_id: &str,
        client_id: &str,
        upload: DocumentUpload,
        actor: &str,
    ) -> DeskResult<DocumentRow> {
        self.store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))?;
        if upload.file_name.trim().is_empty() {
            return Err(DeskError::Validation("document file_name must not be empty".into()));
        }
        if upload.storage_key.trim().is_empty() {
            return Err(DeskError::Validation("document storage_key must not be empty".into()));
        }
        if upload.size_bytes <= 0 {
            return Err(DeskError::Validation(format!(
                "document size_bytes must be positive, got {}",
                upload.size_bytes
            )));
        }

        let now = Utc::now();
        let row = DocumentRow {
            document_id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            client_id: client_id.to_string(),
            kind: upload.kind,
            file_name: upload.file_name,
            content_type: upload.content_type,
            size_bytes: upload.size_bytes,
            storage_key: upload.storage_key,
            status: DocumentStatus::Pending,
            reject_reason: None,
            expires_at: upload.expires_at,
            uploaded_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_document(&row)?;
        info!(
            "document {} ({}) uploaded for client {client_id}",
            row.document_id,
            row.kind.as_str()
        );
        Ok(row)
    }

    pub fn verify_document(
        &mut self,
        company_id: &str,
        document_id: &str,
        actor: &str,
    ) -> DeskResult<DocumentRow> {
        let doc = self.require_pending(company_id, document_id)?;
        self.store.set_document_status(
            company_id,
            document_id,
            DocumentStatus::Pending,
            DocumentStatus::Verified,
            None,
            actor,
            Utc::now(),
        )?;
        // A verified identity artifact can clear a missing-* risk flag.
        self.rescore_client(company_id, &doc.client_id, actor)?;
        self.get_document(company_id, document_id)
    }

    pub fn reject_document(
        &mut self,
        company_id: &str,
        document_id: &str,
        reason: &str,
        actor: &str,
    ) -> DeskResult<DocumentRow> {
        if reason.trim().is_empty() {
            return Err(DeskError::Validation("rejection reason must not be empty".into()));
        }
        let doc = self.require_pending(company_id, document_id)?;
        self.store.set_document_status(
            company_id,
            document_id,
            DocumentStatus::Pending,
            DocumentStatus::Rejected,
            Some(reason),
            actor,
            Utc::now(),
        )?;
        self.rescore_client(company_id, &doc.client_id, actor)?;
        self.get_document(company_id, document_id)
    }

    /// Expire every overdue document for the tenant and re-derive risk for
    /// the affected clients. Returns the expired document ids.
    pub fn expire_documents(
        &mut self,
        company_id: &str,
        now: DateTime<Utc>,
        actor: &str,
    ) -> DeskResult<Vec<String>> {
        let expired = self.store.expire_documents(company_id, now, actor)?;
        if expired.is_empty() {
            return Ok(expired);
        }
        info!("expired {} documents for company {company_id}", expired.len());

        let mut clients: Vec<String> = Vec::new();
        for document_id in &expired {
            if let Some(doc) = self.store.get_document(company_id, document_id)? {
                if !clients.contains(&doc.client_id) {
                    clients.push(doc.client_id);
                }
            }
        }
        for client_id in clients {
            self.rescore_client(company_id, &client_id, actor)?;
        }
        Ok(expired)
    }

    pub fn get_document(&self, company_id: &str, document_id: &str) -> DeskResult<DocumentRow> {
        self.store
            .get_document(company_id, document_id)?
            .ok_or_else(|| DeskError::not_found("document", document_id))
    }

    pub fn list_documents(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<Vec<DocumentRow>> {
        self.store.documents_for_client(company_id, client_id)
    }

    fn require_pending(&self, company_id: &str, document_id: &str) -> DeskResult<DocumentRow> {
        let doc = self
            .store
            .get_document(company_id, document_id)?
            .ok_or_else(|| DeskError::not_found("document", document_id))?;
        if doc.status != DocumentStatus::Pending {
            return Err(DeskError::Validation(format!(
                "document {document_id} is {}, only pending documents can be decided",
                doc.status.as_str()
            )));
        }
        Ok(doc)
    }
}
