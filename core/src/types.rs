//! Shared primitive types and status enums used across the desk.
//!
//! Statuses are stored as snake_case text in SQLite; every enum implements
//! `ToSql`/`FromSql` so store queries read and write them typed.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// The canonical tenant identifier.
pub type CompanyId = String;

/// A stable, unique identifier for any entity in the desk.
pub type EntityId = String;

/// Identifier of the staff member performing an action (from the auth layer).
pub type ActorId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    Individual,
    Company,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientKind::Individual => "individual",
            ClientKind::Company => "company",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(ClientKind::Individual),
            "company" => Some(ClientKind::Company),
            _ => None,
        }
    }
}

/// KYC lifecycle: pending → in_review → approved / rejected / expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Pending,
    InReview,
    Approved,
    Rejected,
    Expired,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::InReview => "in_review",
            KycStatus::Approved => "approved",
            KycStatus::Rejected => "rejected",
            KycStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(KycStatus::Pending),
            "in_review" => Some(KycStatus::InReview),
            "approved" => Some(KycStatus::Approved),
            "rejected" => Some(KycStatus::Rejected),
            "expired" => Some(KycStatus::Expired),
            _ => None,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    pub fn can_transition_to(&self, to: KycStatus) -> bool {
        use KycStatus::*;
        matches!(
            (self, to),
            (Pending, InReview)
                | (InReview, Approved)
                | (InReview, Rejected)
                | (Approved, Expired)
                | (Expired, InReview)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(RiskCategory::Low),
            "medium" => Some(RiskCategory::Medium),
            "high" => Some(RiskCategory::High),
            _ => None,
        }
    }
}

/// Aggregate AML state on the client. Mirrors the most recently decided
/// screening once any screening has been decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmlStatus {
    Pending,
    Cleared,
    Flagged,
    Blocked,
}

impl AmlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmlStatus::Pending => "pending",
            AmlStatus::Cleared => "cleared",
            AmlStatus::Flagged => "flagged",
            AmlStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AmlStatus::Pending),
            "cleared" => Some(AmlStatus::Cleared),
            "flagged" => Some(AmlStatus::Flagged),
            "blocked" => Some(AmlStatus::Blocked),
            _ => None,
        }
    }
}

/// Per-screening decision. Reviewer-updatable post-hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningDecision {
    Cleared,
    Flagged,
    Blocked,
}

impl ScreeningDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningDecision::Cleared => "cleared",
            ScreeningDecision::Flagged => "flagged",
            ScreeningDecision::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cleared" => Some(ScreeningDecision::Cleared),
            "flagged" => Some(ScreeningDecision::Flagged),
            "blocked" => Some(ScreeningDecision::Blocked),
            _ => None,
        }
    }

    /// The client-level AML status this decision maps to.
    pub fn as_aml_status(&self) -> AmlStatus {
        match self {
            ScreeningDecision::Cleared => AmlStatus::Cleared,
            ScreeningDecision::Flagged => AmlStatus::Flagged,
            ScreeningDecision::Blocked => AmlStatus::Blocked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Verified => "verified",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DocumentStatus::Pending),
            "verified" => Some(DocumentStatus::Verified),
            "rejected" => Some(DocumentStatus::Rejected),
            "expired" => Some(DocumentStatus::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Passport,
    NationalId,
    TradeLicense,
    ProofOfAddress,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Passport => "passport",
            DocumentKind::NationalId => "national_id",
            DocumentKind::TradeLicense => "trade_license",
            DocumentKind::ProofOfAddress => "proof_of_address",
            DocumentKind::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passport" => Some(DocumentKind::Passport),
            "national_id" => Some(DocumentKind::NationalId),
            "trade_license" => Some(DocumentKind::TradeLicense),
            "proof_of_address" => Some(DocumentKind::ProofOfAddress),
            "other" => Some(DocumentKind::Other),
            _ => None,
        }
    }

    /// Passport and national id both satisfy the identification requirement.
    pub fn is_identification(&self) -> bool {
        matches!(self, DocumentKind::Passport | DocumentKind::NationalId)
    }
}

/// Watchlist entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistKind {
    Sanctions,
    Pep,
}

impl WatchlistKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchlistKind::Sanctions => "sanctions",
            WatchlistKind::Pep => "pep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sanctions" => Some(WatchlistKind::Sanctions),
            "pep" => Some(WatchlistKind::Pep),
            _ => None,
        }
    }
}

// ── SQLite glue ──────────────────────────────────────────────────────────────

macro_rules! sql_text_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                Self::parse(s).ok_or_else(|| {
                    FromSqlError::Other(
                        format!("invalid {} value: {s}", stringify!($ty)).into(),
                    )
                })
            }
        }
    };
}

sql_text_enum!(ClientKind);
sql_text_enum!(KycStatus);
sql_text_enum!(RiskCategory);
sql_text_enum!(AmlStatus);
sql_text_enum!(ScreeningDecision);
sql_text_enum!(DocumentStatus);
sql_text_enum!(DocumentKind);
sql_text_enum!(WatchlistKind);
