//! Multi-tenant KYC/AML compliance desk.
//!
//! Library core for a back-office compliance module: client onboarding with
//! rule-based risk scoring, identity document verification, sanctions/PEP
//! watchlist screening with threshold-derived decisions, and an append-only
//! audit trail, all over a SQLite schema with transactional mutations.

pub mod config;
pub mod desk;
pub mod documents;
pub mod error;
pub mod matching;
pub mod onboarding;
pub mod risk;
pub mod screening;
pub mod store;
pub mod types;

pub use config::DeskConfig;
pub use desk::ComplianceDesk;
pub use documents::DocumentUpload;
pub use error::{DeskError, DeskResult};
pub use onboarding::ClientIntake;
pub use screening::{ScreeningEngine, ScreeningOutcome};
pub use types::{
    AmlStatus, ClientKind, DocumentKind, DocumentStatus, KycStatus, RiskCategory,
    ScreeningDecision, WatchlistKind,
};
