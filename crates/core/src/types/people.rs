//! People domain types: clients and professionals.
//!
//! Password hashes never appear on these types; they exist only inside the
//! binaries' `db` layers, so no API response can leak one by construction.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use super::email::Email;
use super::id::{BlockedHoursId, ClientId, ProfessionalId};

/// A salon client.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    /// Unique client ID.
    pub id: ClientId,
    /// Display name.
    pub name: String,
    /// Login email, unique per client.
    pub email: Email,
    /// Contact phone, free-form.
    pub phone: String,
    /// Prepaid credit usable against comandas. May be adjusted by admins.
    pub credit_balance: Decimal,
    /// Onboarding: set once name and phone are filled in.
    pub profile_completed: bool,
    /// Onboarding: set once the welcome flow has been shown. Never unset.
    pub welcomed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A staff professional who performs services.
#[derive(Debug, Clone, Serialize)]
pub struct Professional {
    /// Unique professional ID.
    pub id: ProfessionalId,
    /// Display name.
    pub name: String,
    /// Contact email, unique per professional.
    pub email: Email,
    /// Whether the professional may edit their own working hours.
    pub can_manage_schedule: bool,
    /// Whether the professional may add retail products to comandas.
    pub can_sell_products: bool,
    /// Commission on service revenue, in percent (0-100).
    pub commission_percent: Decimal,
    /// Inactive professionals are hidden from booking but kept for history.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One weekday's working window for a professional.
///
/// A professional has at most one window per weekday; days without a row
/// are days off. Serialized through route-level DTOs (weekday as 0-6,
/// Monday first), not directly.
#[derive(Debug, Clone, Copy)]
pub struct WorkingHours {
    /// Day of week this window applies to.
    pub weekday: Weekday,
    /// Start of the working window.
    pub starts_at: NaiveTime,
    /// End of the working window (exclusive).
    pub ends_at: NaiveTime,
}

/// A one-off interval on a specific date during which a professional
/// takes no appointments (lunch, training, time off).
#[derive(Debug, Clone, Serialize)]
pub struct BlockedHours {
    /// Unique blocked-hours ID.
    pub id: BlockedHoursId,
    /// Professional the block applies to.
    pub professional_id: ProfessionalId,
    /// Date of the block.
    pub date: NaiveDate,
    /// Start of the blocked interval.
    pub starts_at: NaiveTime,
    /// End of the blocked interval (exclusive).
    pub ends_at: NaiveTime,
    /// Free-form reason shown in the admin schedule view.
    pub reason: String,
}
