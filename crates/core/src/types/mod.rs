//! Shared type definitions.

pub mod catalog;
pub mod email;
pub mod id;
pub mod people;
pub mod price;
pub mod scheduling;
pub mod status;

pub use catalog::{Product, Promotion, Service};
pub use email::{Email, EmailError};
pub use id::{
    AdminUserId, AppointmentId, BlockedHoursId, CashMovementId, CashRegisterId, ClientId,
    ClientNoteId, ComandaId, ComandaItemId, ExpenseId, ProductId, ProfessionalId, PromotionId,
    ServiceId,
};
pub use people::{BlockedHours, Client, Professional, WorkingHours};
pub use price::{CurrencyCode, Price};
pub use scheduling::Appointment;
pub use status::{
    AdminRole, AppointmentStatus, CashMovementKind, CashRegisterStatus, ComandaStatus,
    ExpenseCategory, PaymentMethod, ServiceCategory,
};
