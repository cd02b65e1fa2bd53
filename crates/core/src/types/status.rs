//! Status and category enums for salon entities.
//!
//! All enums serialize as `snake_case` strings on the wire and are stored as
//! TEXT in the database, converted through `Display`/`FromStr` in the row
//! mappers.

use serde::{Deserialize, Serialize};

/// Declares `Display` and `FromStr` for an enum using its snake_case wire names.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $text)),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Canceled,
    NoShow,
}

string_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    Completed => "completed",
    Canceled => "canceled",
    NoShow => "no_show",
});

impl AppointmentStatus {
    /// Whether the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::NoShow)
    }

    /// Whether an admin may move an appointment from `self` to `next`.
    ///
    /// `Scheduled` may be confirmed or resolved directly; `Confirmed` may
    /// only be resolved. Terminal statuses admit nothing.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Scheduled => matches!(
                next,
                Self::Confirmed | Self::Completed | Self::Canceled | Self::NoShow
            ),
            Self::Confirmed => matches!(next, Self::Completed | Self::Canceled | Self::NoShow),
            Self::Completed | Self::Canceled | Self::NoShow => false,
        }
    }
}

/// Comanda (service ticket) lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComandaStatus {
    #[default]
    Open,
    Closed,
    Canceled,
}

string_enum!(ComandaStatus {
    Open => "open",
    Closed => "closed",
    Canceled => "canceled",
});

/// Service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Hair,
    Nails,
    Skin,
    Makeup,
    Barber,
    #[default]
    Other,
}

string_enum!(ServiceCategory {
    Hair => "hair",
    Nails => "nails",
    Skin => "skin",
    Makeup => "makeup",
    Barber => "barber",
    Other => "other",
});

/// Payment method accepted at comanda close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
}

string_enum!(PaymentMethod {
    Cash => "cash",
    CreditCard => "credit_card",
    DebitCard => "debit_card",
    Pix => "pix",
});

/// Cash register lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CashRegisterStatus {
    #[default]
    Open,
    Closed,
}

string_enum!(CashRegisterStatus {
    Open => "open",
    Closed => "closed",
});

/// Manual cash drawer movement kind.
///
/// `Withdrawal` is a sangria (cash taken out mid-shift); `Deposit` is a
/// reforço (change added to the drawer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashMovementKind {
    Deposit,
    Withdrawal,
}

string_enum!(CashMovementKind {
    Deposit => "deposit",
    Withdrawal => "withdrawal",
});

/// Expense (despesa) category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Supplies,
    Utilities,
    Salary,
    #[default]
    Other,
}

string_enum!(ExpenseCategory {
    Rent => "rent",
    Supplies => "supplies",
    Utilities => "utilities",
    Salary => "salary",
    Other => "other",
});

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin user management.
    SuperAdmin,
    /// Full access to salon management features.
    Manager,
    /// Day-to-day operation: comandas, cashier, appointments.
    Attendant,
}

string_enum!(AdminRole {
    SuperAdmin => "super_admin",
    Manager => "manager",
    Attendant => "attendant",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Canceled,
            AppointmentStatus::NoShow,
        ] {
            let parsed: AppointmentStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!("finished".parse::<AppointmentStatus>().is_err());
        assert!("".parse::<PaymentMethod>().is_err());
        assert!("boleto".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_serde_matches_display() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
        assert_eq!(AppointmentStatus::NoShow.to_string(), "no_show");

        let json = serde_json::to_string(&PaymentMethod::CreditCard).unwrap();
        assert_eq!(json, "\"credit_card\"");
    }

    #[test]
    fn test_appointment_transitions() {
        use AppointmentStatus::{Canceled, Completed, Confirmed, NoShow, Scheduled};

        assert!(Scheduled.can_transition_to(Confirmed));
        assert!(Scheduled.can_transition_to(Canceled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));

        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Scheduled));
        assert!(!NoShow.can_transition_to(Completed));

        assert!(Completed.is_terminal());
        assert!(!Scheduled.is_terminal());
    }

    #[test]
    fn test_admin_role_parse() {
        assert_eq!(
            "super_admin".parse::<AdminRole>().unwrap(),
            AdminRole::SuperAdmin
        );
        assert!("root".parse::<AdminRole>().is_err());
    }
}
