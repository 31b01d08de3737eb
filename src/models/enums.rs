use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Audience {
    Patient => "patient",
    Doctor => "doctor",
    Admin => "admin",
});

str_enum!(NotificationKind {
    Booked => "booked",
    Cancelled => "cancelled",
    StatusChanged => "status_changed",
    ResultReady => "result_ready",
});

/// Appointment status. Canonical strings match the historical data
/// (`"no-show"` hyphenated); `"pending"` is a legacy alias of `scheduled`
/// accepted on parse and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[serde(alias = "pending")]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" | "pending" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            _ => Err(DatabaseError::InvalidEnum {
                field: "AppointmentStatus".into(),
                value: s.into(),
            }),
        }
    }
}

/// Lab test status. Same canonical-string rules as `AppointmentStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabTestStatus {
    #[serde(alias = "pending")]
    Scheduled,
    TestTaken,
    NoShow,
    Completed,
    Cancelled,
}

impl LabTestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::TestTaken => "test-taken",
            Self::NoShow => "no-show",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for LabTestStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" | "pending" => Ok(Self::Scheduled),
            "test-taken" => Ok(Self::TestTaken),
            "no-show" => Ok(Self::NoShow),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DatabaseError::InvalidEnum {
                field: "LabTestStatus".into(),
                value: s.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Scheduled, "scheduled"),
            (AppointmentStatus::Completed, "completed"),
            (AppointmentStatus::Cancelled, "cancelled"),
            (AppointmentStatus::NoShow, "no-show"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn lab_test_status_round_trip() {
        for (variant, s) in [
            (LabTestStatus::Scheduled, "scheduled"),
            (LabTestStatus::TestTaken, "test-taken"),
            (LabTestStatus::NoShow, "no-show"),
            (LabTestStatus::Completed, "completed"),
            (LabTestStatus::Cancelled, "cancelled"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(LabTestStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn pending_is_legacy_alias_of_scheduled() {
        assert_eq!(
            AppointmentStatus::from_str("pending").unwrap(),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            LabTestStatus::from_str("pending").unwrap(),
            LabTestStatus::Scheduled
        );
        // Never written back as "pending"
        assert_eq!(AppointmentStatus::Scheduled.as_str(), "scheduled");
    }

    #[test]
    fn status_serde_uses_canonical_strings() {
        let json = serde_json::to_string(&LabTestStatus::TestTaken).unwrap();
        assert_eq!(json, "\"test-taken\"");
        let parsed: LabTestStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, LabTestStatus::Scheduled);
    }

    #[test]
    fn audience_round_trip() {
        for (variant, s) in [
            (Audience::Patient, "patient"),
            (Audience::Doctor, "doctor"),
            (Audience::Admin, "admin"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Audience::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AppointmentStatus::from_str("started").is_err());
        assert!(LabTestStatus::from_str("").is_err());
        assert!(NotificationKind::from_str("unknown").is_err());
    }
}
