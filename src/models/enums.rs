use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
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

str_enum!(WorkflowStatus {
    PendingNurse => "PENDING_NURSE",
    PendingDoctor => "PENDING_DOCTOR",
    Completed => "COMPLETED",
});

str_enum!(DoctorStatus {
    Pending => "PENDING",
    Delayed => "DELAYED",
    Admitted => "ADMITTED",
    Approved => "APPROVED",
});

/// Triage urgency. Totally ordered: LOW < MED < HIGH. The rule engine only
/// ever raises priority within one evaluation, never lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityLevel {
    Low,
    Med,
    High,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "LOW",
            PriorityLevel::Med => "MED",
            PriorityLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriorityLevel {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(PriorityLevel::Low),
            "MED" => Ok(PriorityLevel::Med),
            "HIGH" => Ok(PriorityLevel::High),
            _ => Err(DatabaseError::InvalidEnum {
                field: "PriorityLevel".into(),
                value: s.into(),
            }),
        }
    }
}

/// The higher of two priorities under LOW < MED < HIGH.
pub fn max_priority(current: PriorityLevel, candidate: PriorityLevel) -> PriorityLevel {
    current.max(candidate)
}
