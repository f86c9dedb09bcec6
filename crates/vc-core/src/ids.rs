//! Patient identifiers.
//!
//! Two kinds of identifier exist:
//!
//! - [`PatientKey`]: a dense, zero-based index into the clinic's patient
//!   table.  Queues and events carry keys, so every lookup is O(1).
//! - [`PatientId`]: the externally visible label.  Walk-ins are numbered
//!   from 1 in arrival order; appointments carry their own counter and print
//!   with an `appt-` prefix so the two series never collide.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a patient in the clinic's patient table.
    pub struct PatientKey(u32);
}

/// Externally visible patient label.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatientId {
    /// Unscheduled arrival, numbered from 1.
    WalkIn(u32),
    /// Scheduled appointment, numbered from 1.
    Appointment(u32),
}

impl PatientId {
    pub fn is_appointment(self) -> bool {
        matches!(self, PatientId::Appointment(_))
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientId::WalkIn(n)      => write!(f, "{n}"),
            PatientId::Appointment(n) => write!(f, "appt-{n}"),
        }
    }
}
