use thiserror::Error;
use vc_core::{PatientId, PatientKey, VcError};
use vc_des::DesError;

use crate::{PatientState, QueueName};

#[derive(Debug, Error)]
pub enum ClinicError {
    #[error(transparent)]
    Core(#[from] VcError),

    #[error("scheduler error: {0}")]
    Des(#[from] DesError),

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    #[error("patient table is full ({0} records)")]
    TableFull(usize),

    #[error("patient {0} is not in the patient table")]
    MissingPatient(PatientKey),

    #[error("patient {patient} expected in the {queue} queue but not found")]
    NotQueued {
        patient: PatientId,
        queue:   QueueName,
    },

    #[error("patient {patient} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        patient: PatientId,
        from:    PatientState,
        to:      PatientState,
    },
}

pub type ClinicResult<T> = Result<T, ClinicError>;
