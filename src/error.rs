use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum SchedulerError {
    /// The caller passed a value outside the accepted domain, such as an
    /// unknown rating or a negative timestamp.
    #[snafu(display("invalid argument: {reason}"))]
    InvalidArgument { reason: String },
    /// A stored card state is corrupted. The core refuses to carry it forward.
    #[snafu(display("card {id} violates a precondition: {reason}"))]
    PreconditionViolation { id: String, reason: String },
    #[snafu(display("invalid scheduler parameters: {reason}"))]
    InvalidParameters { reason: String },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
