pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("pool already started")]
    AlreadyStarted,

    #[error("unknown worker: {0}")]
    UnknownWorker(usize),

    #[error("no idle worker accepted the job within {0:?}")]
    SubmitTimeout(std::time::Duration),

    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("worker panic: {0}")]
    WorkerPanic(String),

    #[error("relay participant `{name}` panicked: {message}")]
    ParticipantPanic { name: String, message: String },
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn participant_panic<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Error::ParticipantPanic {
            name: name.into(),
            message: message.into(),
        }
    }
}
