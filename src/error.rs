#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR value is not a valid float")]
    NotAFloat,

    #[error("ERR The ID specified in XADD is equal or smaller than the target stream top item")]
    InvalidId,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR invalid cursor")]
    InvalidCursor,

    #[error("ERR {0}")]
    Generic(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
