use thiserror::Error;

/// Why a single OBJ line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineFault {
    #[error("`{directive}` expects {expected} fields, found {found}")]
    WrongArity {
        directive: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("invalid number `{token}`")]
    InvalidNumber { token: String },
    #[error("invalid face reference `{token}`")]
    InvalidFaceReference { token: String },
    #[error("faces must have 3 or 4 elements, found {found}")]
    FaceArity { found: usize },
    #[error("{attribute} index {index} is out of range (1..={count})")]
    IndexOutOfRange {
        attribute: &'static str,
        index: i64,
        count: usize,
    },
    #[error("`{directive}` is missing a name")]
    MissingGroupName { directive: String },
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Malformed line {line} `{content}`: {fault}")]
    MalformedLine {
        line: usize,
        content: String,
        fault: LineFault,
    },
}

impl MeshError {
    pub fn line(&self) -> usize {
        match self {
            MeshError::MalformedLine { line, .. } => *line,
        }
    }

    pub fn fault(&self) -> &LineFault {
        match self {
            MeshError::MalformedLine { fault, .. } => fault,
        }
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
