use derive_more::{Display, Error};

/// Viskit custom error
#[derive(Debug, Display, Error, PartialEq)]
pub enum ViskitError {
    #[display(fmt = "Id {} is already queued", id)]
    DuplicateId { id: usize },
    #[display(fmt = "{}", message)]
    InvalidSettings { message: String },
    #[display(fmt = "{}", message)]
    BadArgument { message: String },
}

impl ViskitError {
    /// Return the name of this error
    pub fn name(&self) -> String {
        match self {
            Self::DuplicateId { .. } => "Duplicate Id".to_string(),
            Self::InvalidSettings { .. } => "Invalid Settings".to_string(),
            Self::BadArgument { .. } => "Bad Argument".to_string()
        }
    }
}
