use thiserror::Error;

pub type Result<T> = std::result::Result<T, LangstatError>;

#[derive(Error, Debug)]
pub enum LangstatError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Git command failed: {0}")]
    GitCommand(String),
    #[error("Clone failed: {0}")]
    Clone(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::object::find::existing::Error> for LangstatError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        LangstatError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for LangstatError {
    fn from(err: gix::object::commit::Error) -> Self {
        LangstatError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for LangstatError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        LangstatError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for LangstatError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        LangstatError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::discover::Error> for LangstatError {
    fn from(err: gix::discover::Error) -> Self {
        LangstatError::GitDiscover(Box::new(err))
    }
}

