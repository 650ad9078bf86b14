use thiserror::Error;

pub type Result<T> = std::result::Result<T, PulseError>;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("{stderr}")]
    GitCommand { code: Option<i32>, stderr: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API returned {status} for {url}")]
    Api { status: u16, url: String },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
}

impl PulseError {
    /// Builds the failure for a `git` process that exited unsuccessfully.
    pub fn git_exit(code: Option<i32>, stderr: &str) -> Self {
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            match code {
                Some(c) => format!("git exited with code {c}"),
                None => "git was terminated by a signal".to_string(),
            }
        } else {
            stderr.to_string()
        };
        PulseError::GitCommand { code, stderr: message }
    }

    /// True for the conflict status GitHub uses for repositories without commits.
    pub fn is_empty_repository(&self) -> bool {
        matches!(self, PulseError::Api { status: 409, .. })
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for PulseError {
    fn from(err: gix::discover::Error) -> Self {
        PulseError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for PulseError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        PulseError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for PulseError {
    fn from(err: gix::object::commit::Error) -> Self {
        PulseError::Commit(Box::new(err))
    }
}

impl From<toml::de::Error> for PulseError {
    fn from(err: toml::de::Error) -> Self {
        PulseError::Config(err.to_string())
    }
}
