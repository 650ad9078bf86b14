pub mod parser;
pub mod repo;

pub use parser::{parse_log, parse_reader, LogParser, ParsedLog};
pub use repo::GitRepo;
