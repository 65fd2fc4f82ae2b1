mod jsonl;
mod stub;

pub use jsonl::JsonlSource;
pub use stub::{StubConfig, StubSource};
