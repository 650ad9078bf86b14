pub mod markdown;
pub mod output;

pub use markdown::{render_local, render_remote, MarkdownOptions};
pub use output::{
    print_export_summary, print_local_summary, print_remote_summary, write_json, write_ndjson,
};
