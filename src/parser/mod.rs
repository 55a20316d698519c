// HTML parsing into page snapshots

pub mod page_parser;

pub use page_parser::{Page, PageParser, Parser};
