pub mod git_fetcher;
pub mod hcl2json_parser;
