use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use tracing::debug;

use crate::domain::error::IngestionError;

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Source table reference: `<bucket_name>/<file_glob>`.
#[derive(Debug, Clone)]
pub struct TableReference {
    pub bucket: String,
    pub pattern: String,
    matcher: GlobMatcher,
}

impl TableReference {
    pub fn parse(raw: &str) -> Result<Self, IngestionError> {
        let invalid = |reason: &str| IngestionError::InvalidTableReference {
            reference: raw.to_string(),
            reason: reason.to_string(),
        };

        let (bucket, pattern) = raw
            .split_once('/')
            .ok_or_else(|| invalid("expected '<bucket_name>/<file_glob>'"))?;

        if bucket.is_empty() {
            return Err(invalid("bucket name is empty"));
        }
        if bucket.contains(&GLOB_META[..]) {
            return Err(invalid("bucket name may not contain wildcard characters"));
        }
        let bucket_re = Regex::new(r"^[A-Za-z0-9._-]{1,255}$")
            .map_err(|e| IngestionError::InvalidTableReference {
                reference: raw.to_string(),
                reason: e.to_string(),
            })?;
        if !bucket_re.is_match(bucket) {
            return Err(invalid("bucket name contains unsupported characters"));
        }

        let pattern = pattern.trim_start_matches('/');
        if pattern.is_empty() {
            return Err(invalid("file glob is empty"));
        }
        if pattern.ends_with('/') {
            return Err(invalid("file glob must name files, not a directory"));
        }

        // literal_separator keeps `*` inside one path segment; only `**`
        // crosses directories
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| IngestionError::InvalidTableReference {
                reference: raw.to_string(),
                reason: format!("invalid glob: {}", e),
            })?
            .compile_matcher();

        debug!("Parsed table reference - bucket: {}, pattern: {}", bucket, pattern);
        Ok(Self {
            bucket: bucket.to_string(),
            pattern: pattern.to_string(),
            matcher,
        })
    }

    /// True when the glob names exactly one object.
    pub fn is_exact(&self) -> bool {
        !self.pattern.contains(&GLOB_META[..])
    }

    pub fn matches(&self, key: &str) -> bool {
        self.matcher.is_match(key)
    }

    /// Literal directory prefix before the first wildcard, used to narrow
    /// the bucket listing.
    pub fn list_prefix(&self) -> String {
        let literal = match self.pattern.find(&GLOB_META[..]) {
            Some(pos) => &self.pattern[..pos],
            None => self.pattern.as_str(),
        };
        match literal.rfind('/') {
            Some(pos) => literal[..=pos].to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> TableReference {
        TableReference::parse(raw).unwrap()
    }

    #[test]
    fn splits_bucket_and_glob_at_first_slash() {
        let table = parse("my_bucket/students/students_details.csv");
        assert_eq!(table.bucket, "my_bucket");
        assert_eq!(table.pattern, "students/students_details.csv");
    }

    #[test]
    fn csv_files_at_any_depth() {
        let table = parse("my_bucket/**/*.csv");
        assert!(table.matches("top.csv"));
        assert!(table.matches("a/nested.csv"));
        assert!(table.matches("a/b/c/deep.csv"));
        assert!(!table.matches("a/b/c/deep.jsonl"));
    }

    #[test]
    fn csv_files_at_top_level_only() {
        let table = parse("my_bucket/*.csv");
        assert!(table.matches("top.csv"));
        assert!(!table.matches("a/nested.csv"));
        assert!(!table.matches("top.parquet"));
    }

    #[test]
    fn jsonl_files_anywhere_under_a_folder() {
        let table = parse("my_bucket/myFolder/**/*.jsonl");
        assert!(table.matches("myFolder/direct.jsonl"));
        assert!(table.matches("myFolder/mySubFolder/nested.jsonl"));
        assert!(!table.matches("otherFolder/file.jsonl"));
        assert!(!table.matches("direct.jsonl"));
    }

    #[test]
    fn exact_file_in_a_subfolder() {
        let table = parse("my_bucket/myFolder/mySubFolder/users.parquet");
        assert!(table.is_exact());
        assert!(table.matches("myFolder/mySubFolder/users.parquet"));
        assert!(!table.matches("myFolder/mySubFolder/others.parquet"));
    }

    #[test]
    fn exact_file_at_bucket_root() {
        let table = parse("my_bucket/employees.jsonl");
        assert!(table.is_exact());
        assert!(table.matches("employees.jsonl"));
        assert!(!table.matches("nested/employees.jsonl"));
    }

    #[test]
    fn glob_reference_is_not_exact() {
        assert!(!parse("my_bucket/**/*.csv").is_exact());
        assert!(!parse("my_bucket/reports/2024-??.csv").is_exact());
    }

    #[test]
    fn list_prefix_stops_at_first_wildcard() {
        assert_eq!(parse("b/**/*.csv").list_prefix(), "");
        assert_eq!(parse("b/myFolder/**/*.jsonl").list_prefix(), "myFolder/");
        assert_eq!(parse("b/logs/2024/*.jsonl").list_prefix(), "logs/2024/");
        assert_eq!(parse("b/myFolder/mySubFolder/users.parquet").list_prefix(), "myFolder/mySubFolder/");
        assert_eq!(parse("b/employees.jsonl").list_prefix(), "");
    }

    #[test]
    fn rejects_reference_without_slash() {
        assert!(TableReference::parse("employees.jsonl").is_err());
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(TableReference::parse("/employees.jsonl").is_err());
        assert!(TableReference::parse("my_bucket/").is_err());
        assert!(TableReference::parse("my_bucket//").is_err());
    }

    #[test]
    fn rejects_wildcards_in_bucket_name() {
        assert!(TableReference::parse("my_*bucket/data.csv").is_err());
    }

    #[test]
    fn rejects_directory_globs() {
        assert!(TableReference::parse("my_bucket/myFolder/").is_err());
    }
}
