use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::EnvironmentProvider;

const MULTILINE_DELIMITER: &str = "ACTION_REPORTERS_EOF";

/// Where step outputs end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Append to the file named by `GITHUB_OUTPUT`
    File(PathBuf),
    /// Legacy `::set-output` workflow command on stdout
    Stdout,
}

#[derive(Debug, Clone)]
pub struct GithubOutput {
    target: OutputTarget,
}

impl GithubOutput {
    pub fn from_env<E: EnvironmentProvider>(env: &E) -> Self {
        let target = match env.get_non_empty("GITHUB_OUTPUT") {
            Some(path) => OutputTarget::File(PathBuf::from(path)),
            None => OutputTarget::Stdout,
        };
        Self { target }
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        match &self.target {
            OutputTarget::File(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("cannot open GITHUB_OUTPUT ({})", path.display()))?;
                file.write_all(format_output_entry(name, value).as_bytes())
                    .with_context(|| format!("cannot write output {}", name))?;
                info!("Setting GitHub output: {}={}", name, value);
            }
            OutputTarget::Stdout => {
                println!("{}", format_set_output_command(name, value));
                info!("Set GitHub output (fallback): {}={}", name, value);
            }
        }
        Ok(())
    }
}

/// `name=value\n`, or the heredoc form when the value spans several lines.
pub fn format_output_entry(name: &str, value: &str) -> String {
    if value.contains('\n') {
        let delimiter = heredoc_delimiter(value);
        format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    } else {
        format!("{}={}\n", name, value)
    }
}

/// A delimiter that does not occur anywhere in `value`, so the value
/// cannot terminate the heredoc early.
fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = MULTILINE_DELIMITER.to_string();
    let mut suffix = 0u32;
    while value.contains(&delimiter) {
        suffix += 1;
        delimiter = format!("{}_{}", MULTILINE_DELIMITER, suffix);
    }
    delimiter
}

pub fn format_set_output_command(name: &str, value: &str) -> String {
    format!("::set-output name={}::{}", name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_target_from_env() {
        let env = MockEnvironment::new().with_var("GITHUB_OUTPUT", "/tmp/github_output");
        assert_eq!(
            GithubOutput::from_env(&env).target(),
            &OutputTarget::File(PathBuf::from("/tmp/github_output"))
        );

        assert_eq!(GithubOutput::from_env(&MockEnvironment::new()).target(), &OutputTarget::Stdout);

        let env = MockEnvironment::new().with_var("GITHUB_OUTPUT", "");
        assert_eq!(GithubOutput::from_env(&env).target(), &OutputTarget::Stdout);
    }

    #[test]
    fn test_format_output_entry() {
        assert_eq!(format_output_entry("test-name", "test-value"), "test-name=test-value\n");
        assert_eq!(
            format_output_entry("notes", "line one\nline two"),
            "notes<<ACTION_REPORTERS_EOF\nline one\nline two\nACTION_REPORTERS_EOF\n"
        );
    }

    #[test]
    fn test_heredoc_delimiter_avoids_value() {
        let value = "before\nACTION_REPORTERS_EOF\nevil=1";
        assert_eq!(
            format_output_entry("notes", value),
            "notes<<ACTION_REPORTERS_EOF_1\nbefore\nACTION_REPORTERS_EOF\nevil=1\nACTION_REPORTERS_EOF_1\n"
        );

        let value = "ACTION_REPORTERS_EOF\nACTION_REPORTERS_EOF_1";
        assert!(format_output_entry("notes", value).starts_with("notes<<ACTION_REPORTERS_EOF_2\n"));
    }

    #[test]
    fn test_format_set_output_command() {
        assert_eq!(
            format_set_output_command("test-name", "test-value"),
            "::set-output name=test-name::test-value"
        );
    }

    #[test]
    fn test_set_appends_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "existing=1\n").unwrap();
        let env = MockEnvironment::new().with_var("GITHUB_OUTPUT", file.path().to_string_lossy());

        let output = GithubOutput::from_env(&env);
        output.set("artifact-exists", "true").unwrap();
        output.set("total-count", "1").unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "existing=1\nartifact-exists=true\ntotal-count=1\n");
    }

    #[test]
    fn test_set_reports_unwritable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("output");
        let env = MockEnvironment::new().with_var("GITHUB_OUTPUT", missing.to_string_lossy());

        let err = GithubOutput::from_env(&env).set("a", "b").unwrap_err();
        assert!(err.to_string().contains("GITHUB_OUTPUT"));
    }
}
