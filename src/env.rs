//! Process environment access
//!
//! Provides the fallback clone location (the user's documents folder for the
//! application) and environment-variable expansion for paths handed to us by
//! git providers. Three reference styles are recognized:
//!
//! ```text
//! %APPDATA%/repos     # Windows style, common in IDE settings
//! ${HOME}/src
//! $HOME/src
//! ```
//!
//! Anything that does not resolve is passed through untouched.

use std::path::PathBuf;

/// Folder created under the user's documents directory.
pub const APPLICATION_FOLDER: &str = "GitHub";

/// Read access to the process environment.
pub trait Environment: Send + Sync {
    /// Returns `{documents}/GitHub` for the current user.
    fn user_documents_path_for_application(&self) -> PathBuf;

    /// Look up a single variable. Unset or non-UTF-8 values are `None`.
    fn var(&self, name: &str) -> Option<String>;

    /// Substitute every recognized variable reference in `value`.
    fn expand_environment_variables(&self, value: &str) -> String {
        expand_env_vars(value, |name| self.var(name))
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    /// Uses `dirs::document_dir()` which resolves to:
    /// - Linux: `XDG_DOCUMENTS_DIR` or `~/Documents`
    /// - macOS: `~/Documents`
    /// - Windows: `C:\Users\<user>\Documents`
    fn user_documents_path_for_application(&self) -> PathBuf {
        let documents = dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .unwrap_or_else(|| PathBuf::from("Documents"));
        documents.join(APPLICATION_FOLDER)
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expand `${NAME}` and `$NAME`, then `%NAME%` references using `lookup`.
///
/// Unknown variables, unterminated references and stray `%`/`$` characters
/// are copied to the output as-is. Substituted values are not expanded again
/// by the same pass.
pub fn expand_env_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = shellexpand::env_with_context_no_errors(value, |name: &str| lookup(name));
    expand_percent_vars(&expanded, &lookup)
}

/// `%NAME%` is not shell syntax, so it gets its own pass.
fn expand_percent_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let body = &rest[pos + 1..];

        let (literal_len, expansion) = match body.find('%') {
            Some(end) if end > 0 && body[..end].chars().all(is_var_char) => {
                (end + 2, lookup(&body[..end]))
            }
            _ => (1, None),
        };

        match expansion {
            Some(expanded) => out.push_str(&expanded),
            None => out.push_str(&rest[pos..pos + literal_len]),
        }
        rest = &rest[pos + literal_len..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn percent_style() {
        let vars = lookup(&[("APPDATA", "/home/u/appdata")]);
        assert_eq!(
            expand_env_vars("%APPDATA%/repos", vars),
            "/home/u/appdata/repos"
        );
    }

    #[test]
    fn braced_style() {
        let vars = lookup(&[("HOME", "/home/u")]);
        assert_eq!(expand_env_vars("${HOME}/src", vars), "/home/u/src");
    }

    #[test]
    fn bare_dollar_style() {
        let vars = lookup(&[("HOME", "/home/u")]);
        assert_eq!(expand_env_vars("$HOME/src", vars), "/home/u/src");
    }

    #[test]
    fn multiple_references() {
        let vars = lookup(&[("ROOT", "/data"), ("USER", "octocat")]);
        assert_eq!(
            expand_env_vars("%ROOT%/$USER/${USER}", vars),
            "/data/octocat/octocat"
        );
    }

    #[test]
    fn unknown_variable_passes_through() {
        let vars = lookup(&[]);
        assert_eq!(expand_env_vars("%NOPE%/repos", &vars), "%NOPE%/repos");
        assert_eq!(expand_env_vars("${NOPE}/repos", &vars), "${NOPE}/repos");
        assert_eq!(expand_env_vars("$NOPE/repos", &vars), "$NOPE/repos");
    }

    #[test]
    fn stray_markers_pass_through() {
        let vars = lookup(&[("A", "x")]);
        assert_eq!(expand_env_vars("100% done", &vars), "100% done");
        assert_eq!(expand_env_vars("cost $", &vars), "cost $");
        assert_eq!(expand_env_vars("%%", &vars), "%%");
        assert_eq!(expand_env_vars("%A", &vars), "%A");
    }

    #[test]
    fn percent_without_closing_keeps_later_references() {
        let vars = lookup(&[("A", "x")]);
        assert_eq!(expand_env_vars("50% of $A", &vars), "50% of x");
    }

    #[test]
    fn plain_text_unchanged() {
        let vars = lookup(&[]);
        assert_eq!(expand_env_vars("/home/u/code", vars), "/home/u/code");
    }

    #[test]
    fn non_ascii_text_unchanged() {
        let vars = lookup(&[("A", "x")]);
        assert_eq!(expand_env_vars("/dökümanlar/$A", vars), "/dökümanlar/x");
    }

    #[test]
    fn expansion_is_not_recursive() {
        let vars = lookup(&[("A", "$B"), ("B", "nope")]);
        assert_eq!(expand_env_vars("$A", &vars), "$B");
        assert_eq!(expand_env_vars("${A}", &vars), "$B");
    }

    #[test]
    fn percent_value_is_not_expanded_again() {
        let vars = lookup(&[("A", "%B%"), ("B", "nope")]);
        assert_eq!(expand_env_vars("%A%", &vars), "%B%");
    }

    #[test]
    fn mixed_styles_in_one_path() {
        let vars = lookup(&[("USERPROFILE", "C:/Users/u"), ("REPOS", "source/repos")]);
        assert_eq!(
            expand_env_vars("%USERPROFILE%/${REPOS}/$NOPE", &vars),
            "C:/Users/u/source/repos/$NOPE"
        );
    }

    #[test]
    fn system_documents_path_ends_with_application_folder() {
        let path = SystemEnvironment.user_documents_path_for_application();
        assert!(path.ends_with(APPLICATION_FOLDER));
    }
}
