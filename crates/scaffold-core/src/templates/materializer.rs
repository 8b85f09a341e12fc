//! Placeholder substitution over fetched template files
//!
//! Substitution is a plain global literal-token replace, not templated
//! interpolation. Each file is rewritten independently, so a crash during
//! one write never touches the others. A file without its token rewrites to
//! identical contents, which makes every pass idempotent.

use super::registry::TemplateDescriptor;
use crate::error::ScaffoldError;
use std::collections::BTreeMap;
use std::path::Path;

/// Token replaced with the target directory's base name
pub const DIR_NAME_TOKEN: &str = "%%DIR_NAME%%";

/// Rewrite one file, replacing every occurrence of `token` with `value`.
///
/// Returns whether the file existed; a listed file that some template
/// variant doesn't ship is advisory, not an error.
pub fn substitute_file(path: &Path, token: &str, value: &str) -> Result<bool, ScaffoldError> {
    if !path.exists() {
        return Ok(false);
    }

    let substitution_err = |source| ScaffoldError::Substitution {
        path: path.to_path_buf(),
        source,
    };

    let contents = std::fs::read_to_string(path).map_err(substitution_err)?;
    let rewritten = contents.replace(token, value);
    if rewritten != contents {
        std::fs::write(path, rewritten).map_err(substitution_err)?;
    }
    Ok(true)
}

/// First pass: rewrite the descriptor's substitution files with the
/// resolved directory name
pub fn apply_dir_name(
    descriptor: &TemplateDescriptor,
    target_dir: &Path,
    dir_name: &str,
) -> Result<(), ScaffoldError> {
    for relative in descriptor.substitution_files {
        substitute_file(&target_dir.join(relative), DIR_NAME_TOKEN, dir_name)?;
    }
    Ok(())
}

/// Second pass: rewrite each declared parameter's files with the value the
/// user supplied for it
pub fn apply_parameters(
    descriptor: &TemplateDescriptor,
    target_dir: &Path,
    values: &BTreeMap<String, String>,
) -> Result<(), ScaffoldError> {
    for parameter in descriptor.parameters {
        let value = values
            .get(parameter.name)
            .ok_or_else(|| ScaffoldError::MissingParameter {
                name: parameter.name.to_string(),
            })?;
        for relative in parameter.files {
            substitute_file(&target_dir.join(relative), parameter.token, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::registry::descriptor_for;

    #[test]
    fn replaces_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wrangler.jsonc");
        std::fs::write(&file, "{\"name\": \"%%DIR_NAME%%\", \"route\": \"%%DIR_NAME%%.dev\"}")
            .unwrap();

        assert!(substitute_file(&file, DIR_NAME_TOKEN, "my-app").unwrap());

        let rewritten = std::fs::read_to_string(&file).unwrap();
        assert_eq!(rewritten, "{\"name\": \"my-app\", \"route\": \"my-app.dev\"}");
        assert!(!rewritten.contains(DIR_NAME_TOKEN));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wrangler.jsonc");
        std::fs::write(&file, "name = %%DIR_NAME%%").unwrap();

        substitute_file(&file, DIR_NAME_TOKEN, "my-app").unwrap();
        let once = std::fs::read_to_string(&file).unwrap();
        substitute_file(&file, DIR_NAME_TOKEN, "my-app").unwrap();
        let twice = std::fs::read_to_string(&file).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice, "name = my-app");
    }

    #[test]
    fn content_without_the_token_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.ts");
        std::fs::write(&file, "export default app").unwrap();

        assert!(substitute_file(&file, DIR_NAME_TOKEN, "my-app").unwrap());
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "export default app"
        );
    }

    #[test]
    fn absent_files_are_advisory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("wrangler.jsonc");
        assert!(!substitute_file(&missing, DIR_NAME_TOKEN, "my-app").unwrap());
    }

    #[test]
    fn parameter_pass_covers_every_listed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("migrations")).unwrap();
        std::fs::write(
            dir.path().join("wrangler.jsonc"),
            "\"database_name\": \"%%DB_NAME%%\"",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("migrations/0001_init.sql"),
            "-- %%DB_NAME%% schema",
        )
        .unwrap();

        let descriptor = descriptor_for("cf-workers-d1").unwrap();
        let mut values = BTreeMap::new();
        values.insert("database".to_string(), "orders-db".to_string());
        apply_parameters(descriptor, dir.path(), &values).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("wrangler.jsonc")).unwrap(),
            "\"database_name\": \"orders-db\""
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("migrations/0001_init.sql")).unwrap(),
            "-- orders-db schema"
        );
    }

    #[test]
    fn missing_parameter_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = descriptor_for("cf-workers-d1").unwrap();
        let err = apply_parameters(descriptor, dir.path(), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ScaffoldError::MissingParameter { .. }));
    }

    #[test]
    fn dir_name_pass_targets_the_descriptor_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wrangler.jsonc"), "\"name\": \"%%DIR_NAME%%\"").unwrap();
        std::fs::write(dir.path().join("index.ts"), "// %%DIR_NAME%% stays").unwrap();

        let descriptor = descriptor_for("cf-workers").unwrap();
        apply_dir_name(descriptor, dir.path(), "my-app").unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("wrangler.jsonc")).unwrap(),
            "\"name\": \"my-app\""
        );
        // index.ts is not a substitution file for this template
        assert_eq!(
            std::fs::read_to_string(dir.path().join("index.ts")).unwrap(),
            "// %%DIR_NAME%% stays"
        );
    }
}
