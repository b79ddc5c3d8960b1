use armiger::handlers::*;
use armiger_core::UN_MEMBER_STATES;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[test]
fn test_parse_country_line_plain() {
    let result = parse_country_line("France");
    assert_eq!(result, Some("France".to_string()));
}

#[test]
fn test_parse_country_line_trims_whitespace() {
    let result = parse_country_line("  Fiji  ");
    assert_eq!(result, Some("Fiji".to_string()));
}

#[test]
fn test_parse_country_line_skips_comments() {
    assert_eq!(parse_country_line("# the Americas"), None);
    assert_eq!(parse_country_line("   # indented comment"), None);
}

#[test]
fn test_parse_country_line_skips_blank_lines() {
    assert_eq!(parse_country_line(""), None);
    assert_eq!(parse_country_line("   "), None);
}

#[test]
fn test_load_countries_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "# test roster")?;
    writeln!(temp_file, "Austria")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  Belgium")?;
    writeln!(temp_file, "Côte d'Ivoire")?;

    let path = PathBuf::from(temp_file.path());
    let countries = load_countries_from_file(&path)?;

    assert_eq!(countries.len(), 3);
    assert_eq!(countries[0], "Austria");
    assert_eq!(countries[1], "Belgium");
    assert_eq!(countries[2], "Côte d'Ivoire");

    Ok(())
}

#[test]
fn test_load_countries_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();
    writeln!(temp_file, "# only comments here").unwrap();

    let path = PathBuf::from(temp_file.path());
    let result = load_countries_from_file(&path);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No country names"));
}

#[test]
fn test_load_countries_from_file_missing() {
    let result = load_countries_from_file(&PathBuf::from("/no/such/roster.txt"));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to read countries file"));
}

#[test]
fn test_load_countries_from_source_explicit_names() {
    let names = vec!["Japan".to_string(), "Peru".to_string()];
    let result = load_countries_from_source(&names, None).unwrap();

    assert_eq!(result, ["Japan", "Peru"]);
}

#[test]
fn test_load_countries_from_source_file_wins() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "Malta")?;

    let path = PathBuf::from(temp_file.path());
    let result = load_countries_from_source(&[], Some(&path))?;

    assert_eq!(result, ["Malta"]);
    Ok(())
}

#[test]
fn test_load_countries_from_source_defaults_to_un_list() {
    let result = load_countries_from_source(&[], None).unwrap();

    assert_eq!(result.len(), UN_MEMBER_STATES.len());
    assert_eq!(result[0], "Afghanistan");
    assert_eq!(result[result.len() - 1], "Zimbabwe");
}

#[test]
fn test_expand_path_leaves_plain_paths_untouched() {
    let expanded = expand_path(Path::new("public/emblems"));
    assert_eq!(expanded, PathBuf::from("public/emblems"));
}

#[test]
fn test_expand_path_expands_tilde() {
    if std::env::var_os("HOME").is_none() {
        return;
    }
    let expanded = expand_path(Path::new("~/emblems"));
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.to_string_lossy().ends_with("emblems"));
}
