//! Developer tasks (schema generation, fixture checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(polcheck_settings::PolcheckConfigV1)
}

fn generate_catalog_schema() -> schemars::Schema {
    schema_for!(polcheck_repo::CatalogV1)
}

fn generate_event_schema() -> schemars::Schema {
    schema_for!(polcheck_types::EventRecord)
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(polcheck_types::CheckReport)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "polcheck.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "polcheck.catalog.v1.json",
            generate: generate_catalog_schema,
        },
        SchemaSpec {
            filename: "polcheck.event.v1.json",
            generate: generate_event_schema,
        },
        SchemaSpec {
            filename: "polcheck.report.v1.json",
            generate: generate_report_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        // Compared as JSON values: key order depends on serde_json's `preserve_order` feature.
        let expected = serde_json::to_value((spec.generate)())
            .context("Failed to convert schema to JSON")?;
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let actual: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn compile(schema: schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = serde_json::to_value(schema).context("Failed to convert schema to JSON")?;
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

/// Validate every fixture under tests/fixtures/: catalogs against the catalog schema and the
/// catalog loader, optional `polcheck.toml` files against the config schema and parser.
fn check_fixtures() -> anyhow::Result<()> {
    let root = fixtures_dir()?;
    let catalog_validator = compile(generate_catalog_schema())?;
    let config_validator = compile(generate_config_schema())?;

    let mut dirs: Vec<PathBuf> = fs::read_dir(&root)
        .with_context(|| format!("Failed to read {}", root.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut errors = Vec::new();
    for dir in &dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let catalog_path = dir.join("polcheck-catalog.toml");
        if !catalog_path.exists() {
            errors.push(format!("fixture '{name}': missing polcheck-catalog.toml"));
            continue;
        }
        let value = read_toml_as_json(&catalog_path)?;
        for err in catalog_validator.iter_errors(&value) {
            errors.push(format!("fixture '{name}': catalog schema: {err}"));
        }
        let utf8 = Utf8PathBuf::from_path_buf(catalog_path)
            .map_err(|p| anyhow::anyhow!("non-UTF-8 fixture path: {}", p.display()))?;
        if let Err(err) = polcheck_repo::load_catalog(&utf8) {
            errors.push(format!("fixture '{name}': {err:#}"));
        }

        let config_path = dir.join("polcheck.toml");
        if config_path.exists() {
            let value = read_toml_as_json(&config_path)?;
            for err in config_validator.iter_errors(&value) {
                errors.push(format!("fixture '{name}': config schema: {err}"));
            }
            let text = fs::read_to_string(&config_path)?;
            if let Err(err) = polcheck_settings::parse_config_toml(&text) {
                errors.push(format!("fixture '{name}': config: {err:#}"));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} fixtures are valid", dirs.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Fixture validation failed with {} errors", errors.len())
    }
}

fn read_toml_as_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  check-fixtures    Validate tests/fixtures/ catalogs and configs");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "check-fixtures" => check_fixtures(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
