use anyhow::{Context, Result, bail};
use myargs::{ArgKind, ArgSchema, RegistryConfig, RegistrySchema};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_NAME: &str = "myargs.json";

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: RegistrySchema,
}

/// Load `schema_path`, or `myargs.json` from the current directory when no
/// path is given.
pub fn load_schema(schema_path: Option<&Path>) -> Result<LoadedSchema> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let path = match schema_path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_SCHEMA_NAME),
    };

    if !path.exists() {
        bail!("schema not found: {}", path.display());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    let schema = RegistrySchema::from_json(&contents)
        .with_context(|| format!("failed to parse schema JSON: {}", path.display()))?;

    Ok(LoadedSchema { path, schema })
}

/// Declarations of the bundled sample program.
pub fn sample_schema(program: &str) -> RegistrySchema {
    let arg = |name: &str, symbol: char, kind: ArgKind, help: &str| ArgSchema {
        name: name.to_string(),
        symbol: Some(symbol),
        kind,
        required: false,
        arity: 1,
        default_value: None,
        help: help.to_string(),
    };

    RegistrySchema {
        config: RegistryConfig::new(program)
            .usage(format!("Usage: {program} [options]"))
            .description("This is a sample program.")
            .epilog("Epilog message"),
        args: vec![
            arg("verbose", 'v', ArgKind::Flag, "Enable verbose mode"),
            arg("store", 's', ArgKind::Flag, "Save file Name"),
            arg("count", 'c', ArgKind::Keyword, "Number of times"),
        ],
    }
}

pub fn write_sample_schema(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_SCHEMA_NAME);
    if dest.exists() && !overwrite {
        bail!("{} already exists", dest.display());
    }

    let program = guess_program_name(dir).unwrap_or_else(|| "my_program".to_string());
    let schema = sample_schema(&program);

    let mut out = serde_json::to_string_pretty(&schema).context("failed to serialize schema")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn guess_program_name(dir: &Path) -> Option<String> {
    // `.` and `..` say nothing; fall back to the current directory name.
    let direct = dir
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}
