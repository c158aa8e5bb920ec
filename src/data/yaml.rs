//! YAML helpers.
//!
//! Serialization goes through `serde_yaml` values and is emitted with
//! `yaml-rust-davvid` so multi-line strings come out as block scalars.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use yaml_rust_davvid::{Yaml, YamlEmitter};

/// Serializes a value to YAML text.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    let value = serde_yaml::to_value(data).context("Failed to serialize to YAML value")?;

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter
        .dump(&to_emitter_value(&value))
        .context("Failed to emit YAML")?;

    Ok(output)
}

fn to_emitter_value(value: &serde_yaml::Value) -> Yaml {
    match value {
        serde_yaml::Value::Null => Yaml::Null,
        serde_yaml::Value::Bool(b) => Yaml::Boolean(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(n.to_string()),
        },
        serde_yaml::Value::String(s) => Yaml::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Yaml::Array(items.iter().map(to_emitter_value).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut hash = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                hash.insert(to_emitter_value(k), to_emitter_value(v));
            }
            Yaml::Hash(hash)
        }
        serde_yaml::Value::Tagged(tagged) => to_emitter_value(&tagged.value),
    }
}

/// Deserializes YAML text.
pub fn from_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T> {
    serde_yaml::from_str(yaml).context("Failed to deserialize YAML")
}

/// Reads and parses a YAML file.
pub fn read_yaml_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    from_yaml(&content).with_context(|| format!("Invalid YAML in {}", path.display()))
}

/// Writes a value to a YAML file.
pub fn write_yaml_file<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = to_yaml(data)?;

    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
