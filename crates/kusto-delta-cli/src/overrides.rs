use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::config::JobsConfig;

/// Applies `path=value` override expressions to a configuration.
///
/// Paths are `a.b[2].c` expressions interpreted over the configuration's
/// JSON value tree; intermediate segments must exist, so an override can
/// only land on a declared field (stray final keys are then rejected by
/// the deserializer). Values parse as JSON scalars, falling back to plain
/// strings.
pub fn apply(config: JobsConfig, overrides: &[String]) -> Result<JobsConfig> {
    if overrides.is_empty() {
        return Ok(config);
    }
    let mut tree = serde_json::to_value(&config).context("configuration serializes")?;
    for expression in overrides {
        apply_one(&mut tree, expression)
            .with_context(|| format!("cannot apply override `{expression}`"))?;
    }
    let config: JobsConfig =
        serde_json::from_value(tree).context("overridden configuration is not valid")?;
    config.validate()?;
    Ok(config)
}

#[derive(Debug, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

fn apply_one(tree: &mut Value, expression: &str) -> Result<()> {
    let Some((path, raw_value)) = expression.split_once('=') else {
        bail!("expected `path=value`");
    };
    let segments = parse_path(path)?;
    let Some((last, walk)) = segments.split_last() else {
        bail!("empty override path");
    };

    let mut node = tree;
    for segment in walk {
        node = match segment {
            Segment::Key(key) => node
                .get_mut(key)
                .with_context(|| format!("no field `{key}` along `{path}`"))?,
            Segment::Index(index) => node
                .get_mut(index)
                .with_context(|| format!("no element `[{index}]` along `{path}`"))?,
        };
    }

    let value: Value =
        serde_json::from_str(raw_value).unwrap_or_else(|_| Value::String(raw_value.to_string()));
    match last {
        Segment::Key(key) => {
            let Value::Object(object) = node else {
                bail!("`{path}` does not name an object field");
            };
            object.insert(key.clone(), value);
        }
        Segment::Index(index) => {
            let Value::Array(array) = node else {
                bail!("`{path}` does not name an array element");
            };
            if *index >= array.len() {
                bail!("`{path}` is out of bounds");
            }
            array[*index] = value;
        }
    }
    Ok(())
}

fn parse_path(path: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let (key, indexes) = match part.find('[') {
            Some(at) => part.split_at(at),
            None => (part, ""),
        };
        if key.is_empty() {
            bail!("empty segment in `{path}`");
        }
        segments.push(Segment::Key(key.to_string()));
        let mut rest = indexes;
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some((index, tail)) = stripped.split_once(']') else {
                bail!("unclosed `[` in `{path}`");
            };
            let index: usize = index
                .parse()
                .with_context(|| format!("invalid index in `{path}`"))?;
            segments.push(Segment::Index(index));
            rest = tail;
        }
        if !rest.is_empty() {
            bail!("malformed segment `{part}` in `{path}`");
        }
    }
    Ok(segments)
}
