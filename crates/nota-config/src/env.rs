//! Environment values typed by the shape of the default config.
//!
//! figment's [`Env`] provider parses every value, so `0123` becomes `123` and
//! `true` becomes a boolean. Keys whose default is a string keep the raw text
//! here; every other key is parsed the way [`Env`] would.

use std::collections::BTreeSet;

use figment::{
    Metadata, Profile, Provider,
    providers::Env,
    value::{Dict, Map, Value},
};
use serde::Serialize;

/// Dotted paths (`remote.sftp.password`) whose default value is a string.
#[derive(Debug, Clone, Default)]
pub struct StringKeys(BTreeSet<String>);

impl StringKeys {
    pub fn of<T: Serialize>(defaults: &T) -> Self {
        let mut keys = BTreeSet::new();
        if let Ok(Value::Dict(_, dict)) = Value::serialize(defaults) {
            collect(&dict, "", &mut keys);
        }
        Self(keys)
    }

    pub fn contains(&self, path: &[String]) -> bool {
        self.0.contains(&path.join("."))
    }

    /// Raw text for string keys, a lenient parse for everything else.
    pub fn value(&self, path: &[String], raw: &str) -> Value {
        if self.contains(path) {
            Value::from(raw.to_owned())
        } else {
            raw.parse::<Value>()
                .unwrap_or_else(|_| Value::from(raw.to_owned()))
        }
    }
}

fn collect(dict: &Dict, prefix: &str, keys: &mut BTreeSet<String>) {
    for (key, value) in dict {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(..) => {
                keys.insert(path);
            }
            Value::Dict(_, inner) => collect(inner, &path, keys),
            _ => {}
        }
    }
}

/// Split a `__`-separated key into lowercase path segments.
pub fn key_path(key: &str, separator: &str) -> Vec<String> {
    key.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

pub fn insert_nested(dict: &mut Dict, path: &[String], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            dict.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let entry = dict
                .entry(head.clone())
                .or_insert_with(|| Value::from(Dict::new()));
            if !matches!(entry, Value::Dict(..)) {
                *entry = Value::from(Dict::new());
            }
            if let Value::Dict(_, inner) = entry {
                insert_nested(inner, rest, value);
            }
        }
    }
}

/// `NOTA_*` environment provider that leaves string settings untouched.
pub struct TypedEnv {
    env: Env,
    keys: StringKeys,
}

impl TypedEnv {
    pub fn prefixed(prefix: &str, keys: StringKeys) -> Self {
        Self {
            env: Env::prefixed(prefix).split("__"),
            keys,
        }
    }
}

impl Provider for TypedEnv {
    fn metadata(&self) -> Metadata {
        self.env.metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        for (key, raw) in self.env.iter() {
            let path = key_path(key.as_str(), ".");
            let value = self.keys.value(&path, &raw);
            insert_nested(&mut dict, &path, value);
        }
        Ok(Profile::Default.collect(dict))
    }
}
