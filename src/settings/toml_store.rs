//! TOML file backed settings store

use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::debug;

use super::{ConfigStore, StoreError};

/// Settings kept as one TOML table per section
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
    table: Table,
}

impl TomlStore {
    /// Open the settings file, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = read_table(&path)?;
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.table.get(section)?.as_table()?.get(key)
    }

    fn set_value(&mut self, section: &str, key: &str, value: Value) {
        let entry = self
            .table
            .entry(section.to_string())
            .or_insert_with(|| Value::Table(Table::new()));

        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }

        if let Value::Table(table) = entry {
            table.insert(key.to_string(), value);
        }
    }
}

fn read_table(path: &Path) -> Result<Table, StoreError> {
    if !path.exists() {
        debug!("No settings file at {:?}, starting empty", path);
        return Ok(Table::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    contents.parse::<Table>().map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl ConfigStore for TomlStore {
    fn get_int(&self, section: &str, key: &str) -> Option<i64> {
        self.value(section, key)?.as_integer()
    }

    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)?.as_str().map(str::to_string)
    }

    fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        self.value(section, key)?.as_bool()
    }

    fn set_int(&mut self, section: &str, key: &str, value: i64) {
        self.set_value(section, key, Value::Integer(value));
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.set_value(section, key, Value::String(value.to_string()));
    }

    fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set_value(section, key, Value::Boolean(value));
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(&self.table)?;

        std::fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!("Settings written to {:?}", self.path);
        Ok(())
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        self.table = read_table(&self.path)?;
        debug!("Settings reloaded from {:?}", self.path);
        Ok(())
    }
}
