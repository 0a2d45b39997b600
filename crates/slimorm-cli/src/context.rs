//! Connection setup and argument parsing shared by all commands

use clap::Args;
use slimorm_core::logging_facility::{init, Profile};
use slimorm_core::{Conditions, Record, RecordType, Value};
use slimorm_store::{ConnectParams, ConnectionConfig, ConnectionHolder, Session};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

pub type CliResult = Result<(), Box<dyn Error>>;

/// Which record type a command works on
#[derive(Debug, Args)]
pub struct TypeArgs {
    /// Record type name; the table defaults to its underscored form
    pub record_type: String,

    /// Table name override
    #[arg(long)]
    pub table: Option<String>,

    /// Primary-key column override
    #[arg(long)]
    pub primary_key: Option<String>,
}

impl TypeArgs {
    pub fn build(&self) -> Arc<RecordType> {
        let mut record_type = RecordType::new(&self.record_type);
        if let Some(table) = &self.table {
            record_type = record_type.with_table(table);
        }
        if let Some(pk) = &self.primary_key {
            record_type = record_type.with_primary_key(pk);
        }
        Arc::new(record_type)
    }
}

pub struct Context {
    holder: ConnectionHolder,
}

impl Context {
    /// Initialize logging and connect from `--db` or `--config`
    pub fn open(
        db: Option<PathBuf>,
        config: Option<PathBuf>,
        log: Option<Profile>,
    ) -> Result<Self, Box<dyn Error>> {
        let (params, config_profile) = match (db, config) {
            (Some(path), _) => (ConnectParams::sqlite(path), None),
            (None, Some(path)) => {
                let config = ConnectionConfig::from_file(&path)?;
                (config.connection, config.log_profile)
            }
            (None, None) => return Err("Must specify either --db or --config".into()),
        };

        let profile = match (log, config_profile) {
            (Some(profile), _) => Some(profile),
            (None, Some(name)) => Some(name.parse::<Profile>()?),
            (None, None) => None,
        };
        if let Some(profile) = profile {
            init(profile);
        }

        let mut holder = ConnectionHolder::new();
        holder.connect(&params)?;
        Ok(Self { holder })
    }

    pub fn session(&self) -> Session<'_> {
        Session::new(&self.holder)
    }

    /// Load one persisted record by primary key
    pub fn load(
        &self,
        record_type: &Arc<RecordType>,
        id: &str,
    ) -> Result<Record, Box<dyn Error>> {
        let conditions = Conditions::new().with(record_type.primary_key(), parse_scalar(id));
        self.session()
            .one(record_type, &conditions, &Default::default())?
            .ok_or_else(|| {
                format!("No {} with {}={}", record_type.name(), record_type.primary_key(), id)
                    .into()
            })
    }

    pub fn commit(&self) -> CliResult {
        self.holder.commit()?;
        Ok(())
    }
}

/// Interpret a command-line literal: integers, reals and `null` are typed,
/// anything else is text
pub fn parse_scalar(raw: &str) -> Value {
    if raw == "null" {
        Value::Null
    } else if let Ok(v) = raw.parse::<i64>() {
        Value::Integer(v)
    } else if let Some(v) = raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
        Value::Real(v)
    } else {
        Value::Text(raw.to_string())
    }
}

/// Parse `column=value`
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    match raw.split_once('=') {
        Some((column, value)) if !column.is_empty() => {
            Ok((column.to_string(), parse_scalar(value)))
        }
        _ => Err(format!("expected column=value, got '{}'", raw)),
    }
}

pub fn conditions_from(pairs: &[(String, Value)]) -> Conditions {
    pairs.iter().cloned().collect()
}

/// Print one record as a JSON object line
pub fn print_record(record: &Record) -> CliResult {
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}
