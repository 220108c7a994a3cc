//! CLI command implementations
//!
//! Each command loads configuration, ingests the data file into both
//! layouts and runs a single query. Results are one JSON object on the
//! output, except `filter`, which writes one record per line.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::{ObserverKind, StoreConfig};
use crate::field::{
    Close, CloseAdjusted, ColumnField, Date, FieldId, High, Low, NumericField, Open,
    SplitCoefficient, Symbol, Volume,
};
use crate::ingest;
use crate::observability::{Layout, Logger, MetricsRegistry};
use crate::storage::Storage;

use super::args::{AggregateOp, Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments, run the command and write to stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(cli, &mut out)
}

/// Run the command described by `cli`, writing results to `out`
pub fn run_command<W: Write>(cli: Cli, out: &mut W) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };

    match cli.command {
        Command::Count { data } => {
            let session = Session::open(&config, &data)?;
            let mut result = Map::new();
            result.insert("command".into(), json!("count"));
            result.insert("rows".into(), json!(session.storage.row_count()));
            result.insert("columns".into(), json!(session.storage.column_count()));
            session.finish(result, out)
        }

        Command::CountEquals {
            data,
            field,
            value,
            layout,
        } => {
            let session = Session::open(&config, &data)?;
            let field = FieldId::from(field);
            let layout = Layout::from(layout);
            let count = dispatch_equals(
                field,
                &value,
                CountEquals {
                    storage: &session.storage,
                    layout,
                },
            )?;

            let mut result = Map::new();
            result.insert("command".into(), json!("count-equals"));
            result.insert("layout".into(), json!(layout.as_str()));
            result.insert("field".into(), json!(field.name()));
            result.insert("value".into(), json!(value));
            result.insert("count".into(), json!(count));
            session.finish(result, out)
        }

        Command::Aggregate {
            data,
            field,
            op,
            layout,
        } => {
            let session = Session::open(&config, &data)?;
            let field = FieldId::from(field);
            let layout = Layout::from(layout);
            let value = aggregate(&session.storage, field, op, layout)?;

            let mut result = Map::new();
            result.insert("command".into(), json!("aggregate"));
            result.insert("layout".into(), json!(layout.as_str()));
            result.insert("field".into(), json!(field.name()));
            result.insert("op".into(), json!(op.as_str()));
            result.insert("result".into(), value);
            session.finish(result, out)
        }

        Command::Filter {
            data,
            field,
            value,
            layout,
        } => {
            let session = Session::open(&config, &data)?;
            let layout = Layout::from(layout);
            let filtered = dispatch_equals(
                FieldId::from(field),
                &value,
                FilterEquals {
                    storage: &session.storage,
                    layout,
                },
            )?;

            match layout {
                Layout::Row => {
                    for record in filtered.rows() {
                        write_line(out, record)?;
                    }
                }
                Layout::Column => {
                    for record in filtered.columns().rows() {
                        write_line(out, &record)?;
                    }
                }
            }
            out.flush()?;
            Ok(())
        }
    }
}

/// Loaded storage plus the registry metrics are counted into
struct Session {
    storage: Storage,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl Session {
    fn open(config: &StoreConfig, data: &Path) -> CliResult<Self> {
        let registry = Arc::new(MetricsRegistry::new());
        let mut storage = config.build_storage(config.build_observer_with(&registry));

        let file = File::open(data).map_err(|e| {
            CliError::data_error(format!("Failed to open {}: {}", data.display(), e))
        })?;
        let rows = ingest::load_into(&mut storage, BufReader::new(file))?;

        if config.observer == ObserverKind::Log {
            let path = data.display().to_string();
            let rows = rows.to_string();
            Logger::info("DATA_LOADED", &[("path", path.as_str()), ("rows", rows.as_str())]);
        }

        let metrics = (config.observer == ObserverKind::Metrics).then_some(registry);
        Ok(Self { storage, metrics })
    }

    /// Writes `result`, with a metrics snapshot when metrics are configured
    fn finish<W: Write>(self, mut result: Map<String, Value>, out: &mut W) -> CliResult<()> {
        if let Some(registry) = &self.metrics {
            result.insert("metrics".into(), serde_json::to_value(registry.snapshot())?);
        }
        write_line(out, &Value::Object(result))?;
        out.flush()?;
        Ok(())
    }
}

fn write_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// An equality query generic over the field it targets
trait EqualsQuery {
    type Output;

    fn run<F: ColumnField>(self, value: &F::Value) -> Self::Output;
}

struct CountEquals<'a> {
    storage: &'a Storage,
    layout: Layout,
}

impl EqualsQuery for CountEquals<'_> {
    type Output = usize;

    fn run<F: ColumnField>(self, value: &F::Value) -> usize {
        match self.layout {
            Layout::Row => self.storage.row_count_equals::<F>(value),
            Layout::Column => self.storage.column_count_equals::<F>(value),
        }
    }
}

struct FilterEquals<'a> {
    storage: &'a Storage,
    layout: Layout,
}

impl EqualsQuery for FilterEquals<'_> {
    type Output = Storage;

    fn run<F: ColumnField>(self, value: &F::Value) -> Storage {
        match self.layout {
            Layout::Row => self.storage.row_filter_equals::<F>(value),
            Layout::Column => self.storage.column_filter_equals::<F>(value),
        }
    }
}

/// Picks the accessor for `field` and parses `raw` into its value type
fn dispatch_equals<Q: EqualsQuery>(field: FieldId, raw: &str, query: Q) -> CliResult<Q::Output> {
    Ok(match field {
        FieldId::Symbol => query.run::<Symbol>(raw),
        FieldId::Date => query.run::<Date>(raw),
        FieldId::High => query.run::<High>(&parse_value(field, raw)?),
        FieldId::Low => query.run::<Low>(&parse_value(field, raw)?),
        FieldId::Open => query.run::<Open>(&parse_value(field, raw)?),
        FieldId::Close => query.run::<Close>(&parse_value(field, raw)?),
        FieldId::CloseAdjusted => query.run::<CloseAdjusted>(&parse_value(field, raw)?),
        FieldId::Volume => query.run::<Volume>(&parse_value(field, raw)?),
        FieldId::SplitCoefficient => query.run::<SplitCoefficient>(&parse_value(field, raw)?),
    })
}

fn parse_value<T>(field: FieldId, raw: &str) -> CliResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e| {
        CliError::invalid_argument(format!("Invalid value '{}' for {}: {}", raw, field, e))
    })
}

fn aggregate(storage: &Storage, field: FieldId, op: AggregateOp, layout: Layout) -> CliResult<Value> {
    match field {
        FieldId::High => aggregate_by::<High>(storage, op, layout),
        FieldId::Low => aggregate_by::<Low>(storage, op, layout),
        FieldId::Open => aggregate_by::<Open>(storage, op, layout),
        FieldId::Close => aggregate_by::<Close>(storage, op, layout),
        FieldId::CloseAdjusted => aggregate_by::<CloseAdjusted>(storage, op, layout),
        FieldId::Volume => aggregate_by::<Volume>(storage, op, layout),
        FieldId::SplitCoefficient => aggregate_by::<SplitCoefficient>(storage, op, layout),
        FieldId::Symbol | FieldId::Date => Err(CliError::invalid_argument(format!(
            "Cannot aggregate non-numeric field {}",
            field
        ))),
    }
}

fn aggregate_by<F>(storage: &Storage, op: AggregateOp, layout: Layout) -> CliResult<Value>
where
    F: NumericField,
    F::Num: Serialize,
{
    let value = match (layout, op) {
        (Layout::Row, AggregateOp::Min) => storage.row_min::<F>(),
        (Layout::Row, AggregateOp::Max) => storage.row_max::<F>(),
        (Layout::Row, AggregateOp::Sum) => storage.row_sum::<F>(),
        (Layout::Column, AggregateOp::Min) => storage.column_min::<F>(),
        (Layout::Column, AggregateOp::Max) => storage.column_max::<F>(),
        (Layout::Column, AggregateOp::Sum) => storage.column_sum::<F>(),
    };
    Ok(serde_json::to_value(value)?)
}
