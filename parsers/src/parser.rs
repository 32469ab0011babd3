//! Parser traits shared by every show-command parser.
//!
//! A parser is a [`Schema`] plus one or more decoders. The text decoder is
//! mandatory; [`XmlDecoder`] and [`ModelDecoder`] are alternate front ends
//! that must produce the same tree for the same device state. Every public
//! entry point validates its result against the parser's schema before
//! returning it.

use showparse_core::{Mapping, Schema, Value, validate};
use tracing::debug;

use crate::device::Device;
use crate::engine::{self, Context, RuleTable, ScanOptions};
use crate::error::Result;

/// A parser for one show command.
pub trait ShowParser: Send + Sync {
    /// Stable parser identifier, e.g. `ShowDot1xAllDetail`.
    fn name(&self) -> &'static str;

    /// The fully rendered command this parser runs.
    fn command(&self) -> Result<String>;

    /// Shape every decoded tree must conform to.
    fn schema(&self) -> &'static Schema;

    /// Text decoder, optionally overriding the rule table's scan options.
    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping>;

    /// Text decoder with the table's own scan options.
    fn decode(&self, output: &str) -> Result<Mapping> {
        self.decode_with(output, None)
    }

    /// Decodes and validates text output.
    fn parse_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Value> {
        validated(self.schema(), self.decode_with(output, options)?)
    }

    /// Decodes and validates text output.
    ///
    /// Empty or unrecognized output yields an empty mapping, which every
    /// schema accepts.
    fn parse(&self, output: &str) -> Result<Value> {
        self.parse_with(output, None)
    }

    /// Fetches the output from `device` (exactly once) and parses it.
    fn execute(&self, device: &dyn Device) -> Result<Value> {
        let command = self.command()?;
        debug!(parser = self.name(), command = %command, "Executing show command");
        let output = device.execute(&command)?;
        self.parse(&output)
    }
}

/// XML front end producing the same tree as the text decoder.
pub trait XmlDecoder: ShowParser {
    fn decode_xml(&self, xml: &str) -> Result<Mapping>;

    /// Dotted paths (with `*` wildcard segments) that legitimately differ
    /// between the text and XML decoders.
    fn xml_exclusions(&self) -> &'static [&'static str] {
        &[]
    }

    fn parse_xml(&self, xml: &str) -> Result<Value> {
        validated(self.schema(), self.decode_xml(xml)?)
    }

    /// Fetches the XML rendering (`<command> | format`) and parses it.
    fn execute_xml(&self, device: &dyn Device) -> Result<Value> {
        let command = format!("{} | format", self.command()?);
        debug!(parser = self.name(), command = %command, "Executing XML show command");
        let output = device.execute(&command)?;
        self.parse_xml(&output)
    }
}

/// Structured model (JSON) front end producing the same tree as the text
/// decoder.
pub trait ModelDecoder: ShowParser {
    fn decode_model(&self, document: &str) -> Result<Mapping>;

    fn model_exclusions(&self) -> &'static [&'static str] {
        &[]
    }

    fn parse_model(&self, document: &str) -> Result<Value> {
        validated(self.schema(), self.decode_model(document)?)
    }
}

/// Wraps `mapping` as the tree root and checks it against `schema`.
pub(crate) fn validated(schema: &Schema, mapping: Mapping) -> Result<Value> {
    let value = Value::Map(mapping);
    validate(schema, &value)?;
    Ok(value)
}

/// Runs `table` over `output`, honoring an optional options override.
pub(crate) fn run_table(
    output: &str,
    table: &RuleTable,
    context: Context,
    options: Option<ScanOptions>,
) -> Result<Mapping> {
    let options = options.unwrap_or_else(|| table.options());
    engine::scan_with_options(output, table, context, options).map(|outcome| outcome.output)
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use showparse_core::{Field, SchemaError};

    use super::*;
    use crate::device::DeviceError;
    use crate::engine::{Hit, Rule, Scan};
    use crate::error::ParseError;

    static SCHEMA: LazyLock<Schema> =
        LazyLock::new(|| Schema::fields([Field::optional("version", Schema::Int)]));

    fn version(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
        let value = hit.int("val")?;
        scan.root().insert("version".into(), Value::from(value));
        Ok(())
    }

    fn wrong_type(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
        let value = hit.text("val")?;
        scan.root().insert("version".into(), Value::from(value));
        Ok(())
    }

    static TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
        RuleTable::new(vec![
            Rule::new("version", r"^Version +(?P<val>\d+)$", version),
            Rule::new("wrong_type", r"^Release +(?P<val>\S+)$", wrong_type),
        ])
    });

    struct VersionParser;

    impl ShowParser for VersionParser {
        fn name(&self) -> &'static str {
            "VersionParser"
        }

        fn command(&self) -> Result<String> {
            Ok("show version".to_string())
        }

        fn schema(&self) -> &'static Schema {
            &SCHEMA
        }

        fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
            run_table(output, &TABLE, Context::new(), options)
        }
    }

    struct CountingDevice {
        calls: AtomicUsize,
    }

    impl Device for CountingDevice {
        fn execute(&self, command: &str) -> std::result::Result<String, DeviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(command, "show version");
            Ok("Version 3\n".to_string())
        }
    }

    #[test]
    fn test_parse_validates_output() {
        let value = VersionParser.parse("Version 3").unwrap();
        assert_eq!(value.get_path(&["version"]), Some(&Value::from(3)));
    }

    #[test]
    fn test_schema_violation_surfaces() {
        let err = VersionParser.parse("Release 17.3").unwrap_err();
        assert!(matches!(err, ParseError::Schema(SchemaError::TypeMismatch { .. })));
    }

    #[test]
    fn test_empty_output_is_an_empty_valid_mapping() {
        assert_eq!(VersionParser.parse("").unwrap(), Value::map());
    }

    #[test]
    fn test_execute_calls_device_exactly_once() {
        let device = CountingDevice {
            calls: AtomicUsize::new(0),
        };
        let value = VersionParser.execute(&device).unwrap();
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
        assert_eq!(value.get_path(&["version"]), Some(&Value::from(3)));
    }

    #[test]
    fn test_device_failure_propagates_unchanged() {
        let device = crate::device::StaticDevice::new();
        let err = VersionParser.execute(&device).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Device(DeviceError::CommandRejected { .. })
        ));
    }
}
