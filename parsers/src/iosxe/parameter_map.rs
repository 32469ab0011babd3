//! `show parameter-map type subscriber attribute-to-service name {template_name}`.

use std::sync::LazyLock;

use showparse_core::{Field, Mapping, Schema, Value};

use crate::command::CommandTemplate;
use crate::engine::{Context, Hit, Rule, RuleTable, Scan, ScanOptions};
use crate::error::Result;
use crate::parser::{ShowParser, run_table};

const COMMAND: CommandTemplate = CommandTemplate::new(
    "show parameter-map type subscriber attribute-to-service name {template_name}",
);

fn map_name(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let name = hit.text("parameter_map_name")?;
    scan.root()
        .insert("parameter_map_name".into(), Value::from(name));
    Ok(())
}

// Map: 10 device-type regex "Cisco-IP-Phone"
// Map: 40 oui eq "00.0f.44"
fn map_entry(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    // Re-rendered so `010` and `10` share one entry.
    let id = hit.int("map_id")?.to_string();
    let device_type = hit.text("device_type")?;
    scan.enter("map", vec!["maps".into(), id])?
        .insert("device_type".into(), Value::from(device_type));
    Ok(())
}

// 20 interface-template IP_PHONE_INTERFACE_TEMPLATE
fn action(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let id = hit.int("action_id")?.to_string();
    let template = hit.text("interface_template")?;
    scan.at_within("map", &["action", id.as_str()])?
        .insert("interface_template".into(), Value::from(template));
    Ok(())
}

static TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new(vec![
        Rule::new(
            "parameter_map_name",
            r"^Parameter-map +name: +(?P<parameter_map_name>\S+)$",
            map_name,
        ),
        Rule::new(
            "map_device_type",
            r#"^Map: +(?P<map_id>\d+) +device-type +regex +"(?P<device_type>.+)"$"#,
            map_entry,
        ),
        Rule::new(
            "map_oui",
            r#"^Map: +(?P<map_id>\d+) +oui +eq +"(?P<device_type>.+)"$"#,
            map_entry,
        ),
        Rule::new(
            "action",
            r"^(?P<action_id>\d+) +interface-template +(?P<interface_template>\S+)$",
            action,
        ),
    ])
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let action = Schema::fields([Field::required("interface_template", Schema::Str)]);
    let map = Schema::fields([
        Field::required("device_type", Schema::Str),
        Field::optional("action", Schema::any_int_key(action)),
    ]);
    Schema::fields([
        Field::optional("parameter_map_name", Schema::Str),
        Field::optional("maps", Schema::any_int_key(map)),
    ])
});

/// Parser for `show parameter-map type subscriber attribute-to-service name
/// {template_name}`.
///
/// Map and action ids are integer keys of the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowParameterMapTypeSubscriberAttributeToService {
    pub template_name: String,
}

impl ShowParameterMapTypeSubscriberAttributeToService {
    pub fn new(template_name: impl Into<String>) -> Self {
        Self {
            template_name: template_name.into(),
        }
    }
}

impl ShowParser for ShowParameterMapTypeSubscriberAttributeToService {
    fn name(&self) -> &'static str {
        "ShowParameterMapTypeSubscriberAttributeToService"
    }

    fn command(&self) -> Result<String> {
        COMMAND.render(&[("template_name", self.template_name.as_str())])
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &TABLE, Context::new(), options)
    }
}
