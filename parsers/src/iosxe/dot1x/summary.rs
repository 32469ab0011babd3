//! `show dot1x all summary` and `show dot1x all count`.

use std::sync::LazyLock;

use showparse_core::{Field, Mapping, Schema, Value};

use crate::command::CommandTemplate;
use crate::decoders::xml::{self, Element};
use crate::engine::{Context, Hit, Rule, RuleTable, Scan, ScanOptions};
use crate::error::{ParseError, Result};
use crate::parser::{ShowParser, XmlDecoder, run_table};
use crate::util::canonical_interface_name;

const SUMMARY_COMMAND: CommandTemplate = CommandTemplate::new("show dot1x all summary");
const COUNT_COMMAND: CommandTemplate = CommandTemplate::new("show dot1x all count");

/// `AUTH`, `Authenticator`, ... are the authenticator role; anything else
/// is the supplicant.
fn pae_role(column: &str) -> &'static str {
    if column.to_ascii_lowercase().contains("auth") {
        "authenticator"
    } else {
        "supplicant"
    }
}

fn write_client(scan: &mut Scan, hit: &Hit<'_>, pae: &str) -> Result<()> {
    let client = hit.text("client")?;
    let status = hit.lower("status")?;
    let entry = scan.enter_within("interface", "client", &["clients", client])?;
    entry.insert("client".into(), Value::from(client));
    entry.insert("status".into(), Value::from(status));
    entry.insert("pae".into(), Value::from(pae));
    Ok(())
}

// Fa1                   AUTH             000d.bcff.afcc           UNAUTHORIZED
fn client_row(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let intf = canonical_interface_name(hit.text("intf")?);
    let pae = pae_role(hit.text("pae")?);
    scan.enter("interface", vec!["interfaces".into(), intf.clone()])?
        .insert("interface".into(), Value::from(intf));
    scan.remember("interface", "pae", pae)?;
    write_client(scan, hit, pae)
}

//                       AUTH             000d.bcff.afcc           UNAUTHORIZED
//                                        fa16.3eff.0ce0           AUTHORIZED
fn continuation_row(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let pae = match hit.get("pae") {
        Some(column) => {
            let pae = pae_role(column);
            scan.remember("interface", "pae", pae)?;
            pae.to_string()
        }
        None => scan.recall_required("interface", "pae")?,
    };
    write_client(scan, hit, &pae)
}

static SUMMARY_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new(vec![
        Rule::new(
            "client_row",
            r"^(?P<intf>[\w\-/\.:]+) +(?P<pae>\w+) +(?P<client>\w+\.\w+\.\w+) +(?P<status>\w+)$",
            client_row,
        ),
        Rule::new(
            "continuation_row",
            r"^(?:(?P<pae>\w+) +)?(?P<client>\w+\.\w+\.\w+) +(?P<status>\w+)$",
            continuation_row,
        ),
    ])
});

static SUMMARY_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let client = Schema::fields([
        Field::required("client", Schema::Str),
        Field::required("status", Schema::Str),
        Field::required("pae", Schema::choice(&["authenticator", "supplicant"])),
    ]);
    let interface = Schema::fields([
        Field::required("interface", Schema::Str),
        Field::required("clients", Schema::any_key(client)),
    ]);
    Schema::fields([Field::optional("interfaces", Schema::any_key(interface))])
});

/// Parser for `show dot1x all summary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowDot1xAllSummary;

impl ShowParser for ShowDot1xAllSummary {
    fn name(&self) -> &'static str {
        "ShowDot1xAllSummary"
    }

    fn command(&self) -> Result<String> {
        SUMMARY_COMMAND.render(&[])
    }

    fn schema(&self) -> &'static Schema {
        &SUMMARY_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &SUMMARY_TABLE, Context::new(), options)
    }
}

const COUNT_FIELDS: [&str; 3] = ["authorized_clients", "unauthorized_clients", "total"];

fn session_count(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let sessions = scan.root_child("sessions")?;
    for field in COUNT_FIELDS {
        if hit.get(field).is_some() {
            sessions.insert(field.to_string(), Value::from(hit.int(field)?));
        }
    }
    Ok(())
}

static COUNT_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new(vec![
        Rule::new(
            "authorized_clients",
            r"^Authorized +Clients +\= +(?P<authorized_clients>\d+)$",
            session_count,
        ),
        Rule::new(
            "unauthorized_clients",
            r"^UnAuthorized +Clients +\= +(?P<unauthorized_clients>\d+)$",
            session_count,
        ),
        Rule::new(
            "total",
            r"^Total +No +of +Client +\= +(?P<total>\d+)$",
            session_count,
        ),
    ])
});

static COUNT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let sessions = Schema::fields(COUNT_FIELDS.map(|name| Field::required(name, Schema::Int)));
    Schema::fields([Field::optional("sessions", sessions)])
});

/// Parser for `show dot1x all count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowDot1xAllCount;

impl ShowParser for ShowDot1xAllCount {
    fn name(&self) -> &'static str {
        "ShowDot1xAllCount"
    }

    fn command(&self) -> Result<String> {
        COUNT_COMMAND.render(&[])
    }

    fn schema(&self) -> &'static Schema {
        &COUNT_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &COUNT_TABLE, Context::new(), options)
    }
}

impl XmlDecoder for ShowDot1xAllCount {
    /// Reads `<dot1x-count><sessions>...</sessions></dot1x-count>`.
    fn decode_xml(&self, xml: &str) -> Result<Mapping> {
        let document = xml::parse_document(xml)?;
        let mut output = Mapping::new();
        let Some(sessions) = document.find(&["dot1x-count", "sessions"]) else {
            return Ok(output);
        };

        let mut counts = Mapping::new();
        for field in COUNT_FIELDS {
            if let Some(value) = xml_count(sessions, field)? {
                counts.insert(field.to_string(), Value::from(value));
            }
        }
        output.insert("sessions".into(), Value::Map(counts));
        Ok(output)
    }
}

fn xml_count(sessions: &Element, field: &str) -> Result<Option<i64>> {
    let tag = field.replace('_', "-");
    let Some(text) = sessions.child_text(&tag) else {
        return Ok(None);
    };
    text.parse()
        .map(Some)
        .map_err(|_| ParseError::Xml(format!("<{tag}> must be an integer, found `{text}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(value: Value) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    const SUMMARY: &str = "\
Interface       PAE     Client          Status
--------------------------------------------------------
Fa1             AUTH    000d.bcff.afcc  UNAUTHORIZED
                        fa16.3eff.0ce0  AUTHORIZED
Gi1/0/2         SUPP    fa16.3eff.0ce1  AUTHORIZED
";

    #[test]
    fn test_continuation_row_inherits_pae() {
        let value = ShowDot1xAllSummary.parse(SUMMARY).unwrap();
        assert_eq!(
            json(value),
            serde_json::json!({
                "interfaces": {
                    "FastEthernet1": {
                        "interface": "FastEthernet1",
                        "clients": {
                            "000d.bcff.afcc": {
                                "client": "000d.bcff.afcc",
                                "status": "unauthorized",
                                "pae": "authenticator"
                            },
                            "fa16.3eff.0ce0": {
                                "client": "fa16.3eff.0ce0",
                                "status": "authorized",
                                "pae": "authenticator"
                            }
                        }
                    },
                    "GigabitEthernet1/0/2": {
                        "interface": "GigabitEthernet1/0/2",
                        "clients": {
                            "fa16.3eff.0ce1": {
                                "client": "fa16.3eff.0ce1",
                                "status": "authorized",
                                "pae": "supplicant"
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_continuation_row_with_own_pae() {
        let raw = "Gi1 AUTH aaaa.bbbb.cccc AUTHORIZED\n    SUPP dddd.eeee.ffff UNAUTHORIZED\n";
        let value = ShowDot1xAllSummary.parse(raw).unwrap();
        assert_eq!(
            value.get_path(&["interfaces", "GigabitEthernet1", "clients", "dddd.eeee.ffff", "pae"]),
            Some(&Value::from("supplicant"))
        );
    }

    #[test]
    fn test_continuation_row_without_interface_fails_fast() {
        let err = ShowDot1xAllSummary
            .parse("fa16.3eff.0ce0 AUTHORIZED")
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingCarriedValue { rule: "continuation_row", .. }));
    }

    #[test]
    fn test_pae_role() {
        assert_eq!(pae_role("AUTH"), "authenticator");
        assert_eq!(pae_role("Authenticator"), "authenticator");
        assert_eq!(pae_role("SUPP"), "supplicant");
    }

    const COUNT: &str = "\
Number of Dot1x sessions
-------------------------------
Authorized Clients        = 3
UnAuthorized Clients      = 2
Total No of Client        = 5
";

    #[test]
    fn test_count_sessions() {
        let value = ShowDot1xAllCount.parse(COUNT).unwrap();
        assert_eq!(
            json(value),
            serde_json::json!({
                "sessions": {"authorized_clients": 3, "unauthorized_clients": 2, "total": 5}
            })
        );
    }

    #[test]
    fn test_partial_count_violates_schema() {
        let err = ShowDot1xAllCount.parse("Authorized Clients = 3").unwrap_err();
        assert!(matches!(err, ParseError::Schema(_)));
    }

    #[test]
    fn test_count_xml_matches_text() {
        let xml = "\
<dot1x-count>
  <sessions>
    <authorized-clients>3</authorized-clients>
    <unauthorized-clients>2</unauthorized-clients>
    <total>5</total>
  </sessions>
</dot1x-count>";
        assert_eq!(
            ShowDot1xAllCount.parse_xml(xml).unwrap(),
            ShowDot1xAllCount.parse(COUNT).unwrap()
        );
    }

    #[test]
    fn test_count_xml_rejects_non_numeric() {
        let xml = "<dot1x-count><sessions><total>five</total></sessions></dot1x-count>";
        assert!(matches!(
            ShowDot1xAllCount.decode_xml(xml),
            Err(ParseError::Xml(_))
        ));
    }

    #[test]
    fn test_count_xml_without_sessions_is_empty() {
        assert!(ShowDot1xAllCount.decode_xml("<dot1x-count/>").unwrap().is_empty());
    }
}
