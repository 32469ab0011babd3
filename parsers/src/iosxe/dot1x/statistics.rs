//! EAPOL frame counters: `show dot1x all statistics`,
//! `show dot1x interface {interface} statistics` and `show dot1x statistics`.
//!
//! The per-interface commands print a grid of `Key = Value` counters that
//! varies between releases, so those tables lower-case whatever counter
//! names appear. The global `show dot1x statistics` layout is fixed and is
//! matched line by line.

use std::sync::LazyLock;

use showparse_core::{Field, Mapping, Schema, Value};
use tracing::debug;

use crate::command::CommandTemplate;
use crate::decoders::model;
use crate::decoders::xml::{self, Element};
use crate::engine::{Context, Hit, Rule, RuleTable, Scan, ScanOptions};
use crate::error::{ParseError, Result};
use crate::parser::{ModelDecoder, ShowParser, XmlDecoder, run_table};
use crate::util::canonical_interface_name;

const ALL_COMMAND: CommandTemplate = CommandTemplate::new("show dot1x all statistics");
const INTERFACE_COMMAND: CommandTemplate =
    CommandTemplate::new("show dot1x interface {interface} statistics");
const GLOBAL_COMMAND: CommandTemplate = CommandTemplate::new("show dot1x statistics");

const LAST_RX_SRC_MAC: &str = "lastrxsrcmac";

/// Counters that may or may not appear in a per-interface grid.
const OPTIONAL_COUNTERS: &[&str] = &[
    "rxreq", "txreq", "txstart", "rxstart", "txlogoff", "rxlogoff", "txresp", "rxresp", "rxrespid",
    "txreqid", "rxinvalid", "rxlenerr",
];

// RxVersion = 3 LastRxSrcMAC = 0027.90bf.c931
fn rx_version(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let version = hit.int("rxversion")?;
    let mac = hit.text("lastrxsrcmac")?;
    let stats = scan.at("statistics")?;
    stats.insert("rxversion".into(), Value::from(version));
    stats.insert(LAST_RX_SRC_MAC.into(), Value::from(mac));
    Ok(())
}

// RxReq = 0       RxInvalid = 0    RxLenErr = 0    RxTotal = 0
fn counter(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let key = hit.lower("key")?;
    let value = hit.int("val")?;
    scan.at("statistics")?.insert(key, Value::from(value));
    Ok(())
}

/// Rules shared by both per-interface tables. The version line must come
/// before the counter grid, which would otherwise split the MAC address.
fn counter_rules() -> [Rule; 2] {
    [
        Rule::new(
            "rx_version",
            r"^RxVersion\s+=+\s*(?P<rxversion>\d+)\s+LastRxSrcMAC\s+=+\s*(?P<lastrxsrcmac>\w+\.\w+\.\w+)$",
            rx_version,
        ),
        Rule::repeated("counter", r"(?P<key>\w+)\s+=+\s*(?P<val>\d+)", counter),
    ]
}

fn all_header(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let intf = hit.text("intf")?;
    scan.enter("interface", vec!["interfaces".into(), intf.into()])?
        .insert("interface".into(), Value::from(intf));
    scan.enter_within("interface", "statistics", &["statistics"])?;
    Ok(())
}

static ALL_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    let mut rules = vec![Rule::new(
        "port_statistics",
        r"^Dot1x +(?P<pae>Supplicant|Authenticator) +Port +Statistics +for +(?P<intf>[\w\-/\.:]+)$",
        all_header,
    )];
    rules.extend(counter_rules());
    // Tabs separate the grid columns; one space keeps `Key\t= n` matchable.
    RuleTable::new(rules).with_options(ScanOptions { tab_width: 1 })
});

fn counter_fields(required: &[&str]) -> Vec<Field> {
    let mut fields: Vec<Field> = required
        .iter()
        .map(|name| Field::required(name, Schema::Int))
        .collect();
    fields.push(Field::required(LAST_RX_SRC_MAC, Schema::Str));
    fields.extend(
        OPTIONAL_COUNTERS
            .iter()
            .filter(|name| !required.contains(*name))
            .map(|name| Field::optional(name, Schema::Int)),
    );
    fields
}

static ALL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let statistics = Schema::fields(counter_fields(&[
        "rxinvalid",
        "rxlenerr",
        "rxtotal",
        "txtotal",
        "rxversion",
    ]));
    let interface = Schema::fields([
        Field::required("interface", Schema::Str),
        Field::required("statistics", statistics),
    ]);
    Schema::fields([Field::optional("interfaces", Schema::any_key(interface))])
});

/// Parser for `show dot1x all statistics`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowDot1xAllStatistics;

impl ShowParser for ShowDot1xAllStatistics {
    fn name(&self) -> &'static str {
        "ShowDot1xAllStatistics"
    }

    fn command(&self) -> Result<String> {
        ALL_COMMAND.render(&[])
    }

    fn schema(&self) -> &'static Schema {
        &ALL_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &ALL_TABLE, Context::new(), options)
    }
}

impl XmlDecoder for ShowDot1xAllStatistics {
    /// Reads one `<interface>` element per port:
    ///
    /// ```xml
    /// <dot1x-statistics>
    ///   <interface>
    ///     <name>GigabitEthernet1/0/9</name>
    ///     <statistics><rx-total>0</rx-total>...</statistics>
    ///   </interface>
    /// </dot1x-statistics>
    /// ```
    fn decode_xml(&self, xml: &str) -> Result<Mapping> {
        let document = xml::parse_document(xml)?;
        let mut output = Mapping::new();
        let Some(root) = document.child("dot1x-statistics") else {
            return Ok(output);
        };

        let mut interfaces = Mapping::new();
        for element in root.children_named("interface") {
            let Some(name) = element.child_text("name") else {
                return Err(ParseError::Xml("<interface> without <name>".to_string()));
            };
            let mut entry = Mapping::new();
            entry.insert("interface".into(), Value::from(name));
            if let Some(statistics) = element.child("statistics") {
                entry.insert("statistics".into(), Value::Map(xml_counters(statistics)?));
            }
            interfaces.insert(name.to_string(), Value::Map(entry));
        }
        debug!(interfaces = interfaces.len(), "Decoded dot1x statistics XML");

        if !interfaces.is_empty() {
            output.insert("interfaces".into(), Value::Map(interfaces));
        }
        Ok(output)
    }

    /// The XML rendering prints the source MAC colon-separated.
    fn xml_exclusions(&self) -> &'static [&'static str] {
        &["interfaces.*.statistics.lastrxsrcmac"]
    }
}

fn xml_counters(statistics: &Element) -> Result<Mapping> {
    let mut counters = Mapping::new();
    for leaf in &statistics.children {
        let key = leaf.name.replace('-', "");
        let text = leaf.text.trim();
        if key == LAST_RX_SRC_MAC {
            counters.insert(key, Value::from(text));
            continue;
        }
        let value = text.parse::<i64>().map_err(|_| {
            ParseError::Xml(format!("<{}> must be an integer, found `{text}`", leaf.name))
        })?;
        counters.insert(key, Value::from(value));
    }
    Ok(counters)
}

// Dot1x Authenticator Port Statistics for FortyGigabitEthernet1/1/1
fn interface_header(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let intf = canonical_interface_name(hit.text("interface")?);
    let port_type = hit.text("type")?;
    scan.enter(
        "statistics",
        vec!["interface".into(), intf, "type".into(), port_type.into()],
    )?;
    Ok(())
}

static INTERFACE_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    let mut rules = vec![Rule::new(
        "port_statistics",
        r"^Dot1x\s+(?P<type>\w+)\s+Port\s+Statistics\s+for\s+(?P<interface>[\w/\.\-:]+)$",
        interface_header,
    )];
    rules.extend(counter_rules());
    RuleTable::new(rules)
});

static INTERFACE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let counters = Schema::fields(counter_fields(&["rxtotal", "txtotal", "rxversion"]));
    let interface = Schema::fields([Field::required("type", Schema::any_key(counters))]);
    Schema::fields([Field::optional("interface", Schema::any_key(interface))])
});

/// Parser for `show dot1x interface {interface} statistics`.
///
/// Only blocks for the named interface are kept; the name may be given in
/// abbreviated or canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowDot1xInterfaceStatistics {
    pub interface: String,
}

impl ShowDot1xInterfaceStatistics {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }
}

impl ShowParser for ShowDot1xInterfaceStatistics {
    fn name(&self) -> &'static str {
        "ShowDot1xInterfaceStatistics"
    }

    fn command(&self) -> Result<String> {
        INTERFACE_COMMAND.render(&[("interface", self.interface.as_str())])
    }

    fn schema(&self) -> &'static Schema {
        &INTERFACE_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        let mut output = run_table(output, &INTERFACE_TABLE, Context::new(), options)?;
        let wanted = canonical_interface_name(&self.interface);
        if let Some(Value::Map(interfaces)) = output.get_mut("interface") {
            interfaces.retain(|name, _| *name == wanted);
            if interfaces.is_empty() {
                output.remove("interface");
            }
        }
        Ok(output)
    }
}

const GLOBAL_COUNTERS: [&str; 18] = [
    "rx_start",
    "rx_logoff",
    "rx_resp",
    "rx_resp_id",
    "rx_req",
    "rx_invalid",
    "rx_len_err",
    "rx_total",
    "tx_start",
    "tx_logoff",
    "tx_resp",
    "tx_req",
    "re_tx_req",
    "re_tx_req_fail",
    "tx_req_id",
    "re_tx_req_id",
    "re_tx_req_id_fail",
    "tx_total",
];

fn global_counters(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let stats = scan.root_child("dot1x_stats")?;
    for name in GLOBAL_COUNTERS {
        if hit.get(name).is_some() {
            stats.insert(name.to_string(), Value::from(hit.int(name)?));
        }
    }
    Ok(())
}

static GLOBAL_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new(vec![
        Rule::new(
            "rx_start",
            r"^RxStart\s+=\s+(?P<rx_start>\d+)\s+RxLogoff\s+=\s+(?P<rx_logoff>\d+)\s+RxResp\s+=\s+(?P<rx_resp>\d+)\s+RxRespID\s+=\s+(?P<rx_resp_id>\d+)$",
            global_counters,
        ),
        Rule::new(
            "rx_req",
            r"^RxReq\s+=\s+(?P<rx_req>\d+)\s+RxInvalid\s+=\s+(?P<rx_invalid>\d+)\s+RxLenErr\s+=\s+(?P<rx_len_err>\d+)$",
            global_counters,
        ),
        Rule::new("rx_total", r"^RxTotal\s+=\s+(?P<rx_total>\d+)$", global_counters),
        Rule::new(
            "tx_start",
            r"^TxStart\s+=\s+(?P<tx_start>\d+)\s+TxLogoff\s+=\s+(?P<tx_logoff>\d+)\s+TxResp\s+=\s+(?P<tx_resp>\d+)$",
            global_counters,
        ),
        Rule::new(
            "tx_req",
            r"^TxReq\s+=\s+(?P<tx_req>\d+)\s+ReTxReq\s+=\s+(?P<re_tx_req>\d+)\s+ReTxReqFail\s+=\s+(?P<re_tx_req_fail>\d+)$",
            global_counters,
        ),
        Rule::new(
            "tx_req_id",
            r"^TxReqID\s+=\s+(?P<tx_req_id>\d+)\s+ReTxReqID\s+=\s+(?P<re_tx_req_id>\d+)\s+ReTxReqIDFail\s+=\s+(?P<re_tx_req_id_fail>\d+)$",
            global_counters,
        ),
        Rule::new("tx_total", r"^TxTotal\s+=\s+(?P<tx_total>\d+)$", global_counters),
    ])
});

static GLOBAL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let stats = Schema::fields(GLOBAL_COUNTERS.map(|name| Field::optional(name, Schema::Int)));
    Schema::fields([Field::optional("dot1x_stats", stats)])
});

/// Parser for `show dot1x statistics`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowDot1xStatistics;

impl ShowParser for ShowDot1xStatistics {
    fn name(&self) -> &'static str {
        "ShowDot1xStatistics"
    }

    fn command(&self) -> Result<String> {
        GLOBAL_COMMAND.render(&[])
    }

    fn schema(&self) -> &'static Schema {
        &GLOBAL_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &GLOBAL_TABLE, Context::new(), options)
    }
}

impl ModelDecoder for ShowDot1xStatistics {
    /// Reads the `dot1x-statistics` container, prefixed or not.
    fn decode_model(&self, document: &str) -> Result<Mapping> {
        let document = model::parse_document(document)?;
        let mut output = Mapping::new();
        if let Some(stats) = model::container(&document, "dot1x-statistics")? {
            output.insert("dot1x_stats".into(), Value::Map(model::integer_leaves(stats)?));
        }
        Ok(output)
    }
}
