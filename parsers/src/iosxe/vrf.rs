//! `show vrf detail [<vrf>]`.
//!
//! Two listings in this output wrap across lines with no header of their
//! own: the interface list of a VRF and the route-target communities of an
//! address family. Both are opened by their heading line and extended with
//! [`Scan::append_to_last`] until the next header.

use std::sync::LazyLock;

use showparse_core::{Field, Mapping, Schema, Value};

use crate::command::CommandTemplate;
use crate::engine::{Context, Hit, Rule, RuleTable, Scan, ScanOptions};
use crate::error::Result;
use crate::parser::{ShowParser, run_table};
use crate::util::canonical_interface_name;

const COMMAND: CommandTemplate = CommandTemplate::new("show vrf detail");
const VRF_COMMAND: CommandTemplate = CommandTemplate::new("show vrf detail {vrf}");

const NOT_SET: &str = "<not set>";

// VRF VRF1 (VRF Id = 2); default RD 100:1; default VPNID <not set>
fn vrf_header(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let name = hit.text("vrf")?;
    let vrf_id = hit.int("vrf_id")?;
    let rd = hit.text("rd")?;
    let vpn_id = hit.text("vpn_id")?;

    let vrf = scan.enter("vrf", vec![name.into()])?;
    vrf.insert("vrf_id".into(), Value::from(vrf_id));
    if rd != NOT_SET {
        vrf.insert("route_distinguisher".into(), Value::from(rd));
    }
    if vpn_id != NOT_SET {
        vrf.insert("vpn_id".into(), Value::from(vpn_id));
    }
    Ok(())
}

fn description(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let text = hit.text("description")?;
    scan.at("vrf")?
        .insert("description".into(), Value::from(text));
    Ok(())
}

// New CLI format, supports multiple address-families
fn cli_format(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let format = hit.text("cli_format")?;
    let support = hit.text("support_af")?;
    let vrf = scan.at("vrf")?;
    vrf.insert("cli_format".into(), Value::from(format));
    vrf.insert("support_af".into(), Value::from(support));
    Ok(())
}

/// `Flags:` belongs to the address family when one is open, else to the VRF.
fn flags(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let flags = hit.text("flags")?;
    if let Some(family) = scan.at_optional("address_family")? {
        family.insert("flags".into(), Value::from(flags));
        return Ok(());
    }
    scan.at("vrf")?.insert("flags".into(), Value::from(flags));
    Ok(())
}

fn interfaces_header(_: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    scan.open_list("vrf", "interfaces")
}

//     Tu1                      Lo300                    Gi2.390
fn interface_names(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    for name in hit.text("names")?.split_whitespace() {
        scan.append_to_last(canonical_interface_name(name))?;
    }
    Ok(())
}

// Address family ipv4 unicast (Table ID = 2 (0x2)):
fn address_family(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let af = hit.text("af")?;
    let table_id = hit.int("table_id")?;
    let family = scan.enter_within("vrf", "address_family", &["address_family", af])?;
    family.insert("active".into(), Value::from(true));
    family.insert("table_id".into(), Value::from(table_id));
    Ok(())
}

// Address family ipv4 multicast not active
fn inactive_address_family(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let af = hit.text("af")?;
    scan.enter_within("vrf", "address_family", &["address_family", af])?
        .insert("active".into(), Value::from(false));
    Ok(())
}

fn route_target_header(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let key = match hit.text("direction")? {
        "Export" => "export_route_targets",
        _ => "import_route_targets",
    };
    scan.open_list("address_family", key)
}

//     RT:100:1                 RT:200:1
fn route_target(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    scan.append_to_last(hit.text("rt")?)
}

// Import route-map for ipv4 unicast: IMPORT-MAP (prefix limit: 1000)
fn import_route_map(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let map = hit.text("map")?;
    let limit = hit.get("limit").map(|_| hit.int("limit")).transpose()?;
    let family = scan.at("address_family")?;
    family.insert("import_route_map".into(), Value::from(map));
    if let Some(limit) = limit {
        family.insert("import_prefix_limit".into(), Value::from(limit));
    }
    Ok(())
}

fn export_route_map(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let map = hit.text("map")?;
    let key = if hit.get("global").is_some() {
        "global_export_route_map"
    } else {
        "export_route_map"
    };
    scan.at("address_family")?.insert(key.into(), Value::from(map));
    Ok(())
}

fn label_protocol(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let protocol = hit.text("protocol")?;
    scan.at_within("address_family", &["vrf_label"])?
        .insert("distribution_protocol".into(), Value::from(protocol));
    Ok(())
}

fn label_allocation(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let mode = hit.text("mode")?;
    scan.at_within("address_family", &["vrf_label"])?
        .insert("allocation_mode".into(), Value::from(mode));
    Ok(())
}

static TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new(vec![
        Rule::new(
            "vrf",
            r"^VRF +(?P<vrf>\S+) +\(VRF +Id += +(?P<vrf_id>\d+)\); +default +RD +(?P<rd><not set>|\S+); +default +VPNID +(?P<vpn_id><not set>|\S+)$",
            vrf_header,
        ),
        Rule::new("description", r"^Description: +(?P<description>.+)$", description),
        Rule::new(
            "cli_format",
            r"^(?P<cli_format>New|Old) +CLI +format, +supports +(?P<support_af>.+)$",
            cli_format,
        ),
        Rule::new("flags", r"^Flags: +(?P<flags>0x[0-9A-Fa-f]+)$", flags),
        Rule::new("interfaces", r"^Interfaces:$", interfaces_header),
        Rule::new(
            "address_family",
            r"^Address +family +(?P<af>.+?) +\(Table +ID += +(?P<table_id>\d+)(?: +\(0x[0-9A-Fa-f]+\))?\):$",
            address_family,
        ),
        Rule::new(
            "inactive_address_family",
            r"^Address +family +(?P<af>.+?) +not +active$",
            inactive_address_family,
        ),
        Rule::new(
            "route_targets",
            r"^(?P<direction>Export|Import) +VPN +route-target +communities$",
            route_target_header,
        ),
        Rule::repeated("route_target", r"RT:(?P<rt>\S+)", route_target),
        Rule::new(
            "import_route_map",
            r"^Import +route-map +for +.+?: +(?P<map>\S+)(?: +\(prefix +limit: +(?P<limit>\d+)\))?$",
            import_route_map,
        ),
        Rule::new(
            "export_route_map",
            r"^(?:(?P<global>Global) +export|Export) +route-map +for +.+?: +(?P<map>\S+)$",
            export_route_map,
        ),
        Rule::new(
            "label_protocol",
            r"^VRF +label +distribution +protocol: +(?P<protocol>.+)$",
            label_protocol,
        ),
        Rule::new(
            "label_allocation",
            r"^VRF +label +allocation +mode: +(?P<mode>.+)$",
            label_allocation,
        ),
        // Bare interface names; kept last so every keyword line wins.
        Rule::new(
            "interface_names",
            r"^(?P<names>[A-Za-z][\w\-]*\d[\w/\.:\-]*(?:\s+[A-Za-z][\w\-]*\d[\w/\.:\-]*)*)$",
            interface_names,
        ),
    ])
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let vrf_label = Schema::fields([
        Field::optional("distribution_protocol", Schema::Str),
        Field::optional("allocation_mode", Schema::Str),
    ]);
    let family = Schema::fields([
        Field::required("active", Schema::Bool),
        Field::optional("table_id", Schema::Int),
        Field::optional("flags", Schema::Str),
        Field::optional("export_route_targets", Schema::list(Schema::Str)),
        Field::optional("import_route_targets", Schema::list(Schema::Str)),
        Field::optional("import_route_map", Schema::Str),
        Field::optional("import_prefix_limit", Schema::Int),
        Field::optional("export_route_map", Schema::Str),
        Field::optional("global_export_route_map", Schema::Str),
        Field::optional("vrf_label", vrf_label),
    ]);
    let vrf = Schema::fields([
        Field::required("vrf_id", Schema::Int),
        Field::optional("route_distinguisher", Schema::Str),
        Field::optional("vpn_id", Schema::Str),
        Field::optional("description", Schema::Str),
        Field::optional("cli_format", Schema::Str),
        Field::optional("support_af", Schema::Str),
        Field::optional("flags", Schema::Str),
        Field::optional("interfaces", Schema::list(Schema::Str)),
        Field::optional("address_family", Schema::any_key(family)),
    ]);
    Schema::any_key(vrf)
});

/// Parser for `show vrf detail`, optionally for a single VRF.
///
/// The output is keyed by VRF name at the top level. A parser built with
/// [`ShowVrfDetail::for_vrf`] keeps only that VRF's block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowVrfDetail {
    pub vrf: Option<String>,
}

impl ShowVrfDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_vrf(vrf: impl Into<String>) -> Self {
        Self {
            vrf: Some(vrf.into()),
        }
    }
}

impl ShowParser for ShowVrfDetail {
    fn name(&self) -> &'static str {
        "ShowVrfDetail"
    }

    fn command(&self) -> Result<String> {
        match &self.vrf {
            Some(vrf) => VRF_COMMAND.render(&[("vrf", vrf.as_str())]),
            None => COMMAND.render(&[]),
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        let mut vrfs = run_table(output, &TABLE, Context::new(), options)?;
        if let Some(wanted) = &self.vrf {
            vrfs.retain(|name, _| name == wanted);
        }
        Ok(vrfs)
    }
}
