//! `show dot1x all details` and `show dot1x`.

use std::sync::LazyLock;

use showparse_core::{Field, Mapping, Schema, Value};

use crate::command::CommandTemplate;
use crate::engine::{BoolCoercion, Context, Hit, Rule, RuleTable, Scan, ScanOptions};
use crate::error::Result;
use crate::parser::{ShowParser, run_table};

const DETAIL_COMMAND: CommandTemplate = CommandTemplate::new("show dot1x all details");
const SUMMARY_COMMAND: CommandTemplate = CommandTemplate::new("show dot1x");

/// Where a `Key = Value` line of an interface block lands.
#[derive(Debug, Clone, Copy)]
enum InterfaceField {
    /// The port access entity role; also carried for `EAP profile`.
    Pae,
    Lower(&'static str),
    Text(&'static str),
    Int(&'static str),
    Flag(&'static str, BoolCoercion),
    /// Integer under the interface's `timeout` mapping.
    Timer(&'static str),
    /// `<pae>.eap.profile`, keyed by the role seen earlier in the block.
    EapProfile,
}

/// Keys are matched exactly.
const INTERFACE_KEYS: &[(&str, InterfaceField)] = &[
    ("PAE", InterfaceField::Pae),
    ("PortControl", InterfaceField::Lower("port_control")),
    ("ControlDirection", InterfaceField::Lower("control_direction")),
    ("HostMode", InterfaceField::Lower("host_mode")),
    (
        "ReAuthentication",
        InterfaceField::Flag("re_authentication", BoolCoercion::UNLESS_DISABLED),
    ),
    ("QuietPeriod", InterfaceField::Timer("quiet_period")),
    ("ServerTimeout", InterfaceField::Timer("server_timeout")),
    ("SuppTimeout", InterfaceField::Timer("supp_timeout")),
    ("TxPeriod", InterfaceField::Timer("tx_period")),
    ("StartPeriod", InterfaceField::Timer("start_period")),
    ("AuthPeriod", InterfaceField::Timer("auth_period")),
    ("HeldPeriod", InterfaceField::Timer("held_period")),
    ("ReAuthPeriod", InterfaceField::Timer("re_auth_period")),
    ("RateLimitPeriod", InterfaceField::Timer("ratelimit_period")),
    ("ReAuthMax", InterfaceField::Int("max_reauth_req")),
    ("MaxReq", InterfaceField::Int("max_req")),
    ("MaxStart", InterfaceField::Int("max_start")),
    ("Credentials profile", InterfaceField::Text("credentials")),
    ("EAP profile", InterfaceField::EapProfile),
];

fn system_auth_control(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let enabled = hit.flag("val", BoolCoercion::ENABLED)?;
    scan.root()
        .insert("system_auth_control".into(), Value::from(enabled));
    Ok(())
}

fn protocol_version(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let version = hit.int("val")?;
    scan.root().insert("version".into(), Value::from(version));
    Ok(())
}

fn interface(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let intf = hit.text("intf")?;
    scan.enter("interface", vec!["interfaces".into(), intf.into()])?
        .insert("interface".into(), Value::from(intf));
    Ok(())
}

fn eap_method(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let method = hit.lower("eap")?;
    scan.remember("interface", "eap_method", method)
}

fn supplicant(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let client = hit.text("client")?;
    let method = scan.recall("interface", "eap_method").map(str::to_string);
    let entry = scan.enter_within("interface", "client", &["clients", client])?;
    entry.insert("client".into(), Value::from(client));
    if let Some(method) = method {
        entry.insert("eap_method".into(), Value::from(method));
    }
    Ok(())
}

fn session_id(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let id = hit.text("session_id")?;
    scan.enter_within("client", "session", &["session", id])?
        .insert("session_id".into(), Value::from(id));
    Ok(())
}

fn auth_sm_state(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let state = hit.lower("state")?;
    scan.at("session")?
        .insert("auth_sm_state".into(), Value::from(state));
    Ok(())
}

fn auth_bend_sm_state(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let state = hit.lower("state")?;
    scan.at("session")?
        .insert("auth_bend_sm_state".into(), Value::from(state));
    Ok(())
}

fn interface_key(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
    let key = hit.text("key")?.trim();
    let Some((_, field)) = INTERFACE_KEYS.iter().find(|(name, _)| *name == key) else {
        return Ok(());
    };

    match *field {
        InterfaceField::Pae => {
            let pae = hit.lower("val")?;
            scan.at("interface")?
                .insert("pae".into(), Value::from(pae.as_str()));
            scan.remember("interface", "pae", pae)?;
        }
        InterfaceField::Lower(name) => {
            let value = hit.lower("val")?;
            scan.at("interface")?.insert(name.into(), Value::from(value));
        }
        InterfaceField::Text(name) => {
            let value = hit.text("val")?;
            scan.at("interface")?.insert(name.into(), Value::from(value));
        }
        InterfaceField::Int(name) => {
            let value = hit.int("val")?;
            scan.at("interface")?.insert(name.into(), Value::from(value));
        }
        InterfaceField::Flag(name, coercion) => {
            let value = hit.flag("val", coercion)?;
            scan.at("interface")?.insert(name.into(), Value::from(value));
        }
        InterfaceField::Timer(name) => {
            let value = hit.int("val")?;
            scan.at_within("interface", &["timeout"])?
                .insert(name.into(), Value::from(value));
        }
        InterfaceField::EapProfile => {
            let profile = hit.text("val")?;
            let pae = scan.recall_required("interface", "pae")?;
            scan.at_within("interface", &[pae.as_str(), "eap"])?
                .insert("profile".into(), Value::from(profile));
        }
    }
    Ok(())
}

fn global_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "system_auth_control",
            r"^Sysauthcontrol +(?P<val>\w+)$",
            system_auth_control,
        ),
        Rule::new(
            "protocol_version",
            r"^Dot1x +Protocol +Version +(?P<val>\d+)$",
            protocol_version,
        ),
    ]
}

static DETAIL_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    let mut rules = global_rules();
    rules.extend([
        Rule::new(
            "interface",
            r"^Dot1x +Info +for +(?P<intf>[\w\-/\.:]+)$",
            interface,
        ),
        Rule::new("eap_method", r"^EAP +Method +\= +(?P<eap>\S+)$", eap_method),
        Rule::new(
            "supplicant",
            r"^Supplicant +\= +(?P<client>[\w\.]+)$",
            supplicant,
        ),
        Rule::new(
            "session_id",
            r"^Session +ID +\= +(?P<session_id>[\w\-]+)$",
            session_id,
        ),
        Rule::new(
            "auth_sm_state",
            r"^Auth +SM +State +\= +(?P<state>[\w\-]+)$",
            auth_sm_state,
        ),
        Rule::new(
            "auth_bend_sm_state",
            r"^Auth +BEND +SM +State +\= +(?P<state>[\w\-]+)$",
            auth_bend_sm_state,
        ),
        // Catch-all for interface settings; must stay last.
        Rule::new(
            "interface_key",
            r"^(?P<key>[\w\s]+?) +\= +(?P<val>[\w\-]+)( *[\(\)\s\w]+)?$",
            interface_key,
        ),
    ]);
    RuleTable::new(rules)
});

static GLOBAL_TABLE: LazyLock<RuleTable> = LazyLock::new(|| RuleTable::new(global_rules()));

fn global_fields() -> Vec<Field> {
    vec![
        Field::optional("system_auth_control", Schema::Bool),
        Field::optional("version", Schema::Int),
    ]
}

fn eap_profile() -> Schema {
    Schema::fields([Field::required(
        "eap",
        Schema::fields([Field::required("profile", Schema::Str)]),
    )])
}

static DETAIL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let timeout = Schema::fields(
        [
            "server_timeout",
            "supp_timeout",
            "quiet_period",
            "tx_period",
            "auth_period",
            "held_period",
            "ratelimit_period",
            "start_period",
            "re_auth_period",
        ]
        .map(|name| Field::optional(name, Schema::Int)),
    );
    let session = Schema::fields([
        Field::required("session_id", Schema::Str),
        Field::optional("auth_sm_state", Schema::Str),
        Field::optional("auth_bend_sm_state", Schema::Str),
    ]);
    let client = Schema::fields([
        Field::required("client", Schema::Str),
        Field::optional("eap_method", Schema::Str),
        Field::optional("session", Schema::any_key(session)),
    ]);
    let interface = Schema::fields([
        Field::required("interface", Schema::Str),
        Field::optional("pae", Schema::Str),
        Field::optional("credentials", Schema::Str),
        Field::optional("port_control", Schema::Str),
        Field::optional("control_direction", Schema::Str),
        Field::optional("host_mode", Schema::Str),
        Field::optional("re_authentication", Schema::Bool),
        Field::optional("max_reauth_req", Schema::Int),
        Field::optional("max_req", Schema::Int),
        Field::optional("max_start", Schema::Int),
        Field::optional("timeout", timeout),
        Field::optional("authenticator", eap_profile()),
        Field::optional("supplicant", eap_profile()),
        Field::optional("clients", Schema::any_key(client)),
    ]);

    let mut fields = global_fields();
    fields.push(Field::optional("interfaces", Schema::any_key(interface)));
    Schema::fields(fields)
});

static GLOBAL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| Schema::fields(global_fields()));

/// Parser for `show dot1x all details`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowDot1xAllDetail;

impl ShowParser for ShowDot1xAllDetail {
    fn name(&self) -> &'static str {
        "ShowDot1xAllDetail"
    }

    fn command(&self) -> Result<String> {
        DETAIL_COMMAND.render(&[])
    }

    fn schema(&self) -> &'static Schema {
        &DETAIL_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &DETAIL_TABLE, Context::new(), options)
    }
}

/// Parser for `show dot1x`: the global settings of the detail listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowDot1x;

impl ShowParser for ShowDot1x {
    fn name(&self) -> &'static str {
        "ShowDot1x"
    }

    fn command(&self) -> Result<String> {
        SUMMARY_COMMAND.render(&[])
    }

    fn schema(&self) -> &'static Schema {
        &GLOBAL_SCHEMA
    }

    fn decode_with(&self, output: &str, options: Option<ScanOptions>) -> Result<Mapping> {
        run_table(output, &GLOBAL_TABLE, Context::new(), options)
    }
}
