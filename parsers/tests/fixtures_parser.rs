use std::fs;
use std::path::PathBuf;

use showparse_core::{Value, validate};
use showparse_parsers::iosxe::dot1x::{
    ShowDot1x, ShowDot1xAllCount, ShowDot1xAllDetail, ShowDot1xAllStatistics, ShowDot1xAllSummary,
    ShowDot1xInterfaceStatistics, ShowDot1xStatistics,
};
use showparse_parsers::iosxe::{ShowParameterMapTypeSubscriberAttributeToService, ShowVrfDetail};
use showparse_parsers::{ShowParser, StaticDevice};

fn fixture_dir(command: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(command)
}

/// Raw captures of `command`, paired with their expected trees.
fn golden_pairs(command: &str) -> Vec<(PathBuf, String, serde_json::Value)> {
    let mut captures: Vec<PathBuf> = fs::read_dir(fixture_dir(command))
        .unwrap_or_else(|e| panic!("missing fixtures for {command}: {e}"))
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    captures.sort();
    assert!(!captures.is_empty(), "no captures for {command}");

    captures
        .into_iter()
        .map(|capture| {
            let raw = fs::read_to_string(&capture).unwrap();
            let expected_path = capture.with_extension("json");
            let expected = fs::read_to_string(&expected_path)
                .unwrap_or_else(|e| panic!("missing {}: {e}", expected_path.display()));
            let expected = serde_json::from_str(&expected)
                .unwrap_or_else(|e| panic!("invalid JSON in {}: {e}", expected_path.display()));
            (capture, raw, expected)
        })
        .collect()
}

fn assert_golden(parser: &dyn ShowParser, command: &str) {
    for (capture, raw, expected) in golden_pairs(command) {
        let value = parser
            .parse(&raw)
            .unwrap_or_else(|e| panic!("{} failed on {}: {e}", parser.name(), capture.display()));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            expected,
            "{} output differs for {}",
            parser.name(),
            capture.display()
        );

        // Same text, same tree; and the tree still validates on its own.
        assert_eq!(parser.parse(&raw).unwrap(), value);
        validate(parser.schema(), &value).unwrap();
    }
}

fn all_parsers() -> Vec<Box<dyn ShowParser>> {
    vec![
        Box::new(ShowDot1xAllDetail),
        Box::new(ShowDot1x),
        Box::new(ShowDot1xAllStatistics),
        Box::new(ShowDot1xAllSummary),
        Box::new(ShowDot1xAllCount),
        Box::new(ShowDot1xStatistics),
        Box::new(ShowDot1xInterfaceStatistics::new("FortyGigabitEthernet1/1/1")),
        Box::new(ShowParameterMapTypeSubscriberAttributeToService::new(
            "BUILTIN_DEVICE_TO_TEMPLATE",
        )),
        Box::new(ShowVrfDetail::new()),
    ]
}

#[test]
fn test_dot1x_all_details_golden() {
    assert_golden(&ShowDot1xAllDetail, "show_dot1x_all_details");
}

#[test]
fn test_dot1x_golden() {
    assert_golden(&ShowDot1x, "show_dot1x");
}

#[test]
fn test_dot1x_keeps_only_global_settings_of_detail_output() {
    let (_, raw, _) = golden_pairs("show_dot1x_all_details").remove(0);
    let value = ShowDot1x.parse(&raw).unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({"system_auth_control": true, "version": 3})
    );
}

#[test]
fn test_dot1x_all_statistics_golden() {
    assert_golden(&ShowDot1xAllStatistics, "show_dot1x_all_statistics");
}

#[test]
fn test_dot1x_all_summary_golden() {
    assert_golden(&ShowDot1xAllSummary, "show_dot1x_all_summary");
}

#[test]
fn test_dot1x_all_count_golden() {
    assert_golden(&ShowDot1xAllCount, "show_dot1x_all_count");
}

#[test]
fn test_dot1x_statistics_golden() {
    assert_golden(&ShowDot1xStatistics, "show_dot1x_statistics");
}

#[test]
fn test_dot1x_interface_statistics_golden() {
    let parser = ShowDot1xInterfaceStatistics::new("FortyGigabitEthernet1/1/1");
    assert_golden(&parser, "show_dot1x_interface_statistics");
}

#[test]
fn test_parameter_map_golden() {
    let parser = ShowParameterMapTypeSubscriberAttributeToService::new("BUILTIN_DEVICE_TO_TEMPLATE");
    assert_golden(
        &parser,
        "show_parameter_map_type_subscriber_attribute_to_service",
    );
}

#[test]
fn test_vrf_detail_golden() {
    assert_golden(&ShowVrfDetail::new(), "show_vrf_detail");
}

#[test]
fn test_empty_output_is_empty_mapping_for_every_parser() {
    for parser in all_parsers() {
        for raw in ["", "\n\n", "   \r\n\t"] {
            let value = parser
                .parse(raw)
                .unwrap_or_else(|e| panic!("{} rejected blank output: {e}", parser.name()));
            assert_eq!(value, Value::map(), "{}", parser.name());
        }
    }
}

#[test]
fn test_unrelated_output_is_empty_mapping_for_every_parser() {
    let banner = "% Invalid input detected at '^' marker.\n\nswitch#\n";
    for parser in all_parsers() {
        assert_eq!(parser.parse(banner).unwrap(), Value::map(), "{}", parser.name());
    }
}

#[test]
fn test_sysauthcontrol_enabled() {
    let value = ShowDot1xAllDetail
        .parse("Sysauthcontrol                 Enabled")
        .unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({"system_auth_control": true})
    );
}

#[test]
fn test_port_control_under_interface() {
    let raw = "Dot1x Info for GigabitEthernet1/0/9\nPortControl               = AUTO";
    let value = ShowDot1xAllDetail.parse(raw).unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({
            "interfaces": {
                "GigabitEthernet1/0/9": {
                    "interface": "GigabitEthernet1/0/9",
                    "port_control": "auto"
                }
            }
        })
    );
}

#[test]
fn test_global_statistics_counter_line() {
    let value = ShowDot1xStatistics
        .parse("RxStart = 2     RxLogoff = 0    RxResp = 14      RxRespID = 32")
        .unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({
            "dot1x_stats": {"rx_start": 2, "rx_logoff": 0, "rx_resp": 14, "rx_resp_id": 32}
        })
    );
}

#[test]
fn test_summary_continuation_row_inherits_pae() {
    let raw = "\
Fa1                   AUTH             000d.bcff.afcc           UNAUTHORIZED
                                       fa16.3eff.0ce0           AUTHORIZED
";
    let value = ShowDot1xAllSummary.parse(raw).unwrap();
    assert_eq!(
        value.get_path(&["interfaces", "FastEthernet1", "clients", "fa16.3eff.0ce0", "pae"]),
        Some(&Value::from("authenticator"))
    );
}

#[test]
fn test_execute_fetches_rendered_command_once() {
    let (_, raw, expected) = golden_pairs("show_dot1x_interface_statistics").remove(0);
    let device = StaticDevice::new()
        .with_output("show dot1x interface FortyGigabitEthernet1/1/1 statistics", raw);
    let parser = ShowDot1xInterfaceStatistics::new("FortyGigabitEthernet1/1/1");
    let value = parser.execute(&device).unwrap();
    assert_eq!(serde_json::to_value(value).unwrap(), expected);
}

#[test]
fn test_execute_with_unknown_command_fails() {
    let device = StaticDevice::new().with_output("show vrf detail", "");
    assert!(ShowVrfDetail::for_vrf("VRF1").execute(&device).is_err());
    assert_eq!(ShowVrfDetail::new().execute(&device).unwrap(), Value::map());
}
