use std::collections::BTreeMap;
use std::io::Write;

use gardenia::{initialize, Config, GardeniaError, ResourceKind, Theme, DEFAULT_BASE_Z};

const CUSTOM_THEME: &str = r##"
name = "greenhouse"

[colors]
header_fg = "#e0f2e9"
header_bg = "#14281d"
selection_fg = "#14281d"
selection_bg = "#7bc950"
text_normal = "#e0f2e9"
text_dim = "#6b8f71"
label_fg = "#9bd1e5"
border = "#355e3b"
border_active = "#7bc950"
picker_border = "#f4d35e"
match_highlight_fg = "#14281d"
match_highlight_bg = "#f4d35e"
empty_state_fg = "#9bd1e5"
info_fg = "#9bd1e5"
error_fg = "#ee6352"
"##;

fn theme_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn custom_theme_file_takes_precedence() {
    let file = theme_file(CUSTOM_THEME);
    let config = Config {
        theme_name: Some("catppuccin-latte".to_string()),
        theme_file: Some(file.path().to_string_lossy().into_owned()),
        ..Default::default()
    };

    let state = initialize(&config);
    assert_eq!(state.theme.name, "greenhouse");
    assert_eq!(state.theme.colors.header_bg.as_deref(), Some("#14281d"));
}

#[test]
fn broken_theme_file_is_reported_and_replaced() {
    let file = theme_file("name = \"half\"\n[colors]\nheader_fg = \"#ffffff\"\n");
    assert!(matches!(Theme::from_file(file.path()), Err(GardeniaError::Theme(_))));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Theme::from_file(dir.path().join("missing.toml")),
        Err(GardeniaError::Io(_))
    ));

    let config = Config {
        theme_file: Some(file.path().to_string_lossy().into_owned()),
        ..Default::default()
    };
    assert_eq!(initialize(&config).theme.name, "catppuccin-mocha");
}

#[test]
fn zellij_configuration_is_parsed() {
    let configuration: BTreeMap<String, String> = [
        ("api_url", " http://garden.lan:8080/api/ "),
        ("base_z_index", "2000"),
        ("theme", "catppuccin-frappe"),
        ("theme_file", "~/.config/gardenia/theme.toml"),
        ("trace_level", "debug"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();

    let config = Config::from_zellij(&configuration);
    assert_eq!(config.api_url, "http://garden.lan:8080/api/");
    assert_eq!(config.base_z_index, 2000);
    assert_eq!(config.theme_name.as_deref(), Some("catppuccin-frappe"));
    assert_eq!(config.theme_file.as_deref(), Some("/host/.config/gardenia/theme.toml"));
    assert_eq!(config.trace_level.as_deref(), Some("debug"));

    let state = initialize(&config);
    assert_eq!(state.provider().base_z(), 2000);
    assert_ne!(DEFAULT_BASE_Z, 2000);
}

#[test]
fn oversized_base_z_index_still_stacks_forms() {
    let configuration: BTreeMap<String, String> =
        [("base_z_index".to_string(), u32::MAX.to_string())].into_iter().collect();
    let config = Config::from_zellij(&configuration);
    assert_eq!(config.base_z_index, DEFAULT_BASE_Z);

    let mut state = initialize(&config);
    state.open_form(ResourceKind::Plant, None).unwrap();
    state.open_form(ResourceKind::Location, None).unwrap();
    assert_eq!(state.forms[0].z_index(), Some(DEFAULT_BASE_Z));
    assert_eq!(state.forms[1].z_index(), Some(DEFAULT_BASE_Z + 1));
}
