use anyhow::{Result, ensure};
use filepicker::picker::PickerConfig;
use filepicker::server::ServerConfig;
use std::time::Duration;

use crate::cli::{PickArgs, ServeArgs};

/// Indent per nesting level in the terminal, in cells.
const TUI_NEST_DEPTH: u32 = 2;
const TUI_RULE_COLOR: &str = "#333";

/// Validates the `serve` flags.
pub fn server_config(args: &ServeArgs) -> Result<ServerConfig> {
    ensure!(
        args.route.starts_with('/'),
        "route must start with '/', got {:?}",
        args.route
    );
    ensure!(
        args.root.is_dir(),
        "root {} is not a directory",
        args.root.display()
    );
    Ok(ServerConfig {
        host: args.host.clone(),
        port: args.port,
        root: args.root.clone(),
        route: args.route.clone(),
        log_dir: args.log_dir.clone(),
    })
}

impl From<&PickArgs> for PickerConfig {
    fn from(args: &PickArgs) -> Self {
        let fade = |ms: u64| (!args.no_fade && ms > 0).then(|| Duration::from_millis(ms));
        let defaults = PickerConfig::default();
        let base_directory = args.base_directory.clone().unwrap_or_else(|| {
            args.root
                .as_ref()
                .map(|root| root.display().to_string())
                .unwrap_or_default()
        });

        PickerConfig {
            confirm_selection: args.confirm,
            confirm_text: args.confirm_text.clone().unwrap_or(defaults.confirm_text),
            close_on_select_file: !args.stay_open_on_select,
            horizontal_align: args.align,
            top_spacing: args.top_spacing,
            width: args.width,
            height: args.height,
            nested_folder_padding_color: TUI_RULE_COLOR.to_string(),
            nest_depth: TUI_NEST_DEPTH,
            fade_in: fade(args.fade_in_ms),
            fade_out: fade(args.fade_out_ms),
            data_source: args.source.clone().unwrap_or_default(),
            request_method: args.method,
            base_directory,
            close_on_outside_click: !args.stay_open_on_outside_click,
            show_root_folder: !args.hide_root_folder,
        }
    }
}
