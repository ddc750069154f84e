use clap::ValueEnum;
use std::time::Duration;

/// Which edge of the trigger the popup lines up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Right,
}

/// HTTP verb for listing requests. Everything but `Get` sends a form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RequestMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

/// Per-widget settings. Dimensions are in whatever unit the front-end lays
/// out in (pixels for HTML, cells for the terminal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerConfig {
    /// Ask before accepting a file.
    pub confirm_selection: bool,
    pub confirm_text: String,
    pub close_on_select_file: bool,
    pub horizontal_align: HorizontalAlign,
    /// Gap between the bottom of the trigger and the top of the popup.
    pub top_spacing: i32,
    pub width: u32,
    pub height: u32,
    /// CSS colour of the left rule drawn for every nesting level.
    pub nested_folder_padding_color: String,
    /// Indent added per nesting level.
    pub nest_depth: u32,
    /// `None` shows the popup without a transition.
    pub fade_in: Option<Duration>,
    /// `None` removes the popup without a transition.
    pub fade_out: Option<Duration>,
    /// Listing endpoint; sent each directory request.
    pub data_source: String,
    pub request_method: RequestMethod,
    /// Highest directory the user can see; every path is relative to it.
    pub base_directory: String,
    /// Close on a click outside the popup and trigger, or on escape.
    pub close_on_outside_click: bool,
    pub show_root_folder: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerConfig {
            confirm_selection: false,
            confirm_text: "Are you sure you want to select this file?".to_string(),
            close_on_select_file: true,
            horizontal_align: HorizontalAlign::Right,
            top_spacing: 0,
            width: 400,
            height: 300,
            nested_folder_padding_color: "#333".to_string(),
            nest_depth: 15,
            fade_in: Some(Duration::from_millis(120)),
            fade_out: Some(Duration::from_millis(60)),
            data_source: String::new(),
            request_method: RequestMethod::Post,
            base_directory: String::new(),
            close_on_outside_click: true,
            show_root_folder: true,
        }
    }
}

impl PickerConfig {
    /// Separator used for every path the widget reports. Decided once from the
    /// base directory: backslash only for Windows-looking bases.
    pub fn directory_separator(&self) -> char {
        if self.base_directory.contains('\\') && !self.base_directory.contains('/') {
            '\\'
        } else {
            '/'
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_base(base: &str) -> PickerConfig {
        PickerConfig {
            base_directory: base.to_string(),
            ..PickerConfig::default()
        }
    }

    #[test]
    fn separator_follows_the_base_directory() {
        assert_eq!(with_base("/var/www").directory_separator(), '/');
        assert_eq!(with_base("C:\\inetpub").directory_separator(), '\\');
        assert_eq!(with_base("").directory_separator(), '/');
    }

    #[test]
    fn defaults_match_the_plugin() {
        let config = PickerConfig::default();
        assert!(config.close_on_select_file);
        assert!(!config.confirm_selection);
        assert_eq!(config.horizontal_align, HorizontalAlign::Right);
        assert_eq!(config.fade_out, Some(Duration::from_millis(60)));
        assert_eq!(config.request_method, RequestMethod::Post);
    }
}
