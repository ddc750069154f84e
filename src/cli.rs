use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use filepicker::picker::{HorizontalAlign, RequestMethod};

/// filepicker – lazily-loaded directory picker and its listing server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve directory listings over HTTP
    Serve(ServeArgs),
    /// Print one directory listing and exit
    List(ListArgs),
    /// Browse interactively and print the chosen file
    Pick(PickArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Base directory every listing is relative to
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Path of the listing endpoint
    #[arg(long, default_value = "/filepicker")]
    pub route: String,

    /// Also write logs to <LOG_DIR>/filepicker.log
    #[arg(long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListFormat {
    #[default]
    Json,
    /// The picker's rendered list fragment
    Html,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Directory to list, relative to ROOT
    #[arg(long, default_value = "")]
    pub dir: String,

    #[arg(long, value_enum, default_value_t = ListFormat::Json)]
    pub format: ListFormat,

    /// Prefix stripped from entry paths when rendering HTML
    #[arg(long, default_value = "")]
    pub base_directory: String,
}

#[derive(Args, Debug)]
pub struct PickArgs {
    /// Browse this local directory
    #[arg(long, value_name = "DIR", conflicts_with = "source")]
    pub root: Option<PathBuf>,

    /// Listing endpoint of a running `filepicker serve`
    #[arg(long, value_name = "URL")]
    pub source: Option<String>,

    #[arg(long, value_enum, default_value_t = RequestMethod::Post)]
    pub method: RequestMethod,

    /// Directory shown as the root and prefixed to selected paths
    #[arg(long)]
    pub base_directory: Option<String>,

    /// Popup width in cells
    #[arg(long, default_value_t = 48)]
    pub width: u32,

    /// Popup height in cells
    #[arg(long, default_value_t = 16)]
    pub height: u32,

    #[arg(long, value_enum, default_value_t = HorizontalAlign::Left)]
    pub align: HorizontalAlign,

    #[arg(long, default_value_t = 0)]
    pub top_spacing: i32,

    /// Show and hide the popup without a transition
    #[arg(long)]
    pub no_fade: bool,

    #[arg(long, default_value_t = 120)]
    pub fade_in_ms: u64,

    #[arg(long, default_value_t = 60)]
    pub fade_out_ms: u64,

    /// Keep the popup open on outside clicks and escape
    #[arg(long)]
    pub stay_open_on_outside_click: bool,

    #[arg(long)]
    pub hide_root_folder: bool,

    /// Ask before accepting a file
    #[arg(long)]
    pub confirm: bool,

    #[arg(long)]
    pub confirm_text: Option<String>,

    /// Keep browsing after a file is selected
    #[arg(long)]
    pub stay_open_on_select: bool,

    /// Copy the selected path to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Write logs to <LOG_DIR>/filepicker-pick.log
    #[arg(long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["filepicker", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.port, 8080);
        assert_eq!(args.route, "/filepicker");
    }

    #[test]
    fn list_accepts_html_format() {
        let cli = Cli::try_parse_from(["filepicker", "list", "/srv", "--dir", "/sub", "--format", "html"])
            .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.format, ListFormat::Html);
        assert_eq!(args.dir, "/sub");
    }

    #[test]
    fn pick_parses_widget_flags() {
        let cli = Cli::try_parse_from([
            "filepicker",
            "pick",
            "--source",
            "http://localhost:8080/filepicker",
            "--method",
            "get",
            "--align",
            "right",
            "--confirm",
            "--no-fade",
        ])
        .unwrap();
        let Command::Pick(args) = cli.command else {
            panic!("expected pick");
        };
        assert_eq!(args.method, RequestMethod::Get);
        assert_eq!(args.align, HorizontalAlign::Right);
        assert!(args.confirm && args.no_fade);
        assert!(args.root.is_none());
    }

    #[test]
    fn pick_rejects_both_root_and_source() {
        let result = Cli::try_parse_from([
            "filepicker",
            "pick",
            "--root",
            ".",
            "--source",
            "http://localhost/",
        ]);
        assert!(result.is_err());
    }
}
