//! HTML for the popup, built the way the browser plugin builds its DOM.
//!
//! Every `.fp-item` carries hidden `type`, `name` and `path` inputs (plus
//! `fileType` for files) and a `data-row` attribute with the row id, so a page
//! script can hand clicks back to [`FilePicker::click_row`](super::FilePicker::click_row).

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::config::PickerConfig;
use super::position::{Anchor, Placement};
use super::tree::{Children, RowKind, RowTree};
use crate::listing::{DirectoryEntry, FileKind};

pub const NO_CONTENTS: &str = "There are no contents in this directory";

/// The whole popup: positioned scaffold, root row, loader and nested lists.
pub fn render_popup(tree: &RowTree, config: &PickerConfig, placement: &Placement, loading: bool) -> String {
    let horizontal = match placement.anchor {
        Anchor::Left(left) => format!("left: {left}px"),
        Anchor::Right(right) => format!("right: {right}px"),
    };
    let mut html = format!(
        "<div class=\"fp-file-picker\" style=\"{horizontal}; top: {}px; width: {}px; height: {}px;\">",
        placement.top, placement.width, placement.height
    );
    html.push_str("<div class=\"fp-grad-top\"></div><div class=\"fp-grad-bottom\"></div>");
    html.push_str(&format!(
        "<div class=\"fp-pre-loader\" style=\"padding-top: {}px;{}\">Loading...</div>",
        placement.preloader_padding(),
        if loading { "" } else { " display: none;" }
    ));
    html.push_str(&format!(
        "<div class=\"fp-list-container\" style=\"width: {}px; height: {}px;\">",
        placement.width, placement.height
    ));
    if config.show_root_folder {
        html.push_str(&format!(
            "<div class=\"top-level-item fp-directory-item fp-item\">{}</div>",
            encode_text(&config.base_directory)
        ));
    }
    if let Some(top) = tree.top() {
        html.push_str(&render_children(tree, top, config));
    }
    html.push_str("</div></div>");
    html
}

/// One directory level: a styled `<ul>` of directories then files, or the
/// placeholder when the directory is empty. Expanded rows nest their own list.
pub fn render_children(tree: &RowTree, children: &Children, config: &PickerConfig) -> String {
    let ids = match children {
        Children::Empty => return format!("<div class=\"fp-no-contents\">{NO_CONTENTS}</div>"),
        Children::Rows(ids) => ids,
    };

    let mut html = format!(
        "<ul class=\"fp-list\" style=\"border-left: {}px solid {}\">",
        config.nest_depth,
        encode_double_quoted_attribute(&config.nested_folder_padding_color)
    );
    for &id in ids {
        let Some(row) = tree.row(id) else { continue };
        let entry = &row.entry;
        let (class, kind, file_type) = match entry.kind {
            RowKind::Directory => ("fp-item fp-directory-item", "dir", None),
            RowKind::File(FileKind::Image) => ("fp-item fp-image-item", "file", Some(FileKind::Image)),
            RowKind::File(other) => ("fp-item fp-file-item", "file", Some(other)),
        };

        html.push_str(&format!("<li><div class=\"{class}\" data-row=\"{id}\">"));
        push_hidden(&mut html, "type", kind);
        push_hidden(&mut html, "name", &entry.name);
        push_hidden(&mut html, "path", &entry.relative_path);
        if let Some(file_type) = file_type {
            push_hidden(&mut html, "fileType", file_type.as_str());
        }
        html.push_str(&encode_text(&entry.name));
        html.push_str("</div>");
        if let Some(nested) = row.children() {
            html.push_str(&render_children(tree, nested, config));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

/// Renders a single listing without a popup around it.
pub fn render_listing(entries: Vec<DirectoryEntry>, config: &PickerConfig) -> String {
    let mut tree = RowTree::new();
    tree.set_top(entries, &config.base_directory);
    tree.top()
        .map(|top| render_children(&tree, top, config))
        .unwrap_or_default()
}

fn push_hidden(html: &mut String, name: &str, value: &str) {
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"{name}\" value=\"{}\" />",
        encode_double_quoted_attribute(value)
    ));
}
