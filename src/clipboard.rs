use anyhow::Result;
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;

/// Hidden argument that turns the process into a clipboard holder.
pub const HOLDER_FLAG: &str = "__filepicker_clipboard_holder";

// On Linux the selection lives only as long as the owning process, so a
// detached copy of ourselves keeps serving it after the picker exits.
#[cfg(target_os = "linux")]
fn hold_selection() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;

    let mut clipboard = Clipboard::new()?;
    // Blocks until another program takes ownership of the clipboard.
    clipboard.set().wait().text(text)?;
    Ok(())
}

/// Runs the holder and returns `Ok(true)` when the process was started with
/// [`HOLDER_FLAG`]; the caller exits right after.
pub fn run_holder_if_requested() -> Result<bool> {
    if !std::env::args().any(|a| a == HOLDER_FLAG) {
        return Ok(false);
    }
    #[cfg(target_os = "linux")]
    hold_selection()?;
    #[cfg(not(target_os = "linux"))]
    eprintln!("⚠️ Warning: {HOLDER_FLAG} is only used on Linux. Ignoring.");
    Ok(true)
}

/// Puts the selected path on the system clipboard.
pub fn copy_path(path: &str) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(path.to_string())?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(std::env::current_exe()?)
            .arg(HOLDER_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow::anyhow!("failed to open stdin of the clipboard holder"))?;
        stdin.write_all(path.as_bytes())?;
    }
    tracing::debug!(path, "copied selection to clipboard");
    Ok(())
}
