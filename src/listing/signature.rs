use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use super::entry::FileKind;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG: &[u8] = b"\xff\xd8\xff";
const GIF: &[u8] = b"GIF";
const BMP: &[u8] = b"BM";
const PSD: &[u8] = b"8BPS";
const FLASH: [&[u8]; 3] = [b"FWS", b"CWS", b"ZWS"];

const HEADER_LEN: u64 = 16;
const WBMP_MAX_DIMENSION: u32 = 2048;

/// Classifies a path by its leading bytes.
///
/// Returns `None` for anything that is not a regular file (directories,
/// symlinks, devices). A regular file that cannot be read is a plain `File`.
pub fn classify_path(path: &Path) -> Option<FileKind> {
    let meta = fs::symlink_metadata(path).ok()?;
    if !meta.file_type().is_file() {
        return None;
    }

    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    let read = File::open(path).and_then(|f| f.take(HEADER_LEN).read_to_end(&mut header));
    match read {
        Ok(_) => Some(classify_bytes(&header)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "unreadable file, classifying as plain file");
            Some(FileKind::File)
        }
    }
}

pub fn classify_bytes(header: &[u8]) -> FileKind {
    if [PNG, JPEG, GIF, BMP].iter().any(|sig| header.starts_with(sig)) {
        FileKind::Image
    } else if FLASH.iter().any(|sig| header.starts_with(sig)) {
        FileKind::Flash
    } else if header.starts_with(PSD) {
        FileKind::Photoshop
    } else if is_wbmp(header) {
        FileKind::Image
    } else {
        FileKind::File
    }
}

// WBMP has no magic number: type 0, a fixed header (with optional extension
// bytes flagged by the high bit), then width and height as multi-byte ints.
fn is_wbmp(header: &[u8]) -> bool {
    let mut bytes = header.iter().copied();

    if read_multibyte(&mut bytes) != Some(0) {
        return false;
    }
    loop {
        match bytes.next() {
            Some(b) if b & 0x80 != 0 => continue,
            Some(_) => break,
            None => return false,
        }
    }
    let (Some(width), Some(height)) = (read_multibyte(&mut bytes), read_multibyte(&mut bytes))
    else {
        return false;
    };
    (1..=WBMP_MAX_DIMENSION).contains(&width) && (1..=WBMP_MAX_DIMENSION).contains(&height)
}

fn read_multibyte(bytes: &mut impl Iterator<Item = u8>) -> Option<u32> {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let b = bytes.next()?;
        value = (value << 7) | u32::from(b & 0x7f);
        if b & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn raster_signatures_are_images() {
        assert_eq!(classify_bytes(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), FileKind::Image);
        assert_eq!(classify_bytes(b"\xff\xd8\xff\xe0\0\x10JFIF"), FileKind::Image);
        assert_eq!(classify_bytes(b"GIF89a\x01\0\x01\0"), FileKind::Image);
        assert_eq!(classify_bytes(b"BM\x36\0\0\0\0\0"), FileKind::Image);
    }

    #[test]
    fn wbmp_is_recognised_by_its_header_shape() {
        // type 0, fixed header 0, width 16, height 8
        assert_eq!(classify_bytes(&[0, 0, 16, 8, 0xff, 0xff]), FileKind::Image);
        // zero width is not a picture
        assert_eq!(classify_bytes(&[0, 0, 0, 8]), FileKind::File);
        // truncated
        assert_eq!(classify_bytes(&[0, 0]), FileKind::File);
    }

    #[test]
    fn flash_and_photoshop() {
        assert_eq!(classify_bytes(b"FWS\x0a"), FileKind::Flash);
        assert_eq!(classify_bytes(b"CWS\x0a"), FileKind::Flash);
        assert_eq!(classify_bytes(b"8BPS\0\x01"), FileKind::Photoshop);
    }

    #[test]
    fn everything_else_is_a_plain_file() {
        assert_eq!(classify_bytes(b"hello world"), FileKind::File);
        assert_eq!(classify_bytes(b""), FileKind::File);
        assert_eq!(classify_bytes(b"%PDF-1.7"), FileKind::File);
    }

    #[test]
    fn classify_path_reads_the_file_header() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.bin");
        let mut f = File::create(&png).unwrap();
        f.write_all(PNG).unwrap();
        f.write_all(&[0u8; 64]).unwrap();

        let empty = dir.path().join("empty.txt");
        File::create(&empty).unwrap();

        assert_eq!(classify_path(&png), Some(FileKind::Image));
        assert_eq!(classify_path(&empty), Some(FileKind::File));
    }

    #[test]
    fn non_regular_paths_are_not_classified() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(classify_path(dir.path()), None);
        assert_eq!(classify_path(&dir.path().join("missing")), None);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.gif");
        std::fs::write(&target, b"GIF89a").unwrap();
        let link = dir.path().join("link.gif");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(classify_path(&link), None);
    }
}
