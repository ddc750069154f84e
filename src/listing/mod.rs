// Server-side directory listing: enumeration, wire records and file sniffing.
mod entry;
mod service;
mod signature;

pub use entry::{DirectoryEntry, EntryKind, FileKind, ListingResponse};
pub use service::DirectoryLister;
