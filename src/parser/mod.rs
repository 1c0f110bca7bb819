//! Parsers for tA pad content.
//!
//! # Page Structure
//!
//! Each module pad has:
//! - a header between `---` markers with one `key: value` pair per line
//! - a DokuWiki body after the closing marker
//!
//! The module index pad groups pad links under `======` headings; see
//! [`index`].
//!
//! # Usage
//!
//! ```ignore
//! use ta_sync::parser::{parse_header, split_page};
//!
//! let parts = split_page(&text).ok_or("no header")?;
//! let parsed = parse_header(parts.header)?;
//! println!("{:?} invalid={}", parsed.header.slug(), parsed.header.is_invalid());
//! ```

pub mod frontmatter;
pub mod index;
pub mod types;

pub use frontmatter::{
    normalize_header, parse_header, parse_header_values, split_page, HeaderError, PageParts,
    ParsedHeader,
};
pub use index::{classify_section, parse_index, Section};
pub use types::PageHeader;
