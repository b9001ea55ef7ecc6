//! The public-facing [`List`] type: parse PSL text, then query it.

use log::trace;

use crate::accelerator::{Accelerator, ReferenceAccelerator};
use crate::buffer::Buffer;
use crate::builder;
use crate::error::Result;
use crate::matcher::{self, entry_span, matched_via_wildcard};
use crate::selfie;

/// A parsed Public Suffix List, ready to answer `public_suffix`,
/// `registrable_domain` and `is_public_suffix` queries.
///
/// Not `Sync`: queries mutate the buffer's scratch region, so share a
/// `List` across threads behind a mutex, or give each thread its own.
pub struct List {
    buffer: Buffer,
    last_hostname: Option<String>,
    last_num_labels: usize,
    accelerator: Option<Box<dyn Accelerator>>,
}

impl List {
    /// Parses PSL text using an identity ASCII conversion (rule lines
    /// containing non-ASCII bytes are dropped rather than transcoded).
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, |s| s.to_string())
    }

    /// Parses PSL text, converting internationalized rule lines to ASCII
    /// with the given function.
    pub fn parse_with(text: &str, to_ascii: impl Fn(&str) -> String) -> Self {
        let mut buffer = Buffer::new();
        builder::parse(&mut buffer, text, to_ascii);
        Self {
            buffer,
            last_hostname: None,
            last_num_labels: 0,
            accelerator: None,
        }
    }

    /// Installs an external accelerator for the hot loop. Queries keep
    /// working identically; only the implementation backing them changes.
    pub fn enable_accelerator(&mut self, accelerator: Box<dyn Accelerator>) {
        trace!("enabling accelerator: {}", accelerator.name());
        self.accelerator = Some(accelerator);
    }

    /// Reverts to the buffer-native reference matcher.
    pub fn disable_accelerator(&mut self) {
        self.accelerator = None;
    }

    /// Re-normalizes scratch only when the hostname actually changed since
    /// the last query; repeated lookups against the same name are then
    /// just a tree walk with no re-parsing.
    fn prepare(&mut self, hostname: &str) {
        if self.last_hostname.as_deref() != Some(hostname) {
            self.last_num_labels = matcher::prepare(&mut self.buffer, hostname);
            self.last_hostname = Some(hostname.to_string());
        }
    }

    fn position(&mut self) -> Option<usize> {
        match &self.accelerator {
            Some(acc) => acc.public_suffix_position(&mut self.buffer, self.last_num_labels),
            None => ReferenceAccelerator.public_suffix_position(&mut self.buffer, self.last_num_labels),
        }
    }

    /// The longest matching public suffix of `hostname`, or `""` if none
    /// matched (including for an empty hostname or one with a leading dot).
    pub fn public_suffix(&mut self, hostname: &str) -> String {
        if hostname.is_empty() || hostname.starts_with('.') {
            return String::new();
        }
        self.prepare(hostname);
        match self.position() {
            Some(cursor) => {
                let (begin, _) = entry_span(&self.buffer, cursor);
                let n = self.last_num_labels_hostname_len();
                String::from_utf8_lossy(&self.buffer.byte_view()[begin..n]).into_owned()
            }
            None => String::new(),
        }
    }

    /// The registrable domain (public suffix plus one label) of
    /// `hostname`, or `""` if `hostname` has no label to spare.
    pub fn registrable_domain(&mut self, hostname: &str) -> String {
        if hostname.is_empty() || hostname.starts_with('.') {
            return String::new();
        }
        self.prepare(hostname);
        match self.position() {
            Some(cursor) => {
                let (begin, _) = entry_span(&self.buffer, cursor);
                if begin == 0 {
                    return String::new();
                }
                let (next_begin, _) = entry_span(&self.buffer, cursor + 1);
                let n = self.last_num_labels_hostname_len();
                String::from_utf8_lossy(&self.buffer.byte_view()[next_begin..n]).into_owned()
            }
            None => String::new(),
        }
    }

    /// Whether `hostname` is *itself* a public suffix (an exact or
    /// wildcard-derived match consuming the whole hostname).
    pub fn is_public_suffix(&mut self, hostname: &str) -> bool {
        if hostname.is_empty() || hostname.starts_with('.') {
            return false;
        }
        self.prepare(hostname);
        match self.position() {
            Some(cursor) => {
                let (begin, _) = entry_span(&self.buffer, cursor);
                begin == 0 && !matched_via_wildcard(&self.buffer)
            }
            None => false,
        }
    }

    fn last_num_labels_hostname_len(&self) -> usize {
        self.buffer.byte_view()[crate::layout::HOSTNAME_LEN_OFFSET] as usize
    }

    pub fn to_selfie(&self) -> Vec<u8> {
        selfie::to_selfie(&self.buffer)
    }

    pub fn from_selfie(data: &[u8]) -> Result<Self> {
        Ok(Self {
            buffer: selfie::from_selfie(data)?,
            last_hostname: None,
            last_num_labels: 0,
            accelerator: None,
        })
    }

    pub fn to_selfie_string(&self) -> String {
        selfie::to_selfie_string(&self.buffer)
    }

    pub fn from_selfie_string(s: &str) -> Result<Self> {
        Ok(Self {
            buffer: selfie::from_selfie_string(s)?,
            last_hostname: None,
            last_num_labels: 0,
            accelerator: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> List {
        List::parse("com\nco.uk\nuk\n*.jp\n!city.kawasaki.jp\n")
    }

    #[test]
    fn plain_tld() {
        let mut list = fixture();
        assert_eq!(list.public_suffix("www.example.com"), "com");
        assert_eq!(list.registrable_domain("www.example.com"), "example.com");
        assert!(!list.is_public_suffix("www.example.com"));
    }

    #[test]
    fn bare_tld_is_a_public_suffix() {
        let mut list = fixture();
        assert_eq!(list.public_suffix("com"), "com");
        assert_eq!(list.registrable_domain("com"), "");
        assert!(list.is_public_suffix("com"));
    }

    #[test]
    fn two_label_suffix() {
        let mut list = fixture();
        assert_eq!(list.public_suffix("a.b.example.co.uk"), "co.uk");
        assert_eq!(list.registrable_domain("a.b.example.co.uk"), "example.co.uk");
        assert!(!list.is_public_suffix("a.b.example.co.uk"));
    }

    #[test]
    fn wildcard_suffix() {
        let mut list = fixture();
        assert_eq!(list.public_suffix("foo.bar.jp"), "bar.jp");
        assert_eq!(list.registrable_domain("foo.bar.jp"), "foo.bar.jp");
    }

    #[test]
    fn unknown_single_label_falls_back_to_wildcard_but_is_not_a_public_suffix() {
        let mut list = fixture();
        assert_eq!(list.public_suffix("unknownsingle"), "unknownsingle");
        assert_eq!(list.registrable_domain("unknownsingle"), "");
        assert!(!list.is_public_suffix("unknownsingle"));
    }

    #[test]
    fn leading_dot_and_empty_host_match_nothing() {
        let mut list = fixture();
        assert_eq!(list.public_suffix(".example.com"), "");
        assert_eq!(list.registrable_domain(".example.com"), "");
        assert!(!list.is_public_suffix(".example.com"));

        assert_eq!(list.public_suffix(""), "");
        assert_eq!(list.registrable_domain(""), "");
        assert!(!list.is_public_suffix(""));
    }

    #[test]
    fn exception_rule_excludes_its_own_node() {
        let mut list = fixture();
        // "!city.kawasaki.jp" means "city.kawasaki.jp" is not itself a
        // public suffix boundary, so it is never reported as such.
        assert!(!list.is_public_suffix("city.kawasaki.jp"));
        assert!(!list.is_public_suffix("www.city.kawasaki.jp"));
    }

    #[test]
    fn case_insensitive() {
        let mut list = fixture();
        assert_eq!(list.public_suffix("WWW.EXAMPLE.COM"), "com");
        assert_eq!(
            list.public_suffix("WWW.EXAMPLE.COM"),
            list.public_suffix("www.example.com")
        );
    }

    #[test]
    fn repeated_query_with_same_hostname_is_stable() {
        let mut list = fixture();
        let first = list.public_suffix("www.example.com");
        let second = list.public_suffix("www.example.com");
        assert_eq!(first, second);
    }
}
