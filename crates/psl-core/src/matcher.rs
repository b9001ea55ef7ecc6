//! The hot path: preparing a hostname into scratch and walking the trie.
//!
//! Everything in this module is allocation-free. Callers that want owned
//! `String`s back live in [`crate::list`].

use crate::buffer::{Buffer, NodeView};
use crate::layout::*;
use crate::tree::label_order;

/// Writes the lowercased hostname and its label-index table into the
/// buffer's scratch region. Returns the number of labels found.
///
/// Hostnames longer than [`HOSTNAME_MAX`] bytes are truncated from the
/// left (the rightmost, TLD-bearing bytes are the ones that matter for
/// matching); this mirrors the fixed-size scratch the format commits to.
pub fn prepare(buf: &mut Buffer, hostname: &str) -> usize {
    buf.reset_scratch();

    let bytes = hostname.as_bytes();
    let n = bytes.len().min(HOSTNAME_MAX);
    let start = bytes.len() - n;

    {
        let data = buf.byte_view_mut();
        for (i, &b) in bytes[start..].iter().enumerate() {
            data[HOSTNAME_OFFSET + i] = b.to_ascii_lowercase();
        }
        data[HOSTNAME_LEN_OFFSET] = n as u8;
    }

    if n == 0 {
        return 0;
    }

    // Walk right to left, recording (begin, end) spans for each label.
    let mut entries: Vec<(u8, u8)> = Vec::new();
    let mut end = n;
    let data = buf.byte_view();
    for i in (0..n).rev() {
        if data[HOSTNAME_OFFSET + i] == b'.' {
            entries.push((i as u8 + 1, end as u8));
            end = i;
        }
    }
    entries.push((0, end as u8));

    // The table has room for a fixed number of entries; a hostname packed
    // with enough single-byte labels can exceed it. Labels beyond capacity
    // are dropped (left-hand, least-significant ones first, since entries
    // are built right to left) and `num_labels` is clamped to match so the
    // matcher never walks past what was actually written.
    let max_entries = (LABEL_TABLE_END - LABEL_TABLE_OFFSET) / LABEL_ENTRY_SIZE;
    let num_labels = entries.len().min(max_entries);
    let data = buf.byte_view_mut();
    for (idx, (begin, label_end)) in entries.into_iter().take(num_labels).enumerate() {
        let off = LABEL_TABLE_OFFSET + idx * LABEL_ENTRY_SIZE;
        data[off] = begin;
        data[off + 1] = label_end;
    }

    num_labels
}

fn table_entry(buf: &Buffer, index: usize) -> (usize, usize) {
    let off = LABEL_TABLE_OFFSET + index * LABEL_ENTRY_SIZE;
    let data = buf.byte_view();
    (data[off] as usize, data[off + 1] as usize)
}

fn set_wildcard_flag(buf: &mut Buffer, matched_via_wildcard: bool) {
    buf.byte_view_mut()[WILDCARD_FLAG_BYTE] = matched_via_wildcard as u8;
}

fn wildcard_flag(buf: &Buffer) -> bool {
    buf.byte_view()[WILDCARD_FLAG_BYTE] != 0
}

fn find_child<'a>(node: NodeView<'a>, label: &[u8]) -> Option<NodeView<'a>> {
    let count = node.child_count();
    let mut lo = 0usize;
    let mut hi = count;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let child = node.child_at(mid);
        match label_order(child.label_slice(), label) {
            std::cmp::Ordering::Equal => return Some(child),
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
        }
    }
    None
}

/// Runs the matching walk over a hostname already written into scratch by
/// [`prepare`]. Returns the label-index entry of the longest matching
/// suffix, or `None` if nothing (not even the default wildcard) matched.
///
/// Also sets the wildcard-fallback flag byte so [`crate::list::List::is_public_suffix`]
/// can tell an exact match from a wildcard-derived one.
pub fn public_suffix_position(buf: &mut Buffer, num_labels: usize) -> Option<usize> {
    if num_labels == 0 {
        return None;
    }

    let mut node_offset = buf.root_word_offset();
    let mut cursor: Option<usize> = None;
    let mut label_ptr = 0usize;

    loop {
        let (begin, end) = table_entry(buf, label_ptr);
        let label = buf.byte_view()[begin..end].to_vec();

        let node = buf.node_at(node_offset);
        if node.child_count() == 0 {
            break;
        }

        let mut matched = find_child(node, &label);
        let mut via_wildcard = false;
        if matched.is_none() {
            let first = node.child_at(0);
            if first.label_slice() == b"*" {
                matched = Some(first);
                via_wildcard = true;
            }
        }

        let matched = match matched {
            Some(m) => m,
            None => break,
        };
        let is_exception = matched.is_exception();
        let is_terminus = matched.is_terminus();
        node_offset = matched.word_offset();

        if via_wildcard {
            set_wildcard_flag(buf, true);
        }

        if is_exception {
            cursor = if label_ptr > 0 {
                Some(label_ptr - 1)
            } else {
                None
            };
            return cursor;
        }

        if is_terminus {
            cursor = Some(label_ptr);
        }

        // `begin == 0` is the normal end of hostname (leftmost label consumed).
        // `label_ptr + 1 >= num_labels` guards the rare case where `prepare`
        // had to drop leftmost labels for lack of table space; without it
        // we'd walk past the entries that were actually written.
        if begin == 0 || label_ptr + 1 >= num_labels {
            break;
        }
        label_ptr += 1;
    }

    cursor
}

/// Byte span `(begin, end)` of the label at table entry `index`.
pub fn entry_span(buf: &Buffer, index: usize) -> (usize, usize) {
    table_entry(buf, index)
}

pub fn matched_via_wildcard(buf: &Buffer) -> bool {
    wildcard_flag(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::parse;

    fn test_list() -> Buffer {
        let mut buf = Buffer::new();
        parse(
            &mut buf,
            "com\nco.uk\nuk\n*.jp\n!city.kawasaki.jp\n",
            |s| s.to_string(),
        );
        buf
    }

    fn run(buf: &mut Buffer, host: &str) -> Option<(usize, usize)> {
        let n = prepare(buf, host);
        public_suffix_position(buf, n).map(|cursor| entry_span(buf, cursor))
    }

    fn suffix_of(buf: &mut Buffer, host: &str) -> Vec<u8> {
        let (begin, _) = run(buf, host).unwrap();
        buf.byte_view()[begin..host.len()].to_vec()
    }

    #[test]
    fn matches_plain_tld() {
        let mut buf = test_list();
        assert_eq!(suffix_of(&mut buf, "com"), b"com");
    }

    #[test]
    fn matches_two_label_suffix() {
        let mut buf = test_list();
        assert_eq!(suffix_of(&mut buf, "example.co.uk"), b"co.uk");
    }

    #[test]
    fn wildcard_fallback_flags_single_label() {
        let mut buf = test_list();
        prepare(&mut buf, "unknownsingle");
        let cursor = public_suffix_position(&mut buf, 1).unwrap();
        assert_eq!(entry_span(&buf, cursor), (0, 13));
        assert!(matched_via_wildcard(&buf));
    }

    #[test]
    fn exact_match_does_not_set_wildcard_flag() {
        let mut buf = test_list();
        run(&mut buf, "com");
        assert!(!matched_via_wildcard(&buf));
    }

    /// A 72-single-character-label hostname. With the flag byte and the root
    /// pointer squeezed in among the label-index table's own byte range,
    /// writing this many entries used to stomp on one or the other; neither
    /// is anywhere near `HOSTNAME_MAX`, so no truncation masks the collision.
    #[test]
    fn many_labels_do_not_corrupt_scratch_state() {
        let mut buf = test_list();
        let host = vec!["a"; 72].join(".");
        let n = prepare(&mut buf, &host);
        assert_eq!(n, 72);
        let cursor = public_suffix_position(&mut buf, n).unwrap();
        assert!(matched_via_wildcard(&buf));
        assert_eq!(entry_span(&buf, cursor), (host.len() - 1, host.len()));
    }

    /// A hostname packed with more single-character labels than the table
    /// has room for. `prepare` must clamp the label count to what it
    /// actually wrote rather than handing the matcher a count that walks
    /// past the table into whatever bytes follow it.
    #[test]
    fn more_labels_than_table_capacity_does_not_panic() {
        let mut buf = test_list();
        let host = vec!["a"; 200].join(".");
        let n = prepare(&mut buf, &host);
        let max_entries = (LABEL_TABLE_END - LABEL_TABLE_OFFSET) / LABEL_ENTRY_SIZE;
        assert!(n <= max_entries);
        let cursor = public_suffix_position(&mut buf, n);
        assert!(cursor.is_some());
    }
}
