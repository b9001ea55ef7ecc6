//! Parses Public Suffix List text into a transient [`RuleNode`] tree, then
//! flattens the tree into a [`Buffer`] using a breadth-first layout so each
//! node's children land in one contiguous, pre-sorted run.

use std::collections::HashMap;

use log::debug;

use crate::buffer::Buffer;
use crate::layout::*;
use crate::tree::RuleNode;

/// Maximum byte length of a single rule line we'll accept (253 bytes is the
/// longest a fully-qualified domain name can be).
const MAX_RULE_LEN: usize = 253;

/// Parses `text` (one rule per line, `//`-prefixed comments allowed, `!`
/// prefix for exceptions, `*` for wildcard labels) and serializes the
/// resulting rule tree into `buf`.
///
/// `to_ascii` is applied to any line containing bytes outside
/// `[*a-z0-9.-]` after lowercasing, mirroring the IDNA-ish normalization
/// a PSL consumer typically needs for internationalized rules.
pub fn parse<F>(buf: &mut Buffer, text: &str, to_ascii: F)
where
    F: Fn(&str) -> String,
{
    let mut root = RuleNode::root();
    // The default wildcard rule is always present: any single unknown
    // label is itself a public suffix, per the PSL algorithm's fallback.
    root.insert(std::iter::once(b"*".to_vec()), false);

    for (rule, exception) in extract_rules(text, &to_ascii) {
        let labels: Vec<Vec<u8>> = rule.rsplit('.').map(|l| l.as_bytes().to_vec()).collect();
        root.insert(labels.into_iter(), exception);
    }

    debug!("parsed rule tree with {} nodes", root.count_nodes());
    serialize(buf, &root);
}

/// Extracts `(rule, is_exception)` pairs from raw PSL text.
fn extract_rules<'a>(
    text: &'a str,
    to_ascii: &'a impl Fn(&str) -> String,
) -> impl Iterator<Item = (String, bool)> + 'a {
    text.split(['\n', '\r']).filter_map(move |raw| {
        let mut line = raw;
        if let Some(pos) = line.find("//") {
            line = &line[..pos];
        }
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (body, exception) = match line.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (line, false),
        };
        if body.is_empty() || body.len() > MAX_RULE_LEN {
            return None;
        }

        let lowered = body.to_lowercase();
        let normalized = if lowered
            .bytes()
            .any(|b| !matches!(b, b'*' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-'))
        {
            to_ascii(&lowered)
        } else {
            lowered
        };
        if normalized.is_empty() || normalized.len() > MAX_RULE_LEN {
            return None;
        }

        Some((normalized, exception))
    })
}

/// One node's packed fields, computed in breadth-first order so sibling
/// groups always occupy a contiguous run of slots.
struct Slot {
    char_len: u8,
    flags: u8,
    child_count: u32,
    inline_or_offset: u32,
    children_word_offset: u32,
}

fn serialize(buf: &mut Buffer, root: &RuleNode) {
    let total = root.count_nodes();

    let mut order: Vec<&RuleNode> = Vec::with_capacity(total);
    let mut slots: Vec<Slot> = Vec::with_capacity(total);
    let mut intern: HashMap<Vec<u8>, u32> = HashMap::new();
    let mut char_data: Vec<u8> = Vec::new();

    order.push(root);
    slots.push(make_slot(root, &mut intern, &mut char_data));

    let mut i = 0;
    while i < order.len() {
        let node = order[i];
        let children = node.sorted_children();
        if !children.is_empty() {
            let start_index = order.len();
            slots[i].child_count = children.len() as u32;
            slots[i].children_word_offset =
                (TREE_REGION_START_WORD + start_index * NODE_WORDS) as u32;
            for child in children {
                order.push(child);
                slots.push(make_slot(child, &mut intern, &mut char_data));
            }
        }
        i += 1;
    }

    let tree_bytes = total * NODE_BYTES;
    let char_data_offset = SCRATCH_LEN + tree_bytes;
    let total_bytes = char_data_offset + char_data.len();
    buf.reserve(total_bytes);

    for (idx, slot) in slots.iter().enumerate() {
        let word_offset = TREE_REGION_START_WORD + idx * NODE_WORDS;
        let word0 = slot.char_len as u32 | ((slot.flags as u32) << 8) | (slot.child_count << 16);
        buf.write_word(word_offset, word0);
        buf.write_word(word_offset + 1, slot.inline_or_offset);
        buf.write_word(word_offset + 2, slot.children_word_offset);
    }

    let data = buf.byte_view_mut();
    data[char_data_offset..char_data_offset + char_data.len()].copy_from_slice(&char_data);

    buf.set_root_word_offset(TREE_REGION_START_WORD as u32);
    buf.set_char_data_offset(char_data_offset as u32);
}

fn make_slot(node: &RuleNode, intern: &mut HashMap<Vec<u8>, u32>, char_data: &mut Vec<u8>) -> Slot {
    let char_len = node.label.len().min(u8::MAX as usize) as u8;
    let inline_or_offset = if node.label.len() <= INLINE_LABEL_MAX {
        let mut w = 0u32;
        for (i, &b) in node.label.iter().enumerate() {
            w |= (b as u32) << (8 * i);
        }
        w
    } else {
        *intern.entry(node.label.clone()).or_insert_with(|| {
            let offset = char_data.len() as u32;
            char_data.extend_from_slice(&node.label);
            offset
        })
    };

    Slot {
        char_len,
        flags: node.flags.bits(),
        child_count: 0,
        inline_or_offset,
        children_word_offset: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii_passthrough(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn extracts_rules_skips_comments_and_blank_lines() {
        let text = "// comment\ncom\n\n!city.kawasaki.jp // trailing note\n*.jp\n";
        let rules: Vec<_> = extract_rules(text, &ascii_passthrough).collect();
        assert_eq!(
            rules,
            vec![
                ("com".to_string(), false),
                ("city.kawasaki.jp".to_string(), true),
                ("*.jp".to_string(), false),
            ]
        );
    }

    #[test]
    fn parse_builds_a_root_with_a_default_wildcard() {
        let mut buf = Buffer::new();
        parse(&mut buf, "com\n", ascii_passthrough);
        let root = buf.node_at(buf.root_word_offset());
        assert_eq!(root.child_count(), 2); // "*" and "com"
    }
}
