use std::collections::{BTreeMap, VecDeque};

use crate::arrays::ROOT;
use crate::tail::TailEntry;
use crate::Trie;

enum Reached {
    /// All prefix codes were consumed through branch transitions, landing
    /// exactly on this node (which may itself be a leaf or a branch).
    Node(i32),
    /// A leaf was reached before the prefix was fully consumed, and its
    /// tail content begins with the remaining prefix codes.
    Leaf { node: i32, tail_rest: Vec<i32> },
    NotFound,
}

impl Trie {
    fn codes_for(&self, bytes: &[u8]) -> Option<Vec<i32>> {
        bytes.iter().map(|&b| self.offset(b)).collect()
    }

    /// Walks `codes` (no trailing endmarker) from the root, reporting
    /// where the walk ends up.
    fn reach(&self, codes: &[i32]) -> Reached {
        let mut cur = ROOT;
        let mut idx = 0;
        while idx < codes.len() {
            let b = self.get_base(cur);
            if b > 0 {
                let next = b + codes[idx];
                if next >= self.da_size() || self.get_check(next) != cur {
                    return Reached::NotFound;
                }
                cur = next;
                idx += 1;
            } else if b < 0 {
                let tail_codes = self.tail_as_codes(-b);
                let remaining = &codes[idx..];
                if remaining.len() <= tail_codes.len() && &tail_codes[..remaining.len()] == remaining {
                    return Reached::Leaf {
                        node: cur,
                        tail_rest: tail_codes[remaining.len()..].to_vec(),
                    };
                }
                return Reached::NotFound;
            } else {
                return Reached::NotFound;
            }
        }
        Reached::Node(cur)
    }

    /// Exact membership test.
    pub fn contains(&self, word: &[u8]) -> bool {
        let Some(codes) = self.codes_for(word) else {
            return false;
        };

        match self.reach(&codes) {
            Reached::NotFound => false,
            Reached::Leaf { tail_rest, .. } => {
                tail_rest.len() == 1 && tail_rest[0] == self.endmarker_offset()
            }
            Reached::Node(node) => {
                let b = self.get_base(node);
                if b > 0 {
                    let end_child = b + self.endmarker_offset();
                    end_child < self.da_size() && self.get_check(end_child) == node
                } else if b < 0 {
                    self.tail_is_complete_here(-b)
                } else {
                    false
                }
            }
        }
    }

    /// All stored words beginning with `prefix`, in ascending-offset order.
    pub fn starts_with(&self, prefix: &[u8]) -> Vec<String> {
        let Some(codes) = self.codes_for(prefix) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match self.reach(&codes) {
            Reached::NotFound => {}
            Reached::Leaf { tail_rest, .. } => {
                let endmarker = self.endmarker_offset();
                let mut word = prefix.to_vec();
                word.extend(
                    tail_rest
                        .iter()
                        .filter(|&&c| c != endmarker)
                        .map(|&c| self.char_from_offset(c).unwrap()),
                );
                out.push(String::from_utf8_lossy(&word).into_owned());
            }
            Reached::Node(node) => self.collect_words(node, prefix, &mut out),
        }
        out
    }

    fn collect_words(&self, start: i32, prefix: &[u8], out: &mut Vec<String>) {
        let mut queue: VecDeque<(i32, Vec<u8>)> = VecDeque::new();
        queue.push_back((start, Vec::new()));
        while let Some((node, acc)) = queue.pop_front() {
            let b = self.get_base(node);
            if b < 0 {
                let mut word = prefix.to_vec();
                word.extend_from_slice(&acc);
                word.extend_from_slice(self.tail_suffix_bytes(-b));
                out.push(String::from_utf8_lossy(&word).into_owned());
                continue;
            }
            if b == 0 {
                continue;
            }
            for c in 1..=self.endmarker_offset() {
                let child = b + c;
                if child < self.da_size() && self.get_check(child) == node {
                    let mut next_acc = acc.clone();
                    if c != self.endmarker_offset() {
                        next_acc.push(self.char_from_offset(c).unwrap());
                    }
                    queue.push_back((child, next_acc));
                }
            }
        }
    }

    /// Left-to-right substring match: every stored word found starting at
    /// any position in `text`.
    pub fn find_matches(&self, text: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        for start in 0..text.len() {
            self.match_from(text, start, &mut out);
        }
        out
    }

    fn match_from(&self, text: &[u8], start: usize, out: &mut Vec<String>) {
        let mut cur = ROOT;
        let mut pos = start;
        loop {
            let b = self.get_base(cur);
            if b < 0 {
                if let Some(TailEntry::Suffix(s)) = self.get_tail(-b) {
                    if text[pos..].starts_with(s.as_slice()) {
                        let mut word = text[start..pos].to_vec();
                        word.extend_from_slice(s);
                        out.push(String::from_utf8_lossy(&word).into_owned());
                    }
                }
                return;
            }
            if b == 0 {
                return;
            }
            let end_child = b + self.endmarker_offset();
            if end_child < self.da_size() && self.get_check(end_child) == cur {
                out.push(String::from_utf8_lossy(&text[start..pos]).into_owned());
            }
            if pos >= text.len() {
                return;
            }
            let Some(off) = self.offset(text[pos]) else {
                return;
            };
            let next = b + off;
            if next >= self.da_size() || self.get_check(next) != cur {
                return;
            }
            cur = next;
            pos += 1;
        }
    }

    /// All distinct arrangements of (a subset of) `letters` that form a
    /// stored word.
    pub fn permute(&self, letters: &[u8]) -> Vec<String> {
        let mut counts: BTreeMap<u8, u32> = BTreeMap::new();
        for &b in letters {
            *counts.entry(b).or_insert(0) += 1;
        }
        let mut out = Vec::new();
        self.permute_rec(ROOT, &mut counts, &mut Vec::new(), &mut out);
        out
    }

    fn permute_rec(
        &self,
        node: i32,
        counts: &mut BTreeMap<u8, u32>,
        acc: &mut Vec<u8>,
        out: &mut Vec<String>,
    ) {
        let b = self.get_base(node);
        if b < 0 {
            let suffix = self.tail_suffix_bytes(-b);
            if is_sub_multiset(suffix, counts) {
                let mut word = acc.clone();
                word.extend_from_slice(suffix);
                out.push(String::from_utf8_lossy(&word).into_owned());
            }
            return;
        }
        if b == 0 {
            return;
        }
        let available: Vec<u8> = counts
            .iter()
            .filter(|&(_, &n)| n > 0)
            .map(|(&k, _)| k)
            .collect();
        for letter in available {
            let Some(off) = self.offset(letter) else {
                continue;
            };
            let child = b + off;
            if child < self.da_size() && self.get_check(child) == node {
                *counts.get_mut(&letter).unwrap() -= 1;
                acc.push(letter);
                self.permute_rec(child, counts, acc, out);
                acc.pop();
                *counts.get_mut(&letter).unwrap() += 1;
            }
        }
    }

    /// Stored words matching `expr`, where `?` matches any single real
    /// alphabet character (never the endmarker) and the word length must
    /// equal `expr.len()`.
    pub fn query(&self, expr: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        self.query_rec(ROOT, expr, 0, &mut Vec::new(), &mut out);
        out
    }

    fn query_rec(&self, node: i32, expr: &[u8], pos: usize, acc: &mut Vec<u8>, out: &mut Vec<String>) {
        if pos == expr.len() {
            let b = self.get_base(node);
            let complete = if b > 0 {
                let end_child = b + self.endmarker_offset();
                end_child < self.da_size() && self.get_check(end_child) == node
            } else if b < 0 {
                self.tail_is_complete_here(-b)
            } else {
                false
            };
            if complete {
                out.push(String::from_utf8_lossy(acc).into_owned());
            }
            return;
        }

        let b = self.get_base(node);
        if b < 0 {
            let suffix = self.tail_suffix_bytes(-b);
            let remaining = &expr[pos..];
            if suffix.len() == remaining.len()
                && remaining.iter().zip(suffix.iter()).all(|(&e, &s)| e == b'?' || e == s)
            {
                let mut word = acc.clone();
                word.extend_from_slice(suffix);
                out.push(String::from_utf8_lossy(&word).into_owned());
            }
            return;
        }
        if b == 0 {
            return;
        }

        if expr[pos] == b'?' {
            for c in 1..=self.alphabet_size as i32 {
                let child = b + c;
                if child < self.da_size() && self.get_check(child) == node {
                    let letter = self.char_from_offset(c).unwrap();
                    acc.push(letter);
                    self.query_rec(child, expr, pos + 1, acc, out);
                    acc.pop();
                }
            }
        } else {
            let ch = expr[pos];
            let Some(off) = self.offset(ch) else { return };
            let child = b + off;
            if child < self.da_size() && self.get_check(child) == node {
                acc.push(ch);
                self.query_rec(child, expr, pos + 1, acc, out);
                acc.pop();
            }
        }
    }
}

fn is_sub_multiset(suffix: &[u8], counts: &BTreeMap<u8, u32>) -> bool {
    let mut need: BTreeMap<u8, u32> = BTreeMap::new();
    for &c in suffix {
        *need.entry(c).or_insert(0) += 1;
    }
    need.iter().all(|(c, &n)| counts.get(c).copied().unwrap_or(0) >= n)
}
