use crate::arrays::ROOT;
use crate::tail::TailEntry;
use crate::{Trie, TrieError};

impl Trie {
    /// Inserts `word` into the trie. Idempotent: inserting an already-present
    /// word is a no-op. Returns [`TrieError::SymbolOutOfAlphabet`] if `word`
    /// contains a byte outside the configured alphabet, in which case the
    /// trie is left completely unchanged.
    pub fn insert(&mut self, word: &[u8]) -> Result<(), TrieError> {
        let mut full = Vec::with_capacity(word.len() + 1);
        for &ch in word {
            match self.offset(ch) {
                Some(o) => full.push(o),
                None => return Err(TrieError::SymbolOutOfAlphabet { symbol: ch }),
            }
        }
        full.push(self.endmarker_offset());

        let mut cur = ROOT;
        let mut idx = 0;
        while idx < full.len() && self.get_base(cur) > 0 {
            let off = full[idx];
            let next = self.get_base(cur) + off;
            self.ensure_reachable(next);
            if next >= self.da_size() || self.get_check(next) != cur {
                self.a_insert(cur, off, &full[idx..]);
                return Ok(());
            }
            cur = next;
            idx += 1;
        }

        if idx == full.len() {
            return Ok(()); // already present
        }

        self.b_insert(cur, &full[idx..]);
        Ok(())
    }

    /// Diverges at a branching node `cur`: the child slot for `off` is
    /// either empty (place the new leaf directly) or owned by a rival node
    /// `k` (relocate whichever of `cur` or `k` has the smaller family, then
    /// place the new leaf).
    fn a_insert(&mut self, mut cur: i32, off: i32, s: &[i32]) {
        let next = self.get_base(cur) + off;
        if self.get_check(next) == 0 {
            self.insert_codes_in_tail(cur, s, 0);
            return;
        }

        let k = self.get_check(next);
        let lc = self.child_offsets(cur);
        let lk = self.child_offsets(k);

        if lc.len() + 1 < lk.len() {
            cur = self.modify(cur, cur, off, &lc);
        } else {
            cur = self.modify(cur, k, 0, &lk);
        }

        self.insert_codes_in_tail(cur, s, 0);
    }

    /// Diverges at a leaf `cur` whose stored tail differs from the
    /// remaining input `r`: splits along their longest common prefix,
    /// turning `cur` into a chain of new branching nodes before re-homing
    /// both the original tail suffix and the new one as siblings.
    fn b_insert(&mut self, mut cur: i32, r: &[i32]) {
        let old_pos = self.get_base(cur); // negative tail pointer
        let t = self.tail_as_codes(-old_pos);

        if r == t.as_slice() {
            return; // already present
        }

        let common = r.iter().zip(t.iter()).take_while(|(a, b)| a == b).count();

        let mut s: Vec<i32> = Vec::new();
        for &c in &r[..common] {
            s.push(c);
            let new_base = self.x_check(&s);
            self.set_base(cur, new_base);
            let child = new_base + c;
            self.set_check(child, cur);
            cur = child;
            s.clear();
        }

        let r_suf = &r[common..];
        let t_suf = &t[common..];
        debug_assert!(!r_suf.is_empty() && !t_suf.is_empty());
        debug_assert_ne!(r_suf[0], t_suf[0]);

        let new_base = self.x_check(&[r_suf[0], t_suf[0]]);
        self.set_base(cur, new_base);

        self.insert_codes_in_tail(cur, t_suf, old_pos);
        self.insert_codes_in_tail(cur, r_suf, 0);
    }

    /// Places the leaf reached by following `s[0]` from `from_node`, storing
    /// `s[1..]` (minus the trailing endmarker, which is implicit) as its
    /// tail content. If `replace_pos` is `0`, a fresh tail slot is
    /// appended; otherwise the existing tail slot at `-replace_pos` is
    /// overwritten in place.
    fn insert_codes_in_tail(&mut self, from_node: i32, s: &[i32], replace_pos: i32) {
        debug_assert!(!s.is_empty());
        let edge = s[0];
        let leaf_pos = self.get_base(from_node) + edge;
        self.ensure_reachable(leaf_pos);
        self.set_check(leaf_pos, from_node);

        let entry = if edge == self.endmarker_offset() {
            debug_assert_eq!(s.len(), 1);
            TailEntry::EndOnly
        } else {
            debug_assert_eq!(*s.last().unwrap(), self.endmarker_offset());
            let chars = s[1..s.len() - 1]
                .iter()
                .map(|&c| self.char_from_offset(c).expect("real alphabet offset"))
                .collect();
            TailEntry::Suffix(chars)
        };

        let tail_idx = if replace_pos == 0 {
            self.push_tail(entry)
        } else {
            let idx = -replace_pos;
            self.set_tail(idx, entry);
            idx
        };

        self.set_base(leaf_pos, -tail_idx);
    }
}

#[cfg(test)]
mod tests {
    use crate::Trie;

    fn trie() -> Trie {
        Trie::new(26).unwrap()
    }

    #[test]
    fn single_word_round_trips() {
        let mut t = trie();
        t.insert(b"a").unwrap();
        assert!(t.contains(b"a"));
        assert!(!t.contains(b"b"));
    }

    #[test]
    fn reinserting_is_a_noop() {
        let mut t = trie();
        t.insert(b"cart").unwrap();
        t.insert(b"cart").unwrap();
        assert!(t.contains(b"cart"));
    }

    #[test]
    fn rejects_out_of_alphabet_symbol() {
        let mut t = Trie::new(4).unwrap(); // a..d
        let err = t.insert(b"cab").unwrap_err();
        assert!(matches!(err, crate::TrieError::SymbolOutOfAlphabet { symbol: b'b' }));
        assert!(!t.contains(b"ca"));
    }

    #[test]
    fn cat_car_cart_share_a_branching_prefix() {
        let mut t = trie();
        for w in [b"cat".as_slice(), b"car", b"cart"] {
            t.insert(w).unwrap();
        }
        for w in [b"cat".as_slice(), b"car", b"cart"] {
            assert!(t.contains(w), "{:?} missing", w);
        }
        assert!(!t.contains(b"ca"));
        assert!(!t.contains(b"carts"));
    }

    #[test]
    fn the_then_there_trigger_a_insert_branch_split() {
        let mut t = trie();
        for w in [b"the".as_slice(), b"then", b"there"] {
            t.insert(w).unwrap();
        }
        for w in [b"the".as_slice(), b"then", b"there"] {
            assert!(t.contains(w), "{:?} missing", w);
        }
        assert!(!t.contains(b"th"));
        assert!(!t.contains(b"the re"));
    }

    #[test]
    fn insertion_order_does_not_affect_final_membership() {
        let words: Vec<&[u8]> = vec![b"there", b"the", b"then", b"cart", b"car", b"cat"];
        let mut forward = trie();
        for w in &words {
            forward.insert(w).unwrap();
        }
        let mut backward = trie();
        for w in words.iter().rev() {
            backward.insert(w).unwrap();
        }
        for w in &words {
            assert!(forward.contains(w));
            assert!(backward.contains(w));
        }
    }

    #[test]
    fn degenerate_single_letter_alphabet() {
        let mut t = Trie::new(1).unwrap(); // alphabet = {'a'}
        t.insert(b"a").unwrap();
        t.insert(b"aa").unwrap();
        t.insert(b"aaa").unwrap();
        assert!(t.contains(b"a"));
        assert!(t.contains(b"aa"));
        assert!(t.contains(b"aaa"));
        assert!(!t.contains(b"aaaa"));
    }

    struct Lcg(u64);

    impl Lcg {
        fn new(seed: u64) -> Self {
            Self(seed)
        }
        fn next(&mut self) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            self.0
        }
        fn next_range(&mut self, bound: u64) -> u64 {
            self.next() % bound
        }
    }

    #[test]
    fn random_subsets_in_random_orders_are_consistent() {
        let alphabet = b"abcd";
        let all_words: Vec<String> = {
            let mut out = Vec::new();
            for a in alphabet {
                out.push(format!("{}", *a as char));
                for b in alphabet {
                    out.push(format!("{}{}", *a as char, *b as char));
                    for c in alphabet {
                        out.push(format!("{}{}{}", *a as char, *b as char, *c as char));
                    }
                }
            }
            out
        };

        let mut rng = Lcg::new(0xC0FFEE);
        for trial in 0..20u64 {
            let mut subset: Vec<String> = all_words
                .iter()
                .filter(|_| rng.next_range(3) != 0)
                .cloned()
                .collect();
            // Fisher-Yates shuffle using the LCG, not an external rand crate.
            for i in (1..subset.len()).rev() {
                let j = rng.next_range(i as u64 + 1) as usize;
                subset.swap(i, j);
            }

            let mut t = Trie::new(4).unwrap();
            for w in &subset {
                t.insert(w.as_bytes()).unwrap();
            }
            for w in &subset {
                assert!(t.contains(w.as_bytes()), "trial {trial}: missing {w:?}");
            }
            for w in &all_words {
                if !subset.contains(w) {
                    assert!(!t.contains(w.as_bytes()), "trial {trial}: spurious {w:?}");
                }
            }
        }
    }
}
