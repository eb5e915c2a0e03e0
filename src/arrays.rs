use crate::Trie;

/// Index 0 is never a node. Index 1 is always the root.
pub(crate) const ROOT: i32 = 1;

impl Trie {
    /// Maps a real alphabet byte to its double-array offset in `[1, A]`.
    /// Returns `None` for bytes outside the configured range.
    pub(crate) fn offset(&self, ch: u8) -> Option<i32> {
        let lo = self.first_symbol as u32;
        let hi = lo + self.alphabet_size;
        let ch = ch as u32;
        if ch >= lo && ch < hi {
            Some((ch - lo) as i32 + 1)
        } else {
            None
        }
    }

    /// Maps an offset in `[1, A]` back to its alphabet byte. Returns `None`
    /// for the endmarker offset or anything outside the real alphabet.
    pub(crate) fn char_from_offset(&self, k: i32) -> Option<u8> {
        if k >= 1 && k <= self.alphabet_size as i32 {
            Some(self.first_symbol + (k - 1) as u8)
        } else {
            None
        }
    }

    /// The reserved offset, one past the last real symbol, that terminates
    /// every inserted key.
    pub(crate) fn endmarker_offset(&self) -> i32 {
        self.alphabet_size as i32 + 1
    }

    /// The current logical upper bound on occupied indices: positions
    /// `>= da_size` are outside the trie even if physically allocated.
    pub(crate) fn da_size(&self) -> i32 {
        self.check[ROOT as usize]
    }

    pub(crate) fn get_base(&self, i: i32) -> i32 {
        if i < 0 {
            return 0;
        }
        self.base.get(i as usize).copied().unwrap_or(0)
    }

    pub(crate) fn get_check(&self, i: i32) -> i32 {
        if i < 0 {
            return 0;
        }
        self.check.get(i as usize).copied().unwrap_or(0)
    }

    /// Grows both arrays (and the free-slot index) so that index `limit` is
    /// addressable.
    pub(crate) fn ensure_reachable(&mut self, limit: i32) {
        let limit = limit.max(0) as usize;
        while self.base.len() <= limit {
            let idx = self.base.len() as i32;
            self.base.push(0);
            self.check.push(0);
            if idx >= 2 {
                self.free.mark_free(idx);
            }
        }
    }

    fn sync_free_slot(&mut self, i: i32) {
        if i < 2 {
            return;
        }
        if self.get_base(i) == 0 && self.get_check(i) == 0 {
            self.free.mark_free(i);
        } else {
            self.free.mark_used(i);
        }
    }

    pub(crate) fn set_base(&mut self, i: i32, v: i32) {
        self.ensure_reachable(i);
        self.base[i as usize] = v;
        self.sync_free_slot(i);
        if v != 0 && i + 1 > self.check[ROOT as usize] {
            self.check[ROOT as usize] = i + 1;
        }
    }

    pub(crate) fn set_check(&mut self, i: i32, v: i32) {
        self.ensure_reachable(i);
        self.check[i as usize] = v;
        if i != ROOT {
            self.sync_free_slot(i);
        }
    }

    /// The offsets `c` in `[1, A+1]` at which `n` currently has a child,
    /// in ascending order.
    pub(crate) fn child_offsets(&self, n: i32) -> Vec<i32> {
        let base_n = self.get_base(n);
        if base_n <= 0 {
            return Vec::new();
        }
        let da_size = self.da_size();
        let mut out = Vec::new();
        for c in 1..=self.endmarker_offset() {
            let pos = base_n + c;
            if pos < da_size && self.get_check(pos) == n {
                out.push(c);
            }
        }
        out
    }
}
