use crate::Trie;

impl Trie {
    /// Finds the smallest base `q` such that every offset in `offsets` can
    /// be placed without collision: `q > 0` and `CHECK[q + c] = 0` for each
    /// `c` in `offsets`.
    ///
    /// Walks the free-slot index in ascending order. For each free position
    /// `f`, the candidate base is `q = f - min(offsets)` (so that `f` itself
    /// becomes one of the filled slots). If accommodating `q` would reach
    /// past the currently allocated arrays, they are grown and the walk
    /// continues from the next free position — growing never invalidates
    /// positions already examined, since new free slots only ever appear
    /// past the previous end of the arrays. If no free position yields a
    /// usable `q`, the arrays are extended by exactly enough to fit the
    /// whole offset span and that base is returned.
    pub(crate) fn x_check(&mut self, offsets: &[i32]) -> i32 {
        debug_assert!(!offsets.is_empty(), "x_check requires a non-empty offset set");
        let m = *offsets.iter().min().unwrap();
        let mx = *offsets.iter().max().unwrap();

        let mut examined = 0usize;
        loop {
            let snapshot: Vec<i32> = self.free.ascending().collect();
            if examined >= snapshot.len() {
                let span = mx - m + 1;
                let old_len = self.base.len() as i32;
                self.ensure_reachable(old_len + span - 1);
                let q = self.base.len() as i32 - span - m;
                debug_assert!(q > 0);
                return q;
            }

            for &f in &snapshot[examined..] {
                examined += 1;
                let q = f - m;
                if q <= 0 {
                    continue;
                }
                if (q + mx) as usize >= self.base.len() {
                    self.ensure_reachable(q + mx);
                    break; // re-snapshot and resume from `examined`
                }
                if offsets.iter().all(|&c| self.get_base(q + c) == 0 && self.get_check(q + c) == 0) {
                    return q;
                }
            }
        }
    }

    /// Relocates the children of node `h` to a freshly-chosen base so that
    /// `h` can accommodate `add_offset` (when `h` is the node gaining a new
    /// child) in addition to its existing children `orig_offsets`.
    ///
    /// `orig_offsets` must be `h`'s children captured *before* any mutation;
    /// relocating one node can shift `current`'s own identity when `current`
    /// happens to be among the children being moved, so the possibly-updated
    /// index is returned.
    pub(crate) fn modify(
        &mut self,
        mut current: i32,
        h: i32,
        add_offset: i32,
        orig_offsets: &[i32],
    ) -> i32 {
        let old_base = self.get_base(h);

        let mut for_xcheck: Vec<i32> = orig_offsets.to_vec();
        if add_offset != 0 {
            for_xcheck.push(add_offset);
        }
        let new_base = self.x_check(&for_xcheck);
        self.set_base(h, new_base);

        if orig_offsets.is_empty() {
            return current;
        }

        for &c in orig_offsets {
            let old_node = old_base + c;
            let new_node = new_base + c;
            let moved_base = self.get_base(old_node);

            self.set_base(new_node, moved_base);
            self.set_check(new_node, h);

            if moved_base > 0 {
                for k in 1..=self.endmarker_offset() {
                    let child_pos = moved_base + k;
                    if self.get_check(child_pos) == old_node {
                        self.set_check(child_pos, new_node);
                    }
                }
            }

            if current == old_node {
                current = new_node;
            }

            self.set_base(old_node, 0);
            self.set_check(old_node, 0);
        }

        current
    }
}
