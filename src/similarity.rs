use ahash::AHashMap;

/// A run of `size` equal characters at `a[a..]` and `b[b..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Percentage similarity of two plate strings, in `0.0..=100.0`.
///
/// `2 * M / T`, where `M` is the total size of the matching blocks found by
/// recursively taking the longest common substring and `T` the combined length.
/// The pair is matched in lexicographic order so the score does not depend on
/// argument order.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 { return 100.0; }
    let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.size).sum();
    (2.0 * matched as f64 / total as f64) * 100.0
}

/// Non-overlapping matching blocks of `a` against `b`, ascending and with adjacent runs merged.
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let m = Matcher::new(a, b);
    let mut found = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let blk = m.longest_match(alo, ahi, blo, bhi);
        if blk.size == 0 { continue; }
        if alo < blk.a && blo < blk.b {
            queue.push((alo, blk.a, blo, blk.b));
        }
        if blk.a + blk.size < ahi && blk.b + blk.size < bhi {
            queue.push((blk.a + blk.size, ahi, blk.b + blk.size, bhi));
        }
        found.push(blk);
    }
    found.sort_by_key(|blk| (blk.a, blk.b));

    let mut merged: Vec<Block> = Vec::with_capacity(found.len());
    for blk in found {
        match merged.last_mut() {
            Some(prev) if prev.a + prev.size == blk.a && prev.b + prev.size == blk.b => {
                prev.size += blk.size;
            }
            _ => merged.push(blk),
        }
    }
    merged
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    // positions of each character in `b`, ascending
    b2j: AHashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: AHashMap<char, Vec<usize>> = AHashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        // Long second strings: characters that are too common don't seed matches.
        if b.len() >= 200 {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, js| js.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Longest block inside `a[alo..ahi]` x `b[blo..bhi]`; earliest in `a`, then in `b`, on ties.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
        // j -> length of the match ending at (i - 1, j)
        let mut j2len: AHashMap<usize, usize> = AHashMap::new();
        for i in alo..ahi {
            let mut next: AHashMap<usize, usize> = AHashMap::new();
            if let Some(js) = self.b2j.get(&self.a[i]) {
                for &j in js {
                    if j < blo { continue; }
                    if j >= bhi { break; }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters were left out of b2j; let them extend a block at either end.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }
        Block { a: besti, b: bestj, size: bestsize }
    }
}
