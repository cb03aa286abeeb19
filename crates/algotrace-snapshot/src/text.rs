//! String-matching alignments and rolling-hash state.

use algotrace_protocol::{AuxSnapshot, CharCell, CharTag, RollingHashSnapshot, StringMatchSnapshot};

/// How far the current alignment has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Window placed, nothing compared yet.
    Window,
    /// The first `n` pattern characters match.
    Matched(usize),
    /// Characters before `j` match, `j` does not.
    Mismatch(usize),
    /// Whole pattern matches at this offset.
    Found,
}

/// Text and pattern being aligned.
#[derive(Debug, Clone, Copy)]
pub struct Alignment<'a> {
    text: &'a [char],
    pattern: &'a [char],
}

impl<'a> Alignment<'a> {
    pub fn new(text: &'a [char], pattern: &'a [char]) -> Self {
        Self { text, pattern }
    }

    /// Tag both strings for the pattern placed at `offset`; earlier hits in
    /// `matches` stay tagged `found` outside the current window.
    pub fn snapshot(&self, offset: usize, probe: Probe, matches: &[usize]) -> AuxSnapshot {
        let m = self.pattern.len();
        let mut text: Vec<CharCell> = self
            .text
            .iter()
            .map(|&ch| CharCell { ch, tag: CharTag::None })
            .collect();
        for &start in matches {
            for cell in text.iter_mut().skip(start).take(m) {
                cell.tag = CharTag::Found;
            }
        }
        let mut pattern: Vec<CharCell> = self
            .pattern
            .iter()
            .map(|&ch| CharCell { ch, tag: CharTag::Window })
            .collect();

        for k in 0..m {
            let tag = match probe {
                Probe::Window => CharTag::Window,
                Probe::Matched(n) if k < n => CharTag::Match,
                Probe::Matched(_) => CharTag::Window,
                Probe::Mismatch(j) if k < j => CharTag::Match,
                Probe::Mismatch(j) if k == j => CharTag::Mismatch,
                Probe::Mismatch(_) => CharTag::Window,
                Probe::Found => CharTag::Found,
            };
            if let Some(cell) = text.get_mut(offset + k) {
                cell.tag = tag;
            }
            pattern[k].tag = tag;
        }

        AuxSnapshot::StringMatch(StringMatchSnapshot {
            text,
            pattern,
            offset,
            matches: matches.to_vec(),
        })
    }
}

/// Polynomial rolling hash over a fixed-width window.
#[derive(Debug, Clone)]
pub struct RollingHash {
    base: u64,
    modulus: u64,
    /// `base^(m-1) mod modulus`, weight of the outgoing character.
    high: u64,
    text_len: usize,
    window_len: usize,
    window_start: usize,
    window_hash: u64,
    pattern_hash: u64,
}

impl RollingHash {
    /// Panics if `modulus < 2`.
    pub fn new(base: u64, modulus: u64, text_len: usize, pattern: &[char]) -> Self {
        assert!(modulus >= 2, "modulus must be at least 2");
        let mut rh = Self {
            base: base % modulus,
            modulus,
            high: 1,
            text_len,
            window_len: pattern.len(),
            window_start: 0,
            window_hash: 0,
            pattern_hash: 0,
        };
        for _ in 1..pattern.len() {
            rh.high = rh.high * rh.base % modulus;
        }
        rh.pattern_hash = rh.hash(pattern);
        rh
    }

    pub fn hash(&self, s: &[char]) -> u64 {
        s.iter()
            .fold(0, |h, &c| (h * self.base + c as u64 % self.modulus) % self.modulus)
    }

    /// Hash the first window of `text`.
    pub fn start(&mut self, text: &[char]) -> u64 {
        self.window_start = 0;
        self.window_hash = self.hash(&text[..self.window_len.min(text.len())]);
        self.window_hash
    }

    /// Slide the window one position right.
    pub fn roll(&mut self, outgoing: char, incoming: char) -> u64 {
        let m = self.modulus;
        let out = (outgoing as u64 % m) * self.high % m;
        let h = (self.window_hash + m - out) % m;
        self.window_hash = (h * self.base + incoming as u64 % m) % m;
        self.window_start += 1;
        self.window_hash
    }

    pub fn window_hash(&self) -> u64 {
        self.window_hash
    }

    pub fn pattern_hash(&self) -> u64 {
        self.pattern_hash
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    pub fn hashes_match(&self) -> bool {
        self.window_hash == self.pattern_hash
    }

    pub fn snapshot(&self) -> AuxSnapshot {
        AuxSnapshot::RollingHash(RollingHashSnapshot {
            base: self.base,
            modulus: self.modulus,
            text_len: self.text_len,
            window_start: self.window_start,
            window_len: self.window_len,
            window_hash: self.window_hash,
            pattern_hash: self.pattern_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn mismatch_tags_prefix_and_failure() {
        let text = chars("abcab");
        let pattern = chars("abd");
        let snapshot = Alignment::new(&text, &pattern).snapshot(0, Probe::Mismatch(2), &[]);
        match snapshot {
            AuxSnapshot::StringMatch(s) => {
                let tags: Vec<_> = s.text.iter().map(|c| c.tag).collect();
                assert_eq!(
                    tags,
                    vec![CharTag::Match, CharTag::Match, CharTag::Mismatch, CharTag::None, CharTag::None]
                );
                assert_eq!(s.pattern[2].tag, CharTag::Mismatch);
            }
            _ => panic!("expected string match"),
        }
    }

    #[test]
    fn earlier_matches_stay_found() {
        let text = chars("abab");
        let pattern = chars("ab");
        let snapshot = Alignment::new(&text, &pattern).snapshot(2, Probe::Window, &[0]);
        assert!(snapshot.validate().is_ok());
        match snapshot {
            AuxSnapshot::StringMatch(s) => {
                assert_eq!(s.text[0].tag, CharTag::Found);
                assert_eq!(s.text[2].tag, CharTag::Window);
            }
            _ => panic!("expected string match"),
        }
    }

    #[test]
    fn rolling_matches_direct_hash() {
        let text = chars("abracadabra");
        let pattern = chars("abra");
        let mut rh = RollingHash::new(256, 101, text.len(), &pattern);
        rh.start(&text);
        assert!(rh.hashes_match());
        for i in 1..=text.len() - pattern.len() {
            let rolled = rh.roll(text[i - 1], text[i + pattern.len() - 1]);
            assert_eq!(rolled, rh.hash(&text[i..i + pattern.len()]));
            assert!(rh.snapshot().validate().is_ok());
        }
        assert_eq!(rh.window_start(), text.len() - pattern.len());
    }

    proptest! {
        #[test]
        fn rolling_hash_is_consistent(text in "[a-d]{4,24}", width in 1usize..4) {
            let text = chars(&text);
            let pattern = text[..width].to_vec();
            let mut rh = RollingHash::new(31, 1_000_000_007, text.len(), &pattern);
            rh.start(&text);
            for i in 1..=text.len() - width {
                let rolled = rh.roll(text[i - 1], text[i + width - 1]);
                prop_assert_eq!(rolled, rh.hash(&text[i..i + width]));
            }
        }
    }
}
