//! Tower of Hanoi pegs.

use algotrace_protocol::{AuxSnapshot, DiskMove, HanoiSnapshot, Peg};

const PEG_NAMES: [&str; 3] = ["A", "B", "C"];

/// Three pegs; disk `n` is the largest.
#[derive(Debug, Clone)]
pub struct Pegs {
    pegs: [Vec<u32>; 3],
    disk_count: u32,
    moves: u32,
}

impl Pegs {
    /// All `disks` stacked on the first peg.
    pub fn new(disks: u32) -> Self {
        Self {
            pegs: [(1..=disks).rev().collect(), Vec::new(), Vec::new()],
            disk_count: disks,
            moves: 0,
        }
    }

    pub fn name(peg: usize) -> &'static str {
        PEG_NAMES[peg]
    }

    pub fn top(&self, peg: usize) -> Option<u32> {
        self.pegs[peg].last().copied()
    }

    pub fn peg(&self, peg: usize) -> &[u32] {
        &self.pegs[peg]
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Move the top disk of `from` onto `to`.
    ///
    /// Returns `None` (and changes nothing) for an empty source or a move
    /// that would put a larger disk on a smaller one.
    pub fn move_disk(&mut self, from: usize, to: usize) -> Option<DiskMove> {
        let disk = self.top(from)?;
        if self.top(to).is_some_and(|top| top < disk) {
            return None;
        }
        self.pegs[from].pop();
        self.pegs[to].push(disk);
        self.moves += 1;
        Some(DiskMove { disk, from, to })
    }

    pub fn is_solved(&self) -> bool {
        self.pegs[2].len() == self.disk_count as usize
    }

    pub fn snapshot(&self, moving: Option<DiskMove>) -> AuxSnapshot {
        AuxSnapshot::Hanoi(HanoiSnapshot {
            pegs: self
                .pegs
                .iter()
                .zip(PEG_NAMES)
                .map(|(disks, name)| Peg {
                    name: name.to_string(),
                    disks: disks.clone(),
                })
                .collect(),
            disk_count: self.disk_count,
            moves: self.moves,
            moving,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_moves_are_refused() {
        let mut pegs = Pegs::new(2);
        assert!(pegs.move_disk(1, 0).is_none());
        assert_eq!(pegs.move_disk(0, 1).map(|m| m.disk), Some(1));
        assert!(pegs.move_disk(0, 1).is_none());
        assert_eq!(pegs.moves(), 1);
    }

    #[test]
    fn snapshot_keeps_pre_move_layout() {
        let mut pegs = Pegs::new(3);
        let snapshot = pegs.snapshot(None);
        pegs.move_disk(0, 2);
        match snapshot {
            AuxSnapshot::Hanoi(h) => {
                assert_eq!(h.pegs[0].disks, vec![3, 2, 1]);
                assert!(h.pegs[2].disks.is_empty());
                assert_eq!(h.moves, 0);
            }
            _ => panic!("expected hanoi"),
        }
        assert!(pegs.snapshot(None).validate().is_ok());
    }
}
