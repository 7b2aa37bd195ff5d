use std::fmt::Write;
use std::ops::Range;

/// Values of a template evaluated over one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    /// The `out` signal: the accept state was active at some position.
    pub out: bool,
    pub accept_state: usize,
    /// `states[i]` is the state vector before input position `i`; position 0
    /// is the sentinel, so message byte `j` moves `states[j+1]` to `states[j+2]`.
    pub states: Vec<Vec<bool>>,
    /// Per input position, whether that step lies on a run that reaches accept.
    pub on_path: Vec<bool>,
    pub reveals: Vec<Reveal>,
}

impl Witness {
    pub fn reveal(&self, name: &str) -> Option<&Reveal> {
        self.reveals.iter().find(|r| r.name == name)
    }

    /// Message offsets after which the accept state is active.
    pub fn accepted_at(&self) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .skip(2)
            .filter(|(_, bits)| bits[self.accept_state])
            .map(|(i, _)| i - 2)
            .collect()
    }

    /// Active states per position, one line each.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, bits) in self.states.iter().enumerate() {
            let active: Vec<String> = bits
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(s, _)| format!("s{s}"))
                .collect();
            writeln!(out, "{i}: {}", active.join(" ")).expect("String write never fails");
        }
        out
    }
}

/// A revealed-byte output array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub name: String,
    /// The signal values: the message byte where revealed, 0 elsewhere.
    pub bytes: Vec<u8>,
    /// Which positions are revealed, so a revealed 0 byte stays visible.
    pub mask: Vec<bool>,
}

impl Reveal {
    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|&m| m)
    }

    /// Maximal runs of revealed message offsets.
    pub fn runs(&self) -> Vec<Range<usize>> {
        let mut runs: Vec<Range<usize>> = Vec::new();
        for (i, &on) in self.mask.iter().enumerate() {
            if !on {
                continue;
            }
            match runs.last_mut() {
                Some(run) if run.end == i => run.end = i + 1,
                _ => runs.push(i..i + 1),
            }
        }
        runs
    }

    /// The revealed bytes, in order, without the zero filler.
    pub fn revealed(&self) -> Vec<u8> {
        self.bytes
            .iter()
            .zip(&self.mask)
            .filter(|(_, on)| **on)
            .map(|(b, _)| *b)
            .collect()
    }
}
