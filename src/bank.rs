// Queue of hadrons awaiting a transport step within one event.
//
// Hadrons are processed first-in first-out; each carries the index of its
// entry in the event record so descendants can point back at it.

use crate::particle::Hadron;
use std::collections::VecDeque;

pub struct HadronBank {
    queue: VecDeque<(usize, Hadron)>,
}

impl HadronBank {
    pub fn new() -> Self {
        HadronBank {
            queue: VecDeque::new(),
        }
    }

    /// Queue a hadron recorded at `record_index`.
    pub fn push(&mut self, record_index: usize, hadron: Hadron) {
        self.queue.push_back((record_index, hadron));
    }

    pub fn pop(&mut self) -> Option<(usize, Hadron)> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for HadronBank {
    fn default() -> Self {
        Self::new()
    }
}
