//! RNG module - seeded 7-bag piece generation
//!
//! Every run of seven draws contains each piece kind exactly once. A bag is
//! shuffled only when the previous one is used up, so two generators built
//! from the same seed hand out identical sequences. Two-player sessions rely
//! on that to give both boards the same pieces.

use crate::types::PieceKind;

/// Linear congruential RNG (Numerical Recipes constants)
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // a zero state never leaves zero
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Seeded 7-bag generator
///
/// Implements [`Iterator`] as an endless stream of kinds.
///
/// # Examples
///
/// ```
/// use tetris_ai_core::rng::PieceGenerator;
///
/// let mut a = PieceGenerator::new(42);
/// let mut b = PieceGenerator::new(42);
/// for _ in 0..21 {
///     assert_eq!(a.draw(), b.draw());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    bag: [PieceKind; 7],
    /// Next undrawn slot; 7 means the bag is used up
    cursor: usize,
    rng: SimpleRng,
    seed: u32,
}

impl PieceGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            cursor: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    fn shuffled_bag(rng: &mut SimpleRng) -> [PieceKind; 7] {
        let mut bag = PieceKind::ALL;
        rng.shuffle(&mut bag);
        bag
    }

    /// Remove and return the next kind, refilling the bag when it is empty
    pub fn draw(&mut self) -> PieceKind {
        if self.cursor >= self.bag.len() {
            self.bag = Self::shuffled_bag(&mut self.rng);
            self.cursor = 0;
        }
        let kind = self.bag[self.cursor];
        self.cursor += 1;
        kind
    }

    /// The kind the next [`draw`](Self::draw) will return, without consuming it
    ///
    /// When the bag is empty the upcoming bag is shuffled on a copy of the RNG,
    /// which yields the same order the real refill will.
    pub fn peek(&self) -> PieceKind {
        if self.cursor < self.bag.len() {
            return self.bag[self.cursor];
        }
        let mut preview = self.rng.clone();
        Self::shuffled_bag(&mut preview)[0]
    }

    /// Kinds left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.cursor..]
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Iterator for PieceGenerator {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        Some(self.draw())
    }
}
