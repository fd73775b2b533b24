/// xorshift32; every random draw in a session goes through one instance.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    pub fn next_int(&mut self, max: u32) -> u32 {
        self.next() % max
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        // xorshift32 never yields 0, so shift down to [0, 2^32 - 1).
        f64::from(self.next() - 1) / 4_294_967_296.0
    }

    pub fn range_f64(&mut self, min: f64, max_exclusive: f64) -> f64 {
        debug_assert!(max_exclusive >= min);
        min + self.next_f64() * (max_exclusive - min)
    }
}
