// plain log lines instead of a progress bar, batch runs usually go to a file
use {
    std::time::Instant,
    tracing::info,
};

pub struct Progress {
    message: String,
    total: usize,
    started_at: Instant,
    reported_at: Instant,
    processed: usize,
}

impl Progress {
    pub fn new(message: String, total: usize) -> Self {
        Self {
            message,
            total,
            started_at: Instant::now(),
            reported_at: Instant::now(),
            processed: 0,
        }
    }

    pub fn update(&mut self) -> bool {
        self.processed += 1;

        let now = Instant::now();
        if (now - self.reported_at).as_millis() >= 10_000 {
            self.reported_at = now;
            let rate = (self.processed as f32) / (now - self.started_at).as_secs_f32();
            info!("{}: {}/{} ({:.2}/second)", self.message, self.processed, self.total, rate);
            true
        } else {
            false
        }
    }

    pub fn finish(&self) {
        let elapsed = self.started_at.elapsed().as_secs_f32();
        info!("{}: done, {} in {:.2}s", self.message, self.processed, elapsed);
    }
}
