// crates/adapters/src/rate_limiter.rs
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Token bucket rate limiter
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
}

struct TokenBucket {
    capacity: f64,
    available: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.available = (self.available + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

impl RateLimiter {
    pub fn new(capacity: usize, refill_per_sec: f64) -> Self {
        let capacity = capacity.max(1) as f64;
        Self {
            bucket: Mutex::new(TokenBucket {
                capacity,
                available: capacity,
                refill_rate: refill_per_sec.max(f64::MIN_POSITIVE),
                last_refill: Instant::now(),
            }),
        }
    }
    
    /// Bucket sized for a per-minute request budget, starting full
    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests as usize, requests.max(1) as f64 / 60.0)
    }
    
    /// Take a token, waiting for the refill if necessary
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock();
                bucket.refill();
                
                if bucket.available >= 1.0 {
                    bucket.available -= 1.0;
                    return;
                }
                
                Duration::from_secs_f64((1.0 - bucket.available) / bucket.refill_rate)
            };
            
            tracing::debug!("Rate limiter waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
    
    /// Take a token without waiting
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock();
        bucket.refill();
        
        if bucket.available < 1.0 {
            return false;
        }
        bucket.available -= 1.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[tokio::test]
    async fn test_rate_limiter() {
        let limiter = RateLimiter::new(2, 50.0);
        
        // Should acquire immediately
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(!limiter.try_acquire());
        
        // Third waits for roughly one refill interval
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
    
    #[test]
    fn test_per_minute_starts_full() {
        let limiter = RateLimiter::per_minute(3);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
