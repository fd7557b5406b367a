use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

pub struct RateLimiter;

impl RateLimiter {
    /// Wait appropriate duration based on the data provider
    pub async fn wait(source: &str) {
        match source.to_uppercase().as_str() {
            "WORLDBANK" => {
                // The World Bank API tolerates bursts; a short jittered delay
                // keeps a concurrent fan-out from landing as one spike.
                let delay = {
                    let mut rng = rand::thread_rng();
                    rng.gen_range(50..250)
                };
                sleep(Duration::from_millis(delay)).await;
            }
            "NEWSDATA" => {
                // Free tier allows roughly 30 requests per 15 minutes; keep a
                // comfortable gap.
                let delay = {
                    let mut rng = rand::thread_rng();
                    rng.gen_range(1000..2000)
                };
                sleep(Duration::from_millis(delay)).await;
            }
            "EXCHANGERATE" => {
                sleep(Duration::from_millis(250)).await;
            }
            _ => {
                // Default minimal safe delay
                sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
