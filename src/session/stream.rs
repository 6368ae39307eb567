//! Streaming-response sources.
//!
//! The manager's streaming contract is deliberately narrow: a
//! [`ResponseStream`] yields successive *cumulative* partial texts for one
//! in-flight response, and the manager applies each as an in-place overwrite
//! of the response's single bot message. Anything that can produce such a
//! stream plugs in: the timer-driven simulation here, or a real incremental
//! transport feeding a channel.

use std::time::Duration;

use async_stream::stream;
use futures::stream::BoxStream;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::Result;

/// Successive cumulative partial texts of one response.
pub type ResponseStream = BoxStream<'static, Result<String>>;

/// Cadence of the simulated stream.
#[derive(Debug, Clone)]
pub struct SimulatedStreamConfig {
    /// Characters revealed per tick.
    pub chunk_chars: usize,
    /// Delay between ticks.
    pub tick: Duration,
}

impl Default for SimulatedStreamConfig {
    fn default() -> Self {
        Self {
            chunk_chars: 1,
            tick: Duration::from_millis(50),
        }
    }
}

/// Reveal `full_text` as monotonically growing prefixes, one chunk per tick,
/// ending with the full string.
///
/// A stand-in for a real incremental transport; the emitted sequence
/// satisfies the same contract a chunked response would.
pub fn simulated_stream(
    full_text: impl Into<String>,
    config: SimulatedStreamConfig,
) -> ResponseStream {
    let full_text: String = full_text.into();
    Box::pin(stream! {
        let chunk = config.chunk_chars.max(1);
        let total_chars = full_text.chars().count();
        let mut interval = tokio::time::interval(config.tick);
        let mut end_chars = 0;
        while end_chars < total_chars {
            interval.tick().await;
            end_chars = (end_chars + chunk).min(total_chars);
            let prefix: String = full_text.chars().take(end_chars).collect();
            yield Ok(prefix);
        }
    })
}

/// Adapt a push channel into a [`ResponseStream`].
///
/// A real transport (chunked body reader, server push) sends each cumulative
/// partial into the channel; closing it ends the response.
pub fn channel_stream(rx: tokio::sync::mpsc::Receiver<Result<String>>) -> ResponseStream {
    Box::pin(ReceiverStream::new(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test(start_paused = true)]
    async fn prefixes_grow_to_the_full_string() {
        let mut stream = simulated_stream("abc", SimulatedStreamConfig::default());
        let mut seen = Vec::new();
        while let Some(item) = stream.next().await {
            seen.push(item.unwrap());
        }
        assert_eq!(seen, vec!["a", "ab", "abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn chunked_reveal_respects_char_boundaries() {
        let mut stream = simulated_stream(
            "héllo",
            SimulatedStreamConfig {
                chunk_chars: 2,
                tick: Duration::from_millis(10),
            },
        );
        let mut seen = Vec::new();
        while let Some(item) = stream.next().await {
            seen.push(item.unwrap());
        }
        assert_eq!(seen, vec!["hé", "héll", "héllo"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_yields_nothing() {
        let mut stream = simulated_stream("", SimulatedStreamConfig::default());
        assert!(stream.next().await.is_none());
    }
}
