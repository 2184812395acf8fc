//! Interactive session: many birth dates, one insight on screen.
//!
//! Every submission bumps a generation counter and spawns its own insight
//! fetch. Fetches are never cancelled; instead each result carries the
//! generation it was started for and anything older than the latest
//! calculation is dropped on arrival.

use crate::calculation::{CalculationResult, calculate};
use crate::input::{InputError, parse_birth_date};
use crate::insight::{InsightData, InsightProvider, insight_or_fallback};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedInsight {
    pub generation: u64,
    pub retirement_year: i32,
    pub insight: InsightData,
}

pub struct Session {
    provider: Option<Arc<dyn InsightProvider>>,
    retirement_age: u32,
    generation: u64,
    tx: mpsc::UnboundedSender<TaggedInsight>,
}

impl Session {
    /// `provider = None` disables insights altogether.
    pub fn new(
        provider: Option<Arc<dyn InsightProvider>>,
        retirement_age: u32,
    ) -> (Self, mpsc::UnboundedReceiver<TaggedInsight>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            provider,
            retirement_age,
            generation: 0,
            tx,
        };
        (session, rx)
    }

    pub fn retirement_age(&self) -> u32 {
        self.retirement_age
    }

    /// Validates and calculates synchronously, then starts the insight fetch
    /// in the background. Invalid input leaves the current generation alone.
    pub fn submit(&mut self, raw: &str, today: NaiveDate) -> Result<CalculationResult, InputError> {
        let birthdate = parse_birth_date(raw, today)?;
        let result = calculate(birthdate, today, self.retirement_age);

        self.generation += 1;
        if let Some(provider) = &self.provider {
            let provider = Arc::clone(provider);
            let tx = self.tx.clone();
            let generation = self.generation;
            let retirement_year = result.retirement.retirement_year();
            let is_retired = result.retirement.is_retired;

            tokio::spawn(async move {
                let insight = insight_or_fallback(provider.as_ref(), retirement_year, is_retired).await;
                // Receiver gone means the session ended; nothing to show.
                let _ = tx.send(TaggedInsight {
                    generation,
                    retirement_year,
                    insight,
                });
            });
        }

        Ok(result)
    }

    /// Returns the insight if it belongs to the latest calculation.
    pub fn accept(&self, tagged: TaggedInsight) -> Option<TaggedInsight> {
        if tagged.generation == self.generation {
            Some(tagged)
        } else {
            debug!(
                stale = tagged.generation,
                current = self.generation,
                "dropping insight for superseded calculation"
            );
            None
        }
    }
}
