//! Sequential ID allocation on top of the store's atomic counter.

use tracing::{debug, info};

use crate::domain::mapping_store::MappingStore;
use crate::error::ShortenerError;

/// Default first ID handed out by a fresh counter.
///
/// Keeps freshly deployed services from minting one- and two-character
/// tokens that are trivial to enumerate.
pub const DEFAULT_STARTING_OFFSET: u64 = 10_000;

/// Rounds of increment-then-seed before giving up on a contended fresh counter.
pub const MAX_SEED_ATTEMPTS: usize = 8;

/// Hands out strictly increasing IDs, never reusing one.
///
/// Every call is a single atomic `INCR` once the counter has reached the
/// starting offset. Before that, a caller that observes a value below the
/// offset tries to move the counter from exactly that value to the offset
/// with a compare-and-swap:
///
/// - the winner returns the offset itself
/// - losers increment again and retry
///
/// Only a counter still below the offset can be swapped, and a successful
/// swap lifts it to the offset for good, so at most one caller ever returns
/// the offset and nobody returns a value below it.
#[derive(Clone)]
pub struct IdAllocator {
    mappings: MappingStore,
    starting_offset: u64,
}

impl IdAllocator {
    /// Creates an allocator over the counter key of `mappings`.
    ///
    /// `starting_offset` values below 1 are treated as 1.
    pub fn new(mappings: MappingStore, starting_offset: u64) -> Self {
        Self {
            mappings,
            starting_offset: starting_offset.max(1),
        }
    }

    pub fn starting_offset(&self) -> u64 {
        self.starting_offset
    }

    /// Allocates the next ID.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::StoreUnavailable`] if any store call fails
    /// - [`ShortenerError::EncodingInvariant`] if the counter holds a value
    ///   that no increment of a valid counter can produce
    /// - [`ShortenerError::CounterContention`] if the fresh counter could not
    ///   be seeded within [`MAX_SEED_ATTEMPTS`] rounds
    pub async fn next(&self) -> Result<u64, ShortenerError> {
        for attempt in 1..=MAX_SEED_ATTEMPTS {
            let value = self.mappings.next_counter().await?;

            if value < 1 {
                return Err(ShortenerError::EncodingInvariant { value });
            }

            let id = value as u64;
            if id >= self.starting_offset {
                return Ok(id);
            }

            let offset = i64::try_from(self.starting_offset)
                .map_err(|_| ShortenerError::EncodingInvariant { value })?;

            if self.mappings.seed_counter(value, offset).await? {
                info!(
                    observed = value,
                    offset, "Seeded fresh ID counter at starting offset"
                );
                return Ok(self.starting_offset);
            }

            debug!(observed = value, attempt, "Counter moved while seeding, retrying");
        }

        Err(ShortenerError::CounterContention {
            attempts: MAX_SEED_ATTEMPTS,
        })
    }
}
