//! Evolutionary training of arena agents.
//!
//! This crate drives rounds of the arena and improves the agents' networks between them.
//!
//! # Architecture
//!
//! ```text
//! Session (one tick at a time)
//!     ↓ steps
//! Arena + AgentController (brawlnet-engine, brawlnet-ai)
//!     ↓ status after every tick
//! RoundScheduler (timeout / extinction / victory / defeat)
//!     ↓ round end
//! EvolutionEngine (rank, promote champion, populate next round)
//! ```
//!
//! - [`session`] - the tick loop and its configuration
//! - [`evolution`] - champion lineage, population, rollback history
//! - [`scheduler`] - round termination
//! - [`stats`] - fitness summaries for reports
//!
//! # Modes
//!
//! **Training** rounds consist of bots only. Each round ends when time runs out or at most
//! one bot is left alive; the best bot becomes the champion and the next round is populated
//! with mutated champion clones.
//!
//! **Interactive** rounds put a human-controlled agent against unmutated champion clones.
//! They end in victory, defeat or a draw and do not evolve the lineage.
//!
//! # Current Limitations
//!
//! - **Single lineage**: all offspring descend from one champion; there is no crossover and
//!   no diversity preservation, so training can get stuck on a local optimum
//! - **Noisy fitness**: every network plays a single round per generation against its
//!   siblings, so a lucky spawn can decide who becomes champion
//! - **Single-threaded**: agents act sequentially within a tick and rounds are not run in
//!   parallel

pub mod evolution;
pub mod scheduler;
pub mod session;
pub mod stats;
