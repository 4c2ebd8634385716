//! Chunk population hook.
//!
//! The world generator pushes every populated chunk into
//! `PendingPopulation::queued`, together with the block transactions each
//! populator produced. `swap_populated_blocks` runs once per update, proposes
//! a custom replacement for every transaction a mapping matches and moves
//! the chunk to `PendingPopulation::swapped` for the generator to commit.
use super::ReplacementResolver;
use crate::block::{BlockState, PopulatorType};
use crate::settings::SwapSettings;
use bevy::prelude::{info, Res, ResMut, Resource};
use std::collections::HashMap;

/// One block written by a populator.
#[derive(Debug, Clone)]
pub struct BlockTransaction {
    pub position: (i32, i32, i32),
    /// State before the populator ran.
    pub original: BlockState,
    /// State the populator wants to place.
    pub final_replacement: BlockState,
    /// State proposed by a replacement mapping, if any.
    pub custom_replacement: Option<BlockState>,
}

impl BlockTransaction {
    #[must_use]
    pub fn new(position: (i32, i32, i32), original: BlockState, final_replacement: BlockState) -> Self {
        Self {
            position,
            original,
            final_replacement,
            custom_replacement: None,
        }
    }

    /// The state that ends up in the world.
    #[must_use]
    pub fn resulting_state(&self) -> &BlockState {
        self.custom_replacement.as_ref().unwrap_or(&self.final_replacement)
    }
}

/// All transactions of one populated chunk, grouped by populator.
#[derive(Debug, Clone, Default)]
pub struct PopulatedChunk {
    pub coords: (i32, i32),
    pub transactions: HashMap<PopulatorType, Vec<BlockTransaction>>,
}

/// Chunks waiting for replacement, and chunks already processed.
///
/// `swapped` is owned by the consumer: nothing in this crate removes
/// chunks from it, so whoever commits the results must drain it (see
/// [`PendingPopulation::take_swapped`]) or it grows for the life of the app.
#[derive(Resource, Default)]
pub struct PendingPopulation {
    pub queued: Vec<PopulatedChunk>,
    pub swapped: Vec<PopulatedChunk>,
}

impl PendingPopulation {
    /// Remove and return every processed chunk.
    pub fn take_swapped(&mut self) -> Vec<PopulatedChunk> {
        std::mem::take(&mut self.swapped)
    }
}

/// Propose replacements for every transaction in `chunk`.
///
/// Each transaction is looked up first in the table of the populator that
/// produced it, then in the global table. Returns how many transactions
/// received a custom replacement.
pub fn apply_replacements(resolver: &ReplacementResolver, chunk: &mut PopulatedChunk) -> usize {
    let mut swapped = 0;
    for (populator, transactions) in &mut chunk.transactions {
        for transaction in transactions.iter_mut() {
            if let Some(replacement) = resolver.resolve(populator, &transaction.final_replacement) {
                transaction.custom_replacement = Some(replacement.clone());
                swapped += 1;
            }
        }
    }
    swapped
}

/// Apply replacements to every queued chunk.
#[allow(clippy::needless_pass_by_value)]
pub fn swap_populated_blocks(
    resolver: Res<ReplacementResolver>,
    settings: Res<SwapSettings>,
    mut pending: ResMut<PendingPopulation>,
) {
    if pending.queued.is_empty() {
        return;
    }

    let queued: Vec<PopulatedChunk> = pending.queued.drain(..).collect();
    for mut chunk in queued {
        let swapped = apply_replacements(&resolver, &mut chunk);
        if settings.resolution.log_swaps {
            info!(chunk_x = chunk.coords.0, chunk_z = chunk.coords.1, swapped, "swapped populated blocks");
        }
        pending.swapped.push(chunk);
    }
}
