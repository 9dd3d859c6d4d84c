pub mod batch;
pub mod collector;
pub mod reassembler;

pub use batch::{batch_count, create_batches, Batch};
pub use collector::{
    collect_translation_units, unit_texts, CollectionStats, Slot, TextCollector, TranslationUnit,
};
pub use reassembler::{reassemble, ReassemblyStats};
