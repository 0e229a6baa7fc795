mod dataset;
mod load;
mod parse;

pub use dataset::{MentionRecord, MentionSet};
pub use load::{load_mention_set, sample_mention_set};
